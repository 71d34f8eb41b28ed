//! Markdown snippets for pipeline step outcomes
//!
//! A workflow exports each step's result as three environment variables:
//! `STEP_<NAME>_OUTCOME`, `STEP_<NAME>_STDOUT` and `STEP_<NAME>_STDERR`.
//! [`StepResult`] reads them and [`render_step`] turns the result into the
//! snippet posted in the pull request.

use super::plan::PlanSummary;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::fmt::Write;

/// Em space (U+2003). Aligns brief lines with `<summary>` rows, which GitHub
/// renders with a disclosure arrow; plain spaces are collapsed by markdown.
const EM_SPACE: char = '\u{2003}';

/// Outcome of a workflow step (`steps.<id>.outcome`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StepOutcome {
    /// Step succeeded
    Success,
    /// Step failed
    Failure,
    /// Step was cancelled
    Cancelled,
    /// Step did not run
    Skipped,
}

impl StepOutcome {
    /// Parse an outcome string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(Self::Success),
            "failure" => Some(Self::Failure),
            "cancelled" => Some(Self::Cancelled),
            "skipped" => Some(Self::Skipped),
            _ => None,
        }
    }

    /// Get string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Cancelled => "cancelled",
            Self::Skipped => "skipped",
        }
    }

    /// Status icon shown next to the outcome
    pub const fn icon(&self) -> &'static str {
        match self {
            Self::Success => "🟢",
            Self::Failure => "🔴",
            Self::Cancelled => "🟡",
            Self::Skipped => "⚪",
        }
    }
}

/// Result of one step, as exported by the workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    /// Step name as given by the caller
    pub name: String,
    /// Step outcome
    pub outcome: StepOutcome,
    /// Trimmed standard output
    pub stdout: String,
    /// Trimmed standard error
    pub stderr: String,
}

impl StepResult {
    /// Read a step result through `lookup` (an environment accessor).
    ///
    /// Missing stdout/stderr are treated as empty; a missing or unknown
    /// outcome is a configuration error.
    pub fn from_lookup<F>(name: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let prefix = format!("STEP_{}", name.to_uppercase());
        let outcome_var = format!("{}_OUTCOME", prefix);

        let raw = lookup(&outcome_var)
            .ok_or_else(|| Error::Config(format!("{} not set", outcome_var)))?;
        let outcome = StepOutcome::parse(raw.trim()).ok_or_else(|| {
            Error::Config(format!("Unknown step outcome in {}: {}", outcome_var, raw))
        })?;

        let read = |suffix: &str| {
            lookup(&format!("{}_{}", prefix, suffix))
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        };

        Ok(Self {
            name: name.to_string(),
            outcome,
            stdout: read("STDOUT"),
            stderr: read("STDERR"),
        })
    }

    /// Read a step result from the process environment
    pub fn from_env(name: &str) -> Result<Self> {
        Self::from_lookup(name, |key| std::env::var(key).ok())
    }
}

/// A step to include in a results comment
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StepSpec {
    /// Step name (matches the `STEP_<NAME>_*` variables)
    pub name: String,
    /// Expand successful outcomes into a `<details>` block
    #[serde(default, alias = "detailedSuccess")]
    pub detailed_success: bool,
}

impl StepSpec {
    /// Parse the `name[:detailed]` CLI form
    pub fn parse(s: &str) -> Result<Self> {
        let (name, flag) = match s.split_once(':') {
            Some((name, flag)) => (name, Some(flag)),
            None => (s, None),
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Config(format!("Empty step name in '{}'", s)));
        }
        let detailed_success = match flag.map(str::trim) {
            None => false,
            Some("detailed") => true,
            Some(other) => {
                return Err(Error::Config(format!(
                    "Unknown step flag '{}' (expected 'detailed')",
                    other
                )))
            }
        };
        Ok(Self {
            name: name.to_string(),
            detailed_success,
        })
    }

    /// Load a YAML list of steps
    pub fn load_yaml(content: &str) -> Result<Vec<Self>> {
        Ok(serde_yaml::from_str(content)?)
    }
}

/// Presentation options for step snippets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportStyle {
    /// Tool label shown before the step name
    pub tool: String,
}

impl Default for ReportStyle {
    fn default() -> Self {
        Self {
            tool: "terraform".to_string(),
        }
    }
}

/// Render the markdown snippet for one step.
///
/// Skipped steps are always rendered as a single line, successful steps
/// too unless `detailed_success` is set. Everything else gets a collapsible
/// `<details>` block with stderr (failures) or stdout.
pub fn render_step(result: &StepResult, detailed_success: bool, style: &ReportStyle) -> String {
    let outcome = result.outcome;
    let step = result.name.to_lowercase();
    let tool = &style.tool;

    let brief = match outcome {
        StepOutcome::Skipped => true,
        StepOutcome::Success => !detailed_success,
        StepOutcome::Failure | StepOutcome::Cancelled => false,
    };

    if brief {
        return format!(
            "{EM_SPACE}<b>{tool} {step}:</b> {}<code>{}</code>",
            outcome.icon(),
            outcome.as_str()
        );
    }

    let body = if outcome == StepOutcome::Failure {
        &result.stderr
    } else {
        &result.stdout
    };

    // `~~~` fences need no escaping of backticks in the body. GitHub is
    // sensitive to the blank lines and the lack of indentation here.
    let mut snippet = String::with_capacity(body.len() + 160);
    let _ = write!(
        snippet,
        "<details>\n<summary><b>{tool} {step}:</b> {} <code>{}</code></summary>\n\n~~~\n{body}\n~~~\n\n</details>",
        outcome.icon(),
        outcome.as_str()
    );

    if step == "plan" {
        let summary = PlanSummary::parse(&result.stdout);
        let destroy_outcome = if summary.destroys_resources() {
            StepOutcome::Failure
        } else {
            StepOutcome::Success
        };
        let count = summary
            .destroy
            .map_or_else(|| "unknown".to_string(), |n| n.to_string());
        let _ = write!(
            snippet,
            "\n{EM_SPACE}<b>{tool} plan-destroys-resources:</b> {}<code>{count} resources to be deleted</code>\n",
            destroy_outcome.icon()
        );
    }

    snippet
}
