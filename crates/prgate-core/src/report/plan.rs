//! Detection of `terraform plan` change summaries

use regex::Regex;
use std::sync::OnceLock;

fn summary_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)([0-9]+) to add, ([0-9]+) to change, ([0-9]+) to destroy")
            .unwrap_or_else(|e| unreachable!("static plan regex is valid: {e}"))
    })
}

/// Resource counts from a `Plan: N to add, N to change, N to destroy.` line
///
/// A count is `None` when the digits do not fit in a `u64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlanSummary {
    /// Resources to add
    pub add: Option<u64>,
    /// Resources to change
    pub change: Option<u64>,
    /// Resources to destroy
    pub destroy: Option<u64>,
}

impl PlanSummary {
    /// Parse the first summary line found in `output`.
    ///
    /// Output without a summary (e.g. "No changes.") yields all-zero counts.
    pub fn parse(output: &str) -> Self {
        match summary_regex().captures(output) {
            Some(caps) => {
                let count = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u64>().ok());
                Self {
                    add: count(1),
                    change: count(2),
                    destroy: count(3),
                }
            }
            None => Self {
                add: Some(0),
                change: Some(0),
                destroy: Some(0),
            },
        }
    }

    /// True when the plan deletes resources, or the destroy count is unreadable
    #[inline]
    pub fn destroys_resources(&self) -> bool {
        self.destroy.map_or(true, |n| n > 0)
    }
}
