//! GitHub Actions run context

use crate::error::{Error, Result};
use crate::types::{PullRequestRef, RepoRef};
use serde_json::Value;
use std::path::Path;

/// What the helpers need to know about the current workflow run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionContext {
    /// Repository the workflow runs in
    pub repo: RepoRef,
    /// Pull request (or issue) number, when the event has one
    pub number: Option<u64>,
    /// Workflow run id (`GITHUB_RUN_ID`)
    pub run_id: Option<u64>,
    /// Job id of the running job (`GITHUB_JOB`)
    pub job: Option<String>,
    /// Author of the comment that triggered the run
    pub comment_author: Option<String>,
    /// User that triggered the run (`GITHUB_ACTOR`)
    pub actor: Option<String>,
}

impl ActionContext {
    /// Build from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build through an environment accessor.
    ///
    /// `GITHUB_REPOSITORY` is required. The number comes from the event
    /// payload (`GITHUB_EVENT_PATH`) when present, then from a
    /// `refs/pull/<n>/...` `GITHUB_REF`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let repo: RepoRef = get("GITHUB_REPOSITORY")
            .ok_or_else(|| Error::Config("GITHUB_REPOSITORY not set".to_string()))?
            .parse()?;

        let event = match get("GITHUB_EVENT_PATH") {
            Some(path) => Some(load_event(Path::new(&path))?),
            None => None,
        };

        let number = event
            .as_ref()
            .and_then(event_number)
            .or_else(|| get("GITHUB_REF").as_deref().and_then(pr_number_from_ref));

        let run_id = match get("GITHUB_RUN_ID") {
            Some(raw) => Some(raw.parse::<u64>().map_err(|_| {
                Error::Config(format!("Invalid GITHUB_RUN_ID: {}", raw))
            })?),
            None => None,
        };

        let comment_author = event.as_ref().and_then(|e| {
            e.pointer("/comment/user/login")
                .and_then(Value::as_str)
                .map(str::to_string)
        });

        Ok(Self {
            repo,
            number,
            run_id,
            job: get("GITHUB_JOB"),
            comment_author,
            actor: get("GITHUB_ACTOR"),
        })
    }

    /// The pull request this run is about
    pub fn pull_request(&self) -> Result<PullRequestRef> {
        let number = self.number.ok_or_else(|| {
            Error::Config("No pull request number in the event or GITHUB_REF".to_string())
        })?;
        Ok(PullRequestRef::new(self.repo.clone(), number))
    }
}

fn load_event(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// `issue.number`, `pull_request.number` or top-level `number`
fn event_number(event: &Value) -> Option<u64> {
    ["/issue/number", "/pull_request/number", "/number"]
        .iter()
        .find_map(|ptr| event.pointer(ptr).and_then(Value::as_u64))
}

/// Parse the number out of `refs/pull/<n>/merge` or `refs/pull/<n>/head`
pub fn pr_number_from_ref(github_ref: &str) -> Option<u64> {
    github_ref
        .strip_prefix("refs/pull/")?
        .split('/')
        .next()?
        .parse()
        .ok()
}
