//! Core type definitions shared by the client, the gate and the CLI

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Repository coordinates (`owner/repo`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    /// Owning user or organization
    pub owner: String,
    /// Repository name
    pub repo: String,
}

impl RepoRef {
    /// Create a repository reference
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl FromStr for RepoRef {
    type Err = Error;

    /// Parse the `owner/repo` form used by `GITHUB_REPOSITORY`
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
                Ok(Self::new(owner, repo))
            }
            _ => Err(Error::Config(format!(
                "Invalid repository format (expected owner/repo): {}",
                s
            ))),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// A pull request (or issue) within a repository
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PullRequestRef {
    /// Repository the pull request belongs to
    pub repo: RepoRef,
    /// Pull request / issue number
    pub number: u64,
}

impl PullRequestRef {
    /// Create a pull request reference
    pub fn new(repo: RepoRef, number: u64) -> Self {
        Self { repo, number }
    }
}

impl fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.repo, self.number)
    }
}

/// Collaborator permission level on a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum PermissionLevel {
    /// Full administrative access
    Admin,
    /// Push access
    Write,
    /// Pull access
    Read,
    /// No access
    None,
}

impl PermissionLevel {
    /// Parse the API `permission` string. Unknown values grant nothing.
    #[inline]
    pub fn parse(s: &str) -> Self {
        match s {
            "admin" => Self::Admin,
            "write" => Self::Write,
            "read" => Self::Read,
            _ => Self::None,
        }
    }

    /// Get string representation
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Write => "write",
            Self::Read => "read",
            Self::None => "none",
        }
    }
}

impl FromStr for PermissionLevel {
    type Err = Error;

    /// Strict parse for user input (CLI flags, config files)
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "write" => Ok(Self::Write),
            "read" => Ok(Self::Read),
            "none" => Ok(Self::None),
            other => Err(Error::Config(format!(
                "Unknown permission level: {} (expected admin, write, read or none)",
                other
            ))),
        }
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mergeability classification reported by the pulls API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergeableState {
    /// No conflicts, required checks and reviews satisfied
    Clean,
    /// Merge conflicts
    Dirty,
    /// Blocked by branch protection
    Blocked,
    /// Head branch is behind the base branch
    Behind,
    /// Mergeable with failing non-required checks
    Unstable,
    /// Mergeable with pending pre-receive hooks
    HasHooks,
    /// Draft pull request
    Draft,
    /// Not yet computed by GitHub
    Unknown,
}

impl MergeableState {
    /// Parse the API `mergeable_state` string
    pub fn parse(s: &str) -> Self {
        match s {
            "clean" => Self::Clean,
            "dirty" => Self::Dirty,
            "blocked" => Self::Blocked,
            "behind" => Self::Behind,
            "unstable" => Self::Unstable,
            "has_hooks" => Self::HasHooks,
            "draft" => Self::Draft,
            _ => Self::Unknown,
        }
    }

    /// Get string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Dirty => "dirty",
            Self::Blocked => "blocked",
            Self::Behind => "behind",
            Self::Unstable => "unstable",
            Self::HasHooks => "has_hooks",
            Self::Draft => "draft",
            Self::Unknown => "unknown",
        }
    }

    /// Only a clean pull request may be merged
    #[inline]
    pub const fn is_clean(&self) -> bool {
        matches!(self, Self::Clean)
    }
}

impl fmt::Display for MergeableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// GitHub account summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubUser {
    /// Login name
    pub login: String,
    /// Numeric account id
    #[serde(default)]
    pub id: u64,
}

/// Repository summary attached to a pull request head
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadRepo {
    /// `owner/repo`
    pub full_name: String,
}

/// Head of a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrHead {
    /// `user:branch`
    pub label: String,
    /// Branch name
    #[serde(rename = "ref")]
    pub ref_name: String,
    /// Head commit SHA
    pub sha: String,
    /// Owner of the head branch
    pub user: Option<GitHubUser>,
    /// Head repository; `None` when the fork was deleted
    pub repo: Option<HeadRepo>,
}

impl PrHead {
    /// Head SHA truncated to `length` characters (`None` or `0` means full)
    pub fn short_sha(&self, length: Option<usize>) -> &str {
        match length {
            Some(n) if n > 0 => self.sha.get(..n).unwrap_or(&self.sha),
            _ => &self.sha,
        }
    }
}

/// The parts of a pull request the helpers care about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    /// Pull request number
    pub number: u64,
    /// Head branch information
    pub head: PrHead,
    /// Mergeability classification
    pub mergeable_state: MergeableState,
}

/// A job in a workflow run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowJob {
    /// Job id
    pub id: u64,
    /// Display name, e.g. `plan (infra/cs-d/base)` for matrix jobs
    pub name: String,
    /// Link to the job log
    pub html_url: String,
}

/// A comment created on an issue or pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentRef {
    /// Comment id
    pub id: u64,
    /// Link to the comment
    pub html_url: String,
}
