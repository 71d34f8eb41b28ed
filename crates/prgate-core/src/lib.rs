//! # prgate core
//!
//! Pull request helpers for GitHub Actions workflows:
//! - **Path classification**: changed files to a module-directory matrix
//! - **GitHub REST client** with bounded pagination
//! - **Apply gate**: collaborator permission and mergeability checks
//! - **Step reports**: markdown snippets for pipeline step outcomes
//!
//! ## Example
//!
//! ```no_run
//! use prgate_core::{changed_dirs, GitHubApiClient, PullRequestApi, PullRequestRef, RepoRef};
//!
//! # async fn example() -> prgate_core::Result<()> {
//! let api = GitHubApiClient::from_env()?;
//! let pr = PullRequestRef::new(RepoRef::new("strongbox", "strongbox"), 1567);
//!
//! let files = api.list_files(&pr).await?;
//! let dirs = changed_dirs(&files, "infra", Some(0), Some(2));
//! println!("Module directories: {:?}", dirs);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs, rust_2018_idioms)]

pub mod authority;
pub mod classifier;
pub mod config;
pub mod context;
pub mod coordination;
pub mod error;
pub mod http;
pub mod logging;
pub mod output;
pub mod report;
pub mod traits;
pub mod types;

pub use classifier::{changed_dirs, BaseMatch, DepthRange, PathClassifier};
pub use config::{ClientConfig, Pagination};
pub use context::ActionContext;
pub use coordination::{validate_apply, GateDecision, GateOptions};
pub use error::{Error, ErrorKind, Result};
pub use http::GitHubApiClient;
pub use traits::PullRequestApi;
pub use types::{
    CommentRef, MergeableState, PermissionLevel, PrHead, PullRequest, PullRequestRef, RepoRef,
    WorkflowJob,
};
