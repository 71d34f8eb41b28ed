//! Trait seam between the helpers and the GitHub REST API

use crate::error::Result;
use crate::types::{CommentRef, PermissionLevel, PullRequest, PullRequestRef, RepoRef, WorkflowJob};
use std::future::Future;

/// Pull request operations used by the gate and report flows.
///
/// Implemented by [`GitHubApiClient`](crate::http::GitHubApiClient); tests
/// provide in-memory fakes. Returned futures are `Send` so flows can run on
/// a multi-threaded runtime. No boxing, no dynamic dispatch.
pub trait PullRequestApi {
    /// All changed file paths of a pull request, in API order
    fn list_files(&self, pr: &PullRequestRef) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Pull request head and mergeability
    fn pull_request(&self, pr: &PullRequestRef) -> impl Future<Output = Result<PullRequest>> + Send;

    /// Permission level of `user` on `repo`
    fn collaborator_permission(
        &self,
        repo: &RepoRef,
        user: &str,
    ) -> impl Future<Output = Result<PermissionLevel>> + Send;

    /// Post a comment on an issue or pull request
    fn create_comment(
        &self,
        issue: &PullRequestRef,
        body: &str,
    ) -> impl Future<Output = Result<CommentRef>> + Send;

    /// Jobs of a workflow run
    fn workflow_jobs(
        &self,
        repo: &RepoRef,
        run_id: u64,
    ) -> impl Future<Output = Result<Vec<WorkflowJob>>> + Send;
}
