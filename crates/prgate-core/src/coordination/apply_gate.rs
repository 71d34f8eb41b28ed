//! Gate for comment-triggered privileged jobs (e.g. `terraform apply`)
//!
//! A run is allowed only when the commenting user holds one of the allowed
//! permission levels and the pull request is in a `clean` mergeable state.
//! Every failed check is reported together in a single pull request comment.

use crate::authority::{denied_reason, denied_sentence, is_granted};
use crate::error::Result;
use crate::traits::PullRequestApi;
use crate::types::{CommentRef, MergeableState, PermissionLevel, PullRequestRef};
use tracing::info;

/// What is allowed, and how the gated action is named in comments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateOptions {
    /// Permission levels allowed to trigger the action
    pub allowed: Vec<PermissionLevel>,
    /// Action name used in comments
    pub action: String,
}

impl Default for GateOptions {
    fn default() -> Self {
        Self {
            allowed: vec![PermissionLevel::Admin],
            action: "the apply job".to_string(),
        }
    }
}

impl GateOptions {
    /// Use `allowed`, falling back to `[admin]` when empty
    pub fn with_allowed(mut self, allowed: Vec<PermissionLevel>) -> Self {
        if !allowed.is_empty() {
            self.allowed = allowed;
        }
        self
    }
}

/// A failed gate check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateFailure {
    /// The user's permission level is not allowed
    Permission(PermissionLevel),
    /// The pull request is not in a clean state
    NotMergeable(MergeableState),
}

impl GateFailure {
    /// Short reason for logs and the failed step
    pub fn reason(&self, user: &str, options: &GateOptions) -> String {
        match self {
            GateFailure::Permission(_) => denied_reason(user, &options.allowed),
            GateFailure::NotMergeable(_) => "The pull request is not mergeable".to_string(),
        }
    }

    /// Explanation posted on the pull request, without the `@user` mention
    pub fn sentence(&self, options: &GateOptions) -> String {
        match self {
            GateFailure::Permission(_) => denied_sentence(&options.allowed, &options.action),
            GateFailure::NotMergeable(_) => format!(
                "you can only trigger {} on pull requests that are mergeable. Make sure all merge \
                 conflicts have been resolved, all required status checks have passed and that the \
                 pull request has the necessary approvals.",
                options.action
            ),
        }
    }
}

/// Outcome of [`validate_apply`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// All checks passed
    Allowed,
    /// At least one check failed; an explanatory comment was posted
    Denied {
        /// Failed checks, permission first
        failures: Vec<GateFailure>,
        /// Failure reasons joined for the step annotation
        message: String,
        /// The posted comment
        comment: CommentRef,
    },
}

impl GateDecision {
    /// True for [`GateDecision::Allowed`]
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allowed)
    }
}

/// Build the denial comment for `failures` (must be non-empty)
pub fn denial_comment(user: &str, failures: &[GateFailure], options: &GateOptions) -> String {
    match failures {
        [single] => format!("@{} {}", user, single.sentence(options)),
        many => {
            let mut body = format!("@{} {} cannot be triggered:\n", user, options.action);
            for failure in many {
                body.push_str("\n- ");
                body.push_str(&capitalize(&failure.sentence(options)));
            }
            body
        }
    }
}

/// Check `user`'s permission and the pull request's mergeability.
///
/// On failure, posts one comment on the pull request listing every failed
/// check and returns [`GateDecision::Denied`]. API errors are returned
/// as-is; nothing is retried.
pub async fn validate_apply<A: PullRequestApi>(
    api: &A,
    pr: &PullRequestRef,
    user: &str,
    options: &GateOptions,
) -> Result<GateDecision> {
    let permission = api.collaborator_permission(&pr.repo, user).await?;
    let pull = api.pull_request(pr).await?;

    let mut failures = Vec::with_capacity(2);
    if !is_granted(&options.allowed, permission) {
        failures.push(GateFailure::Permission(permission));
    }
    if !pull.mergeable_state.is_clean() {
        failures.push(GateFailure::NotMergeable(pull.mergeable_state));
    }

    if failures.is_empty() {
        info!(pr = %pr, user, permission = %permission, "Apply allowed");
        return Ok(GateDecision::Allowed);
    }

    let body = denial_comment(user, &failures, options);
    let comment = api.create_comment(pr, &body).await?;

    let message = failures
        .iter()
        .map(|f| f.reason(user, options))
        .collect::<Vec<_>>()
        .join("; ");

    info!(
        pr = %pr,
        user,
        permission = %permission,
        mergeable_state = %pull.mergeable_state,
        reason = %message,
        "Apply denied"
    );

    Ok(GateDecision::Denied {
        failures,
        message,
        comment,
    })
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = GateOptions::default();
        assert_eq!(options.allowed, vec![PermissionLevel::Admin]);
        assert_eq!(GateOptions::default().with_allowed(vec![]).allowed, vec![PermissionLevel::Admin]);
    }

    #[test]
    fn test_single_permission_comment() {
        let options = GateOptions::default();
        let body = denial_comment("octocat", &[GateFailure::Permission(PermissionLevel::Write)], &options);
        assert_eq!(body, "@octocat only admins of this repository can trigger the apply job.");
    }

    #[test]
    fn test_single_mergeable_comment() {
        let options = GateOptions::default();
        let body = denial_comment("octocat", &[GateFailure::NotMergeable(MergeableState::Dirty)], &options);
        assert_eq!(
            body,
            "@octocat you can only trigger the apply job on pull requests that are mergeable. Make sure \
             all merge conflicts have been resolved, all required status checks have passed and that the \
             pull request has the necessary approvals."
        );
    }

    #[test]
    fn test_combined_comment() {
        let options = GateOptions::default();
        let body = denial_comment(
            "octocat",
            &[
                GateFailure::Permission(PermissionLevel::Read),
                GateFailure::NotMergeable(MergeableState::Blocked),
            ],
            &options,
        );
        assert!(body.starts_with("@octocat the apply job cannot be triggered:\n"));
        assert!(body.contains("\n- Only admins of this repository can trigger the apply job."));
        assert!(body.contains("\n- You can only trigger the apply job on pull requests that are mergeable."));
    }

    #[test]
    fn test_failure_reasons() {
        let options = GateOptions::default();
        assert_eq!(
            GateFailure::Permission(PermissionLevel::None).reason("octocat", &options),
            "octocat is not an admin of this repository"
        );
        assert_eq!(
            GateFailure::NotMergeable(MergeableState::Behind).reason("octocat", &options),
            "The pull request is not mergeable"
        );
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("only admins"), "Only admins");
        assert_eq!(capitalize(""), "");
    }
}
