//! Collaborator permission checks

use crate::error::Result;
use crate::traits::PullRequestApi;
use crate::types::{PermissionLevel, PullRequestRef};
use tracing::info;

/// True when `permission` is one of the `allowed` levels
#[inline]
pub fn is_granted(allowed: &[PermissionLevel], permission: PermissionLevel) -> bool {
    allowed.contains(&permission)
}

/// Who may act, in prose: `admins` or `users with write or admin permission`
pub fn allowed_audience(allowed: &[PermissionLevel]) -> String {
    match allowed {
        [PermissionLevel::Admin] => "admins".to_string(),
        [] => "nobody".to_string(),
        levels => {
            let names: Vec<&str> = levels.iter().map(PermissionLevel::as_str).collect();
            format!("users with {} permission", join_or(&names))
        }
    }
}

/// Failure reason for logs and step annotations
pub fn denied_reason(user: &str, allowed: &[PermissionLevel]) -> String {
    match allowed {
        [PermissionLevel::Admin] => format!("{} is not an admin of this repository", user),
        _ => {
            let names: Vec<&str> = allowed.iter().map(PermissionLevel::as_str).collect();
            format!(
                "{} does not have {} permission on this repository",
                user,
                join_or(&names)
            )
        }
    }
}

/// Sentence explaining the denial, without the `@user` mention
pub fn denied_sentence(allowed: &[PermissionLevel], action: &str) -> String {
    format!(
        "only {} of this repository can trigger {}.",
        allowed_audience(allowed),
        action
    )
}

/// Look up `user`'s permission and comment on the pull request when it is
/// not one of `allowed`. Returns the looked-up level and whether access is
/// granted.
pub async fn grant_with_comment<A: PullRequestApi>(
    api: &A,
    pr: &PullRequestRef,
    user: &str,
    allowed: &[PermissionLevel],
    action: &str,
) -> Result<(PermissionLevel, bool)> {
    let permission = api.collaborator_permission(&pr.repo, user).await?;
    if is_granted(allowed, permission) {
        return Ok((permission, true));
    }

    let body = format!("@{} {}", user, denied_sentence(allowed, action));
    let comment = api.create_comment(pr, &body).await?;
    info!(
        pr = %pr,
        user,
        permission = %permission,
        comment = %comment.html_url,
        "Permission denied"
    );
    Ok((permission, false))
}

fn join_or(names: &[&str]) -> String {
    match names {
        [] => String::new(),
        [one] => (*one).to_string(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}
