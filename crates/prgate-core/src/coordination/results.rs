//! Results comment for matrix jobs
//!
//! Each matrix job posts one comment headed by a link to its own job run,
//! followed by a snippet per reported step.

use crate::context::ActionContext;
use crate::error::Result;
use crate::report::{render_step, ReportStyle, StepResult, StepSpec};
use crate::traits::PullRequestApi;
use crate::types::{CommentRef, PullRequestRef, RepoRef};
use tracing::{info, warn};

/// A step result paired with how it should be rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportedStep {
    /// The step's result
    pub result: StepResult,
    /// Expand a successful outcome
    pub detailed_success: bool,
}

/// Read every step in `steps` through `lookup`
pub fn collect_steps<F>(steps: &[StepSpec], lookup: F) -> Result<Vec<ReportedStep>>
where
    F: Fn(&str) -> Option<String>,
{
    steps
        .iter()
        .map(|spec| {
            Ok(ReportedStep {
                result: StepResult::from_lookup(&spec.name, &lookup)?,
                detailed_success: spec.detailed_success,
            })
        })
        .collect()
}

/// Markdown link to the matrix job `"{job} ({module_path})"` of run `run_id`.
///
/// Falls back to the bare module path when the run or job is unknown, or
/// when no job in the run carries that name.
pub async fn job_link<A: PullRequestApi>(
    api: &A,
    repo: &RepoRef,
    run_id: Option<u64>,
    job: Option<&str>,
    module_path: &str,
) -> Result<String> {
    let (Some(run_id), Some(job)) = (run_id, job) else {
        warn!(module_path, "No workflow run or job in context");
        return Ok(module_path.to_string());
    };

    let wanted = format!("{} ({})", job, module_path);
    let jobs = api.workflow_jobs(repo, run_id).await?;

    match jobs.iter().find(|j| j.name == wanted) {
        Some(found) if !found.html_url.is_empty() => Ok(format!(
            "[{}]({}?check_suite_focus=true)",
            module_path, found.html_url
        )),
        _ => {
            warn!(run_id, job = %wanted, "Matrix job not found in workflow run");
            Ok(module_path.to_string())
        }
    }
}

/// Build the comment body: `## <link>` followed by one snippet per step
pub fn render_results(link: &str, steps: &[ReportedStep], style: &ReportStyle) -> String {
    let mut body = format!("## {}", link);
    for step in steps {
        body.push_str("\n\n");
        body.push_str(&render_step(&step.result, step.detailed_success, style));
    }
    body
}

/// Render the results for `module_path` and post them on `pr`
pub async fn comment_results<A: PullRequestApi>(
    api: &A,
    ctx: &ActionContext,
    pr: &PullRequestRef,
    module_path: &str,
    steps: &[ReportedStep],
    style: &ReportStyle,
) -> Result<CommentRef> {
    let link = job_link(api, &ctx.repo, ctx.run_id, ctx.job.as_deref(), module_path).await?;
    let body = render_results(&link, steps, style);
    let comment = api.create_comment(pr, &body).await?;
    info!(pr = %pr, module_path, comment = %comment.html_url, "Posted results comment");
    Ok(comment)
}
