#[cfg(target_env = "musl")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{bail, Context};
use clap::Parser;
use prgate_core::authority::{grant_with_comment, is_granted};
use prgate_core::coordination::{
    collect_steps, comment_results, job_link, render_results, validate_apply, GateDecision,
    GateOptions,
};
use prgate_core::output::json_format::{format_json_array, format_matrix};
use prgate_core::output::{error_annotation, GhaOutput};
use prgate_core::report::{ReportStyle, StepSpec};
use prgate_core::{
    ActionContext, BaseMatch, ClientConfig, DepthRange, GitHubApiClient, Pagination,
    PathClassifier, PermissionLevel, PullRequestApi, PullRequestRef,
};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, warn};

#[derive(Parser)]
#[command(
    name = "prgate",
    version,
    about = "Pull request gating and change-matrix helpers for GitHub Actions"
)]
struct Cli {
    /// Output format: gha, json, text (default: auto-detect)
    #[arg(long, global = true, env = "PRGATE_OUTPUT_FORMAT")]
    output_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// List the files changed by a pull request
    Files(FilesArgs),
    /// Classify changed files into module directories
    ChangedDirs(ChangedDirsArgs),
    /// Show the head of a pull request
    Head(HeadArgs),
    /// Print the head SHA of a pull request
    Sha(ShaArgs),
    /// Check whether a pull request is mergeable
    Mergeable(HeadArgs),
    /// Look up a collaborator's permission level
    Permission(PermissionArgs),
    /// Gate an apply run on permission and mergeability
    ValidateApply(ValidateApplyArgs),
    /// Post a step results comment for a matrix job
    CommentResults(CommentResultsArgs),
}

#[derive(clap::Args)]
struct ApiArgs {
    /// GitHub token for API access
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = prgate_core::config::DEFAULT_API_URL)]
    api_url: String,

    /// Repository as owner/repo (default: from the workflow context)
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repo: Option<String>,

    /// Pull request number (default: from the workflow event)
    #[arg(long, env = "PRGATE_PR")]
    pr: Option<u64>,

    /// Items requested per page (1-100)
    #[arg(long, env = "PRGATE_PER_PAGE", default_value_t = 100)]
    per_page: u32,

    /// Maximum pages fetched from list endpoints
    #[arg(long, env = "PRGATE_MAX_PAGES", default_value_t = 30)]
    max_pages: u32,

    /// Request timeout in seconds
    #[arg(long, env = "PRGATE_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,
}

#[derive(clap::Args)]
struct FilesArgs {
    #[command(flatten)]
    api: ApiArgs,
}

#[derive(clap::Args)]
struct ChangedDirsArgs {
    #[command(flatten)]
    api: ApiArgs,

    /// Read changed paths from a file, one per line ("-" for stdin)
    /// instead of fetching them from the pull request
    #[arg(long, env = "PRGATE_PATHS_FILE")]
    paths_file: Option<PathBuf>,

    /// Only consider paths under this directory ("./" for the root)
    #[arg(long, env = "PRGATE_BASE_PATH", default_value = "")]
    base_path: String,

    /// First directory segment kept (negative means 0)
    #[arg(long, env = "PRGATE_MIN_DEPTH", allow_negative_numbers = true)]
    min_depth: Option<i64>,

    /// Segment index where directories are cut (exclusive)
    #[arg(long, env = "PRGATE_MAX_DEPTH", allow_negative_numbers = true)]
    max_depth: Option<i64>,

    /// Match the base path as a raw string prefix
    #[arg(long, env = "PRGATE_RAW_PREFIX")]
    raw_prefix: bool,

    /// Key used for each matrix entry
    #[arg(long, env = "PRGATE_MATRIX_KEY", default_value = "module")]
    matrix_key: String,
}

#[derive(clap::Args)]
struct HeadArgs {
    #[command(flatten)]
    api: ApiArgs,
}

#[derive(clap::Args)]
struct ShaArgs {
    #[command(flatten)]
    api: ApiArgs,

    /// Truncate to this many characters (0 or less keeps the full SHA)
    #[arg(long, env = "PRGATE_SHA_LENGTH", allow_negative_numbers = true)]
    length: Option<i64>,
}

#[derive(clap::Args)]
struct PermissionArgs {
    #[command(flatten)]
    api: ApiArgs,

    /// User to check (default: comment author, then GITHUB_ACTOR)
    #[arg(long, env = "PRGATE_USER")]
    user: Option<String>,

    /// Permission levels that count as granted (comma-separated)
    #[arg(long, env = "PRGATE_ALLOWED", value_delimiter = ',', default_value = "admin")]
    allowed: Vec<PermissionLevel>,

    /// Comment on the pull request when the permission is not granted
    #[arg(long, env = "PRGATE_COMMENT_ON_DENY")]
    comment_on_deny: bool,

    /// Action named in the denial comment
    #[arg(long, env = "PRGATE_ACTION", default_value = "the apply job")]
    action: String,
}

#[derive(clap::Args)]
struct ValidateApplyArgs {
    #[command(flatten)]
    api: ApiArgs,

    /// User that triggered the run (default: comment author, then GITHUB_ACTOR)
    #[arg(long, env = "PRGATE_USER")]
    user: Option<String>,

    /// Permission levels allowed to apply (comma-separated)
    #[arg(long, env = "PRGATE_ALLOWED", value_delimiter = ',', default_value = "admin")]
    allowed: Vec<PermissionLevel>,

    /// Action named in the denial comment
    #[arg(long, env = "PRGATE_ACTION", default_value = "the apply job")]
    action: String,
}

#[derive(clap::Args)]
struct CommentResultsArgs {
    #[command(flatten)]
    api: ApiArgs,

    /// Module directory of this matrix job
    #[arg(long, env = "PRGATE_MODULE_PATH")]
    module_path: String,

    /// Step to report, as name or name:detailed (repeatable)
    #[arg(long = "step", env = "PRGATE_STEPS", value_delimiter = ',')]
    steps: Vec<String>,

    /// YAML list of steps ({ name, detailed_success })
    #[arg(long, env = "PRGATE_STEPS_FILE")]
    steps_file: Option<PathBuf>,

    /// Tool label shown before each step name
    #[arg(long, env = "PRGATE_TOOL", default_value = "terraform")]
    tool: String,

    /// Workflow run id (default: GITHUB_RUN_ID)
    #[arg(long)]
    run_id: Option<u64>,

    /// Job id of the matrix job (default: GITHUB_JOB)
    #[arg(long)]
    job: Option<String>,

    /// Print the comment instead of posting it
    #[arg(long)]
    dry_run: bool,
}

/// Output format for the CLI
enum OutputFormat {
    /// GitHub Actions: write to $GITHUB_OUTPUT + summary to stdout
    Gha,
    /// JSON object to stdout
    Json,
    /// Human-readable text to stdout
    Text,
}

impl OutputFormat {
    fn detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("gha") => OutputFormat::Gha,
            Some("json") => OutputFormat::Json,
            Some("text") => OutputFormat::Text,
            _ => {
                if std::env::var("GITHUB_ACTIONS").is_ok() {
                    OutputFormat::Gha
                } else {
                    OutputFormat::Text
                }
            }
        }
    }
}

/// Result of one subcommand, rendered according to the output format
struct CommandOutput {
    /// Step outputs written to $GITHUB_OUTPUT
    outputs: Vec<(&'static str, String)>,
    /// Full result for `--output-format json`
    json: serde_json::Value,
    /// Human-readable summary
    text: String,
    /// `::error::` workflow command, printed before the result
    annotation: Option<String>,
    /// Process exit code
    code: i32,
}

impl CommandOutput {
    fn new(outputs: Vec<(&'static str, String)>, json: serde_json::Value, text: String) -> Self {
        Self {
            outputs,
            json,
            text,
            annotation: None,
            code: 0,
        }
    }
}

fn main() {
    prgate_core::logging::init();

    let cli = Cli::parse();
    let format = OutputFormat::detect(cli.output_format.as_deref().filter(|s| !s.is_empty()));

    let code = match run(cli.command) {
        Ok(out) => match emit(&format, &out) {
            Ok(()) => out.code,
            Err(e) => {
                error!("{e:#}");
                1
            }
        },
        Err(e) => {
            error!("{e:#}");
            1
        }
    };
    std::process::exit(code);
}

fn run(command: Commands) -> anyhow::Result<CommandOutput> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to create runtime")?;

    rt.block_on(async {
        match command {
            Commands::Files(args) => run_files(args).await,
            Commands::ChangedDirs(args) => run_changed_dirs(args).await,
            Commands::Head(args) => run_head(args).await,
            Commands::Sha(args) => run_sha(args).await,
            Commands::Mergeable(args) => run_mergeable(args).await,
            Commands::Permission(args) => run_permission(args).await,
            Commands::ValidateApply(args) => run_validate_apply(args).await,
            Commands::CommentResults(args) => run_comment_results(args).await,
        }
    })
}

/// Filter empty string from Option (env vars may produce "" for empty values)
fn clean_opt(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}

fn client(args: &ApiArgs) -> anyhow::Result<GitHubApiClient> {
    let pagination = Pagination::new(args.per_page, args.max_pages)?;
    let config = ClientConfig::new(&args.api_url, clean_opt(&args.token).map(str::to_string))
        .with_pagination(pagination)
        .with_timeout(Duration::from_secs(args.timeout_secs));
    Ok(GitHubApiClient::new(config)?)
}

/// Workflow context, with `--repo` and `--pr` taking precedence
fn action_context(args: &ApiArgs) -> anyhow::Result<ActionContext> {
    let repo = clean_opt(&args.repo);
    let mut ctx = ActionContext::from_lookup(|key| match (key, repo) {
        ("GITHUB_REPOSITORY", Some(repo)) => Some(repo.to_string()),
        _ => std::env::var(key).ok(),
    })
    .context("cannot determine the workflow context")?;

    if let Some(number) = args.pr {
        ctx.number = Some(number);
    }
    Ok(ctx)
}

fn pull_request(ctx: &ActionContext) -> anyhow::Result<PullRequestRef> {
    Ok(ctx
        .pull_request()
        .context("pass --pr or run on a pull request event")?)
}

/// The acting user: explicit flag, then comment author, then actor
fn acting_user(explicit: &Option<String>, ctx: &ActionContext) -> anyhow::Result<String> {
    match clean_opt(explicit) {
        Some(user) => Ok(user.to_string()),
        None => ctx
            .comment_author
            .clone()
            .or_else(|| ctx.actor.clone())
            .context("no user given and none found in the workflow event"),
    }
}

async fn run_files(args: FilesArgs) -> anyhow::Result<CommandOutput> {
    let ctx = action_context(&args.api)?;
    let pr = pull_request(&ctx)?;
    let files = client(&args.api)?.list_files(&pr).await?;

    let text = format!("Changed files in {} ({}):\n{}", pr, files.len(), files.join("\n"));
    Ok(CommandOutput::new(
        vec![
            ("files", format_json_array(&files)),
            ("files_count", files.len().to_string()),
        ],
        serde_json::json!({ "files": files, "files_count": files.len() }),
        text,
    ))
}

async fn run_changed_dirs(args: ChangedDirsArgs) -> anyhow::Result<CommandOutput> {
    let paths = match &args.paths_file {
        Some(path) => read_paths(path)?,
        None => {
            let ctx = action_context(&args.api)?;
            let pr = pull_request(&ctx)?;
            client(&args.api)?.list_files(&pr).await?
        }
    };

    let mode = if args.raw_prefix {
        BaseMatch::Raw
    } else {
        BaseMatch::Segment
    };
    let classifier =
        PathClassifier::new(&args.base_path, DepthRange::new(args.min_depth, args.max_depth))
            .with_mode(mode);
    let dirs = classifier.classify(&paths);

    let matrix = format_matrix(&dirs, &args.matrix_key);
    let text = if dirs.is_empty() {
        "No module directories changed".to_string()
    } else {
        format!("Module directories ({}):\n{}", dirs.len(), dirs.join("\n"))
    };
    Ok(CommandOutput::new(
        vec![
            ("dirs", format_json_array(&dirs)),
            ("matrix", matrix.clone()),
            ("has_dirs", (!dirs.is_empty()).to_string()),
        ],
        serde_json::json!({
            "dirs": dirs,
            "matrix": serde_json::from_str::<serde_json::Value>(&matrix)?,
            "has_dirs": !dirs.is_empty(),
        }),
        text,
    ))
}

/// Non-empty, trimmed lines of `path` ("-" reads stdin)
fn read_paths(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = if path.as_os_str() == "-" {
        let mut lines = Vec::new();
        for line in std::io::stdin().lock().lines() {
            lines.push(line.context("failed to read paths from stdin")?);
        }
        lines.join("\n")
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

async fn run_head(args: HeadArgs) -> anyhow::Result<CommandOutput> {
    let ctx = action_context(&args.api)?;
    let pr = pull_request(&ctx)?;
    let head = client(&args.api)?.head(&pr).await?;

    let text = format!("{} head: {} ({})", pr, head.label, head.sha);
    Ok(CommandOutput::new(
        vec![
            ("ref", head.ref_name.clone()),
            ("sha", head.sha.clone()),
            ("label", head.label.clone()),
        ],
        serde_json::json!({
            "ref": head.ref_name,
            "sha": head.sha,
            "label": head.label,
            "user": head.user.as_ref().map(|u| &u.login),
            "repo": head.repo.as_ref().map(|r| &r.full_name),
        }),
        text,
    ))
}

async fn run_sha(args: ShaArgs) -> anyhow::Result<CommandOutput> {
    let ctx = action_context(&args.api)?;
    let pr = pull_request(&ctx)?;
    let length = args.length.and_then(|n| usize::try_from(n).ok());
    let sha = client(&args.api)?.sha(&pr, length).await?;

    Ok(CommandOutput::new(
        vec![("sha", sha.clone())],
        serde_json::json!({ "sha": sha }),
        sha,
    ))
}

async fn run_mergeable(args: HeadArgs) -> anyhow::Result<CommandOutput> {
    let ctx = action_context(&args.api)?;
    let pr = pull_request(&ctx)?;
    let pull = client(&args.api)?.pull_request(&pr).await?;
    let mergeable = pull.mergeable_state.is_clean();

    let text = format!(
        "{} is {}mergeable (state: {})",
        pr,
        if mergeable { "" } else { "not " },
        pull.mergeable_state
    );
    Ok(CommandOutput::new(
        vec![
            ("mergeable", mergeable.to_string()),
            ("mergeable_state", pull.mergeable_state.to_string()),
        ],
        serde_json::json!({
            "mergeable": mergeable,
            "mergeable_state": pull.mergeable_state.as_str(),
        }),
        text,
    ))
}

async fn run_permission(args: PermissionArgs) -> anyhow::Result<CommandOutput> {
    let ctx = action_context(&args.api)?;
    let user = acting_user(&args.user, &ctx)?;
    let api = client(&args.api)?;

    let (permission, granted) = if args.comment_on_deny {
        let pr = pull_request(&ctx)?;
        grant_with_comment(&api, &pr, &user, &args.allowed, &args.action).await?
    } else {
        let permission = api.collaborator_permission(&ctx.repo, &user).await?;
        (permission, is_granted(&args.allowed, permission))
    };

    let text = format!(
        "{} has {} permission on {} ({})",
        user,
        permission,
        ctx.repo,
        if granted { "granted" } else { "denied" }
    );
    Ok(CommandOutput::new(
        vec![
            ("permission", permission.to_string()),
            ("granted", granted.to_string()),
        ],
        serde_json::json!({
            "user": user,
            "permission": permission,
            "granted": granted,
        }),
        text,
    ))
}

async fn run_validate_apply(args: ValidateApplyArgs) -> anyhow::Result<CommandOutput> {
    let ctx = action_context(&args.api)?;
    let pr = pull_request(&ctx)?;
    let user = acting_user(&args.user, &ctx)?;
    let api = client(&args.api)?;

    let options = GateOptions {
        action: args.action,
        ..GateOptions::default()
    }
    .with_allowed(args.allowed);

    let decision = validate_apply(&api, &pr, &user, &options).await?;
    let out = match decision {
        GateDecision::Allowed => CommandOutput::new(
            vec![("allowed", "true".to_string())],
            serde_json::json!({ "allowed": true, "user": user }),
            format!("{} may trigger {} on {}", user, options.action, pr),
        ),
        GateDecision::Denied {
            message, comment, ..
        } => {
            let mut out = CommandOutput::new(
                vec![
                    ("allowed", "false".to_string()),
                    ("reason", message.clone()),
                    ("comment_url", comment.html_url.clone()),
                ],
                serde_json::json!({
                    "allowed": false,
                    "user": user,
                    "reason": message,
                    "comment": comment,
                }),
                format!("Denied: {}", message),
            );
            out.annotation = Some(error_annotation(&message));
            out.code = 1;
            out
        }
    };
    Ok(out)
}

async fn run_comment_results(args: CommentResultsArgs) -> anyhow::Result<CommandOutput> {
    let mut specs = args
        .steps
        .iter()
        .map(String::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(StepSpec::parse)
        .collect::<prgate_core::Result<Vec<_>>>()?;
    if let Some(path) = &args.steps_file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        specs.extend(StepSpec::load_yaml(&content)?);
    }
    if specs.is_empty() {
        bail!("no steps given; pass --step or --steps-file");
    }

    let steps = collect_steps(&specs, |key| std::env::var(key).ok())?;
    let style = ReportStyle { tool: args.tool };

    let mut ctx = action_context(&args.api)?;
    if args.run_id.is_some() {
        ctx.run_id = args.run_id;
    }
    if let Some(job) = clean_opt(&args.job) {
        ctx.job = Some(job.to_string());
    }

    let api = client(&args.api)?;

    if args.dry_run {
        let link = job_link(&api, &ctx.repo, ctx.run_id, ctx.job.as_deref(), &args.module_path).await?;
        let body = render_results(&link, &steps, &style);
        return Ok(CommandOutput::new(
            vec![("body", body.clone())],
            serde_json::json!({ "body": body }),
            body,
        ));
    }

    let pr = pull_request(&ctx)?;
    let comment = comment_results(&api, &ctx, &pr, &args.module_path, &steps, &style).await?;
    Ok(CommandOutput::new(
        vec![
            ("comment_id", comment.id.to_string()),
            ("comment_url", comment.html_url.clone()),
        ],
        serde_json::json!({ "comment": comment }),
        format!("Posted results for {}: {}", args.module_path, comment.html_url),
    ))
}

/// Render `out` on the process streams. Fails when the step outputs
/// cannot be written.
fn emit(format: &OutputFormat, out: &CommandOutput) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    render(
        format,
        out,
        GhaOutput::from_env(),
        &mut stdout.lock(),
        &mut stderr.lock(),
    )
}

fn render(
    format: &OutputFormat,
    out: &CommandOutput,
    gha: Option<GhaOutput>,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> anyhow::Result<()> {
    if let Some(annotation) = &out.annotation {
        // The runner reads workflow commands from both streams; JSON stdout
        // must stay a single document
        match format {
            OutputFormat::Json => writeln!(stderr, "{annotation}")?,
            OutputFormat::Gha | OutputFormat::Text => writeln!(stdout, "{annotation}")?,
        }
    }

    match format {
        OutputFormat::Gha => write_gha_output(out, gha, stdout),
        OutputFormat::Json => write_json_output(out, stdout),
        OutputFormat::Text => write_text_output(out, stdout),
    }
}

/// Write outputs to $GITHUB_OUTPUT and a summary to stdout
fn write_gha_output(
    out: &CommandOutput,
    gha: Option<GhaOutput>,
    stdout: &mut impl Write,
) -> anyhow::Result<()> {
    let Some(gha) = gha else {
        warn!("GITHUB_OUTPUT not set, falling back to stdout");
        return write_json_output(out, stdout);
    };

    let pairs = out.outputs.iter().map(|(name, value)| (*name, value.as_str()));
    gha.write(pairs)
        .with_context(|| format!("cannot write GITHUB_OUTPUT ({})", gha.path().display()))?;

    // Summary to stdout (visible in job log)
    write_text_output(out, stdout)
}

/// Write the JSON result to stdout
fn write_json_output(out: &CommandOutput, stdout: &mut impl Write) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *stdout, &out.json)?;
    writeln!(stdout)?;
    Ok(())
}

/// Write human-readable text to stdout
fn write_text_output(out: &CommandOutput, stdout: &mut impl Write) -> anyhow::Result<()> {
    writeln!(stdout, "{}", out.text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn denied() -> CommandOutput {
        let mut out = CommandOutput::new(
            vec![("allowed", "false".to_string())],
            serde_json::json!({ "allowed": false }),
            "Denied: steve is not an admin of this repository".to_string(),
        );
        out.annotation = Some(error_annotation("steve is not an admin of this repository"));
        out.code = 1;
        out
    }

    fn rendered(
        format: OutputFormat,
        out: &CommandOutput,
        gha: Option<GhaOutput>,
    ) -> (anyhow::Result<()>, String, String) {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let result = render(&format, out, gha, &mut stdout, &mut stderr);
        (
            result,
            String::from_utf8(stdout).unwrap(),
            String::from_utf8(stderr).unwrap(),
        )
    }

    #[test]
    fn test_json_stdout_is_one_document_with_annotation() {
        let (result, stdout, stderr) = rendered(OutputFormat::Json, &denied(), None);
        result.unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
        assert_eq!(parsed, serde_json::json!({ "allowed": false }));
        assert_eq!(stderr, "::error::steve is not an admin of this repository\n");
    }

    #[test]
    fn test_text_annotation_precedes_summary() {
        let (result, stdout, stderr) = rendered(OutputFormat::Text, &denied(), None);
        result.unwrap();
        assert_eq!(
            stdout,
            "::error::steve is not an admin of this repository\n\
             Denied: steve is not an admin of this repository\n"
        );
        assert!(stderr.is_empty());
    }

    #[test]
    fn test_gha_writes_outputs_and_summary() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output");
        let (result, stdout, _) =
            rendered(OutputFormat::Gha, &denied(), Some(GhaOutput::new(&path)));
        result.unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "allowed<<PRGATE_EOF\nfalse\nPRGATE_EOF\n"
        );
        assert!(stdout.starts_with("::error::"));
        assert!(stdout.ends_with("Denied: steve is not an admin of this repository\n"));
    }

    #[test]
    fn test_gha_without_output_file_falls_back_to_json() {
        let out = CommandOutput::new(
            vec![("sha", "abc1234".to_string())],
            serde_json::json!({ "sha": "abc1234" }),
            "abc1234".to_string(),
        );
        let (result, stdout, _) = rendered(OutputFormat::Gha, &out, None);
        result.unwrap();
        assert_eq!(stdout, "{\"sha\":\"abc1234\"}\n");
    }

    #[test]
    fn test_unwritable_output_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("output");
        let out = CommandOutput::new(
            vec![("sha", "abc1234".to_string())],
            serde_json::json!({ "sha": "abc1234" }),
            "abc1234".to_string(),
        );

        let (result, _, _) = rendered(OutputFormat::Gha, &out, Some(GhaOutput::new(&path)));
        let err = result.unwrap_err();
        assert!(format!("{err:#}").contains("cannot write GITHUB_OUTPUT"));
    }
}
