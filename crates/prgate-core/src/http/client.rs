//! GitHub REST API client for pull request lookups, permissions and comments

use crate::config::{ClientConfig, Pagination};
use crate::error::{Error, Result};
use crate::traits::PullRequestApi;
use crate::types::{
    CommentRef, MergeableState, PermissionLevel, PrHead, PullRequest, PullRequestRef, RepoRef,
    WorkflowJob,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// REST API version pinned in every request
const API_VERSION: &str = "2022-11-28";

/// GitHub API response for a changed file
#[derive(Debug, Deserialize)]
struct GitHubFile {
    filename: String,
}

/// GitHub API pull request object
#[derive(Debug, Deserialize)]
struct GitHubPullRequest {
    number: u64,
    head: PrHead,
    #[serde(default)]
    mergeable_state: Option<String>,
}

/// GitHub API collaborator permission object
#[derive(Debug, Deserialize)]
struct GitHubPermission {
    permission: String,
}

/// GitHub API issue comment object
#[derive(Debug, Deserialize)]
struct GitHubComment {
    id: u64,
    html_url: String,
}

#[derive(Debug, Serialize)]
struct NewComment<'a> {
    body: &'a str,
}

/// GitHub API response for workflow jobs list
#[derive(Debug, Deserialize)]
struct WorkflowJobsResponse {
    jobs: Vec<GitHubWorkflowJob>,
}

/// GitHub API job object
#[derive(Debug, Deserialize)]
struct GitHubWorkflowJob {
    id: u64,
    name: String,
    #[serde(default)]
    html_url: Option<String>,
}

/// Error body returned by the REST API
#[derive(Debug, Deserialize)]
struct GitHubErrorBody {
    message: String,
}

/// GitHub REST API client
///
/// Carries the shared auth and pagination policy; pass it to every helper
/// that needs network access.
pub struct GitHubApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    pagination: Pagination,
}

impl std::fmt::Debug for GitHubApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubApiClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("pagination", &self.pagination)
            .finish_non_exhaustive()
    }
}

impl GitHubApiClient {
    /// Create a new GitHub API client
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("prgate/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_url,
            token: config.token,
            pagination: config.pagination,
        })
    }

    /// Create from `GITHUB_API_URL` / `GITHUB_TOKEN`
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    /// Pagination bounds used by list endpoints
    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// Head of a pull request
    pub async fn head(&self, pr: &PullRequestRef) -> Result<PrHead> {
        Ok(self.pull_request(pr).await?.head)
    }

    /// Head SHA, truncated to `length` characters when given and positive
    pub async fn sha(&self, pr: &PullRequestRef, length: Option<usize>) -> Result<String> {
        let head = self.head(pr).await?;
        Ok(head.short_sha(length).to_string())
    }

    /// True when the pull request's mergeable state is `clean`
    pub async fn is_mergeable(&self, pr: &PullRequestRef) -> Result<bool> {
        Ok(self.pull_request(pr).await?.mergeable_state.is_clean())
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .request(method, url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION);

        if let Some(ref token) = self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        request
    }

    /// Send a request and decode a successful JSON body.
    ///
    /// Non-success statuses are returned as errors without retrying.
    async fn send_json<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::Http(format!("GitHub API request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| Error::Decode(format!("Failed to parse GitHub API response: {}", e)));
        }

        let remaining = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if (status == reqwest::StatusCode::FORBIDDEN
            || status == reqwest::StatusCode::TOO_MANY_REQUESTS)
            && remaining.as_deref() == Some("0")
        {
            return Err(Error::RateLimitExceeded(format!(
                "GitHub API rate limit exceeded ({}). Consider using GITHUB_TOKEN.",
                status
            )));
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<GitHubErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or(body);
        let message = if message.trim().is_empty() {
            status.canonical_reason().unwrap_or("unknown").to_string()
        } else {
            message
        };

        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_page<T: DeserializeOwned>(&self, url: &str, page: u32) -> Result<T> {
        let request = self.request(reqwest::Method::GET, url).query(&[
            ("per_page", self.pagination.per_page()),
            ("page", page),
        ]);
        self.send_json(request).await
    }

    fn repo_url(&self, repo: &RepoRef) -> String {
        format!("{}/repos/{}/{}", self.base_url, repo.owner, repo.repo)
    }
}

impl PullRequestApi for GitHubApiClient {
    /// Fetch changed files page by page.
    ///
    /// Endpoint: GET /repos/{owner}/{repo}/pulls/{number}/files
    /// Stops at the first short (or empty) page, or after `max_pages`.
    async fn list_files(&self, pr: &PullRequestRef) -> Result<Vec<String>> {
        let url = format!("{}/pulls/{}/files", self.repo_url(&pr.repo), pr.number);
        let per_page = self.pagination.per_page() as usize;

        let mut files = Vec::new();
        let mut exhausted = false;

        for page in 1..=self.pagination.max_pages() {
            let batch: Vec<GitHubFile> = self.get_page(&url, page).await?;
            let len = batch.len();
            files.extend(batch.into_iter().map(|f| f.filename));

            if len < per_page {
                exhausted = true;
                break;
            }
        }

        if !exhausted {
            warn!(
                pr = %pr,
                max_pages = self.pagination.max_pages(),
                count = files.len(),
                "Stopped listing files at the page limit; the list may be incomplete"
            );
        }

        debug!(pr = %pr, count = files.len(), files = ?files, "Changed files");
        Ok(files)
    }

    /// Endpoint: GET /repos/{owner}/{repo}/pulls/{number}
    async fn pull_request(&self, pr: &PullRequestRef) -> Result<PullRequest> {
        let url = format!("{}/pulls/{}", self.repo_url(&pr.repo), pr.number);
        let raw: GitHubPullRequest = self
            .send_json(self.request(reqwest::Method::GET, &url))
            .await?;

        let mergeable_state = raw
            .mergeable_state
            .as_deref()
            .map_or(MergeableState::Unknown, MergeableState::parse);

        debug!(pr = %pr, mergeable_state = %mergeable_state, sha = %raw.head.sha, "Pull request");

        Ok(PullRequest {
            number: raw.number,
            head: raw.head,
            mergeable_state,
        })
    }

    /// Endpoint: GET /repos/{owner}/{repo}/collaborators/{user}/permission
    async fn collaborator_permission(&self, repo: &RepoRef, user: &str) -> Result<PermissionLevel> {
        let url = format!("{}/collaborators/{}/permission", self.repo_url(repo), user);
        let raw: GitHubPermission = self
            .send_json(self.request(reqwest::Method::GET, &url))
            .await?;

        let level = PermissionLevel::parse(&raw.permission);
        if level == PermissionLevel::None && raw.permission != "none" {
            warn!(user, permission = %raw.permission, "Unrecognized permission level, treating as none");
        }
        debug!(user, repo = %repo, permission = %level, "Permission for user");
        Ok(level)
    }

    /// Endpoint: POST /repos/{owner}/{repo}/issues/{number}/comments
    async fn create_comment(&self, issue: &PullRequestRef, body: &str) -> Result<CommentRef> {
        let url = format!("{}/issues/{}/comments", self.repo_url(&issue.repo), issue.number);
        let request = self
            .request(reqwest::Method::POST, &url)
            .json(&NewComment { body });
        let raw: GitHubComment = self.send_json(request).await?;

        debug!(issue = %issue, comment_id = raw.id, "Created comment");
        Ok(CommentRef {
            id: raw.id,
            html_url: raw.html_url,
        })
    }

    /// Endpoint: GET /repos/{owner}/{repo}/actions/runs/{run_id}/jobs
    async fn workflow_jobs(&self, repo: &RepoRef, run_id: u64) -> Result<Vec<WorkflowJob>> {
        let url = format!("{}/actions/runs/{}/jobs", self.repo_url(repo), run_id);
        let per_page = self.pagination.per_page() as usize;

        let mut jobs = Vec::new();
        for page in 1..=self.pagination.max_pages() {
            let batch: WorkflowJobsResponse = self.get_page(&url, page).await?;
            let len = batch.jobs.len();
            jobs.extend(batch.jobs.into_iter().map(|job| WorkflowJob {
                id: job.id,
                name: job.name,
                html_url: job.html_url.unwrap_or_default(),
            }));
            if len < per_page {
                break;
            }
        }

        Ok(jobs)
    }
}
