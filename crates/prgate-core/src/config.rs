//! Client configuration

use crate::error::{Error, Result};
use std::time::Duration;

/// Default GitHub REST endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Bounds for paginated list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    per_page: u32,
    max_pages: u32,
}

impl Pagination {
    /// GitHub's maximum page size
    pub const MAX_PER_PAGE: u32 = 100;

    /// Create pagination bounds. `per_page` must be in `1..=100`, `max_pages` at least 1.
    pub fn new(per_page: u32, max_pages: u32) -> Result<Self> {
        if per_page == 0 || per_page > Self::MAX_PER_PAGE {
            return Err(Error::Config(format!(
                "per_page must be between 1 and {}, got {}",
                Self::MAX_PER_PAGE,
                per_page
            )));
        }
        if max_pages == 0 {
            return Err(Error::Config("max_pages must be at least 1".to_string()));
        }
        Ok(Self {
            per_page,
            max_pages,
        })
    }

    /// Entries requested per page
    #[inline]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Maximum number of pages fetched
    #[inline]
    pub const fn max_pages(&self) -> u32 {
        self.max_pages
    }

    /// Upper bound on entries a single listing can return
    #[inline]
    pub const fn max_entries(&self) -> u64 {
        self.per_page as u64 * self.max_pages as u64
    }
}

impl Default for Pagination {
    /// 30 pages of 100: the 3000-file ceiling of the pull request files API
    fn default() -> Self {
        Self {
            per_page: 100,
            max_pages: 30,
        }
    }
}

/// Configuration for [`GitHubApiClient`](crate::http::GitHubApiClient)
#[derive(Clone)]
pub struct ClientConfig {
    /// REST API base URL, without trailing slash
    pub api_url: String,
    /// Bearer token
    pub token: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Pagination bounds for list endpoints
    pub pagination: Pagination,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("pagination", &self.pagination)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(30),
            pagination: Pagination::default(),
        }
    }
}

impl ClientConfig {
    /// Create a config for `api_url` with an optional token
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            api_url,
            token: token.filter(|t| !t.is_empty()),
            ..Default::default()
        }
    }

    /// Read `GITHUB_API_URL` and `GITHUB_TOKEN`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the config through an environment accessor
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("GITHUB_API_URL")
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self::new(api_url, lookup("GITHUB_TOKEN"))
    }

    /// Override pagination bounds
    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    /// Override the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
