//! GitHub provider (REST v3) for raw file content.
//!
//! Endpoint used:
//!   * GET /repos/{owner}/{repo}/contents/{path}  (Accept: application/vnd.github.v3.raw)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header};
use tracing::{debug, warn};

use crate::{
    FileSource,
    errors::{GitRawFilesError, GitRawFilesResult},
};

pub const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("gitlore-backend/", env!("CARGO_PKG_VERSION"));
const RAW_ACCEPT: &str = "application/vnd.github.v3.raw";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for [`GitHubClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubConfig {
    /// API base without trailing slash, e.g. `https://api.github.com`.
    pub base_api: String,
    /// Optional token sent as `Authorization: Bearer <token>`.
    pub token: Option<String>,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            base_api: DEFAULT_GITHUB_API_BASE.to_string(),
            token: None,
        }
    }
}

impl GitHubConfig {
    /// Reads `GITHUB_API_BASE` and `GITHUB_TOKEN` through `env`; empty values count as unset.
    pub fn from_lookup(env: &dyn Fn(&str) -> Option<String>) -> Self {
        let non_empty = |k: &str| env(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Self {
            base_api: non_empty("GITHUB_API_BASE")
                .map(|b| b.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_GITHUB_API_BASE.to_string()),
            token: non_empty("GITHUB_TOKEN"),
        }
    }
}

/// GitHub HTTP client wrapper.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    base_api: String,
    token: Option<String>,
}

impl GitHubClient {
    /// Builds a client with a stable user agent and a request timeout.
    pub fn new(cfg: GitHubConfig) -> GitRawFilesResult<Self> {
        if !(cfg.base_api.starts_with("http://") || cfg.base_api.starts_with("https://")) {
            return Err(GitRawFilesError::Config(format!(
                "base api url must start with http:// or https://, got {}",
                cfg.base_api
            )));
        }

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| GitRawFilesError::Config(e.to_string()))?;

        debug!("Creating GitHubClient with base_api={}", cfg.base_api);
        Ok(Self {
            http,
            base_api: cfg.base_api.trim_end_matches('/').to_string(),
            token: cfg.token,
        })
    }

    /// Contents API URL for `path` with every segment percent-encoded.
    fn contents_url(&self, owner: &str, repo: &str, path: &str) -> String {
        let encoded_path = path
            .split('/')
            .map(|seg| urlencoding::encode(seg).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.base_api,
            urlencoding::encode(owner),
            urlencoding::encode(repo),
            encoded_path
        )
    }
}

/// Owner and repo must be single path segments; the path loses its leading `/`.
pub fn validate_location<'a>(
    owner: &'a str,
    repo: &'a str,
    path: &'a str,
) -> GitRawFilesResult<(&'a str, &'a str, &'a str)> {
    let owner = owner.trim();
    let repo = repo.trim();
    if owner.is_empty() || owner.contains('/') {
        return Err(GitRawFilesError::InvalidInput("owner must be a non-empty name without '/'"));
    }
    if repo.is_empty() || repo.contains('/') {
        return Err(GitRawFilesError::InvalidInput("repo must be a non-empty name without '/'"));
    }
    let path = path.trim().trim_start_matches('/');
    if path.is_empty() {
        return Err(GitRawFilesError::InvalidInput("path must not be empty"));
    }
    Ok((owner, repo, path))
}

#[async_trait]
impl FileSource for GitHubClient {
    async fn fetch_raw(&self, owner: &str, repo: &str, path: &str) -> GitRawFilesResult<String> {
        let (owner, repo, path) = validate_location(owner, repo, path)?;
        let url = self.contents_url(owner, repo, path);
        debug!("GitHub fetch_raw: url={}", url);

        let mut req = self.http.get(&url).header(header::ACCEPT, RAW_ACCEPT);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let retry_after_secs = resp
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            warn!(%owner, %repo, %path, status = status.as_u16(), "GitHub raw fetch failed");
            return Err(GitRawFilesError::from_status(status.as_u16(), retry_after_secs));
        }

        let bytes = resp.bytes().await?;
        debug!(%path, bytes = bytes.len(), "GitHub raw file fetched");
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
