use crate::error::AtatError;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
/// Overrides the REST base URL, e.g. for GitHub Enterprise.
pub const API_URL_ENV: &str = "ATAT_API_URL";
/// Checked in order before falling back to `gh auth token`.
pub const TOKEN_ENV_VARS: &[&str] = &["GH_TOKEN", "GITHUB_TOKEN"];

const USER_AGENT: &str = "gh-atat";
const API_VERSION: &str = "2022-11-28";
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Remote issue tracker operations needed by push, pull and `remote add`.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Returns one page of raw issue records in any state, pull requests included.
    async fn list_issues_page(
        &self,
        repo: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<serde_json::Value>>;

    /// Opens an issue and returns the number the tracker assigned to it.
    async fn create_issue(&self, repo: &str, title: &str) -> Result<u64>;

    async fn close_issue(&self, repo: &str, number: u64) -> Result<()>;

    async fn repository_exists(&self, repo: &str) -> Result<bool>;
}

/// GitHub REST API client.
///
/// The token is resolved on first use so that commands failing on local state never
/// need a credential.
pub struct GitHubClient {
    http: reqwest::Client,
    api_base: String,
    token: OnceCell<String>,
}

#[derive(Deserialize)]
struct CreatedIssue {
    number: u64,
}

impl GitHubClient {
    pub fn new(api_base: &str) -> Result<Self> {
        Self::build(api_base, OnceCell::new())
    }

    pub fn with_token(api_base: &str, token: String) -> Result<Self> {
        Self::build(api_base, OnceCell::new_with(Some(token)))
    }

    /// Uses `ATAT_API_URL` when set, the public GitHub API otherwise.
    pub fn from_env() -> Result<Self> {
        let api_base =
            std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(&api_base)
    }

    fn build(api_base: &str, token: OnceCell<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(GitHubClient {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }

    async fn token(&self) -> Result<&str> {
        self.token
            .get_or_try_init(resolve_token)
            .await
            .map(String::as_str)
    }

    async fn send(&self, operation: &str, request: RequestBuilder) -> Result<Response> {
        let token = self.token().await?;
        let response = request
            .bearer_auth(token)
            .send()
            .await
            .with_context(|| format!("GitHub API {operation} request failed"))?;

        let status = response.status();
        debug!(operation, %status, "GitHub API response");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        bail!("GitHub API {operation} failed: HTTP {status}: {}", body.trim())
    }
}

#[async_trait]
impl IssueTracker for GitHubClient {
    async fn list_issues_page(
        &self,
        repo: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<serde_json::Value>> {
        let request = self
            .http
            .get(self.url(&format!("repos/{repo}/issues")))
            .query(&[
                ("state", "all".to_string()),
                ("per_page", per_page.to_string()),
                ("page", page.to_string()),
            ]);

        self.send("list issues", request)
            .await?
            .json::<Vec<serde_json::Value>>()
            .await
            .context("Failed to parse issues response")
    }

    async fn create_issue(&self, repo: &str, title: &str) -> Result<u64> {
        let request = self
            .http
            .post(self.url(&format!("repos/{repo}/issues")))
            .json(&serde_json::json!({ "title": title }));

        let created = self
            .send("create issue", request)
            .await?
            .json::<CreatedIssue>()
            .await
            .context("Failed to parse created issue response")?;
        Ok(created.number)
    }

    async fn close_issue(&self, repo: &str, number: u64) -> Result<()> {
        let request = self
            .http
            .patch(self.url(&format!("repos/{repo}/issues/{number}")))
            .json(&serde_json::json!({ "state": "closed" }));

        self.send("close issue", request).await?;
        Ok(())
    }

    async fn repository_exists(&self, repo: &str) -> Result<bool> {
        let token = self.token().await?;
        let response = self
            .http
            .get(self.url(&format!("repos/{repo}")))
            .bearer_auth(token)
            .send()
            .await
            .context("GitHub API get repository request failed")?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => {
                let body = response.text().await.unwrap_or_default();
                bail!("GitHub API get repository failed: HTTP {status}: {}", body.trim())
            }
        }
    }
}

/// Picks the first non-blank token among [`TOKEN_ENV_VARS`].
pub fn token_from_env<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    TOKEN_ENV_VARS.iter().find_map(|name| {
        lookup(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}

async fn resolve_token() -> Result<String> {
    if let Some(token) = token_from_env(|name| std::env::var(name).ok()) {
        return Ok(token);
    }

    debug!("no token in environment, asking gh CLI");
    let output = tokio::process::Command::new("gh")
        .args(["auth", "token"])
        .output()
        .await;

    match output {
        Ok(output) if output.status.success() => {
            let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if token.is_empty() {
                Err(AtatError::MissingToken.into())
            } else {
                Ok(token)
            }
        }
        _ => Err(AtatError::MissingToken.into()),
    }
}
