//! GitHub publish client.
//!
//! Commits the generated content file to the configured repository. Read operations
//! (connection test, history, published content) never fail; they degrade to
//! `false`, an empty list or `None` and log the cause. The commit itself propagates
//! every failure as a publish error.

mod artifact;

pub use artifact::*;

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use reqwest::header::ACCEPT;
use reqwest::{Client as HttpClient, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::AppError;
use crate::models::{CommitSummary, ContentRecord, PublishConfig};

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("tayyar-cms/", env!("CARGO_PKG_VERSION"));

/// Metadata of the remote content file, as far as the commit needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteFile {
    /// A file exists at the path with this blob sha.
    File { sha: String },
    /// Nothing usable exists at the path; the next commit creates the file.
    Absent,
}

impl RemoteFile {
    pub fn sha(&self) -> Option<&str> {
        match self {
            RemoteFile::File { sha } => Some(sha),
            RemoteFile::Absent => None,
        }
    }
}

#[derive(Debug, Serialize)]
struct PutContentRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct PutContentResponse {
    commit: CommitRef,
}

#[derive(Debug, Deserialize)]
struct CommitRef {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct CommitListEntry {
    sha: String,
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    author: Option<CommitAuthor>,
}

#[derive(Debug, Deserialize)]
struct CommitAuthor {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubErrorBody {
    message: String,
}

impl From<CommitListEntry> for CommitSummary {
    fn from(entry: CommitListEntry) -> Self {
        let author = entry.commit.author;
        Self {
            sha: entry.sha.chars().take(7).collect(),
            message: entry.commit.message,
            date: author
                .as_ref()
                .and_then(|a| a.date.clone())
                .unwrap_or_default(),
            author: author
                .and_then(|a| a.name)
                .unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

/// Authenticated client for one repository and branch.
#[derive(Debug, Clone)]
pub struct PublishClient {
    http_client: HttpClient,
    api_base: Url,
    config: PublishConfig,
}

impl PublishClient {
    /// Create a client; every field of `config` must be set.
    pub fn new(config: PublishConfig, api_base: Url, timeout: Duration) -> Result<Self, AppError> {
        if !config.is_complete() {
            return Err(AppError::Validation(format!(
                "Publish configuration is missing: {}",
                config.missing_fields().join(", ")
            )));
        }
        if api_base.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "GitHub API URL {} cannot be used as a base",
                api_base
            )));
        }

        let http_client = HttpClient::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_base,
            config,
        })
    }

    /// Check that the token can read the configured repository.
    pub async fn test_connection(&self) -> bool {
        let url = self.repo_url(&[]);
        match self.request(self.http_client.get(url)).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::warn!(
                    "GitHub connection test failed for {}/{}: {}",
                    self.config.github_owner,
                    self.config.github_repo,
                    response.status()
                );
                false
            }
            Err(e) => {
                tracing::warn!("GitHub connection test failed: {}", e);
                false
            }
        }
    }

    /// Fetch the metadata of the content file on the configured branch.
    pub async fn remote_file(&self) -> Result<RemoteFile, AppError> {
        let response = self.get_content_file().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(RemoteFile::Absent);
        }
        let response = ensure_success(response, "Reading content file").await?;
        let body: serde_json::Value = response.json().await?;

        // A directory listing comes back as an array.
        if body.is_array() {
            return Ok(RemoteFile::Absent);
        }
        match body.get("sha").and_then(|sha| sha.as_str()) {
            Some(sha) => Ok(RemoteFile::File {
                sha: sha.to_string(),
            }),
            None => Ok(RemoteFile::Absent),
        }
    }

    /// Commit the rendered content record as the new content file.
    ///
    /// Every failing step, including rendering, surfaces as a publish error.
    pub async fn commit_content(
        &self,
        record: &ContentRecord,
        message: &str,
    ) -> Result<(), AppError> {
        self.try_commit_content(record, message)
            .await
            .map_err(AppError::into_publish)
    }

    async fn try_commit_content(
        &self,
        record: &ContentRecord,
        message: &str,
    ) -> Result<(), AppError> {
        let remote = self.remote_file().await?;
        let source = render_content_file(record)?;

        let body = PutContentRequest {
            message,
            content: B64.encode(source.as_bytes()),
            branch: &self.config.branch,
            sha: remote.sha(),
        };

        let url = self.repo_url(&contents_segments());
        let response = self
            .request(self.http_client.put(url))
            .json(&body)
            .send()
            .await?;
        let response = ensure_success(response, "Committing content file").await?;
        let created: PutContentResponse = response.json().await?;

        tracing::info!(
            "Committed {} to {}/{}@{} as {}",
            CONTENT_FILE_PATH,
            self.config.github_owner,
            self.config.github_repo,
            self.config.branch,
            created.commit.sha
        );
        Ok(())
    }

    /// Most recent commits touching the content file, newest first.
    pub async fn get_commit_history(&self, limit: usize) -> Vec<CommitSummary> {
        match self.fetch_commit_history(limit).await {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!("Error fetching commit history: {}", e);
                Vec::new()
            }
        }
    }

    /// The content record currently committed on the configured branch.
    pub async fn fetch_published(&self) -> Option<ContentRecord> {
        match self.fetch_published_inner().await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Error fetching published content: {}", e);
                None
            }
        }
    }

    async fn fetch_commit_history(&self, limit: usize) -> Result<Vec<CommitSummary>, AppError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut url = self.repo_url(&["commits"]);
        url.query_pairs_mut()
            .append_pair("path", CONTENT_FILE_PATH)
            .append_pair("sha", &self.config.branch)
            .append_pair("per_page", &limit.to_string());

        let response = self.request(self.http_client.get(url)).send().await?;
        let response = ensure_success(response, "Listing commits").await?;
        let entries: Vec<CommitListEntry> = response.json().await?;

        Ok(entries
            .into_iter()
            .take(limit)
            .map(CommitSummary::from)
            .collect())
    }

    async fn fetch_published_inner(&self) -> Result<Option<ContentRecord>, AppError> {
        let response = self.get_content_file().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = ensure_success(response, "Reading content file").await?;
        let body: serde_json::Value = response.json().await?;

        let Some(encoded) = body.get("content").and_then(|c| c.as_str()) else {
            return Ok(None);
        };
        // GitHub wraps base64 bodies at 60 columns.
        let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = B64
            .decode(compact)
            .map_err(|e| AppError::BadRequest(format!("Invalid base64 content: {}", e)))?;
        let source = String::from_utf8(bytes)
            .map_err(|e| AppError::BadRequest(format!("Content file is not UTF-8: {}", e)))?;

        parse_content_file(&source).map(Some)
    }

    async fn get_content_file(&self) -> Result<Response, AppError> {
        let mut url = self.repo_url(&contents_segments());
        url.query_pairs_mut().append_pair("ref", &self.config.branch);
        Ok(self.request(self.http_client.get(url)).send().await?)
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(&self.config.github_token)
            .header(ACCEPT, GITHUB_ACCEPT)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
    }

    /// `{base}/repos/{owner}/{repo}/{extra...}`
    fn repo_url(&self, extra: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push("repos")
                .push(&self.config.github_owner)
                .push(&self.config.github_repo)
                .extend(extra);
        }
        url
    }
}

fn contents_segments() -> Vec<&'static str> {
    let mut segments = vec!["contents"];
    segments.extend(CONTENT_FILE_PATH.split('/'));
    segments
}

/// Turn a non-2xx response into a publish error carrying GitHub's message.
async fn ensure_success(response: Response, step: &str) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let detail = match response.json::<GitHubErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => String::from("no error message"),
    };
    Err(AppError::publish(format!("{} returned {}: {}", step, status, detail)))
}
