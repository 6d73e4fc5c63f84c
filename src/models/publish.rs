//! Publish configuration and commit history models.

use serde::{Deserialize, Serialize};

/// Branch used when the operator leaves the branch field empty.
pub const DEFAULT_BRANCH: &str = "main";

/// Credentials and target location for remote publishing.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishConfig {
    #[serde(default)]
    pub github_token: String,
    #[serde(default)]
    pub github_owner: String,
    #[serde(default)]
    pub github_repo: String,
    #[serde(default)]
    pub branch: String,
}

impl PublishConfig {
    /// Trim every field and fill in the default branch.
    pub fn normalized(mut self) -> Self {
        self.github_token = self.github_token.trim().to_string();
        self.github_owner = self.github_owner.trim().to_string();
        self.github_repo = self.github_repo.trim().to_string();
        self.branch = self.branch.trim().to_string();
        if self.branch.is_empty() {
            self.branch = DEFAULT_BRANCH.to_string();
        }
        self
    }

    /// Names of required fields that are empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.github_token.is_empty() {
            missing.push("githubToken");
        }
        if self.github_owner.is_empty() {
            missing.push("githubOwner");
        }
        if self.github_repo.is_empty() {
            missing.push("githubRepo");
        }
        if self.branch.is_empty() {
            missing.push("branch");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// A view of this config that is safe to send back to the browser.
    pub fn redacted(&self) -> PublishConfigView {
        PublishConfigView {
            github_owner: self.github_owner.clone(),
            github_repo: self.github_repo.clone(),
            branch: self.branch.clone(),
            has_token: !self.github_token.is_empty(),
        }
    }
}

impl std::fmt::Debug for PublishConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublishConfig")
            .field("github_token", &"<redacted>")
            .field("github_owner", &self.github_owner)
            .field("github_repo", &self.github_repo)
            .field("branch", &self.branch)
            .finish()
    }
}

/// Publish configuration as exposed over the API (token withheld).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishConfigView {
    pub github_owner: String,
    pub github_repo: String,
    pub branch: String,
    pub has_token: bool,
}

/// A recent commit touching the published content file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitSummary {
    /// First seven characters of the commit sha.
    pub sha: String,
    pub message: String,
    pub date: String,
    pub author: String,
}

/// Request body for publishing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    #[serde(default)]
    pub message: Option<String>,
}
