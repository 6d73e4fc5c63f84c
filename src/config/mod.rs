//! Configuration module for the content backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::errors::AppError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite database backing the local content store
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Base URL of the GitHub REST API
    pub github_api_url: Url,
    /// Admin login username
    pub admin_username: String,
    /// Admin login password
    pub admin_password: String,
    /// Number of commits shown in the dashboard history
    pub history_limit: usize,
    /// Timeout applied to every GitHub request
    pub http_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("CMS_DB_PATH")
            .unwrap_or_else(|_| "./data/cms.sqlite".to_string())
            .into();

        let bind_addr = env::var("CMS_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid CMS_BIND_ADDR: {}", e)))?;

        let log_level = env::var("CMS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let github_api_url = env::var("CMS_GITHUB_API_URL")
            .unwrap_or_else(|_| "https://api.github.com".to_string());
        let github_api_url = Url::parse(&github_api_url)
            .map_err(|e| AppError::Config(format!("Invalid CMS_GITHUB_API_URL: {}", e)))?;

        let admin_username = env::var("CMS_ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let admin_password =
            env::var("CMS_ADMIN_PASSWORD").unwrap_or_else(|_| "tayyar2024".to_string());

        let history_limit = env::var("CMS_HISTORY_LIMIT")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid CMS_HISTORY_LIMIT: {}", e)))?;

        let timeout_secs: u64 = env::var("CMS_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid CMS_HTTP_TIMEOUT_SECS: {}", e)))?;

        Ok(Self {
            db_path,
            bind_addr,
            log_level,
            github_api_url,
            admin_username,
            admin_password,
            history_limit,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
