//! Local content store over the key-value table.
//!
//! Reads never fail: a missing or corrupt entry reads as absent (or as the built-in
//! default for the content record). Writes propagate their errors.

use std::sync::Arc;

use chrono::Utc;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{ContentRecord, PublishConfig};

/// Key holding the saved content record.
pub const CONTENT_KEY: &str = "tayyar_cms_content";
/// Key holding the publish configuration.
pub const CONFIG_KEY: &str = "tayyar_cms_config";
/// Key holding the admin session.
pub const SESSION_KEY: &str = "tayyar_admin_auth";

/// A persisted entry that could not be parsed and was treated as absent.
#[derive(Debug, Clone)]
pub struct CorruptEntry {
    pub key: String,
    pub reason: String,
}

/// Callback invoked whenever a corrupt entry is read.
pub type CorruptionHook = Arc<dyn Fn(&CorruptEntry) + Send + Sync>;

/// The admin session persisted after a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    pub token: String,
    pub created_at: String,
}

/// Durable local storage for the content record, publish config and admin session.
#[derive(Clone)]
pub struct ContentStore {
    pool: SqlitePool,
    on_corrupt: Option<CorruptionHook>,
}

impl ContentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            on_corrupt: None,
        }
    }

    /// Register a callback observing entries that were silently downgraded.
    pub fn with_corruption_hook(mut self, hook: CorruptionHook) -> Self {
        self.on_corrupt = Some(hook);
        self
    }

    // ==================== CONTENT ====================

    /// Load the saved content record, or the built-in default.
    pub async fn load(&self) -> ContentRecord {
        self.read_json(CONTENT_KEY).await.unwrap_or_default()
    }

    /// Persist the content record.
    pub async fn save(&self, record: &ContentRecord) -> Result<(), AppError> {
        self.write_json(CONTENT_KEY, record).await
    }

    // ==================== PUBLISH CONFIG ====================

    /// Load the publish configuration; `None` means publishing is disabled.
    pub async fn load_config(&self) -> Option<PublishConfig> {
        self.read_json(CONFIG_KEY).await
    }

    pub async fn save_config(&self, config: &PublishConfig) -> Result<(), AppError> {
        self.write_json(CONFIG_KEY, config).await
    }

    /// Remove the content record and the publish configuration.
    pub async fn clear_all(&self) -> Result<(), AppError> {
        sqlx::query("DELETE FROM kv_store WHERE key IN (?, ?)")
            .bind(CONTENT_KEY)
            .bind(CONFIG_KEY)
            .execute(&self.pool)
            .await?;
        tracing::info!("Cleared stored content and publish configuration");
        Ok(())
    }

    // ==================== SESSION ====================

    pub async fn load_session(&self) -> Option<StoredSession> {
        self.read_json(SESSION_KEY).await
    }

    pub async fn save_session(&self, token: &str) -> Result<(), AppError> {
        let session = StoredSession {
            token: token.to_string(),
            created_at: Utc::now().to_rfc3339(),
        };
        self.write_json(SESSION_KEY, &session).await
    }

    pub async fn clear_session(&self) -> Result<(), AppError> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(SESSION_KEY)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ==================== RAW ACCESS ====================

    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.read_raw(key).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!("Failed to read {} from local store: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                self.report_corrupt(key, e.to_string());
                None
            }
        }
    }

    async fn write_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), AppError> {
        let raw = serde_json::to_string(value)
            .map_err(|e| AppError::Persistence(format!("Failed to serialize {}: {}", key, e)))?;
        self.write_raw(key, &raw).await
    }

    async fn read_raw(&self, key: &str) -> Result<Option<String>, sqlx::Error> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|row| row.get("value")))
    }

    async fn write_raw(&self, key: &str, value: &str) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    fn report_corrupt(&self, key: &str, reason: String) {
        tracing::warn!("Ignoring corrupt entry {} in local store: {}", key, reason);
        if let Some(hook) = &self.on_corrupt {
            hook(&CorruptEntry {
                key: key.to_string(),
                reason,
            });
        }
    }

    /// Write a raw value, bypassing serialization.
    #[cfg(test)]
    pub(crate) async fn put_raw(&self, key: &str, value: &str) {
        self.write_raw(key, value).await.unwrap();
    }
}
