//! Editing session over the site content.
//!
//! Holds the working copy of the content record and its Clean/Dirty/Publishing
//! state. A failed publish never discards edits: the working copy stays in memory
//! and the local save performed before the remote commit is kept.

mod editing;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use url::Url;

use crate::config::Config;
use crate::db::ContentStore;
use crate::errors::AppError;
use crate::models::{CommitSummary, ContentRecord, PublishConfig, PublishConfigView};
use crate::publish::PublishClient;

/// Commit message used when the operator does not supply one.
pub const DEFAULT_COMMIT_MESSAGE: &str = "Update site content via CMS Admin Panel";

/// Dashboard editing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorState {
    /// Working copy matches the last save.
    Clean,
    /// Working copy has unsaved edits.
    Dirty,
    /// A remote commit is in flight.
    Publishing,
}

/// Settings for the publish clients the dashboard creates.
#[derive(Debug, Clone)]
pub struct PublishSettings {
    pub api_base: Url,
    pub timeout: Duration,
    pub history_limit: usize,
}

impl From<&Config> for PublishSettings {
    fn from(config: &Config) -> Self {
        Self {
            api_base: config.github_api_url.clone(),
            timeout: config.http_timeout,
            history_limit: config.history_limit,
        }
    }
}

/// Snapshot of the dashboard for the admin header and sidebar.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatus {
    pub state: EditorState,
    pub publishing_enabled: bool,
    pub history: Vec<CommitSummary>,
}

struct Session {
    working: ContentRecord,
    state: EditorState,
    /// Set when the working copy changes while a publish is in flight.
    edited_while_publishing: bool,
    publisher: Option<Arc<PublishClient>>,
    history: Vec<CommitSummary>,
}

impl Session {
    fn mark_edited(&mut self) {
        match self.state {
            EditorState::Publishing => self.edited_while_publishing = true,
            EditorState::Clean | EditorState::Dirty => self.state = EditorState::Dirty,
        }
    }
}

/// The in-memory editing session, held for the lifetime of the process.
pub struct Dashboard {
    store: ContentStore,
    settings: PublishSettings,
    session: Mutex<Session>,
}

impl Dashboard {
    /// Load the working copy and, when configured, connect the publish client.
    pub async fn open(store: ContentStore, settings: PublishSettings) -> Self {
        let working = store.load().await;

        let publisher = match store.load_config().await {
            Some(config) => match PublishClient::new(
                config.normalized(),
                settings.api_base.clone(),
                settings.timeout,
            ) {
                Ok(client) => Some(Arc::new(client)),
                Err(e) => {
                    tracing::warn!("Stored publish configuration is unusable: {}", e);
                    None
                }
            },
            None => None,
        };

        let history = match &publisher {
            Some(client) => client.get_commit_history(settings.history_limit).await,
            None => Vec::new(),
        };

        if publisher.is_none() {
            tracing::info!("Remote publishing is not configured");
        }

        Self {
            store,
            settings,
            session: Mutex::new(Session {
                working,
                state: EditorState::Clean,
                edited_while_publishing: false,
                publisher,
                history,
            }),
        }
    }

    pub async fn state(&self) -> EditorState {
        self.session.lock().await.state
    }

    /// A copy of the working content.
    pub async fn content(&self) -> ContentRecord {
        self.session.lock().await.working.clone()
    }

    pub async fn status(&self) -> DashboardStatus {
        let session = self.session.lock().await;
        DashboardStatus {
            state: session.state,
            publishing_enabled: session.publisher.is_some(),
            history: session.history.clone(),
        }
    }

    /// Apply an edit to the working copy.
    ///
    /// The edit must leave the record untouched when it fails; only a successful
    /// edit marks the session dirty.
    pub async fn edit<T, F>(&self, apply: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut ContentRecord) -> Result<T, AppError>,
    {
        let mut session = self.session.lock().await;
        let result = apply(&mut session.working)?;
        session.mark_edited();
        Ok(result)
    }

    /// Persist the working copy locally. Returns `false` when there was nothing to save.
    pub async fn save(&self) -> Result<bool, AppError> {
        let mut session = self.session.lock().await;
        match session.state {
            EditorState::Publishing => Err(AppError::Conflict(
                "Cannot save while a publish is in progress".to_string(),
            )),
            EditorState::Clean => Ok(false),
            EditorState::Dirty => {
                self.store.save(&session.working).await?;
                session.state = EditorState::Clean;
                tracing::info!("Changes saved locally");
                Ok(true)
            }
        }
    }

    /// Save locally, then commit the working copy to the configured repository.
    pub async fn publish(&self, message: Option<String>) -> Result<(), AppError> {
        let message = message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_COMMIT_MESSAGE.to_string());

        let (publisher, snapshot) = {
            let mut session = self.session.lock().await;
            let Some(publisher) = session.publisher.clone() else {
                return Err(AppError::NotConfigured(
                    "GitHub integration not configured. Please check settings.".to_string(),
                ));
            };
            if session.state == EditorState::Publishing {
                return Err(AppError::Conflict(
                    "A publish is already in progress".to_string(),
                ));
            }
            session.state = EditorState::Publishing;
            session.edited_while_publishing = false;
            (publisher, session.working.clone())
        };

        tracing::info!("Publishing site content");

        if let Err(e) = self.store.save(&snapshot).await {
            self.finish_publish(false).await;
            return Err(e);
        }

        if let Err(e) = publisher.commit_content(&snapshot, &message).await {
            tracing::error!("Publish error: {}", e);
            self.finish_publish(false).await;
            return Err(e);
        }

        self.finish_publish(true).await;
        tracing::info!("Site published; the deployment pipeline will pick up the change");

        let history = publisher
            .get_commit_history(self.settings.history_limit)
            .await;
        let mut session = self.session.lock().await;
        let still_active = session
            .publisher
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, &publisher));
        if still_active {
            session.history = history;
        }
        Ok(())
    }

    async fn finish_publish(&self, succeeded: bool) {
        let mut session = self.session.lock().await;
        session.state = if succeeded && !session.edited_while_publishing {
            EditorState::Clean
        } else {
            EditorState::Dirty
        };
        session.edited_while_publishing = false;
    }

    /// Replace the publish configuration and reconnect.
    pub async fn update_config(&self, config: PublishConfig) -> Result<PublishConfigView, AppError> {
        let config = config.normalized();
        let client = PublishClient::new(
            config.clone(),
            self.settings.api_base.clone(),
            self.settings.timeout,
        )?;
        self.store.save_config(&config).await?;

        let history = client.get_commit_history(self.settings.history_limit).await;

        let mut session = self.session.lock().await;
        session.publisher = Some(Arc::new(client));
        session.history = history;
        tracing::info!(
            "Publish configuration updated for {}/{}@{}",
            config.github_owner,
            config.github_repo,
            config.branch
        );
        Ok(config.redacted())
    }

    /// The stored publish configuration, token withheld.
    pub async fn config_view(&self) -> Option<PublishConfigView> {
        self.store.load_config().await.map(|config| config.redacted())
    }

    /// Test a candidate configuration, or the active one when none is given.
    pub async fn test_connection(&self, candidate: Option<PublishConfig>) -> Result<bool, AppError> {
        let client = match candidate {
            Some(config) => Arc::new(PublishClient::new(
                config.normalized(),
                self.settings.api_base.clone(),
                self.settings.timeout,
            )?),
            None => self.active_publisher().await?,
        };
        Ok(client.test_connection().await)
    }

    /// Forget the stored content and configuration.
    ///
    /// The working copy is kept; it counts as unsaved unless it equals the default
    /// record the store now yields.
    pub async fn clear_all(&self) -> Result<(), AppError> {
        let mut session = self.session.lock().await;
        if session.state == EditorState::Publishing {
            return Err(AppError::Conflict(
                "Cannot clear data while a publish is in progress".to_string(),
            ));
        }
        self.store.clear_all().await?;

        session.publisher = None;
        session.history.clear();
        if session.working == ContentRecord::default() {
            if session.state == EditorState::Dirty {
                session.state = EditorState::Clean;
            }
        } else {
            session.mark_edited();
        }
        Ok(())
    }

    /// Drop unsaved edits and reload the working copy from the store.
    pub async fn discard(&self) -> Result<ContentRecord, AppError> {
        let mut session = self.session.lock().await;
        if session.state == EditorState::Publishing {
            return Err(AppError::Conflict(
                "Cannot discard while a publish is in progress".to_string(),
            ));
        }
        session.working = self.store.load().await;
        session.state = EditorState::Clean;
        Ok(session.working.clone())
    }

    /// Fetch recent commits, refreshing the cached history.
    pub async fn refresh_history(&self, limit: Option<usize>) -> Vec<CommitSummary> {
        let Ok(publisher) = self.active_publisher().await else {
            return Vec::new();
        };
        let limit = limit.unwrap_or(self.settings.history_limit);
        let history = publisher.get_commit_history(limit).await;

        let mut session = self.session.lock().await;
        let still_active = session
            .publisher
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, &publisher));
        if still_active {
            session.history = history.clone();
        }
        history
    }

    /// The content record currently committed on the remote branch.
    pub async fn published_content(&self) -> Result<Option<ContentRecord>, AppError> {
        let publisher = self.active_publisher().await?;
        Ok(publisher.fetch_published().await)
    }

    async fn active_publisher(&self) -> Result<Arc<PublishClient>, AppError> {
        self.session
            .lock()
            .await
            .publisher
            .clone()
            .ok_or_else(|| {
                AppError::NotConfigured(
                    "GitHub integration not configured. Please check settings.".to_string(),
                )
            })
    }
}
