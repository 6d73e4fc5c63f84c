//! Tayyar Electricals content backend
//!
//! Serves the site content, and drives the admin panel's edit / save / publish
//! workflow against a local SQLite store and a GitHub repository.

mod api;
mod auth;
mod config;
mod dashboard;
mod db;
mod errors;
mod models;
mod publish;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use dashboard::{Dashboard, PublishSettings};
use db::ContentStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: ContentStore,
    pub dashboard: Arc<Dashboard>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Tayyar content backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("GitHub API: {}", config.github_api_url);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.admin_password == "tayyar2024" {
        tracing::warn!("Admin password is the built-in default (set CMS_ADMIN_PASSWORD)");
    }

    // Initialize the local content store
    let pool = db::init_database(&config.db_path).await?;
    let store = ContentStore::new(pool).with_corruption_hook(Arc::new(|entry: &db::CorruptEntry| {
        tracing::error!(
            key = %entry.key,
            reason = %entry.reason,
            "Stored entry is corrupt; serving defaults until the next save"
        );
    }));

    // Open the editing session
    let dashboard = Arc::new(Dashboard::open(store.clone(), PublishSettings::from(&config)).await);

    let state = AppState {
        store,
        dashboard,
        config: Arc::new(config.clone()),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Admin routes, behind the session gate
    let admin_routes = Router::new()
        // Content
        .route("/content", get(api::get_content))
        .route("/content/{section}", put(api::update_section))
        // Workflow
        .route("/status", get(api::get_status))
        .route("/save", post(api::save_content))
        .route("/publish", post(api::publish_content))
        .route("/discard", post(api::discard_changes))
        .route("/history", get(api::get_history))
        .route("/published", get(api::get_published_content))
        // Publish configuration
        .route(
            "/config",
            get(api::get_config)
                .put(api::update_config)
                .delete(api::clear_config),
        )
        .route("/config/test", post(api::test_connection))
        // Services, projects, partners
        .route("/{collection}", post(api::add_item))
        .route(
            "/{collection}/{id}",
            put(api::update_item).delete(api::delete_item),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::session_auth_layer,
        ));

    let public_routes = Router::new()
        .route("/site", get(api::get_site_content))
        .route("/session", get(api::get_session))
        .route("/session/login", post(api::login))
        .route("/session/logout", post(api::logout));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api/admin", admin_routes)
        .nest("/api", public_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
