//! Integration tests for the content backend.


use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use url::Url;

use crate::config::Config;
use crate::dashboard::{Dashboard, EditorState, PublishSettings};
use crate::db::{init_database, ContentStore, CONTENT_KEY};
use crate::models::ContentRecord;
use crate::publish::parse_content_file;
use crate::{auth, create_router, AppState};

use github_mock::{MockGitHub, VALID_TOKEN};

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    state: AppState,
    github: MockGitHub,
    _temp_dir: TempDir,
}

fn test_config(db_path: std::path::PathBuf, github_url: &str) -> Config {
    Config {
        db_path,
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        log_level: "warn".to_string(),
        github_api_url: Url::parse(github_url).unwrap(),
        admin_username: "admin".to_string(),
        admin_password: "tayyar2024".to_string(),
        history_limit: 5,
        http_timeout: Duration::from_secs(5),
    }
}

async fn build_state(temp_dir: &TempDir, github_url: &str) -> AppState {
    let db_path = temp_dir.path().join("cms.sqlite");
    let pool = init_database(&db_path).await.expect("Failed to init DB");
    let store = ContentStore::new(pool);
    let config = test_config(db_path, github_url);
    let dashboard = Dashboard::open(store.clone(), PublishSettings::from(&config)).await;

    AppState {
        store,
        dashboard: Arc::new(dashboard),
        config: Arc::new(config),
    }
}

impl TestFixture {
    async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let (github, github_url) = MockGitHub::spawn().await;
        let state = build_state(&temp_dir, &github_url).await;

        let app = create_router(state.clone());

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(Duration::from_millis(100)).await;

        TestFixture {
            client: Client::new(),
            base_url,
            state,
            github,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Log in and return a client that presents the session token.
    async fn admin(&self) -> Client {
        let resp = self
            .client
            .post(self.url("/api/session/login"))
            .json(&json!({ "username": "admin", "password": "tayyar2024" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        let token = body["data"]["token"].as_str().unwrap().to_string();

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(auth::SESSION_HEADER, token.parse().unwrap());
        Client::builder().default_headers(headers).build().unwrap()
    }

    async fn configure(&self, admin: &Client, token: &str) -> reqwest::Response {
        admin
            .put(self.url("/api/admin/config"))
            .json(&json!({
                "githubToken": token,
                "githubOwner": "tayyar",
                "githubRepo": "website",
                "branch": "main"
            }))
            .send()
            .await
            .unwrap()
    }

    async fn get_json(&self, client: &Client, path: &str) -> Value {
        client
            .get(self.url(path))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_public_site_serves_default_content() {
    let fixture = TestFixture::new().await;

    let body = fixture.get_json(&fixture.client, "/api/site").await;
    assert_eq!(body["success"], true);
    assert_eq!(body["state"], "clean");
    assert_eq!(body["data"]["company"]["name"], "Tayyar Electricals");
    assert_eq!(body["data"]["contact"]["businessHours"], "Mon-Fri: 7AM-6PM");
    assert_eq!(body["data"]["projects"][0]["status"], "Completed");
}

#[tokio::test]
async fn test_admin_requires_session() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/admin/content"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let resp = fixture
        .client
        .get(fixture.url("/api/admin/content"))
        .header(auth::SESSION_HEADER, "made-up-token")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_login_rejects_wrong_credentials() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/session/login"))
        .json(&json!({ "username": "admin", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    assert!(fixture.state.store.load_session().await.is_none());
}

#[tokio::test]
async fn test_login_logout_cycle() {
    let fixture = TestFixture::new().await;
    let admin = fixture.admin().await;

    let body = fixture.get_json(&admin, "/api/session").await;
    assert_eq!(body["data"]["authenticated"], true);

    let resp = admin
        .get(fixture.url("/api/admin/content"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = admin
        .post(fixture.url("/api/session/logout"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = admin
        .get(fixture.url("/api/admin/content"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    let body = fixture.get_json(&admin, "/api/session").await;
    assert_eq!(body["data"]["authenticated"], false);
}

#[tokio::test]
async fn test_session_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let state = build_state(&temp_dir, "http://127.0.0.1:9").await;
    state.store.save_session("persisted-token").await.unwrap();

    // A second process over the same database sees the same session.
    let reopened = build_state(&temp_dir, "http://127.0.0.1:9").await;
    let app = create_router(reopened);

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/status")
                .header(auth::SESSION_HEADER, "persisted-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/admin/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_credentials_match() {
    let config = test_config("./unused.sqlite".into(), "https://api.github.com");
    assert!(auth::credentials_match(&config, "admin", "tayyar2024"));
    assert!(!auth::credentials_match(&config, "admin", "tayyar2025"));
    assert!(!auth::credentials_match(&config, "root", "tayyar2024"));
}

#[tokio::test]
async fn test_edit_save_and_load() {
    let fixture = TestFixture::new().await;
    let admin = fixture.admin().await;

    let resp = admin
        .put(fixture.url("/api/admin/content/contact"))
        .json(&json!({ "phone": "+254 700 000000" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["phone"], "+254 700 000000");
    assert_eq!(body["state"], "dirty");

    // Not yet visible on the public site.
    let site = fixture.get_json(&fixture.client, "/api/site").await;
    assert_eq!(site["data"]["contact"]["phone"], "+254 727 381169");

    let resp = admin
        .post(fixture.url("/api/admin/save"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["saved"], true);
    assert_eq!(body["state"], "clean");

    let loaded = fixture.state.store.load().await;
    assert_eq!(loaded.contact.phone, "+254 700 000000");
    assert_eq!(loaded, fixture.state.dashboard.content().await);

    // Saving again is a no-op.
    let body: Value = admin
        .post(fixture.url("/api/admin/save"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["saved"], false);
}

#[tokio::test]
async fn test_malformed_requests_use_error_envelope() {
    let fixture = TestFixture::new().await;
    let admin = fixture.admin().await;

    let resp = admin
        .put(fixture.url("/api/admin/content/hero"))
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert_eq!(body["state"], "clean");

    let resp = admin
        .post(fixture.url("/api/admin/widgets"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let resp = admin
        .put(fixture.url("/api/admin/content/footer"))
        .json(&json!({ "title": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);

    let resp = fixture
        .client
        .post(fixture.url("/api/session/login"))
        .json(&json!({ "username": "admin" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    // Nothing was applied.
    assert_eq!(fixture.state.dashboard.state().await, EditorState::Clean);
}

#[tokio::test]
async fn test_item_ids_are_generated_and_stable() {
    let fixture = TestFixture::new().await;
    let admin = fixture.admin().await;

    let first: Value = admin
        .post(fixture.url("/api/admin/services"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let second: Value = admin
        .post(fixture.url("/api/admin/services"))
        .json(&json!({ "title": "Solar PV", "color": "yellow" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let first_id = first["data"]["id"].as_str().unwrap().to_string();
    let second_id = second["data"]["id"].as_str().unwrap().to_string();
    assert!(!first_id.is_empty());
    assert!(!second_id.is_empty());
    assert_ne!(first_id, second_id);
    assert_eq!(second["data"]["color"], "yellow");

    let updated: Value = admin
        .put(fixture.url(&format!("/api/admin/services/{}", first_id)))
        .json(&json!({ "id": "hijacked", "title": "Generator Installation", "color": "teal" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["data"]["id"], first_id.as_str());
    assert_eq!(updated["data"]["color"], "blue");

    let content = fixture.state.dashboard.content().await;
    assert_eq!(content.services.len(), 6);
    assert!(content.services.iter().any(|s| s.id == first_id));

    let resp = admin
        .delete(fixture.url(&format!("/api/admin/services/{}", second_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = admin
        .delete(fixture.url(&format!("/api/admin/services/{}", second_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_publish_without_config_is_rejected() {
    let fixture = TestFixture::new().await;
    let admin = fixture.admin().await;

    admin
        .put(fixture.url("/api/admin/content/hero"))
        .json(&json!({ "title": "Power for Nairobi" }))
        .send()
        .await
        .unwrap();

    let resp = admin
        .post(fixture.url("/api/admin/publish"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 412);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "NOT_CONFIGURED");
    assert_eq!(body["state"], "dirty");

    // Nothing was saved as a side effect.
    assert_eq!(fixture.state.store.load().await, ContentRecord::default());
    assert!(fixture.github.puts().is_empty());
}

#[tokio::test]
async fn test_publish_creates_then_updates_file() {
    let fixture = TestFixture::new().await;
    let admin = fixture.admin().await;

    let resp = fixture.configure(&admin, VALID_TOKEN).await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["hasToken"], true);
    assert!(body["data"].get("githubToken").is_none());

    admin
        .put(fixture.url("/api/admin/content/hero"))
        .json(&json!({ "title": "Power for Nairobi" }))
        .send()
        .await
        .unwrap();

    // First publish: the file does not exist yet.
    let resp = admin
        .post(fixture.url("/api/admin/publish"))
        .json(&json!({ "message": "Initial content" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["state"], "clean");
    assert_eq!(body["data"]["history"][0]["message"], "Initial content");
    assert_eq!(body["data"]["history"][0]["sha"].as_str().unwrap().len(), 7);

    let puts = fixture.github.puts();
    assert_eq!(puts.len(), 1);
    assert!(puts[0].get("sha").is_none());
    assert_eq!(puts[0]["branch"], "main");

    // The committed file parses back into the working copy.
    let text = fixture.github.file_text().unwrap();
    let working = fixture.state.dashboard.content().await;
    assert_eq!(parse_content_file(&text).unwrap(), working);
    assert_eq!(fixture.state.store.load().await, working);

    // Second publish sends the previous revision.
    let first_sha = fixture.github.file_sha().unwrap();
    admin
        .put(fixture.url("/api/admin/content/company"))
        .json(&json!({ "tagline": "Powering East Africa" }))
        .send()
        .await
        .unwrap();
    let resp = admin
        .post(fixture.url("/api/admin/publish"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let puts = fixture.github.puts();
    assert_eq!(puts.len(), 2);
    assert_eq!(puts[1]["sha"], first_sha.as_str());
    assert_eq!(puts[1]["message"], "Update site content via CMS Admin Panel");

    let history = fixture.get_json(&admin, "/api/admin/history").await;
    let history = history["data"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["message"], "Update site content via CMS Admin Panel");
    assert_eq!(history[0]["author"], "Tayyar Admin");

    let limited = fixture.get_json(&admin, "/api/admin/history?limit=1").await;
    assert_eq!(limited["data"].as_array().unwrap().len(), 1);

    // The remote copy reads back through base64.
    let published = fixture.get_json(&admin, "/api/admin/published").await;
    assert_eq!(published["data"]["company"]["tagline"], "Powering East Africa");
}

#[tokio::test]
async fn test_publish_over_directory_omits_sha() {
    let fixture = TestFixture::new().await;
    let admin = fixture.admin().await;
    fixture.github.make_directory();
    fixture.configure(&admin, VALID_TOKEN).await;

    let resp = admin
        .post(fixture.url("/api/admin/publish"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let puts = fixture.github.puts();
    assert_eq!(puts.len(), 1);
    assert!(puts[0].get("sha").is_none());
}

#[tokio::test]
async fn test_failed_publish_keeps_edits() {
    let fixture = TestFixture::new().await;
    let admin = fixture.admin().await;
    fixture.configure(&admin, VALID_TOKEN).await;
    fixture.github.fail_commits(true);

    admin
        .put(fixture.url("/api/admin/content/contact"))
        .json(&json!({ "email": "projects@tayyarelectricals.com" }))
        .send()
        .await
        .unwrap();

    let resp = admin
        .post(fixture.url("/api/admin/publish"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 502);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "PUBLISH_ERROR");
    assert_eq!(body["state"], "dirty");

    // Working copy and local save both survive.
    let working = fixture.state.dashboard.content().await;
    assert_eq!(working.contact.email, "projects@tayyarelectricals.com");
    assert_eq!(fixture.state.store.load().await, working);
    assert!(fixture.github.file_text().is_none());

    // A retry after the remote recovers goes through.
    fixture.github.fail_commits(false);
    let resp = admin
        .post(fixture.url("/api/admin/publish"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_publish_in_flight_blocks_conflicting_actions() {
    let fixture = TestFixture::new().await;
    let admin = fixture.admin().await;
    fixture.configure(&admin, VALID_TOKEN).await;

    admin
        .put(fixture.url("/api/admin/content/hero"))
        .json(&json!({ "title": "Power for Nairobi" }))
        .send()
        .await
        .unwrap();

    fixture.github.delay_reads(Duration::from_millis(600));
    let dashboard = fixture.state.dashboard.clone();
    let in_flight = tokio::spawn(async move { dashboard.publish(None).await });

    // Let the publish reach the remote read.
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(fixture.state.dashboard.state().await, EditorState::Publishing);

    let resp = admin
        .post(fixture.url("/api/admin/publish"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "CONFLICT");
    assert_eq!(body["state"], "publishing");

    let resp = admin
        .post(fixture.url("/api/admin/save"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);

    let resp = admin
        .delete(fixture.url("/api/admin/config"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
    assert!(fixture.state.store.load_config().await.is_some());

    // Edits are still accepted mid-flight.
    let resp = admin
        .put(fixture.url("/api/admin/content/contact"))
        .json(&json!({ "phone": "+254 700 000000" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["state"], "publishing");

    in_flight.await.unwrap().unwrap();

    // The commit carried the snapshot; the later edit is still unsaved.
    assert_eq!(fixture.state.dashboard.state().await, EditorState::Dirty);
    let committed = parse_content_file(&fixture.github.file_text().unwrap()).unwrap();
    assert_eq!(committed.hero.title, "Power for Nairobi");
    assert_eq!(committed.contact.phone, "+254 727 381169");
    assert_eq!(fixture.github.puts().len(), 1);
}

#[tokio::test]
async fn test_connection_test_reports_false_for_bad_token() {
    let fixture = TestFixture::new().await;
    let admin = fixture.admin().await;

    let resp = admin
        .post(fixture.url("/api/admin/config/test"))
        .json(&json!({
            "githubToken": "ghp_invalid",
            "githubOwner": "tayyar",
            "githubRepo": "website",
            "branch": "main"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["connected"], false);

    let body: Value = admin
        .post(fixture.url("/api/admin/config/test"))
        .json(&json!({
            "githubToken": VALID_TOKEN,
            "githubOwner": "tayyar",
            "githubRepo": "website"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["connected"], true);

    // Without a candidate and without a saved config there is nothing to test.
    let resp = admin
        .post(fixture.url("/api/admin/config/test"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 412);
}

#[tokio::test]
async fn test_history_degrades_to_empty_with_bad_token() {
    let fixture = TestFixture::new().await;
    let admin = fixture.admin().await;

    let resp = fixture.configure(&admin, "ghp_revoked").await;
    assert_eq!(resp.status(), 200);

    let body = fixture.get_json(&admin, "/api/admin/history").await;
    assert_eq!(body["success"], true);
    assert!(body["data"].as_array().unwrap().is_empty());

    let status = fixture.get_json(&admin, "/api/admin/status").await;
    assert_eq!(status["data"]["publishingEnabled"], true);

    // The write path does surface the failure.
    let resp = admin
        .post(fixture.url("/api/admin/publish"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 502);
}

#[tokio::test]
async fn test_clear_all_resets_store() {
    let fixture = TestFixture::new().await;
    let admin = fixture.admin().await;
    fixture.configure(&admin, VALID_TOKEN).await;

    admin
        .put(fixture.url("/api/admin/content/hero"))
        .json(&json!({ "subtitle": "Tayyar Electricals Limited" }))
        .send()
        .await
        .unwrap();
    admin
        .post(fixture.url("/api/admin/save"))
        .send()
        .await
        .unwrap();

    let resp = admin
        .delete(fixture.url("/api/admin/config"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    assert_eq!(fixture.state.store.load().await, ContentRecord::default());
    assert!(fixture.state.store.load_config().await.is_none());

    let config = fixture.get_json(&admin, "/api/admin/config").await;
    assert!(config["data"].is_null());

    let status = fixture.get_json(&admin, "/api/admin/status").await;
    assert_eq!(status["data"]["publishingEnabled"], false);
    assert_eq!(status["data"]["state"], "dirty");

    // Clearing twice is harmless, and the admin stays logged in.
    let resp = admin
        .delete(fixture.url("/api/admin/config"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_corrupt_store_serves_default() {
    let fixture = TestFixture::new().await;
    fixture.state.store.put_raw(CONTENT_KEY, "{\"hero\": ").await;

    let body = fixture.get_json(&fixture.client, "/api/site").await;
    assert_eq!(body["success"], true);
    assert_eq!(
        serde_json::from_value::<ContentRecord>(body["data"].clone()).unwrap(),
        ContentRecord::default()
    );
}

#[tokio::test]
async fn test_config_is_restored_on_startup() {
    let temp_dir = TempDir::new().unwrap();
    let (github, github_url) = MockGitHub::spawn().await;

    let state = build_state(&temp_dir, &github_url).await;
    state
        .dashboard
        .update_config(crate::models::PublishConfig {
            github_token: VALID_TOKEN.to_string(),
            github_owner: "tayyar".to_string(),
            github_repo: "website".to_string(),
            branch: String::new(),
        })
        .await
        .unwrap();
    state.dashboard.publish(None).await.unwrap();
    assert_eq!(github.puts().len(), 1);

    let reopened = build_state(&temp_dir, &github_url).await;
    let status = reopened.dashboard.status().await;
    assert!(status.publishing_enabled);
    assert_eq!(status.history.len(), 1);
    assert_eq!(
        reopened.dashboard.config_view().await.unwrap().branch,
        "main"
    );
}
