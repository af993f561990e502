use std::net::SocketAddr;
use std::path::PathBuf;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;

use notekeeper::config::{Config, Features, RegistrationMode};
use notekeeper::db::Database;

/// A running test server instance with its own data directory.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    /// Cookie-keeping client for the HTML pages.
    pub browser: Client,
    pub data_dir: TempDir,
}

#[allow(dead_code)]
impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn data_file(&self, name: &str) -> PathBuf {
        self.data_dir.path().join(name)
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/v1/auth/register"))
            .json(&json!({ "username": username, "email": email, "password": password }))
            .send()
            .await
            .expect("register request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Login and return the auth response body + status.
    pub async fn login(&self, email: &str, password: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/v1/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("login request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Register a user and return its bearer token.
    pub async fn signup(&self, username: &str, email: &str) -> String {
        let (body, status) = self.register(username, email, "secret1").await;
        assert_eq!(status, StatusCode::OK, "register failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    /// Create a note, return the note JSON.
    pub async fn create_note(&self, token: &str, title: &str, content: &str) -> Value {
        let (note, status) = self
            .post_auth(
                "/api/v1/notes",
                token,
                &json!({ "title": title, "content": content }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create note failed: {note}");
        note
    }

    /// Submit a form to `POST /` with the browser client.
    pub async fn submit(&self, form: &[(&str, &str)]) -> reqwest::Response {
        self.browser
            .post(self.url("/"))
            .form(form)
            .send()
            .await
            .expect("form submit failed")
    }

    /// `GET /` with a query string, using the browser client.
    pub async fn page(&self, query: &str) -> reqwest::Response {
        self.browser
            .get(self.url(&format!("/{query}")))
            .send()
            .await
            .expect("page request failed")
    }

    /// Make an authenticated GET request.
    pub async fn get_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated POST request with JSON body.
    pub async fn post_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated PUT request with JSON body.
    pub async fn put_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("put request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated DELETE request.
    pub async fn delete_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("delete request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

pub fn test_config(data_dir: PathBuf) -> Config {
    Config {
        session_secret: "test-session-secret-that-is-long-enough".to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        base_url: "http://localhost:0".to_string(),
        data_dir,
        registration: RegistrationMode::Open,
        session_ttl_hours: 1,
        secure_cookies: false,
        features: Features::default(),
        seed_demo: false,
        max_body_size: 1_048_576,
        log_level: "warn".to_string(),
        smtp: None,
    }
}

/// Spawn a test app with a fresh data directory.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Spawn a test app after adjusting the default test config.
pub async fn spawn_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    let data_dir = TempDir::new().expect("Failed to create data dir");

    let mut config = test_config(data_dir.path().to_path_buf());
    configure(&mut config);

    let db = Database::open(data_dir.path())
        .await
        .expect("Failed to open data dir");
    let app = notekeeper::build_app(db, config);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();
    let browser = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .cookie_store(true)
        .build()
        .unwrap();

    TestApp {
        addr,
        client,
        browser,
        data_dir,
    }
}

pub fn location(resp: &reqwest::Response) -> &str {
    resp.headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}
