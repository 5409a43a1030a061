use std::net::SocketAddr;
use std::path::PathBuf;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tempfile::TempDir;
use tokio::task::JoinHandle;

use collector::config::Config;

/// A running test server backed by a store file in its own temp directory.
pub struct TestApp {
    pub addr: SocketAddr,
    pub pool: SqlitePool,
    pub client: Client,
    pub dir: TempDir,
    server: JoinHandle<()>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn database_path(&self) -> PathBuf {
        self.dir.path().join("data.db")
    }

    /// POST a JSON body to the collect endpoint, return (body, status).
    pub async fn collect(&self, data: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/collect"))
            .json(data)
            .send()
            .await
            .expect("collect request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// POST raw bytes with an optional content type, return (body, status).
    pub async fn collect_raw(&self, content_type: Option<&str>, body: &'static str) -> (Value, StatusCode) {
        let mut req = self.client.post(self.url("/api/collect")).body(body);
        if let Some(ct) = content_type {
            req = req.header("content-type", ct);
        }
        let resp = req.send().await.expect("collect request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// GET the listing, asserting success.
    pub async fn submissions(&self) -> Vec<Value> {
        let resp = self
            .client
            .get(self.url("/api/submissions"))
            .send()
            .await
            .expect("list request failed");
        assert_eq!(resp.status(), StatusCode::OK, "list non-200");
        resp.json().await.expect("list body was not a JSON array")
    }

    /// GET the CSV export, return (body, status, content-type, content-disposition).
    pub async fn download(&self) -> (String, StatusCode, String, String) {
        let resp = self
            .client
            .get(self.url("/download"))
            .send()
            .await
            .expect("download request failed");
        let status = resp.status();
        let header = |name: &str| {
            resp.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        };
        let content_type = header("content-type");
        let disposition = header("content-disposition");
        let body = resp.text().await.unwrap_or_default();
        (body, status, content_type, disposition)
    }
}

pub fn test_config(dir: &TempDir) -> Config {
    Config {
        database_path: dir.path().join("data.db"),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        max_body_size: 1_048_576,
        log_level: "warn".to_string(),
    }
}

/// Spawn a test app with a fresh store file.
pub async fn spawn_app() -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    spawn_app_in(dir).await
}

/// Spawn a test app over whatever store already exists in `dir`.
pub async fn spawn_app_in(dir: TempDir) -> TestApp {
    let config = test_config(&dir);
    let pool = collector::db::connect(&config)
        .await
        .expect("Failed to open test database");

    let app = collector::build_app(pool.clone(), config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        pool,
        client: Client::new(),
        dir,
        server,
    }
}

/// Stop the server and close the store, handing back the directory so a
/// new instance can be started over the same file.
pub async fn shutdown(app: TestApp) -> TempDir {
    app.server.abort();
    let _ = app.server.await;
    collector::db::close(&app.pool)
        .await
        .expect("Failed to close test database");
    app.dir
}

pub async fn cleanup(app: TestApp) {
    let _ = shutdown(app).await;
}
