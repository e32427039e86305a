#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use ecoleta_api::config::ServerConfig;
use ecoleta_api::router::build_app_router;
use ecoleta_api::state::AppState;
use ecoleta_core::image_store::LocalImageStore;
use ecoleta_core::types::DbId;

pub const PUBLIC_BASE_URL: &str = "http://images.test";

/// Catalog icons committed at the workspace root.
pub const ASSETS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets/items");

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(uploads_dir: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        storage_timeout_secs: 10,
        uploads_dir: uploads_dir.to_string(),
        assets_dir: ASSETS_DIR.to_string(),
        public_base_url: PUBLIC_BASE_URL.to_string(),
        max_upload_bytes: 1024 * 1024,
        db_max_connections: 5,
        db_acquire_timeout_secs: 5,
    }
}

/// The router plus the temporary uploads directory backing it.
///
/// Keep the whole struct alive for the duration of a test; dropping it
/// removes the directory.
pub struct TestApp {
    pub router: Router,
    pub uploads: TempDir,
}

impl TestApp {
    /// A fresh clone of the router for a single `oneshot` request.
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build the full application router, using the given database pool and a
/// local image store rooted in a temporary directory.
pub fn build_test_app(pool: PgPool) -> TestApp {
    let uploads = tempfile::tempdir().unwrap();
    let uploads_dir = uploads.path().to_str().unwrap().to_string();
    let config = test_config(&uploads_dir);

    let images = LocalImageStore::new(uploads.path(), PUBLIC_BASE_URL)
        .with_max_bytes(config.max_upload_bytes);
    let state = AppState::new(pool, config.clone(), Arc::new(images));

    TestApp {
        router: build_app_router(state, &config),
        uploads,
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_multipart(app: Router, uri: &str, form: MultipartForm) -> Response {
    let request = Request::post(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(form.finish()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected, "unexpected status");
}

// ---------------------------------------------------------------------------
// Multipart bodies
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "ecoleta-test-boundary";

/// Minimal `multipart/form-data` body builder.
#[derive(Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

/// A complete, valid registration form for the given state, city, and items.
pub fn point_form(name: &str, uf: &str, city: &str, items: &[DbId]) -> MultipartForm {
    let items = items
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",");

    MultipartForm::default()
        .text("name", name)
        .text("email", "contato@coleta.org")
        .text("whatsapp", "5535999990000")
        .text("latitude", "-21.7878")
        .text("longitude", "-46.5613")
        .text("city", city)
        .text("uf", uf)
        .text("items", &items)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a catalog item directly and return its id.
pub async fn insert_item(pool: &PgPool, title: &str) -> DbId {
    sqlx::query_scalar("INSERT INTO items (title, image) VALUES ($1, $2) RETURNING id")
        .bind(title)
        .bind(format!("{}.svg", title.to_lowercase()))
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Register a point over HTTP and return its id.
pub async fn create_point(
    test_app: &TestApp,
    name: &str,
    uf: &str,
    city: &str,
    items: &[DbId],
) -> DbId {
    let response = post_multipart(test_app.app(), "/points", point_form(name, uf, city, items)).await;
    assert_status(&response, StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

pub async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}
