pub mod health;
pub mod items;
pub mod points;

use axum::Router;

use crate::state::AppState;

/// Build the public route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                   service + database health
///
/// /items                    list catalog items
///
/// /points                   search (GET), register (POST, multipart)
/// /points/{id}              point detail with item titles
/// ```
///
/// Stored images are served separately under `/uploads` by
/// [`build_app_router`](crate::router::build_app_router).
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/items", items::router())
        .nest("/points", points::router())
}
