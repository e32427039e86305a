use axum::extract::State;
use axum::Json;

use crate::error::AppResult;
use crate::services::catalog::ItemView;
use crate::state::AppState;

/// GET /items
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<ItemView>>> {
    let items = state.catalog.list_items().await?;
    Ok(Json(items))
}
