//! Application services held in [`AppState`](crate::state::AppState).
//!
//! Each service owns its injected dependencies (pool, image store, storage
//! timeout) and returns the typed DTOs its endpoints serialize.

pub mod catalog;
pub mod registry;
pub mod search;

use std::future::Future;
use std::time::Duration;

use ecoleta_core::error::CoreError;

use crate::error::{AppError, AppResult};

pub use catalog::Catalog;
pub use registry::PointRegistry;
pub use search::SearchEngine;

/// Run one storage call, failing with a retryable [`CoreError::Storage`]
/// if it does not finish within `limit`.
pub(crate) async fn bounded<T, E, F>(limit: Duration, operation: &'static str, fut: F) -> AppResult<T>
where
    F: Future<Output = Result<T, E>>,
    AppError: From<E>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(AppError::from),
        Err(_) => {
            tracing::warn!(operation, timeout_secs = limit.as_secs(), "Storage call timed out");
            Err(CoreError::Storage(format!("{operation} timed out")).into())
        }
    }
}
