pub(crate) mod drinks;
pub(crate) mod health;

use crate::errors::ApiError;
use crate::state::AppState;
use axum::Router;

/// Combines all API routes into a single router
pub(super) fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(drinks::router(state))
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(route_not_found)
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

async fn route_not_found() -> ApiError {
    ApiError::NotFound
}
