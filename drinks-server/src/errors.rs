use crate::auth::AuthError;
use crate::store::StoreError;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::response::IntoResponse;
use axum::Json;
use http::StatusCode;
use log::{debug, error, warn};
use serde_json::json;
use thiserror::Error;

/// Every failure a request can end with.
///
/// Rendered as `{"success": false, "error": <status>, "message": <text>}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request")]
    BadRequest,
    #[error("resource not found")]
    NotFound,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("unprocessable")]
    Unprocessable,
    #[error("unprocessable")]
    Persistence(#[source] StoreError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("internal server error")]
    Internal(String),
}

impl ApiError {
    /// Rejected write; the cause is only logged
    pub fn unprocessable(err: StoreError) -> Self {
        error!("Store rejected the operation: {err}");
        Self::Unprocessable
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Unprocessable | Self::Persistence(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Auth(err) => err.status_code(),
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Persistence(_) => {
                error!("Persistence failure: {err}");
                Self::Persistence(err)
            }
            StoreError::CorruptRecipe { .. } | StoreError::Encoding(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!("Rejected request body: {rejection}");
        Self::BadRequest
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        debug!("Rejected path: {rejection}");
        Self::NotFound
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.status_code();
        match &self {
            Self::Auth(err) => warn!("Authorization failed ({}): {}", err.code(), err),
            Self::Internal(detail) => error!("Internal error: {detail}"),
            _ => {}
        }
        let body = json!({
            "success": false,
            "error": status_code.as_u16(),
            "message": self.to_string(),
        });
        (status_code, Json(body)).into_response()
    }
}
