use super::TokenVerifier;
use crate::errors::ApiError;
use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use log::{debug, warn};
use std::sync::Arc;

/// Route guard requiring one permission in the caller's verified token
#[derive(Clone)]
pub struct PermissionGate {
    verifier: Arc<TokenVerifier>,
    permission: &'static str,
}

impl PermissionGate {
    pub fn new(verifier: Arc<TokenVerifier>, permission: &'static str) -> Self {
        Self {
            verifier,
            permission,
        }
    }

    pub fn permission(&self) -> &'static str {
        self.permission
    }
}

/// Middleware wrapping a single handler with a [`PermissionGate`].
///
/// Verification failures are returned unchanged. On success the verified
/// [`Claims`](super::Claims) are inserted into the request extensions for the
/// wrapped handler.
pub async fn require_permission(
    State(gate): State<PermissionGate>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = gate.verifier.authorize(request.headers()).await?;
    if let Err(e) = claims.require(gate.permission()) {
        warn!(
            "'{}' lacks permission '{}' for {} {}",
            claims.subject(),
            gate.permission(),
            request.method(),
            request.uri().path()
        );
        return Err(e.into());
    }

    debug!(
        "'{}' granted '{}' by {} until {}",
        claims.subject(),
        gate.permission(),
        claims.issuer,
        claims.expires_at
    );
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
