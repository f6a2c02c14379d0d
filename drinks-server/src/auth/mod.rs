//! Bearer token verification against the identity provider's key set and
//! permission enforcement for individual routes.

pub mod gate;
pub mod jwks;
pub mod verifier;

pub use gate::{require_permission, PermissionGate};
pub use verifier::TokenVerifier;

use http::StatusCode;
use serde::Deserialize;
use thiserror::Error;

pub(crate) const UNPARSEABLE_TOKEN: &str = "Unable to parse authentication token.";
pub(crate) const INCORRECT_CLAIMS: &str = "Incorrect claims. Please, check the audience and issuer.";
pub(crate) const MISSING_PERMISSIONS: &str = "Permissions not included in JWT.";

/// Authorization failures, each carrying the status it is reported with
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AuthError {
    #[error("Authorization header is expected.")]
    AuthorizationHeaderMissing,
    #[error("{0}")]
    MalformedHeader(&'static str),
    #[error("Unable to find the appropriate key.")]
    InvalidKeyId,
    #[error("Token expired.")]
    TokenExpired,
    #[error("{0}")]
    InvalidClaims(&'static str),
    #[error("Permission not found.")]
    PermissionNotFound,
}

impl AuthError {
    /// Machine readable error code, used in logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::AuthorizationHeaderMissing => "authorization_header_missing",
            Self::MalformedHeader(_) => "invalid_header",
            Self::InvalidKeyId => "invalid_key_id",
            Self::TokenExpired => "token_expired",
            Self::InvalidClaims(_) => "invalid_claims",
            Self::PermissionNotFound => "unauthorized",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::PermissionNotFound => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

/// The `aud` claim may be a single string or a list
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
enum Audience {
    One(String),
    Many(Vec<String>),
}

/// Token payload as it comes off the wire
#[derive(Debug, Clone, Deserialize)]
struct TokenClaims {
    #[serde(default)]
    sub: Option<String>,
    iss: String,
    aud: Audience,
    exp: u64,
    #[serde(default)]
    permissions: Option<Vec<String>>,
}

/// Verified claims of the current request's bearer token
#[derive(Debug, Clone, PartialEq)]
pub struct Claims {
    pub subject: Option<String>,
    pub issuer: String,
    pub audience: Vec<String>,
    pub expires_at: u64,
    pub permissions: Vec<String>,
}

impl Claims {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    pub fn require(&self, permission: &str) -> Result<(), AuthError> {
        if self.has_permission(permission) {
            Ok(())
        } else {
            Err(AuthError::PermissionNotFound)
        }
    }

    /// Subject for log lines
    pub fn subject(&self) -> &str {
        self.subject.as_deref().unwrap_or("<unknown>")
    }
}

impl TryFrom<TokenClaims> for Claims {
    type Error = AuthError;

    fn try_from(claims: TokenClaims) -> Result<Self, Self::Error> {
        let permissions = claims
            .permissions
            .ok_or(AuthError::InvalidClaims(MISSING_PERMISSIONS))?;
        let audience = match claims.aud {
            Audience::One(aud) => vec![aud],
            Audience::Many(aud) => aud,
        };
        Ok(Self {
            subject: claims.sub,
            issuer: claims.iss,
            audience,
            expires_at: claims.exp,
            permissions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token_claims(value: serde_json::Value) -> TokenClaims {
        serde_json::from_value(value).expect("Failed to parse claims")
    }

    #[test]
    fn test_claims_require_permissions_claim() {
        let claims = token_claims(json!({
            "sub": "auth0|barista",
            "iss": "https://tenant.eu.auth0.com/",
            "aud": "drinks",
            "exp": 1
        }));
        assert_eq!(
            Claims::try_from(claims),
            Err(AuthError::InvalidClaims(MISSING_PERMISSIONS))
        );
    }

    #[test]
    fn test_claims_accept_audience_list() {
        let claims = token_claims(json!({
            "iss": "https://tenant.eu.auth0.com/",
            "aud": ["drinks", "https://tenant.eu.auth0.com/userinfo"],
            "exp": 1,
            "permissions": ["get:drinks-detail"]
        }));
        let claims = Claims::try_from(claims).unwrap();
        assert_eq!(claims.audience.len(), 2);
        assert_eq!(claims.subject(), "<unknown>");
        assert!(claims.has_permission("get:drinks-detail"));
    }

    #[test]
    fn test_require_missing_permission() {
        let claims = Claims {
            subject: Some("auth0|barista".to_string()),
            issuer: "https://tenant.eu.auth0.com/".to_string(),
            audience: vec!["drinks".to_string()],
            expires_at: 1,
            permissions: vec!["get:drinks-detail".to_string()],
        };
        assert!(claims.require("get:drinks-detail").is_ok());
        assert_eq!(
            claims.require("delete:drinks"),
            Err(AuthError::PermissionNotFound)
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AuthError::PermissionNotFound.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AuthError::TokenExpired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::MalformedHeader("Token not found.").to_string(),
            "Token not found."
        );
    }
}
