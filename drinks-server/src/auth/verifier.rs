use super::jwks::JwksClient;
use super::{AuthError, Claims, TokenClaims, INCORRECT_CLAIMS, UNPARSEABLE_TOKEN};
use crate::config::AuthConfig;
use http::header::AUTHORIZATION;
use http::HeaderMap;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, DecodingKey, Validation};
use log::warn;
use thiserror::Error;

/// Errors that prevent the verifier from being constructed
#[derive(Debug, Error)]
pub enum VerifierError {
    #[error("Unsupported signing algorithm: {0}")]
    Algorithm(#[from] jsonwebtoken::errors::Error),
    #[error("Failed to create key set client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::AuthorizationHeaderMissing)?;
    let header = header
        .to_str()
        .map_err(|_| AuthError::MalformedHeader("Authorization header must be bearer token."))?;

    let mut parts = header.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), _, _) if !scheme.eq_ignore_ascii_case("bearer") => Err(
            AuthError::MalformedHeader("Authorization header must start with \"Bearer\"."),
        ),
        (Some(_), None, _) => Err(AuthError::MalformedHeader("Token not found.")),
        (Some(_), Some(token), None) => Ok(token),
        _ => Err(AuthError::MalformedHeader(
            "Authorization header must be bearer token.",
        )),
    }
}

/// Verifies bearer tokens issued by the configured identity provider
pub struct TokenVerifier {
    jwks: JwksClient,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Result<Self, VerifierError> {
        let mut validation = Validation::new(config.algorithm()?);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_issuer(&[config.issuer()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);

        Ok(Self {
            jwks: JwksClient::new(config.jwks_url(), config.jwks_timeout)?,
            validation,
        })
    }

    /// Verify the bearer token carried by the request headers
    pub async fn authorize(&self, headers: &HeaderMap) -> Result<Claims, AuthError> {
        let token = bearer_token(headers)?;
        self.verify(token).await
    }

    /// Check the token signature against the published key set, validate
    /// expiry, audience and issuer, then extract the permissions claim
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token).map_err(|e| {
            warn!("Failed to decode token header: {e}");
            AuthError::InvalidClaims(UNPARSEABLE_TOKEN)
        })?;
        let kid = header.kid.ok_or(AuthError::InvalidKeyId)?;

        let keys = self.jwks.fetch().await.map_err(|e| {
            warn!("Key set from {} unavailable: {e}", self.jwks.url());
            AuthError::InvalidKeyId
        })?;
        let jwk = keys.find(&kid).ok_or_else(|| {
            warn!("No key with id '{kid}' in key set");
            AuthError::InvalidKeyId
        })?;
        let key = DecodingKey::from_jwk(jwk).map_err(|e| {
            warn!("Key '{kid}' is not usable for verification: {e}");
            AuthError::InvalidKeyId
        })?;

        let data = decode::<TokenClaims>(token, &key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => {
                    AuthError::InvalidClaims(INCORRECT_CLAIMS)
                }
                _ => {
                    warn!("Token rejected: {e}");
                    AuthError::InvalidClaims(UNPARSEABLE_TOKEN)
                }
            }
        })?;

        Claims::try_from(data.claims)
    }
}
