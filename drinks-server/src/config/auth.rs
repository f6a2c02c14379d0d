//! Identity provider configuration

use confique::Config;
use jsonwebtoken::Algorithm;
use std::str::FromStr;

/// Identity provider configuration used to verify bearer tokens
#[derive(Debug, Config, Clone)]
pub struct AuthConfig {
    /// Identity provider domain, e.g. `tenant.eu.auth0.com`
    #[config(env = "DRINKS_AUTH_DOMAIN")]
    pub domain: String,

    /// API identifier expected in the `aud` claim
    #[config(env = "DRINKS_AUTH_AUDIENCE")]
    pub audience: String,

    /// Signing algorithm identifier (default: RS256)
    #[config(env = "DRINKS_AUTH_ALGORITHM", default = "RS256")]
    pub algorithm: String,

    /// Expected `iss` claim (default: https://<domain>/)
    #[config(env = "DRINKS_AUTH_ISSUER")]
    pub issuer: Option<String>,

    /// Key set location (default: https://<domain>/.well-known/jwks.json)
    #[config(env = "DRINKS_AUTH_JWKS_URL")]
    pub jwks_url: Option<String>,

    /// Timeout for key set fetches in seconds (default: 5)
    #[config(env = "DRINKS_AUTH_JWKS_TIMEOUT", default = 5)]
    pub jwks_timeout: u64,
}

impl AuthConfig {
    pub fn issuer(&self) -> String {
        self.issuer
            .clone()
            .unwrap_or_else(|| format!("https://{}/", self.domain))
    }

    pub fn jwks_url(&self) -> String {
        self.jwks_url
            .clone()
            .unwrap_or_else(|| format!("https://{}/.well-known/jwks.json", self.domain))
    }

    /// Parse the configured algorithm identifier
    pub fn algorithm(&self) -> Result<Algorithm, jsonwebtoken::errors::Error> {
        Algorithm::from_str(&self.algorithm)
    }
}
