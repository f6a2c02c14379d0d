use confique::Config;

pub(crate) use crate::config::auth::AuthConfig;
pub(crate) use crate::config::database::DatabaseConfig;

pub mod auth;
pub mod database;

/// Main configuration structure for the drinks server
#[derive(Debug, Config, Clone)]
pub struct Settings {
    /// The port the server will listen to (default: 5000)
    #[config(env = "DRINKS_PORT", default = 5000)]
    pub port: u16,

    /// Relational store configuration
    #[config(nested)]
    pub database: DatabaseConfig,

    /// Identity provider configuration
    #[config(nested)]
    pub auth: AuthConfig,
}

impl Settings {
    /// Creates a new Settings instance from environment variables
    pub fn new() -> Result<Self, confique::Error> {
        Self::builder().env().load()
    }

    #[cfg(test)]
    pub fn for_test_with_mocks(jwks_mock: &wiremock::MockServer) -> Self {
        Self {
            port: 0, // Let the OS choose a port
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                // every sqlite memory connection is a separate database
                max_connections: 1,
                reset: false,
            },
            auth: AuthConfig {
                domain: "drinks-test.example.com".to_string(),
                audience: "drinks".to_string(),
                algorithm: "RS256".to_string(),
                issuer: None,
                jwks_url: Some(format!("{}/.well-known/jwks.json", jwks_mock.uri())),
                jwks_timeout: 2,
            },
        }
    }
}
