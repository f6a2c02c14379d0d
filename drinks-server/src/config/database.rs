use confique::Config;

/// Configuration for the relational store
#[derive(Debug, Config, Clone)]
pub struct DatabaseConfig {
    /// Connection string (default: sqlite://drinks.db?mode=rwc)
    #[config(env = "DRINKS_DATABASE_URL", default = "sqlite://drinks.db?mode=rwc")]
    pub url: String,

    /// Maximum number of pooled connections (default: 10)
    #[config(env = "DRINKS_DATABASE_MAX_CONNECTIONS", default = 10)]
    pub max_connections: u32,

    /// Drop and recreate the drinks table on startup (default: false)
    #[config(env = "DRINKS_DATABASE_RESET", default = false)]
    pub reset: bool,
}
