use crate::auth::verifier::VerifierError;
use crate::auth::{PermissionGate, TokenVerifier};
use crate::config::Settings;
use crate::store::{DrinkStore, StoreError};
use log::warn;
use std::sync::Arc;
use thiserror::Error;

/// Errors that abort startup
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to open store: {0}")]
    Store(#[from] StoreError),
    #[error("Failed to set up token verification: {0}")]
    Verifier(#[from] VerifierError),
}

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub store: DrinkStore,
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub async fn new(settings: Settings) -> Result<Self, StartupError> {
        let verifier = TokenVerifier::new(&settings.auth)?;
        let store = DrinkStore::connect(&settings.database).await?;
        Ok(Self {
            settings: Arc::new(settings),
            store,
            verifier: Arc::new(verifier),
        })
    }

    /// Guard for a route requiring `permission`
    pub fn gate(&self, permission: &'static str) -> PermissionGate {
        PermissionGate::new(self.verifier.clone(), permission)
    }

    /// Check if the store is reachable
    pub async fn health_check(&self) -> bool {
        match self.store.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!("Store health check failed: {e}");
                false
            }
        }
    }
}
