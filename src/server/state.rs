//! Shared application state
//!
//! Built once from the configuration and shared read-only by all handlers.

use config::ConfigError;

use crate::auth::{CredentialVerifier, TokenIssuer};
use crate::config::ServerConfig;
use crate::storage::FileStore;

#[derive(Debug)]
pub struct AppState {
    pub verifier: CredentialVerifier,
    pub tokens: TokenIssuer,
    pub store: FileStore,
}

impl AppState {
    pub fn new(verifier: CredentialVerifier, tokens: TokenIssuer, store: FileStore) -> Self {
        Self {
            verifier,
            tokens,
            store,
        }
    }

    /// Wires the components from a validated configuration
    pub fn from_config(config: &ServerConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            CredentialVerifier::new(config.identity()?),
            TokenIssuer::new(&config.secret),
            FileStore::new(config.upload_root()),
        ))
    }
}
