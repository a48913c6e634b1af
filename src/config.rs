//! Configuration management for the file server
//!
//! Everything is loaded once at startup into an immutable [`ServerConfig`]
//! that is handed to the components that need it. Sources, later ones
//! overriding earlier ones:
//!
//! 1. built-in defaults
//! 2. optional `config.toml` in the working directory
//! 3. `APP_*` environment variables (`APP_USER`, `APP_PASSWORD_HASH`,
//!    `APP_PORT`, `APP_UPLOAD_DIR`, ...) and `JWT_SECRET`

use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

use crate::auth::Identity;

/// Complete server configuration
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
    /// IP address to bind the HTTP listener
    pub bind_address: String,

    /// Port for the HTTP listener
    pub port: u16,

    /// Directory holding uploaded files
    pub upload_dir: String,

    /// Directory with the browser UI assets
    pub frontend_dir: String,

    /// Request body cap in MiB, applies to uploads
    pub max_upload_mb: u64,

    /// Username allowed to log in
    /// Environment: APP_USER
    #[serde(default)]
    pub user: String,

    /// Argon2 PHC hash of the password
    /// Environment: APP_PASSWORD_HASH
    #[serde(default)]
    pub password_hash: String,

    /// Token signing secret
    /// Environment: JWT_SECRET
    #[serde(default)]
    pub secret: String,
}

impl ServerConfig {
    /// Load configuration from defaults, config.toml and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Self::defaults()?
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("APP").try_parsing(true))
            .add_source(Environment::with_prefix("JWT"))
            .build()?;

        Self::from_settings(settings)
    }

    /// Builder preloaded with the built-in defaults
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("bind_address", "0.0.0.0")?
            .set_default("port", 8080)?
            .set_default("upload_dir", "/app/uploads")?
            .set_default("frontend_dir", "./frontend")?
            .set_default("max_upload_mb", 1024)
    }

    /// Deserialize and validate already-merged settings
    pub fn from_settings(settings: Config) -> Result<Self, ConfigError> {
        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.user.is_empty() || self.password_hash.is_empty() || self.secret.is_empty() {
            return Err(ConfigError::Message(
                "APP_USER, APP_PASSWORD_HASH and JWT_SECRET must be set".into(),
            ));
        }

        if self.port == 0 {
            return Err(ConfigError::Message("port cannot be 0".into()));
        }

        if self.upload_dir.is_empty() {
            return Err(ConfigError::Message("upload_dir cannot be empty".into()));
        }

        if self.max_upload_mb == 0 {
            return Err(ConfigError::Message(
                "max_upload_mb must be greater than 0".into(),
            ));
        }

        self.identity()?;

        Ok(())
    }

    /// The configured login identity
    pub fn identity(&self) -> Result<Identity, ConfigError> {
        Identity::new(&self.user, &self.password_hash)
            .map_err(|e| ConfigError::Message(format!("APP_PASSWORD_HASH: {e}")))
    }

    /// Get bind address and port as socket address string
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn upload_root(&self) -> PathBuf {
        PathBuf::from(&self.upload_dir)
    }

    pub fn frontend_root(&self) -> PathBuf {
        PathBuf::from(&self.frontend_dir)
    }

    /// Get the request body cap in bytes
    pub fn max_upload_bytes(&self) -> usize {
        usize::try_from(self.max_upload_mb.saturating_mul(1024 * 1024)).unwrap_or(usize::MAX)
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_address", &self.bind_address)
            .field("port", &self.port)
            .field("upload_dir", &self.upload_dir)
            .field("frontend_dir", &self.frontend_dir)
            .field("max_upload_mb", &self.max_upload_mb)
            .field("user", &self.user)
            .field("password_hash", &"<redacted>")
            .field("secret", &"<redacted>")
            .finish()
    }
}
