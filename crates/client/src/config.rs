//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STARFRUIT_GATEWAY_URL` - Base URL of the backend gateway
//!
//! ## Optional
//! - `STARFRUIT_LOGIN_PATH` - Login route for the application shell
//!   (default: /login)
//! - `STARFRUIT_STORAGE_DIR` - Directory for the JSON storage file; when
//!   unset, callers typically fall back to in-memory storage
//! - `STARFRUIT_CART_KEY` - Storage key for the persisted cart
//!   (default: shopping_cart)
//! - `STARFRUIT_ACCESS_TOKEN_KEY` - Storage key for the access token
//!   (default: access_token)
//! - `STARFRUIT_REFRESH_TOKEN_KEY` - Storage key for the refresh token
//!   (default: refresh_token)

use std::path::{Path, PathBuf};

use thiserror::Error;
use url::Url;

use crate::auth::TokenKeys;
use crate::cart::DEFAULT_CART_KEY;

/// File name of the JSON store inside `STARFRUIT_STORAGE_DIR`.
const STORAGE_FILE_NAME: &str = "starfruit-store.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client SDK configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend gateway.
    pub gateway_url: Url,
    /// Login route the application shell navigates to when a session check
    /// comes back `RequiresLogin`. The SDK itself never navigates.
    pub login_path: String,
    /// Directory holding the JSON storage file, when file-backed storage is
    /// wanted.
    pub storage_dir: Option<PathBuf>,
    /// Storage key for the persisted cart.
    pub cart_key: String,
    /// Storage key names for the credential pair.
    pub token_keys: TokenKeys,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let gateway_url = get_required_env("STARFRUIT_GATEWAY_URL")?
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STARFRUIT_GATEWAY_URL".to_string(), e.to_string())
            })?;
        let login_path = get_env_or_default("STARFRUIT_LOGIN_PATH", "/login");
        let storage_dir = get_optional_env("STARFRUIT_STORAGE_DIR").map(PathBuf::from);
        let cart_key = get_env_or_default("STARFRUIT_CART_KEY", DEFAULT_CART_KEY);
        let token_keys = TokenKeys {
            access: get_env_or_default("STARFRUIT_ACCESS_TOKEN_KEY", "access_token"),
            refresh: get_env_or_default("STARFRUIT_REFRESH_TOKEN_KEY", "refresh_token"),
        };

        Ok(Self {
            gateway_url,
            login_path,
            storage_dir,
            cart_key,
            token_keys,
        })
    }

    /// Path of the JSON storage file, when a storage directory is configured.
    #[must_use]
    pub fn storage_file(&self) -> Option<PathBuf> {
        self.storage_dir
            .as_deref()
            .map(|dir: &Path| dir.join(STORAGE_FILE_NAME))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
