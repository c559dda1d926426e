//! Daybook configuration management

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main Daybook configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaybookConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Token issuance configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Insight provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Adaptive question configuration
    #[serde(default)]
    pub questions: QuestionsConfig,
}

impl DaybookConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that parse but cannot work
    pub fn validate(&self) -> Result<()> {
        if self.provider.timeout_secs == 0 {
            return Err(Error::Config(
                "provider.timeout_secs must be greater than 0".into(),
            ));
        }
        if self.auth.token_expiry_minutes == 0 {
            return Err(Error::Config(
                "auth.token_expiry_minutes must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed CORS origins (empty = any)
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            cors_origins: vec![
                "http://localhost".to_string(),
                "http://localhost:3000".to_string(),
            ],
        }
    }
}

/// Token issuance configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Environment variable holding the HS256 signing secret
    pub jwt_secret_env: String,

    /// Access token lifetime in minutes
    pub token_expiry_minutes: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret_env: "DAYBOOK_JWT_SECRET".to_string(),
            token_expiry_minutes: 30,
        }
    }
}

impl AuthConfig {
    /// Read the signing secret from the configured environment variable
    pub fn resolve_secret(&self) -> Option<String> {
        std::env::var(&self.jwt_secret_env)
            .ok()
            .filter(|s| !s.is_empty())
    }
}

/// Insight provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of the generative language API
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Upper bound for a single provider call
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-pro".to_string(),
            api_key_env: "GOOGLE_API_KEY".to_string(),
            timeout_secs: 8,
        }
    }
}

impl ProviderConfig {
    /// Resolve the API key from the environment.
    ///
    /// Tries the configured name first, then its UPPER_CASE form.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .or_else(|_| std::env::var(self.api_key_env.to_uppercase()))
            .ok()
            .filter(|k| !k.is_empty())
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_data_dir().join("daybook.db"),
        }
    }
}

/// Adaptive question configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionsConfig {
    /// How many past entries to load when the caller sends none
    pub history_limit: usize,
}

impl Default for QuestionsConfig {
    fn default() -> Self {
        Self { history_limit: 10 }
    }
}

/// Default data directory (~/.daybook/)
pub fn default_data_dir() -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".daybook")
}
