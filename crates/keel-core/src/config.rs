//! Process-wide configuration for keel.
//!
//! Configuration is assembled once at startup and then frozen:
//!
//! 1. built-in defaults
//! 2. an optional TOML file (`--config <path>` or `KEEL_CONFIG`)
//! 3. environment variable overrides (`KEEL_*`)
//! 4. command-line flags (applied by the binary)
//!
//! [`KeelConfig::finalize`] then fills in runtime defaults (generated API key,
//! canonical default working directory) and validates the result. Components
//! receive the finalized value by `Arc` and never read the environment again.
//!
//! # Example
//!
//! ```toml
//! [general]
//! log_level = "info"
//! log_format = "text"
//!
//! [server]
//! bind = "127.0.0.1:8080"
//! max_body_bytes = 67108864
//!
//! [store]
//! database_path = "/var/lib/keel/keel.db"
//! busy_timeout_ms = 5000
//! max_connections = 5
//!
//! [auth]
//! api_key = "change-me"
//!
//! [exec]
//! enabled = true
//! default_working_dir = "/srv"
//! ```

use crate::error::{KeelError, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// Environment variable names
pub const ENV_CONFIG_PATH: &str = "KEEL_CONFIG";
pub const ENV_DB_PATH: &str = "KEEL_DB";
pub const ENV_API_KEY: &str = "KEEL_API_KEY";
pub const ENV_BASE_DIR: &str = "KEEL_BASE_DIR";
pub const ENV_BIND: &str = "KEEL_BIND";
pub const ENV_MAX_BODY_BYTES: &str = "KEEL_MAX_BODY_BYTES";
pub const ENV_LOG_LEVEL: &str = "KEEL_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "KEEL_LOG_FORMAT";
pub const ENV_EXEC_ENABLED: &str = "KEEL_EXEC_ENABLED";

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeelConfig {
    pub general: GeneralConfig,
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub auth: AuthConfig,
    pub exec: ExecConfig,
}

/// General configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error
    pub log_level: String,
    pub log_format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = KeelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(KeelError::config(format!(
                "Invalid log format '{}'. Must be one of: text, json",
                s
            ))),
        }
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// Largest accepted request body; larger requests get 413
    pub max_body_bytes: usize,
}

/// Record store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database file, created when missing
    pub database_path: PathBuf,
    /// How long a writer waits on a locked database before failing
    pub busy_timeout_ms: u64,
    pub max_connections: u32,
}

/// Shared-secret authentication
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Value expected in the `X-API-Key` header
    pub api_key: Option<String>,
}

/// Remote command execution
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecConfig {
    /// Opt-in switch for the exec and build endpoints
    pub enabled: bool,
    /// Working directory for exec requests that name no project
    pub default_working_dir: Option<PathBuf>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            max_body_bytes: 64 * 1024 * 1024,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("keel.db"),
            busy_timeout_ms: 5000,
            max_connections: 5,
        }
    }
}

impl KeelConfig {
    /// Load configuration from an optional file and apply environment overrides.
    ///
    /// Without a path the `KEEL_CONFIG` variable is consulted; without either
    /// the defaults are used.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var(ENV_CONFIG_PATH).ok().map(PathBuf::from);
        let mut config = match path.map(Path::to_path_buf).or(env_path) {
            Some(path) => Self::load_from_path(&path).await?,
            None => {
                debug!("No configuration file given, using defaults");
                Self::default()
            }
        };

        config.merge_env_vars()?;
        Ok(config)
    }

    /// Parse a TOML configuration file without applying any overrides.
    pub async fn load_from_path(path: &Path) -> Result<Self> {
        debug!("Loading configuration from: {}", path.display());

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| KeelError::config(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| KeelError::config(format!("Failed to parse config file: {}", e)))?;

        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a specific path atomically
    pub async fn save_to_path(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    KeelError::config(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| KeelError::config(format!("Failed to serialize config: {}", e)))?;

        // Write to a temp file, then rename
        let temp_path = path.with_extension("toml.tmp");

        tokio::fs::write(&temp_path, content)
            .await
            .map_err(|e| KeelError::config(format!("Failed to write config file: {}", e)))?;

        tokio::fs::rename(&temp_path, path)
            .await
            .map_err(|e| KeelError::config(format!("Failed to rename config file: {}", e)))?;

        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Merge overrides from the process environment
    pub fn merge_env_vars(&mut self) -> Result<()> {
        self.merge_env_from(|key| std::env::var(key).ok())
    }

    /// Merge overrides from an arbitrary variable lookup.
    pub fn merge_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        debug!("Merging environment variable overrides");

        if let Some(log_level) = lookup(ENV_LOG_LEVEL) {
            debug!("Overriding log_level from environment: {}", log_level);
            self.general.log_level = log_level;
        }

        if let Some(log_format) = lookup(ENV_LOG_FORMAT) {
            self.general.log_format = log_format.parse()?;
        }

        if let Some(bind) = lookup(ENV_BIND) {
            debug!("Overriding bind address from environment: {}", bind);
            self.server.bind = bind;
        }

        if let Some(limit) = lookup(ENV_MAX_BODY_BYTES) {
            self.server.max_body_bytes = limit.trim().parse().map_err(|e| {
                KeelError::config(format!(
                    "Invalid byte count '{}' for {}: {}",
                    limit, ENV_MAX_BODY_BYTES, e
                ))
            })?;
        }

        if let Some(db_path) = lookup(ENV_DB_PATH) {
            debug!("Overriding database path from environment: {}", db_path);
            self.store.database_path = PathBuf::from(db_path);
        }

        if let Some(api_key) = lookup(ENV_API_KEY) {
            debug!("Overriding API key from environment");
            self.auth.api_key = Some(api_key);
        }

        if let Some(base_dir) = lookup(ENV_BASE_DIR) {
            debug!("Overriding default working directory from environment: {}", base_dir);
            self.exec.default_working_dir = Some(PathBuf::from(base_dir));
        }

        if let Some(enabled) = lookup(ENV_EXEC_ENABLED) {
            self.exec.enabled = parse_bool(ENV_EXEC_ENABLED, &enabled)?;
        }

        Ok(())
    }

    /// Fill in runtime defaults and validate.
    ///
    /// A missing API key is replaced by a throw-away `dev-<unix-seconds>` key.
    /// The default working directory is canonicalized and falls back to the
    /// current directory.
    pub fn finalize(mut self) -> Result<Self> {
        if self.auth.api_key.is_none() {
            let key = format!("dev-{}", chrono::Utc::now().timestamp());
            warn!("No API key configured, generated a development key; set {} for real use", ENV_API_KEY);
            self.auth.api_key = Some(key);
        }

        let working_dir = match self.exec.default_working_dir.take() {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };
        let working_dir = std::fs::canonicalize(&working_dir).map_err(|e| {
            KeelError::config(format!(
                "Default working directory {} is not usable: {}",
                working_dir.display(),
                e
            ))
        })?;
        if !working_dir.is_dir() {
            return Err(KeelError::config(format!(
                "Default working directory {} is not a directory",
                working_dir.display()
            )));
        }
        self.exec.default_working_dir = Some(working_dir);

        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !VALID_LOG_LEVELS.contains(&self.general.log_level.as_str()) {
            return Err(KeelError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.general.log_level,
                VALID_LOG_LEVELS.join(", ")
            )));
        }

        self.bind_addr()?;

        if self.server.max_body_bytes == 0 {
            return Err(KeelError::config("max_body_bytes must be greater than 0"));
        }

        if self.store.database_path.as_os_str().is_empty() {
            return Err(KeelError::config("database_path must not be empty"));
        }

        if self.store.max_connections == 0 {
            return Err(KeelError::config("max_connections must be greater than 0"));
        }

        if matches!(self.auth.api_key.as_deref(), Some(key) if key.trim().is_empty()) {
            return Err(KeelError::config("api_key must not be blank"));
        }

        debug!("Configuration validation passed");
        Ok(())
    }

    /// Parsed listener address
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server.bind.parse().map_err(|e| {
            KeelError::config(format!("Invalid bind address '{}': {}", self.server.bind, e))
        })
    }

    /// The shared secret; empty until [`KeelConfig::finalize`] has run.
    pub fn api_key(&self) -> &str {
        self.auth.api_key.as_deref().unwrap_or_default()
    }

    /// Working directory for exec requests without a project.
    pub fn default_working_dir(&self) -> &Path {
        self.exec
            .default_working_dir
            .as_deref()
            .unwrap_or_else(|| Path::new("."))
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(KeelError::config(format!(
            "Invalid boolean '{}' for {}",
            other, name
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_validate() {
        let config = KeelConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.exec.enabled);
        assert_eq!(config.store.busy_timeout_ms, 5000);
        assert_eq!(config.bind_addr().unwrap().port(), 8080);
        assert!(config.server.max_body_bytes > 2 * 1024 * 1024);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = KeelConfig::default();
        config
            .merge_env_from(env(&[
                (ENV_DB_PATH, "/tmp/other.db"),
                (ENV_API_KEY, "secret"),
                (ENV_BIND, "0.0.0.0:9000"),
                (ENV_EXEC_ENABLED, "true"),
                (ENV_LOG_FORMAT, "json"),
            ]))
            .unwrap();

        assert_eq!(config.store.database_path, PathBuf::from("/tmp/other.db"));
        assert_eq!(config.api_key(), "secret");
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert!(config.exec.enabled);
        assert_eq!(config.general.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_boolean_rejected() {
        let mut config = KeelConfig::default();
        let err = config
            .merge_env_from(env(&[(ENV_EXEC_ENABLED, "maybe")]))
            .unwrap_err();
        assert!(matches!(err, KeelError::Config(_)));
    }

    #[test]
    fn test_body_limit_override() {
        let mut config = KeelConfig::default();
        config
            .merge_env_from(env(&[(ENV_MAX_BODY_BYTES, "1048576")]))
            .unwrap();
        assert_eq!(config.server.max_body_bytes, 1024 * 1024);

        let err = config
            .merge_env_from(env(&[(ENV_MAX_BODY_BYTES, "lots")]))
            .unwrap_err();
        assert!(matches!(err, KeelError::Config(_)));

        config.server.max_body_bytes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = KeelConfig::default();
        config.general.log_level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_api_key_rejected() {
        let mut config = KeelConfig::default();
        config.auth.api_key = Some("  ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_finalize_generates_dev_key_and_resolves_dir() {
        let dir = TempDir::new().unwrap();
        let mut config = KeelConfig::default();
        config.exec.default_working_dir = Some(dir.path().to_path_buf());

        let config = config.finalize().unwrap();
        assert!(config.api_key().starts_with("dev-"));
        assert_eq!(
            config.default_working_dir(),
            std::fs::canonicalize(dir.path()).unwrap()
        );
    }

    #[test]
    fn test_finalize_rejects_missing_working_dir() {
        let dir = TempDir::new().unwrap();
        let mut config = KeelConfig::default();
        config.exec.default_working_dir = Some(dir.path().join("missing"));
        assert!(config.finalize().is_err());
    }

    #[tokio::test]
    async fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("keel.toml");

        let mut config = KeelConfig::default();
        config.auth.api_key = Some("k".to_string());
        config.exec.enabled = true;
        config.save_to_path(&path).await.unwrap();

        let loaded = KeelConfig::load_from_path(&path).await.unwrap();
        assert_eq!(loaded.api_key(), "k");
        assert!(loaded.exec.enabled);
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[tokio::test]
    async fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("keel.toml");
        tokio::fs::write(&path, "[exec]\nenabled = true\n").await.unwrap();

        let loaded = KeelConfig::load_from_path(&path).await.unwrap();
        assert!(loaded.exec.enabled);
        assert_eq!(loaded.server.bind, "127.0.0.1:8080");
        assert_eq!(loaded.general.log_level, "info");
    }
}
