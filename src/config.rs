//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::dao::FailurePolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub cvmap: CvMapConfig,

    #[serde(default)]
    pub dao: DaoConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// ODM2 database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,

    #[serde(default = "default_read_only")]
    pub read_only: bool,
}

fn default_db_path() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("wof-odm2").join("odm2.sqlite").to_string_lossy().to_string())
        .unwrap_or_else(|| "./odm2.sqlite".to_string())
}

fn default_read_only() -> bool {
    true
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            read_only: default_read_only(),
        }
    }
}

/// Controlled vocabulary mapping; the bundled map is used when `path` is unset
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CvMapConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DaoConfig {
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("wof-odm2").join("config.toml")),
            Some(PathBuf::from("/etc/wof-odm2/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `WOF_*` overrides from any key lookup
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("WOF_DB_PATH") {
            self.database.path = path;
        }
        if let Some(path) = lookup("WOF_CVMAP_PATH") {
            self.cvmap.path = Some(path);
        }
        if let Some(policy) = lookup("WOF_FAILURE_POLICY") {
            match policy.parse() {
                Ok(p) => self.dao.failure_policy = p,
                Err(e) => tracing::warn!("Ignoring WOF_FAILURE_POLICY: {}", e),
            }
        }
        if let Some(level) = lookup("WOF_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("WOF_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# wof-odm2 Configuration
#
# Environment variables override these settings:
# - WOF_DB_PATH
# - WOF_CVMAP_PATH
# - WOF_FAILURE_POLICY
# - WOF_LOG_LEVEL
# - WOF_LOG_FORMAT

[database]
# ODM2 SQLite database file
path = "~/.local/share/wof-odm2/odm2.sqlite"

# Open the database read-only (the DAO never writes)
read_only = true

[cvmap]
# WaterML 1.1 <- ODM2 vocabulary mapping (YAML).
# Leave unset to use the mapping bundled with wof-odm2.
# path = "/etc/wof-odm2/cvmap_wml_1_1.yml"

[dao]
# What to do when the database fails mid-request:
# best_effort - log a warning and return an empty result
# strict      - return the error to the caller
failure_policy = "best_effort"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/wof-odm2/wof-odm2.log"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert!(config.database.read_only);
        assert!(config.cvmap.path.is_none());
        assert_eq!(config.dao.failure_policy, FailurePolicy::BestEffort);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[database]\npath = \"/data/odm2.sqlite\"\n\n[dao]\nfailure_policy = \"strict\"\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.database.path, "/data/odm2.sqlite");
        assert!(config.database.read_only);
        assert_eq!(config.dao.failure_policy, FailurePolicy::Strict);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();
        let missing = Config::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));

        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[dao]\nfailure_policy = \"sometimes\"\n").unwrap();
        let bad = Config::load(&path).unwrap_err();
        assert!(matches!(bad, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("WOF_DB_PATH", "/tmp/other.sqlite"),
            ("WOF_CVMAP_PATH", "/tmp/cvmap.yml"),
            ("WOF_FAILURE_POLICY", "strict"),
            ("WOF_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.database.path, "/tmp/other.sqlite");
        assert_eq!(config.cvmap.path.as_deref(), Some("/tmp/cvmap.yml"));
        assert_eq!(config.dao.failure_policy, FailurePolicy::Strict);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_bad_policy_override_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "WOF_FAILURE_POLICY").then(|| "maybe".to_string()));
        assert_eq!(config.dao.failure_policy, FailurePolicy::BestEffort);
    }
}
