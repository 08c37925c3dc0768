// ============================================================
// CONFIGURATION
// ============================================================
// Defaults, then scholar-import.toml, then SCHOLAR_IMPORT_* environment

use crate::domain::enrollment::UpdateMode;
use crate::domain::error::Result;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::Validate;

pub const DEFAULT_CONFIG_FILE: &str = "scholar-import.toml";
pub const CONFIG_PATH_ENV: &str = "SCHOLAR_IMPORT_CONFIG";
pub const ENV_PREFIX: &str = "SCHOLAR_IMPORT_";

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    #[validate(nested)]
    pub import: ImportConfig,

    #[validate(nested)]
    pub server: ServerConfig,

    #[validate(nested)]
    pub persistence: PersistenceConfig,
}

/// Limits and parsing options for a single import
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ImportConfig {
    /// Maximum number of data rows per file (default: 10000)
    #[validate(range(min = 1))]
    pub max_rows: usize,

    /// Maximum file size in bytes (default: 5 MiB)
    #[validate(range(min = 1))]
    pub max_file_bytes: u64,

    /// Detect `;`, tab or `|` delimited exports instead of assuming commas
    pub auto_detect_delimiter: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_rows: 10_000,
            max_file_bytes: 5 * 1024 * 1024,
            auto_detect_delimiter: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    #[validate(length(min = 1))]
    pub host: String,

    #[validate(range(min = 1))]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

/// Where validated records are sent
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PersistenceConfig {
    /// Persistence API base URL; uploads are disabled when unset
    #[validate(url)]
    pub base_url: Option<String>,

    pub api_token: Option<String>,

    #[validate(range(min = 1, max = 300))]
    pub timeout_secs: u64,

    pub default_update_mode: UpdateMode,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_token: None,
            timeout_secs: 30,
            default_update_mode: UpdateMode::Merge,
        }
    }
}

impl AppConfig {
    /// Load `.env`, then the config file (explicit path, else
    /// `SCHOLAR_IMPORT_CONFIG`, else `scholar-import.toml`), then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Ok(env_path) = dotenvy::dotenv() {
            debug!(path = %env_path.display(), "loaded .env");
        }
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => std::env::var(CONFIG_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE)),
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config: AppConfig = Self::figment(path).extract()?;
        config.validate()?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Missing files are skipped by figment, leaving defaults in place
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::AppError;
    use figment::Jail;

    #[test]
    fn test_defaults_when_file_missing() {
        Jail::expect_with(|_jail| {
            let config = AppConfig::load_from(Path::new("missing.toml"))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.import.max_rows, 10_000);
            assert_eq!(config.server.port, 3001);
            assert!(config.persistence.base_url.is_none());
            assert_eq!(config.persistence.default_update_mode, UpdateMode::Merge);
            Ok(())
        });
    }

    #[test]
    fn test_file_then_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "scholar-import.toml",
                r#"
                [import]
                max_rows = 500
                auto_detect_delimiter = true

                [persistence]
                base_url = "https://api.example.org/v1"
                default_update_mode = "replace"
                "#,
            )?;
            jail.set_env("SCHOLAR_IMPORT_SERVER__PORT", "9090");

            let config = AppConfig::load_from(Path::new("scholar-import.toml"))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.import.max_rows, 500);
            assert!(config.import.auto_detect_delimiter);
            assert_eq!(config.server.port, 9090);
            assert_eq!(
                config.persistence.base_url.as_deref(),
                Some("https://api.example.org/v1")
            );
            assert_eq!(config.persistence.default_update_mode, UpdateMode::Replace);
            Ok(())
        });
    }

    #[test]
    fn test_config_path_from_env() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[server]\nport = 4100\n")?;
            jail.set_env(CONFIG_PATH_ENV, "custom.toml");

            let config = AppConfig::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.server.port, 4100);

            let explicit = AppConfig::load(Some(Path::new("missing.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(explicit.server.port, 3001);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "scholar-import.toml",
                r#"
                [import]
                max_rows = 0

                [persistence]
                base_url = "not a url"
                "#,
            )?;

            let result = AppConfig::load_from(Path::new("scholar-import.toml"));
            assert!(matches!(result, Err(AppError::ConfigError(_))));
            Ok(())
        });
    }
}
