//! # CLI Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                              │
//! │     --db ./fairbill.db                                                 │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     FAIRBILL_DB_PATH, FAIRBILL_MAX_CONNECTIONS,                        │
//! │     FAIRBILL_CURRENCY_SYMBOL                                           │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/fairbill/fairbill.toml (Linux)                           │
//! │     ~/Library/Application Support/org.fairbill.fairbill/ (macOS)       │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     platform data dir, 5 connections, ₹                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # fairbill.toml
//! [database]
//! path = "/var/lib/fairbill/fairbill.db"
//! max_connections = 5
//!
//! [display]
//! currency_symbol = "₹"
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use fairbill_core::CurrencyFormat;
use fairbill_db::DbConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Name of the config file inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "fairbill.toml";

/// Name of the database file inside the platform data directory.
pub const DB_FILE_NAME: &str = "fairbill.db";

const MAX_SYMBOL_LEN: usize = 8;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Could not determine the application data directory")]
    NoDataDir,
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SQLite file. Falls back to the platform data directory.
    pub path: Option<PathBuf>,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub currency_symbol: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            currency_symbol: CurrencyFormat::DEFAULT_SYMBOL.to_string(),
        }
    }
}

// =============================================================================
// App Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub display: DisplaySettings,
}

impl AppConfig {
    /// Loads configuration from file and environment.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`fairbill.toml`)
    /// 3. Environment variables
    ///
    /// An explicitly given path must exist; the default path is optional.
    pub fn load(config_path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match config_path {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                path => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn from_file(path: &Path) -> ConfigResult<Self> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Applies `FAIRBILL_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("FAIRBILL_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(max) = lookup("FAIRBILL_MAX_CONNECTIONS") {
            match max.parse::<u32>() {
                Ok(max) => self.database.max_connections = max,
                Err(_) => warn!(value = %max, "Ignoring invalid FAIRBILL_MAX_CONNECTIONS"),
            }
        }

        if let Some(symbol) = lookup("FAIRBILL_CURRENCY_SYMBOL") {
            self.display.currency_symbol = symbol;
        }
    }

    /// Applies command-line overrides.
    pub fn apply_flags(&mut self, db_path: Option<PathBuf>) {
        if let Some(path) = db_path {
            self.database.path = Some(path);
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "max_connections must be greater than 0".into(),
            ));
        }

        if let Some(path) = &self.database.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid("database path is empty".into()));
            }
        }

        if self.display.currency_symbol.chars().count() > MAX_SYMBOL_LEN {
            return Err(ConfigError::Invalid(format!(
                "currency_symbol must be at most {} characters",
                MAX_SYMBOL_LEN
            )));
        }

        Ok(())
    }

    // =========================================================================
    // Derived Settings
    // =========================================================================

    /// Resolved database file path.
    pub fn database_path(&self) -> ConfigResult<PathBuf> {
        if let Some(path) = &self.database.path {
            return Ok(path.clone());
        }

        let dirs = project_dirs().ok_or(ConfigError::NoDataDir)?;
        Ok(dirs.data_dir().join(DB_FILE_NAME))
    }

    /// Pool settings for [`fairbill_db::Database::new`].
    pub fn db_config(&self) -> ConfigResult<DbConfig> {
        Ok(DbConfig::new(self.database_path()?).max_connections(self.database.max_connections))
    }

    pub fn currency_format(&self) -> CurrencyFormat {
        CurrencyFormat::new(self.display.currency_symbol.clone())
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "fairbill", "fairbill")
}
