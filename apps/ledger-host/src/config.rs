//! Centralized configuration for the ledger host.
//!
//! All environment variables are loaded and validated at startup to fail fast
//! on misconfiguration rather than on the first gated call.

use std::env;
use std::path::PathBuf;

use domain::Principal;
use thiserror::Error;

/// Storage backend provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageProvider {
    /// In-memory storage (data lost on restart)
    Memory,
    /// SQLite file-based storage
    Sqlite,
}

impl StorageProvider {
    fn from_str(s: &str) -> Self {
        if s.eq_ignore_ascii_case("memory") {
            Self::Memory
        } else {
            Self::Sqlite
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn from_str(s: &str) -> Self {
        if s.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Configuration error.
#[derive(Debug, Error)]
#[error("Configuration error for {field}: {message}")]
pub struct ConfigError {
    pub field: &'static str,
    pub message: String,
}

/// Host configuration loaded from environment variables.
///
/// All fields are validated at construction time.
#[derive(Debug, Clone)]
pub struct Config {
    /// The only principal allowed to define compliance requirements
    pub admin: Principal,
    /// Storage provider (default: sqlite)
    pub storage_provider: StorageProvider,
    /// SQLite database path (default: ./data/ledger.db)
    pub db_path: PathBuf,
    /// Log format
    pub log_format: LogFormat,
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// Fails fast on invalid configuration.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Admin principal (required)
        let admin_raw = lookup("LEDGER_ADMIN_PRINCIPAL").ok_or_else(|| ConfigError {
            field: "LEDGER_ADMIN_PRINCIPAL",
            message: "Required".into(),
        })?;
        let admin = Principal::new(admin_raw).map_err(|e| ConfigError {
            field: "LEDGER_ADMIN_PRINCIPAL",
            message: e.to_string(),
        })?;

        // Storage provider
        let storage_provider = StorageProvider::from_str(
            &lookup("STORAGE_PROVIDER").unwrap_or_else(|| "sqlite".into()),
        );

        // DB path (for sqlite)
        let db_path = lookup("DB_PATH")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data/ledger.db"));

        // Log format
        let log_format =
            LogFormat::from_str(&lookup("LOG_FORMAT").unwrap_or_else(|| "pretty".into()));

        Ok(Self {
            admin,
            storage_provider,
            db_path,
            log_format,
        })
    }

    /// Log warnings about configuration that loses data.
    pub fn warn_if_volatile(&self) {
        if self.storage_provider == StorageProvider::Memory {
            tracing::warn!(
                "STORAGE_PROVIDER=memory: ledger state lives in process memory and is \
                 lost on restart."
            );
        }
    }
}
