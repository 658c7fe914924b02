//! Centralized configuration for the community desk.
//!
//! All environment variables are loaded and validated at startup to fail fast
//! on misconfiguration rather than halfway through a session.

use std::env;
use std::fmt;
use std::path::PathBuf;

use domain::seed::DEFAULT_COMMUNITY_NAME;

/// Storage backend provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageProvider {
    /// In-memory storage (nothing survives the process)
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

/// How action replies are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    fn from_str(s: &str) -> Self {
        if s.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Configuration error.
#[derive(Debug)]
pub struct ConfigError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration error for {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Desk configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Storage provider (default: sqlite)
    pub storage_provider: StorageProvider,
    /// SQLite database path (default: community.db)
    pub db_path: PathBuf,
    /// Log format
    pub log_format: LogFormat,
    /// Reply format on stdout
    pub output_format: OutputFormat,
    /// Name shown in the banner and recorded with each store session
    pub community_name: String,
}

impl Config {
    /// Load and validate configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage_provider =
            StorageProvider::from_str(&lookup("STORAGE_PROVIDER").unwrap_or_else(|| "sqlite".into()));

        let db_path = lookup("DB_PATH").unwrap_or_else(|| "community.db".into());
        if db_path.trim().is_empty() {
            return Err(ConfigError {
                field: "DB_PATH",
                message: "must not be empty".into(),
            });
        }

        let log_format =
            LogFormat::from_str(&lookup("LOG_FORMAT").unwrap_or_else(|| "pretty".into()));
        let output_format =
            OutputFormat::from_str(&lookup("OUTPUT_FORMAT").unwrap_or_else(|| "text".into()));

        let community_name = match lookup("COMMUNITY_NAME") {
            Some(name) if name.trim().is_empty() => {
                return Err(ConfigError {
                    field: "COMMUNITY_NAME",
                    message: "must not be blank when set".into(),
                })
            }
            Some(name) => name.trim().to_string(),
            None => DEFAULT_COMMUNITY_NAME.to_string(),
        };

        Ok(Self {
            storage_provider,
            db_path: PathBuf::from(db_path),
            log_format,
            output_format,
            community_name,
        })
    }

    /// Log warnings about configurations that lose data.
    pub fn warn_if_ephemeral(&self) {
        if self.storage_provider == StorageProvider::Memory {
            tracing::warn!(
                "STORAGE_PROVIDER=memory: requests and bills are not written to disk."
            );
        }
        #[cfg(not(feature = "sqlite"))]
        if self.storage_provider == StorageProvider::Sqlite {
            tracing::warn!(
                "STORAGE_PROVIDER=sqlite but the `sqlite` feature is disabled; using memory."
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn storage_provider_parsing() {
        assert_eq!(StorageProvider::from_str("memory"), StorageProvider::Memory);
        assert_eq!(StorageProvider::from_str("MEMORY"), StorageProvider::Memory);
        assert_eq!(StorageProvider::from_str("sqlite"), StorageProvider::Sqlite);
        assert_eq!(StorageProvider::from_str("anything"), StorageProvider::Sqlite);
    }

    #[test]
    fn log_and_output_format_parsing() {
        assert_eq!(LogFormat::from_str("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("JSON"), LogFormat::Json);
        assert_eq!(OutputFormat::from_str("json"), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str("anything"), OutputFormat::Text);
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(cfg.storage_provider, StorageProvider::Sqlite);
        assert_eq!(cfg.db_path, PathBuf::from("community.db"));
        assert_eq!(cfg.log_format, LogFormat::Pretty);
        assert_eq!(cfg.output_format, OutputFormat::Text);
        assert_eq!(cfg.community_name, "Green Valley Residency");
    }

    #[test]
    fn explicit_values_override_defaults() {
        let cfg = Config::from_lookup(lookup_from(&[
            ("STORAGE_PROVIDER", "memory"),
            ("DB_PATH", "/tmp/x.db"),
            ("OUTPUT_FORMAT", "json"),
            ("COMMUNITY_NAME", "  Palm Meadows "),
        ]))
        .unwrap();
        assert_eq!(cfg.storage_provider, StorageProvider::Memory);
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/x.db"));
        assert_eq!(cfg.output_format, OutputFormat::Json);
        assert_eq!(cfg.community_name, "Palm Meadows");
    }

    #[test]
    fn blank_values_fail_fast() {
        let err = Config::from_lookup(lookup_from(&[("DB_PATH", " ")])).unwrap_err();
        assert_eq!(err.field, "DB_PATH");
        let err = Config::from_lookup(lookup_from(&[("COMMUNITY_NAME", "")])).unwrap_err();
        assert_eq!(err.field, "COMMUNITY_NAME");
        assert!(err.to_string().starts_with("Configuration error for COMMUNITY_NAME"));
    }
}
