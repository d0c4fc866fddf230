//! Configuration module for the RSVP store.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;

use crate::errors::RsvpError;

/// Which snapshot backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    /// A single JSON document on disk
    Json,
    /// A single-row SQLite table
    Sqlite,
}

impl StorageKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Some(StorageKind::Json),
            "sqlite" => Some(StorageKind::Sqlite),
            _ => None,
        }
    }
}

/// Which RSVP entries count as "confirmed" when checking an event's capacity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CapacityScope {
    /// Only confirmed entries for the event being checked
    #[default]
    Event,
    /// Confirmed entries across every event in the store
    Global,
}

impl CapacityScope {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "event" => Some(CapacityScope::Event),
            "global" => Some(CapacityScope::Global),
            _ => None,
        }
    }
}

/// Behavioural knobs passed to the store.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreOptions {
    pub capacity_scope: CapacityScope,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the snapshot (JSON file or SQLite database)
    pub data_path: PathBuf,
    /// Snapshot backend
    pub storage: StorageKind,
    /// Capacity counting policy
    pub capacity_scope: CapacityScope,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    pub const DEFAULT_JSON_PATH: &'static str = "./data/rsvps.json";
    pub const DEFAULT_SQLITE_PATH: &'static str = "./data/rsvps.sqlite";

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, RsvpError> {
        dotenvy::dotenv().ok();

        let storage = match env::var("RSVP_STORAGE") {
            Ok(value) => StorageKind::from_str(&value).ok_or_else(|| {
                RsvpError::Config(format!(
                    "Invalid RSVP_STORAGE '{}': expected json or sqlite",
                    value
                ))
            })?,
            Err(_) => StorageKind::Json,
        };

        let data_path = env::var("RSVP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| match storage {
                StorageKind::Json => PathBuf::from(Self::DEFAULT_JSON_PATH),
                StorageKind::Sqlite => PathBuf::from(Self::DEFAULT_SQLITE_PATH),
            });

        let capacity_scope = match env::var("RSVP_CAPACITY_SCOPE") {
            Ok(value) => CapacityScope::from_str(&value).ok_or_else(|| {
                RsvpError::Config(format!(
                    "Invalid RSVP_CAPACITY_SCOPE '{}': expected event or global",
                    value
                ))
            })?,
            Err(_) => CapacityScope::default(),
        };

        let log_level = env::var("RSVP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            data_path,
            storage,
            capacity_scope,
            log_level,
        })
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            capacity_scope: self.capacity_scope,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both cases live in one test so they don't race on the process environment.
    #[test]
    fn test_config_from_env() {
        env::remove_var("RSVP_DATA_PATH");
        env::remove_var("RSVP_STORAGE");
        env::remove_var("RSVP_CAPACITY_SCOPE");
        env::remove_var("RSVP_LOG_LEVEL");

        let config = Config::from_env().unwrap();
        assert_eq!(config.data_path, PathBuf::from("./data/rsvps.json"));
        assert_eq!(config.storage, StorageKind::Json);
        assert_eq!(config.capacity_scope, CapacityScope::Event);
        assert_eq!(config.log_level, "info");

        env::set_var("RSVP_STORAGE", "sqlite");
        env::set_var("RSVP_CAPACITY_SCOPE", "Global");
        let config = Config::from_env().unwrap();
        assert_eq!(config.storage, StorageKind::Sqlite);
        assert_eq!(config.data_path, PathBuf::from("./data/rsvps.sqlite"));
        assert_eq!(config.store_options().capacity_scope, CapacityScope::Global);

        env::set_var("RSVP_CAPACITY_SCOPE", "planet");
        let err = Config::from_env().unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");

        env::remove_var("RSVP_STORAGE");
        env::remove_var("RSVP_CAPACITY_SCOPE");
    }
}
