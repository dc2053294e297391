//! Startup configuration.
//!
//! Read once from the environment and passed explicitly to whatever needs it;
//! nothing here is process-global.

use std::path::PathBuf;

use stockfile_inventory::{Durability, FileBackend, StorageError, Store};
use thiserror::Error;

/// Backing file path variable.
pub const DATA_FILE_ENV: &str = "STOCKFILE_DATA_FILE";
/// Durability policy variable (`every-mutation` or `on-exit`).
pub const DURABILITY_ENV: &str = "STOCKFILE_DURABILITY";

pub const DEFAULT_DATA_FILE: &str = "inventory_data.txt";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("STOCKFILE_DURABILITY must be `every-mutation` or `on-exit`, got `{0}`")]
    InvalidDurability(String),

    #[error("STOCKFILE_DATA_FILE cannot be empty")]
    EmptyDataFile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_file: PathBuf,
    pub durability: Durability,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            durability: Durability::default(),
        }
    }
}

impl Config {
    /// Configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Configuration from an arbitrary variable lookup; unset variables fall
    /// back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = lookup(DATA_FILE_ENV) {
            if path.trim().is_empty() {
                return Err(ConfigError::EmptyDataFile);
            }
            config.data_file = PathBuf::from(path);
        }

        if let Some(value) = lookup(DURABILITY_ENV) {
            config.durability = parse_durability(&value)?;
        }

        Ok(config)
    }

    /// Open the file-backed store this configuration describes.
    pub fn open_store(&self) -> Result<Store<FileBackend>, StorageError> {
        Store::open(FileBackend::new(&self.data_file), self.durability)
    }
}

fn parse_durability(value: &str) -> Result<Durability, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "every-mutation" | "every_mutation" => Ok(Durability::EveryMutation),
        "on-exit" | "on_exit" => Ok(Durability::OnExit),
        _ => Err(ConfigError::InvalidDurability(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.data_file, PathBuf::from("inventory_data.txt"));
        assert_eq!(config.durability, Durability::EveryMutation);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            (DATA_FILE_ENV, "/var/lib/stock.txt"),
            (DURABILITY_ENV, "On-Exit"),
        ]))
        .unwrap();
        assert_eq!(config.data_file, PathBuf::from("/var/lib/stock.txt"));
        assert_eq!(config.durability, Durability::OnExit);
    }

    #[test]
    fn rejects_unknown_durability() {
        let err = Config::from_lookup(lookup(&[(DURABILITY_ENV, "sometimes")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidDurability("sometimes".to_string()));
    }

    #[test]
    fn rejects_blank_data_file() {
        let err = Config::from_lookup(lookup(&[(DATA_FILE_ENV, "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::EmptyDataFile);
    }

    #[test]
    fn open_store_on_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            data_file: dir.path().join("inventory_data.txt"),
            durability: Durability::OnExit,
        };
        let store = config.open_store().unwrap();
        assert!(store.is_empty());
    }
}
