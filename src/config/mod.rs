use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    errors::{LedgerError, Result},
    storage::{write_atomic, CsvStore, JsonStore, TransactionStore},
    utils::paths,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageFormat {
    #[default]
    Csv,
    Json,
}

/// User preferences persisted as JSON under the application data directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    #[serde(default)]
    pub storage_format: StorageFormat,
    #[serde(default = "Config::default_autosave")]
    pub autosave: bool,
    /// Display-only prefix for amounts; the ledger itself is currency agnostic.
    #[serde(default)]
    pub currency_symbol: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: None,
            storage_format: StorageFormat::default(),
            autosave: Self::default_autosave(),
            currency_symbol: String::new(),
        }
    }
}

impl Config {
    fn default_autosave() -> bool {
        true
    }

    /// Data file to use, falling back to the per-format default under `base`.
    pub fn resolve_data_file(&self, base: &Path) -> PathBuf {
        match (&self.data_file, self.storage_format) {
            (Some(path), _) => path.clone(),
            (None, StorageFormat::Csv) => paths::csv_data_file_in(base),
            (None, StorageFormat::Json) => paths::json_data_file_in(base),
        }
    }

    /// Builds the persistence collaborator, or `None` when autosave is off.
    pub fn store(&self, base: &Path) -> Option<Box<dyn TransactionStore>> {
        if !self.autosave {
            return None;
        }
        let path = self.resolve_data_file(base);
        let store: Box<dyn TransactionStore> = match self.storage_format {
            StorageFormat::Csv => Box::new(CsvStore::new(path)),
            StorageFormat::Json => Box::new(JsonStore::new(path)),
        };
        Some(store)
    }
}

/// Handles persistence of [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(paths::app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base).map_err(config_error)?;
        let path = paths::config_file_in(&base);
        Ok(Self { base, path })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path).map_err(config_error)?;
            serde_json::from_str(&data).map_err(config_error)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(config_error)?;
        }
        let json = serde_json::to_string_pretty(config).map_err(config_error)?;
        write_atomic(&self.path, json.as_bytes()).map_err(config_error)
    }
}

fn config_error(err: impl std::fmt::Display) -> LedgerError {
    LedgerError::Config(err.to_string())
}
