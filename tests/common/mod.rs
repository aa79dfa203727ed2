#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use pocket_ledger::{
    config::{ConfigManager, StorageFormat},
    core::LedgerManager,
    storage::{CsvStore, JsonStore, TransactionStore},
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Returns a fresh directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn store_for(base: &std::path::Path, format: StorageFormat) -> Box<dyn TransactionStore> {
    match format {
        StorageFormat::Csv => Box::new(CsvStore::new(base.join("transactions.csv"))),
        StorageFormat::Json => Box::new(JsonStore::new(base.join("transactions.json"))),
    }
}

/// Creates an isolated manager backed by `format` plus a config manager in the same directory.
pub fn setup_test_env(format: StorageFormat) -> (LedgerManager, ConfigManager, PathBuf) {
    let base = temp_base();
    let manager = LedgerManager::with_store(store_for(&base, format));
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    (manager, config_manager, base)
}
