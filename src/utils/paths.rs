use dirs::home_dir;
use std::{env, path::PathBuf};

const DEFAULT_DIR_NAME: &str = ".pocket_ledger";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const CSV_DATA_FILE: &str = "transactions.csv";
const JSON_DATA_FILE: &str = "transactions.json";

/// Environment override for the application data directory.
pub const HOME_ENV: &str = "POCKET_LEDGER_HOME";

/// Returns the application data directory, defaulting to `~/.pocket_ledger`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn config_file_in(base: &std::path::Path) -> PathBuf {
    base.join(CONFIG_DIR).join(CONFIG_FILE)
}

pub fn csv_data_file_in(base: &std::path::Path) -> PathBuf {
    base.join(CSV_DATA_FILE)
}

pub fn json_data_file_in(base: &std::path::Path) -> PathBuf {
    base.join(JSON_DATA_FILE)
}
