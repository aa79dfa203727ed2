use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    errors::{LedgerError, Result},
    ledger::Transaction,
};

use super::{ensure_parent, write_atomic, LoadReport, TransactionRecord, TransactionStore};

pub const JSON_SCHEMA_VERSION: u8 = 1;

/// On-disk JSON layout. Unlike the CSV store it keeps transaction ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonDocument {
    #[serde(default = "JsonDocument::schema_version_default")]
    pub schema_version: u8,
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
}

impl JsonDocument {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        Self {
            schema_version: JSON_SCHEMA_VERSION,
            transactions: transactions.iter().map(TransactionRecord::from).collect(),
        }
    }

    fn schema_version_default() -> u8 {
        JSON_SCHEMA_VERSION
    }
}

/// Pretty-printed JSON persistence staged through a temporary file.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TransactionStore for JsonStore {
    fn load(&self) -> Result<LoadReport> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no JSON ledger yet; starting empty");
            return Ok(LoadReport::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let document: JsonDocument = serde_json::from_str(&data)?;
        if document.schema_version > JSON_SCHEMA_VERSION {
            return Err(LedgerError::Storage(format!(
                "`{}` was written by a newer schema version ({})",
                self.path.display(),
                document.schema_version
            )));
        }

        let mut report = LoadReport::default();
        for (position, record) in document.transactions.into_iter().enumerate() {
            match Transaction::try_from(record) {
                Ok(txn) => report.transactions.push(txn),
                Err(err) => {
                    let message = format!("entry {}: {}", position + 1, err);
                    warn!(path = %self.path.display(), "skipping {message}");
                    report.warnings.push(message);
                }
            }
        }
        Ok(report)
    }

    fn save(&self, transactions: &[Transaction]) -> Result<()> {
        ensure_parent(&self.path)?;
        let json = serde_json::to_string_pretty(&JsonDocument::from_transactions(transactions))?;
        write_atomic(&self.path, json.as_bytes())?;
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::tmp_path;
    use crate::ledger::TransactionKind;
    use tempfile::TempDir;

    fn store_in_temp_dir() -> (JsonStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let store = JsonStore::new(temp.path().join("ledger.json"));
        (store, temp)
    }

    #[test]
    fn missing_file_loads_empty() {
        let (store, _guard) = store_in_temp_dir();
        let report = store.load().expect("load");
        assert!(report.transactions.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn save_and_load_keeps_ids_and_order() {
        let (store, _guard) = store_in_temp_dir();
        let items = vec![
            Transaction::new("2024-02-15", 40.0, TransactionKind::Expense, "Food").unwrap(),
            Transaction::new("2024-03-01", 100.0, TransactionKind::Income, "Salary").unwrap(),
        ];

        store.save(&items).expect("save");
        let report = store.load().expect("load");

        assert_eq!(report.transactions, items);
        assert!(!tmp_path(store.location()).exists());
    }

    #[test]
    fn rejects_newer_schema() {
        let (store, _guard) = store_in_temp_dir();
        fs::write(store.location(), r#"{"schema_version": 9, "transactions": []}"#).unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, LedgerError::Storage(_)));
    }

    #[test]
    fn invalid_entries_are_reported_and_skipped() {
        let (store, _guard) = store_in_temp_dir();
        let json = r#"{
            "schema_version": 1,
            "transactions": [
                {"date": "2024-01-01", "kind": "Income", "amount": 5.0, "category": "Salary"},
                {"date": "2024-01-02", "kind": "Income", "amount": -5.0, "category": "Salary"}
            ]
        }"#;
        fs::write(store.location(), json).unwrap();

        let report = store.load().expect("load");

        assert_eq!(report.transactions.len(), 1);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].starts_with("entry 2"));
    }
}
