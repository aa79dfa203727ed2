//! Persistence collaborators that round-trip the ordered transaction list.

pub mod csv_backend;
pub mod json_backend;

use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{Result, ValidationError},
    ledger::{parse_amount, Transaction, TransactionKind},
};

pub use csv_backend::CsvStore;
pub use json_backend::JsonStore;

const TMP_SUFFIX: &str = "tmp";

/// Abstraction over backends able to persist the full transaction sequence.
///
/// `save` always writes the complete list; the last successful save wins.
pub trait TransactionStore: Send + Sync {
    fn load(&self) -> Result<LoadReport>;
    fn save(&self, transactions: &[Transaction]) -> Result<()>;
    fn location(&self) -> &Path;
}

/// Transactions recovered from storage plus anything that had to be skipped.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub transactions: Vec<Transaction>,
    pub warnings: Vec<String>,
}

/// Flat, persistence-friendly view of a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub date: String,
    pub kind: String,
    pub amount: f64,
    pub category: String,
}

impl From<&Transaction> for TransactionRecord {
    fn from(txn: &Transaction) -> Self {
        Self {
            id: Some(txn.id()),
            date: txn.date_str(),
            kind: txn.kind().as_str().to_string(),
            amount: txn.amount(),
            category: txn.category().to_string(),
        }
    }
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = ValidationError;

    fn try_from(record: TransactionRecord) -> std::result::Result<Self, Self::Error> {
        let kind: TransactionKind = record.kind.parse()?;
        match record.id {
            Some(id) => {
                Transaction::with_id(id, &record.date, record.amount, kind, record.category)
            }
            None => Transaction::new(&record.date, record.amount, kind, record.category),
        }
    }
}

impl TransactionRecord {
    /// Builds a record from raw text fields, as found in a headerless CSV row.
    pub fn from_fields(
        date: &str,
        kind: &str,
        amount: &str,
        category: &str,
    ) -> std::result::Result<Self, ValidationError> {
        Ok(Self {
            id: None,
            date: date.to_string(),
            kind: kind.to_string(),
            amount: parse_amount(amount)?,
            category: category.to_string(),
        })
    }
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Writes `data` to a sibling temp file, then renames it over `path`.
pub(crate) fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data)?;
    file.flush()?;
    fs::rename(&tmp, path)
}

pub(crate) fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
