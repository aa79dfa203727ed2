use std::{
    fs,
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use tracing::{debug, warn};

use crate::{errors::Result, ledger::Transaction};

use super::{ensure_parent, tmp_path, LoadReport, TransactionRecord, TransactionStore};

/// Headerless `date,kind,amount,category` rows.
pub const CSV_FIELD_COUNT: usize = 4;

/// Flat-file persistence in the legacy `transactions.csv` layout.
///
/// Identities are not stored; every load assigns fresh ids.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TransactionStore for CsvStore {
    fn load(&self) -> Result<LoadReport> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no CSV ledger yet; starting empty");
            return Ok(LoadReport::default());
        }
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)?;

        let mut report = LoadReport::default();
        for (position, row) in reader.records().enumerate() {
            let line = position + 1;
            let parsed = row
                .map_err(|err| err.to_string())
                .and_then(|record| parse_row(&record));
            match parsed {
                Ok(txn) => report.transactions.push(txn),
                Err(reason) => {
                    let message = format!("line {line}: {reason}");
                    warn!(path = %self.path.display(), "skipping {message}");
                    report.warnings.push(message);
                }
            }
        }
        debug!(
            path = %self.path.display(),
            loaded = report.transactions.len(),
            skipped = report.warnings.len(),
            "read CSV ledger"
        );
        Ok(report)
    }

    fn save(&self, transactions: &[Transaction]) -> Result<()> {
        ensure_parent(&self.path)?;
        let tmp = tmp_path(&self.path);
        {
            let mut writer = WriterBuilder::new().has_headers(false).from_path(&tmp)?;
            for txn in transactions {
                let amount = txn.amount().to_string();
                writer.write_record([
                    txn.date_str().as_str(),
                    txn.kind().as_str(),
                    amount.as_str(),
                    txn.category(),
                ])?;
            }
            writer.flush()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

fn parse_row(record: &StringRecord) -> std::result::Result<Transaction, String> {
    if record.len() != CSV_FIELD_COUNT {
        return Err(format!(
            "expected {CSV_FIELD_COUNT} fields, found {}",
            record.len()
        ));
    }
    let record = TransactionRecord::from_fields(&record[0], &record[1], &record[2], &record[3])
        .map_err(|err| err.to_string())?;
    Transaction::try_from(record).map_err(|err| err.to_string())
}
