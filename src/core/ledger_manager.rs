use tracing::{debug, error, info};

use crate::{
    errors::Result,
    ledger::{CategoryTotals, Ledger, Summary, Transaction, TransactionKind},
    storage::{LoadReport, TransactionStore},
    undo::{UndoManager, UndoOutcome},
};

/// Outcome of handing the ledger to the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    Saved,
    NotConfigured,
    Failed(String),
}

/// Value produced by a mutation together with what happened on save.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeReport<T> {
    pub value: T,
    pub save: SaveStatus,
}

/// Session context owning the ledger, its undo stack and the category totals.
///
/// Every mutation runs as: apply to the ledger, record the inverse, save, then
/// rebuild the totals. A failed save is reported but never rolls the
/// in-memory state back.
pub struct LedgerManager {
    ledger: Ledger,
    undo: UndoManager,
    category_totals: CategoryTotals,
    store: Option<Box<dyn TransactionStore>>,
}

impl LedgerManager {
    pub fn new(store: Option<Box<dyn TransactionStore>>) -> Self {
        Self {
            ledger: Ledger::new(),
            undo: UndoManager::new(),
            category_totals: CategoryTotals::default(),
            store,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(None)
    }

    pub fn with_store(store: Box<dyn TransactionStore>) -> Self {
        Self::new(Some(store))
    }

    pub fn store(&self) -> Option<&dyn TransactionStore> {
        self.store.as_deref()
    }

    /// Replaces the ledger with the store's contents and forgets undo history.
    pub fn load(&mut self) -> Result<LoadReport> {
        let Some(store) = self.store.as_ref() else {
            return Ok(LoadReport::default());
        };
        let report = store.load()?;
        info!(
            path = %store.location().display(),
            count = report.transactions.len(),
            skipped = report.warnings.len(),
            "loaded transactions"
        );
        self.ledger = Ledger::from_transactions(report.transactions.iter().cloned());
        self.undo.clear();
        self.refresh_totals();
        Ok(report)
    }

    pub fn add(
        &mut self,
        date: &str,
        amount: f64,
        kind: TransactionKind,
        category: &str,
    ) -> Result<ChangeReport<Transaction>> {
        let created = self.ledger.add(date, amount, kind, category)?;
        let index = self
            .ledger
            .position(created.id())
            .unwrap_or(self.ledger.len() - 1);
        self.undo.record_add(created.clone(), index);
        info!(
            index,
            date = %created.date_str(),
            amount = created.amount(),
            kind = %created.kind(),
            "added transaction"
        );
        Ok(self.finish(created))
    }

    pub fn update_at(
        &mut self,
        index: usize,
        date: &str,
        amount: f64,
        kind: TransactionKind,
        category: &str,
    ) -> Result<ChangeReport<(Transaction, Transaction)>> {
        let (previous, replacement) = self.ledger.update_at(index, date, amount, kind, category)?;
        self.undo.record_update(previous.clone(), index);
        info!(
            index,
            date = %replacement.date_str(),
            amount = replacement.amount(),
            "updated transaction"
        );
        Ok(self.finish((previous, replacement)))
    }

    pub fn delete_at(&mut self, index: usize) -> Result<ChangeReport<Transaction>> {
        let removed = self.ledger.delete_at(index)?;
        self.undo.record_delete(removed.clone(), index);
        info!(index, date = %removed.date_str(), amount = removed.amount(), "deleted transaction");
        Ok(self.finish(removed))
    }

    pub fn undo(&mut self) -> Result<ChangeReport<UndoOutcome>> {
        let outcome = self.undo.undo(&mut self.ledger)?;
        info!(action = outcome.kind.label(), applied = outcome.applied, "undid last action");
        Ok(self.finish(outcome))
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn list(&self) -> &[Transaction] {
        self.ledger.list()
    }

    pub fn summary(&self) -> Summary {
        self.ledger.summary()
    }

    /// Totals as of the last mutation or load.
    pub fn category_totals(&self) -> &CategoryTotals {
        &self.category_totals
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Writes the current list through the store without mutating anything.
    pub fn save(&self) -> SaveStatus {
        let Some(store) = self.store.as_ref() else {
            return SaveStatus::NotConfigured;
        };
        match store.save(self.ledger.list()) {
            Ok(()) => {
                info!(
                    path = %store.location().display(),
                    count = self.ledger.len(),
                    "saved transactions"
                );
                SaveStatus::Saved
            }
            Err(err) => {
                error!(
                    path = %store.location().display(),
                    error = %err,
                    "failed to save transactions"
                );
                SaveStatus::Failed(err.to_string())
            }
        }
    }

    fn finish<T>(&mut self, value: T) -> ChangeReport<T> {
        let save = self.save();
        if save == SaveStatus::NotConfigured {
            debug!("no storage configured; change kept in memory only");
        }
        self.refresh_totals();
        ChangeReport { value, save }
    }

    fn refresh_totals(&mut self) {
        self.category_totals = self.ledger.category_totals();
    }
}

impl Default for LedgerManager {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LedgerError;
    use crate::storage::CsvStore;
    use tempfile::TempDir;

    #[test]
    fn mutations_record_undo_and_refresh_totals() {
        let mut manager = LedgerManager::in_memory();

        let report = manager
            .add("2024-03-01", 100.0, TransactionKind::Income, "Salary")
            .unwrap();
        assert_eq!(report.save, SaveStatus::NotConfigured);
        assert_eq!(manager.category_totals().get("Salary"), Some(100.0));
        assert_eq!(manager.undo_depth(), 1);

        manager.undo().unwrap();
        assert!(manager.list().is_empty());
        assert!(manager.category_totals().is_empty());
        assert!(!manager.can_undo());
    }

    #[test]
    fn failed_validation_records_nothing() {
        let mut manager = LedgerManager::in_memory();

        let err = manager
            .add("2024-01-01", 0.0, TransactionKind::Expense, "Food")
            .unwrap_err();

        assert!(matches!(err, LedgerError::Validation(_)));
        assert!(!manager.can_undo());
    }

    #[test]
    fn out_of_range_delete_records_nothing() {
        let mut manager = LedgerManager::in_memory();
        assert!(matches!(
            manager.delete_at(0),
            Err(LedgerError::IndexOutOfRange { .. })
        ));
        assert!(matches!(manager.undo(), Err(LedgerError::EmptyUndo)));
    }

    #[test]
    fn every_mutation_is_saved() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("transactions.csv");
        let mut manager = LedgerManager::with_store(Box::new(CsvStore::new(&path)));

        let report = manager
            .add("2024-03-01", 100.0, TransactionKind::Income, "Salary")
            .unwrap();
        assert_eq!(report.save, SaveStatus::Saved);
        manager.delete_at(0).unwrap();
        manager.undo().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "2024-03-01,Income,100,Salary\n");
    }

    #[test]
    fn failed_save_keeps_the_change() {
        let temp = TempDir::new().expect("temp dir");
        let blocker = temp.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let mut manager =
            LedgerManager::with_store(Box::new(CsvStore::new(blocker.join("transactions.csv"))));

        let report = manager
            .add("2024-03-01", 100.0, TransactionKind::Income, "Salary")
            .unwrap();

        assert!(matches!(report.save, SaveStatus::Failed(_)));
        assert_eq!(manager.list().len(), 1);
        assert!(manager.can_undo());
    }

    #[test]
    fn load_replaces_ledger_and_clears_history() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("transactions.csv");
        let mut manager = LedgerManager::with_store(Box::new(CsvStore::new(&path)));
        manager
            .add("2024-01-01", 1.0, TransactionKind::Income, "Other")
            .unwrap();
        std::fs::write(&path, "2024-03-01,Income,100.00,Salary\n2024-02-15,Expense,40.00,Food\n")
            .unwrap();

        let report = manager.load().unwrap();

        assert_eq!(report.transactions.len(), 2);
        assert_eq!(manager.list()[0].category(), "Food");
        assert!(!manager.can_undo());
        assert_eq!(manager.category_totals().total(), 140.0);
    }
}
