use uuid::Uuid;

use crate::errors::{LedgerError, Result};

use super::{
    summary::{CategoryTotals, Summary},
    transaction::{Transaction, TransactionKind},
};

/// Ordered collection of transactions, kept sorted ascending by date.
///
/// Sorting is stable, so entries sharing a date keep their relative insertion
/// order. Mutations validate before touching the sequence; a rejected call
/// leaves the ledger exactly as it was.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger from a previously persisted sequence, re-applying the
    /// date ordering.
    pub fn from_transactions(transactions: impl IntoIterator<Item = Transaction>) -> Self {
        let mut ledger = Self {
            transactions: transactions.into_iter().collect(),
        };
        ledger.sort_by_date();
        ledger
    }

    /// Appends a new transaction and returns the created value.
    pub fn add(
        &mut self,
        date: &str,
        amount: f64,
        kind: TransactionKind,
        category: impl Into<String>,
    ) -> Result<Transaction> {
        let transaction = Transaction::new(date, amount, kind, category)?;
        self.transactions.push(transaction.clone());
        self.sort_by_date();
        Ok(transaction)
    }

    /// Removes and returns the entry at `index`.
    pub fn delete_at(&mut self, index: usize) -> Result<Transaction> {
        self.check_index(index)?;
        Ok(self.transactions.remove(index))
    }

    /// Replaces the entry at `index`, returning `(previous, replacement)`.
    pub fn update_at(
        &mut self,
        index: usize,
        date: &str,
        amount: f64,
        kind: TransactionKind,
        category: impl Into<String>,
    ) -> Result<(Transaction, Transaction)> {
        self.check_index(index)?;
        let replacement = self.transactions[index].revise(date, amount, kind, category)?;
        let previous = std::mem::replace(&mut self.transactions[index], replacement.clone());
        self.sort_by_date();
        Ok((previous, replacement))
    }

    pub fn list(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn get(&self, index: usize) -> Option<&Transaction> {
        self.transactions.get(index)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Current position of the entry with the given identity.
    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.transactions.iter().position(|txn| txn.id() == id)
    }

    pub fn summary(&self) -> Summary {
        Summary::from_transactions(&self.transactions)
    }

    pub fn category_totals(&self) -> CategoryTotals {
        CategoryTotals::from_transactions(&self.transactions)
    }

    /// Inserts at `index` clamped into `[0, len]`, returning the slot used.
    pub(crate) fn insert_clamped(&mut self, index: usize, transaction: Transaction) -> usize {
        let slot = index.min(self.transactions.len());
        self.transactions.insert(slot, transaction);
        slot
    }

    pub(crate) fn remove(&mut self, index: usize) -> Option<Transaction> {
        (index < self.transactions.len()).then(|| self.transactions.remove(index))
    }

    pub(crate) fn replace(
        &mut self,
        index: usize,
        transaction: Transaction,
    ) -> Option<Transaction> {
        self.transactions
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, transaction))
    }

    pub(crate) fn sort_by_date(&mut self) {
        self.transactions.sort_by_key(Transaction::date);
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.transactions.len() {
            Ok(())
        } else {
            Err(LedgerError::IndexOutOfRange {
                index,
                len: self.transactions.len(),
            })
        }
    }
}
