//! Single-stack undo for ledger mutations.
//!
//! Each record stores the transaction a mutation touched plus the position it
//! applied at. Entries are located by identity first; the stored position is
//! only consulted when the identity can no longer be found.

use tracing::{debug, warn};

use crate::{
    errors::{LedgerError, Result},
    ledger::{Ledger, Transaction},
};

#[derive(Debug, Clone, PartialEq)]
pub enum UndoRecord {
    /// `transaction` was added and ended up at `index` after sorting.
    Add { transaction: Transaction, index: usize },
    /// `transaction` was removed from `index`.
    Delete { transaction: Transaction, index: usize },
    /// The entry at `index` held `previous` before it was replaced.
    Update { previous: Transaction, index: usize },
}

impl UndoRecord {
    pub fn kind(&self) -> UndoKind {
        match self {
            UndoRecord::Add { .. } => UndoKind::Add,
            UndoRecord::Delete { .. } => UndoKind::Delete,
            UndoRecord::Update { .. } => UndoKind::Update,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoKind {
    Add,
    Delete,
    Update,
}

impl UndoKind {
    pub fn label(self) -> &'static str {
        match self {
            UndoKind::Add => "add",
            UndoKind::Delete => "delete",
            UndoKind::Update => "update",
        }
    }
}

/// Result of replaying one undo record.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoOutcome {
    pub kind: UndoKind,
    /// The transaction the record carried.
    pub transaction: Transaction,
    /// False when the record no longer matched anything in the ledger.
    pub applied: bool,
}

#[derive(Debug, Default)]
pub struct UndoManager {
    stack: Vec<UndoRecord>,
}

impl UndoManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_add(&mut self, transaction: Transaction, index_after_sort: usize) {
        self.push(UndoRecord::Add {
            transaction,
            index: index_after_sort,
        });
    }

    pub fn record_delete(&mut self, transaction: Transaction, original_index: usize) {
        self.push(UndoRecord::Delete {
            transaction,
            index: original_index,
        });
    }

    pub fn record_update(&mut self, previous: Transaction, index: usize) {
        self.push(UndoRecord::Update { previous, index });
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }

    /// Pops the most recent record and applies its inverse to `ledger`.
    pub fn undo(&mut self, ledger: &mut Ledger) -> Result<UndoOutcome> {
        let record = self.stack.pop().ok_or(LedgerError::EmptyUndo)?;
        let kind = record.kind();
        let (transaction, applied) = match record {
            UndoRecord::Add { transaction, index } => {
                let applied = revert_add(ledger, &transaction, index);
                (transaction, applied)
            }
            UndoRecord::Delete { transaction, index } => {
                let slot = ledger.insert_clamped(index, transaction.clone());
                debug!(requested = index, slot, "re-inserted deleted transaction");
                (transaction, true)
            }
            UndoRecord::Update { previous, index } => {
                let applied = revert_update(ledger, &previous, index);
                (previous, applied)
            }
        };
        ledger.sort_by_date();

        if !applied {
            warn!(
                action = kind.label(),
                id = %transaction.id(),
                "undo record no longer matches the ledger; nothing changed"
            );
        }
        Ok(UndoOutcome {
            kind,
            transaction,
            applied,
        })
    }

    fn push(&mut self, record: UndoRecord) {
        debug!(action = record.kind().label(), depth = self.stack.len() + 1, "recorded undo");
        self.stack.push(record);
    }
}

fn revert_add(ledger: &mut Ledger, added: &Transaction, index: usize) -> bool {
    let target = ledger
        .position(added.id())
        .or_else(|| {
            ledger
                .get(index)
                .filter(|resident| resident.same_values(added))
                .map(|_| index)
        })
        .or_else(|| ledger.list().iter().position(|txn| txn.same_values(added)));
    match target {
        Some(position) => ledger.remove(position).is_some(),
        None => false,
    }
}

/// Puts `previous` back in its pre-update slot so equal-date neighbours keep their order.
fn revert_update(ledger: &mut Ledger, previous: &Transaction, index: usize) -> bool {
    if let Some(position) = ledger.position(previous.id()) {
        ledger.remove(position);
        ledger.insert_clamped(index, previous.clone());
        return true;
    }
    ledger.replace(index, previous.clone()).is_some()
}
