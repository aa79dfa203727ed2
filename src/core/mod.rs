//! Session-level coordination between the ledger, undo history and storage.

pub mod ledger_manager;

pub use ledger_manager::{ChangeReport, LedgerManager, SaveStatus};
