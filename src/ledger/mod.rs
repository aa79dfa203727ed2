//! Transaction values, the date-ordered ledger, and its aggregates.

#[allow(clippy::module_inception)]
pub mod ledger;
pub mod summary;
pub mod transaction;

pub use ledger::Ledger;
pub use summary::{CategoryTotals, Summary};
pub use transaction::{
    parse_amount, parse_date, Transaction, TransactionKind, DATE_FORMAT, SUGGESTED_CATEGORIES,
};
