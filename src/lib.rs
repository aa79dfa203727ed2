#![doc(test(attr(deny(warnings))))]

//! Pocket Ledger keeps a date-ordered list of income and expense entries,
//! derives running totals from it, and offers a single-level undo for every
//! add, update and delete.

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod undo;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Pocket Ledger tracing initialized.");
    });
}
