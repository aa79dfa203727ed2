//! Aggregates derived from the ledger contents.

use std::collections::BTreeMap;

use serde::Serialize;

use super::transaction::{Transaction, TransactionKind};

/// Income/expense totals for a set of transactions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Summary {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
    pub count: usize,
}

impl Summary {
    pub fn from_transactions<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut summary = Summary::default();
        for txn in transactions {
            match txn.kind() {
                TransactionKind::Income => summary.total_income += txn.amount(),
                TransactionKind::Expense => summary.total_expense += txn.amount(),
            }
            summary.count += 1;
        }
        summary.balance = summary.total_income - summary.total_expense;
        summary
    }

}

/// Category label to cumulative amount, income and expense summed together.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CategoryTotals(BTreeMap<String, f64>);

impl CategoryTotals {
    pub fn from_transactions<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut totals = BTreeMap::new();
        for txn in transactions {
            *totals.entry(txn.category().to_string()).or_insert(0.0) += txn.amount();
        }
        Self(totals)
    }

    pub fn get(&self, category: &str) -> Option<f64> {
        self.0.get(category).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(category, total)| (category.as_str(), *total))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }
}
