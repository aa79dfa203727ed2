use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ValidationError;

/// Textual date layout shared by input, display and persistence.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Category labels offered to users. Any label is accepted by the ledger.
pub const SUGGESTED_CATEGORIES: [&str; 5] =
    ["Salary", "Food", "Transport", "Entertainment", "Other"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            _ => Err(ValidationError::UnknownKind(value.to_string())),
        }
    }
}

/// A single dated money movement.
///
/// Values never change after construction: the ledger replaces an entry with a
/// revised copy that keeps the same `id`, so the id names the logical entry
/// while the remaining fields describe its current value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    id: Uuid,
    date: NaiveDate,
    amount: f64,
    kind: TransactionKind,
    category: String,
}

impl Transaction {
    /// Validates the inputs and builds a transaction with a fresh identity.
    pub fn new(
        date: &str,
        amount: f64,
        kind: TransactionKind,
        category: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::with_id(Uuid::new_v4(), date, amount, kind, category)
    }

    /// Builds a transaction with a known identity, e.g. when restoring a snapshot.
    pub fn with_id(
        id: Uuid,
        date: &str,
        amount: f64,
        kind: TransactionKind,
        category: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let date = parse_date(date)?;
        let amount = validate_amount(amount)?;
        Ok(Self {
            id,
            date,
            amount,
            kind,
            category: category.into(),
        })
    }

    /// Produces the replacement value for this entry, keeping its identity.
    pub fn revise(
        &self,
        date: &str,
        amount: f64,
        kind: TransactionKind,
        category: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::with_id(self.id, date, amount, kind, category)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The date in its canonical `YYYY-MM-DD` form.
    pub fn date_str(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Compares everything except identity.
    pub fn same_values(&self, other: &Transaction) -> bool {
        self.date == other.date
            && self.amount == other.amount
            && self.kind == other.kind
            && self.category == other.category
    }
}

/// Parses a strict `YYYY-MM-DD` calendar date.
pub fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    if input.is_empty() {
        return Err(ValidationError::EmptyField("date"));
    }
    let bytes = input.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(idx, byte)| match idx {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        });
    if !well_formed {
        return Err(ValidationError::MalformedDate(input.to_string()));
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map_err(|_| ValidationError::MalformedDate(input.to_string()))
}

pub fn validate_amount(amount: f64) -> Result<f64, ValidationError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(ValidationError::NonPositiveAmount(amount))
    }
}

/// Parses user or file supplied amount text.
pub fn parse_amount(input: &str) -> Result<f64, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("amount"));
    }
    match trimmed.parse::<f64>() {
        Ok(amount) if amount.is_finite() => validate_amount(amount),
        _ => Err(ValidationError::InvalidAmount(trimmed.to_string())),
    }
}
