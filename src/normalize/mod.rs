//! Converts raw records from the record store into canonical records.
//!
//! Malformed records are never coerced into something valid, e.g. a missing
//! amount is not treated as zero. They are collected in
//! [Normalized::skipped] so that callers can show what was left out.

mod ledger;
mod transaction;

use serde::Serialize;
use serde_json::Value;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

pub use ledger::normalize_ledger;
pub use transaction::{normalize_records, normalize_transactions};

use crate::{
    ValidationError,
    date_range::SUPPORTED_DATES,
    model::{MAX_AMOUNT, MinorUnits},
};

const ISO_DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// The collection a skipped record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecordSource {
    /// The income collection.
    Income,
    /// The expense collection.
    Expense,
    /// A kind-tagged transaction list.
    Transaction,
    /// The ledger (khata) collection.
    Ledger,
}

/// A raw record that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRecord {
    /// Where the record came from.
    pub source: RecordSource,
    /// The record ID, if the record had one.
    pub id: Option<String>,
    /// Why the record was rejected.
    pub error: ValidationError,
}

/// The valid records produced by a normalizer and the records it rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized<T> {
    /// Records that passed validation, in input order.
    pub records: Vec<T>,
    /// Records that failed validation, in input order.
    pub skipped: Vec<SkippedRecord>,
}

impl<T> Default for Normalized<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<T> Normalized<T> {
    fn push(&mut self, source: RecordSource, id: Option<&str>, result: Result<T, ValidationError>) {
        match result {
            Ok(record) => self.records.push(record),
            Err(error) => {
                tracing::warn!(
                    "skipping {source:?} record {}: {error}",
                    id.unwrap_or("<no id>")
                );
                self.skipped.push(SkippedRecord {
                    source,
                    id: id.map(str::to_owned),
                    error,
                });
            }
        }
    }
}

/// Parse an amount of minor units.
///
/// Accepts JSON numbers and numeric strings. The amount must be finite, a
/// whole number, and between zero and [MAX_AMOUNT].
pub(crate) fn parse_amount(amount: Option<&Value>) -> Result<MinorUnits, ValidationError> {
    let value = match amount {
        None | Some(Value::Null) => return Err(ValidationError::MissingAmount),
        Some(value) => value,
    };

    match value {
        Value::Number(number) => {
            if let Some(amount) = number.as_i64() {
                return check_integer(amount);
            }

            match number.as_f64() {
                Some(amount) => check_float(amount, &number.to_string()),
                None => Err(ValidationError::InvalidAmount(number.to_string())),
            }
        }
        Value::String(text) => {
            let trimmed = text.trim();

            if trimmed.is_empty() {
                return Err(ValidationError::MissingAmount);
            }

            if let Ok(amount) = trimmed.parse::<i64>() {
                return check_integer(amount);
            }

            match trimmed.parse::<f64>() {
                Ok(amount) => check_float(amount, trimmed),
                Err(_) => Err(ValidationError::InvalidAmount(trimmed.to_owned())),
            }
        }
        other => Err(ValidationError::InvalidAmount(other.to_string())),
    }
}

fn check_integer(amount: i64) -> Result<MinorUnits, ValidationError> {
    if amount < 0 {
        Err(ValidationError::NegativeAmount(amount.to_string()))
    } else if amount > MAX_AMOUNT {
        Err(ValidationError::AmountTooLarge(amount.to_string()))
    } else {
        Ok(amount)
    }
}

fn check_float(amount: f64, text: &str) -> Result<MinorUnits, ValidationError> {
    if !amount.is_finite() {
        return Err(ValidationError::NonFiniteAmount(text.to_owned()));
    }

    if amount < 0.0 {
        return Err(ValidationError::NegativeAmount(text.to_owned()));
    }

    if amount.fract() != 0.0 {
        return Err(ValidationError::FractionalAmount(text.to_owned()));
    }

    if amount > MAX_AMOUNT as f64 {
        return Err(ValidationError::AmountTooLarge(text.to_owned()));
    }

    Ok(amount as MinorUnits)
}

/// Parse the calendar date at the start of an ISO date or date-time string.
///
/// Any time of day and offset are ignored, the date is taken as written.
/// Dates outside [SUPPORTED_DATES] are rejected.
pub(crate) fn parse_date(date: Option<&str>) -> Result<Date, ValidationError> {
    let text = match date.map(str::trim) {
        None | Some("") => return Err(ValidationError::MissingDate),
        Some(text) => text,
    };

    let date_part = text.split(['T', ' ']).next().unwrap_or(text);

    let parsed = Date::parse(date_part, ISO_DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(text.to_owned()))?;

    if SUPPORTED_DATES.contains(parsed) {
        Ok(parsed)
    } else {
        Err(ValidationError::UnsupportedDate(text.to_owned()))
    }
}

/// Trim `text` and drop it if nothing is left.
pub(crate) fn non_blank(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}
