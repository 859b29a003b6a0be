//! The record shapes handed over by the record store, before validation.
//!
//! Every field is optional so that a malformed record can still be read and
//! reported as skipped instead of failing the whole fetch.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An income or expense tagged with its kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    /// The record ID.
    pub id: Option<String>,
    /// "Income" or "Expense".
    pub kind: Option<String>,
    /// The amount in minor units, as a JSON number or a numeric string.
    pub amount: Option<Value>,
    /// The category of an expense or the source of an income.
    pub label: Option<String>,
    /// The short title the user gave the record.
    pub title: Option<String>,
    /// An ISO date, optionally followed by a time.
    pub date: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// An income record as stored by the income collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawIncome {
    /// The record ID.
    #[serde(alias = "_id")]
    pub id: Option<String>,
    /// The amount in minor units.
    pub amount: Option<Value>,
    /// Where the money came from, e.g. "Salary".
    pub source: Option<String>,
    /// The short title the user gave the record.
    pub title: Option<String>,
    /// An ISO date, optionally followed by a time.
    pub date: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// An expense record as stored by the expense collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawExpense {
    /// The record ID.
    #[serde(alias = "_id")]
    pub id: Option<String>,
    /// The amount in minor units.
    pub amount: Option<Value>,
    /// The spending category, e.g. "Food".
    pub category: Option<String>,
    /// The short title the user gave the record.
    pub title: Option<String>,
    /// An ISO date, optionally followed by a time.
    pub date: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// A ledger (khata) row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLedgerEntry {
    /// The record ID.
    #[serde(alias = "_id")]
    pub id: Option<String>,
    /// "Taken" or "Given".
    #[serde(alias = "type")]
    pub direction: Option<String>,
    /// The other person.
    pub person: Option<String>,
    /// The amount in minor units.
    pub amount: Option<Value>,
    /// "Cash", "UPI" or "Card".
    pub payment_method: Option<String>,
    /// An ISO date, optionally followed by a time.
    pub date: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
}

impl From<RawIncome> for RawTransaction {
    fn from(income: RawIncome) -> Self {
        Self {
            id: income.id,
            kind: Some("Income".to_owned()),
            amount: income.amount,
            label: income.source,
            title: income.title,
            date: income.date,
            notes: income.notes,
        }
    }
}

impl From<RawExpense> for RawTransaction {
    fn from(expense: RawExpense) -> Self {
        Self {
            id: expense.id,
            kind: Some("Expense".to_owned()),
            amount: expense.amount,
            label: expense.category,
            title: expense.title,
            date: expense.date,
            notes: expense.notes,
        }
    }
}
