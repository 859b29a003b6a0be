//! Defines the canonical transaction model.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    model::MinorUnits,
    record_id::{OwnerId, RecordId},
};

/// The label given to expenses that were recorded without a category.
pub const UNCATEGORIZED_LABEL: &str = "Other";

/// The expense categories offered when recording an expense.
///
/// Labels outside this list are still accepted, the list is only used for
/// presentation.
pub const EXPENSE_CATEGORIES: [&str; 11] = [
    "Food",
    "Dairy",
    "Rent",
    "Travel",
    "Shopping",
    "Health",
    "Entertainment",
    "Grocery",
    "Study",
    "Personal",
    UNCATEGORIZED_LABEL,
];

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionKind {
    /// Parse the kind tag used by the record store.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "Income" => Some(Self::Income),
            "Expense" => Some(Self::Expense),
            _ => None,
        }
    }

    /// The sign applied to an amount of this kind when computing balances.
    pub fn sign(self) -> MinorUnits {
        match self {
            Self::Income => 1,
            Self::Expense => -1,
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
        }
    }
}

/// An income or expense after normalization.
///
/// `amount` is never negative, the direction of the money is given by `kind`.
/// Instances are produced by [normalize_transactions](crate::normalize_transactions)
/// and [normalize_records](crate::normalize_records).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID the record store gave this record.
    pub id: RecordId,
    /// The user the record belongs to.
    pub owner_id: OwnerId,
    /// Whether the money came in or went out.
    pub kind: TransactionKind,
    /// The amount in minor currency units.
    pub amount: MinorUnits,
    /// The category of an expense or the source of an income.
    pub label: String,
    /// The calendar date of the transaction.
    pub date: Date,
    /// The short title the user gave the record, if any.
    pub title: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
}

impl Transaction {
    /// The amount with the sign of its kind applied.
    pub fn signed_amount(&self) -> MinorUnits {
        self.kind.sign() * self.amount
    }
}
