//! Defines the ledger (khata) entry model.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    model::MinorUnits,
    record_id::{OwnerId, RecordId},
};

/// Whether the user took money from or gave money to the other person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// The user received money from the person.
    Taken,
    /// The user handed money to the person.
    Given,
}

impl Direction {
    /// Parse the direction tag used by the record store.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "Taken" => Some(Self::Taken),
            "Given" => Some(Self::Given),
            _ => None,
        }
    }
}

/// How the money changed hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Cash.
    Cash,
    /// Unified Payments Interface transfer.
    #[serde(rename = "UPI")]
    Upi,
    /// Debit or credit card.
    Card,
}

impl PaymentMethod {
    /// Parse the payment method tag used by the record store.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "Cash" => Some(Self::Cash),
            "UPI" => Some(Self::Upi),
            "Card" => Some(Self::Card),
            _ => None,
        }
    }

    /// The tag used by the record store.
    pub fn as_tag(self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Upi => "UPI",
            Self::Card => "Card",
        }
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Money given to or taken from a named person, after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    /// The ID the record store gave this record.
    pub id: RecordId,
    /// The user the record belongs to.
    pub owner_id: OwnerId,
    /// Whether the user took or gave the money.
    pub direction: Direction,
    /// The other person. Compared case-sensitively.
    pub person: String,
    /// The amount in minor currency units.
    pub amount: MinorUnits,
    /// How the money changed hands.
    pub payment_method: PaymentMethod,
    /// The calendar date of the entry.
    pub date: Date,
    /// Free-text notes.
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{Direction, PaymentMethod};

    #[test]
    fn payment_method_tags_round_trip() {
        for method in [PaymentMethod::Cash, PaymentMethod::Upi, PaymentMethod::Card] {
            assert_eq!(PaymentMethod::from_tag(method.as_tag()), Some(method));
        }
    }

    #[test]
    fn rejects_unknown_tags() {
        assert_eq!(PaymentMethod::from_tag("Cheque"), None);
        assert_eq!(PaymentMethod::from_tag("upi"), None);
        assert_eq!(Direction::from_tag("Lent"), None);
    }

    #[test]
    fn upi_serializes_as_upper_case() {
        assert_eq!(serde_json::to_string(&PaymentMethod::Upi).unwrap(), "\"UPI\"");
    }
}
