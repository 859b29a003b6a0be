//! Defines the crate level error type and the per-record validation errors.

use std::time::Duration;

use serde::Serialize;
use time::Date;

/// The errors that may occur while building a report.
///
/// Problems with individual records are not represented here, see
/// [ValidationError]. Those records are skipped and reported next to the
/// result instead of failing the whole report.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The record store could not be read.
    ///
    /// The string should only be logged for debugging. Callers presenting the
    /// error to an end user should replace it with a general message.
    #[error("could not fetch records from the record store: {0}")]
    Upstream(String),

    /// The record store did not answer within the configured fetch timeout.
    #[error("the record store did not respond within {0:?}")]
    UpstreamTimeout(Duration),

    /// The caller asked for a report that cannot be built, e.g. a week
    /// granularity without a week policy or a date range that ends before it
    /// starts.
    #[error("invalid report configuration: {0}")]
    Configuration(String),

    /// A date has no bucket because the bucket would start or end outside
    /// the representable calendar.
    #[error("the date {0} is too close to the limits of the calendar to be bucketed")]
    DateOutOfRange(Date),

    /// The cancellation token fired before the report was finished.
    #[error("the report was cancelled")]
    Cancelled,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::Upstream(value.to_string())
    }
}

/// Why a raw record was rejected by the normalizers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(tag = "reason", content = "value", rename_all = "camelCase")]
pub enum ValidationError {
    /// The record has no amount.
    #[error("the amount is missing")]
    MissingAmount,

    /// The amount could not be read as a number.
    #[error("the amount {0} is not a number")]
    InvalidAmount(String),

    /// The amount parsed to NaN or infinity.
    #[error("the amount {0} is not a finite number")]
    NonFiniteAmount(String),

    /// The amount is below zero. Signs are derived from the record kind, so a
    /// negative amount means the record is corrupt.
    #[error("the amount {0} is negative")]
    NegativeAmount(String),

    /// The amount is above [crate::MAX_AMOUNT].
    #[error("the amount {0} is larger than the largest supported amount")]
    AmountTooLarge(String),

    /// The amount is not a whole number of minor currency units.
    #[error("the amount {0} is not a whole number of minor units")]
    FractionalAmount(String),

    /// The record has no date.
    #[error("the date is missing")]
    MissingDate,

    /// The date is not an ISO calendar date.
    #[error("could not parse the date \"{0}\"")]
    InvalidDate(String),

    /// The date lies outside [crate::SUPPORTED_DATES].
    #[error("the date \"{0}\" is outside the supported dates")]
    UnsupportedDate(String),

    /// A kind-tagged transaction is neither "Income" nor "Expense".
    #[error("unknown transaction kind \"{0}\"")]
    UnknownKind(String),

    /// A ledger row is neither "Taken" nor "Given".
    #[error("unknown ledger direction \"{0}\"")]
    UnknownDirection(String),

    /// A ledger row uses a payment method other than Cash, UPI or Card.
    #[error("unknown payment method \"{0}\"")]
    UnknownPaymentMethod(String),

    /// A ledger row does not name the other person.
    #[error("the person is missing")]
    MissingPerson,
}
