//! The canonical records the engine works on and the raw shapes they are
//! normalized from.

mod ledger;
mod raw;
mod transaction;

pub use ledger::{Direction, LedgerEntry, PaymentMethod};
pub use raw::{RawExpense, RawIncome, RawLedgerEntry, RawTransaction};
pub use transaction::{EXPENSE_CATEGORIES, Transaction, TransactionKind, UNCATEGORIZED_LABEL};

/// An amount of money in minor currency units, e.g. paise.
pub type MinorUnits = i64;

/// The largest amount a single record may carry, ₹100,000,000,000.
///
/// Totals over up to 900,000 records of this amount still fit in
/// [MinorUnits]. Larger amounts are skipped by the normalizers.
pub const MAX_AMOUNT: MinorUnits = 10_000_000_000_000;
