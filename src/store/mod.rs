//! Defines the record store trait the reports read from.

mod sqlite;

use std::future::Future;

pub use sqlite::SQLiteRecordStore;

use crate::{
    Error,
    date_range::DateRange,
    filter::Predicate,
    model::{PaymentMethod, RawLedgerEntry, RawTransaction},
};

/// Reads one user's raw records.
///
/// Implementations resolve their own storage layout into the kind-tagged
/// [RawTransaction] and [RawLedgerEntry] shapes. They should not validate the
/// records, that is done by the normalizers.
///
/// Implementations must only return records owned by `owner_id`. The raw
/// shapes carry no owner, so nothing downstream can catch a leak.
pub trait RecordStore: Send + Sync {
    /// Fetch every income and expense owned by `owner_id`.
    ///
    /// # Errors
    /// Returns [Error::Upstream] if the store cannot be read.
    fn fetch_transactions(
        &self,
        owner_id: &str,
    ) -> impl Future<Output = Result<Vec<RawTransaction>, Error>> + Send;

    /// Fetch the ledger entries owned by `owner_id` that match `query`, oldest
    /// first.
    ///
    /// # Errors
    /// Returns [Error::Upstream] if the store cannot be read.
    fn fetch_ledger_entries(
        &self,
        owner_id: &str,
        query: Option<&LedgerQuery>,
    ) -> impl Future<Output = Result<Vec<RawLedgerEntry>, Error>> + Send;
}

/// Defines which ledger entries [RecordStore::fetch_ledger_entries] returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerQuery {
    /// Only entries with this person, matched exactly.
    pub person: Option<String>,
    /// Only entries paid with this method.
    pub payment_method: Option<PaymentMethod>,
    /// Only entries dated within this range (inclusive).
    pub date_range: Option<DateRange>,
}

impl LedgerQuery {
    /// The same conditions as a [Predicate].
    pub fn predicate(&self) -> Predicate {
        let mut predicate = Predicate::new();
        predicate.person = self.person.clone();
        predicate.payment_method = self.payment_method;
        predicate.date_range = self.date_range;
        predicate
    }
}
