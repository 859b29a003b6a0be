//! Predicates for selecting transactions and ledger entries.

use time::Date;

use crate::{
    date_range::DateRange,
    model::{LedgerEntry, PaymentMethod, Transaction, TransactionKind},
};

/// The fields a [Predicate] can test.
///
/// Fields a record type does not carry return `None`, and a predicate on
/// such a field never matches that record type.
pub trait Filterable {
    /// The calendar date of the record.
    fn date(&self) -> Date;

    /// The user that owns the record.
    fn owner_id(&self) -> &str;

    /// The category or income source.
    fn label(&self) -> Option<&str> {
        None
    }

    /// Income or expense.
    fn kind(&self) -> Option<TransactionKind> {
        None
    }

    /// How the money changed hands.
    fn payment_method(&self) -> Option<PaymentMethod> {
        None
    }

    /// The other person in a ledger entry.
    fn person(&self) -> Option<&str> {
        None
    }
}

impl Filterable for Transaction {
    fn date(&self) -> Date {
        self.date
    }

    fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn label(&self) -> Option<&str> {
        Some(&self.label)
    }

    fn kind(&self) -> Option<TransactionKind> {
        Some(self.kind)
    }
}

impl Filterable for LedgerEntry {
    fn date(&self) -> Date {
        self.date
    }

    fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn payment_method(&self) -> Option<PaymentMethod> {
        Some(self.payment_method)
    }

    fn person(&self) -> Option<&str> {
        Some(&self.person)
    }
}

/// A conjunction of conditions. Conditions that are not set always pass.
///
/// # Examples
///
/// ```
/// use khata_rs::{DateRange, Predicate};
/// use time::macros::date;
///
/// let predicate = Predicate::new()
///     .date_range(DateRange::new(date!(2024 - 01 - 01), date!(2024 - 01 - 31)).unwrap())
///     .category_equals("Food");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    /// Keep records dated within this range.
    pub date_range: Option<DateRange>,
    /// Keep records with exactly this label.
    pub category: Option<String>,
    /// Keep records paid with this method.
    pub payment_method: Option<PaymentMethod>,
    /// Keep records with exactly this person. Case-sensitive.
    pub person: Option<String>,
    /// Keep records owned by this user.
    pub owner_id: Option<String>,
    /// Keep records of this kind.
    pub kind: Option<TransactionKind>,
}

impl Predicate {
    /// A predicate that matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only match records dated within `range`.
    pub fn date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    /// Only match records labelled `label`.
    pub fn category_equals(mut self, label: &str) -> Self {
        self.category = Some(label.to_owned());
        self
    }

    /// Only match records paid with `method`.
    pub fn payment_method_equals(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    /// Only match records involving `name`.
    pub fn person_equals(mut self, name: &str) -> Self {
        self.person = Some(name.to_owned());
        self
    }

    /// Only match records owned by `owner_id`.
    pub fn owner_equals(mut self, owner_id: &str) -> Self {
        self.owner_id = Some(owner_id.to_owned());
        self
    }

    /// Only match records of `kind`.
    pub fn kind_equals(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Whether `record` passes every condition that is set.
    pub fn matches<T: Filterable>(&self, record: &T) -> bool {
        self.date_range
            .is_none_or(|range| range.contains(record.date()))
            && self
                .category
                .as_deref()
                .is_none_or(|label| record.label() == Some(label))
            && self
                .payment_method
                .is_none_or(|method| record.payment_method() == Some(method))
            && self
                .person
                .as_deref()
                .is_none_or(|person| record.person() == Some(person))
            && self
                .owner_id
                .as_deref()
                .is_none_or(|owner_id| record.owner_id() == owner_id)
            && self.kind.is_none_or(|kind| record.kind() == Some(kind))
    }
}

/// Keep the records that match `predicate`, in their original order.
pub fn filter<T: Filterable + Clone>(records: &[T], predicate: &Predicate) -> Vec<T> {
    records
        .iter()
        .filter(|record| predicate.matches(*record))
        .cloned()
        .collect()
}
