//! Normalizes raw ledger rows into [LedgerEntry]s.

use crate::{
    ValidationError,
    model::{Direction, LedgerEntry, PaymentMethod, RawLedgerEntry},
    normalize::{Normalized, RecordSource, non_blank, parse_amount, parse_date},
};

/// Normalize the ledger rows of `owner_id`, keeping input order.
///
/// Rows with an unknown direction or payment method, or without a person,
/// are skipped along with rows that have a bad amount or date.
pub fn normalize_ledger(owner_id: &str, rows: &[RawLedgerEntry]) -> Normalized<LedgerEntry> {
    let mut normalized = Normalized::default();

    for row in rows {
        let result = normalize_row(owner_id, row);
        normalized.push(RecordSource::Ledger, row.id.as_deref(), result);
    }

    normalized
}

fn normalize_row(owner_id: &str, row: &RawLedgerEntry) -> Result<LedgerEntry, ValidationError> {
    let direction_tag = row.direction.as_deref().unwrap_or_default();
    let direction = Direction::from_tag(direction_tag)
        .ok_or_else(|| ValidationError::UnknownDirection(direction_tag.to_owned()))?;

    // The person is kept as typed, only surrounding whitespace is dropped.
    let person = non_blank(row.person.as_deref()).ok_or(ValidationError::MissingPerson)?;
    let amount = parse_amount(row.amount.as_ref())?;

    let method_tag = row.payment_method.as_deref().unwrap_or_default();
    let payment_method = PaymentMethod::from_tag(method_tag)
        .ok_or_else(|| ValidationError::UnknownPaymentMethod(method_tag.to_owned()))?;

    let date = parse_date(row.date.as_deref())?;

    Ok(LedgerEntry {
        id: row.id.clone().unwrap_or_default(),
        owner_id: owner_id.to_owned(),
        direction,
        person,
        amount,
        payment_method,
        date,
        notes: non_blank(row.notes.as_deref()),
    })
}
