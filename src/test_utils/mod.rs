//! Builders for canonical records used across the unit tests.

use time::Date;

use crate::model::{Direction, LedgerEntry, PaymentMethod, Transaction, TransactionKind};

/// The owner every test record belongs to.
pub const TEST_OWNER: &str = "owner";

pub fn income(id: &str, amount: i64, source: &str, date: Date) -> Transaction {
    transaction(id, TransactionKind::Income, amount, source, date)
}

pub fn expense(id: &str, amount: i64, category: &str, date: Date) -> Transaction {
    transaction(id, TransactionKind::Expense, amount, category, date)
}

fn transaction(id: &str, kind: TransactionKind, amount: i64, label: &str, date: Date) -> Transaction {
    Transaction {
        id: id.to_owned(),
        owner_id: TEST_OWNER.to_owned(),
        kind,
        amount,
        label: label.to_owned(),
        date,
        title: None,
        notes: None,
    }
}

pub fn ledger_entry(
    id: &str,
    direction: Direction,
    person: &str,
    amount: i64,
    date: Date,
) -> LedgerEntry {
    LedgerEntry {
        id: id.to_owned(),
        owner_id: TEST_OWNER.to_owned(),
        direction,
        person: person.to_owned(),
        amount,
        payment_method: PaymentMethod::Cash,
        date,
        notes: None,
    }
}
