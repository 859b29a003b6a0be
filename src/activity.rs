//! The recent activity feed shown on the wallet page.

use serde::Serialize;
use time::Date;

use crate::{
    model::{MinorUnits, Transaction, TransactionKind},
    record_id::RecordId,
};

/// The number of items shown when the caller does not choose.
pub const DEFAULT_ACTIVITY_LIMIT: usize = 5;

/// A transaction as shown in the activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// The transaction this item shows.
    pub id: RecordId,
    /// Income or expense.
    pub kind: TransactionKind,
    /// The text shown for the item.
    pub title: String,
    /// The expense category or income source.
    pub label: String,
    /// Positive for income, negative for expenses.
    pub signed_amount: MinorUnits,
    /// The day of the transaction.
    pub date: Date,
}

impl From<&Transaction> for Activity {
    fn from(transaction: &Transaction) -> Self {
        let title = match transaction.kind {
            TransactionKind::Income => transaction.label.clone(),
            TransactionKind::Expense => transaction
                .title
                .clone()
                .unwrap_or_else(|| "Expense".to_owned()),
        };

        Self {
            id: transaction.id.clone(),
            kind: transaction.kind,
            title,
            label: transaction.label.clone(),
            signed_amount: transaction.signed_amount(),
            date: transaction.date,
        }
    }
}

/// The `limit` most recent transactions, newest first. Transactions on the
/// same day are ordered by id.
pub fn recent_activity(transactions: &[Transaction], limit: usize) -> Vec<Activity> {
    let mut ordered: Vec<&Transaction> = transactions.iter().collect();
    ordered.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));

    ordered.into_iter().take(limit).map(Activity::from).collect()
}
