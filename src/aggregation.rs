//! Per-bucket totals and category breakdowns.
//!
//! Turns bucketed transactions into [BucketSummary]s: income and expense
//! totals, the net amount, and the share of each expense category and income
//! source within the bucket.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::{
    bucket::{Bucket, Bucketed},
    model::{MinorUnits, Transaction, TransactionKind},
};

/// The summed amount of one label within a bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAggregate {
    /// The expense category or income source.
    pub label: String,
    /// The summed amount in minor units.
    pub amount: MinorUnits,
    /// `amount` divided by the bucket total of the same kind, 0 if that
    /// total is 0.
    pub share: f64,
}

/// The totals of one bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketSummary {
    /// The interval summarized.
    #[serde(flatten)]
    pub bucket: Bucket,
    /// The sum of income amounts.
    pub income_total: MinorUnits,
    /// The sum of expense amounts.
    pub expense_total: MinorUnits,
    /// `income_total - expense_total`.
    pub net: MinorUnits,
    /// Expenses grouped by category, largest first.
    pub categories: Vec<CategoryAggregate>,
    /// Incomes grouped by source, largest first.
    pub sources: Vec<CategoryAggregate>,
}

impl BucketSummary {
    /// A summary with zero totals for a bucket without transactions.
    pub fn empty(bucket: Bucket) -> Self {
        Self {
            bucket,
            income_total: 0,
            expense_total: 0,
            net: 0,
            categories: Vec::new(),
            sources: Vec::new(),
        }
    }

    /// The expense category with the largest amount. Ties go to the label
    /// that sorts first.
    pub fn top_category(&self) -> Option<&CategoryAggregate> {
        self.categories.first()
    }
}

/// Summarize every bucket, in bucket order.
pub fn aggregate(bucketed: &Bucketed) -> Vec<BucketSummary> {
    bucketed
        .iter()
        .map(|(bucket, transactions)| summarize_bucket(*bucket, transactions))
        .collect()
}

/// Summarize the `transactions` of a single `bucket`.
pub fn summarize_bucket(bucket: Bucket, transactions: &[&Transaction]) -> BucketSummary {
    let income_total = total_of_kind(transactions, TransactionKind::Income);
    let expense_total = total_of_kind(transactions, TransactionKind::Expense);

    BucketSummary {
        bucket,
        income_total,
        expense_total,
        net: income_total - expense_total,
        categories: group_by_label(transactions, TransactionKind::Expense, expense_total),
        sources: group_by_label(transactions, TransactionKind::Income, income_total),
    }
}

/// Add a zero summary for each bucket in `buckets` that has none, keeping
/// bucket order.
pub fn with_empty_buckets(summaries: Vec<BucketSummary>, buckets: &[Bucket]) -> Vec<BucketSummary> {
    let present: HashSet<Bucket> = summaries.iter().map(|summary| summary.bucket).collect();

    let mut filled: Vec<BucketSummary> = buckets
        .iter()
        .filter(|bucket| !present.contains(bucket))
        .map(|bucket| BucketSummary::empty(*bucket))
        .chain(summaries)
        .collect();

    filled.sort_by_key(|summary| summary.bucket);
    filled
}

fn total_of_kind(transactions: &[&Transaction], kind: TransactionKind) -> MinorUnits {
    transactions
        .iter()
        .filter(|transaction| transaction.kind == kind)
        .map(|transaction| transaction.amount)
        .sum()
}

/// Sum the amounts of `kind` per label, sorted by descending amount and then
/// by label.
fn group_by_label(
    transactions: &[&Transaction],
    kind: TransactionKind,
    total: MinorUnits,
) -> Vec<CategoryAggregate> {
    let mut totals_by_label: BTreeMap<&str, MinorUnits> = BTreeMap::new();

    for transaction in transactions.iter().filter(|t| t.kind == kind) {
        *totals_by_label.entry(transaction.label.as_str()).or_insert(0) += transaction.amount;
    }

    let mut aggregates: Vec<CategoryAggregate> = totals_by_label
        .into_iter()
        .map(|(label, amount)| CategoryAggregate {
            label: label.to_owned(),
            amount,
            share: share_of(amount, total),
        })
        .collect();

    aggregates.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.label.cmp(&b.label)));
    aggregates
}

fn share_of(amount: MinorUnits, total: MinorUnits) -> f64 {
    if total == 0 {
        0.0
    } else {
        amount as f64 / total as f64
    }
}
