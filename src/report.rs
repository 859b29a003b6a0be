//! The report pipeline: filter, bucket, aggregate and balance.
//!
//! Every function here is a pure function of its inputs. The
//! [CancellationToken] is checked before each pass.

use serde::Serialize;
use time::Date;

use crate::{
    Error,
    aggregation::{BucketSummary, aggregate, with_empty_buckets},
    balance::{BalanceReport, CarryForwardPolicy, WalletSnapshot, compute_balance, wallet_snapshot},
    bucket::{BucketSpec, Granularity, WeekPolicy, bucket_with},
    cancel::CancellationToken,
    date_range::DateRange,
    filter::{Predicate, filter},
    model::Transaction,
    normalize::SkippedRecord,
};

/// A report value together with the records left out of it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report<T> {
    /// The report.
    pub value: T,
    /// Records that failed validation and were not counted.
    pub skipped: Vec<SkippedRecord>,
}

impl<T> Report<T> {
    /// Apply `f` to the value and keep the skipped records.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Report<U> {
        Report {
            value: f(self.value),
            skipped: self.skipped,
        }
    }
}

/// What to summarize and how to bucket it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryQuery {
    /// The dates to include. Replaces any date range set on `predicate`.
    pub range: DateRange,
    /// The bucket size.
    pub granularity: Granularity,
    /// Required for [Granularity::Week], forbidden otherwise.
    pub week_policy: Option<WeekPolicy>,
    /// Further conditions on the transactions.
    pub predicate: Predicate,
    /// Whether buckets without transactions get a zero summary.
    pub include_empty: bool,
}

impl SummaryQuery {
    /// Summarize every transaction in `range` by `granularity`.
    pub fn new(range: DateRange, granularity: Granularity) -> Self {
        Self {
            range,
            granularity,
            week_policy: None,
            predicate: Predicate::new(),
            include_empty: false,
        }
    }

    /// Use `policy` for week buckets.
    pub fn week_policy(mut self, policy: WeekPolicy) -> Self {
        self.week_policy = Some(policy);
        self
    }

    /// Only summarize transactions matching `predicate`.
    pub fn predicate(mut self, predicate: Predicate) -> Self {
        self.predicate = predicate;
        self
    }

    /// Add zero summaries for buckets without transactions.
    pub fn include_empty(mut self) -> Self {
        self.include_empty = true;
        self
    }
}

/// Filter, bucket and aggregate `transactions` as described by `query`.
///
/// # Errors
/// Returns [Error::Configuration] for an invalid granularity and week policy
/// combination, [Error::DateOutOfRange] if the range reaches past the
/// calendar, or [Error::Cancelled] if `token` fires.
pub fn summarize(
    transactions: &[Transaction],
    query: &SummaryQuery,
    reference_date: Date,
    token: &CancellationToken,
) -> Result<Vec<BucketSummary>, Error> {
    let spec = BucketSpec::new(query.granularity, query.week_policy, reference_date)?;

    token.check()?;
    let predicate = query.predicate.clone().date_range(query.range);
    let selected = filter(transactions, &predicate);

    token.check()?;
    let bucketed = bucket_with(&spec, &selected)?;

    token.check()?;
    let summaries = aggregate(&bucketed);

    tracing::debug!(
        "summarized {} of {} transactions into {} {} buckets",
        selected.len(),
        transactions.len(),
        summaries.len(),
        query.granularity.label().to_lowercase()
    );

    if query.include_empty {
        Ok(with_empty_buckets(summaries, &spec.covering(query.range)?))
    } else {
        Ok(summaries)
    }
}

/// Summarize every transaction by month.
fn all_months(
    transactions: &[Transaction],
    reference_date: Date,
    token: &CancellationToken,
) -> Result<Vec<BucketSummary>, Error> {
    let spec = BucketSpec::new(Granularity::Month, None, reference_date)?;

    token.check()?;
    let bucketed = bucket_with(&spec, transactions)?;

    token.check()?;
    Ok(aggregate(&bucketed))
}

/// The lifetime balance, running balances and savings of every month.
///
/// # Errors
/// Returns [Error::Cancelled] if `token` fires.
pub fn summarize_balance(
    transactions: &[Transaction],
    reference_date: Date,
    policy: CarryForwardPolicy,
    token: &CancellationToken,
) -> Result<BalanceReport, Error> {
    let monthly = all_months(transactions, reference_date, token)?;

    token.check()?;
    compute_balance(&monthly, policy)
}

/// The wallet figures as of `reference_date`.
///
/// # Errors
/// Returns [Error::Cancelled] if `token` fires.
pub fn summarize_wallet(
    transactions: &[Transaction],
    reference_date: Date,
    policy: CarryForwardPolicy,
    token: &CancellationToken,
) -> Result<WalletSnapshot, Error> {
    let monthly = all_months(transactions, reference_date, token)?;
    let daily = summarize(
        transactions,
        &SummaryQuery::new(DateRange::day(reference_date), Granularity::Day),
        reference_date,
        token,
    )?;

    token.check()?;
    wallet_snapshot(&monthly, &daily, reference_date, policy)
}
