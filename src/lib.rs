//! Khata is a personal finance tracker: income, expenses and a khata book
//! of money given to and taken from other people.
//!
//! This library is the reporting engine. It turns the raw records of one
//! user into time-bucketed totals, category breakdowns, wallet balances and
//! per-person ledger balances.
//!
//! Records flow through a fixed pipeline:
//!
//! 1. A [RecordStore] hands over raw records.
//! 2. The normalizers turn them into [Transaction]s and [LedgerEntry]s, and
//!    collect malformed records as [SkippedRecord]s.
//! 3. A [Predicate] selects the records of interest.
//! 4. Transactions are grouped into [Bucket]s and summarized into
//!    [BucketSummary]s, which feed the balance calculator.
//! 5. Ledger entries are netted per person.
//!
//! [ReportService] runs the pipeline for a [Session].

#![warn(missing_docs)]

mod activity;
mod aggregation;
mod balance;
mod bucket;
mod cancel;
mod config;
mod date_range;
mod db;
mod error;
mod filter;
mod format;
mod logging;
mod model;
mod netting;
mod normalize;
mod record_id;
mod report;
mod service;
mod session;
mod store;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use activity::{Activity, DEFAULT_ACTIVITY_LIMIT, recent_activity};
pub use aggregation::{
    BucketSummary, CategoryAggregate, aggregate, summarize_bucket, with_empty_buckets,
};
pub use balance::{
    BalanceReport, CarryForwardPolicy, MonthlySavings, RunningBalance, WalletSnapshot,
    compute_balance, lifetime_balance, monthly_savings, running_balances, today_expense,
    wallet_snapshot,
};
pub use bucket::{Bucket, BucketKey, BucketSpec, Bucketed, Granularity, WeekPolicy, bucket, bucket_with};
pub use cancel::CancellationToken;
pub use config::ReportConfig;
pub use date_range::{DateRange, ROLLING_WEEK_DAYS, SUPPORTED_DATES};
pub use db::initialize as initialize_db;
pub use error::{Error, ValidationError};
pub use filter::{Filterable, Predicate, filter};
pub use format::format_minor_units;
pub use logging::setup_logging;
pub use model::{
    Direction, EXPENSE_CATEGORIES, LedgerEntry, MAX_AMOUNT, MinorUnits, PaymentMethod, RawExpense,
    RawIncome, RawLedgerEntry, RawTransaction, Transaction, TransactionKind, UNCATEGORIZED_LABEL,
};
pub use netting::{
    LedgerDay, LedgerMonth, LedgerPage, LedgerSummary, LedgerTotals, group_by_month,
    ledger_totals, net_by_person, page as ledger_page,
};
pub use normalize::{
    Normalized, RecordSource, SkippedRecord, normalize_ledger, normalize_records,
    normalize_transactions,
};
pub use record_id::{OwnerId, RecordId};
pub use report::{Report, SummaryQuery, summarize, summarize_balance, summarize_wallet};
pub use service::ReportService;
pub use session::Session;
pub use store::{LedgerQuery, RecordStore, SQLiteRecordStore};
