//! Wallet balances and monthly savings.
//!
//! Works on [BucketSummary]s produced by the aggregator. Monthly savings need
//! month buckets and today's expense needs day buckets; passing summaries of
//! another granularity is a configuration error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::{
    Error,
    aggregation::BucketSummary,
    bucket::{BucketKey, Granularity},
    model::MinorUnits,
};

/// Whether a month without income (or expenses) borrows the previous month's
/// figure when computing savings.
///
/// Both are off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CarryForwardPolicy {
    /// Use last month's income for a month with zero income.
    pub income: bool,
    /// Use last month's expenses for a month with zero expenses.
    pub expense: bool,
}

impl CarryForwardPolicy {
    /// Carry income forward and leave expenses as recorded.
    pub fn income_only() -> Self {
        Self {
            income: true,
            expense: false,
        }
    }
}

/// The savings of one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySavings {
    /// The month.
    pub month: BucketKey,
    /// The income recorded in the month.
    pub income_total: MinorUnits,
    /// The expenses recorded in the month.
    pub expense_total: MinorUnits,
    /// The income used for savings after carry-forward.
    pub effective_income: MinorUnits,
    /// The expenses used for savings after carry-forward.
    pub effective_expense: MinorUnits,
    /// `effective_income - effective_expense`.
    pub savings: MinorUnits,
    /// Whether `effective_income` came from the previous month.
    pub income_carried_forward: bool,
    /// Whether `effective_expense` came from the previous month.
    pub expense_carried_forward: bool,
}

/// The balance after a bucket, counting every earlier bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningBalance {
    /// The bucket.
    pub bucket_key: BucketKey,
    /// The cumulative net up to and including the bucket.
    pub balance: MinorUnits,
}

/// Balances and savings over a set of month summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceReport {
    /// The sum of `net` over every month.
    pub lifetime_balance: MinorUnits,
    /// The running balance after each month, oldest first.
    pub running_balances: Vec<RunningBalance>,
    /// The savings of each month, oldest first.
    pub months: Vec<MonthlySavings>,
}

/// The figures shown on the wallet page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSnapshot {
    /// The sum of income minus expenses over all time.
    pub lifetime_balance: MinorUnits,
    /// This month's income after carry-forward.
    pub monthly_income: MinorUnits,
    /// This month's expenses after carry-forward.
    pub monthly_expense: MinorUnits,
    /// `monthly_income - monthly_expense`.
    pub monthly_savings: MinorUnits,
    /// The expenses recorded on the reference date.
    pub today_expense: MinorUnits,
    /// Whether `monthly_income` is last month's income.
    pub income_carried_forward: bool,
    /// Whether `monthly_expense` is last month's expenses.
    pub expense_carried_forward: bool,
}

/// Compute the lifetime balance, running balances and monthly savings.
///
/// `monthly` should hold every month ever recorded for the lifetime balance
/// to be meaningful.
///
/// # Errors
/// Returns [Error::Configuration] if any summary is not a month bucket.
pub fn compute_balance(
    monthly: &[BucketSummary],
    policy: CarryForwardPolicy,
) -> Result<BalanceReport, Error> {
    ensure_granularity(monthly, Granularity::Month)?;

    let mut ordered: Vec<&BucketSummary> = monthly.iter().collect();
    ordered.sort_by_key(|summary| summary.bucket.key);

    let by_month = index_by_key(monthly);
    let months = ordered
        .iter()
        .map(|summary| savings_for(&by_month, summary.bucket.key, policy))
        .collect();

    Ok(BalanceReport {
        lifetime_balance: lifetime_balance(monthly),
        running_balances: running_balances(monthly),
        months,
    })
}

/// The sum of `net` over all `summaries`.
pub fn lifetime_balance(summaries: &[BucketSummary]) -> MinorUnits {
    summaries.iter().map(|summary| summary.net).sum()
}

/// The cumulative balance after each bucket, in bucket order.
pub fn running_balances(summaries: &[BucketSummary]) -> Vec<RunningBalance> {
    let mut ordered: Vec<&BucketSummary> = summaries.iter().collect();
    ordered.sort_by_key(|summary| summary.bucket.key);

    let mut balance = 0;

    ordered
        .into_iter()
        .map(|summary| {
            balance += summary.net;
            RunningBalance {
                bucket_key: summary.bucket.key,
                balance,
            }
        })
        .collect()
}

/// The savings of `month` in `year`.
///
/// Months without a summary count as having no income and no expenses.
///
/// # Errors
/// Returns [Error::Configuration] if any summary is not a month bucket.
pub fn monthly_savings(
    monthly: &[BucketSummary],
    year: i32,
    month: Month,
    policy: CarryForwardPolicy,
) -> Result<MonthlySavings, Error> {
    ensure_granularity(monthly, Granularity::Month)?;

    let key = BucketKey::Month {
        year,
        month: month as u8,
    };

    Ok(savings_for(&index_by_key(monthly), key, policy))
}

/// The expenses recorded on `reference_date`.
///
/// # Errors
/// Returns [Error::Configuration] if any summary is not a day bucket.
pub fn today_expense(daily: &[BucketSummary], reference_date: Date) -> Result<MinorUnits, Error> {
    ensure_granularity(daily, Granularity::Day)?;

    Ok(daily
        .iter()
        .find(|summary| summary.bucket.contains(reference_date))
        .map_or(0, |summary| summary.expense_total))
}

/// Build the wallet figures for the month containing `reference_date`.
///
/// # Errors
/// Returns [Error::Configuration] if `monthly` holds anything other than month
/// buckets or `daily` anything other than day buckets.
pub fn wallet_snapshot(
    monthly: &[BucketSummary],
    daily: &[BucketSummary],
    reference_date: Date,
    policy: CarryForwardPolicy,
) -> Result<WalletSnapshot, Error> {
    let this_month = monthly_savings(
        monthly,
        reference_date.year(),
        reference_date.month(),
        policy,
    )?;

    Ok(WalletSnapshot {
        lifetime_balance: lifetime_balance(monthly),
        monthly_income: this_month.effective_income,
        monthly_expense: this_month.effective_expense,
        monthly_savings: this_month.savings,
        today_expense: today_expense(daily, reference_date)?,
        income_carried_forward: this_month.income_carried_forward,
        expense_carried_forward: this_month.expense_carried_forward,
    })
}

fn ensure_granularity(summaries: &[BucketSummary], expected: Granularity) -> Result<(), Error> {
    match summaries
        .iter()
        .find(|summary| summary.bucket.granularity != expected)
    {
        Some(summary) => Err(Error::Configuration(format!(
            "expected {} buckets but got a {} bucket ({})",
            expected.label().to_lowercase(),
            summary.bucket.granularity.label().to_lowercase(),
            summary.bucket.key
        ))),
        None => Ok(()),
    }
}

fn index_by_key(summaries: &[BucketSummary]) -> HashMap<BucketKey, &BucketSummary> {
    summaries
        .iter()
        .map(|summary| (summary.bucket.key, summary))
        .collect()
}

fn previous_month(key: BucketKey) -> Option<BucketKey> {
    match key {
        BucketKey::Month { year, month: 1 } => Some(BucketKey::Month {
            year: year - 1,
            month: 12,
        }),
        BucketKey::Month { year, month } => Some(BucketKey::Month {
            year,
            month: month - 1,
        }),
        _ => None,
    }
}

fn savings_for(
    by_month: &HashMap<BucketKey, &BucketSummary>,
    key: BucketKey,
    policy: CarryForwardPolicy,
) -> MonthlySavings {
    let totals = |key: BucketKey| {
        by_month
            .get(&key)
            .map_or((0, 0), |summary| (summary.income_total, summary.expense_total))
    };

    let (income_total, expense_total) = totals(key);
    let (previous_income, previous_expense) = previous_month(key).map_or((0, 0), totals);

    let income_carried_forward = policy.income && income_total == 0;
    let expense_carried_forward = policy.expense && expense_total == 0;

    let effective_income = if income_carried_forward {
        previous_income
    } else {
        income_total
    };
    let effective_expense = if expense_carried_forward {
        previous_expense
    } else {
        expense_total
    };

    MonthlySavings {
        month: key,
        income_total,
        expense_total,
        effective_income,
        effective_expense,
        savings: effective_income - effective_expense,
        income_carried_forward,
        expense_carried_forward,
    }
}

#[cfg(test)]
mod tests {
    use time::{Month, macros::date};

    use super::{CarryForwardPolicy, compute_balance, monthly_savings, today_expense, wallet_snapshot};
    use crate::{
        Error,
        aggregation::{BucketSummary, aggregate},
        bucket::{Granularity, bucket},
        model::Transaction,
        test_utils::{expense, income},
    };

    fn summaries(transactions: &[Transaction], granularity: Granularity) -> Vec<BucketSummary> {
        let bucketed = bucket(transactions, granularity, date!(2024 - 02 - 20), None).unwrap();
        aggregate(&bucketed)
    }

    fn january_income_february_expense() -> Vec<Transaction> {
        vec![
            income("i1", 2000, "Salary", date!(2024 - 01 - 10)),
            expense("e1", 500, "Food", date!(2024 - 02 - 15)),
        ]
    }

    #[test]
    fn carry_forward_on_uses_previous_month_income() {
        let monthly = summaries(&january_income_february_expense(), Granularity::Month);

        let february = monthly_savings(
            &monthly,
            2024,
            Month::February,
            CarryForwardPolicy::income_only(),
        )
        .unwrap();

        assert_eq!(february.savings, 1500);
        assert_eq!(february.effective_income, 2000);
        assert!(february.income_carried_forward);
    }

    #[test]
    fn carry_forward_off_uses_recorded_income() {
        let monthly = summaries(&january_income_february_expense(), Granularity::Month);

        let february =
            monthly_savings(&monthly, 2024, Month::February, CarryForwardPolicy::default()).unwrap();

        assert_eq!(february.savings, -500);
        assert!(!february.income_carried_forward);
    }

    #[test]
    fn carry_forward_does_not_apply_when_month_has_income() {
        let mut transactions = january_income_february_expense();
        transactions.push(income("i2", 100, "Gift", date!(2024 - 02 - 01)));
        let monthly = summaries(&transactions, Granularity::Month);

        let february = monthly_savings(
            &monthly,
            2024,
            Month::February,
            CarryForwardPolicy::income_only(),
        )
        .unwrap();

        assert_eq!(february.savings, -400);
        assert!(!february.income_carried_forward);
    }

    #[test]
    fn carry_forward_crosses_year_boundary() {
        let transactions = vec![
            income("i1", 3000, "Salary", date!(2023 - 12 - 28)),
            expense("e1", 1000, "Rent", date!(2024 - 01 - 02)),
        ];
        let monthly = summaries(&transactions, Granularity::Month);

        let january = monthly_savings(
            &monthly,
            2024,
            Month::January,
            CarryForwardPolicy::income_only(),
        )
        .unwrap();

        assert_eq!(january.savings, 2000);
    }

    #[test]
    fn expense_carry_forward_is_separate() {
        let transactions = vec![
            expense("e1", 800, "Rent", date!(2024 - 01 - 02)),
            income("i1", 1000, "Salary", date!(2024 - 02 - 01)),
        ];
        let monthly = summaries(&transactions, Granularity::Month);

        let income_only = monthly_savings(
            &monthly,
            2024,
            Month::February,
            CarryForwardPolicy::income_only(),
        )
        .unwrap();
        assert_eq!(income_only.savings, 1000);

        let both = monthly_savings(
            &monthly,
            2024,
            Month::February,
            CarryForwardPolicy {
                income: true,
                expense: true,
            },
        )
        .unwrap();
        assert_eq!(both.savings, 200);
        assert!(both.expense_carried_forward);
    }

    #[test]
    fn lifetime_balance_accumulates_every_month() {
        let transactions = vec![
            income("i1", 2000, "Salary", date!(2024 - 01 - 10)),
            expense("e1", 500, "Food", date!(2024 - 01 - 15)),
            expense("e2", 700, "Rent", date!(2024 - 02 - 01)),
            income("i2", 100, "Gift", date!(2024 - 03 - 01)),
        ];
        let monthly = summaries(&transactions, Granularity::Month);

        let report = compute_balance(&monthly, CarryForwardPolicy::default()).unwrap();

        assert_eq!(report.lifetime_balance, 900);
        let balances: Vec<_> = report.running_balances.iter().map(|b| b.balance).collect();
        assert_eq!(balances, vec![1500, 800, 900]);
        let savings: Vec<_> = report.months.iter().map(|m| m.savings).collect();
        assert_eq!(savings, vec![1500, -700, 100]);
    }

    #[test]
    fn rejects_non_monthly_summaries() {
        let daily = summaries(&january_income_february_expense(), Granularity::Day);

        let result = compute_balance(&daily, CarryForwardPolicy::default());

        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn today_expense_reads_reference_day() {
        let transactions = vec![
            expense("e1", 120, "Food", date!(2024 - 02 - 20)),
            expense("e2", 30, "Travel", date!(2024 - 02 - 20)),
            expense("e3", 999, "Rent", date!(2024 - 02 - 19)),
        ];
        let daily = summaries(&transactions, Granularity::Day);

        assert_eq!(today_expense(&daily, date!(2024 - 02 - 20)), Ok(150));
        assert_eq!(today_expense(&daily, date!(2024 - 02 - 21)), Ok(0));
    }

    #[test]
    fn wallet_snapshot_combines_figures() {
        let mut transactions = january_income_february_expense();
        transactions.push(expense("e2", 40, "Food", date!(2024 - 02 - 20)));
        let monthly = summaries(&transactions, Granularity::Month);
        let daily = summaries(&transactions, Granularity::Day);

        let snapshot = wallet_snapshot(
            &monthly,
            &daily,
            date!(2024 - 02 - 20),
            CarryForwardPolicy::income_only(),
        )
        .unwrap();

        assert_eq!(snapshot.lifetime_balance, 1460);
        assert_eq!(snapshot.monthly_income, 2000);
        assert_eq!(snapshot.monthly_expense, 540);
        assert_eq!(snapshot.monthly_savings, 1460);
        assert_eq!(snapshot.today_expense, 40);
        assert!(snapshot.income_carried_forward);
    }

    #[test]
    fn wallet_snapshot_for_empty_history_is_zero() {
        let snapshot =
            wallet_snapshot(&[], &[], date!(2024 - 02 - 20), CarryForwardPolicy::default()).unwrap();

        assert_eq!(snapshot.lifetime_balance, 0);
        assert_eq!(snapshot.monthly_savings, 0);
        assert_eq!(snapshot.today_expense, 0);
    }
}
