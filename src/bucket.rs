//! Assigns transactions to day, week, month and year buckets.
//!
//! Every bucket is a half-open interval `[start, end)` of calendar dates.
//! Dates are taken as written, no timezone conversion happens here.

use std::{collections::BTreeMap, fmt::Display};

use serde::{Deserialize, Serialize, Serializer};
use time::{Date, Duration, Month};

use crate::{
    Error,
    date_range::{DateRange, ROLLING_WEEK_DAYS, first_of_month, next_month_year},
    model::Transaction,
};

/// The size of the buckets to group transactions by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Granularity {
    /// One calendar day.
    Day,
    /// Seven days, see [WeekPolicy].
    Week,
    /// One calendar month.
    Month,
    /// One calendar year.
    Year,
}

impl Granularity {
    /// A human readable name for the granularity.
    pub fn label(self) -> &'static str {
        match self {
            Self::Day => "Day",
            Self::Week => "Week",
            Self::Month => "Month",
            Self::Year => "Year",
        }
    }
}

/// How weeks are laid out on the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum WeekPolicy {
    /// Weeks run from Sunday to Saturday.
    CalendarWeek,
    /// The current week is the seven days ending on the reference date.
    /// Earlier and later weeks are the seven day windows aligned to it.
    RollingWindow,
}

/// The stable key that identifies and orders a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BucketKey {
    /// A calendar day.
    Day(Date),
    /// A week, identified by its first day.
    Week(Date),
    /// A calendar month.
    Month {
        /// The calendar year.
        year: i32,
        /// The month number, 1 to 12.
        month: u8,
    },
    /// A calendar year.
    Year(i32),
}

impl Display for BucketKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Day(date) => write!(f, "{date}"),
            Self::Week(start) => match start.checked_add(Duration::days(ROLLING_WEEK_DAYS - 1)) {
                Some(end) => write!(f, "{start}..{end}"),
                None => write!(f, "{start}.."),
            },
            Self::Month { year, month } => write!(f, "{year:04}-{month:02}"),
            Self::Year(year) => write!(f, "{year:04}"),
        }
    }
}

impl Serialize for BucketKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A half-open interval of dates that transactions are grouped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    /// Orders and identifies the bucket.
    #[serde(rename = "bucketKey")]
    pub key: BucketKey,
    /// The size of the bucket.
    pub granularity: Granularity,
    /// The first date in the bucket.
    #[serde(rename = "rangeStart")]
    pub start: Date,
    /// The first date after the bucket.
    #[serde(rename = "rangeEnd")]
    pub end: Date,
}

impl Bucket {
    /// Whether `date` falls in the bucket.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date < self.end
    }
}

/// Transactions grouped by bucket, ordered by bucket key.
pub type Bucketed<'a> = BTreeMap<Bucket, Vec<&'a Transaction>>;

/// A validated combination of granularity, week policy and reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketSpec {
    granularity: Granularity,
    week_policy: Option<WeekPolicy>,
    reference_date: Date,
}

impl BucketSpec {
    /// Create a bucket layout.
    ///
    /// `reference_date` anchors [WeekPolicy::RollingWindow] weeks and is
    /// otherwise unused.
    ///
    /// # Errors
    /// Returns [Error::Configuration] if `granularity` is [Granularity::Week]
    /// and no `week_policy` is given, or if a `week_policy` is given for any
    /// other granularity.
    pub fn new(
        granularity: Granularity,
        week_policy: Option<WeekPolicy>,
        reference_date: Date,
    ) -> Result<Self, Error> {
        match (granularity, week_policy) {
            (Granularity::Week, None) => Err(Error::Configuration(
                "week buckets need a week policy (calendar-week or rolling-window)".to_owned(),
            )),
            (Granularity::Week, Some(_)) => Ok(()),
            (other, Some(policy)) => Err(Error::Configuration(format!(
                "the week policy {policy:?} cannot be used with {} buckets",
                other.label().to_lowercase()
            ))),
            (_, None) => Ok(()),
        }?;

        Ok(Self {
            granularity,
            week_policy,
            reference_date,
        })
    }

    /// The granularity of the buckets.
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// The bucket that `date` falls in.
    ///
    /// # Errors
    /// Returns [Error::DateOutOfRange] if the start or end of the bucket is not
    /// a representable date. Every date in [crate::SUPPORTED_DATES] has a bucket.
    pub fn bucket_of(&self, date: Date) -> Result<Bucket, Error> {
        let (key, start, end) = match (self.granularity, self.week_policy) {
            (Granularity::Day, _) => (BucketKey::Day(date), Some(date), date.next_day()),
            (Granularity::Week, Some(WeekPolicy::RollingWindow)) => {
                let start = rolling_week_start(date, self.reference_date)
                    .ok_or(Error::DateOutOfRange(date))?;
                (BucketKey::Week(start), Some(start), week_end(start))
            }
            (Granularity::Week, _) => {
                let start = calendar_week_start(date).ok_or(Error::DateOutOfRange(date))?;
                (BucketKey::Week(start), Some(start), week_end(start))
            }
            (Granularity::Month, _) => {
                let (year, month) = (date.year(), date.month());
                (
                    BucketKey::Month {
                        year,
                        month: month as u8,
                    },
                    first_of_month(year, month),
                    first_of_month(next_month_year(year, month), month.next()),
                )
            }
            (Granularity::Year, _) => (
                BucketKey::Year(date.year()),
                first_of_month(date.year(), Month::January),
                first_of_month(date.year() + 1, Month::January),
            ),
        };

        match (start, end) {
            (Some(start), Some(end)) => Ok(Bucket {
                key,
                granularity: self.granularity,
                start,
                end,
            }),
            _ => Err(Error::DateOutOfRange(date)),
        }
    }

    /// Every bucket that overlaps `range`, in order.
    ///
    /// # Errors
    /// Returns [Error::DateOutOfRange] if a bucket overlapping `range` cannot
    /// be represented.
    pub fn covering(&self, range: DateRange) -> Result<Vec<Bucket>, Error> {
        let mut buckets = Vec::new();
        let mut current = self.bucket_of(range.start)?;

        loop {
            buckets.push(current);

            if current.end > range.end {
                break;
            }

            current = self.bucket_of(current.end)?;
        }

        Ok(buckets)
    }
}

/// Group `transactions` into buckets of `granularity`.
///
/// `week_policy` must be given for [Granularity::Week] and only then.
/// Transactions keep their input order within a bucket. Filter out
/// transactions outside the range of interest before calling this.
///
/// # Errors
/// Returns [Error::Configuration] for an invalid granularity and week policy
/// combination, or [Error::DateOutOfRange] if a transaction has no bucket.
pub fn bucket(
    transactions: &[Transaction],
    granularity: Granularity,
    reference_date: Date,
    week_policy: Option<WeekPolicy>,
) -> Result<Bucketed<'_>, Error> {
    let spec = BucketSpec::new(granularity, week_policy, reference_date)?;

    bucket_with(&spec, transactions)
}

/// Group `transactions` using an already validated [BucketSpec].
///
/// # Errors
/// Returns [Error::DateOutOfRange] if a transaction has no bucket.
pub fn bucket_with<'a>(
    spec: &BucketSpec,
    transactions: &'a [Transaction],
) -> Result<Bucketed<'a>, Error> {
    let mut bucketed = Bucketed::new();

    for transaction in transactions {
        bucketed
            .entry(spec.bucket_of(transaction.date)?)
            .or_default()
            .push(transaction);
    }

    Ok(bucketed)
}

fn calendar_week_start(date: Date) -> Option<Date> {
    date.checked_sub(Duration::days(
        date.weekday().number_days_from_sunday() as i64,
    ))
}

fn rolling_week_start(date: Date, reference_date: Date) -> Option<Date> {
    let days_before_reference = (reference_date - date).whole_days();
    let weeks_back = days_before_reference.div_euclid(ROLLING_WEEK_DAYS);
    let window_end = reference_date.checked_sub(Duration::days(weeks_back * ROLLING_WEEK_DAYS))?;

    window_end.checked_sub(Duration::days(ROLLING_WEEK_DAYS - 1))
}

fn week_end(start: Date) -> Option<Date> {
    start.checked_add(Duration::days(ROLLING_WEEK_DAYS))
}
