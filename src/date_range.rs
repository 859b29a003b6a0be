//! Inclusive calendar date ranges.

use serde::Serialize;
use time::{Date, Duration, Month, macros::date};

use crate::Error;

/// The number of days in a rolling week, including the reference day.
pub const ROLLING_WEEK_DAYS: i64 = 7;

/// The dates a record may carry.
///
/// Every bucket containing one of these dates starts and ends on a
/// representable date. Records dated outside are skipped by the normalizers.
pub const SUPPORTED_DATES: DateRange = DateRange {
    start: date!(1900 - 01 - 01),
    end: date!(9998 - 12 - 31),
};

/// A range of calendar dates including both `start` and `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// The first date in the range.
    pub start: Date,
    /// The last date in the range.
    pub end: Date,
}

impl DateRange {
    /// Create a range from `start` to `end`, both inclusive.
    ///
    /// # Errors
    /// Returns [Error::Configuration] if `end` is before `start`.
    pub fn new(start: Date, end: Date) -> Result<Self, Error> {
        if end < start {
            return Err(Error::Configuration(format!(
                "the date range ends ({end}) before it starts ({start})"
            )));
        }

        Ok(Self { start, end })
    }

    /// The range containing only `date`.
    pub fn day(date: Date) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// The seven days ending on `reference_date`, inclusive.
    ///
    /// # Errors
    /// Returns [Error::DateOutOfRange] if the first day is not representable.
    pub fn rolling_week(reference_date: Date) -> Result<Self, Error> {
        let start = reference_date
            .checked_sub(Duration::days(ROLLING_WEEK_DAYS - 1))
            .ok_or(Error::DateOutOfRange(reference_date))?;

        Ok(Self {
            start,
            end: reference_date,
        })
    }

    /// The calendar month `month` of `year`.
    ///
    /// # Errors
    /// Returns [Error::Configuration] if the month is not representable.
    pub fn month(year: i32, month: Month) -> Result<Self, Error> {
        let start = first_of_month(year, month);
        let end = first_of_month(next_month_year(year, month), month.next())
            .and_then(Date::previous_day);

        match (start, end) {
            (Some(start), Some(end)) => Ok(Self { start, end }),
            _ => Err(Error::Configuration(format!(
                "{month} {year} is outside the supported dates"
            ))),
        }
    }

    /// The calendar year `year`.
    ///
    /// # Errors
    /// Returns [Error::Configuration] if the year is not representable.
    pub fn year(year: i32) -> Result<Self, Error> {
        let start = first_of_month(year, Month::January);
        let end = first_of_month(year + 1, Month::January).and_then(Date::previous_day);

        match (start, end) {
            (Some(start), Some(end)) => Ok(Self { start, end }),
            _ => Err(Error::Configuration(format!(
                "the year {year} is outside the supported dates"
            ))),
        }
    }

    /// Whether `date` lies within the range.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The first day of `month` in `year`, if `year` is representable.
pub(crate) fn first_of_month(year: i32, month: Month) -> Option<Date> {
    Date::from_calendar_date(year, month, 1).ok()
}

/// The year of the month after `month` in `year`.
pub(crate) fn next_month_year(year: i32, month: Month) -> i32 {
    if month == Month::December { year + 1 } else { year }
}

#[cfg(test)]
mod tests {
    use time::{Date, Month, macros::date};

    use super::{DateRange, SUPPORTED_DATES};
    use crate::Error;

    #[test]
    fn rejects_inverted_ranges() {
        let result = DateRange::new(date!(2024 - 02 - 01), date!(2024 - 01 - 01));

        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn rolling_week_spans_seven_days() {
        let range = DateRange::rolling_week(date!(2024 - 01 - 10)).unwrap();

        assert_eq!(range.start, date!(2024 - 01 - 04));
        assert_eq!(range.end, date!(2024 - 01 - 10));
        assert!(range.contains(date!(2024 - 01 - 04)));
        assert!(!range.contains(date!(2024 - 01 - 03)));
    }

    #[test]
    fn month_handles_leap_years_and_december() {
        assert_eq!(
            DateRange::month(2024, Month::February).unwrap(),
            DateRange {
                start: date!(2024 - 02 - 01),
                end: date!(2024 - 02 - 29)
            }
        );
        assert_eq!(
            DateRange::month(2023, Month::December).unwrap(),
            DateRange {
                start: date!(2023 - 12 - 01),
                end: date!(2023 - 12 - 31)
            }
        );
    }

    #[test]
    fn year_covers_whole_year() {
        assert_eq!(
            DateRange::year(2024).unwrap(),
            DateRange {
                start: date!(2024 - 01 - 01),
                end: date!(2024 - 12 - 31)
            }
        );
    }

    #[test]
    fn year_past_the_calendar_is_an_error() {
        assert!(matches!(DateRange::year(9999), Err(Error::Configuration(_))));
        assert!(matches!(
            DateRange::month(9999, Month::December),
            Err(Error::Configuration(_))
        ));
        assert_eq!(
            DateRange::month(9999, Month::November).unwrap().end,
            date!(9999 - 11 - 30)
        );
    }

    #[test]
    fn rolling_week_at_the_first_date_is_an_error() {
        assert_eq!(
            DateRange::rolling_week(Date::MIN),
            Err(Error::DateOutOfRange(Date::MIN))
        );
    }

    #[test]
    fn supported_dates_span_whole_years() {
        assert_eq!(SUPPORTED_DATES.start, date!(1900 - 01 - 01));
        assert_eq!(SUPPORTED_DATES.end, DateRange::year(9998).unwrap().end);
    }
}
