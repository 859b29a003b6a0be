//! Khata book views: per-person net balances, month and day groups, and pages.

use std::collections::BTreeMap;

use serde::Serialize;
use time::Date;

use crate::{
    Error,
    bucket::BucketKey,
    model::{Direction, LedgerEntry, MinorUnits},
};

/// How much was taken from and given to one person.
///
/// A positive `net` means the user took more than they gave and owes the
/// person. A negative `net` means the person owes the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    /// The other party.
    pub person: String,
    /// The sum of entries where the user received money.
    pub taken: MinorUnits,
    /// The sum of entries where the user handed money over.
    pub given: MinorUnits,
    /// `taken - given`.
    pub net: MinorUnits,
}

/// Taken, given and net over every person.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerTotals {
    /// The sum of all taken entries.
    pub taken: MinorUnits,
    /// The sum of all given entries.
    pub given: MinorUnits,
    /// `taken - given`.
    pub net: MinorUnits,
}

impl LedgerTotals {
    fn add(&mut self, entry: &LedgerEntry) {
        match entry.direction {
            Direction::Taken => self.taken += entry.amount,
            Direction::Given => self.given += entry.amount,
        }
        self.net = self.taken - self.given;
    }
}

/// The ledger entries of a single day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerDay {
    /// The day.
    pub date: Date,
    /// The entries on `date`.
    pub entries: Vec<LedgerEntry>,
}

/// The ledger entries of a calendar month, split into days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerMonth {
    /// The month.
    pub month: BucketKey,
    /// Totals over the month.
    pub totals: LedgerTotals,
    /// The days with entries, newest first.
    pub days: Vec<LedgerDay>,
}

/// One page of ledger entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerPage {
    /// The entries on this page, newest first.
    pub entries: Vec<LedgerEntry>,
    /// The 1-based page number.
    pub page: u64,
    /// The number of pages, at least 1.
    pub page_count: u64,
    /// The number of entries over all pages.
    pub total_entries: u64,
}

/// Net the entries per person, sorted by person name.
pub fn net_by_person(entries: &[LedgerEntry]) -> Vec<LedgerSummary> {
    let mut by_person: BTreeMap<&str, LedgerTotals> = BTreeMap::new();

    for entry in entries {
        by_person.entry(&entry.person).or_default().add(entry);
    }

    by_person
        .into_iter()
        .map(|(person, totals)| LedgerSummary {
            person: person.to_owned(),
            taken: totals.taken,
            given: totals.given,
            net: totals.net,
        })
        .collect()
}

/// Taken, given and net over all `entries`.
pub fn ledger_totals(entries: &[LedgerEntry]) -> LedgerTotals {
    let mut totals = LedgerTotals::default();

    for entry in entries {
        totals.add(entry);
    }

    totals
}

/// Group entries by month and then by day, newest first.
///
/// Entries on the same day are ordered by id.
pub fn group_by_month(entries: &[LedgerEntry]) -> Vec<LedgerMonth> {
    let mut months: Vec<LedgerMonth> = Vec::new();

    for entry in newest_first(entries) {
        let key = BucketKey::Month {
            year: entry.date.year(),
            month: entry.date.month() as u8,
        };

        match months.last_mut() {
            Some(current) if current.month == key => {
                current.totals.add(&entry);
                push_to_day(&mut current.days, entry);
            }
            _ => {
                let mut totals = LedgerTotals::default();
                totals.add(&entry);
                months.push(LedgerMonth {
                    month: key,
                    totals,
                    days: vec![LedgerDay {
                        date: entry.date,
                        entries: vec![entry],
                    }],
                });
            }
        }
    }

    months
}

fn push_to_day(days: &mut Vec<LedgerDay>, entry: LedgerEntry) {
    match days.last_mut() {
        Some(current) if current.date == entry.date => current.entries.push(entry),
        _ => days.push(LedgerDay {
            date: entry.date,
            entries: vec![entry],
        }),
    }
}

/// Get page `page` (1-based) of `entries` ordered newest first.
///
/// A page past the end is empty.
///
/// # Errors
/// Returns [Error::Configuration] if `page` or `page_size` is zero.
pub fn page(entries: &[LedgerEntry], page: u64, page_size: u64) -> Result<LedgerPage, Error> {
    if page == 0 {
        return Err(Error::Configuration("page numbers start at 1".to_owned()));
    }

    if page_size == 0 {
        return Err(Error::Configuration(
            "the page size must be greater than zero".to_owned(),
        ));
    }

    let total_entries = entries.len() as u64;
    let page_count = total_entries.div_ceil(page_size).max(1);
    let offset = (page - 1).saturating_mul(page_size);

    let entries = newest_first(entries)
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(usize::try_from(page_size).unwrap_or(usize::MAX))
        .collect();

    Ok(LedgerPage {
        entries,
        page,
        page_count,
        total_entries,
    })
}

fn newest_first(entries: &[LedgerEntry]) -> Vec<LedgerEntry> {
    let mut ordered = entries.to_vec();
    ordered.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
    ordered
}
