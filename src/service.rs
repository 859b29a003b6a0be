//! The report service: fetch from a [RecordStore], normalize, then run the
//! report pipeline for one session.

use std::future::Future;

use time::Date;

use crate::{
    Error,
    activity::{Activity, recent_activity},
    aggregation::BucketSummary,
    balance::{BalanceReport, WalletSnapshot},
    cancel::CancellationToken,
    config::ReportConfig,
    filter::filter,
    model::{LedgerEntry, Transaction},
    netting::{LedgerMonth, LedgerPage, LedgerSummary, group_by_month, net_by_person, page},
    normalize::{Normalized, normalize_ledger, normalize_records},
    report::{self, Report, SummaryQuery},
    session::Session,
    store::{LedgerQuery, RecordStore},
};

/// Builds reports from the records in `S`.
///
/// Every call fetches a fresh snapshot from the store. Nothing is cached.
/// Records are scoped to the session owner by the store: the normalized
/// records carry the session's owner ID, not one read from the store.
#[derive(Debug, Clone)]
pub struct ReportService<S: RecordStore> {
    store: S,
    config: ReportConfig,
}

impl<S: RecordStore> ReportService<S> {
    /// Create a service reading from `store`.
    pub fn new(store: S, config: ReportConfig) -> Self {
        Self { store, config }
    }

    /// The config used for every report.
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Bucket summaries of the session owner's transactions.
    ///
    /// # Errors
    /// Returns [Error::Upstream] or [Error::UpstreamTimeout] if the fetch
    /// fails, [Error::Configuration] for an invalid query, or
    /// [Error::Cancelled] if `token` fires.
    pub async fn bucket_summaries(
        &self,
        session: &Session,
        query: &SummaryQuery,
        reference_date: Date,
        token: &CancellationToken,
    ) -> Result<Report<Vec<BucketSummary>>, Error> {
        let transactions = self.load_transactions(session, token).await?;

        let summaries = report::summarize(&transactions.records, query, reference_date, token)?;

        Ok(Report {
            value: summaries,
            skipped: transactions.skipped,
        })
    }

    /// The lifetime balance and monthly savings of the session owner.
    ///
    /// # Errors
    /// See [ReportService::bucket_summaries].
    pub async fn balance_report(
        &self,
        session: &Session,
        reference_date: Date,
        token: &CancellationToken,
    ) -> Result<Report<BalanceReport>, Error> {
        let transactions = self.load_transactions(session, token).await?;

        let balance = report::summarize_balance(
            &transactions.records,
            reference_date,
            self.config.carry_forward,
            token,
        )?;

        Ok(Report {
            value: balance,
            skipped: transactions.skipped,
        })
    }

    /// The wallet figures of the session owner as of `reference_date`.
    ///
    /// # Errors
    /// See [ReportService::bucket_summaries].
    pub async fn wallet_snapshot(
        &self,
        session: &Session,
        reference_date: Date,
        token: &CancellationToken,
    ) -> Result<Report<WalletSnapshot>, Error> {
        let transactions = self.load_transactions(session, token).await?;

        let snapshot = report::summarize_wallet(
            &transactions.records,
            reference_date,
            self.config.carry_forward,
            token,
        )?;

        Ok(Report {
            value: snapshot,
            skipped: transactions.skipped,
        })
    }

    /// The most recent transactions of the session owner.
    ///
    /// # Errors
    /// See [ReportService::bucket_summaries].
    pub async fn recent_activity(
        &self,
        session: &Session,
        token: &CancellationToken,
    ) -> Result<Report<Vec<Activity>>, Error> {
        let transactions = self.load_transactions(session, token).await?;

        Ok(Report {
            value: recent_activity(&transactions.records, self.config.activity_limit),
            skipped: transactions.skipped,
        })
    }

    /// Net balances per person from the session owner's ledger.
    ///
    /// # Errors
    /// See [ReportService::bucket_summaries].
    pub async fn ledger_summary(
        &self,
        session: &Session,
        query: Option<&LedgerQuery>,
        token: &CancellationToken,
    ) -> Result<Report<Vec<LedgerSummary>>, Error> {
        let entries = self.load_ledger(session, query, token).await?;

        token.check()?;
        Ok(entries.map(|entries| net_by_person(&entries)))
    }

    /// The session owner's ledger grouped by month and day, newest first.
    ///
    /// # Errors
    /// See [ReportService::bucket_summaries].
    pub async fn ledger_groups(
        &self,
        session: &Session,
        query: Option<&LedgerQuery>,
        token: &CancellationToken,
    ) -> Result<Report<Vec<LedgerMonth>>, Error> {
        let entries = self.load_ledger(session, query, token).await?;

        token.check()?;
        Ok(entries.map(|entries| group_by_month(&entries)))
    }

    /// Page `page_number` (1-based) of the session owner's ledger, using the
    /// configured page size.
    ///
    /// # Errors
    /// Returns [Error::Configuration] if `page_number` is zero, otherwise see
    /// [ReportService::bucket_summaries].
    pub async fn ledger_page(
        &self,
        session: &Session,
        query: Option<&LedgerQuery>,
        page_number: u64,
        token: &CancellationToken,
    ) -> Result<Report<LedgerPage>, Error> {
        let entries = self.load_ledger(session, query, token).await?;

        token.check()?;
        let ledger_page = page(&entries.value, page_number, self.config.ledger_page_size)?;

        Ok(Report {
            value: ledger_page,
            skipped: entries.skipped,
        })
    }

    async fn load_transactions(
        &self,
        session: &Session,
        token: &CancellationToken,
    ) -> Result<Normalized<Transaction>, Error> {
        token.check()?;
        let raw = self
            .fetch(self.store.fetch_transactions(session.owner_id()))
            .await?;

        token.check()?;
        let normalized = normalize_records(session.owner_id(), &raw);

        tracing::debug!(
            "loaded {} transactions for {} ({} skipped)",
            normalized.records.len(),
            session.owner_id(),
            normalized.skipped.len()
        );

        Ok(normalized)
    }

    async fn load_ledger(
        &self,
        session: &Session,
        query: Option<&LedgerQuery>,
        token: &CancellationToken,
    ) -> Result<Report<Vec<LedgerEntry>>, Error> {
        token.check()?;
        let raw = self
            .fetch(self.store.fetch_ledger_entries(session.owner_id(), query))
            .await?;

        token.check()?;
        let normalized = normalize_ledger(session.owner_id(), &raw);

        let predicate = query.cloned().unwrap_or_default().predicate();
        let entries = filter(&normalized.records, &predicate);

        tracing::debug!(
            "loaded {} ledger entries for {} ({} skipped)",
            entries.len(),
            session.owner_id(),
            normalized.skipped.len()
        );

        Ok(Report {
            value: entries,
            skipped: normalized.skipped,
        })
    }

    async fn fetch<T>(&self, request: impl Future<Output = Result<T, Error>>) -> Result<T, Error> {
        let timeout = self.config.fetch_timeout;

        match tokio::time::timeout(timeout, request).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!("the record store did not respond within {timeout:?}");
                Err(Error::UpstreamTimeout(timeout))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use time::macros::date;

    use super::ReportService;
    use crate::{
        Error, ValidationError,
        balance::CarryForwardPolicy,
        bucket::Granularity,
        cancel::CancellationToken,
        config::ReportConfig,
        date_range::DateRange,
        model::{PaymentMethod, RawLedgerEntry, RawTransaction},
        netting::LedgerSummary,
        report::SummaryQuery,
        session::Session,
        store::{LedgerQuery, RecordStore},
    };

    #[derive(Clone, Default)]
    struct FakeStore {
        transactions: Vec<RawTransaction>,
        ledger: Vec<RawLedgerEntry>,
        owner: Option<String>,
        delay: Option<Duration>,
        fail: bool,
    }

    impl FakeStore {
        fn owns(&self, owner_id: &str) -> bool {
            self.owner.as_deref().is_none_or(|owner| owner == owner_id)
        }
    }

    impl RecordStore for FakeStore {
        async fn fetch_transactions(&self, owner_id: &str) -> Result<Vec<RawTransaction>, Error> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            if self.fail {
                return Err(Error::Upstream("connection refused".to_owned()));
            }

            if !self.owns(owner_id) {
                return Ok(Vec::new());
            }

            Ok(self.transactions.clone())
        }

        async fn fetch_ledger_entries(
            &self,
            owner_id: &str,
            _query: Option<&LedgerQuery>,
        ) -> Result<Vec<RawLedgerEntry>, Error> {
            if !self.owns(owner_id) {
                return Ok(Vec::new());
            }

            Ok(self.ledger.clone())
        }
    }

    fn raw(id: &str, kind: &str, amount: serde_json::Value, label: &str, date: &str) -> RawTransaction {
        RawTransaction {
            id: Some(id.to_owned()),
            kind: Some(kind.to_owned()),
            amount: Some(amount),
            label: Some(label.to_owned()),
            date: Some(date.to_owned()),
            ..Default::default()
        }
    }

    fn raw_entry(id: &str, direction: &str, person: &str, amount: i64, method: &str, date: &str) -> RawLedgerEntry {
        RawLedgerEntry {
            id: Some(id.to_owned()),
            direction: Some(direction.to_owned()),
            person: Some(person.to_owned()),
            amount: Some(json!(amount)),
            payment_method: Some(method.to_owned()),
            date: Some(date.to_owned()),
            notes: None,
        }
    }

    fn store() -> FakeStore {
        FakeStore {
            transactions: vec![
                raw("i1", "Income", json!(2000), "Salary", "2024-01-10"),
                raw("e1", "Expense", json!(500), "Food", "2024-02-15"),
                raw("e2", "Expense", json!("NaN"), "Food", "2024-02-16"),
                raw("e3", "Expense", json!(-5), "Food", "2024-02-16"),
            ],
            ledger: vec![
                raw_entry("k1", "Taken", "Ravi", 500, "Cash", "2024-03-01"),
                raw_entry("k2", "Given", "Ravi", 200, "UPI", "2024-03-05"),
                raw_entry("k3", "Given", "Asha", 90, "Cheque", "2024-03-06"),
            ],
            ..Default::default()
        }
    }

    fn session() -> Session {
        Session::with_offset("owner", time::UtcOffset::UTC)
    }

    #[tokio::test]
    async fn summaries_report_skipped_records() {
        let service = ReportService::new(store(), ReportConfig::default());
        let query = SummaryQuery::new(DateRange::year(2024).unwrap(), Granularity::Month);

        let report = service
            .bucket_summaries(&session(), &query, date!(2024 - 02 - 20), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.value.len(), 2);
        assert_eq!(report.value[1].expense_total, 500);
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(
            report.skipped[0].error,
            ValidationError::NonFiniteAmount("NaN".to_owned())
        );
        assert_eq!(
            report.skipped[1].error,
            ValidationError::NegativeAmount("-5".to_owned())
        );
    }

    #[tokio::test]
    async fn reads_only_the_session_owners_records() {
        let service = ReportService::new(
            FakeStore {
                owner: Some("owner".to_owned()),
                ..store()
            },
            ReportConfig::default(),
        );
        let token = CancellationToken::new();
        let stranger = Session::with_offset("someone-else", time::UtcOffset::UTC);

        let mine = service.recent_activity(&session(), &token).await.unwrap();
        let theirs = service.recent_activity(&stranger, &token).await.unwrap();
        let their_ledger = service.ledger_summary(&stranger, None, &token).await.unwrap();

        assert_eq!(mine.value.len(), 2);
        assert!(theirs.value.is_empty());
        assert!(theirs.skipped.is_empty());
        assert!(their_ledger.value.is_empty());
    }

    #[tokio::test]
    async fn one_bad_record_does_not_fail_a_daily_report() {
        let mut store = store();
        store.transactions.extend([
            raw("typo", "Expense", json!(10), "Food", "9999-12-31"),
            raw("h1", "Expense", json!(4_611_686_018_427_387_904_i64), "Food", "2024-02-15"),
            raw("h2", "Expense", json!(4_611_686_018_427_387_904_i64), "Food", "2024-02-15"),
        ]);
        let service = ReportService::new(store, ReportConfig::default());
        let query = SummaryQuery::new(DateRange::year(2024).unwrap(), Granularity::Day);

        let report = service
            .bucket_summaries(&session(), &query, date!(2024 - 02 - 20), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.value.len(), 2);
        assert_eq!(report.value[1].expense_total, 500);
        assert_eq!(report.skipped.len(), 5);
    }

    #[tokio::test]
    async fn wallet_follows_configured_carry_forward() {
        let carried = ReportService::new(
            store(),
            ReportConfig {
                carry_forward: CarryForwardPolicy::income_only(),
                ..Default::default()
            },
        );
        let recorded = ReportService::new(store(), ReportConfig::default());
        let token = CancellationToken::new();

        let on = carried
            .wallet_snapshot(&session(), date!(2024 - 02 - 20), &token)
            .await
            .unwrap();
        let off = recorded
            .wallet_snapshot(&session(), date!(2024 - 02 - 20), &token)
            .await
            .unwrap();

        assert_eq!(on.value.monthly_savings, 1500);
        assert_eq!(off.value.monthly_savings, -500);
    }

    #[tokio::test]
    async fn ledger_summary_nets_and_skips_unknown_methods() {
        let service = ReportService::new(store(), ReportConfig::default());

        let report = service
            .ledger_summary(&session(), None, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            report.value,
            vec![LedgerSummary {
                person: "Ravi".to_owned(),
                taken: 500,
                given: 200,
                net: 300,
            }]
        );
        assert_eq!(
            report.skipped[0].error,
            ValidationError::UnknownPaymentMethod("Cheque".to_owned())
        );
    }

    #[tokio::test]
    async fn ledger_query_is_applied_after_fetch() {
        let service = ReportService::new(store(), ReportConfig::default());
        let query = LedgerQuery {
            payment_method: Some(PaymentMethod::Upi),
            ..Default::default()
        };

        let report = service
            .ledger_page(&session(), Some(&query), 1, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.value.total_entries, 1);
        assert_eq!(report.value.entries[0].id, "k2");
    }

    #[tokio::test]
    async fn ledger_groups_are_newest_first() {
        let service = ReportService::new(store(), ReportConfig::default());

        let report = service
            .ledger_groups(&session(), None, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.value.len(), 1);
        assert_eq!(report.value[0].days[0].date, date!(2024 - 03 - 05));
    }

    #[tokio::test]
    async fn activity_uses_configured_limit() {
        let service = ReportService::new(
            store(),
            ReportConfig {
                activity_limit: 1,
                ..Default::default()
            },
        );

        let report = service
            .recent_activity(&session(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.value.len(), 1);
        assert_eq!(report.value[0].id, "e1");
    }

    #[tokio::test]
    async fn slow_store_times_out() {
        let slow = FakeStore {
            delay: Some(Duration::from_millis(500)),
            ..store()
        };
        let service = ReportService::new(
            slow,
            ReportConfig {
                fetch_timeout: Duration::from_millis(10),
                ..Default::default()
            },
        );

        let result = service
            .recent_activity(&session(), &CancellationToken::new())
            .await;

        assert_eq!(result, Err(Error::UpstreamTimeout(Duration::from_millis(10))));
    }

    #[tokio::test]
    async fn store_errors_propagate_unchanged() {
        let failing = FakeStore {
            fail: true,
            ..store()
        };
        let service = ReportService::new(failing, ReportConfig::default());

        let result = service
            .balance_report(&session(), date!(2024 - 02 - 20), &CancellationToken::new())
            .await;

        assert_eq!(result, Err(Error::Upstream("connection refused".to_owned())));
    }

    #[tokio::test]
    async fn cancelled_token_stops_before_fetch() {
        let service = ReportService::new(store(), ReportConfig::default());
        let token = CancellationToken::new();
        token.cancel();

        let result = service.ledger_summary(&session(), None, &token).await;

        assert_eq!(result, Err(Error::Cancelled));
    }
}
