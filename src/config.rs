//! Settings shared by every report a service builds.

use std::time::Duration;

use serde::Deserialize;

use crate::{activity::DEFAULT_ACTIVITY_LIMIT, balance::CarryForwardPolicy};

/// The config for a [crate::ReportService].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportConfig {
    /// How long to wait for the record store before giving up.
    pub fetch_timeout: Duration,
    /// The carry-forward policy used for monthly savings.
    pub carry_forward: CarryForwardPolicy,
    /// The number of items in the recent activity feed.
    pub activity_limit: usize,
    /// The number of ledger entries per page.
    pub ledger_page_size: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(10),
            carry_forward: CarryForwardPolicy::default(),
            activity_limit: DEFAULT_ACTIVITY_LIMIT,
            ledger_page_size: 20,
        }
    }
}
