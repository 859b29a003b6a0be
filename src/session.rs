//! The caller context passed into every report.

use time::{Date, OffsetDateTime, UtcOffset};

use crate::{record_id::OwnerId, timezone::local_offset_at};

/// Who is asking for a report and where they are.
///
/// Built once when the user logs in and dropped when they log out. Reports
/// only ever read records owned by [Session::owner_id], and "today" is the
/// calendar date in the user's timezone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    owner_id: OwnerId,
    local_offset: UtcOffset,
}

impl Session {
    /// Create a session for `owner_id` in the timezone named
    /// `canonical_timezone`, e.g. "Asia/Kolkata".
    ///
    /// # Errors
    /// Returns [crate::Error::Configuration] if the timezone is unknown.
    pub fn new(owner_id: &str, canonical_timezone: &str) -> Result<Self, crate::Error> {
        let local_offset = local_offset_at(canonical_timezone, OffsetDateTime::now_utc())?;

        Ok(Self::with_offset(owner_id, local_offset))
    }

    /// Create a session with a fixed UTC offset.
    pub fn with_offset(owner_id: &str, local_offset: UtcOffset) -> Self {
        Self {
            owner_id: owner_id.to_owned(),
            local_offset,
        }
    }

    /// The user whose records are reported on.
    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    /// The user's UTC offset when the session was created.
    pub fn local_offset(&self) -> UtcOffset {
        self.local_offset
    }

    /// The user's calendar date at `instant`.
    pub fn date_at(&self, instant: OffsetDateTime) -> Date {
        instant.to_offset(self.local_offset).date()
    }

    /// The user's calendar date right now.
    pub fn today(&self) -> Date {
        self.date_at(OffsetDateTime::now_utc())
    }
}
