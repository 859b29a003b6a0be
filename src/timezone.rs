use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// Get the UTC offset of `canonical_timezone` (e.g. "Asia/Kolkata") at `now`.
///
/// # Errors
/// Returns [Error::Configuration] if the name is not a known timezone.
pub fn local_offset_at(canonical_timezone: &str, now: OffsetDateTime) -> Result<UtcOffset, Error> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&now).to_utc())
        .ok_or_else(|| Error::Configuration(format!("unknown timezone \"{canonical_timezone}\"")))
}
