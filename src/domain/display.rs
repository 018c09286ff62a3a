//! Display formatting for timestamps, dates, and absent values.
//!
//! Records handed to the dashboard carry ready-to-render strings next to the
//! raw values. All rendering happens in UTC with a fixed US-style layout.

use chrono::{DateTime, NaiveDate, Utc};

/// Placeholder for an animal that has never been sighted, or a camera with
/// no location.
pub const UNKNOWN: &str = "Unknown";

/// Placeholder for a camera without a maintenance date.
pub const NOT_RECORDED: &str = "Not recorded";

const TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";
const DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Renders a timestamp as `M/D/YYYY, h:MM:SS AM`.
#[must_use]
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Renders a calendar date as `M/D/YYYY`.
#[must_use]
pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Renders an optional timestamp, substituting `sentinel` when absent.
#[must_use]
pub fn timestamp_or(ts: Option<&DateTime<Utc>>, sentinel: &str) -> String {
    ts.map_or_else(|| sentinel.to_string(), format_timestamp)
}

/// Renders an optional date, substituting `sentinel` when absent.
#[must_use]
pub fn date_or(date: Option<&NaiveDate>, sentinel: &str) -> String {
    date.map_or_else(|| sentinel.to_string(), format_date)
}
