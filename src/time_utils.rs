// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Helpers for the timestamps the backend sends.

use chrono::{DateTime, SecondsFormat, Utc};

/// Convert a Unix timestamp (seconds) as found in token expiries.
pub fn from_unix_seconds(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

/// Format a UTC timestamp as RFC3339 using a `Z` suffix, for log fields.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}
