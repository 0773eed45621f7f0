//! MediaWiki timestamps.
//!
//! Wiki databases store times as 14-digit UTC strings (`YYYYMMDDhhmmss`), or the
//! literal `infinity` for open-ended values.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::config::{LAST_HOUR_WINDOW_SECS, MW_TIMESTAMP_FORMAT};

/// A parsed MediaWiki timestamp.
///
/// Ordering places `Infinity` after every finite time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MwTimestamp {
    /// A point in time (UTC, second precision)
    At(DateTime<Utc>),
    /// The `infinity` sentinel
    Infinity,
}

/// Returned when a string is neither 14 digits nor `infinity`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid MediaWiki timestamp: {0:?}")]
pub struct InvalidTimestamp(pub String);

impl MwTimestamp {
    /// Parses a 14-digit timestamp or `infinity`.
    pub fn parse(raw: &str) -> Result<Self, InvalidTimestamp> {
        let raw = raw.trim();
        if raw == "infinity" {
            return Ok(MwTimestamp::Infinity);
        }
        if raw.len() != 14 || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidTimestamp(raw.to_string()));
        }
        NaiveDateTime::parse_from_str(raw, MW_TIMESTAMP_FORMAT)
            .map(|naive| MwTimestamp::At(naive.and_utc()))
            .map_err(|_| InvalidTimestamp(raw.to_string()))
    }

    /// Formats with a `chrono` format string; `infinity` is returned verbatim.
    pub fn format(&self, format: &str) -> String {
        match self {
            MwTimestamp::At(at) => at.format(format).to_string(),
            MwTimestamp::Infinity => "infinity".to_string(),
        }
    }

    /// UTC calendar date, `None` for `infinity`.
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            MwTimestamp::At(at) => Some(at.date_naive()),
            MwTimestamp::Infinity => None,
        }
    }
}

impl fmt::Display for MwTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(MW_TIMESTAMP_FORMAT))
    }
}

impl FromStr for MwTimestamp {
    type Err = InvalidTimestamp;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MwTimestamp::parse(s)
    }
}

/// The lower bound of the "last hour" window, as a 14-digit timestamp.
pub fn last_hour_cutoff(now: DateTime<Utc>) -> String {
    (now - chrono::Duration::seconds(LAST_HOUR_WINDOW_SECS))
        .format(MW_TIMESTAMP_FORMAT)
        .to_string()
}
