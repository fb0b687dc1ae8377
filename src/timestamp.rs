//! Timestamp parsing for block anchors.
//!
//! A log line opens a new block when its first space-separated token is an
//! ISO 8601 instant, date-time, or date. Trailing `Z` designators are
//! rewritten to an explicit `+00:00` offset before parsing, and values
//! without an offset are taken as UTC.

use std::cmp::Ordering;
use std::fmt;

/// Parsed and normalized timestamp representation.
///
/// Wraps a [`jiff::Timestamp`] for high-precision time handling. Ordering
/// and equality only consider [`value`](Self::value).
#[derive(Debug, Clone)]
pub struct Timestamp {
    /// Normalized timestamp value.
    pub value: jiff::Timestamp,
    /// Original token the value was parsed from (empty for [`Timestamp::EARLIEST`]).
    pub original: String,
}

impl Timestamp {
    /// Anchor for blocks read before any timestamp was seen; sorts first.
    pub const EARLIEST: Self = Self {
        value: jiff::Timestamp::MIN,
        original: String::new(),
    };

    /// Parse the timestamp that opens `line`, if any.
    ///
    /// The line must contain a space after the timestamp token; a bare
    /// timestamp with nothing after it is not a block start.
    pub fn from_line_prefix(line: &str) -> Option<Self> {
        let (token, _) = line.split_once(' ')?;
        Self::parse_token(token)
    }

    /// Parse a single timestamp token.
    pub fn parse_token(token: &str) -> Option<Self> {
        if token.is_empty() || !token.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }
        let normalized = normalize_utc_designator(token);
        let original = token.to_string();

        if let Ok(ts) = normalized.parse::<jiff::Timestamp>() {
            return Some(Self {
                value: ts,
                original,
            });
        }

        // No offset → assume UTC
        if let Ok(dt) = normalized.parse::<jiff::civil::DateTime>()
            && let Ok(zdt) = dt.to_zoned(jiff::tz::TimeZone::UTC)
        {
            return Some(Self {
                value: zdt.timestamp(),
                original,
            });
        }

        if let Ok(date) = normalized.parse::<jiff::civil::Date>()
            && let Ok(zdt) = date.to_zoned(jiff::tz::TimeZone::UTC)
        {
            return Some(Self {
                value: zdt.timestamp(),
                original,
            });
        }

        None
    }

    /// Format the timestamp for display using the given strftime-compatible format string.
    pub fn format_with(&self, format: &str) -> String {
        let zdt = self.value.to_zoned(jiff::tz::TimeZone::UTC);
        zdt.strftime(format).to_string()
    }

    /// Format the timestamp using the default format (`YYYY-MM-DDTHH:MM:SS.mmm`).
    pub fn format_display(&self) -> String {
        self.format_with("%Y-%m-%dT%H:%M:%S%.3f")
    }
}

/// Rewrite a trailing `Z` UTC designator as `+00:00`.
fn normalize_utc_designator(token: &str) -> String {
    match token.strip_suffix(['Z', 'z']) {
        Some(head) => format!("{head}+00:00"),
        None => token.to_string(),
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Timestamp {}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_display())
    }
}
