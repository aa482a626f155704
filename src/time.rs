//! Time engine behind the countdown widget.
//!
//! Converts a target instant and "now" into a [`TimeRemaining`] breakdown,
//! formats breakdowns with a small token language, and parses host-supplied
//! target dates.
//!
//! # Formatting tokens
//!
//! | Token | Meaning | Padding |
//! |-------|---------|---------|
//! | `DD` / `D` | days | 2 digits / none |
//! | `HH` / `H` | hours | 2 digits / none |
//! | `mm` / `m` | minutes | 2 digits / none |
//! | `ss` / `s` | seconds | 2 digits / none |
//!
//! ```rust
//! use bubbletea_progress::time::{reformat, TimeRemaining};
//!
//! let left = TimeRemaining::from_millis(125_000);
//! assert_eq!(reformat(&left, "HH:mm:ss"), "00:02:05");
//! assert_eq!(reformat(&left, "Dd Hh m:ss"), "0d 0h 2:05");
//! ```

use crate::error::{Error, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

/// Time left until a target, broken into display units.
///
/// `days` does not wrap; the other units are taken modulo the next unit up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRemaining {
    /// Whole days left.
    pub days: u64,
    /// Hours left within the current day, `0..24`.
    pub hours: u64,
    /// Minutes left within the current hour, `0..60`.
    pub minutes: u64,
    /// Seconds left within the current minute, `0..60`.
    pub seconds: u64,
    /// Total milliseconds left.
    pub total: u64,
}

impl TimeRemaining {
    /// Breaks `total` milliseconds down using floor division.
    pub fn from_millis(total: u64) -> Self {
        Self {
            days: total / MS_PER_DAY,
            hours: (total / MS_PER_HOUR) % 24,
            minutes: (total / MS_PER_MINUTE) % 60,
            seconds: (total / MS_PER_SECOND) % 60,
            total,
        }
    }

    /// Returns `true` when nothing is left.
    pub fn is_zero(&self) -> bool {
        self.total == 0
    }

    /// Formats this breakdown with [`reformat`].
    pub fn format(&self, pattern: &str) -> String {
        reformat(self, pattern)
    }
}

/// Computes the time left from `now` until `target`, never negative.
pub fn remaining(target: DateTime<Utc>, now: DateTime<Utc>) -> TimeRemaining {
    let total = (target - now).num_milliseconds().max(0) as u64;
    TimeRemaining::from_millis(total)
}

/// Substitutes the day/hour/minute/second tokens of `pattern`.
///
/// The pattern is scanned once from left to right and the two-letter form of
/// a token wins over its single-letter prefix, so `mm` is never read as two
/// `m` tokens and digits that were already substituted are never scanned
/// again. Every occurrence of a token is replaced; anything else is copied.
pub fn reformat(components: &TimeRemaining, pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let value = match c {
            'D' => Some(components.days),
            'H' => Some(components.hours),
            'm' => Some(components.minutes),
            's' => Some(components.seconds),
            _ => None,
        };

        match value {
            Some(v) if chars.get(i + 1) == Some(&c) => {
                out.push_str(&format!("{:02}", v));
                i += 2;
            }
            Some(v) => {
                out.push_str(&v.to_string());
                i += 1;
            }
            None => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

/// Parses a host-supplied target date.
///
/// Accepted forms, tried in order:
/// - RFC 3339 (`2025-12-31T23:59:59Z`, `2025-12-31T23:59:59+02:00`)
/// - a date and time without offset (`2025-12-31T23:59:59`,
///   `2025-12-31 23:59:59`, optional fractional seconds), read as local time
/// - a bare date (`2025-12-31`), read as midnight UTC
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] when none of the forms match.
pub fn parse_target(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, pattern) {
            if let Some(local) = Local.from_local_datetime(&naive).earliest() {
                return Ok(local.with_timezone(&Utc));
            }
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&midnight));
        }
    }

    Err(Error::invalid_input(
        "target_date",
        format!("unrecognised date '{}'", input),
    ))
}

/// The instant a countdown runs towards, as supplied by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetDate {
    /// An already resolved instant.
    At(DateTime<Utc>),
    /// Milliseconds since the Unix epoch.
    EpochMillis(i64),
    /// A textual date, see [`parse_target`].
    Text(String),
}

impl TargetDate {
    /// Resolves the target to an instant.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for unparseable text or epoch values
    /// outside chrono's range.
    pub fn resolve(&self) -> Result<DateTime<Utc>> {
        match self {
            TargetDate::At(dt) => Ok(*dt),
            TargetDate::EpochMillis(ms) => DateTime::<Utc>::from_timestamp_millis(*ms)
                .ok_or_else(|| {
                    Error::invalid_input("target_date", format!("epoch {} out of range", ms))
                }),
            TargetDate::Text(text) => parse_target(text),
        }
    }
}

impl From<DateTime<Utc>> for TargetDate {
    fn from(dt: DateTime<Utc>) -> Self {
        TargetDate::At(dt)
    }
}

impl From<i64> for TargetDate {
    fn from(ms: i64) -> Self {
        TargetDate::EpochMillis(ms)
    }
}

impl From<&str> for TargetDate {
    fn from(text: &str) -> Self {
        TargetDate::Text(text.to_string())
    }
}

impl From<String> for TargetDate {
    fn from(text: String) -> Self {
        TargetDate::Text(text)
    }
}

/// Source of "now" for countdowns.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Useful for hosts that replay time and for tests.
///
/// ```rust
/// use bubbletea_progress::time::{Clock, ManualClock};
/// use chrono::{TimeZone, Utc};
/// use std::time::Duration;
///
/// let start = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
/// let clock = ManualClock::new(start);
/// clock.advance(Duration::from_secs(90));
/// assert_eq!((clock.now() - start).num_seconds(), 90);
/// ```
#[derive(Debug)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            millis: AtomicI64::new(start.timestamp_millis()),
        }
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.millis
            .fetch_add(by.as_millis() as i64, Ordering::SeqCst);
    }

    /// Jumps the clock to `at`.
    pub fn set(&self, at: DateTime<Utc>) {
        self.millis.store(at.timestamp_millis(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let ms = self.millis.load(Ordering::SeqCst);
        DateTime::<Utc>::from_timestamp_millis(ms).unwrap_or_default()
    }
}
