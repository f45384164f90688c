//! Window specifications and their resolution to a sample count.
//!
//! A `WindowSpec` is what the caller asks for: either a look-back duration or
//! a number of samples. It is resolved once against the table index into a
//! `WindowLength`, so the shingling algorithm only ever deals with a count.

use crate::error::{ParseWindowError, ShingleError};
use crate::sampling::uniform_interval;
use crate::time_series::RowIndex;
use chrono::Duration;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::num::NonZeroUsize;
use std::str::FromStr;

const NANOS_PER_MICRO: u64 = 1_000;
const NANOS_PER_MILLI: u64 = 1_000_000;
const NANOS_PER_SECOND: u64 = 1_000_000_000;
const NANOS_PER_MINUTE: u64 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: u64 = 60 * NANOS_PER_MINUTE;
const NANOS_PER_DAY: u64 = 24 * NANOS_PER_HOUR;
const NANOS_PER_WEEK: u64 = 7 * NANOS_PER_DAY;

/// Units used when rendering a duration, largest first.
const DISPLAY_UNITS: [(&str, u64); 8] = [
    ("w", NANOS_PER_WEEK),
    ("d", NANOS_PER_DAY),
    ("h", NANOS_PER_HOUR),
    ("min", NANOS_PER_MINUTE),
    ("s", NANOS_PER_SECOND),
    ("ms", NANOS_PER_MILLI),
    ("us", NANOS_PER_MICRO),
    ("ns", 1),
];

/// Common behavior shared by windowing strategies.
pub trait WindowStrategy {
    /// Number of leading rows that cannot produce a complete window.
    fn burn_in(&self) -> usize;
}

/// Requested look-back window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowSpec {
    /// Look-back span in wall-clock time. Resolves to `span / interval + 1`
    /// samples on a uniformly sampled time index.
    ///
    /// A 12h span over 6h data is three samples (`t-0`, `t-1`, `t-2`), not two.
    Duration(Duration),
    /// Number of samples, current one included (`1` means no lag).
    Count(i64),
}

impl WindowSpec {
    pub fn count(samples: i64) -> Self {
        WindowSpec::Count(samples)
    }

    pub fn duration(span: Duration) -> Self {
        WindowSpec::Duration(span)
    }

    /// Resolves the window against a table index.
    ///
    /// # Errors
    /// - `InvalidWindow` for non-positive counts, negative durations, a
    ///   duration on an ordinal index, or a duration that is not an exact
    ///   multiple of the sampling interval.
    /// - `NonUniformSampling` when a duration is requested on an index whose
    ///   consecutive timestamps are not evenly spaced.
    /// - `InsufficientData` when a positive duration is requested on fewer
    ///   than two rows.
    pub fn resolve(&self, index: &RowIndex) -> Result<WindowLength, ShingleError> {
        match *self {
            WindowSpec::Count(samples) => usize::try_from(samples)
                .ok()
                .and_then(WindowLength::new)
                .ok_or_else(|| ShingleError::invalid_window(self, "window size must be positive")),
            WindowSpec::Duration(span) => self.resolve_duration(span, index),
        }
    }

    fn resolve_duration(&self, span: Duration, index: &RowIndex) -> Result<WindowLength, ShingleError> {
        if span < Duration::zero() {
            return Err(ShingleError::invalid_window(self, "duration must not be negative"));
        }

        let timestamps = index.timestamps().ok_or_else(|| {
            ShingleError::invalid_window(self, "a duration window needs a time index")
        })?;

        let interval = uniform_interval(timestamps)?;
        if span == Duration::zero() {
            return Ok(WindowLength::single());
        }

        let interval = interval.ok_or(ShingleError::InsufficientData {
            rows: timestamps.len(),
            window: 2,
        })?;

        let span_nanos = span
            .num_nanoseconds()
            .ok_or_else(|| ShingleError::invalid_window(self, "duration exceeds nanosecond range"))?;
        let interval_nanos = match interval.num_nanoseconds() {
            Some(nanos) if nanos > 0 => nanos,
            Some(_) => {
                return Err(ShingleError::invalid_window(
                    self,
                    "timestamps must be strictly increasing",
                ))
            }
            None => {
                return Err(ShingleError::invalid_window(
                    self,
                    "sampling interval exceeds nanosecond range",
                ))
            }
        };

        if span_nanos % interval_nanos != 0 {
            return Err(ShingleError::invalid_window(
                self,
                format!(
                    "duration is not a multiple of the sampling interval {}",
                    WindowSpec::Duration(interval)
                ),
            ));
        }

        usize::try_from(span_nanos / interval_nanos)
            .ok()
            .and_then(|lags| lags.checked_add(1))
            .and_then(WindowLength::new)
            .ok_or_else(|| ShingleError::invalid_window(self, "window is too large"))
    }
}

impl From<i64> for WindowSpec {
    fn from(samples: i64) -> Self {
        WindowSpec::Count(samples)
    }
}

impl From<Duration> for WindowSpec {
    fn from(span: Duration) -> Self {
        WindowSpec::Duration(span)
    }
}

impl std::fmt::Display for WindowSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowSpec::Count(samples) => write!(f, "{}", samples),
            WindowSpec::Duration(span) => fmt_duration(span, f),
        }
    }
}

fn fmt_duration(span: &Duration, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let nanos = match span.num_nanoseconds() {
        Some(nanos) => nanos,
        None => return write!(f, "{}s", span.num_seconds()),
    };

    if nanos == 0 {
        return write!(f, "0s");
    }

    let sign = if nanos < 0 { "-" } else { "" };
    let magnitude = nanos.unsigned_abs();
    let (unit, scale) = DISPLAY_UNITS
        .iter()
        .copied()
        .find(|(_, scale)| magnitude % scale == 0)
        .unwrap_or(("ns", 1));
    write!(f, "{}{}{}", sign, magnitude / scale, unit)
}

impl FromStr for WindowSpec {
    type Err = ParseWindowError;

    /// Parses `"3"` as a count and pandas-style strings such as `"12h"`,
    /// `"1d12h"` or `"30 min"` as durations.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(ParseWindowError::new(s, "window is empty"));
        }

        if let Ok(samples) = text.parse::<i64>() {
            return Ok(WindowSpec::Count(samples));
        }

        parse_duration(text)
            .map(WindowSpec::Duration)
            .map_err(|reason| ParseWindowError::new(s, reason))
    }
}

fn parse_duration(text: &str) -> Result<Duration, String> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let mut rest = body.trim_start();
    if rest.is_empty() {
        return Err("missing duration after sign".to_string());
    }

    let mut total: i64 = 0;
    while !rest.is_empty() {
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits_end == 0 {
            return Err(format!("expected a number at '{}'", rest));
        }
        let amount: i64 = rest[..digits_end]
            .parse()
            .map_err(|_| format!("number '{}' is too large", &rest[..digits_end]))?;
        rest = rest[digits_end..].trim_start();

        let unit_end = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        if unit_end == 0 {
            return Err(format!("missing unit after {}", amount));
        }
        let unit = &rest[..unit_end];
        let scale = unit_nanos(unit).ok_or_else(|| format!("unknown unit '{}'", unit))?;
        rest = rest[unit_end..].trim_start();

        total = i64::try_from(scale)
            .ok()
            .and_then(|scale| amount.checked_mul(scale))
            .and_then(|nanos| total.checked_add(nanos))
            .ok_or_else(|| "duration is out of range".to_string())?;
    }

    Ok(Duration::nanoseconds(if negative { -total } else { total }))
}

fn unit_nanos(unit: &str) -> Option<u64> {
    let scale = match unit.to_ascii_lowercase().as_str() {
        "ns" => 1,
        "us" => NANOS_PER_MICRO,
        "ms" => NANOS_PER_MILLI,
        "s" | "sec" | "secs" | "second" | "seconds" => NANOS_PER_SECOND,
        "m" | "t" | "min" | "mins" | "minute" | "minutes" => NANOS_PER_MINUTE,
        "h" | "hr" | "hrs" | "hour" | "hours" => NANOS_PER_HOUR,
        "d" | "day" | "days" => NANOS_PER_DAY,
        "w" | "week" | "weeks" => NANOS_PER_WEEK,
        _ => return None,
    };
    Some(scale)
}

impl Serialize for WindowSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            WindowSpec::Count(samples) => serializer.serialize_i64(*samples),
            WindowSpec::Duration(_) => serializer.collect_str(self),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawWindow {
    Count(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for WindowSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawWindow::deserialize(deserializer)? {
            RawWindow::Count(samples) => Ok(WindowSpec::Count(samples)),
            RawWindow::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Resolved window length `w`: current sample plus `w - 1` lags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowLength(NonZeroUsize);

impl WindowLength {
    /// Returns `None` for zero.
    pub fn new(samples: usize) -> Option<Self> {
        NonZeroUsize::new(samples).map(WindowLength)
    }

    fn single() -> Self {
        WindowLength(NonZeroUsize::MIN)
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }

    /// Largest lag offset in the window.
    pub fn max_lag(&self) -> usize {
        self.get() - 1
    }
}

impl WindowStrategy for WindowLength {
    fn burn_in(&self) -> usize {
        self.max_lag()
    }
}
