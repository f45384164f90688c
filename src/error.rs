//! Error types surfaced by the shingling transform and window parsing.

use chrono::{DateTime, Duration, Utc};

/// Errors that can occur when shingling a table.
///
/// Every variant is a precondition failure detected before any output is
/// built, so a caller never sees a partially valid table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShingleError {
    /// The input table has no rows.
    EmptyInput,
    /// The window is non-positive or a duration does not resolve to a whole
    /// number of samples.
    InvalidWindow {
        /// The window as requested, rendered for display.
        window: String,
        /// Why it was rejected.
        reason: String,
    },
    /// A duration window was requested but consecutive timestamps are not
    /// evenly spaced.
    NonUniformSampling {
        /// Interval between the first two rows.
        expected: Duration,
        /// Earlier timestamp of the first offending pair.
        previous: DateTime<Utc>,
        /// Later timestamp of the first offending pair.
        next: DateTime<Utc>,
        /// Actual gap between `previous` and `next`.
        actual: Duration,
    },
    /// The table is shorter than the resolved window, so no complete window
    /// exists.
    InsufficientData {
        /// Rows available in the input.
        rows: usize,
        /// Resolved window length.
        window: usize,
    },
}

impl ShingleError {
    pub(crate) fn invalid_window(window: impl ToString, reason: impl Into<String>) -> Self {
        ShingleError::InvalidWindow {
            window: window.to_string(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for ShingleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShingleError::EmptyInput => write!(f, "Input table has no rows"),
            ShingleError::InvalidWindow { window, reason } => {
                write!(f, "Invalid window '{}': {}", window, reason)
            }
            ShingleError::NonUniformSampling {
                expected,
                previous,
                next,
                actual,
            } => write!(
                f,
                "Data must be uniformly sampled: expected interval {}s but {} -> {} is {}s",
                format_seconds(expected),
                previous.to_rfc3339(),
                next.to_rfc3339(),
                format_seconds(actual)
            ),
            ShingleError::InsufficientData { rows, window } => write!(
                f,
                "Insufficient data: {} rows available, window needs {}",
                rows, window
            ),
        }
    }
}

impl std::error::Error for ShingleError {}

fn format_seconds(delta: &Duration) -> String {
    match delta.num_nanoseconds() {
        Some(nanos) if nanos % 1_000_000_000 == 0 => (nanos / 1_000_000_000).to_string(),
        Some(nanos) => format!("{}", nanos as f64 / 1e9),
        None => delta.num_seconds().to_string(),
    }
}

/// Error returned when a window string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWindowError {
    input: String,
    reason: String,
}

impl ParseWindowError {
    pub(crate) fn new(input: &str, reason: impl Into<String>) -> Self {
        ParseWindowError {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// The text that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl std::fmt::Display for ParseWindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cannot parse window '{}': {}", self.input, self.reason)
    }
}

impl std::error::Error for ParseWindowError {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_insufficient_data_message() {
        let err = ShingleError::InsufficientData { rows: 3, window: 5 };
        assert_eq!(
            err.to_string(),
            "Insufficient data: 3 rows available, window needs 5"
        );
    }

    #[test]
    fn test_non_uniform_message_names_offending_pair() {
        let previous = Utc.with_ymd_and_hms(2025, 1, 1, 6, 0, 0).unwrap();
        let next = Utc.with_ymd_and_hms(2025, 1, 1, 18, 0, 0).unwrap();
        let err = ShingleError::NonUniformSampling {
            expected: Duration::hours(6),
            previous,
            next,
            actual: Duration::hours(12),
        };
        let message = err.to_string();
        assert!(message.contains("21600s"));
        assert!(message.contains("43200s"));
        assert!(message.contains("2025-01-01T06:00:00+00:00"));
        assert!(message.contains("2025-01-01T18:00:00+00:00"));
    }

    #[test]
    fn test_invalid_window_message() {
        let err = ShingleError::invalid_window(0, "window size must be positive");
        assert_eq!(err.to_string(), "Invalid window '0': window size must be positive");
    }

    #[test]
    fn test_parse_error_keeps_input() {
        let err = ParseWindowError::new("12 parsecs", "unknown unit 'parsecs'");
        assert_eq!(err.input(), "12 parsecs");
        assert!(err.to_string().contains("unknown unit"));
    }
}
