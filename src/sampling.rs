//! Sampling interval inference for time-indexed tables.

use crate::error::ShingleError;
use chrono::{DateTime, Duration, Utc};

/// Returns the constant interval between consecutive timestamps.
///
/// The interval is taken from the first pair and every other consecutive pair
/// is checked against it. Returns `Ok(None)` when there are fewer than two
/// timestamps, since no interval exists.
///
/// # Errors
/// Returns `ShingleError::NonUniformSampling` naming the first pair whose gap
/// differs from the first one.
pub fn uniform_interval(timestamps: &[DateTime<Utc>]) -> Result<Option<Duration>, ShingleError> {
    let expected = match timestamps {
        [first, second, ..] => second.signed_duration_since(*first),
        _ => return Ok(None),
    };

    for pair in timestamps.windows(2).skip(1) {
        let actual = pair[1].signed_duration_since(pair[0]);
        if actual != expected {
            return Err(ShingleError::NonUniformSampling {
                expected,
                previous: pair[0],
                next: pair[1],
                actual,
            });
        }
    }

    Ok(Some(expected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_uniform_interval_detected() {
        let timestamps: Vec<_> = (0..5).map(|i| base() + Duration::hours(6 * i)).collect();
        assert_eq!(uniform_interval(&timestamps).unwrap(), Some(Duration::hours(6)));
    }

    #[test]
    fn test_short_series_has_no_interval() {
        assert_eq!(uniform_interval(&[]).unwrap(), None);
        assert_eq!(uniform_interval(&[base()]).unwrap(), None);
    }

    #[test]
    fn test_single_gap_reported() {
        let timestamps = vec![
            base(),
            base() + Duration::hours(1),
            base() + Duration::hours(2),
            base() + Duration::hours(4),
            base() + Duration::hours(5),
        ];
        let err = uniform_interval(&timestamps).unwrap_err();
        assert_eq!(
            err,
            ShingleError::NonUniformSampling {
                expected: Duration::hours(1),
                previous: base() + Duration::hours(2),
                next: base() + Duration::hours(4),
                actual: Duration::hours(2),
            }
        );
    }

    #[test]
    fn test_gap_in_last_pair_is_checked() {
        let timestamps = vec![
            base(),
            base() + Duration::minutes(10),
            base() + Duration::minutes(20),
            base() + Duration::minutes(31),
        ];
        assert!(uniform_interval(&timestamps).is_err());
    }
}
