//! Fixed-timezone interpretation of extracted wall-clock times
//!
//! All date/times returned by the extraction model are naive local
//! timestamps. This module owns the rules for attaching the local zone:
//! a fixed UTC offset (default +9, no daylight-saving adjustment) and the
//! wire format `YYYY-MM-DD HH:MM:SS`.

use chrono::{DateTime, FixedOffset, NaiveDateTime};

/// Default UTC offset in hours for interpreting extracted times (UTC+9)
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 9;

/// Fixed wire format for date/times exchanged with the extraction model
pub const LOCAL_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SECONDS_PER_HOUR: i32 = 3600;

/// Build the local zone for a whole-hour UTC offset.
///
/// Returns `None` when the offset is outside the range chrono accepts
/// (beyond +/-24 hours).
#[inline]
#[must_use = "returns the fixed offset for the configured zone"]
pub fn local_zone(offset_hours: i32) -> Option<FixedOffset> {
    offset_hours
        .checked_mul(SECONDS_PER_HOUR)
        .and_then(FixedOffset::east_opt)
}

/// Parse a naive local timestamp in [`LOCAL_DATETIME_FORMAT`] and attach
/// the given zone.
///
/// The result is a zone-attached local time, not yet UTC; conversion to an
/// absolute instant happens in [`crate::event::ExtractedEvent::to_utc`].
///
/// # Errors
///
/// Returns chrono's parse error when `value` does not match the fixed format.
pub fn parse_local_datetime(
    value: &str,
    zone: FixedOffset,
) -> std::result::Result<DateTime<FixedOffset>, chrono::ParseError> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), LOCAL_DATETIME_FORMAT)?;
    // Fixed offsets never yield ambiguous or skipped local times, so the
    // naive value converts by plain offset arithmetic.
    Ok(DateTime::from_naive_utc_and_offset(naive - zone, zone))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Timelike, Utc};

    #[test]
    fn test_default_zone_is_utc_plus_nine() {
        let zone = local_zone(DEFAULT_UTC_OFFSET_HOURS).unwrap();
        assert_eq!(zone.utc_minus_local(), -9 * 3600);
    }

    #[test]
    fn test_local_zone_rejects_out_of_range_offset() {
        assert!(local_zone(9).is_some());
        assert!(local_zone(-12).is_some());
        assert!(local_zone(25).is_none());
        assert!(local_zone(i32::MAX).is_none());
    }

    #[test]
    fn test_parse_preserves_wall_clock_value() {
        let zone = local_zone(9).unwrap();
        let dt = parse_local_datetime("2024-03-20 10:00:00", zone).unwrap();
        assert_eq!(dt.hour(), 10);
        assert_eq!(dt.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-03-20 10:00:00");
    }

    #[test]
    fn test_parsed_value_converts_by_fixed_offset() {
        let zone = local_zone(9).unwrap();
        let dt = parse_local_datetime("2024-03-20 10:00:00", zone).unwrap();
        let utc = dt.with_timezone(&Utc);
        assert_eq!(utc.to_rfc3339(), "2024-03-20T01:00:00+00:00");
    }

    #[test]
    fn test_parse_rejects_other_formats() {
        let zone = local_zone(9).unwrap();
        assert!(parse_local_datetime("2024-03-20T10:00:00", zone).is_err());
        assert!(parse_local_datetime("2024/03/20 10:00", zone).is_err());
        assert!(parse_local_datetime("March 20th, 10am", zone).is_err());
        assert!(parse_local_datetime("", zone).is_err());
    }

    #[test]
    fn test_parse_tolerates_surrounding_whitespace() {
        let zone = local_zone(9).unwrap();
        let dt = parse_local_datetime("  2024-03-20 10:00:00\n", zone).unwrap();
        assert_eq!(dt.hour(), 10);
    }
}
