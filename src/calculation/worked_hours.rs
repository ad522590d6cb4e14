//! Worked-hours derivation and the half-day rule.
//!
//! Elapsed time between check-in and check-out is expressed in hours,
//! rounded half-up to two decimal places. A day with fewer than
//! [`HALF_DAY_THRESHOLD_HOURS`] rounded hours is a half day; anything else is
//! present. The rule consults no other threshold.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};
use crate::models::AttendanceStatus;

/// Worked hours below this value make the day a half day.
pub const HALF_DAY_THRESHOLD_HOURS: Decimal = Decimal::from_parts(4, 0, 0, false, 0);

const MILLIS_PER_HOUR: i64 = 3_600_000;

/// Hours between `check_in` and `check_out`, rounded half-up to 2 dp.
///
/// Fails with [`EngineError::CheckOutBeforeCheckIn`] when the interval is
/// negative.
///
/// # Example
///
/// ```
/// use hr_engine::calculation::elapsed_hours;
/// use chrono::{TimeZone, Utc};
/// use rust_decimal::Decimal;
///
/// let check_in = Utc.with_ymd_and_hms(2024, 3, 11, 9, 0, 0).unwrap();
/// let check_out = Utc.with_ymd_and_hms(2024, 3, 11, 17, 30, 0).unwrap();
/// assert_eq!(elapsed_hours(check_in, check_out).unwrap(), Decimal::new(850, 2));
/// ```
pub fn elapsed_hours(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> EngineResult<Decimal> {
    if check_out < check_in {
        return Err(EngineError::CheckOutBeforeCheckIn {
            check_in,
            check_out,
        });
    }

    let millis = (check_out - check_in).num_milliseconds();
    let hours = Decimal::from(millis) / Decimal::from(MILLIS_PER_HOUR);
    Ok(hours.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Status implied by a day's rounded worked hours.
pub fn status_for_hours(hours: Decimal) -> AttendanceStatus {
    if hours < HALF_DAY_THRESHOLD_HOURS {
        AttendanceStatus::HalfDay
    } else {
        AttendanceStatus::Present
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 11, h, m, s).unwrap()
    }

    #[test]
    fn test_full_day_is_present() {
        let hours = elapsed_hours(at(9, 0, 0), at(17, 30, 0)).unwrap();
        assert_eq!(hours, dec("8.5"));
        assert_eq!(status_for_hours(hours), AttendanceStatus::Present);
    }

    #[test]
    fn test_two_hours_is_half_day() {
        let hours = elapsed_hours(at(9, 0, 0), at(11, 0, 0)).unwrap();
        assert_eq!(hours, dec("2.0"));
        assert_eq!(status_for_hours(hours), AttendanceStatus::HalfDay);
    }

    #[test]
    fn test_exactly_four_hours_is_present() {
        let hours = elapsed_hours(at(9, 0, 0), at(13, 0, 0)).unwrap();
        assert_eq!(status_for_hours(hours), AttendanceStatus::Present);
    }

    #[test]
    fn test_rounds_half_up() {
        // 18 seconds = 0.005 hours exactly.
        let hours = elapsed_hours(at(9, 0, 0), at(9, 0, 18)).unwrap();
        assert_eq!(hours, dec("0.01"));
        // 20 minutes = 0.3333.. hours.
        let hours = elapsed_hours(at(9, 0, 0), at(9, 20, 0)).unwrap();
        assert_eq!(hours, dec("0.33"));
    }

    #[test]
    fn test_just_under_four_rounds_up_to_present() {
        // 3h59m59s rounds to 4.00.
        let hours = elapsed_hours(at(9, 0, 0), at(12, 59, 59)).unwrap();
        assert_eq!(hours, dec("4.00"));
        assert_eq!(status_for_hours(hours), AttendanceStatus::Present);
    }

    #[test]
    fn test_zero_length_day() {
        let hours = elapsed_hours(at(9, 0, 0), at(9, 0, 0)).unwrap();
        assert_eq!(hours, Decimal::ZERO);
        assert_eq!(status_for_hours(hours), AttendanceStatus::HalfDay);
    }

    #[test]
    fn test_check_out_before_check_in_fails() {
        let err = elapsed_hours(at(11, 0, 0), at(9, 0, 0)).unwrap_err();
        assert!(matches!(err, EngineError::CheckOutBeforeCheckIn { .. }));
    }

    proptest! {
        #[test]
        fn prop_status_is_half_day_iff_under_four(secs in 0i64..(16 * 3600)) {
            let check_in = at(6, 0, 0);
            let hours = elapsed_hours(check_in, check_in + Duration::seconds(secs)).unwrap();
            let status = status_for_hours(hours);
            prop_assert_eq!(status == AttendanceStatus::HalfDay, hours < dec("4"));
            prop_assert!(hours.scale() <= 2);
            prop_assert!(hours >= Decimal::ZERO);
        }
    }
}
