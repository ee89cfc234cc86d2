//! Lease date arithmetic.
//!
//! A rent payment covers `regular_payment_duration` units of the tenant's billing
//! period, starting on the payment date. Month and year steps are calendar-aware and
//! clamp to the last valid day of the target month.

use crate::{
    entities::PeriodUnit,
    errors::{Error, Result},
};
use chrono::{Days, Months, NaiveDate};

/// Builds the calendar date a transaction was booked on.
pub fn transaction_date(day: i32, month: i32, year: i32) -> Result<NaiveDate> {
    let month = u32::try_from(month).map_err(|_| Error::bad_request("invalid month"))?;
    let day = u32::try_from(day).map_err(|_| Error::bad_request("invalid day"))?;
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| Error::bad_request(format!("invalid date {year}-{month:02}-{day:02}")))
}

/// Computes the end of a lease that starts on `start` and lasts `duration` units.
///
/// ```text
/// 2024-01-31 + 3 month  -> 2024-04-30
/// 2024-02-29 + 1 year   -> 2025-02-28
/// 2024-03-01 + 2 week   -> 2024-03-15
/// ```
pub fn lease_end(start: NaiveDate, unit: PeriodUnit, duration: i32) -> Result<NaiveDate> {
    let count = u32::try_from(duration)
        .ok()
        .filter(|count| *count > 0)
        .ok_or_else(|| Error::bad_request("regular payment duration must be positive"))?;

    let end = match unit {
        PeriodUnit::Day => start.checked_add_days(Days::new(u64::from(count))),
        PeriodUnit::Week => start.checked_add_days(Days::new(u64::from(count) * 7)),
        PeriodUnit::Month => start.checked_add_months(Months::new(count)),
        PeriodUnit::Year => count
            .checked_mul(12)
            .and_then(|months| start.checked_add_months(Months::new(months))),
    };

    end.ok_or_else(|| Error::bad_request("lease end date is out of range"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_month_addition_clamps_to_month_end() {
        let end = lease_end(date(2024, 1, 31), PeriodUnit::Month, 3).unwrap();
        assert_eq!(end, date(2024, 4, 30));

        let end = lease_end(date(2024, 1, 31), PeriodUnit::Month, 1).unwrap();
        assert_eq!(end, date(2024, 2, 29));

        let end = lease_end(date(2024, 11, 15), PeriodUnit::Month, 3).unwrap();
        assert_eq!(end, date(2025, 2, 15));
    }

    #[test]
    fn test_year_addition_handles_leap_day() {
        let end = lease_end(date(2024, 2, 29), PeriodUnit::Year, 1).unwrap();
        assert_eq!(end, date(2025, 2, 28));

        let end = lease_end(date(2024, 2, 29), PeriodUnit::Year, 4).unwrap();
        assert_eq!(end, date(2028, 2, 29));
    }

    #[test]
    fn test_day_and_week_addition() {
        let end = lease_end(date(2024, 12, 30), PeriodUnit::Day, 5).unwrap();
        assert_eq!(end, date(2025, 1, 4));

        let end = lease_end(date(2024, 3, 1), PeriodUnit::Week, 2).unwrap();
        assert_eq!(end, date(2024, 3, 15));
    }

    #[test]
    fn test_non_positive_duration_is_rejected() {
        assert!(matches!(
            lease_end(date(2024, 1, 1), PeriodUnit::Month, 0),
            Err(Error::BadRequest { .. })
        ));
        assert!(matches!(
            lease_end(date(2024, 1, 1), PeriodUnit::Day, -2),
            Err(Error::BadRequest { .. })
        ));
    }

    #[test]
    fn test_transaction_date_validation() {
        assert_eq!(transaction_date(31, 1, 2024).unwrap(), date(2024, 1, 31));
        assert!(transaction_date(31, 4, 2024).is_err());
        assert!(transaction_date(1, 13, 2024).is_err());
        assert!(transaction_date(0, 1, 2024).is_err());
        assert!(transaction_date(-1, 1, 2024).is_err());
    }
}
