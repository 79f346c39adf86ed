//! Calendar arithmetic and the two day-count conventions used for pricing.
//!
//! Full periods are priced as a 30-day commercial month regardless of the
//! real month's length. Edge fragments (the opening stub and the closing
//! residual) are counted in actual calendar days. The two conventions are kept
//! as separately named functions so that the distinction stays visible at the
//! call site.

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{Money, Percent};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Length of a commercial month in days.
pub const COMMERCIAL_MONTH_DAYS: u32 = 30;

const COMMERCIAL_MONTH: Decimal = dec!(30);
const PERCENT: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

/// Daily accrual under the commercial convention: `amount * rate% / 30`.
pub fn daily_rate(amount: Money, monthly_rate_percent: Percent) -> Money {
    amount * (monthly_rate_percent / PERCENT) / COMMERCIAL_MONTH
}

/// Amount for one full commercial month (30 days at the daily rate).
///
/// Computed directly as `amount * rate%` so that full periods come out exact
/// instead of accumulating the repeating decimal of `daily_rate * 30`.
pub fn commercial_full_period_amount(amount: Money, monthly_rate_percent: Percent) -> Money {
    amount * monthly_rate_percent / PERCENT
}

/// Amount for a fragment measured in actual calendar days.
pub fn actual_day_fragment_amount(
    amount: Money,
    monthly_rate_percent: Percent,
    days: u32,
) -> Money {
    commercial_full_period_amount(amount, monthly_rate_percent) * Decimal::from(days)
        / COMMERCIAL_MONTH
}

// ---------------------------------------------------------------------------
// Day counts
// ---------------------------------------------------------------------------

/// Actual calendar days from `from` to `to`, clamped at zero.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> u32 {
    let days = (to - from).num_days().max(0);
    u32::try_from(days).unwrap_or(u32::MAX)
}

// ---------------------------------------------------------------------------
// Month arithmetic
// ---------------------------------------------------------------------------

/// Shift `date` by a number of calendar months, clamping the day to the end
/// of shorter months. Out-of-range results leave `date` unchanged; validated
/// terms never reach them.
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

/// The given day of `date`'s month, clamped to the month's last day.
pub fn on_day(date: NaiveDate, day: u32) -> NaiveDate {
    let day = day.clamp(1, days_in_month(date.year(), date.month()));
    date.with_day(day).unwrap_or(date)
}

/// First day of `date`'s month.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    on_day(date, 1)
}

/// Number of days in a given month/year.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next| next.pred_opt())
        .map_or(COMMERCIAL_MONTH_DAYS, |last| last.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_daily_rate_commercial_month() {
        // 50,000 * 1.85% = 925 per month; / 30
        let rate = daily_rate(dec!(50000), dec!(1.85));
        assert!((rate - dec!(30.8333333)).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_full_period_is_exact() {
        assert_eq!(
            commercial_full_period_amount(dec!(50000), dec!(1.85)),
            dec!(925)
        );
    }

    #[test]
    fn test_fragment_of_thirty_days_equals_full_period() {
        assert_eq!(
            actual_day_fragment_amount(dec!(50000), dec!(1.85), 30),
            commercial_full_period_amount(dec!(50000), dec!(1.85))
        );
    }

    #[test]
    fn test_fragment_26_days() {
        let amount = actual_day_fragment_amount(dec!(50000), dec!(1.85), 26);
        assert_eq!(amount.round_dp(2), dec!(801.67));
    }

    #[test]
    fn test_zero_day_fragment_is_zero() {
        assert_eq!(
            actual_day_fragment_amount(dec!(50000), dec!(1.85), 0),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_days_between_actual_calendar() {
        assert_eq!(days_between(date(2024, 1, 15), date(2024, 2, 10)), 26);
        // Leap February counts its 29th
        assert_eq!(days_between(date(2024, 2, 1), date(2024, 3, 1)), 29);
        assert_eq!(days_between(date(2023, 2, 1), date(2023, 3, 1)), 28);
    }

    #[test]
    fn test_days_between_clamps_negative() {
        assert_eq!(days_between(date(2024, 3, 10), date(2024, 3, 1)), 0);
        assert_eq!(days_between(date(2024, 3, 10), date(2024, 3, 10)), 0);
    }

    #[test]
    fn test_add_months_clamps_to_month_end() {
        assert_eq!(add_months(date(2024, 1, 31), 1), date(2024, 2, 29));
        assert_eq!(add_months(date(2023, 1, 31), 1), date(2023, 2, 28));
        assert_eq!(add_months(date(2024, 1, 15), 6), date(2024, 7, 15));
        assert_eq!(add_months(date(2024, 11, 30), 3), date(2025, 2, 28));
    }

    #[test]
    fn test_add_months_negative() {
        assert_eq!(add_months(date(2024, 3, 31), -1), date(2024, 2, 29));
        assert_eq!(add_months(date(2024, 1, 10), -1), date(2023, 12, 10));
    }

    #[test]
    fn test_on_day_clamps() {
        assert_eq!(on_day(date(2024, 4, 2), 31), date(2024, 4, 30));
        assert_eq!(on_day(date(2024, 2, 2), 30), date(2024, 2, 29));
        assert_eq!(on_day(date(2024, 5, 20), 10), date(2024, 5, 10));
        assert_eq!(first_of_month(date(2024, 5, 20)), date(2024, 5, 1));
    }

    #[test]
    fn test_days_in_month_follows_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2023, 4), 30);
        assert_eq!(days_in_month(2023, 12), 31);
    }

    #[test]
    fn test_add_months_agrees_with_term_validation() {
        // Maturity and the validation bound use the same month arithmetic
        let start = date(2023, 8, 31);
        for months in 0..=24u32 {
            assert_eq!(
                add_months(start, months as i32),
                start.checked_add_months(Months::new(months)).unwrap()
            );
        }
    }
}
