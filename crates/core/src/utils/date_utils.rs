//! Calendar arithmetic for recurring-rule stepping.
//!
//! Monthly stepping preserves the rule's nominal day-of-month, clamping to
//! the target month's last day when the nominal day does not exist there
//! (day 31 in a 30-day month becomes day 30, and returns to 31 as soon as a
//! following month supports it).

use chrono::{Datelike, Duration, NaiveDate};

/// Number of days in the month containing `(year, month)`.
pub fn last_day_of_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

/// Builds a date with `day` clamped into the month's valid range.
pub fn clamped_ymd(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let clamped = day.clamp(1, last_day_of_month(year, month));
    NaiveDate::from_ymd_opt(year, month, clamped)
}

/// Seven calendar days after `date`.
pub fn next_week(date: NaiveDate) -> NaiveDate {
    date + Duration::days(7)
}

/// The nominal day in the month after `date`, clamped.
pub fn next_month_day(date: NaiveDate, nominal_day: u32) -> Option<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    clamped_ymd(year, month, nominal_day)
}

/// The nominal day in the month before `date`, clamped.
pub fn prev_month_day(date: NaiveDate, nominal_day: u32) -> Option<NaiveDate> {
    let (year, month) = if date.month() == 1 {
        (date.year() - 1, 12)
    } else {
        (date.year(), date.month() - 1)
    };
    clamped_ymd(year, month, nominal_day)
}

/// Same month/day one year after `date`; Feb 29 clamps to Feb 28 off leap years.
pub fn next_year_day(date: NaiveDate) -> Option<NaiveDate> {
    clamped_ymd(date.year() + 1, date.month(), date.day())
}

/// Same month/day one year before `date`, clamped.
pub fn prev_year_day(date: NaiveDate) -> Option<NaiveDate> {
    clamped_ymd(date.year() - 1, date.month(), date.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn monthly_step_clamps_to_short_months() {
        // Nominal day 31: January -> February (clamped) -> March (restored)
        let jan = date(2025, 1, 31);
        let feb = next_month_day(jan, 31).unwrap();
        assert_eq!(feb, date(2025, 2, 28));
        let mar = next_month_day(feb, 31).unwrap();
        assert_eq!(mar, date(2025, 3, 31));
    }

    #[test]
    fn monthly_step_clamps_in_leap_february() {
        let jan = date(2024, 1, 30);
        assert_eq!(next_month_day(jan, 30).unwrap(), date(2024, 2, 29));
    }

    #[test]
    fn monthly_step_rolls_over_year_end() {
        let dec = date(2025, 12, 15);
        assert_eq!(next_month_day(dec, 15).unwrap(), date(2026, 1, 15));
    }

    #[test]
    fn yearly_step_clamps_leap_day() {
        let leap = date(2024, 2, 29);
        assert_eq!(next_year_day(leap).unwrap(), date(2025, 2, 28));
    }

    #[test]
    fn prev_steps_invert_next_steps_on_stable_days() {
        let d = date(2025, 6, 10);
        assert_eq!(prev_month_day(next_month_day(d, 10).unwrap(), 10).unwrap(), d);
        assert_eq!(prev_year_day(next_year_day(d).unwrap()).unwrap(), d);
    }
}
