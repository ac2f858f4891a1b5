//! Calendar arithmetic for salary and retirement rules.
//!
//! RULES:
//!   - Month counting is calendar-based, never 30-day buckets: the count
//!     increments only once the day-of-month has been reached.
//!   - Month addition keeps the day-of-month, clamping to the last valid
//!     day of the target month (Jan 31 + 1 month = Feb 28/29).
//!   - `months_between(a, b) == -months_between(b, a)` always holds.

use chrono::{Datelike, NaiveDate};

/// Whole calendar months from `from` to `to`. Partial months are dropped.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    if to < from {
        return -months_between(to, from);
    }
    let mut months =
        (to.year() - from.year()) * 12 + (to.month() as i32 - from.month() as i32);
    if to.day() < from.day() {
        months -= 1;
    }
    months
}

/// Add `months` calendar months (may be negative), clamping the
/// day-of-month to the end of the target month.
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let total = date.year() * 12 + date.month0() as i32 + months;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, date.day())
        .unwrap_or_else(|| last_day_of_month(year, month))
}

/// Add whole years; Feb 29 clamps to Feb 28 in non-leap target years.
pub fn add_years(date: NaiveDate, years: i32) -> NaiveDate {
    add_months(date, years * 12)
}

/// Last valid day of the given month.
pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_y, next_m) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_y, next_m, 1)
        .expect("month in 1..=12")
        .pred_opt()
        .expect("date not at calendar minimum")
}

/// First and last day of the calendar quarter containing `date`.
pub fn quarter_window(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let q_start_month = ((date.month() - 1) / 3) * 3 + 1;
    let start = NaiveDate::from_ymd_opt(date.year(), q_start_month, 1)
        .expect("quarter start is always valid");
    let end = last_day_of_month(date.year(), q_start_month + 2);
    (start, end)
}

/// First and last day of the month preceding `date`'s month.
pub fn previous_month_window(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let (y, m) = if date.month() == 1 {
        (date.year() - 1, 12)
    } else {
        (date.year(), date.month() - 1)
    };
    let start = NaiveDate::from_ymd_opt(y, m, 1).expect("month start is always valid");
    (start, last_day_of_month(y, m))
}
