//! Date arithmetic for recurrence resolution
//!
//! Pure helpers over naive dates. All month-offset math re-resolves the
//! target day for each candidate month, so negative ("from month end")
//! offsets stay correct across months of different lengths and leap years.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in a given month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 31,
    }
}

/// Map a signed day offset to a 1-based day number within a month
///
/// Positive offsets count from the start (1 = first day); negative offsets
/// count from the end (-1 = last day). Out-of-range offsets clamp to the
/// month boundaries.
pub fn day_offset_in_month(year: i32, month: u32, offset: i32) -> u32 {
    let len = days_in_month(year, month) as i32;
    let day = if offset > 0 { offset } else { len + 1 + offset };
    day.clamp(1, len) as u32
}

/// The date within three days of `date` falling on `target`
///
/// The weekday delta is computed mod 7 and folded into [-3, +3], so the
/// result is unique.
pub fn closest_weekday(target: Weekday, date: NaiveDate) -> NaiveDate {
    let delta = (target.num_days_from_monday() as i32
        - date.weekday().num_days_from_monday() as i32)
        .rem_euclid(7);
    let delta = if delta > 3 { delta - 7 } else { delta };
    date + Duration::days(delta as i64)
}

/// First date strictly after `date` whose day-of-month matches `offset`,
/// stepping forward by `every_n_months`-month multiples
pub fn next_month_day(date: NaiveDate, offset: i32, every_n_months: u32) -> NaiveDate {
    let step = every_n_months.max(1);
    let mut year = date.year();
    let mut month = date.month();
    loop {
        let day = day_offset_in_month(year, month, offset);
        if let Some(candidate) = NaiveDate::from_ymd_opt(year, month, day) {
            if candidate > date {
                return candidate;
            }
        }
        let months = month as i32 - 1 + step as i32;
        year += months / 12;
        month = (months % 12) as u32 + 1;
    }
}
