//! Calendar helpers shared by the depreciation engine.

use chrono::{Datelike, NaiveDate};

use crate::error::FixedAssetError;
use crate::FixedAssetResult;

/// Add a number of months to a date, clamping the day to the month's max.
pub fn add_months(date: NaiveDate, months: u32) -> FixedAssetResult<NaiveDate> {
    let out_of_range =
        || FixedAssetError::DateError(format!("{date} + {months} months is out of range"));
    let total_months = i32::try_from(months)
        .ok()
        .and_then(|m| (date.year() * 12 + date.month() as i32 - 1).checked_add(m))
        .ok_or_else(out_of_range)?;
    let new_year = total_months.div_euclid(12);
    let new_month = (total_months.rem_euclid(12) + 1) as u32;
    let max_day = days_in_month(new_year, new_month);
    let day = date.day().min(max_day);
    NaiveDate::from_ymd_opt(new_year, new_month, day).ok_or_else(out_of_range)
}

/// Number of days in a given month/year.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// True when `day` is the last day of February in `year`.
pub fn is_last_day_of_february(year: i32, day: u32) -> bool {
    day == days_in_month(year, 2)
}
