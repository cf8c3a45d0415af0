use chrono::{Datelike, Duration, NaiveDate};

/// Advances `date` by `months` calendar months.
///
/// When the target month is shorter than the source day-of-month the result
/// is clamped to the last day of the target month (Jan 31 + 1 month is
/// Feb 28, or Feb 29 in leap years).
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    shift_month(date, months as i32)
}

fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let index = date.year() * 12 + date.month0() as i32 + months;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .map(|first_next| (first_next - Duration::days(1)).day())
        .unwrap_or(28)
}
