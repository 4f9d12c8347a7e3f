//! Calendar helpers for the derived-age projection and the age-range
//! filters. All "today" values are taken in UTC; the original program mixed
//! UTC and local construction, this implementation standardizes on UTC.

use chrono::{Datelike, NaiveDate, Utc};

use crate::shared::constants::DISPLAY_DATE_FORMAT;

pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Whole-year age as of `today`: year difference, decremented by one if the
/// birth month/day has not occurred yet this year.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}

/// Birth-date cutoff for an age bound: `today - years`, by calendar-year
/// subtraction. Feb 29 falls back to Feb 28 when the target year is not a
/// leap year.
pub fn birthdate_cutoff(today: NaiveDate, years: i32) -> NaiveDate {
    let year = today.year() - years;
    NaiveDate::from_ymd_opt(year, today.month(), today.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, today.month(), today.day() - 1))
        .unwrap_or(today)
}

pub fn display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn age_decrements_before_birthday() {
        let dob = d(2000, 6, 15);
        assert_eq!(age_on(dob, d(2024, 6, 14)), 23);
        assert_eq!(age_on(dob, d(2024, 6, 15)), 24);
        assert_eq!(age_on(dob, d(2024, 6, 16)), 24);
        assert_eq!(age_on(dob, d(2024, 12, 31)), 24);
        assert_eq!(age_on(dob, d(2024, 1, 1)), 23);
    }

    #[test]
    fn cutoff_is_calendar_year_subtraction() {
        assert_eq!(birthdate_cutoff(d(2024, 6, 15), 18), d(2006, 6, 15));
        assert_eq!(birthdate_cutoff(d(2024, 6, 15), 0), d(2024, 6, 15));
    }

    #[test]
    fn cutoff_handles_leap_day() {
        // 2024-02-29 minus 1 year: 2023 has no Feb 29
        assert_eq!(birthdate_cutoff(d(2024, 2, 29), 1), d(2023, 2, 28));
        // minus 4 years lands on a leap year again
        assert_eq!(birthdate_cutoff(d(2024, 2, 29), 4), d(2020, 2, 29));
    }

    #[test]
    fn display_date_is_iso() {
        assert_eq!(display_date(d(2024, 1, 5)), "2024-01-05");
    }
}
