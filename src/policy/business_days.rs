use chrono::{Datelike, NaiveDate, Weekday};

/// Counts the Monday–Friday days in the inclusive interval `[start, end]`.
///
/// Public holidays are not considered; only weekends are excluded. Callers
/// must ensure `start <= end` (the eligibility rules check the ordering
/// before charging a duration); an inverted interval counts as 0.
pub fn business_days(start: NaiveDate, end: NaiveDate) -> u32 {
    let mut days = 0;
    let mut current = start;

    while current <= end {
        if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            days += 1;
        }
        current = match current.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    days
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn single_weekday_counts_as_one() {
        // 2025-08-20 is a Wednesday
        let wed = date(2025, 8, 20);
        assert_eq!(business_days(wed, wed), 1);
    }

    #[test]
    fn single_weekend_day_counts_as_zero() {
        // 2025-08-16 Saturday, 2025-08-17 Sunday
        assert_eq!(business_days(date(2025, 8, 16), date(2025, 8, 16)), 0);
        assert_eq!(business_days(date(2025, 8, 17), date(2025, 8, 17)), 0);
    }

    #[test]
    fn span_within_one_work_week_is_plain_day_arithmetic() {
        // Mon 2025-08-18 .. Thu 2025-08-21, no weekend inside
        let start = date(2025, 8, 18);
        let end = date(2025, 8, 21);
        assert_eq!(business_days(start, end), (21 - 18 + 1) as u32);
    }

    #[test]
    fn shifting_both_endpoints_by_whole_weeks_preserves_the_count() {
        let start = date(2025, 8, 13);
        let end = date(2025, 8, 27);
        let base = business_days(start, end);
        for weeks in 1..=4 {
            let shift = chrono::Duration::days(7 * weeks);
            assert_eq!(business_days(start + shift, end + shift), base);
        }
    }

    #[test]
    fn friday_to_monday_across_two_weekends() {
        // Fri 2025-08-15 .. Mon 2025-08-25, counted by hand against a
        // calendar: Fri 15, Mon 18..Fri 22, Mon 25 = 7. Both weekends
        // (16/17 and 23/24) excluded, both endpoints included.
        assert_eq!(business_days(date(2025, 8, 15), date(2025, 8, 25)), 7);
    }

    #[test]
    fn weekend_only_interval_is_zero() {
        assert_eq!(business_days(date(2025, 8, 16), date(2025, 8, 17)), 0);
    }

    #[test]
    fn crosses_month_and_year_boundaries() {
        // Tue 2025-12-30 .. Fri 2026-01-02: Tue, Wed, Thu, Fri = 4
        assert_eq!(business_days(date(2025, 12, 30), date(2026, 1, 2)), 4);
    }

    #[test]
    fn handles_leap_day() {
        // Wed 2024-02-28 .. Fri 2024-03-01: Wed, Thu (leap day), Fri = 3
        assert_eq!(business_days(date(2024, 2, 28), date(2024, 3, 1)), 3);
    }

    #[test]
    fn inverted_interval_counts_nothing() {
        assert_eq!(business_days(date(2025, 8, 25), date(2025, 8, 15)), 0);
    }
}
