//! Small pure derivations shared by the dashboard, reports and importers.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::domain::{Client, Expense, Session, SessionType};

const SECONDS_PER_DAY: i64 = 86_400;

/// `duration * rate`. Reports read the stored `total_earned` instead so historical
/// snapshots survive; this is the value written at log/edit time.
pub fn earned_amount(session: &Session) -> f64 {
    session.duration * session.rate
}

/// Calendar year of a date-only value, read from its own calendar components.
pub fn calendar_year(date: NaiveDate) -> i32 {
    date.year()
}

/// Zero-based month index (0 = January).
pub fn month_index(date: NaiveDate) -> usize {
    date.month0() as usize
}

pub fn is_deductible(expense: &Expense) -> bool {
    expense.deductible
}

/// Round-trip business miles for a session with `client`.
pub fn round_trip_mileage(client: &Client, session_type: SessionType) -> f64 {
    if session_type.is_in_person() {
        2.0 * client.distance_from_home
    } else {
        0.0
    }
}

/// Whole days elapsed between the start of `date` and `now`, floored.
pub fn days_since(date: NaiveDate, now: NaiveDateTime) -> i64 {
    let start = date.and_time(chrono::NaiveTime::MIN);
    let elapsed = now.signed_duration_since(start).num_seconds();
    elapsed.div_euclid(SECONDS_PER_DAY)
}

/// Ratio guarded against a zero denominator.
pub fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator.abs() < f64::EPSILON {
        0.0
    } else {
        numerator / denominator
    }
}

pub fn in_year(date: NaiveDate, year: i32) -> bool {
    calendar_year(date) == year
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn days_since_floors_partial_days() {
        let now = date(2024, 3, 11).and_time(NaiveTime::from_hms_opt(8, 30, 0).unwrap());
        assert_eq!(days_since(date(2024, 3, 1), now), 10);
        assert_eq!(days_since(date(2024, 3, 11), now), 0);
        assert_eq!(days_since(date(2024, 3, 12), now), -1);
    }

    #[test]
    fn year_boundaries_use_calendar_components() {
        assert_eq!(calendar_year(date(2023, 12, 31)), 2023);
        assert_eq!(calendar_year(date(2024, 1, 1)), 2024);
        assert_eq!(month_index(date(2024, 1, 1)), 0);
        assert_eq!(month_index(date(2024, 12, 31)), 11);
    }

    #[test]
    fn mileage_is_round_trip_for_in_person_only() {
        let client = Client::new("Ada", 40.0, 7.5);
        assert_eq!(round_trip_mileage(&client, SessionType::InPerson), 15.0);
        assert_eq!(round_trip_mileage(&client, SessionType::Virtual), 0.0);
    }

    #[test]
    fn ratio_guards_zero_denominator() {
        assert_eq!(ratio_or_zero(10.0, 0.0), 0.0);
        assert_eq!(ratio_or_zero(10.0, 40.0), 0.25);
    }
}
