//! Calendar dates in Nashville time.

use crate::error::SportsError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::{Tz, US::Central};

pub const CENTRAL_TIME: Tz = Central;

/// The US/Central calendar date of an instant.
pub fn central_date(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&CENTRAL_TIME).date_naive()
}

/// Parse an ESPN timestamp (`2024-11-14T22:00Z`, with or without seconds)
/// into its US/Central calendar date.
pub fn parse_espn_date(value: &str) -> Result<NaiveDate, SportsError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(central_date(parsed.with_timezone(&Utc)));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%MZ")
        .map(|naive| central_date(naive.and_utc()))
        .map_err(|_| SportsError::InvalidDate(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_without_seconds() {
        let date = parse_espn_date("2024-11-14T22:00Z").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 11, 14).unwrap());
    }

    #[test]
    fn test_late_utc_games_land_on_previous_day() {
        let date = parse_espn_date("2024-12-25T01:00Z").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 12, 24).unwrap());
    }

    #[test]
    fn test_parse_rfc3339() {
        let date = parse_espn_date("2024-09-01T00:30:00Z").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 8, 31).unwrap());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_espn_date("yesterday"),
            Err(SportsError::InvalidDate(_))
        ));
    }
}
