use chrono::{DateTime, Duration, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

/// Parses either a plain ISO date (`2049-05-03`) or an RFC 3339 timestamp.
/// Timestamps are normalized to UTC and truncated to their calendar day.
pub fn parse_calendar_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    let value = value.trim();
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => Ok(date),
        Err(_) => DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc).date_naive()),
    }
}

pub fn deserialize_calendar_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_calendar_date(&raw).map_err(|e| {
        serde::de::Error::custom(format!("invalid date '{}': {}", raw, e))
    })
}

/// Half-open UTC calendar day: `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    /// `None` when the following midnight is past the last representable date.
    pub fn for_date(date: NaiveDate) -> Option<Self> {
        let start = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
        let end = start.checked_add_signed(Duration::days(1))?;
        Some(Self { start, end })
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Bounds formatted the way the launch directory expects (`...T00:00:00Z`).
    pub fn rfc3339_bounds(&self) -> (String, String) {
        (
            self.start.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.end.to_rfc3339_opts(SecondsFormat::Secs, true),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_timestamp() {
        let expected = NaiveDate::from_ymd_opt(2049, 5, 3).unwrap();
        assert_eq!(parse_calendar_date("2049-05-03").unwrap(), expected);
        assert_eq!(parse_calendar_date("2049-05-03T22:15:00Z").unwrap(), expected);
        // 01:00 at +02:00 is still the previous day in UTC
        assert_eq!(
            parse_calendar_date("2049-05-04T01:00:00+02:00").unwrap(),
            expected
        );
        assert!(parse_calendar_date("next tuesday").is_err());
    }

    #[test]
    fn test_window_is_half_open() {
        let date = NaiveDate::from_ymd_opt(2049, 5, 3).unwrap();
        let window = DayWindow::for_date(date).unwrap();

        let start = Utc.with_ymd_and_hms(2049, 5, 3, 0, 0, 0).unwrap();
        let last_second = Utc.with_ymd_and_hms(2049, 5, 3, 23, 59, 59).unwrap();
        let next_midnight = Utc.with_ymd_and_hms(2049, 5, 4, 0, 0, 0).unwrap();

        assert!(window.contains(start));
        assert!(window.contains(last_second));
        assert!(!window.contains(next_midnight));
    }

    #[test]
    fn test_rfc3339_bounds() {
        let window = DayWindow::for_date(NaiveDate::from_ymd_opt(2049, 12, 31).unwrap()).unwrap();
        let (gte, lt) = window.rfc3339_bounds();
        assert_eq!(gte, "2049-12-31T00:00:00Z");
        assert_eq!(lt, "2050-01-01T00:00:00Z");
    }

    #[test]
    fn test_window_for_last_date_is_none() {
        assert!(DayWindow::for_date(NaiveDate::MAX).is_none());
        assert!(parse_calendar_date("+262142-12-31").is_ok());
    }
}
