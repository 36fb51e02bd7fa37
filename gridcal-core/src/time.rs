//! Date/time parsing and formatting on the single local clock.
//!
//! All instants are `NaiveDateTime`: gridcal never reasons about time zones.
//! Stored records written by other tools may carry an offset (`...Z`); those are
//! converted to the local wall clock once, at decode time.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::error::{CalError, CalResult};

/// Formats accepted for a date with a time of day, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const STORE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse YYYY-MM-DD.
pub fn parse_date(s: &str) -> CalResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| CalError::InvalidDate(s.to_string()))
}

/// Parse an ISO-8601 instant.
///
/// Accepts local date-times (`2024-03-01T09:00`, `2024-03-01T09:00:00.000`),
/// RFC 3339 with an offset (converted to the local clock) and bare dates
/// (midnight).
pub fn parse_datetime(s: &str) -> CalResult<NaiveDateTime> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Local).naive_local());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }

    parse_date(s).map(start_of_day)
}

/// Format an instant the way the event store writes it.
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(STORE_FORMAT).to_string()
}

/// 12-hour clock time, e.g. "9:00 AM".
pub fn format_time(dt: &NaiveDateTime) -> String {
    dt.format("%-I:%M %p").to_string()
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

pub fn is_same_day(a: &NaiveDateTime, b: &NaiveDateTime) -> bool {
    a.date() == b.date()
}

/// Milliseconds since the Unix epoch of a local wall-clock instant.
///
/// An ambiguous time (clocks turned back) takes the earlier instant. A time
/// skipped by a clock change has no instant and falls back to reading it as UTC.
pub fn epoch_millis(dt: &NaiveDateTime) -> i64 {
    match Local.from_local_datetime(dt).earliest() {
        Some(local) => local.timestamp_millis(),
        None => dt.and_utc().timestamp_millis(),
    }
}

/// Serde adapter for required instants.
pub mod iso {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_datetime(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_datetime(&s).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for nullable instants (`null` and a missing key both mean `None`).
pub mod iso_opt {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        dt: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match dt {
            Some(dt) => serializer.serialize_str(&super::format_datetime(dt)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let s = Option::<String>::deserialize(deserializer)?;
        match s.as_deref() {
            None | Some("") => Ok(None),
            Some(s) => super::parse_datetime(s)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hm(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn parse_datetime_local_forms() {
        let expected = ymd_hm(2024, 3, 1, 9, 0);
        assert_eq!(parse_datetime("2024-03-01T09:00").unwrap(), expected);
        assert_eq!(parse_datetime("2024-03-01T09:00:00").unwrap(), expected);
        assert_eq!(parse_datetime("2024-03-01T09:00:00.000").unwrap(), expected);
        assert_eq!(parse_datetime("2024-03-01 09:00").unwrap(), expected);
    }

    #[test]
    fn parse_datetime_bare_date_is_midnight() {
        assert_eq!(
            parse_datetime("2024-03-01").unwrap(),
            ymd_hm(2024, 3, 1, 0, 0)
        );
    }

    #[test]
    fn parse_datetime_with_offset_converts_to_local_clock() {
        let parsed = parse_datetime("2024-03-01T09:00:00.000Z").unwrap();
        let expected = DateTime::parse_from_rfc3339("2024-03-01T09:00:00Z")
            .unwrap()
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn parse_datetime_rejects_garbage() {
        assert!(matches!(
            parse_datetime("next tuesday"),
            Err(CalError::InvalidDate(_))
        ));
        assert!(parse_datetime("2024-13-01").is_err());
    }

    #[test]
    fn format_time_uses_twelve_hour_clock() {
        assert_eq!(format_time(&ymd_hm(2024, 3, 1, 9, 5)), "9:05 AM");
        assert_eq!(format_time(&ymd_hm(2024, 3, 1, 15, 30)), "3:30 PM");
        assert_eq!(format_time(&ymd_hm(2024, 3, 1, 0, 0)), "12:00 AM");
    }

    #[test]
    fn epoch_millis_is_the_real_instant_of_local_time() {
        let dt = ymd_hm(2024, 3, 1, 9, 0);
        let millis = epoch_millis(&dt);

        let back = DateTime::from_timestamp_millis(millis)
            .unwrap()
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(back, dt);
        assert_eq!(epoch_millis(&ymd_hm(2024, 3, 1, 9, 1)) - millis, 60_000);
    }
}
