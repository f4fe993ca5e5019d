//! Permissive date parsing for value ranges

use super::{DaoError, DaoResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a client-supplied timestamp as local wall-clock time
///
/// An RFC 3339 offset is dropped: value timestamps are stored in local time
/// with the offset in a separate column. A bare date is midnight.
pub fn parse_datetime(input: &str) -> DaoResult<NaiveDateTime> {
    let s = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            if let Some(dt) = date.and_hms_opt(0, 0, 0) {
                return Ok(dt);
            }
        }
    }

    Err(DaoError::InvalidDate {
        input: input.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_accepted_formats() {
        let cases = [
            ("2020-01-01T05:06:07-07:00", "2020-01-01 05:06:07"),
            ("2020-01-01T05:06:07Z", "2020-01-01 05:06:07"),
            ("2020-01-01T05:06:07", "2020-01-01 05:06:07"),
            ("2020-01-01T05:06", "2020-01-01 05:06:00"),
            ("2020-01-01 05:06:07", "2020-01-01 05:06:07"),
            ("2020-01-01 05:06", "2020-01-01 05:06:00"),
            ("2020-01-01", "2020-01-01 00:00:00"),
            ("2020/01/01", "2020-01-01 00:00:00"),
            ("01/31/2020", "2020-01-31 00:00:00"),
            ("  2020-01-01  ", "2020-01-01 00:00:00"),
        ];
        for (input, expected) in cases {
            assert_eq!(parse_datetime(input).unwrap(), dt(expected), "{}", input);
        }
    }

    #[test]
    fn test_fractional_seconds() {
        use chrono::Timelike;
        let parsed = parse_datetime("2020-01-01T05:06:07.250").unwrap();
        assert_eq!(parsed.nanosecond(), 250_000_000);
    }

    #[test]
    fn test_rejects_garbage() {
        for input in ["", "yesterday", "2020-13-01", "31/01/2020"] {
            assert!(
                matches!(parse_datetime(input), Err(DaoError::InvalidDate { .. })),
                "{}",
                input
            );
        }
    }
}
