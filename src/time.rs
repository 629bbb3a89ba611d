//! Timestamp conversions between Jira and the connector.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Format used by JQL date predicates (`updated >= '2023-11-14 22:13'`).
const JQL_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Render epoch seconds as a minute-granularity UTC JQL date string.
///
/// Seconds are truncated, never rounded, so consecutive poll windows render
/// deterministically. Returns `None` for timestamps chrono cannot represent.
pub fn jql_datetime(epoch_secs: i64) -> Option<String> {
    DateTime::from_timestamp(epoch_secs, 0).map(|dt| dt.format(JQL_DATETIME_FORMAT).to_string())
}

/// Parse an issue timestamp into UTC.
///
/// Jira renders `updated` as `2023-11-14T22:13:20.000+0000`; RFC 3339 and
/// offset-less values (assumed UTC) are accepted too.
pub fn parse_jira_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_jql_datetime_truncates_to_minute() {
        assert_eq!(jql_datetime(1700000000).unwrap(), "2023-11-14 22:13");
        assert_eq!(jql_datetime(1700003600).unwrap(), "2023-11-14 23:13");
        // 59 seconds past the minute still renders the same minute
        assert_eq!(jql_datetime(1700000039).unwrap(), "2023-11-14 22:13");
    }

    #[test]
    fn test_jql_datetime_epoch_zero() {
        assert_eq!(jql_datetime(0).unwrap(), "1970-01-01 00:00");
    }

    #[test]
    fn test_parse_jira_format_with_offset() {
        let dt = parse_jira_time("2023-11-14T23:13:20.000+0100").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap());
    }

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_jira_time("2024-06-15T10:00:00Z").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_naive_assumes_utc() {
        let dt = parse_jira_time("2024-06-15T10:00:00.123").unwrap();
        assert_eq!(dt.timestamp(), 1718445600);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_jira_time("yesterday").is_none());
        assert!(parse_jira_time("").is_none());
    }
}
