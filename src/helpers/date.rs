//! Date helper functions

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::fmt;
use tracing_subscriber::fmt::{format::Writer, time::FormatTime};

/// Default log timestamp format, e.g. `2025-11-15 09:41:07 PM`
pub const LOG_TIME_FORMAT: &str = "%Y-%m-%d %I:%M:%S %p";

/// Resolve an IANA timezone name, falling back to UTC
pub fn parse_timezone(name: &str) -> (Tz, bool) {
    match name.parse::<Tz>() {
        Ok(tz) => (tz, true),
        Err(_) => (Tz::UTC, false),
    }
}

/// Format `date` in `tz` with a chrono format string
pub fn format_in<Z: TimeZone>(date: &DateTime<Z>, tz: Tz, format: &str) -> String {
    date.with_timezone(&tz).format(format).to_string()
}

/// Log timer that stamps events in a fixed timezone
#[derive(Debug, Clone)]
pub struct ZonedTimer {
    tz: Tz,
}

impl ZonedTimer {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }
}

impl FormatTime for ZonedTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", format_in(&Utc::now(), self.tz, LOG_TIME_FORMAT))
    }
}

/// Render a `YYYY-MM-DD` date as `November 15, 2025`; other input is returned as-is
pub fn long_date(date: &str) -> String {
    match chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => d.format("%B %-d, %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timezone() {
        let (tz, known) = parse_timezone("Asia/Dhaka");
        assert!(known);
        assert_eq!(tz, chrono_tz::Asia::Dhaka);

        let (tz, known) = parse_timezone("Mars/Olympus");
        assert!(!known);
        assert_eq!(tz, Tz::UTC);
    }

    #[test]
    fn test_format_in_dhaka() {
        let date = Utc.with_ymd_and_hms(2025, 11, 15, 15, 41, 7).unwrap();
        let s = format_in(&date, chrono_tz::Asia::Dhaka, LOG_TIME_FORMAT);
        assert_eq!(s, "2025-11-15 09:41:07 PM");
    }

    #[test]
    fn test_timer_writes_timestamp() {
        let timer = ZonedTimer::new(chrono_tz::Asia::Dhaka);
        let mut out = String::new();
        timer.format_time(&mut Writer::new(&mut out)).unwrap();
        assert_eq!(out.len(), "2025-11-15 09:41:07 PM".len());
        assert!(out.ends_with("AM") || out.ends_with("PM"), "{out}");
    }

    #[test]
    fn test_long_date() {
        assert_eq!(long_date("2025-11-05"), "November 5, 2025");
        assert_eq!(long_date("soon"), "soon");
    }
}
