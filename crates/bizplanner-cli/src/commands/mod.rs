pub mod game;
pub mod prefs;
pub mod profile;
pub mod project;
pub mod reset;
pub mod stats;
pub mod task;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Parse a timestamp argument: RFC3339, or a bare `YYYY-MM-DD` meaning
/// midnight UTC.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("invalid timestamp '{s}' (expected RFC3339 or YYYY-MM-DD)"))?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}
