//! Conversion between the separate date/time form fields and stored instants.
//!
//! Forms carry local wall-clock values; storage is always UTC.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};

use crate::errors::ServiceError;

const INPUT_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Build an offset from minutes east of UTC, as configured.
pub fn offset_from_minutes(minutes: i32) -> Result<FixedOffset, ServiceError> {
    FixedOffset::east_opt(minutes * 60)
        .ok_or_else(|| ServiceError::Validation(format!("utc offset out of range: {minutes} minutes")))
}

/// Join the two form fields with a space and read the result as local time.
pub fn parse_local(date: &str, time: &str, offset: FixedOffset) -> Result<DateTime<Utc>, ServiceError> {
    let joined = format!("{} {}", date.trim(), time.trim());
    let naive = INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&joined, fmt).ok())
        .ok_or_else(|| ServiceError::Validation(format!("invalid date/time: {joined:?}")))?;
    // a fixed offset maps every local time to exactly one instant
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| ServiceError::Validation(format!("invalid date/time: {joined:?}")))
}

/// Split a stored instant back into local `(date, time)` form values.
pub fn split_local<Tz: TimeZone>(at: &DateTime<Tz>, offset: FixedOffset) -> (String, String) {
    let local = at.with_timezone(&offset);
    (local.format(DATE_FORMAT).to_string(), local.format(TIME_FORMAT).to_string())
}

/// Human-readable local rendering used by pages.
pub fn display_local<Tz: TimeZone>(at: &DateTime<Tz>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format("%a %d %b %Y, %H:%M").to_string()
}

pub fn parse_capacity(raw: &str) -> Result<i32, ServiceError> {
    let max: i32 = raw
        .trim()
        .parse()
        .map_err(|_| ServiceError::Validation(format!("max participants must be a whole number, got {raw:?}")))?;
    if max < 0 {
        return Err(ServiceError::Validation("max participants must not be negative".into()));
    }
    Ok(max)
}
