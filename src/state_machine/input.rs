//! Parsing of free-text replies

use crate::status::{Hours, HoursError};
use chrono::{DateTime, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use thiserror::Error;

/// Accepted layout for typed reopen times
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("missing '-' between opening and closing hour")]
    MissingSeparator,
    #[error("{0:?} is not a whole hour")]
    NotAnHour(String),
    #[error(transparent)]
    Hours(#[from] HoursError),
    #[error("{0:?} does not match YYYY-MM-DD HH:MM")]
    BadDateTime(String),
    #[error("{0} does not exist in the court's time zone")]
    NonexistentLocalTime(NaiveDateTime),
}

/// Parse `OPEN-CLOSE`, e.g. `7-19`
pub fn parse_hours(text: &str) -> Result<Hours, InputError> {
    let (open, close) = text.trim().split_once('-').ok_or(InputError::MissingSeparator)?;
    let open = parse_hour(open)?;
    let close = parse_hour(close)?;
    Ok(Hours::new(open, close)?)
}

fn parse_hour(part: &str) -> Result<u8, InputError> {
    let part = part.trim();
    let value: i64 = part
        .parse()
        .map_err(|_| InputError::NotAnHour(part.to_string()))?;
    u8::try_from(value)
        .ok()
        .filter(|h| *h <= 23)
        .ok_or(InputError::Hours(HoursError::OutOfRange(value)))
}

/// Parse `YYYY-MM-DD HH:MM` as local time in `tz`
pub fn parse_local_datetime(text: &str, tz: &Tz) -> Result<DateTime<Tz>, InputError> {
    let text = text.trim();
    let naive = NaiveDateTime::parse_from_str(text, DATETIME_FORMAT)
        .map_err(|_| InputError::BadDateTime(text.to_string()))?;
    resolve_local(tz, naive).ok_or(InputError::NonexistentLocalTime(naive))
}

/// Attach `tz` to a wall-clock time
///
/// Ambiguous times (clocks going back) resolve to the earlier instant;
/// skipped times (clocks going forward) do not resolve.
pub fn resolve_local(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&naive).earliest()
}
