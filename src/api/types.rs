//! API request and response types

use crate::status::{CourtStatus, Hours, HoursOverride, StatusRecord};
use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Shown in place of a weather reading that could not be fetched
pub const NOT_AVAILABLE: &str = "N/A";

/// A weather reading, or the `"N/A"` marker
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reading<T> {
    Value(T),
    Missing(&'static str),
}

impl<T> From<Option<T>> for Reading<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Reading::Missing(NOT_AVAILABLE), Reading::Value)
    }
}

/// Flat view of the status record served to the landing page
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: CourtStatus,
    pub temperature: Reading<i32>,
    pub precipitation: Reading<f64>,
    pub conditions: String,
    pub last_updated: DateTime<Tz>,
    pub updated_by: String,
    pub manual_override: bool,
    pub notes: String,
    pub hours: Hours,
    pub hours_override: Option<HoursOverride>,
    pub effective_hours: Hours,
    pub closed_until: Option<DateTime<Tz>>,
}

impl StatusResponse {
    pub fn new(record: StatusRecord, today: NaiveDate) -> Self {
        let effective_hours = record.effective_hours(today);
        Self {
            status: record.status,
            temperature: record.weather.temperature.into(),
            precipitation: record.weather.precipitation.into(),
            conditions: record.weather.conditions,
            last_updated: record.last_updated,
            updated_by: record.updated_by,
            manual_override: record.manual_override,
            notes: record.notes,
            hours: record.hours,
            hours_override: record.hours_override,
            effective_hours,
            closed_until: record.closed_until,
        }
    }
}

/// Request to change the status
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: CourtStatus,
    /// Local reopen time, `YYYY-MM-DD HH:MM`; only for `closed_until`
    #[serde(default)]
    pub until: Option<String>,
}

/// Response for a status change
#[derive(Debug, Serialize)]
pub struct SetStatusResponse {
    pub success: bool,
    pub status: StatusResponse,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
