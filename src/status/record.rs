//! Court status data types

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Status
// ============================================================================

/// Whether the courts can be played on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourtStatus {
    Open,
    Closed,
    /// Closed with an expected reopen time
    ClosedUntil,
}

impl CourtStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CourtStatus::Open => "open",
            CourtStatus::Closed => "closed",
            CourtStatus::ClosedUntil => "closed_until",
        }
    }
}

impl fmt::Display for CourtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CourtStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(CourtStatus::Open),
            "closed" => Ok(CourtStatus::Closed),
            "closed_until" => Ok(CourtStatus::ClosedUntil),
            other => Err(format!("unknown status {other:?}")),
        }
    }
}

/// A status transition together with the data it carries
///
/// `closed_until` only exists as part of [`StatusChange::ClosedUntil`], so
/// moving to open or closed always clears it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    Open,
    Closed,
    ClosedUntil(DateTime<Tz>),
}

impl StatusChange {
    pub fn status(&self) -> CourtStatus {
        match self {
            StatusChange::Open => CourtStatus::Open,
            StatusChange::Closed => CourtStatus::Closed,
            StatusChange::ClosedUntil(_) => CourtStatus::ClosedUntil,
        }
    }

    pub fn closed_until(&self) -> Option<DateTime<Tz>> {
        match self {
            StatusChange::ClosedUntil(at) => Some(*at),
            StatusChange::Open | StatusChange::Closed => None,
        }
    }
}

// ============================================================================
// Operating Hours
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HoursError {
    #[error("hour {0} is outside 0-23")]
    OutOfRange(i64),
    #[error("opening hour {open} must be before closing hour {close}")]
    NotBefore { open: u8, close: u8 },
}

/// Daily operating hours, whole hours in the court's time zone
///
/// Always satisfies `open < close <= 23`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawHours")]
pub struct Hours {
    open: u8,
    close: u8,
}

#[derive(Deserialize)]
struct RawHours {
    open: u8,
    close: u8,
}

impl TryFrom<RawHours> for Hours {
    type Error = HoursError;

    fn try_from(raw: RawHours) -> Result<Self, Self::Error> {
        Hours::new(raw.open, raw.close)
    }
}

impl Hours {
    pub fn new(open: u8, close: u8) -> Result<Self, HoursError> {
        for hour in [open, close] {
            if hour > 23 {
                return Err(HoursError::OutOfRange(i64::from(hour)));
            }
        }
        if open >= close {
            return Err(HoursError::NotBefore { open, close });
        }
        Ok(Self { open, close })
    }

    pub fn open(&self) -> u8 {
        self.open
    }

    pub fn close(&self) -> u8 {
        self.close
    }
}

/// Hours that apply to a single calendar day only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursOverride {
    pub date: NaiveDate,
    pub hours: Hours,
}

impl HoursOverride {
    pub fn applies_on(&self, day: NaiveDate) -> bool {
        self.date == day
    }
}

// ============================================================================
// Weather
// ============================================================================

/// Advisory weather fields; `None` means the upstream was unavailable
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    /// Degrees Fahrenheit
    pub temperature: Option<i32>,
    pub precipitation: Option<f64>,
    pub conditions: String,
}

impl WeatherReport {
    pub const UNAVAILABLE: &'static str = "Weather unavailable";

    pub fn unavailable() -> Self {
        Self {
            temperature: None,
            precipitation: None,
            conditions: Self::UNAVAILABLE.to_string(),
        }
    }

    /// State before the first refresh completes
    pub fn pending() -> Self {
        Self {
            temperature: None,
            precipitation: None,
            conditions: "Checking conditions...".to_string(),
        }
    }
}

// ============================================================================
// Record
// ============================================================================

/// Full court status as seen by readers
#[derive(Debug, Clone, PartialEq)]
pub struct StatusRecord {
    pub status: CourtStatus,
    pub weather: WeatherReport,
    pub last_updated: DateTime<Tz>,
    pub updated_by: String,
    pub manual_override: bool,
    pub notes: String,
    pub hours: Hours,
    pub hours_override: Option<HoursOverride>,
    pub closed_until: Option<DateTime<Tz>>,
}

impl StatusRecord {
    /// Startup state: open, system-owned, no notes
    pub fn initial(hours: Hours, now: DateTime<Tz>) -> Self {
        Self {
            status: CourtStatus::Open,
            weather: WeatherReport::pending(),
            last_updated: now,
            updated_by: "system".to_string(),
            manual_override: false,
            notes: String::new(),
            hours,
            hours_override: None,
            closed_until: None,
        }
    }

    /// Hours in force on `day`
    pub fn effective_hours(&self, day: NaiveDate) -> Hours {
        match self.hours_override {
            Some(o) if o.applies_on(day) => o.hours,
            _ => self.hours,
        }
    }

    /// Drop an override whose day has passed
    pub(super) fn purge_stale_override(&mut self, today: NaiveDate) {
        if self.hours_override.is_some_and(|o| !o.applies_on(today)) {
            self.hours_override = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Tz> {
        chrono_tz::America::New_York
            .with_ymd_and_hms(2025, 8, 18, 11, 53, 4)
            .unwrap()
    }

    #[test]
    fn hours_reject_inverted_and_out_of_range() {
        assert_eq!(
            Hours::new(19, 7),
            Err(HoursError::NotBefore { open: 19, close: 7 })
        );
        assert_eq!(
            Hours::new(8, 8),
            Err(HoursError::NotBefore { open: 8, close: 8 })
        );
        assert_eq!(Hours::new(6, 24), Err(HoursError::OutOfRange(24)));
        assert!(Hours::new(0, 23).is_ok());
    }

    #[test]
    fn hours_deserialization_validates() {
        let ok: Hours = serde_json::from_str(r#"{"open":7,"close":19}"#).unwrap();
        assert_eq!((ok.open(), ok.close()), (7, 19));
        assert!(serde_json::from_str::<Hours>(r#"{"open":19,"close":7}"#).is_err());
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            CourtStatus::Open,
            CourtStatus::Closed,
            CourtStatus::ClosedUntil,
        ] {
            assert_eq!(status.as_str().parse::<CourtStatus>(), Ok(status));
        }
        assert!("emergency".parse::<CourtStatus>().is_err());
    }

    #[test]
    fn effective_hours_ignores_override_from_another_day() {
        let mut record = StatusRecord::initial(Hours::new(6, 20).unwrap(), now());
        let today = now().date_naive();
        let special = Hours::new(9, 17).unwrap();
        record.hours_override = Some(HoursOverride {
            date: today,
            hours: special,
        });

        assert_eq!(record.effective_hours(today), special);
        let tomorrow = today.succ_opt().unwrap();
        assert_eq!(record.effective_hours(tomorrow), Hours::new(6, 20).unwrap());

        record.purge_stale_override(tomorrow);
        assert!(record.hours_override.is_none());
    }

    #[test]
    fn status_change_carries_closed_until_only_for_closed_until() {
        let at = now();
        assert_eq!(StatusChange::ClosedUntil(at).closed_until(), Some(at));
        assert_eq!(StatusChange::Open.closed_until(), None);
        assert_eq!(StatusChange::Closed.closed_until(), None);
        assert_eq!(StatusChange::ClosedUntil(at).status(), CourtStatus::ClosedUntil);
    }
}
