//! Human-readable text for chat replies

use crate::status::{CourtStatus, Hours, StatusRecord};
use chrono::{DateTime, Datelike, NaiveDate, Timelike};
use chrono_tz::Tz;
use std::fmt::Write;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// `0` -> `12:00 AM`, `19` -> `7:00 PM`
pub fn hour_12h(hour: u8) -> String {
    match hour {
        0 => "12:00 AM".to_string(),
        1..=11 => format!("{hour}:00 AM"),
        12 => "12:00 PM".to_string(),
        _ => format!("{}:00 PM", hour - 12),
    }
}

pub fn hours_range(hours: Hours) -> String {
    format!("{} - {}", hour_12h(hours.open()), hour_12h(hours.close()))
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (1, n) if n != 11 => "st",
        (2, n) if n != 12 => "nd",
        (3, n) if n != 13 => "rd",
        _ => "th",
    }
}

/// `August 18th, 2025 11:53:04AM`
pub fn long_timestamp(at: &DateTime<Tz>) -> String {
    let hour = at.hour();
    let display_hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    let meridiem = if hour >= 12 { "PM" } else { "AM" };
    let month = MONTHS
        .get(at.month0() as usize)
        .copied()
        .unwrap_or_default();
    format!(
        "{month} {day}{suffix}, {year} {display_hour}:{minute:02}:{second:02}{meridiem}",
        day = at.day(),
        suffix = ordinal_suffix(at.day()),
        year = at.year(),
        minute = at.minute(),
        second = at.second(),
    )
}

/// `Mon Aug 18, 2:30 PM`, used for reopen times
pub fn short_timestamp(at: &DateTime<Tz>) -> String {
    at.format("%a %b %-d, %-I:%M %p").to_string()
}

pub fn status_icon(status: CourtStatus) -> &'static str {
    match status {
        CourtStatus::Open => "🟢",
        CourtStatus::Closed => "🔴",
        CourtStatus::ClosedUntil => "🟠",
    }
}

pub fn status_label(status: CourtStatus) -> String {
    status.as_str().to_uppercase().replace('_', " ")
}

/// Status headline, including the reopen time when there is one
fn headline(record: &StatusRecord) -> String {
    let mut line = format!(
        "{} Court Status: {}",
        status_icon(record.status),
        status_label(record.status)
    );
    if let Some(until) = &record.closed_until {
        let _ = write!(line, " {}", short_timestamp(until));
    }
    line
}

/// Full status card for `/status`
pub fn status_card(record: &StatusRecord, today: NaiveDate) -> String {
    let temperature = record
        .weather
        .temperature
        .map_or_else(|| "N/A".to_string(), |t| format!("{t}°F"));
    let precipitation = record
        .weather
        .precipitation
        .map_or_else(|| "N/A".to_string(), |p| format!("{p} mm"));

    let mut card = format!(
        "{}\n\n🌡️ Temperature: {temperature}\n🌧️ Precipitation: {precipitation}\n🎾 Conditions: {}\n\n🕐 Hours: {}",
        headline(record),
        record.weather.conditions,
        hours_range(record.hours),
    );

    if let Some(o) = record.hours_override.filter(|o| o.applies_on(today)) {
        let _ = write!(card, "\n🔄 Today's hours override: {}", hours_range(o.hours));
    }
    if !record.notes.is_empty() {
        let _ = write!(card, "\n📝 Notes: {}", record.notes);
    }

    let _ = write!(
        card,
        "\n\n📅 Last updated: {}\n👤 Updated by: {}\n🔧 Manual override: {}",
        long_timestamp(&record.last_updated),
        record.updated_by,
        if record.manual_override { "Yes" } else { "No" },
    );
    card
}

/// Greeting for `/start`
pub fn welcome(record: &StatusRecord) -> String {
    format!(
        "🎾 Tennis Courts Control Bot 🎾\n\n\
         Available commands:\n\
         /status - Check current court status\n\
         /open - Set courts as OPEN\n\
         /closed - Set courts as CLOSED\n\
         /closed_until - Set courts as CLOSED until a reopen time\n\
         /change_hours - Change court operating hours\n\
         /clear_notes - Clear status notes\n\
         /cancel - Cancel the current operation\n\n\
         Current status: {}\n\
         Last updated: {}",
        status_label(record.status),
        long_timestamp(&record.last_updated),
    )
}
