//! Events that can occur in a conversation

use super::state::HoursScope;
use chrono::{DateTime, Duration};
use chrono_tz::Tz;

/// Preset reopen times offered by the closed-until menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClosePreset {
    OneHour,
    TwoHours,
    FourHours,
    /// 06:00 on the next calendar day
    TomorrowMorning,
}

impl ClosePreset {
    pub const ALL: [ClosePreset; 4] = [
        ClosePreset::OneHour,
        ClosePreset::TwoHours,
        ClosePreset::FourHours,
        ClosePreset::TomorrowMorning,
    ];

    pub const TOMORROW_HOUR: u32 = 6;

    pub fn label(self) -> &'static str {
        match self {
            ClosePreset::OneHour => "1 hour",
            ClosePreset::TwoHours => "2 hours",
            ClosePreset::FourHours => "4 hours",
            ClosePreset::TomorrowMorning => "Tomorrow 6 AM",
        }
    }

    /// Fixed offset from now, if this preset is one
    pub fn duration(self) -> Option<Duration> {
        match self {
            ClosePreset::OneHour => Some(Duration::hours(1)),
            ClosePreset::TwoHours => Some(Duration::hours(2)),
            ClosePreset::FourHours => Some(Duration::hours(4)),
            ClosePreset::TomorrowMorning => None,
        }
    }

    /// Reopen time relative to `now`; `None` only if 06:00 tomorrow does
    /// not exist locally
    pub fn target(self, now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        match self.duration() {
            Some(offset) => Some(*now + offset),
            None => {
                let tomorrow = now.date_naive().succ_opt()?;
                let local = tomorrow.and_hms_opt(Self::TOMORROW_HOUR, 0, 0)?;
                super::input::resolve_local(&now.timezone(), local)
            }
        }
    }
}

/// Closed-until menu selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseUntil {
    Preset(ClosePreset),
    /// Ask for a typed date and time
    Custom,
}

/// User actions, from slash commands or inline buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Start,
    ShowStatus,
    OpenCourt,
    CloseCourt,
    /// Show the closed-until preset menu
    CloseUntilMenu,
    CloseUntil(CloseUntil),
    /// Ask whether to change hours for today or permanently
    ChangeHours,
    SetHours(HoursScope),
    AddNotes,
    NoNotes,
    ClearNotes,
    Cancel,
}

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Action(Action),
    /// Free text that is not a command
    Text(String),
}

impl From<Action> for Event {
    fn from(action: Action) -> Self {
        Event::Action(action)
    }
}
