//! Conversation state types

use crate::status::Hours;
use chrono::DateTime;
use chrono_tz::Tz;

/// Which hours a pending hours change will replace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HoursScope {
    /// Override for the current calendar day only
    TodayOnly,
    Permanent,
}

/// Conversation state, one per chat session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConvState {
    /// No prompt outstanding
    #[default]
    Idle,

    /// Next text message becomes the court notes
    AwaitingNotes,

    /// Next text message must be `OPEN-CLOSE`
    AwaitingHoursInput { scope: HoursScope },

    /// Next text message must be `YYYY-MM-DD HH:MM`
    AwaitingClosedUntilInput,
}

impl ConvState {
    pub fn is_idle(&self) -> bool {
        matches!(self, ConvState::Idle)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConvState::Idle => "idle",
            ConvState::AwaitingNotes => "awaiting_notes",
            ConvState::AwaitingHoursInput { .. } => "awaiting_hours_input",
            ConvState::AwaitingClosedUntilInput => "awaiting_closed_until_input",
        }
    }
}

/// Everything a transition may read besides the state and the event
#[derive(Debug, Clone)]
pub struct ConvContext {
    /// Attribution for any mutation, e.g. `telegram:alice`
    pub actor: String,
    /// Current time in the court's time zone
    pub now: DateTime<Tz>,
    /// Permanent hours, shown when asking for new ones
    pub hours: Hours,
}

impl ConvContext {
    pub fn new(actor: impl Into<String>, now: DateTime<Tz>, hours: Hours) -> Self {
        Self {
            actor: actor.into(),
            now,
            hours,
        }
    }
}
