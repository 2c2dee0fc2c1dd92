//! Effects produced by state transitions

use super::event::Action;
use crate::status::{Hours, HoursOverride, StatusChange};

/// Inline button attached to a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub action: Action,
}

impl Button {
    pub fn new(label: impl Into<String>, action: Action) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

/// Outbound chat message
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reply {
    pub text: String,
    /// Rows of buttons
    pub buttons: Vec<Vec<Button>>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            buttons: vec![],
        }
    }

    pub fn with_row(mut self, row: impl IntoIterator<Item = Button>) -> Self {
        self.buttons.push(row.into_iter().collect());
        self
    }
}

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Change status, attributed to the acting user as a manual override
    SetStatus(StatusChange),

    SetNotes(String),

    /// Replace the permanent hours
    SetHours(Hours),

    SetHoursOverride(HoursOverride),

    Reply(Reply),

    /// Render the welcome text from the current record
    ShowWelcome,

    /// Render the status card from the current record
    ShowStatus,
}

impl Effect {
    pub fn reply(text: impl Into<String>) -> Self {
        Effect::Reply(Reply::text(text))
    }

    #[cfg(test)]
    pub fn mutates_record(&self) -> bool {
        matches!(
            self,
            Effect::SetStatus(_)
                | Effect::SetNotes(_)
                | Effect::SetHours(_)
                | Effect::SetHoursOverride(_)
        )
    }
}
