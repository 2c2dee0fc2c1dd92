//! Pure state transition function

use super::effect::{Button, Effect, Reply};
use super::event::{Action, CloseUntil, ClosePreset, Event};
use super::input::{self, InputError};
use super::state::{ConvContext, ConvState, HoursScope};
use crate::render;
use crate::status::{HoursOverride, StatusChange};
use chrono::DateTime;
use chrono_tz::Tz;
use thiserror::Error;

const HOURS_FORMAT_HELP: &str = "Please send new hours in format: OPEN-CLOSE\n\
                                 Example: 7-19 (for 7 AM to 7 PM)";
const CLOSED_UNTIL_FORMAT_HELP: &str = "Please send the reopen time in format: YYYY-MM-DD HH:MM\n\
                                        Example: 2025-08-18 14:30";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Rejected input; the conversation stays where it was
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("invalid hours: {0}")]
    InvalidHours(InputError),
    #[error("invalid reopen time: {0}")]
    InvalidClosedUntil(InputError),
    #[error("reopen time {0} is not in the future")]
    ClosedUntilInPast(DateTime<Tz>),
    #[error("no local reopen time for preset {0:?}")]
    PresetUnavailable(ClosePreset),
    #[error("text received with no prompt outstanding")]
    NoPendingPrompt,
}

impl TransitionError {
    /// Corrective message shown to the user
    pub fn user_message(&self) -> String {
        match self {
            TransitionError::InvalidHours(_) => format!(
                "❌ Invalid format. {HOURS_FORMAT_HELP}\n\
                 Hours must be 0-23 and opening must be before closing"
            ),
            TransitionError::InvalidClosedUntil(InputError::NonexistentLocalTime(_)) => format!(
                "❌ That time does not exist on that day (clock change). {CLOSED_UNTIL_FORMAT_HELP}"
            ),
            TransitionError::InvalidClosedUntil(_) => {
                format!("❌ Invalid format. {CLOSED_UNTIL_FORMAT_HELP}")
            }
            TransitionError::ClosedUntilInPast(at) => format!(
                "❌ {} has already passed. Please send a time in the future.",
                render::short_timestamp(at)
            ),
            TransitionError::PresetUnavailable(_) => {
                "❌ That preset is not available right now. Please choose a custom time."
                    .to_string()
            }
            TransitionError::NoPendingPrompt => {
                "I wasn't expecting a message. Send /start to see available commands.".to_string()
            }
        }
    }
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs; the caller
/// applies the returned effects.
pub fn transition(
    state: &ConvState,
    context: &ConvContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // Free text, interpreted by the outstanding prompt
        // ============================================================
        (ConvState::Idle, Event::Text(_)) => Err(TransitionError::NoPendingPrompt),

        (ConvState::AwaitingNotes, Event::Text(text)) => {
            let notes = text.trim().to_string();
            if notes.is_empty() {
                return Ok(without_notes());
            }
            Ok(TransitionResult::new(ConvState::Idle)
                .with_effect(Effect::SetNotes(notes.clone()))
                .with_effect(Effect::reply(format!("✅ Notes added: {notes}"))))
        }

        (ConvState::AwaitingHoursInput { scope }, Event::Text(text)) => {
            let hours = input::parse_hours(&text).map_err(TransitionError::InvalidHours)?;
            let range = render::hours_range(hours);
            let result = TransitionResult::new(ConvState::Idle);
            Ok(match scope {
                HoursScope::Permanent => result
                    .with_effect(Effect::SetHours(hours))
                    .with_effect(Effect::reply(format!("✅ Hours permanently changed to {range}"))),
                HoursScope::TodayOnly => result
                    .with_effect(Effect::SetHoursOverride(HoursOverride {
                        date: context.now.date_naive(),
                        hours,
                    }))
                    .with_effect(Effect::reply(format!("✅ Hours changed for today only: {range}"))),
            })
        }

        (ConvState::AwaitingClosedUntilInput, Event::Text(text)) => {
            let tz = context.now.timezone();
            let until = input::parse_local_datetime(&text, &tz)
                .map_err(TransitionError::InvalidClosedUntil)?;
            if until <= context.now {
                return Err(TransitionError::ClosedUntilInPast(until));
            }
            Ok(closed_until(until))
        }

        (state, Event::Action(action)) => on_action(*state, action, context),
    }
}

/// Commands and button presses
///
/// Status display, note clearing and cancellation respect the outstanding
/// prompt; every other action starts a new flow and abandons it.
fn on_action(
    state: ConvState,
    action: Action,
    context: &ConvContext,
) -> Result<TransitionResult, TransitionError> {
    Ok(match action {
        Action::Cancel if state.is_idle() => {
            TransitionResult::new(ConvState::Idle).with_effect(Effect::reply("Nothing to cancel."))
        }

        Action::Cancel => TransitionResult::new(ConvState::Idle)
            .with_effect(Effect::reply("❌ Operation cancelled")),

        Action::ShowStatus => TransitionResult::new(state).with_effect(Effect::ShowStatus),

        Action::ClearNotes => TransitionResult::new(state)
            .with_effect(Effect::SetNotes(String::new()))
            .with_effect(Effect::reply("🗑️ Status notes cleared")),

        Action::Start => TransitionResult::new(ConvState::Idle).with_effect(Effect::ShowWelcome),

        Action::OpenCourt => TransitionResult::new(ConvState::AwaitingNotes)
            .with_effect(Effect::SetStatus(StatusChange::Open))
            .with_effect(Effect::Reply(
                Reply::text("🟢 Courts set to OPEN\n\nWould you like to add any notes?")
                    .with_row(notes_buttons()),
            )),

        Action::CloseCourt => TransitionResult::new(ConvState::AwaitingNotes)
            .with_effect(Effect::SetStatus(StatusChange::Closed))
            .with_effect(Effect::Reply(
                Reply::text(
                    "🔴 Courts set to CLOSED\n\n\
                     Would you like to add notes or set a check-back time?",
                )
                .with_row(notes_buttons())
                .with_row([Button::new("⏰ Set check-back time", Action::CloseUntilMenu)]),
            )),

        Action::CloseUntilMenu => TransitionResult::new(ConvState::Idle)
            .with_effect(Effect::Reply(closed_until_menu())),

        Action::CloseUntil(CloseUntil::Preset(preset)) => {
            let until = preset
                .target(&context.now)
                .ok_or(TransitionError::PresetUnavailable(preset))?;
            closed_until(until)
        }

        Action::CloseUntil(CloseUntil::Custom) => {
            TransitionResult::new(ConvState::AwaitingClosedUntilInput)
                .with_effect(Effect::reply(format!("⏰ {CLOSED_UNTIL_FORMAT_HELP}")))
        }

        Action::ChangeHours => TransitionResult::new(ConvState::Idle).with_effect(Effect::Reply(
            Reply::text(format!(
                "🕐 Current hours: {}\n\nHow would you like to change them?",
                render::hours_range(context.hours)
            ))
            .with_row([Button::new(
                "Change for today only",
                Action::SetHours(HoursScope::TodayOnly),
            )])
            .with_row([Button::new(
                "Change permanently",
                Action::SetHours(HoursScope::Permanent),
            )]),
        )),

        Action::SetHours(scope) => TransitionResult::new(ConvState::AwaitingHoursInput { scope })
            .with_effect(Effect::reply(format!(
                "🕐 Current hours: {}\n\n{HOURS_FORMAT_HELP}",
                render::hours_range(context.hours)
            ))),

        Action::AddNotes => TransitionResult::new(ConvState::AwaitingNotes)
            .with_effect(Effect::reply("📝 Please send your notes:")),

        Action::NoNotes => without_notes(),
    })
}

fn without_notes() -> TransitionResult {
    TransitionResult::new(ConvState::Idle)
        .with_effect(Effect::SetNotes(String::new()))
        .with_effect(Effect::reply("✅ Status updated without notes"))
}

fn closed_until(until: DateTime<Tz>) -> TransitionResult {
    TransitionResult::new(ConvState::AwaitingNotes)
        .with_effect(Effect::SetStatus(StatusChange::ClosedUntil(until)))
        .with_effect(Effect::Reply(
            Reply::text(format!(
                "🟠 Courts set to CLOSED until {}\n\nWould you like to add any notes?",
                render::short_timestamp(&until)
            ))
            .with_row(notes_buttons()),
        ))
}

fn notes_buttons() -> [Button; 2] {
    [
        Button::new("Add Notes", Action::AddNotes),
        Button::new("No Notes", Action::NoNotes),
    ]
}

fn closed_until_menu() -> Reply {
    ClosePreset::ALL
        .chunks(2)
        .fold(Reply::text("⏰ Closed until when?"), |reply, pair| {
            reply.with_row(
                pair.iter()
                    .map(|p| Button::new(p.label(), Action::CloseUntil(CloseUntil::Preset(*p)))),
            )
        })
        .with_row([Button::new(
            "📅 Custom time",
            Action::CloseUntil(CloseUntil::Custom),
        )])
}
