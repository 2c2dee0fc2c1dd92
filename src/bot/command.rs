//! Slash commands and inline-button payloads

use crate::state_machine::{Action, ClosePreset, CloseUntil, HoursScope};

/// A slash command that could not be mapped to an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand(pub String);

pub const HELP_TEXT: &str = "Unknown command. Try /start, /status, /open, /closed, \
/closed_until, /change_hours, /clear_notes or /cancel.";

/// Parse a `/command` message
///
/// Returns `None` for plain text. A trailing `@botname` and any arguments
/// are ignored.
pub fn parse_command(text: &str) -> Option<Result<Action, UnknownCommand>> {
    let word = text.trim_start().strip_prefix('/')?.split_whitespace().next()?;
    let name = word.split_once('@').map_or(word, |(name, _)| name);

    let action = match name.to_ascii_lowercase().as_str() {
        "start" | "help" => Action::Start,
        "status" => Action::ShowStatus,
        "open" => Action::OpenCourt,
        "closed" | "close" => Action::CloseCourt,
        "closed_until" => Action::CloseUntilMenu,
        "change_hours" | "hours" => Action::ChangeHours,
        "clear_notes" => Action::ClearNotes,
        "cancel" => Action::Cancel,
        _ => return Some(Err(UnknownCommand(name.to_string()))),
    };
    Some(Ok(action))
}

/// Payload carried by an inline button for `action`
pub fn callback_data(action: Action) -> &'static str {
    match action {
        Action::Start => "start",
        Action::ShowStatus => "check_status",
        Action::OpenCourt => "set_open",
        Action::CloseCourt => "set_closed",
        Action::CloseUntilMenu => "closed_until_menu",
        Action::CloseUntil(CloseUntil::Preset(ClosePreset::OneHour)) => "closed_until_1h",
        Action::CloseUntil(CloseUntil::Preset(ClosePreset::TwoHours)) => "closed_until_2h",
        Action::CloseUntil(CloseUntil::Preset(ClosePreset::FourHours)) => "closed_until_4h",
        Action::CloseUntil(CloseUntil::Preset(ClosePreset::TomorrowMorning)) => {
            "closed_until_tomorrow"
        }
        Action::CloseUntil(CloseUntil::Custom) => "closed_until_custom",
        Action::ChangeHours => "change_hours",
        Action::SetHours(HoursScope::TodayOnly) => "hours_today",
        Action::SetHours(HoursScope::Permanent) => "hours_permanent",
        Action::AddNotes => "add_notes",
        Action::NoNotes => "no_notes",
        Action::ClearNotes => "clear_notes",
        Action::Cancel => "cancel",
    }
}

/// Inverse of [`callback_data`]
///
/// Buttons on messages sent before a restart may carry a status suffix
/// (`add_notes_open`); those still resolve to the base action.
pub fn parse_callback(data: &str) -> Option<Action> {
    let action = match data {
        "start" => Action::Start,
        "check_status" => Action::ShowStatus,
        "set_open" => Action::OpenCourt,
        "set_closed" => Action::CloseCourt,
        "closed_until_menu" => Action::CloseUntilMenu,
        "closed_until_1h" => Action::CloseUntil(CloseUntil::Preset(ClosePreset::OneHour)),
        "closed_until_2h" => Action::CloseUntil(CloseUntil::Preset(ClosePreset::TwoHours)),
        "closed_until_4h" => Action::CloseUntil(CloseUntil::Preset(ClosePreset::FourHours)),
        "closed_until_tomorrow" => {
            Action::CloseUntil(CloseUntil::Preset(ClosePreset::TomorrowMorning))
        }
        "closed_until_custom" => Action::CloseUntil(CloseUntil::Custom),
        "change_hours" => Action::ChangeHours,
        "hours_today" => Action::SetHours(HoursScope::TodayOnly),
        "hours_permanent" => Action::SetHours(HoursScope::Permanent),
        "clear_notes" => Action::ClearNotes,
        "cancel" => Action::Cancel,
        other if other.starts_with("add_notes") => Action::AddNotes,
        other if other.starts_with("no_notes") => Action::NoNotes,
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const ALL_ACTIONS: [Action; 17] = [
        Action::Start,
        Action::ShowStatus,
        Action::OpenCourt,
        Action::CloseCourt,
        Action::CloseUntilMenu,
        Action::CloseUntil(CloseUntil::Preset(ClosePreset::OneHour)),
        Action::CloseUntil(CloseUntil::Preset(ClosePreset::TwoHours)),
        Action::CloseUntil(CloseUntil::Preset(ClosePreset::FourHours)),
        Action::CloseUntil(CloseUntil::Preset(ClosePreset::TomorrowMorning)),
        Action::CloseUntil(CloseUntil::Custom),
        Action::ChangeHours,
        Action::SetHours(HoursScope::TodayOnly),
        Action::SetHours(HoursScope::Permanent),
        Action::AddNotes,
        Action::NoNotes,
        Action::ClearNotes,
        Action::Cancel,
    ];

    #[test]
    fn commands_map_to_actions() {
        assert_eq!(parse_command("/open"), Some(Ok(Action::OpenCourt)));
        assert_eq!(parse_command("/closed"), Some(Ok(Action::CloseCourt)));
        assert_eq!(parse_command("/closed_until"), Some(Ok(Action::CloseUntilMenu)));
        assert_eq!(parse_command("/change_hours"), Some(Ok(Action::ChangeHours)));
        assert_eq!(parse_command("/cancel"), Some(Ok(Action::Cancel)));
    }

    #[test]
    fn bot_mention_and_arguments_are_ignored() {
        assert_eq!(parse_command("/status@CourtBot"), Some(Ok(Action::ShowStatus)));
        assert_eq!(parse_command("  /START now please"), Some(Ok(Action::Start)));
    }

    #[test]
    fn plain_text_is_not_a_command() {
        assert_eq!(parse_command("7-19"), None);
        assert_eq!(parse_command("court is wet / slippery"), None);
        assert_eq!(parse_command("/"), None);
    }

    #[test]
    fn unknown_command_is_reported_by_name() {
        assert_eq!(
            parse_command("/reboot@CourtBot"),
            Some(Err(UnknownCommand("reboot".to_string())))
        );
    }

    #[test]
    fn every_button_payload_parses_back() {
        for action in ALL_ACTIONS {
            let data = callback_data(action);
            assert!(data.len() <= 64, "{data} exceeds Telegram's payload limit");
            assert_eq!(parse_callback(data), Some(action), "{data}");
        }
    }

    #[test]
    fn button_payloads_are_distinct() {
        let actions: HashSet<Action> = ALL_ACTIONS.into_iter().collect();
        let payloads: HashSet<&str> = ALL_ACTIONS.into_iter().map(callback_data).collect();
        assert_eq!(actions.len(), ALL_ACTIONS.len());
        assert_eq!(payloads.len(), ALL_ACTIONS.len());
    }

    #[test]
    fn suffixed_note_payloads_still_resolve() {
        assert_eq!(parse_callback("add_notes_closed"), Some(Action::AddNotes));
        assert_eq!(parse_callback("no_notes_open"), Some(Action::NoNotes));
        assert_eq!(parse_callback("drop_tables"), None);
    }
}
