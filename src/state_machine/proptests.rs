//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::*;
use crate::status::{Hours, HoursOverride, StatusChange};
use chrono::{DateTime, Duration, TimeZone};
use chrono_tz::Tz;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn base_now() -> DateTime<Tz> {
    chrono_tz::America::New_York
        .with_ymd_and_hms(2025, 6, 2, 9, 15, 0)
        .unwrap()
}

fn test_context() -> ConvContext {
    ConvContext::new("telegram:tester", base_now(), Hours::new(6, 20).unwrap())
}

fn mutations(effects: &[Effect]) -> Vec<&Effect> {
    effects.iter().filter(|e| e.mutates_record()).collect()
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_scope() -> impl Strategy<Value = HoursScope> {
    prop_oneof![Just(HoursScope::TodayOnly), Just(HoursScope::Permanent)]
}

fn arb_state() -> impl Strategy<Value = ConvState> {
    prop_oneof![
        Just(ConvState::Idle),
        Just(ConvState::AwaitingNotes),
        Just(ConvState::AwaitingClosedUntilInput),
        arb_scope().prop_map(|scope| ConvState::AwaitingHoursInput { scope }),
    ]
}

fn arb_preset() -> impl Strategy<Value = ClosePreset> {
    prop::sample::select(ClosePreset::ALL.to_vec())
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        prop::sample::select(vec![
            Action::Start,
            Action::ShowStatus,
            Action::OpenCourt,
            Action::CloseCourt,
            Action::CloseUntilMenu,
            Action::CloseUntil(CloseUntil::Custom),
            Action::ChangeHours,
            Action::AddNotes,
            Action::NoNotes,
            Action::ClearNotes,
            Action::Cancel,
        ]),
        arb_preset().prop_map(|p| Action::CloseUntil(CloseUntil::Preset(p))),
        arb_scope().prop_map(Action::SetHours),
    ]
}

/// Valid `(open, close)` pairs
fn arb_valid_hours() -> impl Strategy<Value = (u8, u8)> {
    (0u8..23).prop_flat_map(|open| (Just(open), (open + 1)..=23))
}

/// Pairs that must be rejected: inverted, equal, or out of range
fn arb_invalid_hours() -> impl Strategy<Value = (i64, i64)> {
    prop_oneof![
        (0i64..=23, 0i64..=23).prop_filter("open >= close", |(o, c)| o >= c),
        (24i64..1000, 0i64..=23),
        (0i64..=23, 24i64..1000),
        (-1000i64..0, 0i64..=23),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_actions_never_fail(state in arb_state(), action in arb_action()) {
        let result = transition(&state, &test_context(), Event::Action(action));
        prop_assert!(result.is_ok(), "{:?} in {:?} failed: {:?}", action, state, result.err());
    }

    #[test]
    fn prop_cancel_always_returns_to_idle_without_mutation(state in arb_state()) {
        let result = transition(&state, &test_context(), Action::Cancel.into()).unwrap();
        prop_assert_eq!(result.new_state, ConvState::Idle);
        prop_assert!(mutations(&result.effects).is_empty());
    }

    #[test]
    fn prop_text_without_prompt_never_mutates(text in ".{0,40}") {
        let result = transition(&ConvState::Idle, &test_context(), Event::Text(text));
        prop_assert!(matches!(result, Err(TransitionError::NoPendingPrompt)));
    }

    #[test]
    fn prop_valid_hours_applied_exactly((open, close) in arb_valid_hours(), scope in arb_scope()) {
        let state = ConvState::AwaitingHoursInput { scope };
        let result = transition(&state, &test_context(), Event::Text(format!("{open}-{close}"))).unwrap();

        let hours = Hours::new(open, close).unwrap();
        let expected = match scope {
            HoursScope::Permanent => Effect::SetHours(hours),
            HoursScope::TodayOnly => Effect::SetHoursOverride(HoursOverride {
                date: base_now().date_naive(),
                hours,
            }),
        };
        prop_assert_eq!(result.new_state, ConvState::Idle);
        prop_assert_eq!(mutations(&result.effects), vec![&expected]);
    }

    #[test]
    fn prop_invalid_hours_rejected((open, close) in arb_invalid_hours(), scope in arb_scope()) {
        let state = ConvState::AwaitingHoursInput { scope };
        let result = transition(&state, &test_context(), Event::Text(format!("{open}-{close}")));
        prop_assert!(matches!(result, Err(TransitionError::InvalidHours(_))));
    }

    #[test]
    fn prop_future_closed_until_stored_exactly(minutes in 1i64..(60 * 24 * 365)) {
        let target = base_now() + Duration::minutes(minutes);
        let text = target.format("%Y-%m-%d %H:%M").to_string();
        let result = transition(&ConvState::AwaitingClosedUntilInput, &test_context(), Event::Text(text)).unwrap();

        // A repeated wall-clock hour resolves to its first occurrence
        let expected = input::resolve_local(&target.timezone(), target.naive_local()).unwrap();
        let want = Effect::SetStatus(StatusChange::ClosedUntil(expected));
        prop_assert_eq!(result.new_state, ConvState::AwaitingNotes);
        prop_assert_eq!(mutations(&result.effects), vec![&want]);
    }

    #[test]
    fn prop_past_closed_until_rejected(minutes in 0i64..(60 * 24 * 365)) {
        let target = base_now() - Duration::minutes(minutes);
        let text = target.format("%Y-%m-%d %H:%M").to_string();
        let result = transition(&ConvState::AwaitingClosedUntilInput, &test_context(), Event::Text(text));
        prop_assert!(matches!(result, Err(TransitionError::ClosedUntilInPast(_))));
    }

    #[test]
    fn prop_presets_are_in_the_future(preset in arb_preset(), minutes in 0i64..(60 * 24 * 30)) {
        let context = ConvContext::new(
            "telegram:tester",
            base_now() + Duration::minutes(minutes),
            Hours::new(6, 20).unwrap(),
        );
        let result = transition(
            &ConvState::Idle,
            &context,
            Action::CloseUntil(CloseUntil::Preset(preset)).into(),
        )
        .unwrap();

        let until = mutations(&result.effects)
            .into_iter()
            .find_map(|e| match e {
                Effect::SetStatus(change) => change.closed_until(),
                _ => None,
            });
        prop_assert!(until.is_some_and(|u| u > context.now));
    }

    #[test]
    fn prop_open_and_closed_never_carry_reopen_time(state in arb_state(), open in any::<bool>()) {
        let action = if open { Action::OpenCourt } else { Action::CloseCourt };
        let result = transition(&state, &test_context(), action.into()).unwrap();
        for effect in mutations(&result.effects) {
            if let Effect::SetStatus(change) = effect {
                prop_assert!(change.closed_until().is_none());
            }
        }
    }
}
