//! Conversational state machine for court status updates
//!
//! Implements the Elm Architecture pattern with pure state transitions: the
//! transition function decides the next state and the effects, and the
//! engine applies those effects to the shared status store.

mod effect;
pub mod event;
pub mod input;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::{Button, Effect, Reply};
pub use event::{Action, CloseUntil, ClosePreset, Event};
pub use state::{ConvContext, ConvState, HoursScope};
pub use transition::{transition, TransitionError};
