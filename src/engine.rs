//! Conversation engine
//!
//! Owns one conversation state slot per chat session, checks the caller
//! against the allow-list, runs the pure transition function and applies
//! the resulting effects to the shared status store.

use crate::clock::Clock;
use crate::config::AllowList;
use crate::render;
use crate::state_machine::{
    transition, Action, Button, ConvContext, ConvState, Effect, Event, Reply,
};
use crate::status::StatusStore;
use chrono::DateTime;
use chrono_tz::Tz;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const UNAUTHORIZED_MESSAGE: &str = "Sorry, you're not authorized to use this bot.";

/// Who sent an inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub user_id: i64,
    pub username: Option<String>,
}

impl Sender {
    /// Attribution string stored in `updated_by`
    pub fn actor(&self) -> String {
        match &self.username {
            Some(name) if !name.is_empty() => format!("telegram:{name}"),
            _ => format!("telegram:user_{}", self.user_id),
        }
    }
}

/// Conversation slot identity: one user in one chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub chat_id: i64,
    pub user_id: i64,
}

/// A single inbound delivery, addressed to exactly one session
#[derive(Debug, Clone)]
pub struct Inbound {
    pub session: SessionKey,
    pub sender: Sender,
    pub event: Event,
}

pub struct ConversationEngine {
    store: Arc<StatusStore>,
    allow_list: AllowList,
    timezone: Tz,
    clock: Arc<dyn Clock>,
    sessions: Mutex<HashMap<SessionKey, Arc<Mutex<ConvState>>>>,
}

impl ConversationEngine {
    pub fn new(
        store: Arc<StatusStore>,
        allow_list: AllowList,
        timezone: Tz,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            allow_list,
            timezone,
            clock,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Handle one inbound message and return the replies to send
    ///
    /// Validation failures leave the session where it was and answer with a
    /// corrective message. Unauthorized callers get a rejection and nothing
    /// else happens.
    pub async fn handle(&self, inbound: Inbound) -> Vec<Reply> {
        let Inbound {
            session,
            sender,
            event,
        } = inbound;

        if !self.allow_list.permits(sender.user_id) {
            tracing::warn!(
                user_id = sender.user_id,
                chat_id = session.chat_id,
                "Rejected unauthorized chat user"
            );
            return vec![Reply::text(UNAUTHORIZED_MESSAGE)];
        }

        let slot = self.slot(session).await;
        let mut state = slot.lock().await;

        let now = self.clock.now_in(self.timezone);
        let hours = self.store.snapshot(now.date_naive()).await.hours;
        let actor = sender.actor();
        let context = ConvContext::new(actor.clone(), now, hours);

        let replies = match transition(&state, &context, event) {
            Ok(result) => {
                if *state != result.new_state {
                    tracing::debug!(
                        chat_id = session.chat_id,
                        user_id = session.user_id,
                        from = state.name(),
                        to = result.new_state.name(),
                        "Conversation state changed"
                    );
                }
                *state = result.new_state;
                self.apply(result.effects, &actor, now).await
            }
            Err(e) => {
                tracing::info!(
                    chat_id = session.chat_id,
                    user_id = session.user_id,
                    state = state.name(),
                    error = %e,
                    "Rejected conversation input"
                );
                vec![Reply::text(e.user_message())]
            }
        };

        if state.is_idle() {
            self.release(session, &slot).await;
        }
        replies
    }

    pub fn permits(&self, user_id: i64) -> bool {
        self.allow_list.permits(user_id)
    }

    /// Current state of a session; sessions never seen are idle
    #[cfg(test)]
    pub async fn state_of(&self, session: SessionKey) -> ConvState {
        let slot = self.sessions.lock().await.get(&session).cloned();
        match slot {
            Some(slot) => *slot.lock().await,
            None => ConvState::Idle,
        }
    }

    /// Drop a session's pending prompt after a failed interaction
    pub async fn reset(&self, session: SessionKey) {
        self.sessions.lock().await.remove(&session);
        tracing::warn!(
            chat_id = session.chat_id,
            user_id = session.user_id,
            "Conversation reset to idle"
        );
    }

    async fn slot(&self, session: SessionKey) -> Arc<Mutex<ConvState>> {
        self.sessions
            .lock()
            .await
            .entry(session)
            .or_default()
            .clone()
    }

    /// Forget an idle session unless another delivery is already waiting
    /// on its slot
    async fn release(&self, session: SessionKey, slot: &Arc<Mutex<ConvState>>) {
        let mut sessions = self.sessions.lock().await;
        // One reference in the map, one held by the caller
        if Arc::strong_count(slot) == 2 {
            sessions.remove(&session);
        }
    }

    #[cfg(test)]
    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    async fn apply(&self, effects: Vec<Effect>, actor: &str, now: DateTime<Tz>) -> Vec<Reply> {
        let mut replies = Vec::new();
        for effect in effects {
            match effect {
                Effect::SetStatus(change) => {
                    self.store.set_status(change, actor, true, now).await;
                }
                Effect::SetNotes(notes) => self.store.set_notes(&notes, actor, now).await,
                Effect::SetHours(hours) => self.store.set_hours(hours, actor, now).await,
                Effect::SetHoursOverride(hours_override) => {
                    self.store
                        .set_hours_override(hours_override, actor, now)
                        .await;
                }
                Effect::Reply(reply) => replies.push(reply),
                Effect::ShowWelcome => {
                    let record = self.store.snapshot(now.date_naive()).await;
                    replies.push(
                        Reply::text(render::welcome(&record))
                            .with_row([Button::new("📊 Check Status", Action::ShowStatus)])
                            .with_row([
                                Button::new("🟢 Set Open", Action::OpenCourt),
                                Button::new("🔴 Set Closed", Action::CloseCourt),
                            ]),
                    );
                }
                Effect::ShowStatus => {
                    let today = now.date_naive();
                    let record = self.store.snapshot(today).await;
                    replies.push(
                        Reply::text(render::status_card(&record, today))
                            .with_row([Button::new("🔄 Refresh Status", Action::ShowStatus)]),
                    );
                }
            }
        }
        replies
    }
}
