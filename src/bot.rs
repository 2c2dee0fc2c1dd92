//! Telegram front end for the conversation engine
//!
//! Turns Bot API updates into engine events and sends the engine's replies
//! back to the originating chat.

pub mod command;
mod poller;
mod telegram;

pub use poller::BotPoller;
pub use telegram::{TelegramError, TelegramTransport};

use crate::engine::{ConversationEngine, Inbound, Sender, SessionKey, UNAUTHORIZED_MESSAGE};
use crate::state_machine::{Event, Reply};
use async_trait::async_trait;
use teloxide::types::{CallbackQuery, Message, User};

/// Sent when handling an update failed unexpectedly
pub const FAILURE_MESSAGE: &str = "⚠️ Something went wrong. Please start again with /start";

/// Outbound half of the chat platform
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, chat_id: i64, reply: &Reply) -> Result<(), TelegramError>;

    /// Stop the client-side spinner on a pressed button
    async fn acknowledge(&self, query: &CallbackQuery) -> Result<(), TelegramError>;
}

/// One update, reduced to what the bot acts on
#[derive(Debug, Clone)]
pub(crate) struct Delivery {
    pub chat_id: i64,
    pub callback: Option<CallbackQuery>,
    pub route: Route,
}

#[derive(Debug, Clone)]
pub(crate) enum Route {
    Engine(Inbound),
    UnknownCommand { user_id: i64, name: String },
    /// Button payload this build does not recognise
    StaleButton,
}

impl Delivery {
    pub fn session(&self) -> Option<SessionKey> {
        match &self.route {
            Route::Engine(inbound) => Some(inbound.session),
            _ => None,
        }
    }
}

fn sender(user: &User) -> Option<Sender> {
    Some(Sender {
        user_id: i64::try_from(user.id.0).ok()?,
        username: user.username.clone(),
    })
}

fn inbound(chat_id: i64, sender: Sender, event: Event) -> Route {
    Route::Engine(Inbound {
        session: SessionKey {
            chat_id,
            user_id: sender.user_id,
        },
        sender,
        event,
    })
}

/// Classify a message; messages without a human sender or text are dropped
pub(crate) fn route_message(message: &Message) -> Option<Delivery> {
    let sender = sender(message.from.as_ref()?)?;
    let text = message.text()?;
    let chat_id = message.chat.id.0;
    let route = match command::parse_command(text) {
        Some(Ok(action)) => inbound(chat_id, sender, Event::Action(action)),
        Some(Err(command::UnknownCommand(name))) => Route::UnknownCommand {
            user_id: sender.user_id,
            name,
        },
        None => inbound(chat_id, sender, Event::Text(text.to_string())),
    };
    Some(Delivery {
        chat_id,
        callback: None,
        route,
    })
}

/// Classify a button press, answering in the chat that holds the button
pub(crate) fn route_callback(query: &CallbackQuery) -> Option<Delivery> {
    let sender = sender(&query.from)?;
    let chat_id = query
        .regular_message()
        .map_or(sender.user_id, |message| message.chat.id.0);
    let route = match query.data.as_deref().and_then(command::parse_callback) {
        Some(action) => inbound(chat_id, sender, Event::Action(action)),
        None => Route::StaleButton,
    };
    Some(Delivery {
        chat_id,
        callback: Some(query.clone()),
        route,
    })
}

/// Run one delivery through the engine and send every reply
///
/// Transport failures are logged; the record has already been updated by
/// the time replies go out.
pub(crate) async fn dispatch(
    engine: &ConversationEngine,
    transport: &dyn ChatTransport,
    delivery: Delivery,
) {
    let Delivery {
        chat_id,
        callback,
        route,
    } = delivery;

    if let Some(query) = &callback {
        if let Err(e) = transport.acknowledge(query).await {
            tracing::warn!(chat_id, error = %e, "Failed to acknowledge button press");
        }
    }

    let replies = match route {
        Route::Engine(inbound) => engine.handle(inbound).await,
        Route::UnknownCommand { user_id, name } => {
            tracing::debug!(chat_id, command = %name, "Unknown command");
            let text = if engine.permits(user_id) {
                command::HELP_TEXT
            } else {
                UNAUTHORIZED_MESSAGE
            };
            vec![Reply::text(text)]
        }
        Route::StaleButton => {
            tracing::debug!(chat_id, "Ignoring unrecognised button");
            vec![]
        }
    };

    for reply in &replies {
        if let Err(e) = transport.send(chat_id, reply).await {
            tracing::warn!(chat_id, error = %e, "Failed to send reply");
        }
    }
}
