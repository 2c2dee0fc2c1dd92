//! Long-polling dispatcher feeding Telegram updates to the engine

use super::{
    dispatch, route_callback, route_message, ChatTransport, Delivery, TelegramTransport,
    FAILURE_MESSAGE,
};
use crate::engine::ConversationEngine;
use crate::state_machine::Reply;
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use tokio_util::sync::CancellationToken;

const SHUTDOWN_RETRY: Duration = Duration::from_millis(100);

pub struct BotPoller {
    bot: Bot,
    engine: Arc<ConversationEngine>,
}

impl BotPoller {
    pub fn new(bot: Bot, engine: Arc<ConversationEngine>) -> Self {
        Self { bot, engine }
    }

    /// Poll until cancelled
    ///
    /// Updates from one chat are handled in arrival order while different
    /// chats proceed concurrently. Each update runs in its own task so a
    /// panic costs only that interaction.
    pub async fn run(self, cancel: CancellationToken) {
        let transport: Arc<dyn ChatTransport> = Arc::new(TelegramTransport::new(self.bot.clone()));

        let on_message = {
            let engine = self.engine.clone();
            let transport = transport.clone();
            move |msg: Message| {
                let engine = engine.clone();
                let transport = transport.clone();
                async move {
                    if let Some(delivery) = route_message(&msg) {
                        supervise(engine, transport, delivery).await;
                    }
                    respond(())
                }
            }
        };
        let on_button = {
            let engine = self.engine.clone();
            let transport = transport.clone();
            move |query: CallbackQuery| {
                let engine = engine.clone();
                let transport = transport.clone();
                async move {
                    if let Some(delivery) = route_callback(&query) {
                        supervise(engine, transport, delivery).await;
                    }
                    respond(())
                }
            }
        };

        let handler = dptree::entry()
            .branch(Update::filter_message().endpoint(on_message))
            .branch(Update::filter_callback_query().endpoint(on_button));

        let mut dispatcher = Dispatcher::builder(self.bot, handler)
            .default_handler(|_| async {})
            .build();

        let shutdown = dispatcher.shutdown_token();
        let stopper = tokio::spawn(async move {
            cancel.cancelled().await;
            // Shutdown is refused until the dispatcher has started
            loop {
                match shutdown.shutdown() {
                    Ok(done) => break done.await,
                    Err(_) => tokio::time::sleep(SHUTDOWN_RETRY).await,
                }
            }
        });

        tracing::info!("Telegram bot polling started");
        dispatcher.dispatch().await;
        stopper.abort();
        tracing::info!("Telegram bot polling stopped");
    }
}

/// Dispatch one delivery, recovering its session if handling panics
pub(crate) async fn supervise(
    engine: Arc<ConversationEngine>,
    transport: Arc<dyn ChatTransport>,
    delivery: Delivery,
) {
    let chat_id = delivery.chat_id;
    let session = delivery.session();

    let task = tokio::spawn({
        let engine = engine.clone();
        let transport = transport.clone();
        async move { dispatch(&engine, transport.as_ref(), delivery).await }
    });

    match task.await {
        Ok(()) => {}
        Err(e) if e.is_panic() => {
            tracing::error!(chat_id, "Update handler panicked");
            if let Some(session) = session {
                engine.reset(session).await;
            }
            if let Err(e) = transport.send(chat_id, &Reply::text(FAILURE_MESSAGE)).await {
                tracing::warn!(chat_id, error = %e, "Failed to send failure notice");
            }
        }
        Err(e) => tracing::warn!(chat_id, error = %e, "Update handler cancelled"),
    }
}
