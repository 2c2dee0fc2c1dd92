//! Outbound Bot API calls through teloxide

use super::{command, ChatTransport};
use crate::state_machine::Reply;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("telegram request failed: {0}")]
    Request(#[from] teloxide::RequestError),
}

fn keyboard(reply: &Reply) -> Option<InlineKeyboardMarkup> {
    if reply.buttons.is_empty() {
        return None;
    }
    Some(InlineKeyboardMarkup::new(reply.buttons.iter().map(|row| {
        row.iter()
            .map(|button| {
                InlineKeyboardButton::callback(
                    button.label.clone(),
                    command::callback_data(button.action),
                )
            })
            .collect::<Vec<_>>()
    })))
}

/// [`ChatTransport`] backed by a live bot
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send(&self, chat_id: i64, reply: &Reply) -> Result<(), TelegramError> {
        let request = self.bot.send_message(ChatId(chat_id), reply.text.clone());
        match keyboard(reply) {
            Some(markup) => request.reply_markup(markup).await?,
            None => request.await?,
        };
        Ok(())
    }

    async fn acknowledge(&self, query: &CallbackQuery) -> Result<(), TelegramError> {
        self.bot.answer_callback_query(query.id.clone()).await?;
        Ok(())
    }
}
