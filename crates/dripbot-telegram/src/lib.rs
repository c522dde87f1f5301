// SPDX-FileCopyrightText: 2026 Dripbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter for the dripbot order-tracking bot.
//!
//! Implements [`ChatGateway`] for the Telegram Bot API via teloxide,
//! providing long polling, boundary parsing of messages and callback
//! queries into the closed event set, and keyboard rendering.

pub mod handler;
pub mod keyboard;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId as TgChatId, Recipient};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use dripbot_config::model::TelegramConfig;
use dripbot_core::{
    AdapterType, ChatGateway, ChatId, DripbotError, HealthStatus, InboundEvent, Keyboard,
    MessageId, PluginAdapter, Reply,
};

/// Telegram channel adapter implementing [`ChatGateway`].
///
/// Connects to Telegram via long polling, filters updates down to DM
/// messages and known callback payloads, and delivers replies with
/// rendered keyboards.
pub struct TelegramChannel {
    bot: Bot,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<InboundEvent>>,
    inbound_tx: mpsc::Sender<InboundEvent>,
    polling_handle: Option<tokio::task::JoinHandle<()>>,
}

impl TelegramChannel {
    /// Creates a new Telegram channel adapter.
    ///
    /// Requires `config.bot_token` to be set.
    pub fn new(config: &TelegramConfig) -> Result<Self, DripbotError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            DripbotError::Config("telegram.bot_token is required for the Telegram adapter".into())
        })?;

        if token.is_empty() {
            return Err(DripbotError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let bot = Bot::new(token);
        let (inbound_tx, inbound_rx) = mpsc::channel(100);

        Ok(Self {
            bot,
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            inbound_tx,
            polling_handle: None,
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

#[async_trait]
impl PluginAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, DripbotError> {
        // Check if the bot token is valid by calling getMe.
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), DripbotError> {
        debug!("Telegram channel shutting down");
        // The polling handle is dropped with the channel, which aborts the
        // task. For graceful shutdown, the run loop stops calling receive()
        // first.
        Ok(())
    }
}

#[async_trait]
impl ChatGateway for TelegramChannel {
    async fn connect(&mut self) -> Result<(), DripbotError> {
        if self.polling_handle.is_some() {
            return Ok(()); // Already connected
        }

        let bot = self.bot.clone();
        let message_tx = self.inbound_tx.clone();
        let callback_tx = self.inbound_tx.clone();

        info!("starting Telegram long polling");

        let handle = tokio::spawn(async move {
            let message_branch = Update::filter_message().endpoint(move |msg: Message| {
                let tx = message_tx.clone();
                async move {
                    if let Some(event) = handler::parse_message(&msg) {
                        if tx.send(event).await.is_err() {
                            warn!("inbound channel closed, dropping message");
                        }
                    }
                    respond(())
                }
            });

            let callback_branch =
                Update::filter_callback_query().endpoint(move |bot: Bot, query: CallbackQuery| {
                    let tx = callback_tx.clone();
                    async move {
                        // Acknowledge first so the client stops its spinner.
                        if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
                            debug!(error = %e, "failed to answer callback query");
                        }
                        if let Some(event) = handler::parse_callback(&query) {
                            if tx.send(event).await.is_err() {
                                warn!("inbound channel closed, dropping callback");
                            }
                        }
                        respond(())
                    }
                });

            Dispatcher::builder(
                bot,
                teloxide::dptree::entry()
                    .branch(message_branch)
                    .branch(callback_branch),
            )
            .default_handler(|_| async {}) // Silently ignore other update kinds
            .build()
            .dispatch()
            .await;
        });

        self.polling_handle = Some(handle);
        Ok(())
    }

    async fn send(&self, reply: Reply) -> Result<MessageId, DripbotError> {
        let chat_id = TgChatId(reply.chat_id.0);
        let mut request = self
            .bot
            .send_message(Recipient::Id(chat_id), &reply.body);
        if let Some(ref kb) = reply.keyboard {
            request = request.reply_markup(keyboard::render(kb));
        }

        let sent = request.await.map_err(|e| DripbotError::Channel {
            message: format!("failed to send message: {e}"),
            source: Some(Box::new(e)),
        })?;
        Ok(MessageId(sent.id.0.to_string()))
    }

    async fn edit(
        &self,
        chat_id: ChatId,
        message_id: &MessageId,
        reply: Reply,
    ) -> Result<(), DripbotError> {
        let chat = TgChatId(chat_id.0);
        let msg_id = message_id
            .0
            .parse::<i32>()
            .map(teloxide::types::MessageId)
            .map_err(|e| DripbotError::Channel {
                message: format!("invalid message_id: {e}"),
                source: None,
            })?;

        // Telegram only allows inline markup on edits; a menu keyboard on
        // an edit is dropped.
        let result = match reply.keyboard {
            Some(Keyboard::Inline(ref rows)) => {
                self.bot
                    .edit_message_text(chat, msg_id, &reply.body)
                    .reply_markup(keyboard::render_inline(rows))
                    .await
            }
            _ => self.bot.edit_message_text(chat, msg_id, &reply.body).await,
        };

        match result {
            Ok(_) => Ok(()),
            Err(e) if e.to_string().contains("message is not modified") => Ok(()),
            Err(e) => Err(DripbotError::Channel {
                message: format!("failed to edit message: {e}"),
                source: Some(Box::new(e)),
            }),
        }
    }

    async fn receive(&self) -> Result<InboundEvent, DripbotError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv().await.ok_or_else(|| DripbotError::Channel {
            message: "Telegram inbound channel closed".into(),
            source: None,
        })
    }
}
