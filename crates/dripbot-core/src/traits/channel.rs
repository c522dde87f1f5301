// SPDX-FileCopyrightText: 2026 Dripbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for the messaging platform integration.

use async_trait::async_trait;

use crate::error::DripbotError;
use crate::event::{InboundEvent, Reply};
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChatId, MessageId};

/// Bidirectional chat gateway.
///
/// The gateway delivers parsed [`InboundEvent`]s and accepts
/// channel-agnostic [`Reply`]s; keyboard rendering and payload encoding
/// are the implementation's concern.
#[async_trait]
pub trait ChatGateway: PluginAdapter {
    /// Establishes a connection to the messaging platform.
    async fn connect(&mut self) -> Result<(), DripbotError>;

    /// Sends a reply into a chat.
    async fn send(&self, reply: Reply) -> Result<MessageId, DripbotError>;

    /// Edits a previously sent message in place.
    async fn edit(
        &self,
        chat_id: ChatId,
        message_id: &MessageId,
        reply: Reply,
    ) -> Result<(), DripbotError>;

    /// Receives the next inbound event.
    async fn receive(&self) -> Result<InboundEvent, DripbotError>;
}
