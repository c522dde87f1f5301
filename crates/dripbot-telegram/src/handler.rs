// SPDX-FileCopyrightText: 2026 Dripbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Boundary parsing of Telegram updates into the closed event set.
//!
//! Raw message text and callback payloads are inspected exactly once,
//! here, and mapped into [`EventKind`] variants. Handlers downstream
//! never look at raw strings.

use teloxide::prelude::*;
use teloxide::types::ChatKind;
use tracing::debug;

use dripbot_core::{ChatId, EventKind, InboundEvent, MenuAction, MessageId, Selection, UserId};

/// Checks whether the message is from a private (DM) chat.
///
/// Group, supergroup, and channel messages return `false`; the bot only
/// converses in direct messages.
pub fn is_dm(msg: &Message) -> bool {
    matches!(msg.chat.kind, ChatKind::Private(_))
}

/// Classifies raw message text into an event kind.
///
/// Commands and menu labels map to their dedicated variants; a
/// `/delete_<id>` with a malformed numeric argument falls through to
/// free text, where the flow engine answers with a hint.
pub fn parse_text(text: &str) -> EventKind {
    let trimmed = text.trim();
    if trimmed == "/start" {
        return EventKind::Start;
    }
    if trimmed == "/admin" {
        return EventKind::AdminPanel;
    }
    if let Some(rest) = trimmed.strip_prefix("/delete_")
        && let Ok(id) = rest.parse::<i64>()
    {
        return EventKind::DeleteRange(id);
    }
    if let Some(action) = MenuAction::from_label(trimmed) {
        return EventKind::Menu(action);
    }
    EventKind::Text(trimmed.to_string())
}

/// Converts a Telegram message into an [`InboundEvent`].
///
/// Returns `None` for non-DM chats, senderless messages (channel posts),
/// and non-text content.
pub fn parse_message(msg: &Message) -> Option<InboundEvent> {
    if !is_dm(msg) {
        debug!(chat_id = msg.chat.id.0, "ignoring non-DM message");
        return None;
    }
    let from = msg.from.as_ref()?;
    let text = msg.text()?;

    Some(InboundEvent {
        user_id: UserId(from.id.0 as i64),
        chat_id: ChatId(msg.chat.id.0),
        // Text events never edit in place, so the originating id is not carried.
        message_id: None,
        kind: parse_text(text),
    })
}

/// Converts a callback query into an [`InboundEvent`].
///
/// Returns `None` when the payload is absent, unknown, or the
/// originating message is inaccessible.
pub fn parse_callback(query: &CallbackQuery) -> Option<InboundEvent> {
    let data = query.data.as_deref()?;
    let Some(selection) = Selection::from_payload(data) else {
        debug!(payload = data, "ignoring unknown callback payload");
        return None;
    };
    let message = query.message.as_ref()?;

    Some(InboundEvent {
        user_id: UserId(query.from.id.0 as i64),
        chat_id: ChatId(message.chat().id.0),
        message_id: Some(MessageId(message.id().0.to_string())),
        kind: EventKind::Select(selection),
    })
}
