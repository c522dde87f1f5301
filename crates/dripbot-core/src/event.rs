// SPDX-FileCopyrightText: 2026 Dripbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The closed inbound-event set and the channel-agnostic reply model.
//!
//! Channel adapters parse raw platform updates into [`InboundEvent`] exactly
//! once, at the boundary. Everything downstream dispatches by exhaustive
//! matching on [`EventKind`] -- no string-prefix inspection in handlers.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{ChatId, MessageId, StatusCode, UserId};

/// A reply-keyboard menu button. Labels are the wire format: the channel
/// renders [`MenuAction::label`] and parses incoming text back through
/// [`MenuAction::from_label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuAction {
    CheckStatus,
    ChangeDate,
    SetStatuses,
    ViewRanges,
    ManagePayment,
    ExitAdmin,
}

impl MenuAction {
    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::CheckStatus => "📦 My status",
            MenuAction::ChangeDate => "🔄 Change date",
            MenuAction::SetStatuses => "📊 Set statuses",
            MenuAction::ViewRanges => "📋 View ranges",
            MenuAction::ManagePayment => "💳 Manage payment",
            MenuAction::ExitAdmin => "❌ Exit admin",
        }
    }

    pub fn from_label(text: &str) -> Option<Self> {
        const ALL: [MenuAction; 6] = [
            MenuAction::CheckStatus,
            MenuAction::ChangeDate,
            MenuAction::SetStatuses,
            MenuAction::ViewRanges,
            MenuAction::ManagePayment,
            MenuAction::ExitAdmin,
        ];
        ALL.into_iter().find(|a| a.label() == text)
    }
}

/// A discrete inline-keyboard selection, carried in callback payloads.
///
/// [`Selection::as_payload`] and [`Selection::from_payload`] define the
/// callback wire tokens in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    /// Start the order-date registration flow.
    RegisterOrder,
    /// Start a read-only status check for an entered date.
    QuickCheck,
    /// Status chosen in the admin range flow.
    Status(StatusCode),
    /// Paid/unpaid chosen in the payment flow.
    Paid(bool),
}

impl Selection {
    pub fn as_payload(&self) -> String {
        match self {
            Selection::RegisterOrder => "register_order".to_string(),
            Selection::QuickCheck => "quick_check".to_string(),
            Selection::Status(code) => format!("status_{code}"),
            Selection::Paid(true) => "payment_yes".to_string(),
            Selection::Paid(false) => "payment_no".to_string(),
        }
    }

    pub fn from_payload(payload: &str) -> Option<Self> {
        match payload {
            "register_order" => Some(Selection::RegisterOrder),
            "quick_check" => Some(Selection::QuickCheck),
            "payment_yes" => Some(Selection::Paid(true)),
            "payment_no" => Some(Selection::Paid(false)),
            other => {
                let token = other.strip_prefix("status_")?;
                StatusCode::from_str(token).ok().map(Selection::Status)
            }
        }
    }
}

/// What an inbound update means, decided once at the channel boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// `/start`
    Start,
    /// `/admin`
    AdminPanel,
    /// `/delete_<id>` with a well-formed numeric argument.
    DeleteRange(i64),
    /// A reply-keyboard menu button.
    Menu(MenuAction),
    /// An inline-keyboard callback selection.
    Select(Selection),
    /// Free text -- dates, info notes, and order-id lookups, interpreted
    /// by whatever flow state the sender is in.
    Text(String),
}

/// A single inbound event scoped to one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub user_id: UserId,
    pub chat_id: ChatId,
    /// The message the event originated from. Present for callback
    /// selections so the reply can edit that message in place.
    pub message_id: Option<MessageId>,
    pub kind: EventKind,
}

/// Keyboard attached to a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// Persistent reply keyboard of menu buttons.
    Menu(Vec<Vec<MenuAction>>),
    /// One-shot inline keyboard of labelled selections.
    Inline(Vec<Vec<(String, Selection)>>),
}

/// A channel-agnostic outbound reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub chat_id: ChatId,
    pub body: String,
    pub keyboard: Option<Keyboard>,
}

impl Reply {
    pub fn text(chat_id: ChatId, body: impl Into<String>) -> Self {
        Reply {
            chat_id,
            body: body.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(chat_id: ChatId, body: impl Into<String>, keyboard: Keyboard) -> Self {
        Reply {
            chat_id,
            body: body.into(),
            keyboard: Some(keyboard),
        }
    }
}
