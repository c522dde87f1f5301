// SPDX-FileCopyrightText: 2026 Dripbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core types and adapter traits for the dripbot order-tracking bot.
//!
//! Defines the error taxonomy, the domain model (orders, status ranges,
//! strict `DD.MM.YYYY` dates), the closed inbound-event set parsed at the
//! channel boundary, and the adapter traits implemented by the Telegram
//! channel and the SQLite store.

pub mod date;
pub mod error;
pub mod event;
pub mod traits;
pub mod types;

pub use date::{OrderDate, DATE_FORMAT_HINT};
pub use error::DripbotError;
pub use event::{EventKind, InboundEvent, Keyboard, MenuAction, Reply, Selection};
pub use traits::{ChatGateway, OrderStore, PluginAdapter};
pub use types::{
    AdapterType, ChatId, CustomerOrder, HealthStatus, MessageId, NewStatusRange, OrderId,
    StatusCode, StatusRange, UserId, INFO_MAX_CHARS,
};
