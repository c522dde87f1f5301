// SPDX-FileCopyrightText: 2026 Dripbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation flows for the dripbot order-tracking bot.
//!
//! The [`FlowEngine`] is the central coordinator that:
//! - Dispatches parsed inbound events by exhaustive matching
//! - Tracks per-user multi-step flows in an injected [`SessionStore`]
//! - Gates admin operations behind the configured administrator identity
//! - Invokes the status [`resolver`] and the order [`registrar`]

pub mod engine;
pub mod registrar;
pub mod resolver;
pub mod session;

pub use engine::FlowEngine;
pub use session::{DateIntent, FlowState, SessionStore};
