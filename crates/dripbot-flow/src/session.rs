// SPDX-FileCopyrightText: 2026 Dripbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user conversation session state.
//!
//! A session exists only while a multi-step flow is in progress: it is
//! created when a flow is entered, replaced on every step, and removed on
//! completion, cancellation, or reset. A user with no session entry is
//! idle. Sessions live in memory only and do not survive a restart.
//!
//! The store is an explicit value injected into the engine rather than
//! ambient global state, so tests can construct and inspect it directly.

use std::collections::HashMap;

use tokio::sync::Mutex;

use dripbot_core::{OrderDate, OrderId, StatusCode, UserId};

/// Why a user is being asked for an order date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateIntent {
    /// Persist the date as the user's registered order.
    Register,
    /// Resolve a status for the date without touching any record.
    Check,
}

/// In-progress flow states. Each variant carries the fields collected so
/// far; absence of a session entry means the user is idle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    /// Registration/recheck flow: waiting for an order date.
    AwaitingOrderDate { intent: DateIntent },
    /// Admin range flow: waiting for the start date.
    AwaitingDateFrom,
    /// Admin range flow: waiting for the end date.
    AwaitingDateTo { date_from: OrderDate },
    /// Admin range flow: waiting for a status selection.
    AwaitingStatusChoice {
        date_from: OrderDate,
        date_to: OrderDate,
    },
    /// Admin range flow: waiting for the free-text note.
    AwaitingInfoText {
        date_from: OrderDate,
        date_to: OrderDate,
        status: StatusCode,
    },
    /// Payment flow: waiting for an order id to look up.
    AwaitingOrderIdLookup,
    /// Payment flow: waiting for the paid/unpaid selection.
    AwaitingPaymentChoice { order_id: OrderId },
}

/// In-memory mapping from user identity to in-progress flow state.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<UserId, FlowState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current flow state for a user, or `None` when idle.
    pub async fn get(&self, user_id: UserId) -> Option<FlowState> {
        self.sessions.lock().await.get(&user_id).cloned()
    }

    /// Enter or advance a flow. Any prior in-progress flow for this user
    /// is replaced -- flows never stack.
    pub async fn set(&self, user_id: UserId, state: FlowState) {
        self.sessions.lock().await.insert(user_id, state);
    }

    /// Tear down the user's session, returning them to idle.
    pub async fn clear(&self, user_id: UserId) {
        self.sessions.lock().await.remove(&user_id);
    }

    /// Number of users currently mid-flow.
    pub async fn active(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
