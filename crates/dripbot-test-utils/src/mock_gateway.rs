// SPDX-FileCopyrightText: 2026 Dripbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock chat gateway for deterministic testing.
//!
//! `MockGateway` implements `ChatGateway` with injectable inbound events
//! and captured outbound replies for assertion in tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use dripbot_core::{
    AdapterType, ChatGateway, ChatId, DripbotError, HealthStatus, InboundEvent, MessageId,
    PluginAdapter, Reply,
};

/// A mock messaging gateway for testing.
///
/// Provides three captures:
/// - **inbound**: Events injected via `inject_event()` are returned by `receive()`
/// - **sent**: Replies passed to `send()` are retrievable via `sent_replies()`
/// - **edited**: Edits passed to `edit()` are retrievable via `edited_replies()`
pub struct MockGateway {
    inbound: Arc<Mutex<VecDeque<InboundEvent>>>,
    sent: Arc<Mutex<Vec<Reply>>>,
    edited: Arc<Mutex<Vec<(ChatId, MessageId, Reply)>>>,
    notify: Arc<Notify>,
    next_message_id: Arc<Mutex<u64>>,
}

impl MockGateway {
    /// Create a new mock gateway with empty queues.
    pub fn new() -> Self {
        Self {
            inbound: Arc::new(Mutex::new(VecDeque::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
            edited: Arc::new(Mutex::new(Vec::new())),
            notify: Arc::new(Notify::new()),
            next_message_id: Arc::new(Mutex::new(0)),
        }
    }

    /// Inject an inbound event into the receive queue.
    ///
    /// The next call to `receive()` will return this event.
    pub async fn inject_event(&self, event: InboundEvent) {
        self.inbound.lock().await.push_back(event);
        self.notify.notify_one();
    }

    /// Get all replies that were sent through `send()`.
    pub async fn sent_replies(&self) -> Vec<Reply> {
        self.sent.lock().await.clone()
    }

    /// Get the last sent reply, panicking if nothing was sent.
    pub async fn last_reply(&self) -> Reply {
        self.sent
            .lock()
            .await
            .last()
            .cloned()
            .expect("no replies sent")
    }

    /// Get all in-place edits performed through `edit()`.
    pub async fn edited_replies(&self) -> Vec<(ChatId, MessageId, Reply)> {
        self.edited.lock().await.clone()
    }

    /// Get the count of sent replies.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Clear all captured replies and edits.
    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
        self.edited.lock().await.clear();
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockGateway {
    fn name(&self) -> &str {
        "mock-gateway"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, DripbotError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), DripbotError> {
        Ok(())
    }
}

#[async_trait]
impl ChatGateway for MockGateway {
    async fn connect(&mut self) -> Result<(), DripbotError> {
        Ok(())
    }

    async fn send(&self, reply: Reply) -> Result<MessageId, DripbotError> {
        let mut next = self.next_message_id.lock().await;
        *next += 1;
        let id = MessageId(format!("mock-msg-{next}"));
        self.sent.lock().await.push(reply);
        Ok(id)
    }

    async fn edit(
        &self,
        chat_id: ChatId,
        message_id: &MessageId,
        reply: Reply,
    ) -> Result<(), DripbotError> {
        self.edited
            .lock()
            .await
            .push((chat_id, message_id.clone(), reply));
        Ok(())
    }

    async fn receive(&self) -> Result<InboundEvent, DripbotError> {
        loop {
            // Try to pop from queue
            {
                let mut queue = self.inbound.lock().await;
                if let Some(event) = queue.pop_front() {
                    return Ok(event);
                }
            }
            // Wait for notification that a new event was injected
            self.notify.notified().await;
        }
    }
}
