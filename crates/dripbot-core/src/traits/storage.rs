// SPDX-FileCopyrightText: 2026 Dripbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for customer orders and status ranges.

use async_trait::async_trait;

use crate::date::OrderDate;
use crate::error::DripbotError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{CustomerOrder, NewStatusRange, OrderId, StatusRange, UserId};

/// Record store for the two persisted kinds: customer orders and status
/// ranges.
///
/// Lookups that find nothing return `Ok(None)`; mutations that target a
/// missing row return [`DripbotError::NotFound`]. Backend failures are
/// always [`DripbotError::Storage`] so callers can tell the two apart.
#[async_trait]
pub trait OrderStore: PluginAdapter {
    /// Opens the backend and applies pending migrations.
    async fn initialize(&self) -> Result<(), DripbotError>;

    /// Flushes and closes the backend.
    async fn close(&self) -> Result<(), DripbotError>;

    // --- Customer orders ---

    async fn order_by_user(&self, user_id: UserId) -> Result<Option<CustomerOrder>, DripbotError>;

    async fn order_by_order_id(
        &self,
        order_id: &OrderId,
    ) -> Result<Option<CustomerOrder>, DripbotError>;

    /// Inserts or wholesale-overwrites the order row for `order.user_id`.
    async fn upsert_order(&self, order: &CustomerOrder) -> Result<(), DripbotError>;

    /// Sets the paid flag for an order. Idempotent; `NotFound` if the
    /// order does not exist.
    async fn set_paid(&self, order_id: &OrderId, is_paid: bool) -> Result<(), DripbotError>;

    // --- Status ranges ---

    /// Appends a range and returns its assigned id.
    async fn insert_range(&self, range: &NewStatusRange) -> Result<i64, DripbotError>;

    /// All ranges, newest first.
    async fn list_ranges(&self) -> Result<Vec<StatusRange>, DripbotError>;

    /// Ranges whose inclusive `[date_from, date_to]` interval contains
    /// `date`, compared on parsed calendar dates.
    async fn ranges_covering(&self, date: OrderDate) -> Result<Vec<StatusRange>, DripbotError>;

    /// Deletes a range by id. `NotFound` if no such range.
    async fn delete_range(&self, id: i64) -> Result<(), DripbotError>;
}
