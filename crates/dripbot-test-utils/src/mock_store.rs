// SPDX-FileCopyrightText: 2026 Dripbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory order store for engine tests.
//!
//! Mirrors the semantics of the SQLite adapter (wholesale upsert,
//! `NotFound` on missing mutation targets, newest-first listings) without
//! touching disk, and can be flipped into a failing mode to exercise
//! persistence-error handling.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use dripbot_core::{
    AdapterType, CustomerOrder, DripbotError, HealthStatus, NewStatusRange, OrderDate, OrderId,
    OrderStore, PluginAdapter, StatusRange, UserId,
};

#[derive(Default)]
struct Inner {
    orders: HashMap<i64, CustomerOrder>,
    ranges: Vec<StatusRange>,
    next_range_id: i64,
    failing: bool,
}

/// An in-memory [`OrderStore`].
#[derive(Clone, Default)]
pub struct MockStore {
    inner: Arc<Mutex<Inner>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, every subsequent operation fails with a storage error.
    pub async fn set_failing(&self, failing: bool) {
        self.inner.lock().await.failing = failing;
    }

    /// Direct snapshot of all stored orders, for assertions.
    pub async fn orders(&self) -> Vec<CustomerOrder> {
        self.inner.lock().await.orders.values().cloned().collect()
    }

    /// Direct snapshot of all stored ranges, for assertions.
    pub async fn ranges(&self) -> Vec<StatusRange> {
        self.inner.lock().await.ranges.clone()
    }

    /// Seed a range directly, bypassing the admin flow.
    pub async fn seed_range(&self, range: NewStatusRange) -> i64 {
        let mut inner = self.inner.lock().await;
        inner.next_range_id += 1;
        let id = inner.next_range_id;
        inner.ranges.push(StatusRange {
            id,
            date_from: range.date_from,
            date_to: range.date_to,
            status: range.status,
            info: range.info,
            created_at: "01.01.2026 00:00".to_string(),
        });
        id
    }

    fn check(inner: &Inner) -> Result<(), DripbotError> {
        if inner.failing {
            return Err(DripbotError::Storage {
                source: "mock store failure injected".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for MockStore {
    fn name(&self) -> &str {
        "mock-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, DripbotError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), DripbotError> {
        Ok(())
    }
}

#[async_trait]
impl OrderStore for MockStore {
    async fn initialize(&self) -> Result<(), DripbotError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), DripbotError> {
        Ok(())
    }

    async fn order_by_user(&self, user_id: UserId) -> Result<Option<CustomerOrder>, DripbotError> {
        let inner = self.inner.lock().await;
        Self::check(&inner)?;
        Ok(inner.orders.get(&user_id.0).cloned())
    }

    async fn order_by_order_id(
        &self,
        order_id: &OrderId,
    ) -> Result<Option<CustomerOrder>, DripbotError> {
        let inner = self.inner.lock().await;
        Self::check(&inner)?;
        Ok(inner
            .orders
            .values()
            .find(|o| o.order_id == *order_id)
            .cloned())
    }

    async fn upsert_order(&self, order: &CustomerOrder) -> Result<(), DripbotError> {
        let mut inner = self.inner.lock().await;
        Self::check(&inner)?;
        inner.orders.insert(order.user_id.0, order.clone());
        Ok(())
    }

    async fn set_paid(&self, order_id: &OrderId, is_paid: bool) -> Result<(), DripbotError> {
        let mut inner = self.inner.lock().await;
        Self::check(&inner)?;
        let order = inner
            .orders
            .values_mut()
            .find(|o| o.order_id == *order_id)
            .ok_or_else(|| DripbotError::not_found(format!("order {order_id}")))?;
        order.is_paid = is_paid;
        Ok(())
    }

    async fn insert_range(&self, range: &NewStatusRange) -> Result<i64, DripbotError> {
        {
            let inner = self.inner.lock().await;
            Self::check(&inner)?;
        }
        Ok(self.seed_range(range.clone()).await)
    }

    async fn list_ranges(&self) -> Result<Vec<StatusRange>, DripbotError> {
        let inner = self.inner.lock().await;
        Self::check(&inner)?;
        let mut ranges = inner.ranges.clone();
        ranges.sort_by_key(|r| std::cmp::Reverse(r.id));
        Ok(ranges)
    }

    async fn ranges_covering(&self, date: OrderDate) -> Result<Vec<StatusRange>, DripbotError> {
        let inner = self.inner.lock().await;
        Self::check(&inner)?;
        Ok(inner
            .ranges
            .iter()
            .filter(|r| r.covers(date))
            .cloned()
            .collect())
    }

    async fn delete_range(&self, id: i64) -> Result<(), DripbotError> {
        let mut inner = self.inner.lock().await;
        Self::check(&inner)?;
        let before = inner.ranges.len();
        inner.ranges.retain(|r| r.id != id);
        if inner.ranges.len() == before {
            return Err(DripbotError::not_found(format!("status range #{id}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dripbot_core::StatusCode;

    fn make_order(user_id: i64, order_id: &str) -> CustomerOrder {
        CustomerOrder {
            user_id: UserId(user_id),
            order_id: OrderId::new(order_id),
            order_date: OrderDate::parse("25.11.2025").unwrap(),
            is_paid: true,
            created_at: "25.11.2025 10:00".to_string(),
        }
    }

    #[tokio::test]
    async fn upsert_and_lookups_roundtrip() {
        let store = MockStore::new();
        store.upsert_order(&make_order(1, "AB12CD34")).await.unwrap();

        assert!(store.order_by_user(UserId(1)).await.unwrap().is_some());
        assert!(store
            .order_by_order_id(&OrderId::new("AB12CD34"))
            .await
            .unwrap()
            .is_some());
        assert!(store.order_by_user(UserId(2)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_paid_missing_order_reports_not_found() {
        let store = MockStore::new();
        let err = store
            .set_paid(&OrderId::new("ZZZZZZZZ"), true)
            .await
            .unwrap_err();
        assert!(matches!(err, DripbotError::NotFound { .. }));
    }

    #[tokio::test]
    async fn failure_injection_turns_every_call_into_storage_error() {
        let store = MockStore::new();
        store.set_failing(true).await;
        let err = store.order_by_user(UserId(1)).await.unwrap_err();
        assert!(matches!(err, DripbotError::Storage { .. }));

        store.set_failing(false).await;
        assert!(store.order_by_user(UserId(1)).await.is_ok());
    }

    #[tokio::test]
    async fn ranges_get_increasing_ids_and_list_newest_first() {
        let store = MockStore::new();
        let r = NewStatusRange {
            date_from: OrderDate::parse("01.11.2025").unwrap(),
            date_to: OrderDate::parse("10.11.2025").unwrap(),
            status: StatusCode::Waiting,
            info: String::new(),
        };
        let id1 = store.insert_range(&r).await.unwrap();
        let id2 = store.insert_range(&r).await.unwrap();
        assert!(id2 > id1);

        let listed = store.list_ranges().await.unwrap();
        assert_eq!(listed[0].id, id2);
    }
}
