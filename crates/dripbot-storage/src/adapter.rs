// SPDX-FileCopyrightText: 2026 Dripbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the OrderStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use dripbot_config::model::StorageConfig;
use dripbot_core::{
    AdapterType, CustomerOrder, DripbotError, HealthStatus, NewStatusRange, OrderDate, OrderId,
    OrderStore, PluginAdapter, StatusRange, UserId,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed order store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily initialized on the first
/// call to [`OrderStore::initialize`].
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given configuration.
    ///
    /// The database connection is not opened until [`OrderStore::initialize`]
    /// is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, DripbotError> {
        self.db.get().ok_or_else(|| DripbotError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, DripbotError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), DripbotError> {
        // Shutdown delegates to close if the DB was initialized.
        if let Some(db) = self.db.get() {
            db.close().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl OrderStore for SqliteStore {
    async fn initialize(&self) -> Result<(), DripbotError> {
        let db = Database::open(&self.config.database_path).await?;
        self.db.set(db).map_err(|_| DripbotError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), DripbotError> {
        self.db()?.close().await
    }

    // --- Customer orders ---

    async fn order_by_user(&self, user_id: UserId) -> Result<Option<CustomerOrder>, DripbotError> {
        queries::orders::get_by_user(self.db()?, user_id).await
    }

    async fn order_by_order_id(
        &self,
        order_id: &OrderId,
    ) -> Result<Option<CustomerOrder>, DripbotError> {
        queries::orders::get_by_order_id(self.db()?, order_id).await
    }

    async fn upsert_order(&self, order: &CustomerOrder) -> Result<(), DripbotError> {
        queries::orders::upsert(self.db()?, order).await
    }

    async fn set_paid(&self, order_id: &OrderId, is_paid: bool) -> Result<(), DripbotError> {
        queries::orders::set_paid(self.db()?, order_id, is_paid).await
    }

    // --- Status ranges ---

    async fn insert_range(&self, range: &NewStatusRange) -> Result<i64, DripbotError> {
        queries::ranges::insert(self.db()?, range).await
    }

    async fn list_ranges(&self) -> Result<Vec<StatusRange>, DripbotError> {
        queries::ranges::list_all(self.db()?).await
    }

    async fn ranges_covering(&self, date: OrderDate) -> Result<Vec<StatusRange>, DripbotError> {
        queries::ranges::covering(self.db()?, date).await
    }

    async fn delete_range(&self, id: i64) -> Result<(), DripbotError> {
        queries::ranges::delete(self.db()?, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dripbot_core::StatusCode;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn sqlite_store_implements_plugin_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("adapter.db");
        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));

        assert_eq!(store.name(), "sqlite");
        assert_eq!(store.version(), semver::Version::new(0, 1, 0));
        assert_eq!(store.adapter_type(), AdapterType::Storage);
    }

    #[tokio::test]
    async fn initialize_opens_database_at_configured_path() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("init.db");
        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));

        store.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("double_init.db");
        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));

        store.initialize().await.unwrap();
        assert!(store.initialize().await.is_err());
    }

    #[tokio::test]
    async fn health_check_fails_when_not_initialized() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("no_init.db");
        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));

        assert!(store.health_check().await.is_err());
    }

    #[tokio::test]
    async fn full_order_lifecycle_through_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("lifecycle.db");
        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));
        store.initialize().await.unwrap();
        assert_eq!(store.health_check().await.unwrap(), HealthStatus::Healthy);

        let order = CustomerOrder {
            user_id: UserId(7),
            order_id: OrderId::new("AB12CD34"),
            order_date: OrderDate::parse("25.11.2025").unwrap(),
            is_paid: true,
            created_at: "25.11.2025 10:00".to_string(),
        };
        store.upsert_order(&order).await.unwrap();

        let by_user = store.order_by_user(UserId(7)).await.unwrap().unwrap();
        assert_eq!(by_user.order_id, order.order_id);

        let by_order = store
            .order_by_order_id(&OrderId::new("ab12cd34"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_order.user_id, UserId(7));

        store.set_paid(&order.order_id, false).await.unwrap();
        assert!(!store.order_by_user(UserId(7)).await.unwrap().unwrap().is_paid);

        store.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn range_lifecycle_through_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("range_adapter.db");
        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));
        store.initialize().await.unwrap();

        let id = store
            .insert_range(&NewStatusRange {
                date_from: OrderDate::parse("01.11.2025").unwrap(),
                date_to: OrderDate::parse("10.11.2025").unwrap(),
                status: StatusCode::Waiting,
                info: "packing".to_string(),
            })
            .await
            .unwrap();
        assert!(id > 0);

        let covering = store
            .ranges_covering(OrderDate::parse("05.11.2025").unwrap())
            .await
            .unwrap();
        assert_eq!(covering.len(), 1);

        store.delete_range(id).await.unwrap();
        assert!(store.list_ranges().await.unwrap().is_empty());

        let err = store.delete_range(id).await.unwrap_err();
        assert!(matches!(err, DripbotError::NotFound { .. }));

        store.shutdown().await.unwrap();
    }
}
