// SPDX-FileCopyrightText: 2026 Dripbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Customer order CRUD operations.

use rusqlite::params;

use dripbot_core::{CustomerOrder, DripbotError, OrderDate, OrderId, UserId};

use crate::database::Database;

fn row_to_order(row: &rusqlite::Row<'_>) -> Result<CustomerOrder, rusqlite::Error> {
    let date_str: String = row.get(2)?;
    let order_date = OrderDate::parse(&date_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(CustomerOrder {
        user_id: UserId(row.get(0)?),
        order_id: OrderId::new(row.get::<_, String>(1)?),
        order_date,
        is_paid: row.get(3)?,
        created_at: row.get(4)?,
    })
}

const ORDER_COLUMNS: &str = "user_id, order_id, order_date, is_paid, created_at";

/// Point lookup by user identity.
pub async fn get_by_user(
    db: &Database,
    user_id: UserId,
) -> Result<Option<CustomerOrder>, DripbotError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ORDER_COLUMNS} FROM customers WHERE user_id = ?1"
            ))?;
            let result = stmt.query_row(params![user_id.0], row_to_order);
            match result {
                Ok(order) => Ok(Some(order)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Point lookup by order identifier.
pub async fn get_by_order_id(
    db: &Database,
    order_id: &OrderId,
) -> Result<Option<CustomerOrder>, DripbotError> {
    let order_id = order_id.as_str().to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ORDER_COLUMNS} FROM customers WHERE order_id = ?1"
            ))?;
            let result = stmt.query_row(params![order_id], row_to_order);
            match result {
                Ok(order) => Ok(Some(order)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert or wholesale-overwrite the order row for the order's user.
pub async fn upsert(db: &Database, order: &CustomerOrder) -> Result<(), DripbotError> {
    let order = order.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO customers (user_id, order_id, order_date, is_paid, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    order.user_id.0,
                    order.order_id.as_str(),
                    order.order_date.to_string(),
                    order.is_paid,
                    order.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Set the paid flag for an order. Returns `NotFound` when no row matches.
pub async fn set_paid(
    db: &Database,
    order_id: &OrderId,
    is_paid: bool,
) -> Result<(), DripbotError> {
    let order_id_str = order_id.as_str().to_string();
    let changed = db
        .connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE customers SET is_paid = ?1 WHERE order_id = ?2",
                params![is_paid, order_id_str],
            )?;
            Ok(changed)
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    if changed == 0 {
        return Err(DripbotError::not_found(format!("order {order_id}")));
    }
    Ok(())
}

/// Check whether an order id is already assigned.
pub async fn order_id_exists(db: &Database, order_id: &OrderId) -> Result<bool, DripbotError> {
    let order_id = order_id.as_str().to_string();
    db.connection()
        .call(move |conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM customers WHERE order_id = ?1)",
                params![order_id],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
