// SPDX-FileCopyrightText: 2026 Dripbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Status resolution over overlapping date ranges.

use tracing::debug;

use dripbot_core::{DripbotError, OrderDate, OrderStore, StatusCode};

/// Resolves the currently applicable status for an order date.
///
/// Among all ranges whose inclusive interval contains the date, the one
/// with the highest id (the most recently inserted) wins. Returns `None`
/// when no range covers the date. Read-only: never mutates any record.
pub async fn resolve(
    store: &dyn OrderStore,
    order_date: OrderDate,
) -> Result<Option<(StatusCode, String)>, DripbotError> {
    let covering = store.ranges_covering(order_date).await?;
    let winner = covering.into_iter().max_by_key(|r| r.id);

    match &winner {
        Some(range) => debug!(
            date = %order_date,
            range_id = range.id,
            status = %range.status,
            "status resolved"
        ),
        None => debug!(date = %order_date, "no status range covers date"),
    }

    Ok(winner.map(|r| (r.status, r.info)))
}
