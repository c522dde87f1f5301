// SPDX-FileCopyrightText: 2026 Dripbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Status range operations.
//!
//! Dates are stored as `DD.MM.YYYY` text, which does NOT sort
//! chronologically, so the covering query loads rows and compares parsed
//! calendar dates in Rust instead of comparing strings in SQL.

use std::str::FromStr;

use rusqlite::params;

use dripbot_core::{DripbotError, NewStatusRange, OrderDate, StatusCode, StatusRange};

use crate::database::Database;

fn row_to_range(row: &rusqlite::Row<'_>) -> Result<StatusRange, rusqlite::Error> {
    let from_str: String = row.get(1)?;
    let to_str: String = row.get(2)?;
    let status_str: String = row.get(3)?;
    let date_from = OrderDate::parse(&from_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let date_to = OrderDate::parse(&to_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let status = StatusCode::from_str(&status_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(StatusRange {
        id: row.get(0)?,
        date_from,
        date_to,
        status,
        info: row.get(4)?,
        created_at: row.get(5)?,
    })
}

const RANGE_COLUMNS: &str = "id, date_from, date_to, status, info, created_at";

/// Append a range and return its assigned id.
pub async fn insert(db: &Database, range: &NewStatusRange) -> Result<i64, DripbotError> {
    let range = range.clone();
    let created_at = crate::queries::now_stamp();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO status_ranges (date_from, date_to, status, info, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    range.date_from.to_string(),
                    range.date_to.to_string(),
                    range.status.to_string(),
                    range.info,
                    created_at,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All ranges, newest first.
pub async fn list_all(db: &Database) -> Result<Vec<StatusRange>, DripbotError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {RANGE_COLUMNS} FROM status_ranges ORDER BY id DESC"
            ))?;
            let rows = stmt.query_map([], row_to_range)?;
            let mut ranges = Vec::new();
            for row in rows {
                ranges.push(row?);
            }
            Ok(ranges)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Ranges whose inclusive interval contains `date`, compared numerically.
pub async fn covering(db: &Database, date: OrderDate) -> Result<Vec<StatusRange>, DripbotError> {
    let all = list_all(db).await?;
    Ok(all.into_iter().filter(|r| r.covers(date)).collect())
}

/// Delete a range by id. Returns `NotFound` when no row matches.
pub async fn delete(db: &Database, id: i64) -> Result<(), DripbotError> {
    let changed = db
        .connection()
        .call(move |conn| {
            let changed = conn.execute("DELETE FROM status_ranges WHERE id = ?1", params![id])?;
            Ok(changed)
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    if changed == 0 {
        return Err(DripbotError::not_found(format!("status range #{id}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("ranges.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn make_range(from: &str, to: &str, status: StatusCode) -> NewStatusRange {
        NewStatusRange {
            date_from: OrderDate::parse(from).unwrap(),
            date_to: OrderDate::parse(to).unwrap(),
            status,
            info: "note".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let (db, _dir) = setup_db().await;
        let id1 = insert(&db, &make_range("01.11.2025", "10.11.2025", StatusCode::Waiting))
            .await
            .unwrap();
        let id2 = insert(&db, &make_range("05.11.2025", "15.11.2025", StatusCode::InTransit))
            .await
            .unwrap();
        assert!(id2 > id1);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_all_is_newest_first() {
        let (db, _dir) = setup_db().await;
        insert(&db, &make_range("01.11.2025", "10.11.2025", StatusCode::Waiting))
            .await
            .unwrap();
        insert(&db, &make_range("05.11.2025", "15.11.2025", StatusCode::InTransit))
            .await
            .unwrap();

        let all = list_all(&db).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].id > all[1].id);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn covering_compares_calendar_dates_not_strings() {
        let (db, _dir) = setup_db().await;
        // "05.11.2025" < "28.10.2025" as a string; chronologically it is after.
        insert(&db, &make_range("28.10.2025", "04.11.2025", StatusCode::Waiting))
            .await
            .unwrap();

        let inside = covering(&db, OrderDate::parse("02.11.2025").unwrap())
            .await
            .unwrap();
        assert_eq!(inside.len(), 1);

        let outside = covering(&db, OrderDate::parse("05.11.2025").unwrap())
            .await
            .unwrap();
        assert!(outside.is_empty());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn covering_returns_every_overlapping_range() {
        let (db, _dir) = setup_db().await;
        insert(&db, &make_range("01.11.2025", "10.11.2025", StatusCode::Waiting))
            .await
            .unwrap();
        insert(&db, &make_range("05.11.2025", "15.11.2025", StatusCode::InTransit))
            .await
            .unwrap();

        let both = covering(&db, OrderDate::parse("07.11.2025").unwrap())
            .await
            .unwrap();
        assert_eq!(both.len(), 2);

        let one = covering(&db, OrderDate::parse("02.11.2025").unwrap())
            .await
            .unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].status, StatusCode::Waiting);

        let none = covering(&db, OrderDate::parse("20.11.2025").unwrap())
            .await
            .unwrap();
        assert!(none.is_empty());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_removes_row_and_reports_missing() {
        let (db, _dir) = setup_db().await;
        let id = insert(&db, &make_range("01.11.2025", "10.11.2025", StatusCode::Waiting))
            .await
            .unwrap();

        delete(&db, id).await.unwrap();
        assert!(list_all(&db).await.unwrap().is_empty());

        let err = delete(&db, id).await.unwrap_err();
        assert!(matches!(err, DripbotError::NotFound { .. }));
        db.close().await.unwrap();
    }
}
