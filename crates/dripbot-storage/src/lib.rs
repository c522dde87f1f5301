// SPDX-FileCopyrightText: 2026 Dripbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the dripbot order-tracking bot.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a
//! single-writer concurrency model via `tokio-rusqlite`, and typed CRUD
//! operations for customer orders and status ranges.

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

mod adapter;

pub use adapter::SqliteStore;
pub use database::Database;
pub use models::*;
