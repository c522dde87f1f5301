// SPDX-FileCopyrightText: 2026 Dripbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules, one per persisted record kind.

pub mod orders;
pub mod ranges;

/// Timestamp format used for `created_at` columns. The schema stores
/// formatted strings, not native date types.
pub(crate) fn now_stamp() -> String {
    chrono::Utc::now().format("%d.%m.%Y %H:%M").to_string()
}
