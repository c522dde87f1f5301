// SPDX-FileCopyrightText: 2026 Dripbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across adapter traits and the flow engine.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::date::OrderDate;

/// Telegram user identity. Doubles as the session key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

/// Chat to deliver replies into. For direct messages this equals the user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub i64);

/// Channel-assigned identifier of a delivered message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// An 8-character uppercase alphanumeric order token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(String);

impl OrderId {
    /// Wraps user- or generator-supplied input, normalizing to uppercase.
    pub fn new(raw: impl Into<String>) -> Self {
        OrderId(raw.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a [`crate::traits::PluginAdapter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
pub enum AdapterType {
    Channel,
    Storage,
}

/// Closed set of shipping statuses an admin can announce for a date range.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StatusCode {
    Waiting,
    InTransit,
    Delivered,
}

impl StatusCode {
    /// Human-facing label shown in replies and keyboard buttons.
    pub fn label(&self) -> &'static str {
        match self {
            StatusCode::Waiting => "⏳ Waiting",
            StatusCode::InTransit => "🚚 In transit",
            StatusCode::Delivered => "✅ Delivered",
        }
    }
}

/// A customer's registered order. One row per user; re-registration
/// overwrites the row wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerOrder {
    pub user_id: UserId,
    pub order_id: OrderId,
    pub order_date: OrderDate,
    pub is_paid: bool,
    pub created_at: String,
}

/// An admin-declared status announcement over an inclusive date interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRange {
    pub id: i64,
    pub date_from: OrderDate,
    pub date_to: OrderDate,
    pub status: StatusCode,
    pub info: String,
    pub created_at: String,
}

impl StatusRange {
    /// Inclusive calendar containment check.
    pub fn covers(&self, date: OrderDate) -> bool {
        self.date_from <= date && date <= self.date_to
    }
}

/// A status range about to be inserted; the store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStatusRange {
    pub date_from: OrderDate,
    pub date_to: OrderDate,
    pub status: StatusCode,
    pub info: String,
}

/// Maximum length of the free-text note attached to a status range.
pub const INFO_MAX_CHARS: usize = 100;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_code_tokens_roundtrip() {
        for (code, token) in [
            (StatusCode::Waiting, "waiting"),
            (StatusCode::InTransit, "in_transit"),
            (StatusCode::Delivered, "delivered"),
        ] {
            assert_eq!(code.to_string(), token);
            assert_eq!(StatusCode::from_str(token).unwrap(), code);
        }
    }

    #[test]
    fn status_code_rejects_unknown_token() {
        assert!(StatusCode::from_str("lost_in_mail").is_err());
    }

    #[test]
    fn order_id_normalizes_to_uppercase() {
        let id = OrderId::new(" a1b2c3d4 ");
        assert_eq!(id.as_str(), "A1B2C3D4");
    }

    #[test]
    fn range_covers_is_inclusive() {
        let range = StatusRange {
            id: 1,
            date_from: OrderDate::parse("01.11.2025").unwrap(),
            date_to: OrderDate::parse("10.11.2025").unwrap(),
            status: StatusCode::Waiting,
            info: String::new(),
            created_at: String::new(),
        };
        assert!(range.covers(OrderDate::parse("01.11.2025").unwrap()));
        assert!(range.covers(OrderDate::parse("10.11.2025").unwrap()));
        assert!(range.covers(OrderDate::parse("05.11.2025").unwrap()));
        assert!(!range.covers(OrderDate::parse("31.10.2025").unwrap()));
        assert!(!range.covers(OrderDate::parse("11.11.2025").unwrap()));
    }

    #[test]
    fn range_covers_across_month_boundary() {
        // Lexicographic DD.MM.YYYY comparison would get this wrong.
        let range = StatusRange {
            id: 1,
            date_from: OrderDate::parse("28.10.2025").unwrap(),
            date_to: OrderDate::parse("04.11.2025").unwrap(),
            status: StatusCode::InTransit,
            info: String::new(),
            created_at: String::new(),
        };
        assert!(range.covers(OrderDate::parse("30.10.2025").unwrap()));
        assert!(range.covers(OrderDate::parse("02.11.2025").unwrap()));
        assert!(!range.covers(OrderDate::parse("05.11.2025").unwrap()));
    }
}
