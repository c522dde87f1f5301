// SPDX-FileCopyrightText: 2026 Dripbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the dripbot order-tracking bot.

use thiserror::Error;

/// The primary error type used across all dripbot adapter traits and flows.
#[derive(Debug, Error)]
pub enum DripbotError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database open, query failure, corrupt row).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Channel adapter errors (connection failure, send/edit failure).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A lookup yielded nothing. Distinct from [`DripbotError::Storage`] so
    /// handlers can answer the user instead of reporting a generic failure.
    #[error("{what} not found")]
    NotFound { what: String },

    /// User input failed validation (malformed date, malformed numeric argument).
    /// Recovered locally by re-prompting; never aborts a flow.
    #[error("invalid input: {0}")]
    Validation(String),

    /// A non-admin identity invoked an admin-only operation.
    #[error("admin-only operation")]
    Unauthorized,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DripbotError {
    /// Shorthand for a [`DripbotError::NotFound`] with the given subject.
    pub fn not_found(what: impl Into<String>) -> Self {
        DripbotError::NotFound { what: what.into() }
    }
}
