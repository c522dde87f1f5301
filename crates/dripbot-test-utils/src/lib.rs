// SPDX-FileCopyrightText: 2026 Dripbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock adapters for deterministic dripbot testing.
//!
//! `MockGateway` implements `ChatGateway` with injectable inbound events and
//! captured outbound replies; `MockStore` implements `OrderStore` in memory
//! with failure injection for persistence-error paths.

pub mod mock_gateway;
pub mod mock_store;

pub use mock_gateway::MockGateway;
pub use mock_store::MockStore;
