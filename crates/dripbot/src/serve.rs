// SPDX-FileCopyrightText: 2026 Dripbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `dripbot serve` command implementation.
//!
//! Wires the SQLite store, the Telegram channel, and the flow engine
//! together, then runs the main event loop: one inbound event at a time,
//! so per-user ordering holds, with all persistence going through the
//! tokio-rusqlite background thread. Supports graceful shutdown via
//! signal handlers.

use std::sync::Arc;

use tracing::{error, info, warn};

use dripbot_config::DripbotConfig;
use dripbot_core::{ChatGateway, DripbotError, HealthStatus, OrderStore, PluginAdapter, UserId};
use dripbot_flow::{FlowEngine, SessionStore};
use dripbot_storage::SqliteStore;
use dripbot_telegram::TelegramChannel;

use crate::shutdown;

/// Runs the `dripbot serve` command.
pub async fn run_serve(config: DripbotConfig) -> Result<(), DripbotError> {
    init_tracing(&config.bot.log_level);

    info!(bot = config.bot.name.as_str(), "starting dripbot serve");

    // Initialize storage.
    let store: Arc<dyn OrderStore> = Arc::new(SqliteStore::new(config.storage.clone()));
    store.initialize().await?;

    // Initialize the Telegram channel.
    let mut channel = TelegramChannel::new(&config.telegram).map_err(|e| {
        error!(error = %e, "failed to initialize Telegram channel");
        eprintln!(
            "error: Telegram bot token required. Set telegram.bot_token in dripbot.toml \
             or the DRIPBOT_TELEGRAM_BOT_TOKEN environment variable."
        );
        e
    })?;

    match channel.health_check().await? {
        HealthStatus::Healthy => info!("telegram bot reachable"),
        HealthStatus::Degraded(reason) | HealthStatus::Unhealthy(reason) => {
            warn!(reason = reason.as_str(), "telegram health check failed, continuing")
        }
    }

    channel.connect().await?;

    let admin = config.telegram.admin_id.map(UserId);
    if admin.is_none() {
        warn!("telegram.admin_id not set; admin operations are disabled");
    }

    let engine = FlowEngine::new(store.clone(), SessionStore::new(), admin);

    // Install signal handler.
    let cancel = shutdown::install_signal_handler();

    let channel: Box<dyn ChatGateway> = Box::new(channel);
    info!("dripbot running");

    loop {
        tokio::select! {
            event = channel.receive() => {
                match event {
                    Ok(event) => {
                        // Handler errors are logged and never fatal.
                        if let Err(e) = engine.handle_event(channel.as_ref(), event).await {
                            error!(error = %e, "failed to handle inbound event");
                        }
                    }
                    Err(e) => {
                        error!(error = %e, "channel receive error");
                        if e.to_string().contains("closed") {
                            break;
                        }
                    }
                }
            }
            _ = cancel.cancelled() => {
                info!("shutdown signal received, stopping run loop");
                break;
            }
        }
    }

    channel.shutdown().await?;
    store.shutdown().await?;

    info!("dripbot serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("dripbot={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
