// SPDX-FileCopyrightText: 2026 Dripbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dripbot - a Telegram order-tracking assistant.
//!
//! This is the binary entry point for the dripbot process.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod serve;
mod shutdown;

/// Dripbot - a Telegram order-tracking assistant.
#[derive(Parser, Debug)]
#[command(name = "dripbot", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the bot.
    Serve,
    /// Print the effective configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let config = match dripbot_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            dripbot_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("dripbot serve failed: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            println!("bot.name = {}", config.bot.name);
            println!("bot.log_level = {}", config.bot.log_level);
            println!(
                "telegram.bot_token = {}",
                if config.telegram.bot_token.is_some() {
                    "<set>"
                } else {
                    "<unset>"
                }
            );
            println!(
                "telegram.admin_id = {}",
                config
                    .telegram
                    .admin_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "<unset>".to_string())
            );
            println!("storage.database_path = {}", config.storage.database_path);
            println!("storage.wal_mode = {}", config.storage.wal_mode);
        }
        None => {
            println!("dripbot: use --help for available commands");
        }
    }
}
