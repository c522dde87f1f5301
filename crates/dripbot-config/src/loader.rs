// SPDX-FileCopyrightText: 2026 Dripbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./dripbot.toml` > `~/.config/dripbot/dripbot.toml` > `/etc/dripbot/dripbot.toml`
//! with environment variable overrides via `DRIPBOT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::DripbotConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/dripbot/dripbot.toml` (system-wide)
/// 3. `~/.config/dripbot/dripbot.toml` (user XDG config)
/// 4. `./dripbot.toml` (local directory)
/// 5. `DRIPBOT_*` environment variables
pub fn load_config() -> Result<DripbotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DripbotConfig::default()))
        .merge(Toml::file("/etc/dripbot/dripbot.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("dripbot/dripbot.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("dripbot.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a specific TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<DripbotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DripbotConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<DripbotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DripbotConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// CRITICAL: Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `DRIPBOT_TELEGRAM_BOT_TOKEN`
/// must map to `telegram.bot_token`, not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("DRIPBOT_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: DRIPBOT_TELEGRAM_BOT_TOKEN -> "telegram_bot_token"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("bot_", "bot.", 1)
            .replacen("telegram_", "telegram.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_string_overrides_defaults() {
        let config = load_config_from_str(
            r#"
[telegram]
bot_token = "123:abc"
admin_id = 7

[storage]
database_path = "/tmp/test.db"
"#,
        )
        .unwrap();
        assert_eq!(config.telegram.bot_token.as_deref(), Some("123:abc"));
        assert_eq!(config.telegram.admin_id, Some(7));
        assert_eq!(config.storage.database_path, "/tmp/test.db");
        // Untouched sections keep compiled defaults.
        assert_eq!(config.bot.name, "dripbot");
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.bot.log_level, "info");
        assert!(config.telegram.bot_token.is_none());
    }
}
