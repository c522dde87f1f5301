// SPDX-FileCopyrightText: 2026 Dripbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the dripbot order-tracking bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level dripbot configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values;
/// `telegram.bot_token` is the only value `serve` cannot run without.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DripbotConfig {
    /// Bot identity and logging settings.
    #[serde(default)]
    pub bot: BotConfig,

    /// Telegram integration settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Bot identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Display name of the bot.
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_bot_name() -> String {
    "dripbot".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram integration configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. `None` means `serve` refuses to start.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Telegram user id of the single administrator. `None` disables
    /// every admin operation.
    #[serde(default)]
    pub admin_id: Option<i64>,
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("dripbot").join("orders.db"))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_else(|| "orders.db".to_string())
}

fn default_wal_mode() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = DripbotConfig::default();
        assert_eq!(config.bot.name, "dripbot");
        assert_eq!(config.bot.log_level, "info");
        assert!(config.telegram.bot_token.is_none());
        assert!(config.telegram.admin_id.is_none());
        assert!(config.storage.wal_mode);
        assert!(config.storage.database_path.ends_with("orders.db"));
    }

    #[test]
    fn unknown_section_is_rejected() {
        let toml_str = r#"
[bot]
name = "test"

[metrics]
enabled = true
"#;
        assert!(toml::from_str::<DripbotConfig>(toml_str).is_err());
    }

    #[test]
    fn unknown_key_is_rejected() {
        let toml_str = r#"
[telegram]
bot_tken = "123:abc"
"#;
        assert!(toml::from_str::<DripbotConfig>(toml_str).is_err());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[telegram]
bot_token = "123:abc"
admin_id = 42
"#;
        let config: DripbotConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.telegram.bot_token.as_deref(), Some("123:abc"));
        assert_eq!(config.telegram.admin_id, Some(42));
        assert_eq!(config.bot.name, "dripbot");
    }
}
