// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./puckwatch.toml` > `~/.config/puckwatch/puckwatch.toml`
//! > `/etc/puckwatch/puckwatch.toml` with environment variable overrides via
//! the `PUCKWATCH_` prefix, plus the flat legacy variable names the original
//! deployment recognises (`MESSAGE_INTERVAL_SECONDS`, `SCHEDULE_DATE`, ...).

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::PuckwatchConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/puckwatch/puckwatch.toml` (system-wide)
/// 3. `~/.config/puckwatch/puckwatch.toml` (user XDG config)
/// 4. `./puckwatch.toml` (local directory)
/// 5. `PUCKWATCH_*` environment variables
/// 6. Flat legacy environment variables
pub fn load_config() -> Result<PuckwatchConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<PuckwatchConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PuckwatchConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PuckwatchConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PuckwatchConfig::default()))
        .merge(Toml::file(path))
        .merge(prefixed_env_provider())
        .merge(legacy_env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for tests).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PuckwatchConfig::default()))
        .merge(Toml::file("/etc/puckwatch/puckwatch.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("puckwatch/puckwatch.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("puckwatch.toml"))
        .merge(prefixed_env_provider())
        .merge(legacy_env_provider())
}

/// Create the `PUCKWATCH_*` provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `PUCKWATCH_TRACKER_MESSAGE_INTERVAL_SECONDS`
/// must map to `tracker.message_interval_seconds`, not
/// `tracker.message.interval.seconds`.
fn prefixed_env_provider() -> Env {
    Env::prefixed("PUCKWATCH_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("tracker_", "tracker.", 1)
            .replacen("scheduler_", "scheduler.", 1)
            .replacen("upstream_", "upstream.", 1)
            .replacen("discord_", "discord.", 1)
            .replacen("gateway_", "gateway.", 1)
            .replacen("broker_cloudtasks_", "broker.cloudtasks.", 1)
            .replacen("broker_redis_", "broker.redis.", 1)
            .replacen("broker_", "broker.", 1);
        mapped.into()
    })
}

/// Flat environment variables recognised for compatibility with the
/// original deployment, mapped onto their config paths.
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("message_interval_seconds", "tracker.message_interval_seconds"),
    ("game_max_duration_hours", "scheduler.game_max_duration_hours"),
    ("schedule_date", "scheduler.date"),
    ("schedule_file", "scheduler.schedule_file"),
    ("scheduler_should_notify", "scheduler.should_notify"),
    ("playbyplay_api_base_url", "upstream.play_by_play_base_url"),
    ("stats_api_base_url", "upstream.stats_base_url"),
    ("schedule_api_base_url", "upstream.schedule_base_url"),
    ("discord_bot_token", "discord.bot_token"),
    ("discord_channel_id", "discord.channel_id"),
    ("broker_mode", "broker.mode"),
    ("redis_url", "broker.redis.url"),
    ("redis_password", "broker.redis.password"),
    ("redis_db", "broker.redis.db"),
    ("gcp_project_id", "broker.cloudtasks.project"),
    ("gcp_location", "broker.cloudtasks.location"),
    ("cloud_tasks_queue", "broker.cloudtasks.queue"),
    ("cloud_tasks_api_base_url", "broker.cloudtasks.api_base_url"),
    ("handler_url", "broker.cloudtasks.handler_url"),
];

/// Create the provider for the flat legacy names.
fn legacy_env_provider() -> Env {
    let names: Vec<&str> = LEGACY_ENV_KEYS.iter().map(|(name, _)| *name).collect();
    Env::raw().only(&names).map(|key| {
        let key_str = key.as_str().to_ascii_lowercase();
        LEGACY_ENV_KEYS
            .iter()
            .find(|(name, _)| *name == key_str)
            .map(|(_, path)| (*path).into())
            .unwrap_or_else(|| key_str.into())
    })
}
