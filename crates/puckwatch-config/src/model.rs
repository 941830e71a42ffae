// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the puckwatch tracker.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level puckwatch configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PuckwatchConfig {
    /// Per-game worker behavior.
    #[serde(default)]
    pub tracker: TrackerConfig,

    /// Daily scheduler behavior.
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Upstream API roots.
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Discord notifier settings.
    #[serde(default)]
    pub discord: DiscordConfig,

    /// Task broker selection and connection values.
    #[serde(default)]
    pub broker: BrokerConfig,

    /// Push-consumer HTTP endpoint settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Per-game worker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TrackerConfig {
    /// Delay between successor iterations, in seconds. Must be > 0.
    #[serde(default = "default_message_interval_seconds")]
    pub message_interval_seconds: u64,

    /// Maximum number of concurrently running task handlers.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Outer deadline for one handler invocation, in seconds.
    #[serde(default = "default_handler_timeout_seconds")]
    pub handler_timeout_seconds: u64,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            message_interval_seconds: default_message_interval_seconds(),
            concurrency: default_concurrency(),
            handler_timeout_seconds: default_handler_timeout_seconds(),
            log_level: default_log_level(),
        }
    }
}

fn default_message_interval_seconds() -> u64 {
    60
}

fn default_concurrency() -> usize {
    10
}

fn default_handler_timeout_seconds() -> u64 {
    300
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Daily scheduler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Added to a game's scheduled start to compute its execution window
    /// end, in hours.
    #[serde(default = "default_game_max_duration_hours")]
    pub game_max_duration_hours: i64,

    /// Target date override (ISO `YYYY-MM-DD`). `None` means today UTC.
    #[serde(default)]
    pub date: Option<String>,

    /// Path to a schedule snapshot file. When set, the scheduler reads
    /// from the file instead of the upstream API.
    #[serde(default)]
    pub schedule_file: Option<String>,

    /// Whether seeded tasks should notify.
    #[serde(default = "default_true")]
    pub should_notify: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            game_max_duration_hours: default_game_max_duration_hours(),
            date: None,
            schedule_file: None,
            should_notify: true,
        }
    }
}

fn default_game_max_duration_hours() -> i64 {
    5
}

fn default_true() -> bool {
    true
}

/// Upstream API roots.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamConfig {
    /// Play-by-play API root.
    #[serde(default = "default_nhl_base_url")]
    pub play_by_play_base_url: String,

    /// Cumulative-stats API root.
    #[serde(default = "default_stats_base_url")]
    pub stats_base_url: String,

    /// Schedule API root.
    #[serde(default = "default_nhl_base_url")]
    pub schedule_base_url: String,

    /// Season segment of the stats URL.
    #[serde(default = "default_season")]
    pub season: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            play_by_play_base_url: default_nhl_base_url(),
            stats_base_url: default_stats_base_url(),
            schedule_base_url: default_nhl_base_url(),
            season: default_season(),
        }
    }
}

fn default_nhl_base_url() -> String {
    "https://api-web.nhle.com".to_string()
}

fn default_stats_base_url() -> String {
    "https://moneypuck.com".to_string()
}

fn default_season() -> String {
    "20242025".to_string()
}

/// Discord notifier configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DiscordConfig {
    /// Discord bot token. `None` disables the Discord notifier.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Channel to post game updates into.
    #[serde(default)]
    pub channel_id: Option<String>,

    /// Discord REST API root.
    #[serde(default = "default_discord_base_url")]
    pub api_base_url: String,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            channel_id: None,
            api_base_url: default_discord_base_url(),
        }
    }
}

fn default_discord_base_url() -> String {
    "https://discord.com/api/v10".to_string()
}

/// Which broker adapter self-reschedules and consumes tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BrokerMode {
    /// Pulled Redis-backed delayed queue, consumed by the in-process worker.
    Redis,
    /// Pushed HTTP task queue, consumed by the gateway endpoint.
    Cloudtasks,
}

impl Default for BrokerMode {
    fn default() -> Self {
        Self::Redis
    }
}

/// Task broker selection and connection values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BrokerConfig {
    /// Active broker adapter.
    #[serde(default)]
    pub mode: BrokerMode,

    /// Pushed-queue identity values.
    #[serde(default)]
    pub cloudtasks: CloudTasksConfig,

    /// Pulled-queue connection values.
    #[serde(default)]
    pub redis: RedisConfig,
}

/// Pushed HTTP task queue identity (Cloud-Tasks-style REST API).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CloudTasksConfig {
    /// Queue API root (override for emulators and tests).
    #[serde(default = "default_cloudtasks_base_url")]
    pub api_base_url: String,

    /// Project the queue lives in.
    #[serde(default)]
    pub project: Option<String>,

    /// Location the queue lives in.
    #[serde(default)]
    pub location: Option<String>,

    /// Queue name.
    #[serde(default)]
    pub queue: Option<String>,

    /// URL the queue posts payloads to at delivery time.
    #[serde(default)]
    pub handler_url: Option<String>,
}

impl Default for CloudTasksConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_cloudtasks_base_url(),
            project: None,
            location: None,
            queue: None,
            handler_url: None,
        }
    }
}

fn default_cloudtasks_base_url() -> String {
    "https://cloudtasks.googleapis.com".to_string()
}

/// Pulled Redis-backed queue connection values.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RedisConfig {
    /// Redis connection URL.
    #[serde(default = "default_redis_url")]
    pub url: String,

    /// Optional AUTH password.
    #[serde(default)]
    pub password: Option<String>,

    /// Database index.
    #[serde(default)]
    pub db: i64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            password: None,
            db: 0,
        }
    }
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

/// Push-consumer HTTP endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_gateway_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
        }
    }
}

fn default_gateway_host() -> String {
    "0.0.0.0".to_string()
}

fn default_gateway_port() -> u16 {
    8080
}
