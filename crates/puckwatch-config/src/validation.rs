// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as a positive message interval and complete broker
//! connection values for the selected mode.

use thiserror::Error;

use crate::model::{BrokerMode, PuckwatchConfig};

/// A semantic configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {message}")]
    Validation { message: String },
}

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &PuckwatchConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.tracker.message_interval_seconds == 0 {
        errors.push(ConfigError::Validation {
            message: "tracker.message_interval_seconds must be greater than 0".to_string(),
        });
    }

    if config.tracker.concurrency == 0 {
        errors.push(ConfigError::Validation {
            message: "tracker.concurrency must be greater than 0".to_string(),
        });
    }

    if config.scheduler.game_max_duration_hours <= 0 {
        errors.push(ConfigError::Validation {
            message: format!(
                "scheduler.game_max_duration_hours must be positive, got {}",
                config.scheduler.game_max_duration_hours
            ),
        });
    }

    if config.broker.mode == BrokerMode::Cloudtasks {
        let ct = &config.broker.cloudtasks;
        for (value, key) in [
            (&ct.project, "broker.cloudtasks.project"),
            (&ct.location, "broker.cloudtasks.location"),
            (&ct.queue, "broker.cloudtasks.queue"),
            (&ct.handler_url, "broker.cloudtasks.handler_url"),
        ] {
            if value.as_deref().is_none_or(|v| v.trim().is_empty()) {
                errors.push(ConfigError::Validation {
                    message: format!("{key} is required when broker.mode is \"cloudtasks\""),
                });
            }
        }
    }

    if config.broker.mode == BrokerMode::Redis && config.broker.redis.url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "broker.redis.url must not be empty".to_string(),
        });
    }

    if config.discord.bot_token.is_some() && config.discord.channel_id.is_none() {
        errors.push(ConfigError::Validation {
            message: "discord.channel_id is required when discord.bot_token is set".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
