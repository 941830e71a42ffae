// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared wiring helpers for the subcommands.

use std::sync::Arc;

use puckwatch_broker::{CloudTasksBroker, RedisBroker};
use puckwatch_config::{BrokerMode, PuckwatchConfig};
use puckwatch_core::{PuckwatchError, TaskBroker};
use tracing::info;

/// Build the producer-side broker for the configured mode.
pub async fn build_broker(config: &PuckwatchConfig) -> Result<Arc<dyn TaskBroker>, PuckwatchError> {
    match config.broker.mode {
        BrokerMode::Redis => {
            let broker = RedisBroker::connect(&config.broker.redis).await?;
            info!("using redis broker");
            Ok(Arc::new(broker))
        }
        BrokerMode::Cloudtasks => {
            let broker = CloudTasksBroker::new(&config.broker.cloudtasks)?;
            info!("using pushed cloud-tasks broker");
            Ok(Arc::new(broker))
        }
    }
}

/// Initializes the tracing subscriber with the given log level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("puckwatch={log_level},warn")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .try_init();
}
