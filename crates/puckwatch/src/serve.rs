// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `puckwatch serve` command implementation.
//!
//! Wires the upstream clients, the configured notifiers, and the broker
//! for the selected mode, then runs until a termination signal. The
//! gateway endpoint always runs (pushed deliveries and health probes);
//! the Redis consumer runs only in `redis` broker mode.

use std::sync::Arc;
use std::time::Duration;

use puckwatch_broker::{RedisBroker, RedisWorker};
use puckwatch_config::{BrokerMode, PuckwatchConfig};
use puckwatch_core::{Notifier, PuckwatchError, TaskBroker, TaskHandler};
use puckwatch_discord::DiscordNotifier;
use puckwatch_gateway::{GatewayState, ServerConfig};
use puckwatch_moneypuck::MoneypuckClient;
use puckwatch_nhl::NhlClient;
use puckwatch_tracker::GameWatchHandler;
use tracing::info;

use crate::shutdown;
use crate::wiring;

/// Runs the `puckwatch serve` command.
pub async fn run_serve(config: PuckwatchConfig) -> Result<(), PuckwatchError> {
    info!("starting puckwatch serve");

    let nhl = Arc::new(NhlClient::new(
        config.upstream.play_by_play_base_url.clone(),
        config.upstream.schedule_base_url.clone(),
    )?);
    let stats = Arc::new(MoneypuckClient::new(
        config.upstream.stats_base_url.clone(),
        config.upstream.season.clone(),
    )?);

    let notifiers = build_notifiers(&config)?;
    let cancel = shutdown::install_signal_handler();

    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };

    match config.broker.mode {
        BrokerMode::Redis => {
            let broker = Arc::new(RedisBroker::connect(&config.broker.redis).await?);
            let handler: Arc<dyn TaskHandler> = Arc::new(GameWatchHandler::new(
                nhl,
                stats,
                notifiers,
                broker.clone() as Arc<dyn TaskBroker>,
                config.tracker.message_interval_seconds,
            ));

            let worker = RedisWorker::new(
                &broker,
                handler.clone(),
                config.tracker.concurrency,
                Duration::from_secs(config.tracker.handler_timeout_seconds),
            );

            info!(
                concurrency = config.tracker.concurrency,
                "redis broker mode: gateway + queue worker"
            );

            let gateway_state = GatewayState {
                handler,
                cancel: cancel.clone(),
            };
            let worker_cancel = cancel.clone();
            tokio::try_join!(
                puckwatch_gateway::start_server(&server_config, gateway_state),
                worker.run(worker_cancel),
            )?;
        }
        BrokerMode::Cloudtasks => {
            let broker = wiring::build_broker(&config).await?;
            let handler: Arc<dyn TaskHandler> = Arc::new(GameWatchHandler::new(
                nhl,
                stats,
                notifiers,
                broker,
                config.tracker.message_interval_seconds,
            ));

            info!("pushed broker mode: gateway only");

            let gateway_state = GatewayState {
                handler,
                cancel: cancel.clone(),
            };
            puckwatch_gateway::start_server(&server_config, gateway_state).await?;
        }
    }

    info!("puckwatch serve shutdown complete");
    Ok(())
}

/// Build the configured notifiers. Each is config-gated: an unset token
/// skips the notifier rather than failing startup.
fn build_notifiers(config: &PuckwatchConfig) -> Result<Vec<Arc<dyn Notifier>>, PuckwatchError> {
    let mut notifiers: Vec<Arc<dyn Notifier>> = Vec::new();

    match (&config.discord.bot_token, &config.discord.channel_id) {
        (Some(token), Some(channel_id)) => {
            let discord = DiscordNotifier::new(
                config.discord.api_base_url.clone(),
                token,
                channel_id.clone(),
            )?;
            notifiers.push(Arc::new(discord));
            info!("discord notifier added");
        }
        _ => {
            info!("discord notifier skipped (no bot_token configured)");
        }
    }

    Ok(notifiers)
}
