// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `puckwatch schedule` command implementation.

use std::sync::Arc;

use puckwatch_config::PuckwatchConfig;
use puckwatch_core::{PuckwatchError, ScheduleSource};
use puckwatch_nhl::{FileScheduleSource, NhlClient};
use puckwatch_tracker::{resolve_target_date, DailyScheduler};
use tracing::info;

use crate::wiring;

/// Runs the daily scheduler for the given date (CLI flag, then config
/// override, then today UTC).
pub async fn run_schedule(
    config: PuckwatchConfig,
    date_override: Option<&str>,
) -> Result<(), PuckwatchError> {
    let date = resolve_target_date(date_override.or(config.scheduler.date.as_deref()));

    let schedule_source: Arc<dyn ScheduleSource> = match &config.scheduler.schedule_file {
        Some(path) => {
            info!(path = path.as_str(), "reading schedule from file");
            Arc::new(FileScheduleSource::new(path))
        }
        None => Arc::new(NhlClient::new(
            config.upstream.play_by_play_base_url.clone(),
            config.upstream.schedule_base_url.clone(),
        )?),
    };

    let broker = wiring::build_broker(&config).await?;
    let scheduler = DailyScheduler::new(
        schedule_source,
        broker,
        config.scheduler.game_max_duration_hours,
        config.scheduler.should_notify,
    );

    let scheduled = scheduler.run(&date).await?;
    info!(date = date.as_str(), scheduled, "schedule run finished");
    Ok(())
}
