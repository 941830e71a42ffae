// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `puckwatch enqueue` command implementation.
//!
//! One-shot admin utility injecting an ad-hoc game-tracking task, mainly
//! for test seeding. The payload carries placeholder teams; the tracker
//! only needs the game id.

use chrono::{Duration, SecondsFormat, Utc};
use puckwatch_config::PuckwatchConfig;
use puckwatch_core::{Game, PuckwatchError, TaskPayload};
use tracing::info;

use crate::wiring;

/// Flags of the `enqueue` subcommand.
pub struct EnqueueArgs {
    pub game: String,
    pub duration_hours: i64,
    pub delay_seconds: i64,
    pub notify: bool,
}

/// Build and enqueue one ad-hoc tracking task.
pub async fn run_enqueue(config: PuckwatchConfig, args: EnqueueArgs) -> Result<(), PuckwatchError> {
    let broker = wiring::build_broker(&config).await?;

    let deliver_at = Utc::now() + Duration::seconds(args.delay_seconds);
    let execution_end = deliver_at + Duration::hours(args.duration_hours);

    let payload = TaskPayload {
        game: Game {
            id: args.game,
            game_date: deliver_at.format("%Y-%m-%d").to_string(),
            start_time: deliver_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            ..Game::default()
        },
        execution_end: Some(execution_end.to_rfc3339_opts(SecondsFormat::Secs, true)),
        should_notify: Some(args.notify),
    };

    let task_id = broker.enqueue(&payload, deliver_at).await?;
    info!(
        game_id = payload.game.id.as_str(),
        task_id = %task_id,
        deliver_at = %deliver_at,
        execution_end = %execution_end,
        "ad-hoc game tracker enqueued"
    );

    Ok(())
}
