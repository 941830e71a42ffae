// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Daily scheduler: seeds one tracking task per future game.

use std::sync::Arc;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use puckwatch_core::{Game, PuckwatchError, ScheduleSource, TaskBroker, TaskPayload};
use tracing::{info, warn};

/// Schedule state marking a game that has not started yet.
const STATE_FUTURE: &str = "FUT";

/// Fetches the day's schedule and enqueues one initial task per future
/// game, delivered at the game's scheduled start.
pub struct DailyScheduler {
    schedule: Arc<dyn ScheduleSource>,
    broker: Arc<dyn TaskBroker>,
    game_max_duration: Duration,
    should_notify: bool,
}

impl DailyScheduler {
    pub fn new(
        schedule: Arc<dyn ScheduleSource>,
        broker: Arc<dyn TaskBroker>,
        game_max_duration_hours: i64,
        should_notify: bool,
    ) -> Self {
        Self {
            schedule,
            broker,
            game_max_duration: Duration::hours(game_max_duration_hours),
            should_notify,
        }
    }

    /// Run the scheduler for `date` (ISO `YYYY-MM-DD`).
    ///
    /// A schedule-fetch failure aborts the run; a failure enqueuing one
    /// game is logged and the remaining games continue. Returns the number
    /// of tasks enqueued.
    pub async fn run(&self, date: &str) -> Result<usize, PuckwatchError> {
        info!(date, "fetching schedule");
        let games = self.schedule.fetch_schedule(date).await?;

        if games.is_empty() {
            info!(date, "no games scheduled");
            return Ok(0);
        }

        let total = games.len();
        let mut scheduled = 0;
        for game in games {
            if game.game_state != STATE_FUTURE {
                info!(
                    game_id = game.id,
                    state = game.game_state.as_str(),
                    "skipping game not in future state"
                );
                continue;
            }

            let start = match DateTime::parse_from_rfc3339(&game.start_time_utc) {
                Ok(start) => start.with_timezone(&Utc),
                Err(e) => {
                    warn!(game_id = game.id, error = %e, "unparseable start time, skipping game");
                    continue;
                }
            };

            let execution_end =
                (start + self.game_max_duration).to_rfc3339_opts(SecondsFormat::Secs, true);
            let payload = TaskPayload {
                game: Game {
                    id: game.id.to_string(),
                    game_date: game.game_date,
                    start_time: game.start_time_utc,
                    home_team: game.home_team,
                    away_team: game.away_team,
                },
                execution_end: Some(execution_end),
                should_notify: Some(self.should_notify),
            };

            match self.broker.enqueue(&payload, start).await {
                Ok(task_id) => {
                    info!(
                        game_id = payload.game.id.as_str(),
                        task_id = %task_id,
                        deliver_at = %start,
                        "game tracker scheduled"
                    );
                    scheduled += 1;
                }
                Err(e) => {
                    warn!(
                        game_id = payload.game.id.as_str(),
                        error = %e,
                        "failed to enqueue game tracker, continuing with remaining games"
                    );
                }
            }
        }

        info!(date, scheduled, total, "scheduler run complete");
        Ok(scheduled)
    }
}

/// The scheduler's target date: the override when set, today UTC otherwise.
pub fn resolve_target_date(date_override: Option<&str>) -> String {
    date_override
        .filter(|date| !date.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Utc::now().format("%Y-%m-%d").to_string())
}
