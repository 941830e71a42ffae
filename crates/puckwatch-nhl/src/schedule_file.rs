// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! File-backed schedule source for integration seeding.
//!
//! Reads a schedule snapshot in the upstream JSON shape, treats every game
//! as future, and rewrites start times to `now + 60s + 10s × index` so a
//! seeded run produces deterministic, near-term deliveries.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{Duration, SecondsFormat, Utc};
use puckwatch_core::{PuckwatchError, ScheduleGame, ScheduleSource};
use tracing::info;

use crate::types::ScheduleResponse;

/// Offset of the first rewritten start time from now, in seconds.
const FIRST_GAME_OFFSET_SECS: i64 = 60;
/// Spacing between consecutive rewritten start times, in seconds.
const GAME_SPACING_SECS: i64 = 10;

/// Schedule source reading from a local JSON snapshot.
#[derive(Debug, Clone)]
pub struct FileScheduleSource {
    path: PathBuf,
}

impl FileScheduleSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ScheduleSource for FileScheduleSource {
    async fn fetch_schedule(&self, _date: &str) -> Result<Vec<ScheduleGame>, PuckwatchError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| PuckwatchError::Upstream {
                message: format!("failed to read schedule file {}: {e}", self.path.display()),
                source: Some(Box::new(e)),
            })?;

        let response: ScheduleResponse =
            serde_json::from_str(&raw).map_err(|e| PuckwatchError::Upstream {
                message: format!("failed to parse schedule file {}: {e}", self.path.display()),
                source: Some(Box::new(e)),
            })?;

        let now = Utc::now();
        let games: Vec<ScheduleGame> = response
            .game_week
            .into_iter()
            .flat_map(|day| day.games)
            .enumerate()
            .map(|(index, mut game)| {
                let start = now
                    + Duration::seconds(FIRST_GAME_OFFSET_SECS + GAME_SPACING_SECS * index as i64);
                game.game_state = "FUT".to_string();
                game.start_time_utc = start.to_rfc3339_opts(SecondsFormat::Secs, true);
                game
            })
            .collect();

        info!(
            path = %self.path.display(),
            count = games.len(),
            "loaded schedule from file with rewritten start times"
        );
        Ok(games)
    }
}
