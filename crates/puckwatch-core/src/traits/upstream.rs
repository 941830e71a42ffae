// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Upstream data-source traits: play-by-play, cumulative stats, schedule.
//!
//! Clients stay dumb: no internal retries. The broker's delayed retry is
//! the only retry surface, which keeps failure handling uniform across
//! both broker modes.

use async_trait::async_trait;

use crate::error::PuckwatchError;
use crate::types::{Play, ScheduleGame, StatsSnapshot};

/// Source of a game's play stream. Only the final play is of interest.
#[async_trait]
pub trait PlayByPlaySource: Send + Sync {
    /// Fetch the latest play for `game_id`. Empty play lists, non-success
    /// statuses, and malformed bodies all surface as
    /// [`PuckwatchError::Upstream`].
    async fn fetch_last_play(&self, game_id: &str) -> Result<Play, PuckwatchError>;
}

/// Source of a game's cumulative statistics table.
#[async_trait]
pub trait GameStatsSource: Send + Sync {
    /// Fetch the stats table for `game_id` and return a view over its last
    /// row. Only the final row reflects game-to-date totals.
    async fn fetch_stats(&self, game_id: &str) -> Result<StatsSnapshot, PuckwatchError>;
}

/// Source of the daily schedule.
#[async_trait]
pub trait ScheduleSource: Send + Sync {
    /// Fetch the games scheduled for `date` (ISO `YYYY-MM-DD`).
    async fn fetch_schedule(&self, date: &str) -> Result<Vec<ScheduleGame>, PuckwatchError>;
}
