// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response shapes for the NHL API endpoints puckwatch consumes.

use puckwatch_core::{Play, ScheduleGame};
use serde::Deserialize;

/// Response from `/v1/gamecenter/{id}/play-by-play`. Only the play list is
/// read; the final element is the game's latest play.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayByPlayResponse {
    #[serde(default)]
    pub plays: Vec<Play>,
}

/// Response from `/v1/schedule/{date}`: games grouped by day across the
/// surrounding week.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    #[serde(default)]
    pub game_week: Vec<GameWeekDay>,
}

/// A single day within the `gameWeek` array.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameWeekDay {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub games: Vec<ScheduleGame>,
}

impl ScheduleResponse {
    /// Return only the games matching the target date.
    pub fn games_for_date(self, date: &str) -> Vec<ScheduleGame> {
        self.game_week
            .into_iter()
            .find(|day| day.date == date)
            .map(|day| day.games)
            .unwrap_or_default()
    }
}
