// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the puckwatch workspace.
//!
//! Wire shapes follow the NHL API for anything that crosses an HTTP
//! boundary (`camelCase` keys) and the task-payload encoding documented in
//! the broker contract (`game` / `execution_end` / `should_notify`).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PuckwatchError;

/// The play type that marks the end of a game and terminates tracking.
pub const PLAY_GAME_END: &str = "game-end";

/// Identifier assigned by a broker to an enqueued task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub String);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A team as described by the NHL API: numeric id, abbreviation, and a
/// language-tag → display-name map (`"default"` carries the plain name).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub abbrev: String,
    #[serde(default)]
    pub common_name: BTreeMap<String, String>,
}

impl Team {
    /// Display name for notifications: the `"default"` common name,
    /// falling back to the abbreviation.
    pub fn display_name(&self) -> &str {
        self.common_name
            .get("default")
            .map(String::as_str)
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.abbrev)
    }
}

/// A game as embedded in a task payload. The id is numeric upstream but
/// treated as an opaque string throughout the tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: String,
    #[serde(default)]
    pub game_date: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub home_team: Team,
    #[serde(default)]
    pub away_team: Team,
}

/// The payload of one game-tracking task.
///
/// Immutable once enqueued: a rescheduled successor re-emits the same
/// payload verbatim, only the broker-side delivery time changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPayload {
    pub game: Game,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub should_notify: Option<bool>,
}

impl TaskPayload {
    /// Serialize to the JSON wire encoding shared by both broker variants.
    pub fn encode(&self) -> Result<Vec<u8>, PuckwatchError> {
        serde_json::to_vec(self)
            .map_err(|e| PuckwatchError::Internal(format!("payload serialization failed: {e}")))
    }

    /// Deserialize from the JSON wire encoding.
    pub fn decode(raw: &[u8]) -> Result<Self, PuckwatchError> {
        serde_json::from_slice(raw)
            .map_err(|e| PuckwatchError::PayloadDecode(format!("invalid task payload: {e}")))
    }

    /// Whether notifications are enabled for this task. Absent means true.
    pub fn should_notify(&self) -> bool {
        self.should_notify.unwrap_or(true)
    }

    /// Parse the execution-window end, if present.
    ///
    /// An unparseable value is a configuration error; callers treat it as a
    /// closed window rather than looping on a task they cannot bound.
    pub fn execution_end_instant(&self) -> Result<Option<DateTime<Utc>>, PuckwatchError> {
        match &self.execution_end {
            None => Ok(None),
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .map(|end| Some(end.with_timezone(&Utc)))
                .map_err(|e| {
                    PuckwatchError::Config(format!("invalid execution_end {raw:?}: {e}"))
                }),
        }
    }
}

/// A single play from the play-by-play feed. Only the type key matters to
/// the tracker; everything else in the feed is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    #[serde(rename = "typeDescKey", default)]
    pub type_desc_key: String,
}

impl Play {
    pub fn is_game_end(&self) -> bool {
        self.type_desc_key == PLAY_GAME_END
    }
}

/// A game entry from the schedule feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleGame {
    pub id: u64,
    #[serde(default)]
    pub game_date: String,
    #[serde(rename = "startTimeUTC", default)]
    pub start_time_utc: String,
    #[serde(default)]
    pub game_state: String,
    #[serde(default)]
    pub home_team: Team,
    #[serde(default)]
    pub away_team: Team,
}

/// Column-addressable view over the last data row of a cumulative stats
/// table. Values stay unparsed strings; arithmetic is applied to a handful
/// of columns only, at the call site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    columns: Vec<String>,
    last_row: Vec<String>,
}

impl StatsSnapshot {
    /// Build a snapshot from a header row and the final data row.
    pub fn new(columns: Vec<String>, last_row: Vec<String>) -> Self {
        Self { columns, last_row }
    }

    /// Resolve a column name to its value in the last row.
    pub fn get(&self, column: &str) -> Result<&str, PuckwatchError> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|idx| self.last_row.get(idx))
            .map(String::as_str)
            .ok_or_else(|| PuckwatchError::ColumnMissing {
                column: column.to_string(),
            })
    }
}

/// Outcome of one game-processor iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    pub should_reschedule: bool,
    /// The terminal play's type key, `"window-closed"` for the fast path,
    /// or empty when the play feed was unavailable.
    pub last_play_type: String,
}

/// The data handed to a notifier: display names plus the projected stats
/// keys the notifier asked for. Keys absent upstream are simply missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationRequest {
    pub home_name: String,
    pub away_name: String,
    pub data: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_payload() -> TaskPayload {
        TaskPayload {
            game: Game {
                id: "2024020345".into(),
                game_date: "2024-11-30".into(),
                start_time: "2024-11-30T19:00:00Z".into(),
                home_team: Team {
                    id: 16,
                    abbrev: "CHI".into(),
                    common_name: BTreeMap::from([("default".into(), "Blackhawks".into())]),
                },
                away_team: Team {
                    id: 17,
                    abbrev: "DET".into(),
                    common_name: BTreeMap::from([("default".into(), "Red Wings".into())]),
                },
            },
            execution_end: Some("2024-12-01T00:00:00Z".into()),
            should_notify: Some(true),
        }
    }

    #[test]
    fn payload_round_trips_through_wire_encoding() {
        let payload = sample_payload();
        let encoded = payload.encode().unwrap();
        let decoded = TaskPayload::decode(&encoded).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn payload_encoding_is_deterministic() {
        let payload = sample_payload();
        assert_eq!(payload.encode().unwrap(), payload.encode().unwrap());
    }

    #[test]
    fn payload_wire_keys_match_contract() {
        let encoded = sample_payload().encode().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&encoded).unwrap();
        assert!(value.get("game").is_some());
        assert!(value.get("execution_end").is_some());
        assert!(value.get("should_notify").is_some());
        assert_eq!(value["game"]["homeTeam"]["abbrev"], "CHI");
        assert_eq!(value["game"]["homeTeam"]["commonName"]["default"], "Blackhawks");
    }

    #[test]
    fn absent_optionals_are_omitted_and_default() {
        let payload = TaskPayload {
            game: Game {
                id: "1".into(),
                ..Game::default()
            },
            execution_end: None,
            should_notify: None,
        };
        let encoded = payload.encode().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&encoded).unwrap();
        assert!(value.get("execution_end").is_none());
        assert!(value.get("should_notify").is_none());
        assert!(payload.should_notify(), "absent should_notify defaults to true");
        assert!(payload.execution_end_instant().unwrap().is_none());
    }

    #[test]
    fn unparseable_execution_end_is_a_config_error() {
        let payload = TaskPayload {
            execution_end: Some("not-a-timestamp".into()),
            ..sample_payload()
        };
        let err = payload.execution_end_instant().unwrap_err();
        assert!(matches!(err, PuckwatchError::Config(_)));
    }

    #[test]
    fn play_decodes_type_key_and_ignores_the_rest() {
        let play: Play = serde_json::from_str(
            r#"{"typeDescKey":"goal","eventId":123,"periodDescriptor":{"number":2}}"#,
        )
        .unwrap();
        assert_eq!(play.type_desc_key, "goal");
        assert!(!play.is_game_end());
    }

    #[test]
    fn team_display_name_falls_back_to_abbrev() {
        let team = Team {
            id: 1,
            abbrev: "CHI".into(),
            common_name: BTreeMap::new(),
        };
        assert_eq!(team.display_name(), "CHI");
    }

    #[test]
    fn snapshot_resolves_columns_from_last_row() {
        let snapshot = StatsSnapshot::new(
            vec!["homeTeamGoals".into(), "awayTeamGoals".into()],
            vec!["3".into(), "1".into()],
        );
        assert_eq!(snapshot.get("homeTeamGoals").unwrap(), "3");
        let err = snapshot.get("faceoffWins").unwrap_err();
        assert!(matches!(
            err,
            PuckwatchError::ColumnMissing { column } if column == "faceoffWins"
        ));
    }

    #[test]
    fn schedule_game_decodes_nhl_field_names() {
        let game: ScheduleGame = serde_json::from_str(
            r#"{"id":2024020345,"gameDate":"2024-11-30","startTimeUTC":"2024-11-30T19:00:00Z","gameState":"FUT","homeTeam":{"id":16,"abbrev":"CHI","commonName":{"default":"Blackhawks"}},"awayTeam":{"id":17,"abbrev":"DET","commonName":{"default":"Red Wings"}}}"#,
        )
        .unwrap();
        assert_eq!(game.start_time_utc, "2024-11-30T19:00:00Z");
        assert_eq!(game.game_state, "FUT");
        assert_eq!(game.home_team.display_name(), "Blackhawks");
    }
}
