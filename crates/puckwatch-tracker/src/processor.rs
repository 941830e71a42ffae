// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-iteration game processor.
//!
//! One `process` call is one check: window fast-path, play fetch,
//! conditional stats enrichment, shootout adjustment, notification
//! dispatch, and the reschedule decision. The processor is stateless; the
//! per-game state machine lives entirely in the chain of task payloads.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use puckwatch_core::{
    Game, GameStatsSource, Play, PlayByPlaySource, ProcessResult, TaskPayload,
};
use tracing::{debug, info, warn};

use crate::notify::NotificationService;
use crate::reschedule::{execution_window_closed, should_reschedule, WINDOW_CLOSED};

/// Play types with scoring impact: only these trigger the stats fetch and
/// a notification.
const RECOMPUTE_PLAY_TYPES: &[&str] = &[
    "blocked-shot",
    "missed-shot",
    "shot-on-goal",
    "goal",
    "game-end",
];

/// Orchestrates one check iteration for one game.
pub struct GameProcessor {
    plays: Arc<dyn PlayByPlaySource>,
    stats: Arc<dyn GameStatsSource>,
    notifications: NotificationService,
}

impl GameProcessor {
    pub fn new(
        plays: Arc<dyn PlayByPlaySource>,
        stats: Arc<dyn GameStatsSource>,
        notifications: NotificationService,
    ) -> Self {
        Self {
            plays,
            stats,
            notifications,
        }
    }

    /// Run one check iteration and decide whether to reschedule.
    pub async fn process(&self, payload: &TaskPayload) -> ProcessResult {
        let game = &payload.game;

        // Fast path: a closed window means no upstream calls at all.
        if execution_window_closed(payload, Utc::now()) {
            info!(
                game_id = game.id.as_str(),
                "execution window closed, ending tracking session"
            );
            return ProcessResult {
                should_reschedule: false,
                last_play_type: WINDOW_CLOSED.to_string(),
            };
        }

        let last_play = match self.plays.fetch_last_play(&game.id).await {
            Ok(play) => Some(play),
            Err(e) => {
                warn!(
                    game_id = game.id.as_str(),
                    error = %e,
                    "play-by-play unavailable, no actionable signal this iteration"
                );
                None
            }
        };

        if let Some(play) = last_play
            .as_ref()
            .filter(|p| RECOMPUTE_PLAY_TYPES.contains(&p.type_desc_key.as_str()))
        {
            info!(
                game_id = game.id.as_str(),
                play_type = play.type_desc_key.as_str(),
                "scoring-relevant play, fetching stats"
            );
            let data = self.collect_stats(game, play).await;
            self.notifications.dispatch(game, &data);
        }

        let decision = should_reschedule(payload, last_play.as_ref(), Utc::now());
        let last_play_type = last_play.map(|p| p.type_desc_key).unwrap_or_default();
        debug!(
            game_id = game.id.as_str(),
            last_play_type = last_play_type.as_str(),
            should_reschedule = decision,
            "iteration complete"
        );

        ProcessResult {
            should_reschedule: decision,
            last_play_type,
        }
    }

    /// Fetch the stats snapshot and project the notifier key-union out of
    /// its last row. Upstream failure or missing columns degrade to a
    /// smaller (possibly empty) map, never to an error.
    async fn collect_stats(&self, game: &Game, play: &Play) -> BTreeMap<String, String> {
        let snapshot = match self.stats.fetch_stats(&game.id).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(
                    game_id = game.id.as_str(),
                    error = %e,
                    "stats unavailable, proceeding without enrichment"
                );
                return BTreeMap::new();
            }
        };

        let mut data = BTreeMap::new();
        for key in self.notifications.required_data_keys() {
            match snapshot.get(&key) {
                Ok(value) => {
                    data.insert(key, value.to_string());
                }
                Err(e) => debug!(game_id = game.id.as_str(), error = %e, "column absent, omitting"),
            }
        }

        if play.is_game_end() {
            adjust_for_shootout(&mut data);
        }

        data
    }
}

/// Credit the shootout winner with the deciding goal.
///
/// The stats source reports regulation-tied scores unchanged after a
/// shootout, so when a game ends with both goal counts present and equal,
/// the side with more shootout goals gains exactly one. Equal shootout
/// totals or any parse failure leave the map untouched.
fn adjust_for_shootout(data: &mut BTreeMap<String, String>) {
    let (Some(home_raw), Some(away_raw)) = (data.get("homeTeamGoals"), data.get("awayTeamGoals"))
    else {
        return;
    };
    if home_raw != away_raw {
        return;
    }

    let parsed = (|| -> Option<(i64, i64, i64, i64)> {
        let home_goals = home_raw.parse().ok()?;
        let away_goals = away_raw.parse().ok()?;
        let home_so = data.get("homeTeamShootOutGoals")?.parse().ok()?;
        let away_so = data.get("awayTeamShootOutGoals")?.parse().ok()?;
        Some((home_goals, away_goals, home_so, away_so))
    })();

    let Some((home_goals, away_goals, home_so, away_so)) = parsed else {
        warn!("shootout columns missing or unparseable, skipping score adjustment");
        return;
    };

    if home_so > away_so {
        data.insert("homeTeamGoals".to_string(), (home_goals + 1).to_string());
    } else if away_so > home_so {
        data.insert("awayTeamGoals".to_string(), (away_goals + 1).to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, SecondsFormat};
    use puckwatch_test_utils::{MockNotifier, MockPlaySource, MockStatsSource};

    fn payload(execution_end_offset: Duration) -> TaskPayload {
        let mut payload: TaskPayload = serde_json::from_str(
            r#"{"game":{"id":"A","homeTeam":{"abbrev":"CHI","commonName":{"default":"CHI"}},
                "awayTeam":{"abbrev":"DET","commonName":{"default":"DET"}}},
                "should_notify":true}"#,
        )
        .unwrap();
        payload.execution_end = Some(
            (Utc::now() + execution_end_offset).to_rfc3339_opts(SecondsFormat::Secs, true),
        );
        payload
    }

    struct Fixture {
        plays: Arc<MockPlaySource>,
        stats: Arc<MockStatsSource>,
        notifier: Arc<MockNotifier>,
        processor: GameProcessor,
    }

    fn fixture(plays: MockPlaySource, stats: MockStatsSource) -> Fixture {
        let plays = Arc::new(plays);
        let stats = Arc::new(stats);
        let notifier = Arc::new(MockNotifier::new());
        let processor = GameProcessor::new(
            plays.clone(),
            stats.clone(),
            NotificationService::new(vec![notifier.clone()], true),
        );
        Fixture {
            plays,
            stats,
            notifier,
            processor,
        }
    }

    #[tokio::test]
    async fn ordinary_play_skips_stats_and_notification() {
        let f = fixture(
            MockPlaySource::returning("hit"),
            MockStatsSource::returning(&[("homeTeamGoals", "2")]),
        );

        let result = f.processor.process(&payload(Duration::hours(1))).await;

        assert!(result.should_reschedule);
        assert_eq!(result.last_play_type, "hit");
        assert_eq!(f.stats.call_count(), 0, "no stats fetch for a non-scoring play");
        assert!(
            !f.notifier
                .wait_for_sends(1, std::time::Duration::from_millis(100))
                .await,
            "no notification for a non-scoring play"
        );
    }

    #[tokio::test]
    async fn goal_fetches_stats_and_notifies() {
        let f = fixture(
            MockPlaySource::returning("goal"),
            MockStatsSource::returning(&[
                ("homeTeamGoals", "2"),
                ("awayTeamGoals", "1"),
                ("homeTeamExpectedGoals", "2.450"),
                ("awayTeamExpectedGoals", "1.130"),
            ]),
        );

        let result = f.processor.process(&payload(Duration::hours(1))).await;

        assert!(result.should_reschedule);
        assert_eq!(result.last_play_type, "goal");
        assert_eq!(f.stats.call_count(), 1);
        assert!(
            f.notifier
                .wait_for_sends(1, std::time::Duration::from_secs(2))
                .await
        );
        let requests = f.notifier.requests().await;
        assert_eq!(requests[0].data.get("homeTeamGoals").map(String::as_str), Some("2"));
        assert_eq!(requests[0].data.get("awayTeamGoals").map(String::as_str), Some("1"));
    }

    #[tokio::test]
    async fn game_end_with_home_shootout_win_adjusts_score_and_stops() {
        let f = fixture(
            MockPlaySource::returning("game-end"),
            MockStatsSource::returning(&[
                ("homeTeamGoals", "3"),
                ("awayTeamGoals", "3"),
                ("homeTeamShootOutGoals", "2"),
                ("awayTeamShootOutGoals", "1"),
            ]),
        );

        let result = f.processor.process(&payload(Duration::hours(1))).await;

        assert!(!result.should_reschedule, "game-end ends the session");
        assert_eq!(result.last_play_type, "game-end");
        assert!(
            f.notifier
                .wait_for_sends(1, std::time::Duration::from_secs(2))
                .await
        );
        let requests = f.notifier.requests().await;
        assert_eq!(requests[0].data.get("homeTeamGoals").map(String::as_str), Some("4"));
        assert_eq!(requests[0].data.get("awayTeamGoals").map(String::as_str), Some("3"));
    }

    #[tokio::test]
    async fn closed_window_makes_no_upstream_calls() {
        let f = fixture(
            MockPlaySource::returning("goal"),
            MockStatsSource::returning(&[("homeTeamGoals", "2")]),
        );

        let result = f.processor.process(&payload(Duration::minutes(-1))).await;

        assert!(!result.should_reschedule);
        assert_eq!(result.last_play_type, WINDOW_CLOSED);
        assert_eq!(f.plays.call_count(), 0);
        assert_eq!(f.stats.call_count(), 0);
        assert!(
            !f.notifier
                .wait_for_sends(1, std::time::Duration::from_millis(100))
                .await
        );
    }

    #[tokio::test]
    async fn stats_failure_on_goal_degrades_to_no_notification() {
        let f = fixture(
            MockPlaySource::returning("goal"),
            MockStatsSource::unavailable(),
        );

        let result = f.processor.process(&payload(Duration::hours(1))).await;

        assert!(result.should_reschedule, "degraded iteration still reschedules");
        assert_eq!(f.stats.call_count(), 1);
        // The empty data map suppresses the message entirely.
        assert!(
            !f.notifier
                .wait_for_sends(1, std::time::Duration::from_millis(100))
                .await
        );
    }

    #[tokio::test]
    async fn play_feed_failure_reschedules_with_empty_play_type() {
        let f = fixture(
            MockPlaySource::unavailable(),
            MockStatsSource::returning(&[("homeTeamGoals", "2")]),
        );

        let result = f.processor.process(&payload(Duration::hours(1))).await;

        assert!(result.should_reschedule);
        assert_eq!(result.last_play_type, "");
        assert_eq!(f.stats.call_count(), 0);
    }

    #[tokio::test]
    async fn repeated_processing_is_deterministic() {
        let f = fixture(
            MockPlaySource::returning("goal"),
            MockStatsSource::returning(&[("homeTeamGoals", "2"), ("awayTeamGoals", "1")]),
        );
        let payload = payload(Duration::hours(1));

        let first = f.processor.process(&payload).await;
        let second = f.processor.process(&payload).await;
        assert_eq!(first, second);
        assert!(
            f.notifier
                .wait_for_sends(2, std::time::Duration::from_secs(2))
                .await,
            "each run issues its own notification"
        );
    }

    #[test]
    fn shootout_tie_leaves_scores_alone() {
        let mut data: BTreeMap<String, String> = [
            ("homeTeamGoals", "2"),
            ("awayTeamGoals", "2"),
            ("homeTeamShootOutGoals", "1"),
            ("awayTeamShootOutGoals", "1"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        adjust_for_shootout(&mut data);
        assert_eq!(data["homeTeamGoals"], "2");
        assert_eq!(data["awayTeamGoals"], "2");
    }

    #[test]
    fn away_shootout_win_credits_away() {
        let mut data: BTreeMap<String, String> = [
            ("homeTeamGoals", "2"),
            ("awayTeamGoals", "2"),
            ("homeTeamShootOutGoals", "0"),
            ("awayTeamShootOutGoals", "2"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        adjust_for_shootout(&mut data);
        assert_eq!(data["homeTeamGoals"], "2");
        assert_eq!(data["awayTeamGoals"], "3");
    }

    #[test]
    fn untied_scores_are_never_adjusted() {
        let mut data: BTreeMap<String, String> = [
            ("homeTeamGoals", "3"),
            ("awayTeamGoals", "2"),
            ("homeTeamShootOutGoals", "2"),
            ("awayTeamShootOutGoals", "1"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        adjust_for_shootout(&mut data);
        assert_eq!(data["homeTeamGoals"], "3");
        assert_eq!(data["awayTeamGoals"], "2");
    }

    #[test]
    fn unparseable_shootout_column_aborts_adjustment() {
        let mut data: BTreeMap<String, String> = [
            ("homeTeamGoals", "2"),
            ("awayTeamGoals", "2"),
            ("homeTeamShootOutGoals", "n/a"),
            ("awayTeamShootOutGoals", "1"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        adjust_for_shootout(&mut data);
        assert_eq!(data["homeTeamGoals"], "2");
        assert_eq!(data["awayTeamGoals"], "2");
    }

    #[test]
    fn missing_goal_columns_abort_adjustment() {
        let mut data: BTreeMap<String, String> = [("homeTeamExpectedGoals", "1.2")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        adjust_for_shootout(&mut data);
        assert!(!data.contains_key("homeTeamGoals"));
    }
}
