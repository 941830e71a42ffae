// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock upstream data sources with scripted responses and call counting.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use puckwatch_core::{
    GameStatsSource, Play, PlayByPlaySource, PuckwatchError, ScheduleGame, ScheduleSource,
    StatsSnapshot,
};
use tokio::sync::Mutex;

fn unavailable(what: &str) -> PuckwatchError {
    PuckwatchError::Upstream {
        message: format!("mock {what} configured as unavailable"),
        source: None,
    }
}

/// Play-by-play source returning a fixed play, or failing when unset.
pub struct MockPlaySource {
    play: Arc<Mutex<Option<Play>>>,
    calls: AtomicUsize,
}

impl MockPlaySource {
    /// Source that always returns a play with the given type key.
    pub fn returning(type_desc_key: &str) -> Self {
        Self {
            play: Arc::new(Mutex::new(Some(Play {
                type_desc_key: type_desc_key.to_string(),
            }))),
            calls: AtomicUsize::new(0),
        }
    }

    /// Source that always fails with an upstream error.
    pub fn unavailable() -> Self {
        Self {
            play: Arc::new(Mutex::new(None)),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of fetch calls observed.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlayByPlaySource for MockPlaySource {
    async fn fetch_last_play(&self, _game_id: &str) -> Result<Play, PuckwatchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.play
            .lock()
            .await
            .clone()
            .ok_or_else(|| unavailable("play-by-play"))
    }
}

/// Stats source returning a fixed snapshot, or failing when unset.
pub struct MockStatsSource {
    snapshot: Arc<Mutex<Option<StatsSnapshot>>>,
    calls: AtomicUsize,
}

impl MockStatsSource {
    /// Source returning a snapshot built from `(column, value)` pairs.
    pub fn returning(row: &[(&str, &str)]) -> Self {
        let columns = row.iter().map(|(c, _)| c.to_string()).collect();
        let values = row.iter().map(|(_, v)| v.to_string()).collect();
        Self {
            snapshot: Arc::new(Mutex::new(Some(StatsSnapshot::new(columns, values)))),
            calls: AtomicUsize::new(0),
        }
    }

    /// Source that always fails with an upstream error.
    pub fn unavailable() -> Self {
        Self {
            snapshot: Arc::new(Mutex::new(None)),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of fetch calls observed.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GameStatsSource for MockStatsSource {
    async fn fetch_stats(&self, _game_id: &str) -> Result<StatsSnapshot, PuckwatchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.snapshot
            .lock()
            .await
            .clone()
            .ok_or_else(|| unavailable("stats"))
    }
}

/// Schedule source returning a fixed game list, or failing when unset.
pub struct MockScheduleSource {
    games: Arc<Mutex<Option<Vec<ScheduleGame>>>>,
}

impl MockScheduleSource {
    /// Source that returns the given games for any date.
    pub fn returning(games: Vec<ScheduleGame>) -> Self {
        Self {
            games: Arc::new(Mutex::new(Some(games))),
        }
    }

    /// Source that always fails with an upstream error.
    pub fn unavailable() -> Self {
        Self {
            games: Arc::new(Mutex::new(None)),
        }
    }
}

#[async_trait]
impl ScheduleSource for MockScheduleSource {
    async fn fetch_schedule(&self, _date: &str) -> Result<Vec<ScheduleGame>, PuckwatchError> {
        self.games
            .lock()
            .await
            .clone()
            .ok_or_else(|| unavailable("schedule"))
    }
}
