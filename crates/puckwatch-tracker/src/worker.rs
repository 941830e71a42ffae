// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-game task handler: the consumer entry point for both broker modes.
//!
//! Each invocation decodes one payload, runs a single processor iteration,
//! and — when the session continues — enqueues the identical payload as
//! its own successor. There is no in-memory per-game state: the chain of
//! payloads is the state machine.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use puckwatch_core::{
    GameStatsSource, Notifier, PlayByPlaySource, PuckwatchError, TaskBroker, TaskFailure,
    TaskHandler, TaskPayload,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::notify::NotificationService;
use crate::processor::GameProcessor;

/// Handler for `game:watch_updates` tasks.
pub struct GameWatchHandler {
    plays: Arc<dyn PlayByPlaySource>,
    stats: Arc<dyn GameStatsSource>,
    notifiers: Vec<Arc<dyn Notifier>>,
    broker: Arc<dyn TaskBroker>,
    message_interval: Duration,
}

impl GameWatchHandler {
    pub fn new(
        plays: Arc<dyn PlayByPlaySource>,
        stats: Arc<dyn GameStatsSource>,
        notifiers: Vec<Arc<dyn Notifier>>,
        broker: Arc<dyn TaskBroker>,
        message_interval_seconds: u64,
    ) -> Self {
        Self {
            plays,
            stats,
            notifiers,
            broker,
            message_interval: Duration::seconds(message_interval_seconds as i64),
        }
    }

    async fn schedule_next_check(&self, payload: &TaskPayload) -> Result<(), PuckwatchError> {
        let deliver_at = Utc::now() + self.message_interval;
        let task_id = self.broker.enqueue(payload, deliver_at).await?;
        info!(
            game_id = payload.game.id.as_str(),
            task_id = %task_id,
            deliver_at = %deliver_at,
            "successor scheduled"
        );
        Ok(())
    }
}

#[async_trait]
impl TaskHandler for GameWatchHandler {
    async fn handle(
        &self,
        raw_payload: &[u8],
        cancel: CancellationToken,
    ) -> Result<(), TaskFailure> {
        // Invalid payloads can never succeed: fail terminally, not retryably.
        let payload = TaskPayload::decode(raw_payload).map_err(TaskFailure::Terminal)?;

        if cancel.is_cancelled() {
            return Err(TaskFailure::Retryable(PuckwatchError::Internal(
                "shutdown in progress, leaving task to redelivery".into(),
            )));
        }

        info!(game_id = payload.game.id.as_str(), "processing game-tracking task");

        let notifications =
            NotificationService::new(self.notifiers.clone(), payload.should_notify());
        let processor = GameProcessor::new(self.plays.clone(), self.stats.clone(), notifications);
        let result = processor.process(&payload).await;

        if result.should_reschedule {
            self.schedule_next_check(&payload)
                .await
                .map_err(TaskFailure::Retryable)?;
        } else {
            info!(
                game_id = payload.game.id.as_str(),
                last_play_type = result.last_play_type.as_str(),
                "tracking session complete"
            );
        }

        Ok(())
    }
}
