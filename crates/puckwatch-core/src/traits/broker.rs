// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Producer and consumer contracts for the delayed task broker.
//!
//! Two adapters implement the producer side (a pushed HTTP task queue and a
//! pulled Redis-backed queue); the tracker core depends only on these
//! traits and never observes which one is wired in. Delivery is
//! at-least-once: handlers must tolerate duplicate delivery of the same
//! payload.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::error::PuckwatchError;
use crate::types::{TaskId, TaskPayload};

/// Producer side: schedule a game-tracking task for delayed delivery.
#[async_trait]
pub trait TaskBroker: Send + Sync {
    /// Enqueue `payload` for delivery no earlier than `deliver_at`.
    async fn enqueue(
        &self,
        payload: &TaskPayload,
        deliver_at: DateTime<Utc>,
    ) -> Result<TaskId, PuckwatchError>;
}

/// How a handler invocation failed, from the broker's point of view.
#[derive(Debug, thiserror::Error)]
pub enum TaskFailure {
    /// Do not retry: the task can never succeed (undecodable payload).
    #[error("terminal task failure: {0}")]
    Terminal(#[source] PuckwatchError),

    /// Retry per the broker's backoff policy.
    #[error("retryable task failure: {0}")]
    Retryable(#[source] PuckwatchError),
}

/// Consumer side: the handler a broker invokes for each delivered task.
///
/// `cancel` fires on graceful shutdown; a handler observing it should
/// return promptly and let the broker redeliver.
#[async_trait]
pub trait TaskHandler: Send + Sync {
    async fn handle(&self, raw_payload: &[u8], cancel: CancellationToken)
        -> Result<(), TaskFailure>;
}
