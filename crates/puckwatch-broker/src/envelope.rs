// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Task envelope and retry policy shared by the broker adapters.

use std::time::Duration;

use puckwatch_core::{PuckwatchError, TaskPayload};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The single task kind carried by the queue.
pub const TASK_KIND: &str = "game:watch_updates";

/// Maximum number of retries before a task is moved to the dead set.
pub const MAX_RETRIES: u32 = 3;

/// Base delay of the exponential retry backoff.
const RETRY_BASE_DELAY: Duration = Duration::from_secs(30);

/// One queued task as stored in the Redis delayed set.
///
/// The id makes the member unique even when two tasks carry identical
/// payloads (a sorted set would otherwise collapse them). The payload is
/// kept as the raw JSON text it was enqueued with, so a successor
/// re-enqueue preserves it byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEnvelope {
    pub id: String,
    pub kind: String,
    pub attempt: u32,
    pub payload: String,
}

impl TaskEnvelope {
    /// Wrap a payload in a fresh envelope.
    pub fn new(payload: &TaskPayload) -> Result<Self, PuckwatchError> {
        let raw = payload.encode()?;
        let payload = String::from_utf8(raw)
            .map_err(|e| PuckwatchError::Internal(format!("payload is not UTF-8: {e}")))?;
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            kind: TASK_KIND.to_string(),
            attempt: 0,
            payload,
        })
    }

    /// The envelope for this task's next retry attempt.
    pub fn next_attempt(&self) -> Self {
        Self {
            attempt: self.attempt + 1,
            ..self.clone()
        }
    }

    /// Whether the retry budget is exhausted.
    pub fn retries_exhausted(&self) -> bool {
        self.attempt > MAX_RETRIES
    }
}

/// Delay before retry number `attempt` (1-based): 30s, 60s, 120s, ...
pub fn retry_delay(attempt: u32) -> Duration {
    RETRY_BASE_DELAY * 2u32.saturating_pow(attempt.saturating_sub(1))
}
