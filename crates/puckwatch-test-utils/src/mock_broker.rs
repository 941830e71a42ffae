// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock task broker capturing enqueued payloads for assertion.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use puckwatch_core::{PuckwatchError, TaskBroker, TaskId, TaskPayload};
use tokio::sync::Mutex;

/// A mock broker recording every `enqueue` call.
///
/// Set `fail` to make subsequent enqueues return
/// [`PuckwatchError::Enqueue`], exercising the retryable failure path.
pub struct MockBroker {
    enqueued: Arc<Mutex<Vec<(TaskPayload, DateTime<Utc>)>>>,
    fail: Arc<Mutex<bool>>,
}

impl MockBroker {
    /// Create a new mock broker with an empty record.
    pub fn new() -> Self {
        Self {
            enqueued: Arc::new(Mutex::new(Vec::new())),
            fail: Arc::new(Mutex::new(false)),
        }
    }

    /// All `(payload, deliver_at)` pairs enqueued so far.
    pub async fn enqueued(&self) -> Vec<(TaskPayload, DateTime<Utc>)> {
        self.enqueued.lock().await.clone()
    }

    /// Number of enqueue calls recorded.
    pub async fn enqueue_count(&self) -> usize {
        self.enqueued.lock().await.len()
    }

    /// Make subsequent enqueues fail (or succeed again).
    pub async fn set_failing(&self, fail: bool) {
        *self.fail.lock().await = fail;
    }
}

impl Default for MockBroker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskBroker for MockBroker {
    async fn enqueue(
        &self,
        payload: &TaskPayload,
        deliver_at: DateTime<Utc>,
    ) -> Result<TaskId, PuckwatchError> {
        if *self.fail.lock().await {
            return Err(PuckwatchError::Enqueue {
                message: "mock broker configured to fail".into(),
                source: None,
            });
        }
        let mut enqueued = self.enqueued.lock().await;
        enqueued.push((payload.clone(), deliver_at));
        Ok(TaskId(format!("mock-task-{}", enqueued.len())))
    }
}
