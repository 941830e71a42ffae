// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Producer adapter for a pushed HTTP task queue (Cloud-Tasks-style REST).
//!
//! `enqueue` creates a task whose `httpRequest` the external queue POSTs to
//! the configured handler URL at the scheduled delivery time; the consumer
//! side of this mode is the gateway endpoint, so this adapter is
//! producer-only.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, SecondsFormat, Utc};
use puckwatch_config::model::CloudTasksConfig;
use puckwatch_core::{PuckwatchError, TaskBroker, TaskId, TaskPayload};
use tracing::debug;
use uuid::Uuid;

/// Deadline for one task-creation request.
const ENQUEUE_TIMEOUT: Duration = Duration::from_secs(30);

/// Task broker producing into a Cloud-Tasks-style pushed queue.
#[derive(Debug, Clone)]
pub struct CloudTasksBroker {
    client: reqwest::Client,
    queue_url: String,
    handler_url: String,
}

impl CloudTasksBroker {
    /// Creates a broker for the configured queue identity.
    pub fn new(config: &CloudTasksConfig) -> Result<Self, PuckwatchError> {
        let project = require(&config.project, "broker.cloudtasks.project")?;
        let location = require(&config.location, "broker.cloudtasks.location")?;
        let queue = require(&config.queue, "broker.cloudtasks.queue")?;
        let handler_url = require(&config.handler_url, "broker.cloudtasks.handler_url")?;

        let client = reqwest::Client::builder()
            .timeout(ENQUEUE_TIMEOUT)
            .build()
            .map_err(|e| PuckwatchError::Enqueue {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            queue_url: format!(
                "{}/v2/projects/{project}/locations/{location}/queues/{queue}/tasks",
                config.api_base_url
            ),
            handler_url,
        })
    }
}

fn require(value: &Option<String>, key: &str) -> Result<String, PuckwatchError> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| PuckwatchError::Config(format!("{key} is required for the pushed queue")))
}

#[async_trait]
impl TaskBroker for CloudTasksBroker {
    async fn enqueue(
        &self,
        payload: &TaskPayload,
        deliver_at: DateTime<Utc>,
    ) -> Result<TaskId, PuckwatchError> {
        let body = serde_json::json!({
            "task": {
                "scheduleTime": deliver_at.to_rfc3339_opts(SecondsFormat::Secs, true),
                "httpRequest": {
                    "httpMethod": "POST",
                    "url": self.handler_url,
                    "headers": { "Content-Type": "application/json" },
                    "body": BASE64.encode(payload.encode()?),
                }
            }
        });

        let response = self
            .client
            .post(&self.queue_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PuckwatchError::Enqueue {
                message: format!("task creation request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PuckwatchError::Enqueue {
                message: format!("queue returned {status}: {body}"),
                source: None,
            });
        }

        // The queue names the created task; fall back to a local id when
        // the response is not the expected shape.
        let task_id = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|v| v.get("name").and_then(|n| n.as_str()).map(str::to_string))
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        debug!(
            game_id = payload.game.id.as_str(),
            deliver_at = %deliver_at,
            task_id = task_id.as_str(),
            "task enqueued to pushed queue"
        );
        Ok(TaskId(task_id))
    }
}
