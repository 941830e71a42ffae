// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pulled Redis-backed broker: delayed producer and polling consumer.
//!
//! Scheduled tasks live in a sorted set keyed by delivery time
//! (epoch-millis score, envelope-JSON member). The worker polls for due
//! members, claims each one via `ZREM` (only the remover may process a
//! member), parks it in a processing set while the handler runs, and
//! either completes, retries with exponential backoff, or moves it to the
//! dead set. Entries stuck in the processing set past the handler deadline
//! are recovered on worker start, preserving at-least-once delivery across
//! crashes.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use puckwatch_config::model::RedisConfig;
use puckwatch_core::{PuckwatchError, TaskBroker, TaskFailure, TaskHandler, TaskId, TaskPayload};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::envelope::{retry_delay, TaskEnvelope};

/// Sorted set of tasks awaiting delivery (score = due epoch-millis).
const SCHEDULED_KEY: &str = "puckwatch:tasks:scheduled";
/// Sorted set of claimed tasks (score = claim epoch-millis).
const PROCESSING_KEY: &str = "puckwatch:tasks:processing";
/// Sorted set of exhausted or poison tasks (score = burial epoch-millis).
const DEAD_KEY: &str = "puckwatch:tasks:dead";

/// Deadline for one producer-side queue operation.
const ENQUEUE_TIMEOUT: Duration = Duration::from_secs(30);
/// How often the worker polls for due tasks.
const POLL_INTERVAL: Duration = Duration::from_secs(1);
/// Maximum members claimed per poll.
const CLAIM_BATCH: isize = 32;
/// How long the worker waits for in-flight handlers on shutdown.
const SHUTDOWN_DRAIN: Duration = Duration::from_secs(10);

/// Producer half of the Redis broker.
#[derive(Clone)]
pub struct RedisBroker {
    conn: ConnectionManager,
}

impl RedisBroker {
    /// Connect to Redis using the configured URL, password, and database.
    pub async fn connect(config: &RedisConfig) -> Result<Self, PuckwatchError> {
        let url = build_connection_url(config);
        let client = redis::Client::open(url.as_str()).map_err(|e| {
            PuckwatchError::Config(format!("invalid redis url {url:?}: {e}"))
        })?;

        let conn = client
            .get_connection_manager()
            .await
            .map_err(|e| PuckwatchError::Enqueue {
                message: format!("failed to connect to redis: {e}"),
                source: Some(Box::new(e)),
            })?;

        info!("connected to redis broker");
        Ok(Self { conn })
    }

    async fn schedule(
        &self,
        envelope: &TaskEnvelope,
        deliver_at: DateTime<Utc>,
    ) -> Result<(), PuckwatchError> {
        let member = serde_json::to_string(envelope)
            .map_err(|e| PuckwatchError::Internal(format!("envelope serialization failed: {e}")))?;
        let mut conn = self.conn.clone();

        let write = async {
            let _: i64 = conn
                .zadd(SCHEDULED_KEY, &member, deliver_at.timestamp_millis())
                .await
                .map_err(|e| PuckwatchError::Enqueue {
                    message: format!("ZADD to delayed set failed: {e}"),
                    source: Some(Box::new(e)),
                })?;
            Ok::<(), PuckwatchError>(())
        };

        tokio::time::timeout(ENQUEUE_TIMEOUT, write)
            .await
            .map_err(|_| PuckwatchError::Enqueue {
                message: "enqueue timed out".to_string(),
                source: None,
            })?
    }
}

#[async_trait]
impl TaskBroker for RedisBroker {
    async fn enqueue(
        &self,
        payload: &TaskPayload,
        deliver_at: DateTime<Utc>,
    ) -> Result<TaskId, PuckwatchError> {
        let envelope = TaskEnvelope::new(payload)?;
        self.schedule(&envelope, deliver_at).await?;
        debug!(
            game_id = payload.game.id.as_str(),
            deliver_at = %deliver_at,
            task_id = envelope.id.as_str(),
            "task enqueued to delayed set"
        );
        Ok(TaskId(envelope.id))
    }
}

/// Consumer half of the Redis broker: polls the delayed set and runs the
/// registered handler on due tasks.
pub struct RedisWorker {
    conn: ConnectionManager,
    handler: Arc<dyn TaskHandler>,
    concurrency: usize,
    handler_timeout: Duration,
}

impl RedisWorker {
    pub fn new(
        broker: &RedisBroker,
        handler: Arc<dyn TaskHandler>,
        concurrency: usize,
        handler_timeout: Duration,
    ) -> Self {
        Self {
            conn: broker.conn.clone(),
            handler,
            concurrency,
            handler_timeout,
        }
    }

    /// Run the worker until `cancel` fires, then drain in-flight handlers
    /// for up to ten seconds.
    pub async fn run(self, cancel: CancellationToken) -> Result<(), PuckwatchError> {
        if let Err(e) = self.recover_stale().await {
            warn!(error = %e, "stale-task recovery failed, continuing");
        }

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut inflight: JoinSet<()> = JoinSet::new();
        let mut poll = tokio::time::interval(POLL_INTERVAL);
        poll.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        info!(concurrency = self.concurrency, "redis worker started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = poll.tick() => {
                    if let Err(e) = self.dispatch_due(&semaphore, &mut inflight, &cancel).await {
                        warn!(error = %e, "polling the delayed set failed");
                    }
                    // Reap finished handlers so the set stays bounded.
                    while inflight.try_join_next().is_some() {}
                }
            }
        }

        info!(inflight = inflight.len(), "worker stopping, draining in-flight handlers");
        let drained = tokio::time::timeout(SHUTDOWN_DRAIN, async {
            while inflight.join_next().await.is_some() {}
        })
        .await;
        if drained.is_err() {
            warn!("drain deadline reached, aborting remaining handlers");
            inflight.shutdown().await;
        }

        Ok(())
    }

    async fn dispatch_due(
        &self,
        semaphore: &Arc<Semaphore>,
        inflight: &mut JoinSet<()>,
        cancel: &CancellationToken,
    ) -> Result<(), PuckwatchError> {
        let mut conn = self.conn.clone();
        let now = Utc::now().timestamp_millis();

        let due: Vec<String> = conn
            .zrangebyscore_limit(SCHEDULED_KEY, "-inf", now, 0, CLAIM_BATCH)
            .await
            .map_err(|e| PuckwatchError::Internal(format!("ZRANGEBYSCORE failed: {e}")))?;

        for member in due {
            // Take a concurrency slot before claiming, so a shutdown mid-wait
            // never strands a claimed member outside the scheduled set.
            let permit = tokio::select! {
                _ = cancel.cancelled() => break,
                permit = semaphore.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            // Claim: only the remover may process the member.
            let removed: i64 = conn
                .zrem(SCHEDULED_KEY, &member)
                .await
                .map_err(|e| PuckwatchError::Internal(format!("ZREM claim failed: {e}")))?;
            if removed == 0 {
                continue;
            }
            let _: i64 = conn
                .zadd(PROCESSING_KEY, &member, Utc::now().timestamp_millis())
                .await
                .map_err(|e| PuckwatchError::Internal(format!("ZADD processing failed: {e}")))?;

            let envelope: TaskEnvelope = match serde_json::from_str(&member) {
                Ok(envelope) => envelope,
                Err(e) => {
                    warn!(error = %e, "undecodable envelope moved to dead set");
                    Self::bury(&mut conn, &member).await;
                    continue;
                }
            };
            let conn = self.conn.clone();
            let handler = self.handler.clone();
            let handler_timeout = self.handler_timeout;
            let task_cancel = cancel.child_token();
            inflight.spawn(async move {
                let _permit = permit;
                Self::run_one(conn, handler, envelope, member, handler_timeout, task_cancel).await;
            });
        }

        Ok(())
    }

    async fn run_one(
        mut conn: ConnectionManager,
        handler: Arc<dyn TaskHandler>,
        envelope: TaskEnvelope,
        member: String,
        handler_timeout: Duration,
        cancel: CancellationToken,
    ) {
        let outcome = tokio::time::timeout(
            handler_timeout,
            handler.handle(envelope.payload.as_bytes(), cancel),
        )
        .await;

        match outcome {
            Ok(Ok(())) => {
                Self::complete(&mut conn, &member).await;
                debug!(task_id = envelope.id.as_str(), "task completed");
            }
            Ok(Err(TaskFailure::Terminal(e))) => {
                warn!(task_id = envelope.id.as_str(), error = %e, "terminal task failure, burying");
                Self::bury(&mut conn, &member).await;
            }
            Ok(Err(TaskFailure::Retryable(e))) => {
                warn!(task_id = envelope.id.as_str(), error = %e, "retryable task failure");
                Self::retry(&mut conn, &envelope, &member).await;
            }
            Err(_) => {
                warn!(
                    task_id = envelope.id.as_str(),
                    timeout_secs = handler_timeout.as_secs(),
                    "handler deadline exceeded"
                );
                Self::retry(&mut conn, &envelope, &member).await;
            }
        }
    }

    async fn complete(conn: &mut ConnectionManager, member: &str) {
        let result: Result<i64, _> = conn.zrem(PROCESSING_KEY, member).await;
        if let Err(e) = result {
            warn!(error = %e, "failed to clear completed task from processing set");
        }
    }

    async fn bury(conn: &mut ConnectionManager, member: &str) {
        let result: Result<(), _> = redis::pipe()
            .zrem(PROCESSING_KEY, member)
            .ignore()
            .zadd(DEAD_KEY, member, Utc::now().timestamp_millis())
            .ignore()
            .query_async(conn)
            .await;
        if let Err(e) = result {
            warn!(error = %e, "failed to move task to dead set");
        }
    }

    async fn retry(conn: &mut ConnectionManager, envelope: &TaskEnvelope, member: &str) {
        let retried = envelope.next_attempt();
        if retried.retries_exhausted() {
            warn!(task_id = envelope.id.as_str(), "retries exhausted, burying task");
            Self::bury(conn, member).await;
            return;
        }

        let due = Utc::now()
            + chrono::Duration::from_std(retry_delay(retried.attempt)).unwrap_or_default();
        let Ok(retried_member) = serde_json::to_string(&retried) else {
            Self::bury(conn, member).await;
            return;
        };

        let result: Result<(), _> = redis::pipe()
            .zrem(PROCESSING_KEY, member)
            .ignore()
            .zadd(SCHEDULED_KEY, &retried_member, due.timestamp_millis())
            .ignore()
            .query_async(conn)
            .await;
        match result {
            Ok(()) => debug!(
                task_id = envelope.id.as_str(),
                attempt = retried.attempt,
                due = %due,
                "task re-enqueued for retry"
            ),
            Err(e) => warn!(error = %e, "failed to re-enqueue task for retry"),
        }
    }

    /// Move tasks stuck in the processing set past the handler deadline
    /// back into the scheduled set. Covers workers that died mid-task.
    async fn recover_stale(&self) -> Result<(), PuckwatchError> {
        let mut conn = self.conn.clone();
        let cutoff = Utc::now().timestamp_millis() - self.handler_timeout.as_millis() as i64;

        let stale: Vec<String> = conn
            .zrangebyscore(PROCESSING_KEY, "-inf", cutoff)
            .await
            .map_err(|e| PuckwatchError::Internal(format!("ZRANGEBYSCORE failed: {e}")))?;

        for member in stale {
            let removed: i64 = conn
                .zrem(PROCESSING_KEY, &member)
                .await
                .map_err(|e| PuckwatchError::Internal(format!("ZREM failed: {e}")))?;
            if removed == 0 {
                continue;
            }
            let _: i64 = conn
                .zadd(SCHEDULED_KEY, &member, Utc::now().timestamp_millis())
                .await
                .map_err(|e| PuckwatchError::Internal(format!("ZADD failed: {e}")))?;
            info!("recovered stale in-flight task");
        }

        Ok(())
    }
}

/// Build the connection URL from the configured base URL, password, and
/// database index.
fn build_connection_url(config: &RedisConfig) -> String {
    let mut url = config.url.clone();

    if let Some(password) = config.password.as_deref().filter(|p| !p.is_empty()) {
        if !url.contains('@') {
            if let Some(rest) = url.strip_prefix("redis://") {
                url = format!("redis://:{password}@{rest}");
            }
        }
    }

    if config.db != 0 {
        let after_scheme = url.strip_prefix("redis://").unwrap_or(&url);
        if !after_scheme.contains('/') {
            url = format!("{url}/{}", config.db);
        }
    }

    url
}
