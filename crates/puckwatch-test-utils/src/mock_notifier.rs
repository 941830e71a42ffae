// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock notifier capturing formatted requests and sent messages.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use puckwatch_core::{NotificationRequest, Notifier, PuckwatchError};
use tokio::sync::{Mutex, Notify};

/// Default columns a mock notifier asks for, matching the real template.
const DEFAULT_KEYS: &[&str] = &[
    "homeTeamGoals",
    "awayTeamGoals",
    "homeTeamExpectedGoals",
    "awayTeamExpectedGoals",
    "homeTeamShootOutGoals",
    "awayTeamShootOutGoals",
];

/// A mock notifier for testing the notification fan-out.
///
/// Records every formatted request and every sent message. Because the
/// notification service dispatches on detached tasks, tests synchronize via
/// [`wait_for_sends`](MockNotifier::wait_for_sends).
pub struct MockNotifier {
    requests: Arc<Mutex<Vec<NotificationRequest>>>,
    sent: Arc<Mutex<Vec<String>>>,
    notify: Arc<Notify>,
    fail: bool,
}

impl MockNotifier {
    /// Create a new mock notifier with empty records.
    pub fn new() -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
            notify: Arc::new(Notify::new()),
            fail: false,
        }
    }

    /// Create a mock whose sends always fail.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Requests passed to `format_message` so far.
    pub async fn requests(&self) -> Vec<NotificationRequest> {
        self.requests.lock().await.clone()
    }

    /// Messages passed to `send` so far.
    pub async fn sent_messages(&self) -> Vec<String> {
        self.sent.lock().await.clone()
    }

    /// Wait until at least `count` messages were sent, or time out.
    ///
    /// Returns `true` when the count was reached.
    pub async fn wait_for_sends(&self, count: usize, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.sent.lock().await.len() >= count {
                return true;
            }
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                return false;
            }
            // Re-check periodically: a send landing between the count check
            // and the wait would otherwise go unobserved until the deadline.
            let wait = remaining.min(Duration::from_millis(25));
            let _ = tokio::time::timeout(wait, self.notify.notified()).await;
        }
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    fn name(&self) -> &str {
        "mock"
    }

    fn required_data_keys(&self) -> &[&str] {
        DEFAULT_KEYS
    }

    fn format_message(&self, request: &NotificationRequest) -> String {
        // Tests only need a stable, inspectable rendering.
        if let Ok(mut requests) = self.requests.try_lock() {
            requests.push(request.clone());
        }
        format!(
            "{} vs {}: {:?}",
            request.home_name, request.away_name, request.data
        )
    }

    async fn send(&self, message: &str) -> Result<(), PuckwatchError> {
        self.sent.lock().await.push(message.to_string());
        self.notify.notify_waiters();
        if self.fail {
            return Err(PuckwatchError::Notify {
                message: "mock notifier configured to fail".into(),
                source: None,
            });
        }
        Ok(())
    }
}
