// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification fan-out service.
//!
//! Dispatches one game-update to every configured notifier on detached
//! tasks: delivery never blocks iteration progress, and each result is
//! awaited for at most thirty seconds before being logged.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use puckwatch_core::{Game, NotificationRequest, Notifier};
use tracing::{debug, warn};

/// Bounded wait on one notifier's delivery result.
const DISPATCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Fan-out over the configured notifiers for one task.
///
/// Constructed per handler invocation so the payload's `should_notify`
/// flag is honored without shared state; the notifiers themselves share
/// their transports internally, so construction is cheap.
pub struct NotificationService {
    notifiers: Vec<Arc<dyn Notifier>>,
    should_notify: bool,
}

impl NotificationService {
    pub fn new(notifiers: Vec<Arc<dyn Notifier>>, should_notify: bool) -> Self {
        Self {
            notifiers,
            should_notify,
        }
    }

    /// Union of every notifier's required stats columns.
    pub fn required_data_keys(&self) -> BTreeSet<String> {
        self.notifiers
            .iter()
            .flat_map(|n| n.required_data_keys().iter().map(|k| k.to_string()))
            .collect()
    }

    /// Dispatch one game update to every notifier.
    ///
    /// Each notifier receives only the keys it asked for. An entirely
    /// empty data map suppresses dispatch: a degraded iteration produces
    /// no message rather than a broken one.
    pub fn dispatch(&self, game: &Game, data: &BTreeMap<String, String>) {
        if !self.should_notify {
            debug!(
                game_id = game.id.as_str(),
                "notifications disabled for this task, skipping dispatch"
            );
            return;
        }
        if data.is_empty() {
            debug!(
                game_id = game.id.as_str(),
                "empty data map, suppressing notification"
            );
            return;
        }

        for notifier in &self.notifiers {
            let projected: BTreeMap<String, String> = notifier
                .required_data_keys()
                .iter()
                .filter_map(|key| data.get(*key).map(|value| (key.to_string(), value.clone())))
                .collect();

            let request = NotificationRequest {
                home_name: game.home_team.display_name().to_string(),
                away_name: game.away_team.display_name().to_string(),
                data: projected,
            };

            let notifier = notifier.clone();
            let game_id = game.id.clone();
            tokio::spawn(async move {
                let message = notifier.format_message(&request);
                match tokio::time::timeout(DISPATCH_TIMEOUT, notifier.send(&message)).await {
                    Ok(Ok(())) => debug!(
                        notifier = notifier.name(),
                        game_id = game_id.as_str(),
                        "notification delivered"
                    ),
                    Ok(Err(e)) => warn!(
                        notifier = notifier.name(),
                        game_id = game_id.as_str(),
                        error = %e,
                        "notification dispatch failed"
                    ),
                    Err(_) => warn!(
                        notifier = notifier.name(),
                        game_id = game_id.as_str(),
                        "notification result wait timed out"
                    ),
                }
            });
        }
    }
}
