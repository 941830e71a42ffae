// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notifier trait for downstream chat-platform integrations.

use async_trait::async_trait;

use crate::error::PuckwatchError;
use crate::types::NotificationRequest;

/// A channel that can deliver one formatted game-update message.
///
/// Notifiers declare the stats columns they consult via
/// [`required_data_keys`](Notifier::required_data_keys); the stats source
/// is queried for exactly that set. Delivery is fire-and-forget from the
/// tracker's perspective and is not idempotent across duplicate broker
/// deliveries.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Short name for logs ("discord").
    fn name(&self) -> &str;

    /// The stats columns this notifier will read from the data map.
    fn required_data_keys(&self) -> &[&str];

    /// Render the message for one request. Missing keys are omitted from
    /// the output, never replaced with placeholders.
    fn format_message(&self, request: &NotificationRequest) -> String;

    /// Deliver a rendered message to the channel.
    async fn send(&self, message: &str) -> Result<(), PuckwatchError>;
}
