// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Discord notifier for the puckwatch tracker.
//!
//! Implements [`Notifier`] over the Discord REST API: game updates are
//! posted as bot messages to a single configured channel. The transport is
//! a shared `reqwest` client, so constructing a notifier per task is cheap.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use puckwatch_core::{NotificationRequest, Notifier, PuckwatchError};
use tracing::{debug, info};

/// Deadline for one message-send request.
const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// The stats columns the Discord message template reads.
const REQUIRED_DATA_KEYS: &[&str] = &[
    "homeTeamGoals",
    "awayTeamGoals",
    "homeTeamExpectedGoals",
    "awayTeamExpectedGoals",
    "homeTeamShootOutGoals",
    "awayTeamShootOutGoals",
];

/// Notifier posting game updates to a Discord channel via the REST API.
#[derive(Debug, Clone)]
pub struct DiscordNotifier {
    client: reqwest::Client,
    base_url: String,
    channel_id: String,
}

impl DiscordNotifier {
    /// Creates a new Discord notifier.
    ///
    /// # Arguments
    /// * `base_url` - Discord REST API root
    /// * `bot_token` - bot token used for the `Authorization` header
    /// * `channel_id` - channel game updates are posted into
    pub fn new(
        base_url: String,
        bot_token: &str,
        channel_id: String,
    ) -> Result<Self, PuckwatchError> {
        if bot_token.is_empty() {
            return Err(PuckwatchError::Config(
                "discord.bot_token cannot be empty".into(),
            ));
        }

        let mut headers = reqwest::header::HeaderMap::new();
        let mut auth = reqwest::header::HeaderValue::from_str(&format!("Bot {bot_token}"))
            .map_err(|e| PuckwatchError::Config(format!("invalid bot token: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| PuckwatchError::Notify {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        info!(channel_id = channel_id.as_str(), "discord notifier created");
        Ok(Self {
            client,
            base_url,
            channel_id,
        })
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    fn name(&self) -> &str {
        "discord"
    }

    fn required_data_keys(&self) -> &[&str] {
        REQUIRED_DATA_KEYS
    }

    fn format_message(&self, request: &NotificationRequest) -> String {
        let mut message = String::new();

        let home_goals = request.data.get("homeTeamGoals");
        let away_goals = request.data.get("awayTeamGoals");
        let home_xg = request.data.get("homeTeamExpectedGoals");
        let away_xg = request.data.get("awayTeamExpectedGoals");

        if let (Some(home), Some(away)) = (home_goals, away_goals) {
            message.push_str(&format!(
                "\u{1F3D2} Current Score: {} {home} - {away} {}\n\n",
                request.home_name, request.away_name
            ));
        }

        if home_xg.is_some() || away_xg.is_some() {
            message.push_str("\u{1F4CA} Expected Goals:\n");
            if let Some(xg) = home_xg {
                message.push_str(&format!("\u{2022} {}: {xg}\n", request.home_name));
            }
            if let Some(xg) = away_xg {
                message.push_str(&format!("\u{2022} {}: {xg}\n", request.away_name));
            }
        }

        message.push_str(&format!(
            "\n*Notification sent at {}*",
            Utc::now().format("%H:%M:%S UTC")
        ));
        message
    }

    async fn send(&self, message: &str) -> Result<(), PuckwatchError> {
        let url = format!("{}/channels/{}/messages", self.base_url, self.channel_id);
        let body = serde_json::json!({ "content": message });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PuckwatchError::Notify {
                message: format!("message send failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PuckwatchError::Notify {
                message: format!("discord returned {status}: {body}"),
                source: None,
            });
        }

        debug!(channel_id = self.channel_id.as_str(), "discord message sent");
        Ok(())
    }
}
