// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the MoneyPuck per-game stats CSV.

use std::time::Duration;

use async_trait::async_trait;
use puckwatch_core::{GameStatsSource, PuckwatchError, StatsSnapshot};
use tracing::debug;

/// Deadline for one upstream request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for the MoneyPuck game-data CSV endpoint.
#[derive(Debug, Clone)]
pub struct MoneypuckClient {
    client: reqwest::Client,
    base_url: String,
    season: String,
}

impl MoneypuckClient {
    /// Creates a new stats client.
    ///
    /// # Arguments
    /// * `base_url` - stats API root
    /// * `season` - season segment of the CSV path (e.g. "20242025")
    pub fn new(base_url: String, season: String) -> Result<Self, PuckwatchError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PuckwatchError::Upstream {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url,
            season,
        })
    }

    /// Parse a CSV body into a snapshot over its last data row.
    fn parse_snapshot(body: &str) -> Result<StatsSnapshot, PuckwatchError> {
        let mut reader = csv::Reader::from_reader(body.as_bytes());

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| PuckwatchError::Upstream {
                message: format!("failed to read CSV header: {e}"),
                source: Some(Box::new(e)),
            })?
            .iter()
            .map(str::to_string)
            .collect();

        let mut last_row: Option<Vec<String>> = None;
        for record in reader.records() {
            let record = record.map_err(|e| PuckwatchError::Upstream {
                message: format!("failed to read CSV row: {e}"),
                source: Some(Box::new(e)),
            })?;
            last_row = Some(record.iter().map(str::to_string).collect());
        }

        let last_row = last_row.ok_or_else(|| PuckwatchError::Upstream {
            message: "CSV contains no data rows".to_string(),
            source: None,
        })?;

        Ok(StatsSnapshot::new(columns, last_row))
    }
}

#[async_trait]
impl GameStatsSource for MoneypuckClient {
    async fn fetch_stats(&self, game_id: &str) -> Result<StatsSnapshot, PuckwatchError> {
        let url = format!(
            "{}/moneypuck/gameData/{}/{game_id}.csv",
            self.base_url, self.season
        );

        let response =
            self.client
                .get(&url)
                .send()
                .await
                .map_err(|e| PuckwatchError::Upstream {
                    message: format!("request to {url} failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PuckwatchError::Upstream {
                message: format!("{url} returned status {status}"),
                source: None,
            });
        }

        let body = response.text().await.map_err(|e| PuckwatchError::Upstream {
            message: format!("failed to read response body from {url}: {e}"),
            source: Some(Box::new(e)),
        })?;

        let snapshot = Self::parse_snapshot(&body)?;
        debug!(game_id, "fetched stats snapshot");
        Ok(snapshot)
    }
}
