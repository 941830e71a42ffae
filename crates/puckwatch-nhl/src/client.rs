// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the NHL play-by-play and schedule endpoints.
//!
//! The client carries no retry logic: upstream faults surface as
//! [`PuckwatchError::Upstream`] and the broker's delayed redelivery is the
//! only retry mechanism.

use std::time::Duration;

use async_trait::async_trait;
use puckwatch_core::{Play, PlayByPlaySource, PuckwatchError, ScheduleGame, ScheduleSource};
use tracing::debug;

use crate::types::{PlayByPlayResponse, ScheduleResponse};

/// Deadline for one upstream request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for the NHL API, serving both the play stream and the schedule.
#[derive(Debug, Clone)]
pub struct NhlClient {
    client: reqwest::Client,
    play_by_play_base_url: String,
    schedule_base_url: String,
}

impl NhlClient {
    /// Creates a new NHL API client.
    ///
    /// # Arguments
    /// * `play_by_play_base_url` - root for `/v1/gamecenter/...` requests
    /// * `schedule_base_url` - root for `/v1/schedule/...` requests
    pub fn new(
        play_by_play_base_url: String,
        schedule_base_url: String,
    ) -> Result<Self, PuckwatchError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PuckwatchError::Upstream {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            play_by_play_base_url,
            schedule_base_url,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, PuckwatchError> {
        let response =
            self.client
                .get(url)
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

        serde_json::from_str(&body).map_err(|e| PuckwatchError::Upstream {
            message: format!("malformed response from {url}: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

#[async_trait]
impl PlayByPlaySource for NhlClient {
    async fn fetch_last_play(&self, game_id: &str) -> Result<Play, PuckwatchError> {
        let url = format!(
            "{}/v1/gamecenter/{game_id}/play-by-play",
            self.play_by_play_base_url
        );
        let response: PlayByPlayResponse = self.get_json(&url).await?;

        let last_play = response
            .plays
            .into_iter()
            .next_back()
            .ok_or_else(|| PuckwatchError::Upstream {
                message: format!("no plays found for game {game_id}"),
                source: None,
            })?;

        debug!(game_id, play_type = %last_play.type_desc_key, "fetched last play");
        Ok(last_play)
    }
}

#[async_trait]
impl ScheduleSource for NhlClient {
    async fn fetch_schedule(&self, date: &str) -> Result<Vec<ScheduleGame>, PuckwatchError> {
        let url = format!("{}/v1/schedule/{date}", self.schedule_base_url);
        let response: ScheduleResponse = self.get_json(&url).await?;
        let games = response.games_for_date(date);
        debug!(date, count = games.len(), "fetched schedule");
        Ok(games)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> NhlClient {
        NhlClient::new(base_url.to_string(), base_url.to_string()).unwrap()
    }

    #[tokio::test]
    async fn fetch_last_play_returns_final_element() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/gamecenter/2024020345/play-by-play"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "plays": [
                    {"typeDescKey": "faceoff"},
                    {"typeDescKey": "hit"},
                    {"typeDescKey": "goal"}
                ]
            })))
            .mount(&server)
            .await;

        let play = test_client(&server.uri())
            .fetch_last_play("2024020345")
            .await
            .unwrap();
        assert_eq!(play.type_desc_key, "goal");
    }

    #[tokio::test]
    async fn empty_play_list_is_upstream_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/gamecenter/1/play-by-play"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"plays": []})),
            )
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .fetch_last_play("1")
            .await
            .unwrap_err();
        assert!(matches!(err, PuckwatchError::Upstream { .. }));
    }

    #[tokio::test]
    async fn non_success_status_is_upstream_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/gamecenter/1/play-by-play"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .fetch_last_play("1")
            .await
            .unwrap_err();
        assert!(matches!(err, PuckwatchError::Upstream { .. }));
    }

    #[tokio::test]
    async fn malformed_body_is_upstream_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/gamecenter/1/play-by-play"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .fetch_last_play("1")
            .await
            .unwrap_err();
        assert!(matches!(err, PuckwatchError::Upstream { .. }));
    }

    #[tokio::test]
    async fn fetch_schedule_filters_to_target_date() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/schedule/2024-11-30"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "gameWeek": [
                    {"date": "2024-11-29", "games": [{"id": 1, "gameState": "OFF"}]},
                    {"date": "2024-11-30", "games": [
                        {"id": 2, "gameState": "FUT", "startTimeUTC": "2024-11-30T19:00:00Z"},
                        {"id": 3, "gameState": "LIVE"}
                    ]}
                ]
            })))
            .mount(&server)
            .await;

        let games = test_client(&server.uri())
            .fetch_schedule("2024-11-30")
            .await
            .unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].id, 2);
        assert_eq!(games[0].start_time_utc, "2024-11-30T19:00:00Z");
    }
}
