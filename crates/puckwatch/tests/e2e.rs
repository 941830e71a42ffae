// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests driving one full worker iteration against mocked
//! upstream HTTP services: real NHL and MoneyPuck clients, a real Discord
//! notifier, and a recording broker.

use std::sync::Arc;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use puckwatch_core::{TaskHandler, TaskPayload};
use puckwatch_discord::DiscordNotifier;
use puckwatch_gateway::{build_router, GatewayState};
use puckwatch_moneypuck::MoneypuckClient;
use puckwatch_nhl::NhlClient;
use puckwatch_test_utils::MockBroker;
use puckwatch_tracker::GameWatchHandler;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GAME_ID: &str = "2024020345";

const STATS_CSV: &str = "\
homeTeamGoals,awayTeamGoals,homeTeamExpectedGoals,awayTeamExpectedGoals,homeTeamShootOutGoals,awayTeamShootOutGoals
1,0,0.950,0.500,0,0
2,1,2.450,1.130,0,0
";

async fn mount_play(server: &MockServer, type_desc_key: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/gamecenter/{GAME_ID}/play-by-play")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "plays": [{"typeDescKey": "faceoff"}, {"typeDescKey": type_desc_key}]
        })))
        .mount(server)
        .await;
}

async fn mount_stats(server: &MockServer, csv: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/moneypuck/gameData/20242025/{GAME_ID}.csv")))
        .respond_with(ResponseTemplate::new(200).set_body_string(csv))
        .mount(server)
        .await;
}

async fn mount_discord(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/channels/42/messages"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

fn payload() -> TaskPayload {
    serde_json::from_value(serde_json::json!({
        "game": {
            "id": GAME_ID,
            "gameDate": "2024-11-30",
            "startTime": "2024-11-30T19:00:00Z",
            "homeTeam": {"id": 16, "abbrev": "CHI", "commonName": {"default": "Blackhawks"}},
            "awayTeam": {"id": 17, "abbrev": "DET", "commonName": {"default": "Red Wings"}}
        },
        "execution_end": (Utc::now() + chrono::Duration::hours(1))
            .to_rfc3339_opts(SecondsFormat::Secs, true),
        "should_notify": true
    }))
    .unwrap()
}

struct Stack {
    upstream: MockServer,
    discord: MockServer,
    broker: Arc<MockBroker>,
    handler: Arc<GameWatchHandler>,
}

async fn stack() -> Stack {
    let upstream = MockServer::start().await;
    let discord = MockServer::start().await;
    mount_discord(&discord).await;

    let broker = Arc::new(MockBroker::new());
    let handler = Arc::new(GameWatchHandler::new(
        Arc::new(NhlClient::new(upstream.uri(), upstream.uri()).unwrap()),
        Arc::new(MoneypuckClient::new(upstream.uri(), "20242025".into()).unwrap()),
        vec![Arc::new(
            DiscordNotifier::new(discord.uri(), "test-token", "42".into()).unwrap(),
        )],
        broker.clone(),
        60,
    ));

    Stack {
        upstream,
        discord,
        broker,
        handler,
    }
}

/// Wait until the server has received `count` requests, or time out.
async fn wait_for_requests(server: &MockServer, count: usize) -> Vec<wiremock::Request> {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(3);
    loop {
        let requests = server.received_requests().await.unwrap_or_default();
        if requests.len() >= count {
            return requests;
        }
        if tokio::time::Instant::now() >= deadline {
            return requests;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::test]
async fn goal_iteration_notifies_discord_and_schedules_successor() {
    let stack = stack().await;
    mount_play(&stack.upstream, "goal").await;
    mount_stats(&stack.upstream, STATS_CSV).await;

    let raw = payload().encode().unwrap();
    stack
        .handler
        .handle(&raw, CancellationToken::new())
        .await
        .unwrap();

    // Successor carries the identical payload roughly one interval out.
    let enqueued = stack.broker.enqueued().await;
    assert_eq!(enqueued.len(), 1);
    assert_eq!(enqueued[0].0.encode().unwrap(), raw);

    // The Discord message renders the current score and the xG block.
    let requests = wait_for_requests(&stack.discord, 1).await;
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let content = body["content"].as_str().unwrap();
    assert!(content.contains("Current Score: Blackhawks 2 - 1 Red Wings"), "{content}");
    assert!(content.contains("Blackhawks: 2.450"), "{content}");
    assert!(content.contains("Red Wings: 1.130"), "{content}");
}

#[tokio::test]
async fn non_scoring_play_touches_nothing_downstream() {
    let stack = stack().await;
    mount_play(&stack.upstream, "hit").await;
    mount_stats(&stack.upstream, STATS_CSV).await;

    let raw = payload().encode().unwrap();
    stack
        .handler
        .handle(&raw, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(stack.broker.enqueue_count().await, 1, "still reschedules");
    let requests = stack.discord.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty(), "no notification for a non-scoring play");

    // Only the play-by-play endpoint was hit upstream.
    let upstream_requests = stack.upstream.received_requests().await.unwrap();
    assert!(upstream_requests
        .iter()
        .all(|r| r.url.path().contains("play-by-play")));
}

#[tokio::test]
async fn shootout_game_end_reports_adjusted_score_and_stops() {
    let stack = stack().await;
    mount_play(&stack.upstream, "game-end").await;
    mount_stats(
        &stack.upstream,
        "\
homeTeamGoals,awayTeamGoals,homeTeamExpectedGoals,awayTeamExpectedGoals,homeTeamShootOutGoals,awayTeamShootOutGoals
3,3,2.100,2.300,2,1
",
    )
    .await;

    let raw = payload().encode().unwrap();
    stack
        .handler
        .handle(&raw, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(stack.broker.enqueue_count().await, 0, "game-end ends the chain");

    let requests = wait_for_requests(&stack.discord, 1).await;
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let content = body["content"].as_str().unwrap();
    assert!(
        content.contains("Current Score: Blackhawks 4 - 3 Red Wings"),
        "shootout winner credited with the deciding goal: {content}"
    );
}

#[tokio::test]
async fn gateway_drives_the_same_handler() {
    let stack = stack().await;
    mount_play(&stack.upstream, "hit").await;

    let state = GatewayState {
        handler: stack.handler.clone(),
        cancel: CancellationToken::new(),
    };
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum_serve(listener, state).await;
    });

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/"))
        .body(payload().encode().unwrap())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(stack.broker.enqueue_count().await, 1);
}

#[tokio::test]
async fn gateway_acknowledges_poison_payloads() {
    let stack = stack().await;

    let state = GatewayState {
        handler: stack.handler.clone(),
        cancel: CancellationToken::new(),
    };
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum_serve(listener, state).await;
    });

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/"))
        .body("definitely not a payload")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200, "poison payloads are acked, not retried");
    assert_eq!(stack.broker.enqueue_count().await, 0);
}

async fn axum_serve(listener: tokio::net::TcpListener, state: GatewayState) {
    axum::serve(listener, build_router(state)).await.unwrap();
}
