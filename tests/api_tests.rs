//! API Integration Tests for the ShelterPlus Backend
//!
//! Drives the lobby/game lifecycle through the HTTP router against an
//! in-memory SQLite database.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::{Service, ServiceExt};

use shelterplus_backend::api;
use shelterplus_backend::infrastructure::app_state::AppState;

/// Helper to create a test application
async fn create_test_app() -> Router {
    // Set test environment
    std::env::set_var("DATABASE_URL", "sqlite::memory:");

    let state = AppState::new().await.expect("Failed to create app state");
    let state = Arc::new(state);

    Router::new()
        .nest("/api", api::routes::create_api_router(state.clone()))
        .with_state(state)
}

async fn request(
    app: &mut Router,
    method: &str,
    path: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(path)
        .header("Content-Type", "application/json");

    let request = match body {
        Some(body) => builder
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = ServiceExt::<Request<Body>>::ready(app)
        .await
        .unwrap()
        .call(request)
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, json)
}

/// Helper to make a POST request with JSON body
async fn post_json(app: &mut Router, path: &str, body: Value) -> (StatusCode, Value) {
    request(app, "POST", path, Some(body)).await
}

/// Helper to make a PUT request with JSON body
async fn put_json(app: &mut Router, path: &str, body: Value) -> (StatusCode, Value) {
    request(app, "PUT", path, Some(body)).await
}

/// Helper to make a GET request
async fn get_json(app: &mut Router, path: &str) -> (StatusCode, Value) {
    request(app, "GET", path, None).await
}

/// Create a lobby with the given roster and return (lobby_id, player_ids
/// unused) ready to start.
async fn create_lobby_with_players(app: &mut Router, count: usize) -> String {
    let (status, body) = post_json(
        app,
        "/api/lobbies",
        json!({
            "mode": "WEB",
            "rounds": 3,
            "minuteDurationSec": 60
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let lobby_id = body["lobby"]["id"].as_str().unwrap().to_string();

    let players: Vec<Value> = (1..=count)
        .map(|n| json!({ "number": n, "nickname": format!("Player {n}") }))
        .collect();
    let (status, _) = put_json(
        app,
        &format!("/api/lobbies/{lobby_id}/players"),
        json!({ "players": players }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    lobby_id
}

/// Start a game for a fresh lobby and return (game_id, player ids in seat
/// order).
async fn start_game(app: &mut Router, player_count: usize) -> (String, Vec<String>) {
    let lobby_id = create_lobby_with_players(app, player_count).await;

    let (status, body) = post_json(
        app,
        &format!("/api/games/{lobby_id}/start"),
        json!({ "hostUserId": "host-1" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let game_id = body["game"]["id"].as_str().unwrap().to_string();
    let player_ids = body["game"]["players"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_string())
        .collect();

    (game_id, player_ids)
}

// ============================================================================
// Lobby Tests
// ============================================================================

#[tokio::test]
async fn test_create_lobby_defaults_categories_to_enabled() {
    let mut app = create_test_app().await;

    let (status, body) = post_json(
        &mut app,
        "/api/lobbies",
        json!({
            "mode": "WEB",
            "rounds": 5,
            "minuteDurationSec": 90,
            "enabledCategories": { "Luggage": false }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["lobby"]["mode"], "WEB");
    assert_eq!(body["lobby"]["rounds"], 5);
    assert_eq!(body["lobby"]["minuteDurationSec"], 90);

    let categories = body["lobby"]["enabledCategories"].as_object().unwrap();
    assert_eq!(categories.len(), 11);
    assert_eq!(categories["Luggage"], false);
    assert_eq!(categories["Profession"], true);
    assert_eq!(categories["ConditionCard"], true);
}

#[tokio::test]
async fn test_create_lobby_rejects_bad_input() {
    let mut app = create_test_app().await;

    let (status, body) = post_json(
        &mut app,
        "/api/lobbies",
        json!({ "mode": "TOURNAMENT", "rounds": 3, "minuteDurationSec": 60 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_LOBBY");

    let (status, _) = post_json(
        &mut app,
        "/api/lobbies",
        json!({ "mode": "WEB", "rounds": 0, "minuteDurationSec": 60 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_official_lobby_inherits_preset_channels() {
    let mut app = create_test_app().await;

    let (status, body) = post_json(
        &mut app,
        "/api/lobbies",
        json!({
            "mode": "OFFICIAL",
            "rounds": 3,
            "minuteDurationSec": 60,
            "channelsConfig": { "officialPresetIndex": 1 }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    // Second bundled preset: Global Pandemic / Underground Labs
    assert_eq!(body["lobby"]["channelsConfig"]["voiceChannelId"], "234");
    assert_eq!(body["lobby"]["channelsConfig"]["textChannelId"], "567");
}

#[tokio::test]
async fn test_update_players_replaces_roster_wholesale() {
    let mut app = create_test_app().await;
    let lobby_id = create_lobby_with_players(&mut app, 3).await;

    let (status, body) = put_json(
        &mut app,
        &format!("/api/lobbies/{lobby_id}/players"),
        json!({ "players": [ { "number": 1, "nickname": "Solo" } ] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let players = body["players"].as_array().unwrap();
    assert_eq!(players.len(), 1);
    assert_eq!(players[0]["nickname"], "Solo");

    let (_, body) = get_json(&mut app, &format!("/api/lobbies/{lobby_id}")).await;
    assert_eq!(body["players"].as_array().unwrap().len(), 1);
}

// ============================================================================
// Game Start Tests
// ============================================================================

#[tokio::test]
async fn test_start_game_without_players_fails() {
    let mut app = create_test_app().await;

    let (status, body) = post_json(
        &mut app,
        "/api/lobbies",
        json!({ "mode": "WEB", "rounds": 3, "minuteDurationSec": 60 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let lobby_id = body["lobby"]["id"].as_str().unwrap();

    let (status, body) = post_json(
        &mut app,
        &format!("/api/games/{lobby_id}/start"),
        json!({}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_STATE");
}

#[tokio::test]
async fn test_start_game_on_missing_lobby_fails() {
    let mut app = create_test_app().await;

    let (status, body) = post_json(&mut app, "/api/games/nope/start", json!({})).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "LOBBY_NOT_FOUND");
}

#[tokio::test]
async fn test_start_game_deals_one_card_per_category_per_player() {
    let mut app = create_test_app().await;
    let lobby_id = create_lobby_with_players(&mut app, 4).await;

    let (status, body) = post_json(
        &mut app,
        &format!("/api/games/{lobby_id}/start"),
        json!({ "hostUserId": "host-1" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let game = &body["game"];
    assert_eq!(game["seats"], 2);
    assert_eq!(game["currentRound"], 0);
    assert!(game["apocalypse"].as_str().unwrap().len() > 0);
    assert!(game["bunker"].as_str().unwrap().len() > 0);

    let players = game["players"].as_array().unwrap();
    assert_eq!(players.len(), 4);
    for player in players {
        assert_eq!(player["status"], "ALIVE");
        assert_eq!(player["role"], "PLAYER");
        let cards = player["cards"].as_array().unwrap();
        assert_eq!(cards.len(), 11);
        assert!(cards.iter().all(|c| c["isOpen"] == false));
    }

    // Seat order preserved
    let numbers: Vec<i64> = players.iter().map(|p| p["number"].as_i64().unwrap()).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_start_game_twice_fails() {
    let mut app = create_test_app().await;
    let lobby_id = create_lobby_with_players(&mut app, 4).await;

    let (status, _) = post_json(
        &mut app,
        &format!("/api/games/{lobby_id}/start"),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post_json(
        &mut app,
        &format!("/api/games/{lobby_id}/start"),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_STATE");
    assert_eq!(body["error"], "Validation error: Game already started");
}

#[tokio::test]
async fn test_disabled_category_is_not_dealt() {
    let mut app = create_test_app().await;

    let (_, body) = post_json(
        &mut app,
        "/api/lobbies",
        json!({
            "mode": "WEB",
            "rounds": 3,
            "minuteDurationSec": 60,
            "enabledCategories": { "Luggage": false, "Phobia": false }
        }),
    )
    .await;
    let lobby_id = body["lobby"]["id"].as_str().unwrap().to_string();

    put_json(
        &mut app,
        &format!("/api/lobbies/{lobby_id}/players"),
        json!({ "players": [ { "number": 1, "nickname": "A" }, { "number": 2, "nickname": "B" } ] }),
    )
    .await;

    let (_, body) = post_json(&mut app, &format!("/api/games/{lobby_id}/start"), json!({})).await;
    for player in body["game"]["players"].as_array().unwrap() {
        let cards = player["cards"].as_array().unwrap();
        assert_eq!(cards.len(), 9);
        assert!(cards.iter().all(|c| c["category"] != "Luggage" && c["category"] != "Phobia"));
    }
}

// ============================================================================
// Round Tests
// ============================================================================

#[tokio::test]
async fn test_round_one_auto_opens_professions_once() {
    let mut app = create_test_app().await;
    let (game_id, player_ids) = start_game(&mut app, 4).await;

    let (status, body) = post_json(
        &mut app,
        &format!("/api/games/{game_id}/round/start"),
        json!({ "round": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["currentRound"], 1);

    let auto_opened: Vec<String> = body["autoOpenedPlayerIds"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    assert_eq!(auto_opened.len(), player_ids.len());
    for id in &player_ids {
        assert!(auto_opened.contains(id));
    }

    // Every Profession card is now open, nothing else is.
    let (_, body) = get_json(&mut app, &format!("/api/games/{game_id}")).await;
    for player in body["game"]["players"].as_array().unwrap() {
        for card in player["cards"].as_array().unwrap() {
            let expected_open = card["category"] == "Profession";
            assert_eq!(card["isOpen"], Value::Bool(expected_open));
        }
    }

    // Exactly one auto-reveal audit record.
    let (_, body) = get_json(
        &mut app,
        &format!("/api/games/{game_id}/events?type=PROFESSIONS_AUTO_OPENED"),
    )
    .await;
    assert_eq!(body["events"].as_array().unwrap().len(), 1);

    // Rounds only move forward; round 1 cannot restart.
    let (status, body) = post_json(
        &mut app,
        &format!("/api/games/{game_id}/round/start"),
        json!({ "round": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ROUND");
}

#[tokio::test]
async fn test_round_guard_rejects_lookahead() {
    let mut app = create_test_app().await;
    let (game_id, _) = start_game(&mut app, 4).await;

    post_json(
        &mut app,
        &format!("/api/games/{game_id}/round/start"),
        json!({ "round": 1 }),
    )
    .await;

    // current_round + 1 is reachable...
    let (status, _) = post_json(
        &mut app,
        &format!("/api/games/{game_id}/round/end"),
        json!({ "round": 2 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // ...anything further ahead is not.
    let (status, body) = post_json(
        &mut app,
        &format!("/api/games/{game_id}/round/end"),
        json!({ "round": 3 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ROUND");
}

// ============================================================================
// Card Reveal Tests
// ============================================================================

#[tokio::test]
async fn test_open_category_is_idempotent() {
    let mut app = create_test_app().await;
    let (game_id, player_ids) = start_game(&mut app, 4).await;
    let player_id = &player_ids[0];

    let (status, first) = post_json(
        &mut app,
        &format!("/api/games/{game_id}/char/open"),
        json!({ "playerId": player_id, "category": "Hobby", "round": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["opened"], true);
    assert_eq!(first["card"]["isOpen"], true);
    assert_eq!(first["card"]["openedRound"], 1);

    let (status, second) = post_json(
        &mut app,
        &format!("/api/games/{game_id}/char/open"),
        json!({ "playerId": player_id, "category": "Hobby", "round": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["opened"], false);
    assert_eq!(second["card"]["id"], first["card"]["id"]);

    let (_, body) = get_json(
        &mut app,
        &format!("/api/games/{game_id}/events?type=CHAR_OPENED"),
    )
    .await;
    assert_eq!(body["events"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_preselect_upserts_per_round() {
    let mut app = create_test_app().await;
    let (game_id, player_ids) = start_game(&mut app, 4).await;
    let player_id = &player_ids[1];

    let (status, body) = post_json(
        &mut app,
        &format!("/api/games/{game_id}/char/preselect"),
        json!({ "playerId": player_id, "round": 1, "categories": ["Hobby", "Health"] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["plan"]["categories"], json!(["Hobby", "Health"]));

    let (status, body) = post_json(
        &mut app,
        &format!("/api/games/{game_id}/char/preselect"),
        json!({ "playerId": player_id, "round": 1, "categories": ["Phobia"] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["plan"]["categories"], json!(["Phobia"]));

    // Preselecting does not open anything.
    let (_, body) = get_json(&mut app, &format!("/api/games/{game_id}")).await;
    for player in body["game"]["players"].as_array().unwrap() {
        assert!(player["cards"]
            .as_array()
            .unwrap()
            .iter()
            .all(|c| c["isOpen"] == false));
    }
}

// ============================================================================
// Voting Tests
// ============================================================================

#[tokio::test]
async fn test_cast_vote_upserts_per_voter_and_round() {
    let mut app = create_test_app().await;
    let (game_id, player_ids) = start_game(&mut app, 4).await;
    let (voter, first_target, second_target) = (&player_ids[0], &player_ids[1], &player_ids[2]);

    let (status, body) = post_json(
        &mut app,
        &format!("/api/games/{game_id}/voting/cast"),
        json!({
            "round": 1,
            "voterPlayerId": voter,
            "targetPlayerId": first_target,
            "source": "WEB"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"][first_target], 1);

    // Re-cast overwrites the target; the old tally entry disappears.
    let (status, body) = post_json(
        &mut app,
        &format!("/api/games/{game_id}/voting/cast"),
        json!({
            "round": 1,
            "voterPlayerId": voter,
            "targetPlayerId": second_target,
            "source": "DISCORD"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"][second_target], 1);
    assert!(body["stats"].get(first_target).is_none());
    assert_eq!(body["vote"]["source"], "DISCORD");
}

#[tokio::test]
async fn test_revote_clears_targets_but_keeps_rows() {
    let mut app = create_test_app().await;
    let (game_id, player_ids) = start_game(&mut app, 4).await;

    for voter in &player_ids[0..3] {
        post_json(
            &mut app,
            &format!("/api/games/{game_id}/voting/cast"),
            json!({
                "round": 1,
                "voterPlayerId": voter,
                "targetPlayerId": player_ids[3],
                "source": "WEB"
            }),
        )
        .await;
    }

    let (status, body) = post_json(
        &mut app,
        &format!("/api/games/{game_id}/voting/revote"),
        json!({ "round": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // Rows survive the revote; every target is nulled.
    assert_eq!(body["cleared"], 3);
    assert!(body["stats"].as_object().unwrap().is_empty());

    // Voters can cast again after the revote.
    let (status, body) = post_json(
        &mut app,
        &format!("/api/games/{game_id}/voting/cast"),
        json!({
            "round": 1,
            "voterPlayerId": player_ids[0],
            "targetPlayerId": player_ids[1],
            "source": "WEB"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"][&player_ids[1]], 1);
}

#[tokio::test]
async fn test_voting_signals_only_log() {
    let mut app = create_test_app().await;
    let (game_id, _) = start_game(&mut app, 4).await;

    let (status, _) = post_json(
        &mut app,
        &format!("/api/games/{game_id}/voting/start"),
        json!({ "round": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post_json(
        &mut app,
        &format!("/api/games/{game_id}/voting/stop"),
        json!({ "round": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get_json(
        &mut app,
        &format!("/api/games/{game_id}/events?type=VOTING_STARTED"),
    )
    .await;
    assert_eq!(body["events"].as_array().unwrap().len(), 1);
}

// ============================================================================
// Minute Queue Tests
// ============================================================================

#[tokio::test]
async fn test_enqueue_minute_is_idempotent_and_positions_grow() {
    let mut app = create_test_app().await;
    let (game_id, player_ids) = start_game(&mut app, 4).await;

    let (status, body) = post_json(
        &mut app,
        &format!("/api/games/{game_id}/minutes/enqueue"),
        json!({ "playerId": player_ids[0], "round": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["request"]["position"], 1);
    let first_id = body["request"]["id"].as_str().unwrap().to_string();

    // Re-enqueue returns the existing request, no duplicate.
    let (status, body) = post_json(
        &mut app,
        &format!("/api/games/{game_id}/minutes/enqueue"),
        json!({ "playerId": player_ids[0], "round": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["request"]["id"], first_id.as_str());
    assert_eq!(body["queue"].as_array().unwrap().len(), 1);

    let (_, body) = post_json(
        &mut app,
        &format!("/api/games/{game_id}/minutes/enqueue"),
        json!({ "playerId": player_ids[1], "round": 1 }),
    )
    .await;
    assert_eq!(body["request"]["position"], 2);
    assert_eq!(body["queue"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_approve_minute_404_without_request() {
    let mut app = create_test_app().await;
    let (game_id, player_ids) = start_game(&mut app, 4).await;

    let (status, body) = post_json(
        &mut app,
        &format!("/api/games/{game_id}/minutes/approve"),
        json!({ "playerId": player_ids[0], "round": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "MINUTE_REQUEST_NOT_FOUND");
}

#[tokio::test]
async fn test_minute_timer_inherits_lobby_duration_and_stop_keeps_it() {
    let mut app = create_test_app().await;

    // A lobby duration distinct from the 60s fallback proves inheritance.
    let (_, body) = post_json(
        &mut app,
        "/api/lobbies",
        json!({ "mode": "WEB", "rounds": 3, "minuteDurationSec": 75 }),
    )
    .await;
    let lobby_id = body["lobby"]["id"].as_str().unwrap().to_string();
    put_json(
        &mut app,
        &format!("/api/lobbies/{lobby_id}/players"),
        json!({ "players": [
            { "number": 1, "nickname": "A" },
            { "number": 2, "nickname": "B" },
            { "number": 3, "nickname": "C" },
            { "number": 4, "nickname": "D" }
        ] }),
    )
    .await;
    let (_, body) = post_json(&mut app, &format!("/api/games/{lobby_id}/start"), json!({})).await;
    let game_id = body["game"]["id"].as_str().unwrap().to_string();
    let player_ids: Vec<String> = body["game"]["players"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_string())
        .collect();

    post_json(
        &mut app,
        &format!("/api/games/{game_id}/minutes/enqueue"),
        json!({ "playerId": player_ids[0], "round": 1 }),
    )
    .await;
    post_json(
        &mut app,
        &format!("/api/games/{game_id}/minutes/approve"),
        json!({ "playerId": player_ids[0], "round": 1 }),
    )
    .await;

    // Start without an explicit duration: the lobby's 75s applies, aimed
    // at the latest approved request.
    let (status, body) = post_json(
        &mut app,
        &format!("/api/games/{game_id}/minutes/start"),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["request"]["durationSec"], 75);
    assert_eq!(body["request"]["playerId"], player_ids[0].as_str());
    assert!(body["request"]["startedAt"].is_i64());
    let remaining = body["remainingSec"].as_i64().unwrap();
    assert!(remaining <= 75 && remaining >= 74);

    // Stop clears the clock but keeps the duration.
    let (status, body) = post_json(
        &mut app,
        &format!("/api/games/{game_id}/minutes/stop"),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["request"]["startedAt"].is_null());
    assert_eq!(body["request"]["durationSec"], 75);
    assert!(body.get("remainingSec").is_none() || body["remainingSec"].is_null());

    // Reset with an explicit duration targets a named player's request.
    let (status, body) = post_json(
        &mut app,
        &format!("/api/games/{game_id}/minutes/reset"),
        json!({ "playerId": player_ids[0], "durationSec": 90 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["request"]["durationSec"], 90);
    assert!(body["request"]["startedAt"].is_i64());
}

// ============================================================================
// Kick Tests
// ============================================================================

#[tokio::test]
async fn test_kick_sets_player_out_and_keeps_cards() {
    let mut app = create_test_app().await;
    let (game_id, player_ids) = start_game(&mut app, 4).await;

    let (status, body) = post_json(
        &mut app,
        &format!("/api/games/{game_id}/kick"),
        json!({ "playerId": player_ids[2] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["player"]["status"], "OUT");

    let (_, body) = get_json(&mut app, &format!("/api/games/{game_id}")).await;
    let kicked = body["game"]["players"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"] == player_ids[2].as_str())
        .unwrap();
    assert_eq!(kicked["status"], "OUT");
    assert_eq!(kicked["cards"].as_array().unwrap().len(), 11);
}

// ============================================================================
// Invite Tests
// ============================================================================

#[tokio::test]
async fn test_cohost_invite_accept_is_idempotent_per_user() {
    let mut app = create_test_app().await;
    let (game_id, _) = start_game(&mut app, 4).await;

    let (status, body) = post_json(
        &mut app,
        &format!("/api/games/{game_id}/invites"),
        json!({ "role": "CO_HOST" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let code = body["invite"]["code"].as_str().unwrap().to_string();
    assert_eq!(code.len(), 8);

    let (status, body) = post_json(
        &mut app,
        &format!("/api/invites/{code}/accept"),
        json!({ "userId": "user-a", "nickname": "Alice" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "CO_HOST");
    assert_eq!(body["gameId"], game_id.as_str());

    // Same user again: fine.
    let (status, _) = post_json(
        &mut app,
        &format!("/api/invites/{code}/accept"),
        json!({ "userId": "user-a", "nickname": "Alice" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Different user: conflict.
    let (status, body) = post_json(
        &mut app,
        &format!("/api/invites/{code}/accept"),
        json!({ "userId": "user-b", "nickname": "Bob" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INVITE");
}

#[tokio::test]
async fn test_spectator_invite_creates_offset_numbered_player() {
    let mut app = create_test_app().await;
    let (game_id, _) = start_game(&mut app, 4).await;

    let (_, body) = post_json(
        &mut app,
        &format!("/api/games/{game_id}/invites"),
        json!({ "role": "SPECTATOR" }),
    )
    .await;
    let code = body["invite"]["code"].as_str().unwrap().to_string();

    let (status, body) = post_json(
        &mut app,
        &format!("/api/invites/{code}/accept"),
        json!({ "userId": "spec-1", "nickname": "Watcher" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "SPECTATOR");
    let spectator_id = body["playerId"].as_str().unwrap().to_string();

    // Re-acceptance reuses the same spectator row.
    let (status, body) = post_json(
        &mut app,
        &format!("/api/invites/{code}/accept"),
        json!({ "userId": "spec-1", "nickname": "Watcher" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["playerId"], spectator_id.as_str());

    let (_, body) = get_json(&mut app, &format!("/api/games/{game_id}")).await;
    let players = body["game"]["players"].as_array().unwrap();
    assert_eq!(players.len(), 5);
    let spectator = players
        .iter()
        .find(|p| p["id"] == spectator_id.as_str())
        .unwrap();
    assert_eq!(spectator["role"], "SPECTATOR");
    assert_eq!(spectator["number"], 1001);
    assert!(spectator["cards"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_invite_code_is_not_found() {
    let mut app = create_test_app().await;

    let (status, body) = post_json(
        &mut app,
        "/api/invites/deadbeef/accept",
        json!({ "userId": "user-a", "nickname": "Alice" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "INVITE_NOT_FOUND");
}

// ============================================================================
// Ending Tests
// ============================================================================

#[tokio::test]
async fn test_trigger_ending_is_set_once() {
    let mut app = create_test_app().await;
    let (game_id, _) = start_game(&mut app, 4).await;

    let (status, body) = post_json(
        &mut app,
        &format!("/api/games/{game_id}/ending"),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let title = body["ending"]["title"].as_str().unwrap().to_string();
    assert!(!title.is_empty());

    let (status, body) = post_json(
        &mut app,
        &format!("/api/games/{game_id}/ending"),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "ENDING_ALREADY_SET");

    // The ending is visible on the game afterwards.
    let (_, body) = get_json(&mut app, &format!("/api/games/{game_id}")).await;
    assert_eq!(body["game"]["ending"]["title"], title.as_str());
}

// ============================================================================
// Spectator State Tests
// ============================================================================

#[tokio::test]
async fn test_public_state_exposes_only_opened_cards() {
    let mut app = create_test_app().await;
    let (game_id, player_ids) = start_game(&mut app, 4).await;

    post_json(
        &mut app,
        &format!("/api/games/{game_id}/char/open"),
        json!({ "playerId": player_ids[0], "category": "Health", "round": 1 }),
    )
    .await;

    let (status, body) = get_json(&mut app, &format!("/api/games/{game_id}/state")).await;
    assert_eq!(status, StatusCode::OK);

    let players = body["state"]["players"].as_array().unwrap();
    assert_eq!(players.len(), 4);
    for player in players {
        let opened = player["openedCards"].as_array().unwrap();
        if player["id"] == player_ids[0].as_str() {
            assert_eq!(opened.len(), 1);
            assert_eq!(opened[0]["category"], "Health");
        } else {
            assert!(opened.is_empty());
        }
        // Hidden payloads never leak through the projection.
        assert!(player.get("cards").is_none());
    }
    assert!(body["state"]["votes"].as_object().unwrap().is_empty());
}

// ============================================================================
// Event Query Tests
// ============================================================================

#[tokio::test]
async fn test_events_are_newest_first_with_cursor_pagination() {
    let mut app = create_test_app().await;
    let (game_id, player_ids) = start_game(&mut app, 4).await;

    // A few mutations to fill the log past one page.
    post_json(
        &mut app,
        &format!("/api/games/{game_id}/round/start"),
        json!({ "round": 1 }),
    )
    .await;
    post_json(
        &mut app,
        &format!("/api/games/{game_id}/char/open"),
        json!({ "playerId": player_ids[0], "category": "Bio", "round": 1 }),
    )
    .await;
    post_json(
        &mut app,
        &format!("/api/games/{game_id}/voting/start"),
        json!({ "round": 1 }),
    )
    .await;

    let (status, body) = get_json(&mut app, &format!("/api/games/{game_id}/events?take=2")).await;
    assert_eq!(status, StatusCode::OK);
    let first_page = body["events"].as_array().unwrap();
    assert_eq!(first_page.len(), 2);
    let cursor = body["nextCursor"].as_str().unwrap().to_string();

    let timestamps: Vec<i64> = first_page
        .iter()
        .map(|e| e["createdAt"].as_i64().unwrap())
        .collect();
    assert!(timestamps[0] >= timestamps[1]);

    let (_, body) = get_json(
        &mut app,
        &format!("/api/games/{game_id}/events?take=2&cursor={cursor}"),
    )
    .await;
    let second_page = body["events"].as_array().unwrap();
    assert!(!second_page.is_empty());

    let first_ids: Vec<&str> = first_page.iter().map(|e| e["id"].as_str().unwrap()).collect();
    for event in second_page {
        assert!(!first_ids.contains(&event["id"].as_str().unwrap()));
    }

    // Player filter narrows to that player's audit trail.
    let (_, body) = get_json(
        &mut app,
        &format!("/api/games/{game_id}/events?playerId={}", player_ids[0]),
    )
    .await;
    for event in body["events"].as_array().unwrap() {
        assert_eq!(event["playerId"], player_ids[0].as_str());
    }
}

#[tokio::test]
async fn test_missing_game_is_not_found() {
    let mut app = create_test_app().await;

    let (status, body) = get_json(&mut app, "/api/games/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "GAME_NOT_FOUND");

    let (status, _) = get_json(&mut app, "/api/games/nope/state").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post_json(
        &mut app,
        "/api/games/nope/round/start",
        json!({ "round": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Config Tests
// ============================================================================

#[tokio::test]
async fn test_official_presets_endpoint_serves_bundled_fallback() {
    let mut app = create_test_app().await;

    let (status, body) = get_json(&mut app, "/api/config/official").await;
    assert_eq!(status, StatusCode::OK);
    let presets = body["presets"].as_array().unwrap();
    assert_eq!(presets.len(), 6);
    assert_eq!(presets[0]["apocalypse"], "Asteroid Impact");
    assert_eq!(presets[0]["bunker"], "Mountain Shelter");
}

#[tokio::test]
async fn test_health_endpoint() {
    let mut app = create_test_app().await;

    let (status, body) = get_json(&mut app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}
