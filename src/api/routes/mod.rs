pub mod config;
pub mod game;
pub mod health;
pub mod invite;
pub mod lobby;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;

use crate::api::AppState;

/// Create the main API router
pub fn create_api_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .nest("/lobbies", create_lobby_router())
        .nest("/games", create_game_router())
        .nest("/invites", create_invite_router())
        .nest("/config", create_config_router())
        .route("/health", get(health::health_handler))
        .with_state(state)
}

fn create_lobby_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(lobby::create_lobby))
        .route("/:id", get(lobby::get_lobby))
        .route("/:id/players/collect", post(lobby::collect_players))
        .route("/:id/players", put(lobby::update_players))
}

fn create_game_router() -> Router<Arc<AppState>> {
    Router::new()
        // :id is the lobby id for start, the game id everywhere else
        .route("/:id/start", post(game::start_game))
        .route("/:id", get(game::get_game))
        .route("/:id/state", get(game::get_state))
        .route("/:id/events", get(game::query_events))
        .route("/:id/round/start", post(game::start_round))
        .route("/:id/round/end", post(game::end_round))
        .route("/:id/char/preselect", post(game::preselect))
        .route("/:id/char/open", post(game::open_category))
        .route("/:id/minutes/enqueue", post(game::enqueue_minute))
        .route("/:id/minutes/approve", post(game::approve_minute))
        .route("/:id/minutes/start", post(game::start_minute))
        .route("/:id/minutes/stop", post(game::stop_minute))
        .route("/:id/minutes/reset", post(game::reset_minute))
        .route("/:id/voting/start", post(game::voting_start))
        .route("/:id/voting/stop", post(game::voting_stop))
        .route("/:id/voting/revote", post(game::voting_revote))
        .route("/:id/voting/cast", post(game::voting_cast))
        .route("/:id/kick", post(game::kick_player))
        .route("/:id/ending", post(game::trigger_ending))
        .route("/:id/invites", post(game::create_invite))
}

fn create_invite_router() -> Router<Arc<AppState>> {
    Router::new().route("/:code/accept", post(invite::accept_invite))
}

fn create_config_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/official", get(config::get_official_presets))
        .route("/official/reload", post(config::reload_official_presets))
}

/// Standard error body: `{error, code}` with an optional detail string.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

pub(crate) fn error_response(
    status: StatusCode,
    code: &str,
    message: impl Into<String>,
) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
            code: code.to_string(),
            details: None,
        }),
    )
}
