use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::api::routes::{error_response, ErrorResponse};
use crate::api::AppState;
use crate::application::lobby::{
    CollectPlayers, CollectPlayersError, CreateLobby, CreateLobbyError, CreateLobbyInput,
    GetLobby, GetLobbyError, RosterEntry, UpdatePlayers, UpdatePlayersError,
};
use crate::domain::entities::{Lobby, LobbyPlayer};
use crate::domain::value_objects::{CardCategory, ChannelsConfig};

// ============================================================================
// Request/Response DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLobbyRequest {
    pub mode: String,
    pub rounds: u32,
    pub minute_duration_sec: u32,
    pub enabled_categories: Option<HashMap<CardCategory, bool>>,
    pub channels_config: Option<ChannelsConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntryDto {
    pub id: Option<String>,
    pub number: i64,
    pub nickname: String,
    pub discord_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlayersRequest {
    pub players: Vec<RosterEntryDto>,
}

#[derive(Debug, Serialize)]
pub struct LobbyResponse {
    pub success: bool,
    pub lobby: Lobby,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyDetailsResponse {
    pub success: bool,
    pub lobby: Lobby,
    pub players: Vec<LobbyPlayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlayersResponse {
    pub success: bool,
    pub players: Vec<LobbyPlayer>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /api/lobbies - Create a new lobby
pub async fn create_lobby(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateLobbyRequest>,
) -> Result<(StatusCode, Json<LobbyResponse>), (StatusCode, Json<ErrorResponse>)> {
    let use_case = CreateLobby::new(state.lobby_repo.clone(), state.presets.clone());
    let lobby = use_case
        .execute(CreateLobbyInput {
            mode: body.mode,
            rounds: body.rounds,
            minute_duration_sec: body.minute_duration_sec,
            enabled_categories: body.enabled_categories,
            channels_config: body.channels_config,
        })
        .await
        .map_err(|e| match e {
            CreateLobbyError::Validation(_) => {
                error_response(StatusCode::BAD_REQUEST, "INVALID_LOBBY", e.to_string())
            }
            CreateLobbyError::Repository(_) => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "CREATE_LOBBY_ERROR",
                e.to_string(),
            ),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(LobbyResponse {
            success: true,
            lobby,
        }),
    ))
}

/// GET /api/lobbies/:id - Lobby with roster and game reference
pub async fn get_lobby(
    State(state): State<Arc<AppState>>,
    Path(lobby_id): Path<String>,
) -> Result<Json<LobbyDetailsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let use_case = GetLobby::new(state.lobby_repo.clone());
    let details = use_case.execute(&lobby_id).await.map_err(|e| match e {
        GetLobbyError::LobbyNotFound => {
            error_response(StatusCode::NOT_FOUND, "LOBBY_NOT_FOUND", e.to_string())
        }
        GetLobbyError::Repository(_) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "GET_LOBBY_ERROR",
            e.to_string(),
        ),
    })?;

    Ok(Json(LobbyDetailsResponse {
        success: true,
        lobby: details.lobby,
        players: details.players,
        game_id: details.game_id,
    }))
}

/// POST /api/lobbies/:id/players/collect - Pull the voice channel roster
pub async fn collect_players(
    State(state): State<Arc<AppState>>,
    Path(lobby_id): Path<String>,
) -> Result<Json<PlayersResponse>, (StatusCode, Json<ErrorResponse>)> {
    let use_case = CollectPlayers::new(state.lobby_repo.clone(), state.discord.clone());
    let players = use_case.execute(&lobby_id).await.map_err(|e| match e {
        CollectPlayersError::LobbyNotFound => {
            error_response(StatusCode::NOT_FOUND, "LOBBY_NOT_FOUND", e.to_string())
        }
        CollectPlayersError::Repository(_) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "COLLECT_PLAYERS_ERROR",
            e.to_string(),
        ),
    })?;

    Ok(Json(PlayersResponse {
        success: true,
        players,
    }))
}

/// PUT /api/lobbies/:id/players - Replace the roster wholesale
pub async fn update_players(
    State(state): State<Arc<AppState>>,
    Path(lobby_id): Path<String>,
    Json(body): Json<UpdatePlayersRequest>,
) -> Result<Json<PlayersResponse>, (StatusCode, Json<ErrorResponse>)> {
    let entries = body
        .players
        .into_iter()
        .map(|dto| RosterEntry {
            id: dto.id,
            number: dto.number,
            nickname: dto.nickname,
            discord_id: dto.discord_id,
        })
        .collect();

    let use_case = UpdatePlayers::new(state.lobby_repo.clone());
    let players = use_case
        .execute(&lobby_id, entries)
        .await
        .map_err(|e| match e {
            UpdatePlayersError::LobbyNotFound => {
                error_response(StatusCode::NOT_FOUND, "LOBBY_NOT_FOUND", e.to_string())
            }
            UpdatePlayersError::Repository(_) => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "UPDATE_PLAYERS_ERROR",
                e.to_string(),
            ),
        })?;

    Ok(Json(PlayersResponse {
        success: true,
        players,
    }))
}
