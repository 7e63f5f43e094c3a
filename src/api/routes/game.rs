use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::api::routes::{error_response, ErrorResponse};
use crate::api::AppState;
use crate::application::game::{
    AcceptInviteOutput, ApproveMinute, CastVote, ControlMinuteTimer, CreateInvite, EndRound,
    EnqueueMinute, GamePublicState, GetGame, GetGameError, GetPublicState, InviteError,
    KickPlayer, KickPlayerError, MinuteError, MinuteTimerAction, OpenCategory,
    PreselectCategories, PublicStateError, QueryEvents, QueryEventsError, RevealError, Revote,
    RoundError, SignalVoting, StartGame, StartGameError, StartRound, TriggerEnding,
    TriggerEndingError, VotingError, VotingSignal,
};
use crate::domain::entities::{
    event_types, Card, Game, GameEvent, Invite, InviteRole, MinuteRequest, Player, RevealPlan,
    Vote, VoteSource,
};
use crate::domain::repositories::EventFilter;
use crate::domain::value_objects::CardCategory;
use crate::infrastructure::app_state::RoomEvent;

// ============================================================================
// Request/Response DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGameRequest {
    pub host_user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RoundRequest {
    pub round: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreselectRequest {
    pub player_id: String,
    pub round: u32,
    pub categories: Vec<CardCategory>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenCategoryRequest {
    pub player_id: String,
    pub category: CardCategory,
    pub round: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinuteRequestBody {
    pub player_id: String,
    pub round: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinuteTimerBody {
    pub player_id: Option<String>,
    pub duration_sec: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteRequest {
    pub round: u32,
    pub voter_player_id: String,
    pub target_player_id: Option<String>,
    pub source: VoteSource,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KickRequest {
    pub player_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateInviteRequest {
    pub role: InviteRole,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsQuery {
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub player_id: Option<String>,
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub take: Option<u32>,
    pub cursor: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlayerDto {
    #[serde(flatten)]
    pub player: Player,
    pub cards: Vec<Card>,
}

#[derive(Debug, Serialize)]
pub struct GameDto {
    #[serde(flatten)]
    pub game: Game,
    pub players: Vec<PlayerDto>,
}

#[derive(Debug, Serialize)]
pub struct GameResponse {
    pub success: bool,
    pub game: GameDto,
}

#[derive(Debug, Serialize)]
pub struct PublicStateResponse {
    pub success: bool,
    pub state: GamePublicState,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundResponse {
    pub success: bool,
    pub current_round: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub auto_opened_player_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub success: bool,
    pub plan: RevealPlan,
}

#[derive(Debug, Serialize)]
pub struct CardResponse {
    pub success: bool,
    pub card: Card,
    pub opened: bool,
}

#[derive(Debug, Serialize)]
pub struct MinuteQueueResponse {
    pub success: bool,
    pub request: MinuteRequest,
    pub queue: Vec<MinuteRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MinuteTimerResponse {
    pub success: bool,
    pub request: MinuteRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_sec: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct VoteResponse {
    pub success: bool,
    pub vote: Vote,
    pub stats: HashMap<String, i64>,
}

#[derive(Debug, Serialize)]
pub struct RevoteResponse {
    pub success: bool,
    pub cleared: i64,
    pub stats: HashMap<String, i64>,
}

#[derive(Debug, Serialize)]
pub struct KickResponse {
    pub success: bool,
    pub player: Player,
}

#[derive(Debug, Serialize)]
pub struct EndingResponse {
    pub success: bool,
    pub ending: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct InviteResponse {
    pub success: bool,
    pub invite: Invite,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsResponse {
    pub success: bool,
    pub events: Vec<GameEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptInviteResponse {
    pub success: bool,
    pub game_id: String,
    pub role: InviteRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
}

impl AcceptInviteResponse {
    pub fn from_output(output: AcceptInviteOutput) -> Self {
        Self {
            success: true,
            game_id: output.game_id,
            role: output.role,
            player_id: output.player_id,
        }
    }
}

// ============================================================================
// Fan-out helpers
// ============================================================================

/// Recompute and push the full public state. Best-effort: games with
/// spectators disabled simply skip the push.
pub(crate) async fn broadcast_public_state(state: &AppState, game_id: &str) {
    let use_case = GetPublicState::new(state.game_repo.clone());
    match use_case.execute(game_id).await {
        Ok(public_state) => {
            let data = match serde_json::to_value(&public_state) {
                Ok(value) => serde_json::json!({ "state": value }),
                Err(error) => {
                    tracing::warn!(%error, game_id, "failed to serialize public state");
                    return;
                }
            };
            state.broadcast_room(RoomEvent::new("spectator:state", game_id).with_data(data));
        }
        Err(error) => {
            tracing::debug!(%error, game_id, "skipping public state broadcast");
        }
    }
}

fn game_details_dto(details: crate::application::game::GameDetails) -> GameDto {
    GameDto {
        game: details.game,
        players: details
            .players
            .into_iter()
            .map(|entry| PlayerDto {
                player: entry.player,
                cards: entry.cards,
            })
            .collect(),
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /api/games/:lobbyId/start - Create the game from a lobby
pub async fn start_game(
    State(state): State<Arc<AppState>>,
    Path(lobby_id): Path<String>,
    Json(body): Json<StartGameRequest>,
) -> Result<(StatusCode, Json<GameResponse>), (StatusCode, Json<ErrorResponse>)> {
    let use_case = StartGame::new(
        state.lobby_repo.clone(),
        state.game_repo.clone(),
        state.discord.clone(),
    );
    let details = use_case
        .execute(crate::application::game::StartGameInput {
            lobby_id,
            host_user_id: body.host_user_id,
        })
        .await
        .map_err(|e| match e {
            StartGameError::LobbyNotFound => {
                error_response(StatusCode::NOT_FOUND, "LOBBY_NOT_FOUND", e.to_string())
            }
            StartGameError::Validation(_) => {
                error_response(StatusCode::BAD_REQUEST, "INVALID_STATE", e.to_string())
            }
            StartGameError::Repository(_) => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "START_GAME_ERROR",
                e.to_string(),
            ),
        })?;

    let game_id = details.game.id.clone();
    state.broadcast_room(
        RoomEvent::new("game:started", &game_id).with_data(serde_json::json!({
            "apocalypse": details.game.apocalypse,
            "bunker": details.game.bunker,
            "seats": details.game.seats,
            "players": details.players.len(),
        })),
    );
    broadcast_public_state(&state, &game_id).await;

    Ok((
        StatusCode::CREATED,
        Json(GameResponse {
            success: true,
            game: game_details_dto(details),
        }),
    ))
}

/// GET /api/games/:id - Full game with players and cards
pub async fn get_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> Result<Json<GameResponse>, (StatusCode, Json<ErrorResponse>)> {
    let use_case = GetGame::new(state.game_repo.clone());
    let details = use_case.execute(&game_id).await.map_err(|e| match e {
        GetGameError::GameNotFound => {
            error_response(StatusCode::NOT_FOUND, "GAME_NOT_FOUND", e.to_string())
        }
        GetGameError::Repository(_) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "GET_GAME_ERROR",
            e.to_string(),
        ),
    })?;

    Ok(Json(GameResponse {
        success: true,
        game: game_details_dto(details),
    }))
}

/// GET /api/games/:id/state - Spectator projection
pub async fn get_state(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> Result<Json<PublicStateResponse>, (StatusCode, Json<ErrorResponse>)> {
    let use_case = GetPublicState::new(state.game_repo.clone());
    let public_state = use_case.execute(&game_id).await.map_err(|e| match e {
        PublicStateError::GameNotFound => {
            error_response(StatusCode::NOT_FOUND, "GAME_NOT_FOUND", e.to_string())
        }
        PublicStateError::Validation(_) => {
            error_response(StatusCode::BAD_REQUEST, "SPECTATORS_DISABLED", e.to_string())
        }
        PublicStateError::Repository(_) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "GET_STATE_ERROR",
            e.to_string(),
        ),
    })?;

    Ok(Json(PublicStateResponse {
        success: true,
        state: public_state,
    }))
}

/// GET /api/games/:id/events - Audit log, newest-first
pub async fn query_events(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
    Query(query): Query<EventsQuery>,
) -> Result<Json<EventsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let use_case = QueryEvents::new(state.game_repo.clone());
    let page = use_case
        .execute(
            &game_id,
            EventFilter {
                event_type: query.event_type,
                player_id: query.player_id,
                from: query.from,
                to: query.to,
                take: query.take,
                cursor: query.cursor,
            },
        )
        .await
        .map_err(|e| match e {
            QueryEventsError::GameNotFound => {
                error_response(StatusCode::NOT_FOUND, "GAME_NOT_FOUND", e.to_string())
            }
            QueryEventsError::Repository(_) => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "QUERY_EVENTS_ERROR",
                e.to_string(),
            ),
        })?;

    Ok(Json(EventsResponse {
        success: true,
        events: page.events,
        next_cursor: page.next_cursor,
    }))
}

fn map_round_error(e: RoundError) -> (StatusCode, Json<ErrorResponse>) {
    match e {
        RoundError::GameNotFound => {
            error_response(StatusCode::NOT_FOUND, "GAME_NOT_FOUND", e.to_string())
        }
        RoundError::Validation(_) => {
            error_response(StatusCode::BAD_REQUEST, "INVALID_ROUND", e.to_string())
        }
        RoundError::Repository(_) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "ROUND_ERROR",
            e.to_string(),
        ),
    }
}

/// POST /api/games/:id/round/start
pub async fn start_round(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
    Json(body): Json<RoundRequest>,
) -> Result<Json<RoundResponse>, (StatusCode, Json<ErrorResponse>)> {
    let use_case = StartRound::new(state.game_repo.clone());
    let output = use_case
        .execute(&game_id, body.round)
        .await
        .map_err(map_round_error)?;

    state.broadcast_room(
        RoomEvent::new("round:change", &game_id).with_data(serde_json::json!({
            "round": output.game.current_round,
            "autoOpenedPlayerIds": output.auto_opened_player_ids,
        })),
    );
    broadcast_public_state(&state, &game_id).await;

    Ok(Json(RoundResponse {
        success: true,
        current_round: output.game.current_round,
        auto_opened_player_ids: output.auto_opened_player_ids,
    }))
}

/// POST /api/games/:id/round/end
pub async fn end_round(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
    Json(body): Json<RoundRequest>,
) -> Result<Json<AckResponse>, (StatusCode, Json<ErrorResponse>)> {
    let use_case = EndRound::new(state.game_repo.clone());
    use_case
        .execute(&game_id, body.round)
        .await
        .map_err(map_round_error)?;

    state.broadcast_room(
        RoomEvent::new("round:change", &game_id).with_data(serde_json::json!({
            "round": body.round,
            "action": "end",
        })),
    );

    Ok(Json(AckResponse { success: true }))
}

fn map_reveal_error(e: RevealError) -> (StatusCode, Json<ErrorResponse>) {
    match e {
        RevealError::GameNotFound => {
            error_response(StatusCode::NOT_FOUND, "GAME_NOT_FOUND", e.to_string())
        }
        RevealError::PlayerNotFound => {
            error_response(StatusCode::NOT_FOUND, "PLAYER_NOT_FOUND", e.to_string())
        }
        RevealError::CardNotFound => {
            error_response(StatusCode::NOT_FOUND, "CARD_NOT_FOUND", e.to_string())
        }
        RevealError::Validation(_) => {
            error_response(StatusCode::BAD_REQUEST, "INVALID_ROUND", e.to_string())
        }
        RevealError::Repository(_) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "REVEAL_ERROR",
            e.to_string(),
        ),
    }
}

/// POST /api/games/:id/char/preselect
pub async fn preselect(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
    Json(body): Json<PreselectRequest>,
) -> Result<Json<PlanResponse>, (StatusCode, Json<ErrorResponse>)> {
    let use_case = PreselectCategories::new(state.game_repo.clone());
    let plan = use_case
        .execute(&game_id, &body.player_id, body.round, body.categories)
        .await
        .map_err(map_reveal_error)?;

    state.broadcast_room(
        RoomEvent::new("char:preselect", &game_id).with_data(serde_json::json!({
            "playerId": plan.player_id,
            "round": plan.round,
            "categories": plan.categories,
        })),
    );

    Ok(Json(PlanResponse {
        success: true,
        plan,
    }))
}

/// POST /api/games/:id/char/open
pub async fn open_category(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
    Json(body): Json<OpenCategoryRequest>,
) -> Result<Json<CardResponse>, (StatusCode, Json<ErrorResponse>)> {
    let use_case = OpenCategory::new(state.game_repo.clone());
    let output = use_case
        .execute(&game_id, &body.player_id, body.category, body.round)
        .await
        .map_err(map_reveal_error)?;

    // First open only; the idempotent repeat changes nothing to announce.
    if output.opened {
        state.broadcast_room(
            RoomEvent::new("char:open", &game_id).with_data(serde_json::json!({
                "playerId": body.player_id,
                "category": output.card.category,
                "payload": output.card.payload,
                "round": body.round,
            })),
        );
        broadcast_public_state(&state, &game_id).await;
    }

    Ok(Json(CardResponse {
        success: true,
        card: output.card,
        opened: output.opened,
    }))
}

fn map_minute_error(e: MinuteError) -> (StatusCode, Json<ErrorResponse>) {
    match e {
        MinuteError::GameNotFound => {
            error_response(StatusCode::NOT_FOUND, "GAME_NOT_FOUND", e.to_string())
        }
        MinuteError::PlayerNotFound => {
            error_response(StatusCode::NOT_FOUND, "PLAYER_NOT_FOUND", e.to_string())
        }
        MinuteError::RequestNotFound => error_response(
            StatusCode::NOT_FOUND,
            "MINUTE_REQUEST_NOT_FOUND",
            e.to_string(),
        ),
        MinuteError::Validation(_) => {
            error_response(StatusCode::BAD_REQUEST, "INVALID_ROUND", e.to_string())
        }
        MinuteError::Repository(_) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "MINUTE_ERROR",
            e.to_string(),
        ),
    }
}

/// POST /api/games/:id/minutes/enqueue
pub async fn enqueue_minute(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
    Json(body): Json<MinuteRequestBody>,
) -> Result<Json<MinuteQueueResponse>, (StatusCode, Json<ErrorResponse>)> {
    let use_case = EnqueueMinute::new(state.game_repo.clone());
    let output = use_case
        .execute(&game_id, body.round, &body.player_id)
        .await
        .map_err(map_minute_error)?;

    state.broadcast_room(
        RoomEvent::new("minutes:queue", &game_id).with_data(serde_json::json!({
            "round": body.round,
            "queue": output.queue,
        })),
    );

    Ok(Json(MinuteQueueResponse {
        success: true,
        request: output.request,
        queue: output.queue,
    }))
}

/// POST /api/games/:id/minutes/approve
pub async fn approve_minute(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
    Json(body): Json<MinuteRequestBody>,
) -> Result<Json<MinuteQueueResponse>, (StatusCode, Json<ErrorResponse>)> {
    let use_case = ApproveMinute::new(state.game_repo.clone());
    let output = use_case
        .execute(&game_id, &body.player_id, body.round)
        .await
        .map_err(map_minute_error)?;

    state.broadcast_room(
        RoomEvent::new("minutes:queue", &game_id).with_data(serde_json::json!({
            "round": body.round,
            "queue": output.queue,
        })),
    );

    Ok(Json(MinuteQueueResponse {
        success: true,
        request: output.request,
        queue: output.queue,
    }))
}

async fn control_minute_timer(
    state: Arc<AppState>,
    game_id: String,
    body: MinuteTimerBody,
    action: MinuteTimerAction,
) -> Result<Json<MinuteTimerResponse>, (StatusCode, Json<ErrorResponse>)> {
    let use_case = ControlMinuteTimer::new(state.lobby_repo.clone(), state.game_repo.clone());
    let output = use_case
        .execute(
            &game_id,
            body.player_id.as_deref(),
            action,
            body.duration_sec,
        )
        .await
        .map_err(map_minute_error)?;

    state.broadcast_room(
        RoomEvent::new("minutes:timer", &game_id).with_data(serde_json::json!({
            "action": action.as_str(),
            "playerId": output.request.player_id,
            "durationSec": output.request.duration_sec,
            "startedAt": output.request.started_at,
            "remainingSec": output.remaining_sec,
        })),
    );

    Ok(Json(MinuteTimerResponse {
        success: true,
        request: output.request,
        remaining_sec: output.remaining_sec,
    }))
}

/// POST /api/games/:id/minutes/start
pub async fn start_minute(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
    Json(body): Json<MinuteTimerBody>,
) -> Result<Json<MinuteTimerResponse>, (StatusCode, Json<ErrorResponse>)> {
    control_minute_timer(state, game_id, body, MinuteTimerAction::Start).await
}

/// POST /api/games/:id/minutes/stop
pub async fn stop_minute(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
    Json(body): Json<MinuteTimerBody>,
) -> Result<Json<MinuteTimerResponse>, (StatusCode, Json<ErrorResponse>)> {
    control_minute_timer(state, game_id, body, MinuteTimerAction::Stop).await
}

/// POST /api/games/:id/minutes/reset
pub async fn reset_minute(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
    Json(body): Json<MinuteTimerBody>,
) -> Result<Json<MinuteTimerResponse>, (StatusCode, Json<ErrorResponse>)> {
    control_minute_timer(state, game_id, body, MinuteTimerAction::Reset).await
}

fn map_voting_error(e: VotingError) -> (StatusCode, Json<ErrorResponse>) {
    match e {
        VotingError::GameNotFound => {
            error_response(StatusCode::NOT_FOUND, "GAME_NOT_FOUND", e.to_string())
        }
        VotingError::PlayerNotFound => {
            error_response(StatusCode::NOT_FOUND, "PLAYER_NOT_FOUND", e.to_string())
        }
        VotingError::Validation(_) => {
            error_response(StatusCode::BAD_REQUEST, "INVALID_ROUND", e.to_string())
        }
        VotingError::Repository(_) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "VOTING_ERROR",
            e.to_string(),
        ),
    }
}

async fn signal_voting(
    state: Arc<AppState>,
    game_id: String,
    round: u32,
    signal: VotingSignal,
) -> Result<Json<AckResponse>, (StatusCode, Json<ErrorResponse>)> {
    let use_case = SignalVoting::new(state.game_repo.clone());
    use_case
        .execute(&game_id, round, signal)
        .await
        .map_err(map_voting_error)?;

    let event_type = match signal {
        VotingSignal::Start => event_types::VOTING_STARTED,
        VotingSignal::Stop => event_types::VOTING_STOPPED,
    };
    state.broadcast_room(
        RoomEvent::new("events:append", &game_id)
            .with_data(serde_json::json!({ "type": event_type, "round": round })),
    );

    Ok(Json(AckResponse { success: true }))
}

/// POST /api/games/:id/voting/start
pub async fn voting_start(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
    Json(body): Json<RoundRequest>,
) -> Result<Json<AckResponse>, (StatusCode, Json<ErrorResponse>)> {
    signal_voting(state, game_id, body.round, VotingSignal::Start).await
}

/// POST /api/games/:id/voting/stop
pub async fn voting_stop(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
    Json(body): Json<RoundRequest>,
) -> Result<Json<AckResponse>, (StatusCode, Json<ErrorResponse>)> {
    signal_voting(state, game_id, body.round, VotingSignal::Stop).await
}

/// POST /api/games/:id/voting/cast
pub async fn voting_cast(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
    Json(body): Json<CastVoteRequest>,
) -> Result<Json<VoteResponse>, (StatusCode, Json<ErrorResponse>)> {
    let use_case = CastVote::new(state.game_repo.clone());
    let output = use_case
        .execute(
            &game_id,
            body.round,
            &body.voter_player_id,
            body.target_player_id,
            body.source,
        )
        .await
        .map_err(map_voting_error)?;

    state.broadcast_room(
        RoomEvent::new("vote:stats", &game_id)
            .with_data(serde_json::json!({ "stats": output.stats })),
    );

    Ok(Json(VoteResponse {
        success: true,
        vote: output.vote,
        stats: output.stats,
    }))
}

/// POST /api/games/:id/voting/revote
pub async fn voting_revote(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
    Json(body): Json<RoundRequest>,
) -> Result<Json<RevoteResponse>, (StatusCode, Json<ErrorResponse>)> {
    let use_case = Revote::new(state.game_repo.clone());
    let output = use_case
        .execute(&game_id, body.round)
        .await
        .map_err(map_voting_error)?;

    state.broadcast_room(
        RoomEvent::new("vote:stats", &game_id)
            .with_data(serde_json::json!({ "stats": output.stats, "revote": true })),
    );

    Ok(Json(RevoteResponse {
        success: true,
        cleared: output.cleared,
        stats: output.stats,
    }))
}

/// POST /api/games/:id/kick
pub async fn kick_player(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
    Json(body): Json<KickRequest>,
) -> Result<Json<KickResponse>, (StatusCode, Json<ErrorResponse>)> {
    let use_case = KickPlayer::new(state.game_repo.clone());
    let player = use_case
        .execute(&game_id, &body.player_id)
        .await
        .map_err(|e| match e {
            KickPlayerError::GameNotFound => {
                error_response(StatusCode::NOT_FOUND, "GAME_NOT_FOUND", e.to_string())
            }
            KickPlayerError::PlayerNotFound => {
                error_response(StatusCode::NOT_FOUND, "PLAYER_NOT_FOUND", e.to_string())
            }
            KickPlayerError::Repository(_) => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "KICK_ERROR",
                e.to_string(),
            ),
        })?;

    state.broadcast_room(
        RoomEvent::new("player:kicked", &game_id)
            .with_data(serde_json::json!({ "playerId": player.id })),
    );
    broadcast_public_state(&state, &game_id).await;

    Ok(Json(KickResponse {
        success: true,
        player,
    }))
}

/// POST /api/games/:id/ending
pub async fn trigger_ending(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> Result<Json<EndingResponse>, (StatusCode, Json<ErrorResponse>)> {
    let use_case = TriggerEnding::new(
        state.lobby_repo.clone(),
        state.game_repo.clone(),
        state.discord.clone(),
    );
    let game = use_case.execute(&game_id).await.map_err(|e| match e {
        TriggerEndingError::GameNotFound => {
            error_response(StatusCode::NOT_FOUND, "GAME_NOT_FOUND", e.to_string())
        }
        TriggerEndingError::LobbyNotFound => {
            error_response(StatusCode::NOT_FOUND, "LOBBY_NOT_FOUND", e.to_string())
        }
        TriggerEndingError::Validation(_) => {
            error_response(StatusCode::BAD_REQUEST, "ENDING_ALREADY_SET", e.to_string())
        }
        TriggerEndingError::Repository(_) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "ENDING_ERROR",
            e.to_string(),
        ),
    })?;

    let ending = game.ending.clone().unwrap_or(serde_json::Value::Null);
    state.broadcast_room(
        RoomEvent::new("ending:show", &game_id)
            .with_data(serde_json::json!({ "ending": ending })),
    );
    broadcast_public_state(&state, &game_id).await;

    Ok(Json(EndingResponse {
        success: true,
        ending,
    }))
}

/// POST /api/games/:id/invites
pub async fn create_invite(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
    Json(body): Json<CreateInviteRequest>,
) -> Result<(StatusCode, Json<InviteResponse>), (StatusCode, Json<ErrorResponse>)> {
    let use_case = CreateInvite::new(state.game_repo.clone());
    let invite = use_case
        .execute(&game_id, body.role)
        .await
        .map_err(map_invite_error)?;

    state.broadcast_room(
        RoomEvent::new("events:append", &game_id)
            .with_data(serde_json::json!({ "type": event_types::INVITE_CREATED })),
    );

    Ok((
        StatusCode::CREATED,
        Json(InviteResponse {
            success: true,
            invite,
        }),
    ))
}

pub(crate) fn map_invite_error(e: InviteError) -> (StatusCode, Json<ErrorResponse>) {
    match e {
        InviteError::GameNotFound => {
            error_response(StatusCode::NOT_FOUND, "GAME_NOT_FOUND", e.to_string())
        }
        InviteError::InviteNotFound => {
            error_response(StatusCode::NOT_FOUND, "INVITE_NOT_FOUND", e.to_string())
        }
        InviteError::Validation(_) => {
            error_response(StatusCode::BAD_REQUEST, "INVALID_INVITE", e.to_string())
        }
        InviteError::Repository(_) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INVITE_ERROR",
            e.to_string(),
        ),
    }
}
