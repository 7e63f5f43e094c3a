use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;

use crate::api::routes::game::{broadcast_public_state, map_invite_error, AcceptInviteResponse};
use crate::api::routes::ErrorResponse;
use crate::api::AppState;
use crate::application::game::AcceptInvite;
use crate::domain::entities::InviteRole;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptInviteRequest {
    pub user_id: String,
    pub nickname: String,
}

/// POST /api/invites/:code/accept
pub async fn accept_invite(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    Json(body): Json<AcceptInviteRequest>,
) -> Result<Json<AcceptInviteResponse>, (StatusCode, Json<ErrorResponse>)> {
    let use_case = AcceptInvite::new(state.game_repo.clone());
    let output = use_case
        .execute(&code, &body.user_id, &body.nickname)
        .await
        .map_err(map_invite_error)?;

    // A new spectator changes the public roster.
    if output.role == InviteRole::Spectator {
        broadcast_public_state(&state, &output.game_id).await;
    }

    Ok(Json(AcceptInviteResponse::from_output(output)))
}
