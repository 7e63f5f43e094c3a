use std::sync::Arc;

use uuid::Uuid;

use crate::application::game::guard::{ensure_round, GuardError};
use crate::domain::entities::{event_types, GameEvent, MinuteRequest};
use crate::domain::repositories::{GameRepository, LobbyRepository, RepositoryError};

/// Fallback speaking duration when neither the request nor the lobby
/// carries one.
const DEFAULT_MINUTE_DURATION_SEC: u32 = 60;

/// Enqueue output: the request plus the round's full queue for broadcast.
pub struct MinuteQueueOutput {
    pub request: MinuteRequest,
    pub queue: Vec<MinuteRequest>,
    pub created: bool,
}

/// Enqueue minute use case. Idempotent per (game, round, player): a repeat
/// enqueue returns the existing row. Positions grow monotonically and are
/// never reindexed.
pub struct EnqueueMinute<G: GameRepository> {
    game_repo: Arc<G>,
}

impl<G: GameRepository> EnqueueMinute<G> {
    pub fn new(game_repo: Arc<G>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(
        &self,
        game_id: &str,
        round: u32,
        player_id: &str,
    ) -> Result<MinuteQueueOutput, MinuteError> {
        ensure_round(self.game_repo.as_ref(), game_id, round).await?;

        self.game_repo
            .find_player(game_id, player_id)
            .await?
            .ok_or(MinuteError::PlayerNotFound)?;

        if let Some(existing) = self.game_repo.find_minute(game_id, round, player_id).await? {
            let queue = self.game_repo.list_minutes(game_id, round).await?;
            return Ok(MinuteQueueOutput {
                request: existing,
                queue,
                created: false,
            });
        }

        let position = self.game_repo.count_minutes(game_id, round).await? as u32 + 1;
        let now = chrono::Utc::now().timestamp_millis();
        let request = MinuteRequest {
            id: Uuid::new_v4().to_string(),
            game_id: game_id.to_string(),
            round,
            player_id: player_id.to_string(),
            position,
            approved: false,
            started_at: None,
            duration_sec: None,
            created_at: now,
            updated_at: now,
        };

        self.game_repo.insert_minute(&request).await?;

        self.game_repo
            .append_event(
                &GameEvent::new(
                    game_id,
                    event_types::MINUTE_ENQUEUED,
                    serde_json::json!({
                        "round": round,
                        "playerId": player_id,
                        "position": position,
                    }),
                )
                .with_player(player_id),
            )
            .await?;

        let queue = self.game_repo.list_minutes(game_id, round).await?;
        Ok(MinuteQueueOutput {
            request,
            queue,
            created: true,
        })
    }
}

/// Approve minute use case.
pub struct ApproveMinute<G: GameRepository> {
    game_repo: Arc<G>,
}

impl<G: GameRepository> ApproveMinute<G> {
    pub fn new(game_repo: Arc<G>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(
        &self,
        game_id: &str,
        player_id: &str,
        round: u32,
    ) -> Result<MinuteQueueOutput, MinuteError> {
        ensure_round(self.game_repo.as_ref(), game_id, round).await?;

        let mut request = self
            .game_repo
            .find_minute(game_id, round, player_id)
            .await?
            .ok_or(MinuteError::RequestNotFound)?;

        self.game_repo.set_minute_approved(&request.id).await?;
        request.approved = true;

        self.game_repo
            .append_event(
                &GameEvent::new(
                    game_id,
                    event_types::MINUTE_APPROVED,
                    serde_json::json!({
                        "round": round,
                        "playerId": player_id,
                    }),
                )
                .with_player(player_id),
            )
            .await?;

        let queue = self.game_repo.list_minutes(game_id, round).await?;
        Ok(MinuteQueueOutput {
            request,
            queue,
            created: false,
        })
    }
}

/// Timer verbs for a minute request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinuteTimerAction {
    Start,
    Stop,
    Reset,
}

impl MinuteTimerAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            MinuteTimerAction::Start => "start",
            MinuteTimerAction::Stop => "stop",
            MinuteTimerAction::Reset => "reset",
        }
    }
}

/// Timer output: the updated request and its lazily computed remaining
/// seconds (None while stopped).
pub struct MinuteTimerOutput {
    pub request: MinuteRequest,
    pub remaining_sec: Option<i64>,
}

/// Control minute timer use case. Operates on a named player's latest
/// request or, without a player, the most recently updated approved one.
/// The server never ticks; remaining time is derived from `started_at`.
pub struct ControlMinuteTimer<L: LobbyRepository, G: GameRepository> {
    lobby_repo: Arc<L>,
    game_repo: Arc<G>,
}

impl<L: LobbyRepository, G: GameRepository> ControlMinuteTimer<L, G> {
    pub fn new(lobby_repo: Arc<L>, game_repo: Arc<G>) -> Self {
        Self {
            lobby_repo,
            game_repo,
        }
    }

    pub async fn execute(
        &self,
        game_id: &str,
        player_id: Option<&str>,
        action: MinuteTimerAction,
        duration_sec: Option<u32>,
    ) -> Result<MinuteTimerOutput, MinuteError> {
        let game = self
            .game_repo
            .find_by_id(game_id)
            .await?
            .ok_or(MinuteError::GameNotFound)?;

        let mut request = match player_id {
            Some(player_id) => self
                .game_repo
                .latest_minute_for_player(game_id, player_id)
                .await?,
            None => self.game_repo.latest_approved_minute(game_id).await?,
        }
        .ok_or(MinuteError::RequestNotFound)?;

        let now = chrono::Utc::now().timestamp_millis();

        match action {
            MinuteTimerAction::Start | MinuteTimerAction::Reset => {
                let duration = match duration_sec.or(request.duration_sec) {
                    Some(duration) => duration,
                    None => self.lobby_duration(&game.lobby_id).await?,
                };
                self.game_repo
                    .set_minute_timer(&request.id, Some(now), Some(duration))
                    .await?;
                request.started_at = Some(now);
                request.duration_sec = Some(duration);
            }
            MinuteTimerAction::Stop => {
                // Stopping clears the clock but keeps the duration for the
                // next start.
                self.game_repo
                    .set_minute_timer(&request.id, None, request.duration_sec)
                    .await?;
                request.started_at = None;
            }
        }
        request.updated_at = now;

        self.game_repo
            .append_event(
                &GameEvent::new(
                    game_id,
                    event_types::MINUTE_TIMER,
                    serde_json::json!({
                        "action": action.as_str(),
                        "playerId": request.player_id,
                        "round": request.round,
                        "durationSec": request.duration_sec,
                        "startedAt": request.started_at,
                    }),
                )
                .with_player(&request.player_id),
            )
            .await?;

        let remaining_sec = request.remaining_sec(now);
        Ok(MinuteTimerOutput {
            request,
            remaining_sec,
        })
    }

    async fn lobby_duration(&self, lobby_id: &str) -> Result<u32, MinuteError> {
        let duration = self
            .lobby_repo
            .find_by_id(lobby_id)
            .await?
            .map(|lobby| lobby.minute_duration_sec)
            .filter(|d| *d > 0)
            .unwrap_or(DEFAULT_MINUTE_DURATION_SEC);
        Ok(duration)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MinuteError {
    #[error("Game not found")]
    GameNotFound,
    #[error("Player not found")]
    PlayerNotFound,
    #[error("Minute request not found")]
    RequestNotFound,
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<GuardError> for MinuteError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::GameNotFound => MinuteError::GameNotFound,
            GuardError::RoundOutOfReach { .. } => MinuteError::Validation(err.to_string()),
            GuardError::Repository(e) => MinuteError::Repository(e),
        }
    }
}
