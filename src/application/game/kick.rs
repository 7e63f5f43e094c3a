use std::sync::Arc;

use crate::domain::entities::{event_types, GameEvent, Player, PlayerStatus};
use crate::domain::repositories::{GameRepository, RepositoryError};

/// Kick player use case. Sets status to OUT; cards, votes and history are
/// kept and there is no way back in.
pub struct KickPlayer<G: GameRepository> {
    game_repo: Arc<G>,
}

impl<G: GameRepository> KickPlayer<G> {
    pub fn new(game_repo: Arc<G>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(&self, game_id: &str, player_id: &str) -> Result<Player, KickPlayerError> {
        self.game_repo
            .find_by_id(game_id)
            .await?
            .ok_or(KickPlayerError::GameNotFound)?;

        let mut player = self
            .game_repo
            .find_player(game_id, player_id)
            .await?
            .ok_or(KickPlayerError::PlayerNotFound)?;

        self.game_repo
            .set_player_status(player_id, PlayerStatus::Out)
            .await?;
        player.status = PlayerStatus::Out;

        self.game_repo
            .append_event(
                &GameEvent::new(
                    game_id,
                    event_types::PLAYER_KICKED,
                    serde_json::json!({
                        "playerId": player_id,
                        "nickname": player.nickname,
                    }),
                )
                .with_player(player_id),
            )
            .await?;

        Ok(player)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum KickPlayerError {
    #[error("Game not found")]
    GameNotFound,
    #[error("Player not found")]
    PlayerNotFound,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
