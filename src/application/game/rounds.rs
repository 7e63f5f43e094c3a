use std::sync::Arc;

use crate::application::game::guard::{ensure_round, GuardError};
use crate::domain::entities::{event_types, Game, GameEvent};
use crate::domain::repositories::{GameRepository, RepositoryError};
use crate::domain::value_objects::CardCategory;

/// Start round output. `auto_opened_player_ids` is non-empty only for the
/// round-1 Profession auto-reveal.
pub struct StartRoundOutput {
    pub game: Game,
    pub auto_opened_player_ids: Vec<String>,
}

/// Start round use case. Rounds only move forward.
pub struct StartRound<G: GameRepository> {
    game_repo: Arc<G>,
}

impl<G: GameRepository> StartRound<G> {
    pub fn new(game_repo: Arc<G>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(&self, game_id: &str, round: u32) -> Result<StartRoundOutput, RoundError> {
        let mut game = self
            .game_repo
            .find_by_id(game_id)
            .await?
            .ok_or(RoundError::GameNotFound)?;

        if round <= game.current_round {
            return Err(RoundError::Validation(format!(
                "Round {} already reached",
                round
            )));
        }

        self.game_repo.set_current_round(game_id, round).await?;
        game.current_round = round;

        self.game_repo
            .append_event(&GameEvent::new(
                game_id,
                event_types::ROUND_STARTED,
                serde_json::json!({ "round": round }),
            ))
            .await?;

        // Round 1 opens every still-hidden Profession card game-wide and
        // records the reveal as its own event type, distinct from manual
        // opens.
        let mut auto_opened_player_ids = Vec::new();
        if round == 1 {
            let hidden = self
                .game_repo
                .find_unopened_by_category(game_id, CardCategory::Profession)
                .await?;

            let now = chrono::Utc::now().timestamp_millis();
            for card in &hidden {
                self.game_repo.mark_card_open(&card.id, now, round).await?;
                auto_opened_player_ids.push(card.player_id.clone());
            }

            self.game_repo
                .append_event(&GameEvent::new(
                    game_id,
                    event_types::PROFESSIONS_AUTO_OPENED,
                    serde_json::json!({
                        "round": round,
                        "playerIds": auto_opened_player_ids,
                    }),
                ))
                .await?;
        }

        Ok(StartRoundOutput {
            game,
            auto_opened_player_ids,
        })
    }
}

/// End round use case. Purely an audit record; no state beyond the log.
pub struct EndRound<G: GameRepository> {
    game_repo: Arc<G>,
}

impl<G: GameRepository> EndRound<G> {
    pub fn new(game_repo: Arc<G>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(&self, game_id: &str, round: u32) -> Result<Game, RoundError> {
        let game = ensure_round(self.game_repo.as_ref(), game_id, round).await?;

        self.game_repo
            .append_event(&GameEvent::new(
                game_id,
                event_types::ROUND_ENDED,
                serde_json::json!({ "round": round }),
            ))
            .await?;

        Ok(game)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RoundError {
    #[error("Game not found")]
    GameNotFound,
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<GuardError> for RoundError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::GameNotFound => RoundError::GameNotFound,
            GuardError::RoundOutOfReach { .. } => RoundError::Validation(err.to_string()),
            GuardError::Repository(e) => RoundError::Repository(e),
        }
    }
}
