use std::sync::Arc;

use uuid::Uuid;

use crate::application::game::guard::{ensure_round, GuardError};
use crate::domain::entities::{event_types, Card, GameEvent, RevealPlan};
use crate::domain::repositories::{GameRepository, RepositoryError};
use crate::domain::value_objects::CardCategory;

/// Preselect categories use case. Upserts the player's reveal plan for a
/// round; cards stay closed until opened explicitly.
pub struct PreselectCategories<G: GameRepository> {
    game_repo: Arc<G>,
}

impl<G: GameRepository> PreselectCategories<G> {
    pub fn new(game_repo: Arc<G>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(
        &self,
        game_id: &str,
        player_id: &str,
        round: u32,
        categories: Vec<CardCategory>,
    ) -> Result<RevealPlan, RevealError> {
        ensure_round(self.game_repo.as_ref(), game_id, round).await?;

        self.game_repo
            .find_player(game_id, player_id)
            .await?
            .ok_or(RevealError::PlayerNotFound)?;

        let now = chrono::Utc::now().timestamp_millis();
        let plan = RevealPlan {
            id: Uuid::new_v4().to_string(),
            game_id: game_id.to_string(),
            round,
            player_id: player_id.to_string(),
            categories,
            created_at: now,
            updated_at: now,
        };

        self.game_repo.upsert_reveal_plan(&plan).await?;

        self.game_repo
            .append_event(
                &GameEvent::new(
                    game_id,
                    event_types::CHAR_PRESELECTED,
                    serde_json::json!({
                        "round": round,
                        "playerId": player_id,
                        "categories": plan.categories,
                    }),
                )
                .with_player(player_id),
            )
            .await?;

        Ok(plan)
    }
}

/// Open category output. `opened` is false when the card was already open
/// and the call changed nothing.
pub struct OpenCategoryOutput {
    pub card: Card,
    pub opened: bool,
}

/// Open category use case. Idempotent: a second open returns the card
/// as-is without logging.
pub struct OpenCategory<G: GameRepository> {
    game_repo: Arc<G>,
}

impl<G: GameRepository> OpenCategory<G> {
    pub fn new(game_repo: Arc<G>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(
        &self,
        game_id: &str,
        player_id: &str,
        category: CardCategory,
        round: u32,
    ) -> Result<OpenCategoryOutput, RevealError> {
        ensure_round(self.game_repo.as_ref(), game_id, round).await?;

        self.game_repo
            .find_player(game_id, player_id)
            .await?
            .ok_or(RevealError::PlayerNotFound)?;

        let mut card = self
            .game_repo
            .find_card(game_id, player_id, category)
            .await?
            .ok_or(RevealError::CardNotFound)?;

        if card.is_open {
            return Ok(OpenCategoryOutput {
                card,
                opened: false,
            });
        }

        let now = chrono::Utc::now().timestamp_millis();
        self.game_repo.mark_card_open(&card.id, now, round).await?;
        card.is_open = true;
        card.opened_at = Some(now);
        card.opened_round = Some(round);

        self.game_repo
            .append_event(
                &GameEvent::new(
                    game_id,
                    event_types::CHAR_OPENED,
                    serde_json::json!({
                        "round": round,
                        "playerId": player_id,
                        "category": category,
                        "payload": card.payload,
                    }),
                )
                .with_player(player_id),
            )
            .await?;

        Ok(OpenCategoryOutput { card, opened: true })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RevealError {
    #[error("Game not found")]
    GameNotFound,
    #[error("Player not found")]
    PlayerNotFound,
    #[error("Card not found")]
    CardNotFound,
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<GuardError> for RevealError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::GameNotFound => RevealError::GameNotFound,
            GuardError::RoundOutOfReach { .. } => RevealError::Validation(err.to_string()),
            GuardError::Repository(e) => RevealError::Repository(e),
        }
    }
}
