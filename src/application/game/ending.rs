use std::sync::Arc;

use crate::domain::entities::{event_types, Game, GameEvent};
use crate::domain::repositories::{GameRepository, LobbyRepository, RepositoryError};
use crate::domain::services::card_pool::ENDING_POOL;
use crate::domain::services::seed::{
    draw_index, lobby_seed_material, seeded_rng, ENDING_SEED_SUFFIX,
};
use crate::infrastructure::discord::DiscordClient;

/// Trigger ending use case. Set-once; the chosen ending derives from the
/// lobby seed with a suffix, so it is fixed per lobby and independent of
/// how many draws the deal consumed.
pub struct TriggerEnding<L: LobbyRepository, G: GameRepository> {
    lobby_repo: Arc<L>,
    game_repo: Arc<G>,
    discord: Arc<DiscordClient>,
}

impl<L: LobbyRepository, G: GameRepository> TriggerEnding<L, G> {
    pub fn new(lobby_repo: Arc<L>, game_repo: Arc<G>, discord: Arc<DiscordClient>) -> Self {
        Self {
            lobby_repo,
            game_repo,
            discord,
        }
    }

    pub async fn execute(&self, game_id: &str) -> Result<Game, TriggerEndingError> {
        let mut game = self
            .game_repo
            .find_by_id(game_id)
            .await?
            .ok_or(TriggerEndingError::GameNotFound)?;

        if game.has_ended() {
            return Err(TriggerEndingError::Validation(
                "Ending already triggered".into(),
            ));
        }

        let lobby = self
            .lobby_repo
            .find_by_id(&game.lobby_id)
            .await?
            .ok_or(TriggerEndingError::LobbyNotFound)?;

        let material = format!("{}{}", lobby_seed_material(&lobby), ENDING_SEED_SUFFIX);
        let mut rng = seeded_rng(&material);
        let text = ENDING_POOL[draw_index(&mut rng, ENDING_POOL.len())];

        let ending = serde_json::json!({ "title": text });
        self.game_repo.set_ending(game_id, &ending).await?;
        game.ending = Some(ending.clone());

        self.game_repo
            .append_event(&GameEvent::new(
                game_id,
                event_types::ENDING_TRIGGERED,
                serde_json::json!({ "ending": ending }),
            ))
            .await?;

        if let Some(text_channel_id) = lobby.channels_config.text_channel_id.as_deref() {
            if let Err(error) = self
                .discord
                .post_to_channel(text_channel_id, &format!("**Ending**: {}", text))
                .await
            {
                tracing::warn!(%error, game_id, "failed to post ending to channel");
            }
        }

        Ok(game)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TriggerEndingError {
    #[error("Game not found")]
    GameNotFound,
    #[error("Lobby not found")]
    LobbyNotFound,
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
