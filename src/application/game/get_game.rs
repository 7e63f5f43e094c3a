use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entities::{Card, Game, Player};
use crate::domain::repositories::{GameRepository, RepositoryError};

/// A player with their dealt cards.
pub struct PlayerWithCards {
    pub player: Player,
    pub cards: Vec<Card>,
}

/// Full game view: seat-ordered players with all cards.
pub struct GameDetails {
    pub game: Game,
    pub players: Vec<PlayerWithCards>,
}

/// Get game use case
pub struct GetGame<G: GameRepository> {
    game_repo: Arc<G>,
}

impl<G: GameRepository> GetGame<G> {
    pub fn new(game_repo: Arc<G>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(&self, game_id: &str) -> Result<GameDetails, GetGameError> {
        let game = self
            .game_repo
            .find_by_id(game_id)
            .await?
            .ok_or(GetGameError::GameNotFound)?;

        let players = self.game_repo.get_players(game_id).await?;
        let cards = self.game_repo.get_cards(game_id).await?;

        let mut by_player: HashMap<String, Vec<Card>> = HashMap::new();
        for card in cards {
            by_player.entry(card.player_id.clone()).or_default().push(card);
        }

        let players = players
            .into_iter()
            .map(|player| {
                let cards = by_player.remove(&player.id).unwrap_or_default();
                PlayerWithCards { player, cards }
            })
            .collect();

        Ok(GameDetails { game, players })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GetGameError {
    #[error("Game not found")]
    GameNotFound,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
