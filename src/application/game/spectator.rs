use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::application::game::voting::vote_stats;
use crate::domain::entities::{CardPayload, PlayerRole, PlayerStatus};
use crate::domain::repositories::{GameRepository, RepositoryError};
use crate::domain::value_objects::CardCategory;

/// One opened card as exposed to spectators.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenedCardView {
    pub category: CardCategory,
    pub payload: CardPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opened_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opened_round: Option<u32>,
}

/// A player as exposed to spectators: opened cards only.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicPlayerView {
    pub id: String,
    pub number: i64,
    pub nickname: String,
    pub status: PlayerStatus,
    pub role: PlayerRole,
    pub opened_cards: Vec<OpenedCardView>,
}

/// Read-only derived projection for spectators: opened cards, lifetime
/// vote tallies and the ending if present.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GamePublicState {
    pub id: String,
    pub apocalypse: String,
    pub bunker: String,
    pub seats: u32,
    pub current_round: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ending: Option<serde_json::Value>,
    pub players: Vec<PublicPlayerView>,
    pub votes: HashMap<String, i64>,
    pub updated_at: i64,
}

/// Get public state use case. Refused while the game has spectators
/// disabled.
pub struct GetPublicState<G: GameRepository> {
    game_repo: Arc<G>,
}

impl<G: GameRepository> GetPublicState<G> {
    pub fn new(game_repo: Arc<G>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(&self, game_id: &str) -> Result<GamePublicState, PublicStateError> {
        let game = self
            .game_repo
            .find_by_id(game_id)
            .await?
            .ok_or(PublicStateError::GameNotFound)?;

        if !game.is_spectators_enabled {
            return Err(PublicStateError::Validation(
                "Spectators are disabled for this game".into(),
            ));
        }

        let players = self.game_repo.get_players(game_id).await?;
        let cards = self.game_repo.get_cards(game_id).await?;

        let mut opened_by_player: HashMap<String, Vec<OpenedCardView>> = HashMap::new();
        for card in cards.into_iter().filter(|card| card.is_open) {
            opened_by_player
                .entry(card.player_id.clone())
                .or_default()
                .push(OpenedCardView {
                    category: card.category,
                    payload: card.payload,
                    opened_at: card.opened_at,
                    opened_round: card.opened_round,
                });
        }

        let players = players
            .into_iter()
            .map(|player| {
                let opened_cards = opened_by_player.remove(&player.id).unwrap_or_default();
                PublicPlayerView {
                    id: player.id,
                    number: player.number,
                    nickname: player.nickname,
                    status: player.status,
                    role: player.role,
                    opened_cards,
                }
            })
            .collect();

        let votes = vote_stats(self.game_repo.as_ref(), game_id).await?;

        Ok(GamePublicState {
            id: game.id,
            apocalypse: game.apocalypse,
            bunker: game.bunker,
            seats: game.seats,
            current_round: game.current_round,
            ending: game.ending,
            players,
            votes,
            updated_at: chrono::Utc::now().timestamp_millis(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PublicStateError {
    #[error("Game not found")]
    GameNotFound,
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
