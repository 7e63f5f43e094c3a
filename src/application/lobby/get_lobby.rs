use std::sync::Arc;

use crate::domain::entities::{Lobby, LobbyPlayer};
use crate::domain::repositories::{LobbyRepository, RepositoryError};

/// Lobby with its seat-ordered roster and the game started from it, if any.
pub struct LobbyDetails {
    pub lobby: Lobby,
    pub players: Vec<LobbyPlayer>,
    pub game_id: Option<String>,
}

/// Get lobby use case
pub struct GetLobby<L: LobbyRepository> {
    lobby_repo: Arc<L>,
}

impl<L: LobbyRepository> GetLobby<L> {
    pub fn new(lobby_repo: Arc<L>) -> Self {
        Self { lobby_repo }
    }

    pub async fn execute(&self, lobby_id: &str) -> Result<LobbyDetails, GetLobbyError> {
        let lobby = self
            .lobby_repo
            .find_by_id(lobby_id)
            .await?
            .ok_or(GetLobbyError::LobbyNotFound)?;

        let players = self.lobby_repo.get_players(lobby_id).await?;
        let game_id = self.lobby_repo.find_game_id(lobby_id).await?;

        Ok(LobbyDetails {
            lobby,
            players,
            game_id,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GetLobbyError {
    #[error("Lobby not found")]
    LobbyNotFound,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
