use async_trait::async_trait;

use crate::domain::entities::{Lobby, LobbyPlayer};
use crate::domain::repositories::RepositoryError;

/// Lobby repository trait
#[async_trait]
pub trait LobbyRepository: Send + Sync {
    /// Persist a new lobby.
    async fn create(&self, lobby: &Lobby) -> Result<(), RepositoryError>;

    /// Find lobby by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<Lobby>, RepositoryError>;

    /// Roster in ascending seat order.
    async fn get_players(&self, lobby_id: &str) -> Result<Vec<LobbyPlayer>, RepositoryError>;

    /// Replace the roster wholesale.
    async fn replace_players(
        &self,
        lobby_id: &str,
        players: &[LobbyPlayer],
    ) -> Result<(), RepositoryError>;

    /// Id of the game started from this lobby, if any.
    async fn find_game_id(&self, lobby_id: &str) -> Result<Option<String>, RepositoryError>;
}
