use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::LobbyPlayer;
use crate::domain::repositories::{LobbyRepository, RepositoryError};

/// One roster entry as supplied by the client.
pub struct RosterEntry {
    pub id: Option<String>,
    pub number: i64,
    pub nickname: String,
    pub discord_id: Option<String>,
}

/// Update players use case. The roster is replaced wholesale.
pub struct UpdatePlayers<L: LobbyRepository> {
    lobby_repo: Arc<L>,
}

impl<L: LobbyRepository> UpdatePlayers<L> {
    pub fn new(lobby_repo: Arc<L>) -> Self {
        Self { lobby_repo }
    }

    pub async fn execute(
        &self,
        lobby_id: &str,
        entries: Vec<RosterEntry>,
    ) -> Result<Vec<LobbyPlayer>, UpdatePlayersError> {
        self.lobby_repo
            .find_by_id(lobby_id)
            .await?
            .ok_or(UpdatePlayersError::LobbyNotFound)?;

        let players: Vec<LobbyPlayer> = entries
            .into_iter()
            .map(|entry| LobbyPlayer {
                id: entry.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
                lobby_id: lobby_id.to_string(),
                number: entry.number,
                nickname: entry.nickname,
                discord_id: entry.discord_id,
            })
            .collect();

        self.lobby_repo.replace_players(lobby_id, &players).await?;

        Ok(self.lobby_repo.get_players(lobby_id).await?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UpdatePlayersError {
    #[error("Lobby not found")]
    LobbyNotFound,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
