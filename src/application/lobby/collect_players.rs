use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::LobbyPlayer;
use crate::domain::repositories::{LobbyRepository, RepositoryError};
use crate::infrastructure::discord::DiscordClient;

/// Collect players use case. Pulls the configured voice channel's current
/// occupants into the roster; with no participants (offline client,
/// web-only lobby) the persisted roster is returned unchanged.
pub struct CollectPlayers<L: LobbyRepository> {
    lobby_repo: Arc<L>,
    discord: Arc<DiscordClient>,
}

impl<L: LobbyRepository> CollectPlayers<L> {
    pub fn new(lobby_repo: Arc<L>, discord: Arc<DiscordClient>) -> Self {
        Self {
            lobby_repo,
            discord,
        }
    }

    pub async fn execute(&self, lobby_id: &str) -> Result<Vec<LobbyPlayer>, CollectPlayersError> {
        let lobby = self
            .lobby_repo
            .find_by_id(lobby_id)
            .await?
            .ok_or(CollectPlayersError::LobbyNotFound)?;

        let participants = match lobby.channels_config.voice_channel_id.as_deref() {
            Some(voice_channel_id) => self.discord.fetch_voice_participants(voice_channel_id).await,
            None => Vec::new(),
        };

        if participants.is_empty() {
            return Ok(self.lobby_repo.get_players(lobby_id).await?);
        }

        let mut fallback_number: i64 = 1;
        let players: Vec<LobbyPlayer> = participants
            .into_iter()
            .map(|participant| {
                let (number, nickname) = match parse_numbered_nickname(&participant.nickname) {
                    Some(parsed) => parsed,
                    None => {
                        let number = fallback_number;
                        fallback_number += 1;
                        (number, participant.nickname.clone())
                    }
                };
                LobbyPlayer {
                    id: Uuid::new_v4().to_string(),
                    lobby_id: lobby_id.to_string(),
                    number,
                    nickname,
                    discord_id: Some(participant.id),
                }
            })
            .collect();

        self.lobby_repo.replace_players(lobby_id, &players).await?;

        Ok(self.lobby_repo.get_players(lobby_id).await?)
    }
}

/// Nicknames of the form "<number> <name>" carry their seat number; the
/// remainder becomes the display name.
fn parse_numbered_nickname(nickname: &str) -> Option<(i64, String)> {
    let digits: String = nickname.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let number = digits.parse::<i64>().ok()?;
    let rest = nickname[digits.len()..].trim();
    let name = if rest.is_empty() { nickname } else { rest };
    Some((number, name.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum CollectPlayersError {
    #[error("Lobby not found")]
    LobbyNotFound,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_nicknames_are_split() {
        assert_eq!(parse_numbered_nickname("3 Alice"), Some((3, "Alice".into())));
        assert_eq!(parse_numbered_nickname("12Bob"), Some((12, "Bob".into())));
        assert_eq!(parse_numbered_nickname("7"), Some((7, "7".into())));
    }

    #[test]
    fn unnumbered_nicknames_fall_through() {
        assert_eq!(parse_numbered_nickname("Alice"), None);
        assert_eq!(parse_numbered_nickname(""), None);
    }
}
