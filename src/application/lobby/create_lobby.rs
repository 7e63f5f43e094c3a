use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::{Lobby, LobbyMode};
use crate::domain::repositories::{LobbyRepository, RepositoryError};
use crate::domain::value_objects::{CardCategory, CategoryToggles, ChannelsConfig};
use crate::infrastructure::config::OfficialPresets;

/// Create lobby input
pub struct CreateLobbyInput {
    pub mode: String,
    pub rounds: u32,
    pub minute_duration_sec: u32,
    pub enabled_categories: Option<HashMap<CardCategory, bool>>,
    pub channels_config: Option<ChannelsConfig>,
}

/// Create lobby use case
pub struct CreateLobby<L: LobbyRepository> {
    lobby_repo: Arc<L>,
    presets: Arc<OfficialPresets>,
}

impl<L: LobbyRepository> CreateLobby<L> {
    pub fn new(lobby_repo: Arc<L>, presets: Arc<OfficialPresets>) -> Self {
        Self {
            lobby_repo,
            presets,
        }
    }

    pub async fn execute(&self, input: CreateLobbyInput) -> Result<Lobby, CreateLobbyError> {
        let mode = LobbyMode::from_str(&input.mode)
            .ok_or_else(|| CreateLobbyError::Validation("Invalid lobby mode".into()))?;

        if input.rounds == 0 {
            return Err(CreateLobbyError::Validation("Rounds must be positive".into()));
        }
        if input.minute_duration_sec == 0 {
            return Err(CreateLobbyError::Validation(
                "Minute duration must be positive".into(),
            ));
        }

        let enabled_categories = CategoryToggles::normalize(input.enabled_categories.as_ref());
        let mut channels = input.channels_config.unwrap_or_default();

        // Official lobbies inherit their channels from a preset bundle.
        if mode == LobbyMode::Official {
            let preset_index = channels.official_preset_index.unwrap_or(0);
            if let Some(preset) = self.presets.get_by_index(preset_index) {
                channels.voice_channel_id = Some(preset.voice_channel_id);
                channels.text_channel_id = Some(preset.text_channel_id);
                channels.official_preset_index = Some(preset_index);
            }
        }

        let lobby = Lobby::new(
            Uuid::new_v4().to_string(),
            mode,
            input.rounds,
            input.minute_duration_sec,
            enabled_categories,
            channels,
        );

        self.lobby_repo.create(&lobby).await?;

        Ok(lobby)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CreateLobbyError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
