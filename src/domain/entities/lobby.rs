use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{CategoryToggles, ChannelsConfig};

/// Lobby mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LobbyMode {
    Official,
    Custom,
    Web,
}

impl LobbyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LobbyMode::Official => "OFFICIAL",
            LobbyMode::Custom => "CUSTOM",
            LobbyMode::Web => "WEB",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "OFFICIAL" => Some(LobbyMode::Official),
            "CUSTOM" => Some(LobbyMode::Custom),
            "WEB" => Some(LobbyMode::Web),
            _ => None,
        }
    }
}

/// Lobby entity. Pre-game configuration; immutable once a game exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lobby {
    pub id: String,
    pub mode: LobbyMode,
    pub rounds: u32,
    pub minute_duration_sec: u32,
    pub enabled_categories: CategoryToggles,
    pub channels_config: ChannelsConfig,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Lobby {
    pub fn new(
        id: String,
        mode: LobbyMode,
        rounds: u32,
        minute_duration_sec: u32,
        enabled_categories: CategoryToggles,
        channels_config: ChannelsConfig,
    ) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id,
            mode,
            rounds,
            minute_duration_sec,
            enabled_categories,
            channels_config,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Roster entry attached to a lobby. The roster is replaced wholesale on
/// each collect/update action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyPlayer {
    pub id: String,
    pub lobby_id: String,
    pub number: i64,
    pub nickname: String,
    pub discord_id: Option<String>,
}
