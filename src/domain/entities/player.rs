use serde::{Deserialize, Serialize};

/// Player status. ALIVE -> OUT is one-directional (kick).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerStatus {
    Alive,
    Out,
}

impl PlayerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerStatus::Alive => "ALIVE",
            PlayerStatus::Out => "OUT",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ALIVE" => Some(PlayerStatus::Alive),
            "OUT" => Some(PlayerStatus::Out),
            _ => None,
        }
    }
}

/// Player role. Spectators are appended post-creation via invite
/// acceptance, never dealt cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerRole {
    Player,
    Spectator,
}

impl PlayerRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerRole::Player => "PLAYER",
            PlayerRole::Spectator => "SPECTATOR",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PLAYER" => Some(PlayerRole::Player),
            "SPECTATOR" => Some(PlayerRole::Spectator),
            _ => None,
        }
    }
}

/// Spectator seat numbers start past this offset so they never collide
/// with dealt seats.
pub const SPECTATOR_NUMBER_OFFSET: i64 = 1000;

/// In-game player entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub game_id: String,
    pub number: i64,
    pub nickname: String,
    pub discord_id: Option<String>,
    pub status: PlayerStatus,
    pub role: PlayerRole,
}
