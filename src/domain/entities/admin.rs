use serde::{Deserialize, Serialize};

/// Admin role within a game. The host is created at game start; co-hosts
/// arrive via invite acceptance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameAdminRole {
    Host,
    CoHost,
}

impl GameAdminRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAdminRole::Host => "HOST",
            GameAdminRole::CoHost => "CO_HOST",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "HOST" => Some(GameAdminRole::Host),
            "CO_HOST" => Some(GameAdminRole::CoHost),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameAdmin {
    pub id: String,
    pub game_id: String,
    pub user_id: String,
    pub role: GameAdminRole,
    pub created_at: i64,
}

impl GameAdmin {
    pub fn new(id: String, game_id: String, user_id: String, role: GameAdminRole) -> Self {
        Self {
            id,
            game_id,
            user_id,
            role,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}
