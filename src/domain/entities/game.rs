use serde::{Deserialize, Serialize};

/// A started play-through. Scenario and seat count are fixed at creation;
/// only `current_round` and `ending` mutate afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: String,
    pub lobby_id: String,
    pub apocalypse: String,
    pub bunker: String,
    pub seats: u32,
    pub current_round: u32,
    pub is_spectators_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ending: Option<serde_json::Value>,
    pub created_at: i64,
}

impl Game {
    pub fn new(id: String, lobby_id: String, apocalypse: String, bunker: String, seats: u32) -> Self {
        Self {
            id,
            lobby_id,
            apocalypse,
            bunker,
            seats,
            current_round: 0,
            is_spectators_enabled: true,
            ending: None,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn has_ended(&self) -> bool {
        self.ending.is_some()
    }
}
