use serde::{Deserialize, Serialize};

/// Append-only audit record of a domain mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEvent {
    pub id: String,
    pub game_id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    pub payload: serde_json::Value,
    pub created_at: i64,
}

impl GameEvent {
    pub fn new(game_id: &str, event_type: &str, payload: serde_json::Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            game_id: game_id.to_string(),
            event_type: event_type.to_string(),
            player_id: None,
            payload,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn with_player(mut self, player_id: &str) -> Self {
        self.player_id = Some(player_id.to_string());
        self
    }
}

/// Persisted event type tags.
pub mod event_types {
    pub const GAME_STARTED: &str = "GAME_STARTED";
    pub const ROUND_STARTED: &str = "ROUND_STARTED";
    pub const ROUND_ENDED: &str = "ROUND_ENDED";
    pub const PROFESSIONS_AUTO_OPENED: &str = "PROFESSIONS_AUTO_OPENED";
    pub const CHAR_PRESELECTED: &str = "CHAR_PRESELECTED";
    pub const CHAR_OPENED: &str = "CHAR_OPENED";
    pub const MINUTE_ENQUEUED: &str = "MINUTE_ENQUEUED";
    pub const MINUTE_APPROVED: &str = "MINUTE_APPROVED";
    pub const MINUTE_TIMER: &str = "MINUTE_TIMER";
    pub const VOTING_STARTED: &str = "VOTING_STARTED";
    pub const VOTING_STOPPED: &str = "VOTING_STOPPED";
    pub const VOTE_CAST: &str = "VOTE_CAST";
    pub const REVOTE_STARTED: &str = "REVOTE_STARTED";
    pub const PLAYER_KICKED: &str = "PLAYER_KICKED";
    pub const INVITE_CREATED: &str = "INVITE_CREATED";
    pub const INVITE_ACCEPTED: &str = "INVITE_ACCEPTED";
    pub const ENDING_TRIGGERED: &str = "ENDING_TRIGGERED";
}
