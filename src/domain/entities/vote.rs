use serde::{Deserialize, Serialize};

/// Where a vote was cast from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoteSource {
    Web,
    Discord,
}

impl VoteSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteSource::Web => "WEB",
            VoteSource::Discord => "DISCORD",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "WEB" => Some(VoteSource::Web),
            "DISCORD" => Some(VoteSource::Discord),
            _ => None,
        }
    }
}

/// One row per (game, round, voter), upserted on cast. A revote nulls the
/// target without deleting the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: String,
    pub game_id: String,
    pub round: u32,
    pub voter_player_id: String,
    pub target_player_id: Option<String>,
    pub source: VoteSource,
    pub created_at: i64,
    pub updated_at: i64,
}
