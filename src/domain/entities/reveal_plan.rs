use serde::{Deserialize, Serialize};

use crate::domain::value_objects::CardCategory;

/// Categories a player intends to reveal in a round. Upserted per
/// (game, player, round); opening cards is a separate action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealPlan {
    pub id: String,
    pub game_id: String,
    pub round: u32,
    pub player_id: String,
    pub categories: Vec<CardCategory>,
    pub created_at: i64,
    pub updated_at: i64,
}
