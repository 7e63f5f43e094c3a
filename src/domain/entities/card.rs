use serde::{Deserialize, Serialize};

use crate::domain::value_objects::CardCategory;

/// Flavor-text payload of a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPayload {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CardPayload {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }
}

/// A dealt card. `is_open` transitions false -> true exactly once;
/// re-opening is a no-op returning current state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub player_id: String,
    pub category: CardCategory,
    pub payload: CardPayload,
    pub is_open: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opened_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opened_round: Option<u32>,
}
