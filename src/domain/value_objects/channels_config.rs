use serde::{Deserialize, Serialize};

/// Discord channel wiring for a lobby. Empty for web-only lobbies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_channel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_channel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub official_preset_index: Option<usize>,
}
