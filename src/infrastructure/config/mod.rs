//! Official preset configuration.
//!
//! A JSON array of scenario/channel bundles sourced from
//! `OFFICIAL_CONFIG_JSON`, with a bundled fallback. Parsed once per load
//! and held behind an explicit reload hook rather than ambient global
//! state; a malformed value degrades to an empty list with a warning.

use std::sync::RwLock;

use serde::{Deserialize, Serialize};

/// Bundled fallback used when the environment provides nothing.
pub const DEFAULT_OFFICIAL_CONFIG_JSON: &str = r#"[
  {
    "apocalypse": "Asteroid Impact",
    "bunker": "Mountain Shelter",
    "voiceChannelId": "123",
    "textChannelId": "456"
  },
  {
    "apocalypse": "Global Pandemic",
    "bunker": "Underground Labs",
    "voiceChannelId": "234",
    "textChannelId": "567"
  },
  {
    "apocalypse": "Solar Flare Catastrophe",
    "bunker": "Polar Research Vault",
    "voiceChannelId": "345",
    "textChannelId": "678"
  },
  {
    "apocalypse": "Alien Invasion",
    "bunker": "Desert Command Center",
    "voiceChannelId": "456",
    "textChannelId": "789"
  },
  {
    "apocalypse": "Global Flood",
    "bunker": "Floating Ark",
    "voiceChannelId": "567",
    "textChannelId": "890"
  },
  {
    "apocalypse": "Nuclear Winter",
    "bunker": "Subterranean Metro Complex",
    "voiceChannelId": "678",
    "textChannelId": "901"
  }
]"#;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficialPreset {
    pub apocalypse: String,
    pub bunker: String,
    pub voice_channel_id: String,
    pub text_channel_id: String,
}

pub struct OfficialPresets {
    presets: RwLock<Vec<OfficialPreset>>,
}

impl OfficialPresets {
    pub fn from_env() -> Self {
        let raw = std::env::var("OFFICIAL_CONFIG_JSON")
            .unwrap_or_else(|_| DEFAULT_OFFICIAL_CONFIG_JSON.to_string());
        Self {
            presets: RwLock::new(Self::parse(&raw)),
        }
    }

    pub fn from_raw(raw: &str) -> Self {
        Self {
            presets: RwLock::new(Self::parse(raw)),
        }
    }

    /// Re-read the environment. Lets operators swap presets without a
    /// process restart.
    pub fn reload(&self) {
        let raw = std::env::var("OFFICIAL_CONFIG_JSON")
            .unwrap_or_else(|_| DEFAULT_OFFICIAL_CONFIG_JSON.to_string());
        let parsed = Self::parse(&raw);
        let mut presets = self
            .presets
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *presets = parsed;
    }

    pub fn get_all(&self) -> Vec<OfficialPreset> {
        self.presets
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn get_by_index(&self, index: usize) -> Option<OfficialPreset> {
        self.presets
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(index)
            .cloned()
    }

    fn parse(raw: &str) -> Vec<OfficialPreset> {
        match serde_json::from_str::<Vec<OfficialPreset>>(raw) {
            Ok(parsed) => parsed,
            Err(error) => {
                tracing::error!(%error, "failed to parse OFFICIAL_CONFIG_JSON");
                Self::log_parsing_hint(raw);
                Vec::new()
            }
        }
    }

    fn log_parsing_hint(raw: &str) {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            tracing::warn!("OFFICIAL_CONFIG_JSON is empty after trimming whitespace");
            return;
        }

        let preview: String = trimmed.chars().take(200).collect();
        tracing::warn!(%preview, "OFFICIAL_CONFIG_JSON value preview");

        if trimmed.contains(':') && !trimmed.contains('"') {
            tracing::warn!(
                "it looks like keys are missing double quotes; correct format: {{\"guildId\": \"123\"}}"
            );
        }
        if trimmed.contains('\\') {
            tracing::warn!(
                "found unexpected backslashes; if using a .env file, drop the escaping and keep plain JSON"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_fallback_parses() {
        let presets = OfficialPresets::from_raw(DEFAULT_OFFICIAL_CONFIG_JSON);
        assert_eq!(presets.get_all().len(), 6);
        assert_eq!(presets.get_by_index(0).unwrap().apocalypse, "Asteroid Impact");
        assert!(presets.get_by_index(99).is_none());
    }

    #[test]
    fn malformed_json_degrades_to_empty_list() {
        let presets = OfficialPresets::from_raw("{not json");
        assert!(presets.get_all().is_empty());
    }
}
