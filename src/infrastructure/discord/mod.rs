//! Discord REST client.
//!
//! Best-effort side channel: every caller treats failures as log-and-move-on.
//! Without a bot token the client runs in offline mode and every call is a
//! logged no-op, mirroring how the service behaves before the gateway is up.

use serde::Deserialize;
use serde_json::json;

const DISCORD_API_BASE: &str = "https://discord.com/api/v10";

#[derive(Debug, thiserror::Error)]
pub enum DiscordError {
    #[error("discord api error: {status} {body}")]
    Api { status: u16, body: String },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// A member currently sitting in a voice channel.
#[derive(Debug, Clone)]
pub struct VoiceParticipant {
    pub id: String,
    pub nickname: String,
}

#[derive(Debug, Deserialize)]
struct DmChannel {
    id: String,
}

pub struct DiscordClient {
    http: reqwest::Client,
    token: Option<String>,
}

impl DiscordClient {
    pub fn from_env() -> Self {
        let token = std::env::var("DISCORD_BOT_TOKEN").ok().filter(|t| !t.is_empty());
        if token.is_none() {
            tracing::warn!("DISCORD_BOT_TOKEN missing, running in offline mode");
        }
        Self {
            http: reqwest::Client::new(),
            token,
        }
    }

    fn ready(&self) -> bool {
        self.token.is_some()
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.token.as_deref().unwrap_or_default())
    }

    /// Members of a voice channel. Voice membership is only visible over
    /// the gateway, which is an external collaborator here; the REST
    /// client reports an empty list so callers fall back to the persisted
    /// roster.
    pub async fn fetch_voice_participants(
        &self,
        voice_channel_id: &str,
    ) -> Vec<VoiceParticipant> {
        if !self.ready() {
            tracing::debug!(voice_channel_id, "discord client offline; returning empty participants");
            return Vec::new();
        }

        tracing::debug!(
            voice_channel_id,
            "voice membership requires a gateway session; returning empty participants"
        );
        Vec::new()
    }

    pub async fn post_to_channel(
        &self,
        channel_id: &str,
        content: &str,
    ) -> Result<(), DiscordError> {
        if !self.ready() {
            tracing::info!(channel_id, length = content.len(), "offline channel post");
            return Ok(());
        }

        let url = format!("{DISCORD_API_BASE}/channels/{channel_id}/messages");
        let response = self
            .http
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(&json!({ "content": content }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(DiscordError::Api { status, body });
        }

        Ok(())
    }

    pub async fn send_direct_message(
        &self,
        discord_user_id: &str,
        content: &str,
    ) -> Result<(), DiscordError> {
        if !self.ready() {
            tracing::info!(
                target_id = discord_user_id,
                length = content.len(),
                "offline DM send"
            );
            return Ok(());
        }

        // DMs go through a per-recipient channel created on demand.
        let url = format!("{DISCORD_API_BASE}/users/@me/channels");
        let response = self
            .http
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(&json!({ "recipient_id": discord_user_id }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(DiscordError::Api { status, body });
        }

        let channel: DmChannel = response.json().await?;
        self.post_to_channel(&channel.id, content).await
    }
}
