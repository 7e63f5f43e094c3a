use serde::{Deserialize, Serialize};

/// Role granted by an invite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InviteRole {
    CoHost,
    Spectator,
}

impl InviteRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            InviteRole::CoHost => "CO_HOST",
            InviteRole::Spectator => "SPECTATOR",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "CO_HOST" => Some(InviteRole::CoHost),
            "SPECTATOR" => Some(InviteRole::Spectator),
            _ => None,
        }
    }
}

/// Invites expire 15 minutes after issuance.
pub const INVITE_TTL_MS: i64 = 15 * 60 * 1000;

/// A short-lived, single-role, code-based grant of co-host or spectator
/// access. Consumed by exactly one user; re-acceptance by that user is
/// idempotent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invite {
    pub id: String,
    pub game_id: String,
    pub code: String,
    pub role: InviteRole,
    pub expires_at: i64,
    pub used_by_user_id: Option<String>,
    pub created_at: i64,
}

impl Invite {
    pub fn new(id: String, game_id: String, code: String, role: InviteRole) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id,
            game_id,
            code,
            role,
            expires_at: now + INVITE_TTL_MS,
            used_by_user_id: None,
            created_at: now,
        }
    }

    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms > self.expires_at
    }
}

/// Generate a random 8-hex-character invite code.
pub fn generate_invite_code() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"0123456789abcdef";
    let mut rng = rand::thread_rng();
    (0..8)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invite_expires_after_ttl() {
        let invite = Invite::new("i1".into(), "g1".into(), "abcd1234".into(), InviteRole::Spectator);
        assert!(!invite.is_expired(invite.created_at));
        assert!(!invite.is_expired(invite.expires_at));
        assert!(invite.is_expired(invite.expires_at + 1));
    }

    #[test]
    fn invite_codes_are_eight_hex_chars() {
        for _ in 0..50 {
            let code = generate_invite_code();
            assert_eq!(code.len(), 8);
            assert!(code.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }
}
