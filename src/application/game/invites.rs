use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::{
    event_types, generate_invite_code, GameAdmin, GameAdminRole, GameEvent, Invite, InviteRole,
    Player, PlayerRole, PlayerStatus, SPECTATOR_NUMBER_OFFSET,
};
use crate::domain::repositories::{GameRepository, RepositoryError};

/// Create invite use case. Codes are 8 hex characters and expire 15
/// minutes after issuance.
pub struct CreateInvite<G: GameRepository> {
    game_repo: Arc<G>,
}

impl<G: GameRepository> CreateInvite<G> {
    pub fn new(game_repo: Arc<G>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(&self, game_id: &str, role: InviteRole) -> Result<Invite, InviteError> {
        self.game_repo
            .find_by_id(game_id)
            .await?
            .ok_or(InviteError::GameNotFound)?;

        let invite = Invite::new(
            Uuid::new_v4().to_string(),
            game_id.to_string(),
            generate_invite_code(),
            role,
        );

        self.game_repo.insert_invite(&invite).await?;

        self.game_repo
            .append_event(&GameEvent::new(
                game_id,
                event_types::INVITE_CREATED,
                serde_json::json!({
                    "role": invite.role,
                    "expiresAt": invite.expires_at,
                }),
            ))
            .await?;

        Ok(invite)
    }
}

/// Accept invite output. `player_id` is set for spectator invites.
pub struct AcceptInviteOutput {
    pub game_id: String,
    pub role: InviteRole,
    pub player_id: Option<String>,
}

/// Accept invite use case. One consuming user per code; the same user may
/// re-accept idempotently.
pub struct AcceptInvite<G: GameRepository> {
    game_repo: Arc<G>,
}

impl<G: GameRepository> AcceptInvite<G> {
    pub fn new(game_repo: Arc<G>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(
        &self,
        code: &str,
        user_id: &str,
        nickname: &str,
    ) -> Result<AcceptInviteOutput, InviteError> {
        let invite = self
            .game_repo
            .find_invite_by_code(code)
            .await?
            .ok_or(InviteError::InviteNotFound)?;

        let now = chrono::Utc::now().timestamp_millis();
        if invite.is_expired(now) {
            return Err(InviteError::Validation("Invite expired".into()));
        }

        match invite.used_by_user_id.as_deref() {
            Some(used_by) if used_by != user_id => {
                return Err(InviteError::Validation(
                    "Invite already used by another user".into(),
                ));
            }
            _ => {}
        }

        let game = self
            .game_repo
            .find_by_id(&invite.game_id)
            .await?
            .ok_or(InviteError::GameNotFound)?;

        let first_acceptance = invite.used_by_user_id.is_none();

        let player_id = match invite.role {
            InviteRole::CoHost => {
                // Upsert keeps the role pinned to co-host even on repeats.
                let admin = GameAdmin::new(
                    Uuid::new_v4().to_string(),
                    game.id.clone(),
                    user_id.to_string(),
                    GameAdminRole::CoHost,
                );
                self.game_repo.upsert_admin(&admin).await?;
                None
            }
            InviteRole::Spectator => {
                if !game.is_spectators_enabled {
                    return Err(InviteError::Validation(
                        "Spectators are disabled for this game".into(),
                    ));
                }

                let existing = self.game_repo.find_spectator(&game.id, user_id).await?;
                match existing {
                    Some(player) => Some(player.id),
                    None => {
                        let count = self.game_repo.count_spectators(&game.id).await?;
                        let player = Player {
                            id: Uuid::new_v4().to_string(),
                            game_id: game.id.clone(),
                            number: SPECTATOR_NUMBER_OFFSET + count + 1,
                            nickname: nickname.to_string(),
                            discord_id: Some(user_id.to_string()),
                            status: PlayerStatus::Alive,
                            role: PlayerRole::Spectator,
                        };
                        self.game_repo.insert_player(&player).await?;
                        Some(player.id)
                    }
                }
            }
        };

        if first_acceptance {
            self.game_repo.set_invite_used(&invite.id, user_id).await?;

            self.game_repo
                .append_event(&GameEvent::new(
                    &game.id,
                    event_types::INVITE_ACCEPTED,
                    serde_json::json!({
                        "role": invite.role,
                        "userId": user_id,
                        "playerId": player_id,
                    }),
                ))
                .await?;
        }

        Ok(AcceptInviteOutput {
            game_id: game.id,
            role: invite.role,
            player_id,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InviteError {
    #[error("Game not found")]
    GameNotFound,
    #[error("Invite not found")]
    InviteNotFound,
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
