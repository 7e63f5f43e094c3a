use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::application::game::guard::{ensure_round, GuardError};
use crate::domain::entities::{event_types, GameEvent, Vote, VoteSource};
use crate::domain::repositories::{GameRepository, RepositoryError};

/// Lifetime vote tally: count of non-null targets per target player id,
/// across every round of the game. Callers wanting per-round results must
/// filter the vote rows themselves.
pub async fn vote_stats<G: GameRepository>(
    game_repo: &G,
    game_id: &str,
) -> Result<HashMap<String, i64>, RepositoryError> {
    let tally = game_repo.tally_votes(game_id).await?;
    Ok(tally.into_iter().collect())
}

/// Voting phase of a round. Start/stop are advisory signals: they log
/// events but lock nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VotingSignal {
    Start,
    Stop,
}

/// Signal voting use case (start/stop).
pub struct SignalVoting<G: GameRepository> {
    game_repo: Arc<G>,
}

impl<G: GameRepository> SignalVoting<G> {
    pub fn new(game_repo: Arc<G>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(
        &self,
        game_id: &str,
        round: u32,
        signal: VotingSignal,
    ) -> Result<(), VotingError> {
        ensure_round(self.game_repo.as_ref(), game_id, round).await?;

        let event_type = match signal {
            VotingSignal::Start => event_types::VOTING_STARTED,
            VotingSignal::Stop => event_types::VOTING_STOPPED,
        };

        self.game_repo
            .append_event(&GameEvent::new(
                game_id,
                event_type,
                serde_json::json!({ "round": round }),
            ))
            .await?;

        Ok(())
    }
}

/// Cast vote output: the stored row plus the lifetime tally for broadcast.
pub struct CastVoteOutput {
    pub vote: Vote,
    pub stats: HashMap<String, i64>,
}

/// Cast vote use case. One row per (game, round, voter); re-casting
/// overwrites target and source.
pub struct CastVote<G: GameRepository> {
    game_repo: Arc<G>,
}

impl<G: GameRepository> CastVote<G> {
    pub fn new(game_repo: Arc<G>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(
        &self,
        game_id: &str,
        round: u32,
        voter_player_id: &str,
        target_player_id: Option<String>,
        source: VoteSource,
    ) -> Result<CastVoteOutput, VotingError> {
        ensure_round(self.game_repo.as_ref(), game_id, round).await?;

        self.game_repo
            .find_player(game_id, voter_player_id)
            .await?
            .ok_or(VotingError::PlayerNotFound)?;

        if let Some(target_id) = target_player_id.as_deref() {
            self.game_repo
                .find_player(game_id, target_id)
                .await?
                .ok_or(VotingError::PlayerNotFound)?;
        }

        let now = chrono::Utc::now().timestamp_millis();
        let vote = Vote {
            id: Uuid::new_v4().to_string(),
            game_id: game_id.to_string(),
            round,
            voter_player_id: voter_player_id.to_string(),
            target_player_id,
            source,
            created_at: now,
            updated_at: now,
        };

        self.game_repo.upsert_vote(&vote).await?;

        self.game_repo
            .append_event(
                &GameEvent::new(
                    game_id,
                    event_types::VOTE_CAST,
                    serde_json::json!({
                        "round": round,
                        "voterPlayerId": vote.voter_player_id,
                        "targetPlayerId": vote.target_player_id,
                        "source": vote.source,
                    }),
                )
                .with_player(voter_player_id),
            )
            .await?;

        let stats = vote_stats(self.game_repo.as_ref(), game_id).await?;
        Ok(CastVoteOutput { vote, stats })
    }
}

/// Revote output: rows kept, targets cleared.
pub struct RevoteOutput {
    pub cleared: i64,
    pub stats: HashMap<String, i64>,
}

/// Revote use case. Clears every target for the round without deleting the
/// rows; voters must cast again.
pub struct Revote<G: GameRepository> {
    game_repo: Arc<G>,
}

impl<G: GameRepository> Revote<G> {
    pub fn new(game_repo: Arc<G>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(&self, game_id: &str, round: u32) -> Result<RevoteOutput, VotingError> {
        ensure_round(self.game_repo.as_ref(), game_id, round).await?;

        self.game_repo.clear_vote_targets(game_id, round).await?;
        let cleared = self.game_repo.count_votes(game_id, round).await?;

        self.game_repo
            .append_event(&GameEvent::new(
                game_id,
                event_types::REVOTE_STARTED,
                serde_json::json!({ "round": round }),
            ))
            .await?;

        let stats = vote_stats(self.game_repo.as_ref(), game_id).await?;
        Ok(RevoteOutput { cleared, stats })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VotingError {
    #[error("Game not found")]
    GameNotFound,
    #[error("Player not found")]
    PlayerNotFound,
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<GuardError> for VotingError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::GameNotFound => VotingError::GameNotFound,
            GuardError::RoundOutOfReach { .. } => VotingError::Validation(err.to_string()),
            GuardError::Repository(e) => VotingError::Repository(e),
        }
    }
}
