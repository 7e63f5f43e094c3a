use crate::domain::entities::Game;
use crate::domain::repositories::{GameRepository, RepositoryError};

/// Failures of the shared round guard.
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    #[error("Game not found")]
    GameNotFound,
    #[error("Round {round} is not reachable yet (current round {current})")]
    RoundOutOfReach { round: u32, current: u32 },
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Load the game and check that `round` does not run ahead of its actual
/// progress: acting on any round past `current_round + 1` is rejected.
pub(crate) async fn ensure_round<G: GameRepository>(
    game_repo: &G,
    game_id: &str,
    round: u32,
) -> Result<Game, GuardError> {
    let game = game_repo
        .find_by_id(game_id)
        .await?
        .ok_or(GuardError::GameNotFound)?;

    if round > game.current_round + 1 {
        return Err(GuardError::RoundOutOfReach {
            round,
            current: game.current_round,
        });
    }

    Ok(game)
}
