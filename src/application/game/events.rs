use std::sync::Arc;

use crate::domain::entities::GameEvent;
use crate::domain::repositories::{EventFilter, GameRepository, RepositoryError};

/// Query result page, newest-first. `next_cursor` feeds the next request;
/// None when the page came back short.
pub struct EventPage {
    pub events: Vec<GameEvent>,
    pub next_cursor: Option<String>,
}

/// Query events use case.
pub struct QueryEvents<G: GameRepository> {
    game_repo: Arc<G>,
}

impl<G: GameRepository> QueryEvents<G> {
    pub fn new(game_repo: Arc<G>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(
        &self,
        game_id: &str,
        filter: EventFilter,
    ) -> Result<EventPage, QueryEventsError> {
        self.game_repo
            .find_by_id(game_id)
            .await?
            .ok_or(QueryEventsError::GameNotFound)?;

        let take = filter.take.unwrap_or(50);
        let events = self.game_repo.query_events(game_id, &filter).await?;

        let next_cursor = if events.len() as u32 >= take {
            events.last().map(|event| event.id.clone())
        } else {
            None
        };

        Ok(EventPage {
            events,
            next_cursor,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QueryEventsError {
    #[error("Game not found")]
    GameNotFound,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
