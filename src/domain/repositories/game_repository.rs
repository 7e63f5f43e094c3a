use async_trait::async_trait;

use crate::domain::entities::{
    Card, Game, GameAdmin, GameEvent, Invite, MinuteRequest, Player, PlayerStatus, RevealPlan,
    Vote,
};
use crate::domain::repositories::RepositoryError;
use crate::domain::value_objects::CardCategory;

/// Filters for the event query. `cursor` is the id of the last event the
/// caller has seen; results continue strictly after it, newest-first.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub event_type: Option<String>,
    pub player_id: Option<String>,
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub take: Option<u32>,
    pub cursor: Option<String>,
}

/// Game repository trait
#[async_trait]
pub trait GameRepository: Send + Sync {
    // ========== Game lifecycle ==========

    /// Create game, players, cards, optional host admin and the initial
    /// event in one transaction. All-or-nothing; a unique-constraint
    /// violation on the lobby reference surfaces as `AlreadyExists`.
    async fn create_game(
        &self,
        game: &Game,
        players: &[(Player, Vec<Card>)],
        host_admin: Option<&GameAdmin>,
        started_event: &GameEvent,
    ) -> Result<(), RepositoryError>;

    /// Find game by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<Game>, RepositoryError>;

    /// Advance the round counter.
    async fn set_current_round(&self, game_id: &str, round: u32) -> Result<(), RepositoryError>;

    /// Persist the ending payload (set once).
    async fn set_ending(
        &self,
        game_id: &str,
        ending: &serde_json::Value,
    ) -> Result<(), RepositoryError>;

    // ========== Players ==========

    /// Players in ascending seat order.
    async fn get_players(&self, game_id: &str) -> Result<Vec<Player>, RepositoryError>;

    async fn find_player(
        &self,
        game_id: &str,
        player_id: &str,
    ) -> Result<Option<Player>, RepositoryError>;

    async fn insert_player(&self, player: &Player) -> Result<(), RepositoryError>;

    async fn set_player_status(
        &self,
        player_id: &str,
        status: PlayerStatus,
    ) -> Result<(), RepositoryError>;

    async fn count_spectators(&self, game_id: &str) -> Result<i64, RepositoryError>;

    /// Spectator row for an external identity, if one exists.
    async fn find_spectator(
        &self,
        game_id: &str,
        discord_id: &str,
    ) -> Result<Option<Player>, RepositoryError>;

    // ========== Cards ==========

    /// All cards of all players of a game.
    async fn get_cards(&self, game_id: &str) -> Result<Vec<Card>, RepositoryError>;

    async fn find_card(
        &self,
        game_id: &str,
        player_id: &str,
        category: CardCategory,
    ) -> Result<Option<Card>, RepositoryError>;

    /// Unopened cards of one category across the whole game.
    async fn find_unopened_by_category(
        &self,
        game_id: &str,
        category: CardCategory,
    ) -> Result<Vec<Card>, RepositoryError>;

    async fn mark_card_open(
        &self,
        card_id: &str,
        opened_at: i64,
        opened_round: u32,
    ) -> Result<(), RepositoryError>;

    // ========== Reveal plans ==========

    /// Upsert on (game, round, player).
    async fn upsert_reveal_plan(&self, plan: &RevealPlan) -> Result<(), RepositoryError>;

    // ========== Votes ==========

    /// Upsert on (game, round, voter).
    async fn upsert_vote(&self, vote: &Vote) -> Result<(), RepositoryError>;

    /// Null all targets for a round, keeping the rows.
    async fn clear_vote_targets(&self, game_id: &str, round: u32) -> Result<(), RepositoryError>;

    async fn count_votes(&self, game_id: &str, round: u32) -> Result<i64, RepositoryError>;

    /// Lifetime tally: non-null targets across the whole game, grouped by
    /// target player id.
    async fn tally_votes(&self, game_id: &str) -> Result<Vec<(String, i64)>, RepositoryError>;

    // ========== Minute queue ==========

    async fn find_minute(
        &self,
        game_id: &str,
        round: u32,
        player_id: &str,
    ) -> Result<Option<MinuteRequest>, RepositoryError>;

    async fn count_minutes(&self, game_id: &str, round: u32) -> Result<i64, RepositoryError>;

    async fn insert_minute(&self, request: &MinuteRequest) -> Result<(), RepositoryError>;

    async fn set_minute_approved(&self, id: &str) -> Result<(), RepositoryError>;

    /// Queue for a round, position ascending.
    async fn list_minutes(
        &self,
        game_id: &str,
        round: u32,
    ) -> Result<Vec<MinuteRequest>, RepositoryError>;

    /// Most recently updated request of a player, any round.
    async fn latest_minute_for_player(
        &self,
        game_id: &str,
        player_id: &str,
    ) -> Result<Option<MinuteRequest>, RepositoryError>;

    /// Most recently updated approved request of the game.
    async fn latest_approved_minute(
        &self,
        game_id: &str,
    ) -> Result<Option<MinuteRequest>, RepositoryError>;

    async fn set_minute_timer(
        &self,
        id: &str,
        started_at: Option<i64>,
        duration_sec: Option<u32>,
    ) -> Result<(), RepositoryError>;

    // ========== Admins & invites ==========

    /// Upsert on (game, user); re-acceptance overwrites the role.
    async fn upsert_admin(&self, admin: &GameAdmin) -> Result<(), RepositoryError>;

    async fn insert_invite(&self, invite: &Invite) -> Result<(), RepositoryError>;

    async fn find_invite_by_code(&self, code: &str) -> Result<Option<Invite>, RepositoryError>;

    async fn set_invite_used(&self, id: &str, user_id: &str) -> Result<(), RepositoryError>;

    // ========== Event log ==========

    async fn append_event(&self, event: &GameEvent) -> Result<(), RepositoryError>;

    /// Newest-first, cursor-paginated.
    async fn query_events(
        &self,
        game_id: &str,
        filter: &EventFilter,
    ) -> Result<Vec<GameEvent>, RepositoryError>;
}
