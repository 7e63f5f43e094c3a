use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::entities::{
    Card, CardPayload, Game, GameAdmin, GameEvent, Invite, InviteRole, MinuteRequest, Player,
    PlayerRole, PlayerStatus, RevealPlan, Vote,
};
use crate::domain::repositories::{EventFilter, GameRepository, RepositoryError};
use crate::domain::value_objects::CardCategory;

/// SQLite implementation of GameRepository
pub struct SqliteGameRepository {
    pool: SqlitePool,
}

impl SqliteGameRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn db_err(e: impl std::fmt::Display) -> RepositoryError {
        RepositoryError::Database(e.to_string())
    }

    fn row_to_game(row: &sqlx::sqlite::SqliteRow) -> Game {
        use sqlx::Row;

        let ending_json: Option<String> = row.get("ending");

        Game {
            id: row.get("id"),
            lobby_id: row.get("lobby_id"),
            apocalypse: row.get("apocalypse"),
            bunker: row.get("bunker"),
            seats: row.get::<i64, _>("seats") as u32,
            current_round: row.get::<i64, _>("current_round") as u32,
            is_spectators_enabled: row.get::<i64, _>("spectators_enabled") != 0,
            ending: ending_json.and_then(|json| serde_json::from_str(&json).ok()),
            created_at: row.get("created_at"),
        }
    }

    fn row_to_player(row: &sqlx::sqlite::SqliteRow) -> Player {
        use sqlx::Row;

        let status_str: String = row.get("status");
        let role_str: String = row.get("role");

        Player {
            id: row.get("id"),
            game_id: row.get("game_id"),
            number: row.get("number"),
            nickname: row.get("nickname"),
            discord_id: row.get("discord_id"),
            status: PlayerStatus::from_str(&status_str).unwrap_or(PlayerStatus::Alive),
            role: PlayerRole::from_str(&role_str).unwrap_or(PlayerRole::Player),
        }
    }

    fn row_to_card(row: &sqlx::sqlite::SqliteRow) -> Card {
        use sqlx::Row;

        let category_str: String = row.get("category");
        let payload_json: String = row.get("payload");

        Card {
            id: row.get("id"),
            player_id: row.get("player_id"),
            category: CardCategory::from_str(&category_str).unwrap_or(CardCategory::ExtraInfo),
            payload: serde_json::from_str(&payload_json)
                .unwrap_or_else(|_| CardPayload::titled("Unknown")),
            is_open: row.get::<i64, _>("is_open") != 0,
            opened_at: row.get("opened_at"),
            opened_round: row
                .get::<Option<i64>, _>("opened_round")
                .map(|r| r as u32),
        }
    }

    fn row_to_minute(row: &sqlx::sqlite::SqliteRow) -> MinuteRequest {
        use sqlx::Row;

        MinuteRequest {
            id: row.get("id"),
            game_id: row.get("game_id"),
            round: row.get::<i64, _>("round") as u32,
            player_id: row.get("player_id"),
            position: row.get::<i64, _>("position") as u32,
            approved: row.get::<i64, _>("approved") != 0,
            started_at: row.get("started_at"),
            duration_sec: row
                .get::<Option<i64>, _>("duration_sec")
                .map(|d| d as u32),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    fn row_to_invite(row: &sqlx::sqlite::SqliteRow) -> Invite {
        use sqlx::Row;

        let role_str: String = row.get("role");

        Invite {
            id: row.get("id"),
            game_id: row.get("game_id"),
            code: row.get("code"),
            role: InviteRole::from_str(&role_str).unwrap_or(InviteRole::Spectator),
            expires_at: row.get("expires_at"),
            used_by_user_id: row.get("used_by_user_id"),
            created_at: row.get("created_at"),
        }
    }

    fn row_to_event(row: &sqlx::sqlite::SqliteRow) -> GameEvent {
        use sqlx::Row;

        let payload_json: String = row.get("payload");

        GameEvent {
            id: row.get("id"),
            game_id: row.get("game_id"),
            event_type: row.get("type"),
            player_id: row.get("player_id"),
            payload: serde_json::from_str(&payload_json).unwrap_or(serde_json::Value::Null),
            created_at: row.get("created_at"),
        }
    }
}

#[async_trait]
impl GameRepository for SqliteGameRepository {
    async fn create_game(
        &self,
        game: &Game,
        players: &[(Player, Vec<Card>)],
        host_admin: Option<&GameAdmin>,
        started_event: &GameEvent,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(Self::db_err)?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO games (id, lobby_id, apocalypse, bunker, seats, current_round, spectators_enabled, ending, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, NULL, ?)
            "#,
        )
        .bind(&game.id)
        .bind(&game.lobby_id)
        .bind(&game.apocalypse)
        .bind(&game.bunker)
        .bind(game.seats as i64)
        .bind(game.current_round as i64)
        .bind(game.is_spectators_enabled as i64)
        .bind(game.created_at)
        .execute(&mut *tx)
        .await;

        if let Err(e) = inserted {
            // The UNIQUE(lobby_id) constraint is the authoritative
            // one-game-per-lobby guard; surface its violation distinctly.
            let message = e.to_string();
            return Err(if message.contains("UNIQUE") {
                RepositoryError::AlreadyExists(format!("game for lobby {}", game.lobby_id))
            } else {
                RepositoryError::Database(message)
            });
        }

        for (player, cards) in players {
            sqlx::query(
                "INSERT INTO players (id, game_id, number, nickname, discord_id, status, role) VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&player.id)
            .bind(&game.id)
            .bind(player.number)
            .bind(&player.nickname)
            .bind(&player.discord_id)
            .bind(player.status.as_str())
            .bind(player.role.as_str())
            .execute(&mut *tx)
            .await
            .map_err(Self::db_err)?;

            for card in cards {
                let payload_json =
                    serde_json::to_string(&card.payload).map_err(Self::db_err)?;
                sqlx::query(
                    "INSERT INTO cards (id, player_id, category, payload, is_open) VALUES (?, ?, ?, ?, 0)",
                )
                .bind(&card.id)
                .bind(&player.id)
                .bind(card.category.as_str())
                .bind(&payload_json)
                .execute(&mut *tx)
                .await
                .map_err(Self::db_err)?;
            }
        }

        if let Some(admin) = host_admin {
            sqlx::query(
                "INSERT INTO game_admins (id, game_id, user_id, role, created_at) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&admin.id)
            .bind(&game.id)
            .bind(&admin.user_id)
            .bind(admin.role.as_str())
            .bind(admin.created_at)
            .execute(&mut *tx)
            .await
            .map_err(Self::db_err)?;
        }

        let payload_json =
            serde_json::to_string(&started_event.payload).map_err(Self::db_err)?;
        sqlx::query(
            "INSERT INTO game_events (id, game_id, type, player_id, payload, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&started_event.id)
        .bind(&game.id)
        .bind(&started_event.event_type)
        .bind(&started_event.player_id)
        .bind(&payload_json)
        .bind(started_event.created_at)
        .execute(&mut *tx)
        .await
        .map_err(Self::db_err)?;

        tx.commit().await.map_err(Self::db_err)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Game>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM games WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::db_err)?;

        Ok(row.as_ref().map(Self::row_to_game))
    }

    async fn set_current_round(&self, game_id: &str, round: u32) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE games SET current_round = ? WHERE id = ?")
            .bind(round as i64)
            .bind(game_id)
            .execute(&self.pool)
            .await
            .map_err(Self::db_err)?;

        Ok(())
    }

    async fn set_ending(
        &self,
        game_id: &str,
        ending: &serde_json::Value,
    ) -> Result<(), RepositoryError> {
        let ending_json = serde_json::to_string(ending).map_err(Self::db_err)?;

        sqlx::query("UPDATE games SET ending = ? WHERE id = ?")
            .bind(&ending_json)
            .bind(game_id)
            .execute(&self.pool)
            .await
            .map_err(Self::db_err)?;

        Ok(())
    }

    async fn get_players(&self, game_id: &str) -> Result<Vec<Player>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM players WHERE game_id = ? ORDER BY number ASC")
            .bind(game_id)
            .fetch_all(&self.pool)
            .await
            .map_err(Self::db_err)?;

        Ok(rows.iter().map(Self::row_to_player).collect())
    }

    async fn find_player(
        &self,
        game_id: &str,
        player_id: &str,
    ) -> Result<Option<Player>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM players WHERE game_id = ? AND id = ?")
            .bind(game_id)
            .bind(player_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::db_err)?;

        Ok(row.as_ref().map(Self::row_to_player))
    }

    async fn insert_player(&self, player: &Player) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO players (id, game_id, number, nickname, discord_id, status, role) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&player.id)
        .bind(&player.game_id)
        .bind(player.number)
        .bind(&player.nickname)
        .bind(&player.discord_id)
        .bind(player.status.as_str())
        .bind(player.role.as_str())
        .execute(&self.pool)
        .await
        .map_err(Self::db_err)?;

        Ok(())
    }

    async fn set_player_status(
        &self,
        player_id: &str,
        status: PlayerStatus,
    ) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE players SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(player_id)
            .execute(&self.pool)
            .await
            .map_err(Self::db_err)?;

        Ok(())
    }

    async fn count_spectators(&self, game_id: &str) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM players WHERE game_id = ? AND role = ?",
        )
        .bind(game_id)
        .bind(PlayerRole::Spectator.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(Self::db_err)?;

        Ok(count)
    }

    async fn find_spectator(
        &self,
        game_id: &str,
        discord_id: &str,
    ) -> Result<Option<Player>, RepositoryError> {
        let row = sqlx::query(
            "SELECT * FROM players WHERE game_id = ? AND role = ? AND discord_id = ?",
        )
        .bind(game_id)
        .bind(PlayerRole::Spectator.as_str())
        .bind(discord_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::db_err)?;

        Ok(row.as_ref().map(Self::row_to_player))
    }

    async fn get_cards(&self, game_id: &str) -> Result<Vec<Card>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT c.* FROM cards c
            JOIN players p ON c.player_id = p.id
            WHERE p.game_id = ?
            ORDER BY p.number ASC, c.category ASC
            "#,
        )
        .bind(game_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Self::db_err)?;

        Ok(rows.iter().map(Self::row_to_card).collect())
    }

    async fn find_card(
        &self,
        game_id: &str,
        player_id: &str,
        category: CardCategory,
    ) -> Result<Option<Card>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT c.* FROM cards c
            JOIN players p ON c.player_id = p.id
            WHERE p.game_id = ? AND c.player_id = ? AND c.category = ?
            "#,
        )
        .bind(game_id)
        .bind(player_id)
        .bind(category.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::db_err)?;

        Ok(row.as_ref().map(Self::row_to_card))
    }

    async fn find_unopened_by_category(
        &self,
        game_id: &str,
        category: CardCategory,
    ) -> Result<Vec<Card>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT c.* FROM cards c
            JOIN players p ON c.player_id = p.id
            WHERE p.game_id = ? AND c.category = ? AND c.is_open = 0
            ORDER BY p.number ASC
            "#,
        )
        .bind(game_id)
        .bind(category.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(Self::db_err)?;

        Ok(rows.iter().map(Self::row_to_card).collect())
    }

    async fn mark_card_open(
        &self,
        card_id: &str,
        opened_at: i64,
        opened_round: u32,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE cards SET is_open = 1, opened_at = ?, opened_round = ? WHERE id = ?",
        )
        .bind(opened_at)
        .bind(opened_round as i64)
        .bind(card_id)
        .execute(&self.pool)
        .await
        .map_err(Self::db_err)?;

        Ok(())
    }

    async fn upsert_reveal_plan(&self, plan: &RevealPlan) -> Result<(), RepositoryError> {
        let categories_json =
            serde_json::to_string(&plan.categories).map_err(Self::db_err)?;

        sqlx::query(
            r#"
            INSERT INTO reveal_plans (id, game_id, round, player_id, categories, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(game_id, round, player_id) DO UPDATE SET
                categories = excluded.categories,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&plan.id)
        .bind(&plan.game_id)
        .bind(plan.round as i64)
        .bind(&plan.player_id)
        .bind(&categories_json)
        .bind(plan.created_at)
        .bind(plan.updated_at)
        .execute(&self.pool)
        .await
        .map_err(Self::db_err)?;

        Ok(())
    }

    async fn upsert_vote(&self, vote: &Vote) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO votes (id, game_id, round, voter_player_id, target_player_id, source, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(game_id, round, voter_player_id) DO UPDATE SET
                target_player_id = excluded.target_player_id,
                source = excluded.source,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&vote.id)
        .bind(&vote.game_id)
        .bind(vote.round as i64)
        .bind(&vote.voter_player_id)
        .bind(&vote.target_player_id)
        .bind(vote.source.as_str())
        .bind(vote.created_at)
        .bind(vote.updated_at)
        .execute(&self.pool)
        .await
        .map_err(Self::db_err)?;

        Ok(())
    }

    async fn clear_vote_targets(&self, game_id: &str, round: u32) -> Result<(), RepositoryError> {
        let now = chrono::Utc::now().timestamp_millis();

        sqlx::query(
            "UPDATE votes SET target_player_id = NULL, updated_at = ? WHERE game_id = ? AND round = ?",
        )
        .bind(now)
        .bind(game_id)
        .bind(round as i64)
        .execute(&self.pool)
        .await
        .map_err(Self::db_err)?;

        Ok(())
    }

    async fn count_votes(&self, game_id: &str, round: u32) -> Result<i64, RepositoryError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM votes WHERE game_id = ? AND round = ?")
                .bind(game_id)
                .bind(round as i64)
                .fetch_one(&self.pool)
                .await
                .map_err(Self::db_err)?;

        Ok(count)
    }

    async fn tally_votes(&self, game_id: &str) -> Result<Vec<(String, i64)>, RepositoryError> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT target_player_id, COUNT(*) FROM votes
            WHERE game_id = ? AND target_player_id IS NOT NULL
            GROUP BY target_player_id
            "#,
        )
        .bind(game_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Self::db_err)?;

        Ok(rows)
    }

    async fn find_minute(
        &self,
        game_id: &str,
        round: u32,
        player_id: &str,
    ) -> Result<Option<MinuteRequest>, RepositoryError> {
        let row = sqlx::query(
            "SELECT * FROM minute_requests WHERE game_id = ? AND round = ? AND player_id = ?",
        )
        .bind(game_id)
        .bind(round as i64)
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::db_err)?;

        Ok(row.as_ref().map(Self::row_to_minute))
    }

    async fn count_minutes(&self, game_id: &str, round: u32) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM minute_requests WHERE game_id = ? AND round = ?",
        )
        .bind(game_id)
        .bind(round as i64)
        .fetch_one(&self.pool)
        .await
        .map_err(Self::db_err)?;

        Ok(count)
    }

    async fn insert_minute(&self, request: &MinuteRequest) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO minute_requests (id, game_id, round, player_id, position, approved, started_at, duration_sec, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&request.id)
        .bind(&request.game_id)
        .bind(request.round as i64)
        .bind(&request.player_id)
        .bind(request.position as i64)
        .bind(request.approved as i64)
        .bind(request.started_at)
        .bind(request.duration_sec.map(|d| d as i64))
        .bind(request.created_at)
        .bind(request.updated_at)
        .execute(&self.pool)
        .await
        .map_err(Self::db_err)?;

        Ok(())
    }

    async fn set_minute_approved(&self, id: &str) -> Result<(), RepositoryError> {
        let now = chrono::Utc::now().timestamp_millis();

        sqlx::query("UPDATE minute_requests SET approved = 1, updated_at = ? WHERE id = ?")
            .bind(now)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Self::db_err)?;

        Ok(())
    }

    async fn list_minutes(
        &self,
        game_id: &str,
        round: u32,
    ) -> Result<Vec<MinuteRequest>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM minute_requests WHERE game_id = ? AND round = ? ORDER BY position ASC",
        )
        .bind(game_id)
        .bind(round as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(Self::db_err)?;

        Ok(rows.iter().map(Self::row_to_minute).collect())
    }

    async fn latest_minute_for_player(
        &self,
        game_id: &str,
        player_id: &str,
    ) -> Result<Option<MinuteRequest>, RepositoryError> {
        let row = sqlx::query(
            "SELECT * FROM minute_requests WHERE game_id = ? AND player_id = ? ORDER BY updated_at DESC, created_at DESC LIMIT 1",
        )
        .bind(game_id)
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::db_err)?;

        Ok(row.as_ref().map(Self::row_to_minute))
    }

    async fn latest_approved_minute(
        &self,
        game_id: &str,
    ) -> Result<Option<MinuteRequest>, RepositoryError> {
        let row = sqlx::query(
            "SELECT * FROM minute_requests WHERE game_id = ? AND approved = 1 ORDER BY updated_at DESC, created_at DESC LIMIT 1",
        )
        .bind(game_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::db_err)?;

        Ok(row.as_ref().map(Self::row_to_minute))
    }

    async fn set_minute_timer(
        &self,
        id: &str,
        started_at: Option<i64>,
        duration_sec: Option<u32>,
    ) -> Result<(), RepositoryError> {
        let now = chrono::Utc::now().timestamp_millis();

        sqlx::query(
            "UPDATE minute_requests SET started_at = ?, duration_sec = ?, updated_at = ? WHERE id = ?",
        )
        .bind(started_at)
        .bind(duration_sec.map(|d| d as i64))
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(Self::db_err)?;

        Ok(())
    }

    async fn upsert_admin(&self, admin: &GameAdmin) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO game_admins (id, game_id, user_id, role, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(game_id, user_id) DO UPDATE SET role = excluded.role
            "#,
        )
        .bind(&admin.id)
        .bind(&admin.game_id)
        .bind(&admin.user_id)
        .bind(admin.role.as_str())
        .bind(admin.created_at)
        .execute(&self.pool)
        .await
        .map_err(Self::db_err)?;

        Ok(())
    }

    async fn insert_invite(&self, invite: &Invite) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO invites (id, game_id, code, role, expires_at, used_by_user_id, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&invite.id)
        .bind(&invite.game_id)
        .bind(&invite.code)
        .bind(invite.role.as_str())
        .bind(invite.expires_at)
        .bind(&invite.used_by_user_id)
        .bind(invite.created_at)
        .execute(&self.pool)
        .await
        .map_err(Self::db_err)?;

        Ok(())
    }

    async fn find_invite_by_code(&self, code: &str) -> Result<Option<Invite>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM invites WHERE code = ?")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::db_err)?;

        Ok(row.as_ref().map(Self::row_to_invite))
    }

    async fn set_invite_used(&self, id: &str, user_id: &str) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE invites SET used_by_user_id = ? WHERE id = ?")
            .bind(user_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Self::db_err)?;

        Ok(())
    }

    async fn append_event(&self, event: &GameEvent) -> Result<(), RepositoryError> {
        let payload_json = serde_json::to_string(&event.payload).map_err(Self::db_err)?;

        sqlx::query(
            "INSERT INTO game_events (id, game_id, type, player_id, payload, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&event.id)
        .bind(&event.game_id)
        .bind(&event.event_type)
        .bind(&event.player_id)
        .bind(&payload_json)
        .bind(event.created_at)
        .execute(&self.pool)
        .await
        .map_err(Self::db_err)?;

        Ok(())
    }

    async fn query_events(
        &self,
        game_id: &str,
        filter: &EventFilter,
    ) -> Result<Vec<GameEvent>, RepositoryError> {
        let take = filter.take.unwrap_or(50).min(200);

        // Cursor pagination keys on (created_at, id) of the cursor row so
        // same-millisecond neighbors are not skipped or repeated.
        let mut sql = String::from(
            "SELECT e.* FROM game_events e WHERE e.game_id = ?",
        );
        if filter.event_type.is_some() {
            sql.push_str(" AND e.type = ?");
        }
        if filter.player_id.is_some() {
            sql.push_str(" AND e.player_id = ?");
        }
        if filter.from.is_some() {
            sql.push_str(" AND e.created_at >= ?");
        }
        if filter.to.is_some() {
            sql.push_str(" AND e.created_at <= ?");
        }
        if filter.cursor.is_some() {
            sql.push_str(
                " AND (e.created_at, e.id) < (SELECT c.created_at, c.id FROM game_events c WHERE c.id = ?)",
            );
        }
        sql.push_str(" ORDER BY e.created_at DESC, e.id DESC LIMIT ?");

        let mut query = sqlx::query(&sql).bind(game_id);
        if let Some(event_type) = &filter.event_type {
            query = query.bind(event_type);
        }
        if let Some(player_id) = &filter.player_id {
            query = query.bind(player_id);
        }
        if let Some(from) = filter.from {
            query = query.bind(from);
        }
        if let Some(to) = filter.to {
            query = query.bind(to);
        }
        if let Some(cursor) = &filter.cursor {
            query = query.bind(cursor);
        }
        query = query.bind(take as i64);

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(Self::db_err)?;

        Ok(rows.iter().map(Self::row_to_event).collect())
    }
}
