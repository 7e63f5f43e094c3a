use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::entities::{Lobby, LobbyMode, LobbyPlayer};
use crate::domain::repositories::{LobbyRepository, RepositoryError};
use crate::domain::value_objects::{CategoryToggles, ChannelsConfig};

/// SQLite implementation of LobbyRepository
pub struct SqliteLobbyRepository {
    pool: SqlitePool,
}

impl SqliteLobbyRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_lobby(row: &sqlx::sqlite::SqliteRow) -> Lobby {
        use sqlx::Row;

        let mode_str: String = row.get("mode");
        let categories_json: String = row.get("enabled_categories");
        let channels_json: String = row.get("channels_config");

        let enabled_categories =
            serde_json::from_str::<CategoryToggles>(&categories_json).unwrap_or_default();

        Lobby {
            id: row.get("id"),
            mode: LobbyMode::from_str(&mode_str).unwrap_or(LobbyMode::Web),
            rounds: row.get::<i64, _>("rounds") as u32,
            minute_duration_sec: row.get::<i64, _>("minute_duration_sec") as u32,
            enabled_categories,
            channels_config: serde_json::from_str::<ChannelsConfig>(&channels_json)
                .unwrap_or_default(),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    fn row_to_player(row: &sqlx::sqlite::SqliteRow) -> LobbyPlayer {
        use sqlx::Row;

        LobbyPlayer {
            id: row.get("id"),
            lobby_id: row.get("lobby_id"),
            number: row.get("number"),
            nickname: row.get("nickname"),
            discord_id: row.get("discord_id"),
        }
    }
}

#[async_trait]
impl LobbyRepository for SqliteLobbyRepository {
    async fn create(&self, lobby: &Lobby) -> Result<(), RepositoryError> {
        let channels_json = serde_json::to_string(&lobby.channels_config)
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO lobbies (id, mode, rounds, minute_duration_sec, enabled_categories, channels_config, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&lobby.id)
        .bind(lobby.mode.as_str())
        .bind(lobby.rounds as i64)
        .bind(lobby.minute_duration_sec as i64)
        .bind(lobby.enabled_categories.canonical_json())
        .bind(&channels_json)
        .bind(lobby.created_at)
        .bind(lobby.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Lobby>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM lobbies WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(row.as_ref().map(Self::row_to_lobby))
    }

    async fn get_players(&self, lobby_id: &str) -> Result<Vec<LobbyPlayer>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM lobby_players WHERE lobby_id = ? ORDER BY number ASC",
        )
        .bind(lobby_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(rows.iter().map(Self::row_to_player).collect())
    }

    async fn replace_players(
        &self,
        lobby_id: &str,
        players: &[LobbyPlayer],
    ) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        sqlx::query("DELETE FROM lobby_players WHERE lobby_id = ?")
            .bind(lobby_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        for player in players {
            sqlx::query(
                "INSERT INTO lobby_players (id, lobby_id, number, nickname, discord_id) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&player.id)
            .bind(lobby_id)
            .bind(player.number)
            .bind(&player.nickname)
            .bind(&player.discord_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }

    async fn find_game_id(&self, lobby_id: &str) -> Result<Option<String>, RepositoryError> {
        let id: Option<String> = sqlx::query_scalar("SELECT id FROM games WHERE lobby_id = ?")
            .bind(lobby_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(id)
    }
}
