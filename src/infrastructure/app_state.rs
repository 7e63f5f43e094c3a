use std::str::FromStr;
use std::sync::Arc;

use async_broadcast::{broadcast, Receiver, Sender};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::infrastructure::config::OfficialPresets;
use crate::infrastructure::database::repositories::{SqliteGameRepository, SqliteLobbyRepository};
use crate::infrastructure::database::schema;
use crate::infrastructure::discord::DiscordClient;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Lobby repository
    pub lobby_repo: Arc<SqliteLobbyRepository>,

    /// Game repository
    pub game_repo: Arc<SqliteGameRepository>,

    /// Discord REST client (offline mode without a token)
    pub discord: Arc<DiscordClient>,

    /// Official scenario/channel presets
    pub presets: Arc<OfficialPresets>,

    /// Event broadcaster for SSE
    pub event_sender: Sender<RoomEvent>,
    pub event_receiver: Receiver<RoomEvent>,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        // Get database path from environment
        let db_path = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("DB_PATH"))
            .unwrap_or_else(|_| "sqlite:./data/shelterplus.db".to_string());

        // Ensure path has sqlite: prefix
        let db_url = if db_path.starts_with("sqlite:") {
            db_path
        } else {
            format!("sqlite:{}", db_path)
        };

        tracing::info!("Connecting to database: {}", db_url);

        let options = SqliteConnectOptions::from_str(&db_url)?.create_if_missing(true);

        // An in-memory database exists per connection; pin the pool to one
        // connection so every handler sees the same schema.
        let db = if db_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .connect_with(options)
                .await?
        } else {
            SqlitePool::connect_with(options).await?
        };

        schema::init_schema(&db).await?;

        // Create repositories
        let lobby_repo = Arc::new(SqliteLobbyRepository::new(db.clone()));
        let game_repo = Arc::new(SqliteGameRepository::new(db.clone()));

        let discord = Arc::new(DiscordClient::from_env());
        let presets = Arc::new(OfficialPresets::from_env());

        // Create event broadcaster (capacity of 1000 events)
        let (event_sender, event_receiver) = broadcast(1000);

        Ok(Self {
            db,
            lobby_repo,
            game_repo,
            discord,
            presets,
            event_sender,
            event_receiver,
        })
    }

    /// Broadcast a room-scoped event to all connected SSE clients.
    /// Best-effort at-most-once; a failed emit is logged and skipped.
    pub fn broadcast_room(&self, event: RoomEvent) {
        let receiver_count = self.event_sender.receiver_count();
        tracing::debug!(
            "Broadcasting event '{}' to {} receivers",
            event.event,
            receiver_count
        );
        match self.event_sender.try_broadcast(event) {
            Ok(None) => {
                tracing::debug!("Event broadcast but no active receivers");
            }
            Ok(Some(_)) => {
                tracing::debug!("Event broadcast successfully with overflow");
            }
            Err(e) => {
                tracing::warn!("Failed to broadcast event: {:?}", e);
            }
        }
    }
}

/// Room-scoped event for SSE broadcasting. Carries a minimal, UI-shaped
/// payload, not the stored audit record.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomEvent {
    pub event: String,
    pub game_id: String,
    /// Additional data fields (flattened into root)
    #[serde(flatten)]
    pub data: serde_json::Value,
    pub timestamp: i64,
}

impl RoomEvent {
    pub fn new(event: &str, game_id: &str) -> Self {
        Self {
            event: event.to_string(),
            game_id: game_id.to_string(),
            data: serde_json::Value::Object(serde_json::Map::new()),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }
}
