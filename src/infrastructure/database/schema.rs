use sqlx::SqlitePool;

/// Embedded schema, applied at startup. Statements are idempotent so a
/// restart against an existing database is a no-op.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS lobbies (
        id TEXT PRIMARY KEY,
        mode TEXT NOT NULL,
        rounds INTEGER NOT NULL,
        minute_duration_sec INTEGER NOT NULL,
        enabled_categories TEXT NOT NULL,
        channels_config TEXT NOT NULL,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS lobby_players (
        id TEXT PRIMARY KEY,
        lobby_id TEXT NOT NULL REFERENCES lobbies(id) ON DELETE CASCADE,
        number INTEGER NOT NULL,
        nickname TEXT NOT NULL,
        discord_id TEXT
    )
    "#,
    // UNIQUE(lobby_id) is the authoritative one-game-per-lobby guard; the
    // service-level existence check only produces a friendlier error.
    r#"
    CREATE TABLE IF NOT EXISTS games (
        id TEXT PRIMARY KEY,
        lobby_id TEXT NOT NULL UNIQUE REFERENCES lobbies(id) ON DELETE CASCADE,
        apocalypse TEXT NOT NULL,
        bunker TEXT NOT NULL,
        seats INTEGER NOT NULL,
        current_round INTEGER NOT NULL DEFAULT 0,
        spectators_enabled INTEGER NOT NULL DEFAULT 1,
        ending TEXT,
        created_at INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS players (
        id TEXT PRIMARY KEY,
        game_id TEXT NOT NULL REFERENCES games(id) ON DELETE CASCADE,
        number INTEGER NOT NULL,
        nickname TEXT NOT NULL,
        discord_id TEXT,
        status TEXT NOT NULL,
        role TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS cards (
        id TEXT PRIMARY KEY,
        player_id TEXT NOT NULL REFERENCES players(id) ON DELETE CASCADE,
        category TEXT NOT NULL,
        payload TEXT NOT NULL,
        is_open INTEGER NOT NULL DEFAULT 0,
        opened_at INTEGER,
        opened_round INTEGER,
        UNIQUE(player_id, category)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS votes (
        id TEXT PRIMARY KEY,
        game_id TEXT NOT NULL REFERENCES games(id) ON DELETE CASCADE,
        round INTEGER NOT NULL,
        voter_player_id TEXT NOT NULL,
        target_player_id TEXT,
        source TEXT NOT NULL,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL,
        UNIQUE(game_id, round, voter_player_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS minute_requests (
        id TEXT PRIMARY KEY,
        game_id TEXT NOT NULL REFERENCES games(id) ON DELETE CASCADE,
        round INTEGER NOT NULL,
        player_id TEXT NOT NULL,
        position INTEGER NOT NULL,
        approved INTEGER NOT NULL DEFAULT 0,
        started_at INTEGER,
        duration_sec INTEGER,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL,
        UNIQUE(game_id, round, player_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS reveal_plans (
        id TEXT PRIMARY KEY,
        game_id TEXT NOT NULL REFERENCES games(id) ON DELETE CASCADE,
        round INTEGER NOT NULL,
        player_id TEXT NOT NULL,
        categories TEXT NOT NULL,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL,
        UNIQUE(game_id, round, player_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS game_events (
        id TEXT PRIMARY KEY,
        game_id TEXT NOT NULL REFERENCES games(id) ON DELETE CASCADE,
        type TEXT NOT NULL,
        player_id TEXT,
        payload TEXT NOT NULL,
        created_at INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_game_events_game_created
        ON game_events(game_id, created_at DESC)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS game_admins (
        id TEXT PRIMARY KEY,
        game_id TEXT NOT NULL REFERENCES games(id) ON DELETE CASCADE,
        user_id TEXT NOT NULL,
        role TEXT NOT NULL,
        created_at INTEGER NOT NULL,
        UNIQUE(game_id, user_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS invites (
        id TEXT PRIMARY KEY,
        game_id TEXT NOT NULL REFERENCES games(id) ON DELETE CASCADE,
        code TEXT NOT NULL UNIQUE,
        role TEXT NOT NULL,
        expires_at INTEGER NOT NULL,
        used_by_user_id TEXT,
        created_at INTEGER NOT NULL
    )
    "#,
];

pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
