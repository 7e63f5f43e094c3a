mod game_repo;
mod lobby_repo;

pub use game_repo::SqliteGameRepository;
pub use lobby_repo::SqliteLobbyRepository;
