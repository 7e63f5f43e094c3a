mod collect_players;
mod create_lobby;
mod get_lobby;
mod update_players;

pub use collect_players::*;
pub use create_lobby::*;
pub use get_lobby::*;
pub use update_players::*;
