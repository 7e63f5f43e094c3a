mod ending;
mod events;
mod get_game;
mod guard;
mod invites;
mod kick;
mod minutes;
mod reveal;
mod rounds;
mod spectator;
mod start_game;
mod voting;

pub use ending::*;
pub use events::*;
pub use get_game::*;
pub use invites::*;
pub use kick::*;
pub use minutes::*;
pub use reveal::*;
pub use rounds::*;
pub use spectator::*;
pub use start_game::*;
pub use voting::*;
