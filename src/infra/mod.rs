mod config;
mod default_observer;
mod game_observer;
mod input;
mod replay;
mod types;

pub use config::Config;
pub use default_observer::DefaultObserver;
pub use game_observer::GameObserver;
pub use input::{EntityKind, EntityRecord, GameHeader, TurnInput, TurnReader};
pub use replay::ReplayFile;
pub use types::{Direction, PlayerId, Position, Round};
