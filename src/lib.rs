pub mod error;
pub mod game;
pub mod infra;
pub mod planners;
pub mod state;

// Re-export commonly used types for convenience
pub use error::{BotError, Result};
pub use game::Game;
pub use infra::{Config, Position};
pub use planners::{Action, DecisionPolicy};
pub use state::Board;
