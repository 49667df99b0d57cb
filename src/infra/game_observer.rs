use std::time::Duration;

use crate::error::BotError;
use crate::infra::GameHeader;
use crate::planners::Action;
use crate::state::Board;

/// Trait for observing game events during execution
pub trait GameObserver {
    /// Called once the game header has been read
    fn on_game_start(&mut self, header: &GameHeader);

    /// Called when a turn's board has been built (hazards of the real board not yet computed)
    fn on_turn(&mut self, turn: u32, board: &Board);

    /// Called when an action is chosen, with the time spent deciding
    fn on_action_selected(&mut self, turn: u32, action: &Action, elapsed: Duration);

    /// Called when planning failed and the bot stays in place instead
    fn on_fallback(&mut self, _turn: u32, _error: &BotError) {
        // Default implementation does nothing
    }

    /// Called when the input ends
    fn on_game_finished(&mut self, turns: u32);
}
