use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::error::BotError;
use crate::infra::{GameHeader, GameObserver};
use crate::planners::Action;
use crate::state::Board;

/// Logs game events through `tracing`.
pub struct DefaultObserver {
    slow_turn: Duration,
}

impl DefaultObserver {
    pub fn new(slow_turn: Duration) -> Self {
        Self { slow_turn }
    }
}

impl Default for DefaultObserver {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

impl GameObserver for DefaultObserver {
    fn on_game_start(&mut self, header: &GameHeader) {
        info!("Game started");
        info!("- board size: {}x{}", header.width, header.height);
        info!("- my id: {}", header.my_id);
    }

    fn on_turn(&mut self, turn: u32, board: &Board) {
        let me = board.me();
        debug!(
            turn,
            pos = %me.position,
            bombs_left = me.bombs_left,
            range = me.range,
            opponents = board.others().len(),
            "Turn"
        );
        trace!("accessibility now:\n{}", board.accessibility_map(0));
    }

    fn on_action_selected(&mut self, turn: u32, action: &Action, elapsed: Duration) {
        info!(turn, "action: {}", action);
        if elapsed > self.slow_turn {
            debug!(
                "⚠️  Turn {} took {:.2}ms",
                turn,
                elapsed.as_secs_f64() * 1000.0
            );
        }
    }

    fn on_fallback(&mut self, turn: u32, error: &BotError) {
        warn!(turn, error = %error, "Planning failed, staying in place");
    }

    fn on_game_finished(&mut self, turns: u32) {
        info!("Game finished after {} turns", turns);
    }
}
