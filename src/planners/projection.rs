use tracing::{debug, trace};

use crate::infra::Round;
use crate::planners::search::RouteSearch;
use crate::state::{Board, Bomb};

/// Guesses opponent bombs to add to the board before planning the agent's own move.
pub trait OpponentModel {
    fn name(&self) -> &'static str;

    /// Hypothetical bombs, placed at round 0.
    fn project(&self, board: &Board, search: &mut RouteSearch) -> Vec<Bomb>;
}

/// Assumes every opponent drops a bomb where it stands, unless that bomb would trap it.
pub struct SelfPreservingBombers {
    pub fuse: Round,
    pub horizon: Round,
}

impl OpponentModel for SelfPreservingBombers {
    fn name(&self) -> &'static str {
        "self-preserving"
    }

    #[tracing::instrument(level = "trace", skip_all, fields(opponents = board.others().len()))]
    fn project(&self, board: &Board, search: &mut RouteSearch) -> Vec<Bomb> {
        board
            .others()
            .iter()
            .filter_map(|other| {
                let bomb = Bomb::new(other.id, self.fuse, other.range, other.position, 0);
                let mut hypothetical = board.clone();
                if let Err(err) = hypothetical.place_bomb(bomb.clone()) {
                    trace!(opponent = other.id, error = %err, "No projection");
                    return None;
                }
                hypothetical.compute_hazards();
                let escapes = !search
                    .ways_out(&hypothetical, other.position, self.horizon, 0, 0, true)
                    .is_empty();
                if !escapes && search.timed_out() {
                    debug!(opponent = other.id, at = %other.position, "Projection dropped, out of time");
                    return None;
                }
                debug!(opponent = other.id, at = %other.position, escapes, "Projected opponent bomb");
                escapes.then_some(bomb)
            })
            .collect()
    }
}

/// Plans against the board as it is.
pub struct NoProjection;

impl OpponentModel for NoProjection {
    fn name(&self) -> &'static str {
        "none"
    }

    fn project(&self, _board: &Board, _search: &mut RouteSearch) -> Vec<Bomb> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::infra::Position;
    use crate::state::fixtures::{board, open_board};

    #[test]
    fn test_opponent_with_escape_is_projected() {
        let board = open_board(7, &[(0, 0, 0, 0, 1, 2), (0, 1, 4, 4, 1, 2)], 0);
        let model = SelfPreservingBombers { fuse: 8, horizon: 8 };
        let bombs = model.project(&board, &mut RouteSearch::new(8));
        assert_eq!(bombs.len(), 1);
        assert_eq!(bombs[0].owner, 1);
        assert_eq!(bombs[0].position, Position::new(4, 4));
        assert_eq!(bombs[0].rounds_left, 8);
        assert_eq!(bombs[0].range, 2);
    }

    #[test]
    fn test_trapped_opponent_is_not_projected() {
        // Opponent in a dead-end corridor its own blast fully covers.
        let board = board(
            &["XXXXX", "X...X", "XXXXX", "....."],
            &[(0, 0, 0, 3, 1, 2), (0, 1, 1, 1, 1, 4)],
            0,
        );
        let model = SelfPreservingBombers { fuse: 8, horizon: 8 };
        assert!(model.project(&board, &mut RouteSearch::new(8)).is_empty());
    }

    #[test]
    fn test_opponent_on_own_bomb_is_skipped() {
        let board = open_board(7, &[(0, 0, 0, 0, 1, 2), (0, 1, 4, 4, 0, 2), (1, 1, 4, 4, 3, 2)], 0);
        let model = SelfPreservingBombers { fuse: 8, horizon: 8 };
        assert!(model.project(&board, &mut RouteSearch::new(8)).is_empty());
    }

    #[test]
    fn test_expired_deadline_drops_projections() {
        let board = open_board(7, &[(0, 0, 0, 0, 1, 2), (0, 1, 4, 4, 1, 2)], 0);
        let model = SelfPreservingBombers { fuse: 8, horizon: 8 };
        let mut search = RouteSearch::new(8).with_deadline(Instant::now());
        assert!(model.project(&board, &mut search).is_empty());
        assert!(search.timed_out());
    }

    #[test]
    fn test_projection_leaves_board_untouched() {
        let board = open_board(7, &[(0, 0, 0, 0, 1, 2), (0, 1, 4, 4, 1, 2)], 0);
        let before = board.clone();
        SelfPreservingBombers { fuse: 8, horizon: 8 }.project(&board, &mut RouteSearch::new(8));
        assert_eq!(board, before);
        assert!(NoProjection.project(&board, &mut RouteSearch::new(8)).is_empty());
    }
}
