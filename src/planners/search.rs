use std::time::Instant;

use tracing::trace;

use crate::infra::{Direction, Position, Round};
use crate::planners::route::{Route, Step};
use crate::state::{Board, Bomb, FieldId, round_weighted};

/// Bonus for standing on an item, before round weighting.
pub const ITEM_BONUS: f64 = 0.5;

#[derive(Debug, Clone, Copy)]
struct Frame {
    horizon: Round,
    distance: Round,
    bombs_left: u32,
    stop_at_first: bool,
    /// A bomb was dropped on the previous field when stepping here.
    entered_with_bomb: bool,
}

/// Bounded look-ahead over the agent's own position.
///
/// Every returned route only enters a field at a round that field is not on fire.
/// Bomb placements are explored on clones of the board; the board passed in is
/// never modified.
pub struct RouteSearch {
    fuse: Round,
    deadline: Option<Instant>,
    expanded: usize,
    timed_out: bool,
}

impl RouteSearch {
    /// `fuse` is the countdown given to bombs the agent places during the search.
    pub fn new(fuse: Round) -> Self {
        Self {
            fuse,
            deadline: None,
            expanded: 0,
            timed_out: false,
        }
    }

    /// Stop expanding candidates once `deadline` passes; routes found so far are kept.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Search nodes visited so far.
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    /// All hazard-safe routes from `position` (reached at round `distance`) up to
    /// `horizon`. An empty result means there is no way out.
    #[tracing::instrument(level = "trace", skip(self, board), fields(at = %position))]
    pub fn ways_out(
        &mut self,
        board: &Board,
        position: Position,
        horizon: Round,
        distance: Round,
        bombs_left: u32,
        stop_at_first: bool,
    ) -> Vec<Route> {
        let Some(start) = board.field_id_at(position) else {
            return Vec::new();
        };
        let routes = self.explore(
            board,
            start,
            Frame {
                horizon,
                distance,
                bombs_left,
                stop_at_first,
                entered_with_bomb: false,
            },
        );
        trace!(
            routes = routes.len(),
            expanded = self.expanded,
            timed_out = self.timed_out,
            "Search finished"
        );
        routes
    }

    fn out_of_time(&mut self) -> bool {
        if !self.timed_out && self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            trace!(expanded = self.expanded, "Search deadline reached");
            self.timed_out = true;
        }
        self.timed_out
    }

    /// Optional bomb placement here, then movement.
    fn explore(&mut self, board: &Board, at: FieldId, frame: Frame) -> Vec<Route> {
        let mut routes = Vec::new();
        let field = board.field(at);

        // A bomb on the horizon field has no flagged step, but its value still counts.
        let can_place = frame.bombs_left > 0
            && frame.distance <= frame.horizon
            && field
                .floor()
                .is_some_and(|floor| !floor.has_bomb(frame.distance));
        if can_place {
            let me = board.me();
            let bomb = Bomb::new(
                me.id,
                frame.distance + self.fuse,
                me.range,
                field.position,
                frame.distance,
            );
            let mut with_bomb = board.clone();
            if with_bomb.place_bomb(bomb).is_ok() {
                with_bomb.compute_hazards();
                // With the last bomb gone, only proving an escape matters.
                let last_bomb = frame.bombs_left == 1;
                let placed = Frame {
                    horizon: if last_bomb {
                        frame.distance + self.fuse
                    } else {
                        frame.horizon
                    },
                    bombs_left: frame.bombs_left - 1,
                    stop_at_first: last_bomb || frame.stop_at_first,
                    ..frame
                };
                routes.extend(self.walk(&with_bomb, at, placed, true));
            }
        }

        routes.extend(self.walk(board, at, frame, false));
        routes
    }

    fn walk(&mut self, board: &Board, at: FieldId, frame: Frame, drop_bomb: bool) -> Vec<Route> {
        self.expanded += 1;
        let field = board.field(at);

        if frame.distance >= frame.horizon {
            let mut route = Route::new(Step::new(at, frame.entered_with_bomb));
            route.adjust_fitness(board.value());
            return vec![route];
        }

        let next_round = frame.distance + 1;
        let candidates: Vec<FieldId> = Direction::ALL
            .iter()
            .filter_map(|&direction| field.neighbor(direction))
            .filter(|&id| board.field(id).is_accessible(next_round))
            .chain(std::iter::once(at))
            .filter(|&id| !board.field(id).explodes_at(next_round))
            .collect();

        let mut routes = Vec::new();
        for next in candidates {
            if self.out_of_time() {
                break;
            }
            let found = self.explore(
                board,
                next,
                Frame {
                    distance: next_round,
                    entered_with_bomb: drop_bomb,
                    ..frame
                },
            );
            let escaped = !found.is_empty();
            routes.extend(found);
            if frame.stop_at_first && escaped {
                break;
            }
        }

        if frame.distance != 0 {
            for route in &mut routes {
                route.prepend_step(Step::new(at, frame.entered_with_bomb));
            }
        }
        if field.has_item(frame.distance) {
            let bonus = round_weighted(ITEM_BONUS, frame.distance);
            for route in &mut routes {
                route.adjust_fitness(bonus);
            }
        }
        routes
    }
}
