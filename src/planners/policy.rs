use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::error::{BotError, Result};
use crate::infra::{Config, Position, Round};
use crate::planners::projection::{NoProjection, OpponentModel, SelfPreservingBombers};
use crate::planners::route::Route;
use crate::planners::search::RouteSearch;
use crate::state::Board;

/// The single command sent each turn. A bomb is dropped on the current field while
/// moving toward the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move(Position),
    Bomb(Position),
}

impl Action {
    pub fn target(&self) -> Position {
        match self {
            Action::Move(target) | Action::Bomb(target) => *target,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Move(target) => write!(f, "MOVE {} {}", target.x, target.y),
            Action::Bomb(target) => write!(f, "BOMB {} {}", target.x, target.y),
        }
    }
}

/// Per-turn planner: projects opponent bombs, then searches the agent's best route.
pub struct DecisionPolicy {
    horizon: Round,
    fuse: Round,
    turn_budget: Option<Duration>,
    opponents: Box<dyn OpponentModel>,
}

impl DecisionPolicy {
    pub fn new(config: &Config) -> Self {
        let opponents: Box<dyn OpponentModel> = if config.project_opponents {
            Box::new(SelfPreservingBombers {
                fuse: config.fuse,
                horizon: config.opponent_horizon,
            })
        } else {
            Box::new(NoProjection)
        };
        Self {
            horizon: config.horizon,
            fuse: config.fuse,
            turn_budget: config.turn_budget,
            opponents,
        }
    }

    pub fn with_opponent_model(mut self, model: impl OpponentModel + 'static) -> Self {
        self.opponents = Box::new(model);
        self
    }

    fn search(&self, deadline: Option<Instant>) -> RouteSearch {
        let search = RouteSearch::new(self.fuse);
        match deadline {
            Some(deadline) => search.with_deadline(deadline),
            None => search,
        }
    }

    /// Clone of `board` with the opponent model's bombs added and hazards computed.
    pub fn projected_board(&self, board: &Board, search: &mut RouteSearch) -> Board {
        let mut projected = board.clone();
        for bomb in self.opponents.project(board, search) {
            // Projections come from distinct opponent fields, but two opponents may share one.
            if let Err(err) = projected.place_bomb(bomb) {
                debug!(error = %err, "Dropping overlapping projection");
            }
        }
        projected.compute_hazards();
        trace!("hazards:\n{}", projected.hazard_map());
        projected
    }

    /// Best route for the agent on the projected board.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn plan(&self, board: &Board) -> Result<Route> {
        let started = Instant::now();
        // Opponent checks get half the turn so the agent's own search keeps the rest.
        let mut projection_search = self.search(self.turn_budget.map(|budget| started + budget / 2));
        let projected = self.projected_board(board, &mut projection_search);

        let me = board.me();
        let mut search = self.search(self.turn_budget.map(|budget| started + budget));
        let routes = search.ways_out(&projected, me.position, self.horizon, 0, me.bombs_left, false);
        let candidates = routes.len();

        let best = routes
            .into_iter()
            .reduce(|best, route| {
                if route.fitness() > best.fitness() {
                    route
                } else {
                    best
                }
            })
            .ok_or(BotError::NoViableRoute { from: me.position })?;

        debug!(
            model = self.opponents.name(),
            route = %best,
            candidates,
            expanded = search.expanded() + projection_search.expanded(),
            timed_out = search.timed_out() || projection_search.timed_out(),
            "Route chosen"
        );
        Ok(best)
    }

    pub fn decide(&self, board: &Board) -> Result<Action> {
        let route = self.plan(board)?;
        let step = route.first_step().ok_or(BotError::NoViableRoute {
            from: board.me().position,
        })?;
        let target = board.field(step.field).position;
        Ok(if step.place_bomb {
            Action::Bomb(target)
        } else {
            Action::Move(target)
        })
    }
}
