use tracing::trace;

use crate::infra::{Direction, PlayerId, Round};
use crate::state::board::Board;
use crate::state::field::{Cell, FieldId};
use crate::state::obstacle::Item;

/// Value of destroying one box, before round weighting.
pub const BOX_VALUE: f64 = 1.0;

/// `weight / round`, with round 0 counted as round 1.
pub fn round_weighted(weight: f64, round: Round) -> f64 {
    weight / f64::from(round.max(1))
}

impl Board {
    /// Recomputes every field's explosion rounds from the armed bombs and returns the
    /// destruction value. Box and item destruction is written onto this board.
    #[tracing::instrument(level = "trace", skip(self), fields(bombs = self.bomb_refs().len()))]
    pub fn compute_hazards(&mut self) -> f64 {
        self.reset_hazards();

        let mut value = 0.0;
        for index in 0..self.bomb_refs().len() {
            let bomb_ref = self.bomb_refs()[index];
            let Some(bomb) = self.bomb_mut(bomb_ref) else {
                continue;
            };
            if bomb.resolved {
                continue;
            }
            bomb.resolved = true;
            let (range, round, owner) = (bomb.range, bomb.rounds_left, bomb.owner);
            for direction in Direction::ALL {
                value += self.propagate(bomb_ref.field, direction, range, round, owner);
            }
        }

        self.value = value;
        trace!(value, "Hazards computed");
        value
    }

    /// Clears explosion rounds and undoes simulated destruction so the board is back
    /// at its start-of-turn contents.
    fn reset_hazards(&mut self) {
        for field in self.fields_mut() {
            field.explode_at.clear();
            let Some(floor) = field.floor_mut() else {
                continue;
            };
            if let Some(wood_box) = floor.wood_box.as_mut() {
                wood_box.restore();
            }
            if floor.item.as_ref().is_some_and(Item::is_spawned) {
                floor.item = None;
            }
            if let Some(item) = floor.item.as_mut() {
                item.presence.until = None;
            }
            for bomb in &mut floor.bombs {
                bomb.resolved = false;
            }
        }
    }

    fn propagate(
        &mut self,
        id: FieldId,
        direction: Direction,
        range: u32,
        round: Round,
        owner: PlayerId,
    ) -> f64 {
        let field = self.field_mut(id);
        let Cell::Floor(floor) = &mut field.cell else {
            return 0.0;
        };
        field.explode_at.insert(round);

        if range == 0 {
            return 0.0;
        }

        // A box hit by several blasts in its last round counts once per hit.
        if let Some(wood_box) = floor.wood_box.as_mut().filter(|b| b.is_present(round)) {
            wood_box.presence.until = Some(round);
            wood_box.destroyed_by.get_or_insert(owner);
            if let Some(kind) = wood_box.content
                && !floor.item.as_ref().is_some_and(|item| !item.is_spawned())
            {
                floor.item = Some(Item::spawned(kind, round + 1));
            }
            return round_weighted(BOX_VALUE, round);
        }

        if let Some(item) = floor.item.as_mut().filter(|i| i.is_present(round)) {
            item.presence.until = Some(round);
            return 0.0;
        }

        if let Some(bomb) = floor.bomb_at_mut(round).filter(|b| !b.resolved) {
            bomb.resolved = true;
            let (chained_range, chained_owner) = (bomb.range, bomb.owner);
            trace!(field = %id, round, "Chain reaction");
            let mut value = 0.0;
            for direction in Direction::ALL {
                value += self.propagate(id, direction, chained_range, round, chained_owner);
            }
            return value;
        }

        match field.neighbor(direction) {
            Some(next) => self.propagate(next, direction, range - 1, round, owner),
            None => 0.0,
        }
    }
}
