use std::collections::BTreeSet;

use crate::infra::{Direction, Position, Round};
use crate::state::obstacle::{Bomb, Item, Player, WoodBox};

/// Row-major index of a field within its board. Stable across clones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(pub usize);

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Floor {
    pub wood_box: Option<WoodBox>,
    pub item: Option<Item>,
    /// Bombs in placement order; their presence windows never overlap.
    pub bombs: Vec<Bomb>,
    pub player: Option<Player>,
}

impl Floor {
    pub fn has_box(&self, round: Round) -> bool {
        self.wood_box.as_ref().is_some_and(|b| b.is_present(round))
    }

    pub fn has_item(&self, round: Round) -> bool {
        self.item.as_ref().is_some_and(|i| i.is_present(round))
    }

    pub fn bomb_at(&self, round: Round) -> Option<&Bomb> {
        self.bombs.iter().find(|bomb| bomb.is_present(round))
    }

    pub fn bomb_at_mut(&mut self, round: Round) -> Option<&mut Bomb> {
        self.bombs.iter_mut().find(|bomb| bomb.is_present(round))
    }

    pub fn has_bomb(&self, round: Round) -> bool {
        self.bomb_at(round).is_some()
    }

    pub fn has_player(&self, round: Round) -> bool {
        self.player.as_ref().is_some_and(|p| p.is_present(round))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Wall,
    Floor(Floor),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub id: FieldId,
    pub position: Position,
    /// Adjacent fields indexed by `Direction::index`; `None` past the board edge.
    pub neighbors: [Option<FieldId>; 4],
    pub cell: Cell,
    /// Rounds at which this field is on fire.
    pub explode_at: BTreeSet<Round>,
}

impl Field {
    pub fn new(id: FieldId, position: Position, cell: Cell) -> Self {
        Self {
            id,
            position,
            neighbors: [None; 4],
            cell,
            explode_at: BTreeSet::new(),
        }
    }

    pub fn is_wall(&self) -> bool {
        matches!(self.cell, Cell::Wall)
    }

    pub fn floor(&self) -> Option<&Floor> {
        match &self.cell {
            Cell::Floor(floor) => Some(floor),
            Cell::Wall => None,
        }
    }

    pub fn floor_mut(&mut self) -> Option<&mut Floor> {
        match &mut self.cell {
            Cell::Floor(floor) => Some(floor),
            Cell::Wall => None,
        }
    }

    /// Whether a player could stand here at `round`.
    pub fn is_accessible(&self, round: Round) -> bool {
        match &self.cell {
            Cell::Wall => false,
            Cell::Floor(floor) => !floor.has_bomb(round) && !floor.has_box(round),
        }
    }

    pub fn explodes_at(&self, round: Round) -> bool {
        self.explode_at.contains(&round)
    }

    pub fn neighbor(&self, direction: Direction) -> Option<FieldId> {
        self.neighbors[direction.index()]
    }

    pub fn has_item(&self, round: Round) -> bool {
        self.floor().is_some_and(|floor| floor.has_item(round))
    }

    pub fn has_bomb(&self, round: Round) -> bool {
        self.floor().is_some_and(|floor| floor.has_bomb(round))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::obstacle::{Bomb, ItemKind};

    #[test]
    fn test_walls_are_never_accessible() {
        let wall = Field::new(FieldId(0), Position::new(0, 0), Cell::Wall);
        assert!(!wall.is_accessible(0));
        assert!(wall.floor().is_none());
    }

    #[test]
    fn test_floor_blocked_by_box_and_bomb_windows() {
        let mut floor = Floor {
            wood_box: Some(WoodBox::new(Some(ItemKind::ExtraBomb))),
            ..Default::default()
        };
        floor.wood_box.as_mut().unwrap().presence.until = Some(3);
        let field = Field::new(FieldId(1), Position::new(1, 0), Cell::Floor(floor));
        assert!(!field.is_accessible(3));
        assert!(field.is_accessible(4));

        let floor = Floor {
            bombs: vec![Bomb::new(1, 5, 2, Position::new(2, 0), 2)],
            ..Default::default()
        };
        let field = Field::new(FieldId(2), Position::new(2, 0), Cell::Floor(floor));
        assert!(field.is_accessible(1));
        assert!(!field.is_accessible(2));
        assert!(!field.is_accessible(5));
        assert!(field.is_accessible(6));
    }
}
