use crate::error::BotError;
use crate::infra::{PlayerId, Position, Round};

/// Inclusive presence window of an obstacle. `until == None` means present indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presence {
    pub from: Round,
    pub until: Option<Round>,
}

impl Presence {
    pub fn always() -> Self {
        Self {
            from: 0,
            until: None,
        }
    }

    pub fn between(from: Round, until: Round) -> Self {
        Self {
            from,
            until: Some(until),
        }
    }

    pub fn starting(from: Round) -> Self {
        Self { from, until: None }
    }

    pub fn is_present(&self, round: Round) -> bool {
        self.from <= round && self.until.is_none_or(|until| round <= until)
    }

    /// Whether some round lies in both windows.
    pub fn overlaps(&self, other: &Presence) -> bool {
        self.until.is_none_or(|until| other.from <= until)
            && other.until.is_none_or(|until| self.from <= until)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    ExtraRange,
    ExtraBomb,
}

impl TryFrom<i32> for ItemKind {
    type Error = BotError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ItemKind::ExtraRange),
            2 => Ok(ItemKind::ExtraBomb),
            _ => Err(BotError::UnknownItemType(value)),
        }
    }
}

/// Maps a box content code to the item it releases; `0` is an empty box.
pub fn box_content(code: i32) -> Result<Option<ItemKind>, BotError> {
    match code {
        0 => Ok(None),
        other => ItemKind::try_from(other).map(Some),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WoodBox {
    pub content: Option<ItemKind>,
    pub presence: Presence,
    pub destroyed_by: Option<PlayerId>,
}

impl WoodBox {
    pub fn new(content: Option<ItemKind>) -> Self {
        Self {
            content,
            presence: Presence::always(),
            destroyed_by: None,
        }
    }

    pub fn is_present(&self, round: Round) -> bool {
        self.presence.is_present(round)
    }

    /// Restores the box to its start-of-turn state.
    pub(crate) fn restore(&mut self) {
        self.presence.until = None;
        self.destroyed_by = None;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub kind: ItemKind,
    pub presence: Presence,
}

impl Item {
    pub fn new(kind: ItemKind) -> Self {
        Self {
            kind,
            presence: Presence::always(),
        }
    }

    pub fn spawned(kind: ItemKind, from: Round) -> Self {
        Self {
            kind,
            presence: Presence::starting(from),
        }
    }

    pub fn is_present(&self, round: Round) -> bool {
        self.presence.is_present(round)
    }

    /// Items released by a simulated box destruction.
    pub fn is_spawned(&self) -> bool {
        self.presence.from > 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bomb {
    pub owner: PlayerId,
    pub range: u32,
    /// Round at which the fuse reaches zero.
    pub rounds_left: Round,
    pub position: Position,
    pub presence: Presence,
    pub resolved: bool,
}

impl Bomb {
    /// A bomb placed at `placed_at` that goes off at `rounds_left`.
    pub fn new(
        owner: PlayerId,
        rounds_left: Round,
        range: u32,
        position: Position,
        placed_at: Round,
    ) -> Self {
        Self {
            owner,
            range,
            rounds_left,
            position,
            presence: Presence::between(placed_at, rounds_left),
            resolved: false,
        }
    }

    pub fn is_present(&self, round: Round) -> bool {
        self.presence.is_present(round)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub bombs_left: u32,
    pub range: u32,
    pub position: Position,
    pub presence: Presence,
}

impl Player {
    pub fn new(id: PlayerId, bombs_left: u32, range: u32, position: Position) -> Self {
        Self {
            id,
            bombs_left,
            range,
            position,
            presence: Presence::always(),
        }
    }

    pub fn is_present(&self, round: Round) -> bool {
        self.presence.is_present(round)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_window_is_inclusive() {
        let window = Presence::between(2, 5);
        assert!(!window.is_present(1));
        assert!(window.is_present(2));
        assert!(window.is_present(5));
        assert!(!window.is_present(6));

        let open = Presence::starting(3);
        assert!(!open.is_present(2));
        assert!(open.is_present(1_000));

        assert!(window.overlaps(&Presence::between(5, 9)));
        assert!(!window.overlaps(&Presence::between(6, 9)));
        assert!(open.overlaps(&window));
        assert!(!Presence::between(0, 2).overlaps(&open));
    }

    #[test]
    fn test_bomb_vanishes_after_its_fuse() {
        let bomb = Bomb::new(0, 4, 2, Position::new(1, 1), 1);
        assert!(!bomb.is_present(0));
        assert!(bomb.is_present(1));
        assert!(bomb.is_present(4));
        assert!(!bomb.is_present(5));
    }

    #[test]
    fn test_box_content_codes() {
        assert_eq!(box_content(0).unwrap(), None);
        assert_eq!(box_content(1).unwrap(), Some(ItemKind::ExtraRange));
        assert_eq!(box_content(2).unwrap(), Some(ItemKind::ExtraBomb));
        assert!(matches!(box_content(7), Err(BotError::UnknownItemType(7))));
    }
}
