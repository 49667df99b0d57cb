use tracing::{debug, trace};

use crate::error::{BotError, Result};
use crate::infra::{Direction, EntityKind, EntityRecord, GameHeader, Position, TurnInput};
use crate::state::field::{Cell, Field, FieldId, Floor};
use crate::state::obstacle::{Bomb, Item, ItemKind, Player, WoodBox, box_content};

/// Locates one armed bomb: its field and its index in that field's bomb list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BombRef {
    pub field: FieldId,
    pub index: usize,
}

/// Full per-turn board: field arena plus the players and armed bombs on it.
///
/// Cloning yields an independent copy; field ids are preserved so a route computed
/// on a clone still names fields of the source board.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    width: usize,
    height: usize,
    /// Indexed by `FieldId`, row-major.
    fields: Vec<Field>,
    me: Player,
    others: Vec<Player>,
    /// Armed bombs, ascending by fuse.
    bombs: Vec<BombRef>,
    /// Value total of the last hazard computation.
    pub(crate) value: f64,
}

impl Board {
    /// Builds the board for one turn. Hazards are not computed yet.
    #[tracing::instrument(level = "trace", skip_all, fields(width = header.width, height = header.height))]
    pub fn from_turn(header: &GameHeader, turn: &TurnInput) -> Result<Self> {
        if turn.rows.len() != header.height {
            return Err(BotError::MalformedLine {
                line: format!("{} rows", turn.rows.len()),
                reason: format!("expected {} board rows", header.height),
            });
        }

        let mut fields = Vec::with_capacity(header.width * header.height);
        for (y, row) in turn.rows.iter().enumerate() {
            let width = row.chars().count();
            if width != header.width {
                return Err(BotError::RowWidthMismatch {
                    row: y,
                    expected: header.width,
                    actual: width,
                });
            }
            for (x, glyph) in row.chars().enumerate() {
                let position = Position::new(x as i32, y as i32);
                let cell = parse_cell(glyph, position)?;
                fields.push(Field::new(FieldId(fields.len()), position, cell));
            }
        }

        let mut me = None;
        let mut others = Vec::new();
        let mut bombs = Vec::new();

        for record in &turn.entities {
            let id = field_index(header.width, header.height, record.position)
                .ok_or(BotError::EntityOutOfBounds {
                    position: record.position,
                })?;
            let floor = fields[id.0].floor_mut().ok_or(BotError::EntityOnWall {
                position: record.position,
            })?;

            match record.kind {
                EntityKind::Player => {
                    let player = Player::new(
                        record.owner,
                        non_negative(record, record.param1, "bombs left")?,
                        non_negative(record, record.param2, "explosion range")?,
                        record.position,
                    );
                    if floor.player.is_none() {
                        floor.player = Some(player.clone());
                    }
                    if record.owner == header.my_id {
                        me = Some(player);
                    } else {
                        others.push(player);
                    }
                }
                EntityKind::Bomb => {
                    if floor.has_bomb(0) {
                        return Err(BotError::CellOccupied {
                            position: record.position,
                        });
                    }
                    let index = floor.bombs.len();
                    floor.bombs.push(Bomb::new(
                        record.owner,
                        non_negative(record, record.param1, "fuse")?,
                        non_negative(record, record.param2, "explosion range")?,
                        record.position,
                        0,
                    ));
                    bombs.push(BombRef { field: id, index });
                }
                EntityKind::Item => {
                    floor.item = Some(Item::new(ItemKind::try_from(record.param1)?));
                }
                EntityKind::Box => {
                    floor.wood_box = Some(WoodBox::new(box_content(record.param1)?));
                }
            }
        }

        let me = me.ok_or(BotError::MissingSelf { id: header.my_id })?;

        let mut board = Self {
            width: header.width,
            height: header.height,
            fields,
            me,
            others,
            bombs: Vec::new(),
            value: 0.0,
        };
        board.connect_fields();
        for bomb in bombs {
            board.insert_bomb_order(bomb);
        }

        debug!(
            me = %board.me.position,
            opponents = board.others.len(),
            bombs = board.bombs.len(),
            "Board built"
        );
        Ok(board)
    }

    fn connect_fields(&mut self) {
        for index in 0..self.fields.len() {
            let neighbor_positions = self.fields[index].position.neighbors();
            let mut neighbors = [None; 4];
            for direction in Direction::ALL {
                neighbors[direction.index()] =
                    field_index(self.width, self.height, neighbor_positions[direction.index()]);
            }
            self.fields[index].neighbors = neighbors;
        }
    }

    /// Keeps `bombs` sorted by fuse; bombs with equal fuses stay in insertion order.
    fn insert_bomb_order(&mut self, bomb: BombRef) {
        let fuse = self.bomb_fuse(bomb);
        let slot = self
            .bombs
            .partition_point(|&other| self.bomb_fuse(other) <= fuse);
        self.bombs.insert(slot, bomb);
    }

    fn bomb_fuse(&self, bomb: BombRef) -> u32 {
        self.bomb(bomb).map_or(u32::MAX, |bomb| bomb.rounds_left)
    }

    /// Arms a hypothetical bomb. Hazards must be recomputed afterwards.
    ///
    /// A field may get a new bomb once its earlier ones have gone off; placing while
    /// another bomb's presence window overlaps the new one fails.
    pub fn place_bomb(&mut self, bomb: Bomb) -> Result<FieldId> {
        let position = bomb.position;
        let id = self
            .field_id_at(position)
            .ok_or(BotError::EntityOutOfBounds { position })?;
        let floor = self.fields[id.0]
            .floor_mut()
            .ok_or(BotError::EntityOnWall { position })?;
        if floor
            .bombs
            .iter()
            .any(|other| other.presence.overlaps(&bomb.presence))
        {
            return Err(BotError::CellOccupied { position });
        }
        trace!(
            owner = bomb.owner,
            fuse = bomb.rounds_left,
            range = bomb.range,
            at = %position,
            "Placing bomb"
        );
        let index = floor.bombs.len();
        floor.bombs.push(bomb);
        self.insert_bomb_order(BombRef { field: id, index });
        Ok(id)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn me(&self) -> &Player {
        &self.me
    }

    pub fn others(&self) -> &[Player] {
        &self.others
    }

    /// Value total of the last `compute_hazards` call.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> &mut [Field] {
        &mut self.fields
    }

    pub fn field(&self, id: FieldId) -> &Field {
        &self.fields[id.0]
    }

    pub(crate) fn field_mut(&mut self, id: FieldId) -> &mut Field {
        &mut self.fields[id.0]
    }

    pub fn field_id_at(&self, position: Position) -> Option<FieldId> {
        field_index(self.width, self.height, position)
    }

    pub fn field_at(&self, position: Position) -> Option<&Field> {
        self.field_id_at(position).map(|id| self.field(id))
    }

    pub fn floor_at(&self, position: Position) -> Option<&Floor> {
        self.field_at(position).and_then(Field::floor)
    }

    /// Armed bombs by location, ascending by fuse.
    pub fn bomb_refs(&self) -> &[BombRef] {
        &self.bombs
    }

    pub fn bomb(&self, bomb: BombRef) -> Option<&Bomb> {
        self.field(bomb.field).floor()?.bombs.get(bomb.index)
    }

    pub(crate) fn bomb_mut(&mut self, bomb: BombRef) -> Option<&mut Bomb> {
        self.field_mut(bomb.field).floor_mut()?.bombs.get_mut(bomb.index)
    }

    pub fn bombs(&self) -> impl Iterator<Item = &Bomb> {
        self.bombs.iter().filter_map(|&bomb| self.bomb(bomb))
    }
}

fn parse_cell(glyph: char, position: Position) -> Result<Cell> {
    match glyph {
        'X' => Ok(Cell::Wall),
        '.' => Ok(Cell::Floor(Floor::default())),
        '0' | '1' | '2' => {
            let code = glyph.to_digit(10).unwrap_or(0) as i32;
            Ok(Cell::Floor(Floor {
                wood_box: Some(WoodBox::new(box_content(code)?)),
                ..Default::default()
            }))
        }
        _ => Err(BotError::UnknownGlyph { glyph, position }),
    }
}

fn field_index(width: usize, height: usize, position: Position) -> Option<FieldId> {
    if position.x < 0 || position.y < 0 {
        return None;
    }
    let (x, y) = (position.x as usize, position.y as usize);
    if x >= width || y >= height {
        return None;
    }
    Some(FieldId(y * width + x))
}

fn non_negative(record: &EntityRecord, value: i32, what: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| BotError::MalformedLine {
        line: record.to_string(),
        reason: format!("negative {}", what),
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Builds a board from ASCII rows and `(kind, owner, x, y, param1, param2)` tuples.
    pub fn board(rows: &[&str], entities: &[(i32, i32, i32, i32, i32, i32)], my_id: i32) -> Board {
        let header = GameHeader {
            width: rows[0].len(),
            height: rows.len(),
            my_id,
        };
        let turn = TurnInput {
            rows: rows.iter().map(|row| row.to_string()).collect(),
            entities: entities
                .iter()
                .map(|&(kind, owner, x, y, param1, param2)| EntityRecord {
                    kind: EntityKind::try_from(kind).unwrap(),
                    owner,
                    position: Position::new(x, y),
                    param1,
                    param2,
                })
                .collect(),
        };
        Board::from_turn(&header, &turn).unwrap()
    }

    pub fn open_rows(width: usize, height: usize) -> Vec<String> {
        vec![".".repeat(width); height]
    }

    pub fn open_board(size: usize, entities: &[(i32, i32, i32, i32, i32, i32)], my_id: i32) -> Board {
        let rows = open_rows(size, size);
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
        board(&rows, entities, my_id)
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_field_ids_follow_row_major_order() {
        let board = board(&["..X", "X0."], &[(0, 0, 0, 0, 1, 2)], 0);
        assert_eq!(board.fields().len(), 6);
        for (index, field) in board.fields().iter().enumerate() {
            assert_eq!(field.id, FieldId(index));
        }
        assert_eq!(board.field_id_at(Position::new(1, 1)), Some(FieldId(4)));
        assert!(board.field(FieldId(2)).is_wall());
        assert!(board.field(FieldId(4)).floor().unwrap().has_box(0));
    }

    #[test]
    fn test_neighbor_slots_point_at_adjacent_fields() {
        let board = board(&["...", "...", "..."], &[(0, 0, 1, 1, 1, 2)], 0);
        for field in board.fields() {
            for direction in Direction::ALL {
                let expected = board.field_id_at(field.position.step(direction));
                assert_eq!(field.neighbor(direction), expected);
            }
        }
        let corner = board.field_at(Position::new(0, 0)).unwrap();
        assert_eq!(corner.neighbor(Direction::Left), None);
        assert_eq!(corner.neighbor(Direction::Up), None);
    }

    #[test]
    fn test_players_and_bombs_are_registered() {
        let board = board(
            &["....", "....", "...."],
            &[
                (0, 1, 3, 2, 1, 3),
                (0, 0, 0, 0, 2, 4),
                (1, 1, 3, 1, 5, 3),
                (1, 0, 1, 0, 2, 4),
                (2, 0, 2, 2, 2, 0),
            ],
            0,
        );
        assert_eq!(board.me().position, Position::new(0, 0));
        assert_eq!(board.me().bombs_left, 2);
        assert_eq!(board.others().len(), 1);
        assert_eq!(board.others()[0].id, 1);
        let fuses: Vec<u32> = board.bombs().map(|bomb| bomb.rounds_left).collect();
        assert_eq!(fuses, vec![2, 5]);
        assert!(board.floor_at(Position::new(2, 2)).unwrap().has_item(0));
    }

    #[test]
    fn test_unknown_glyph_is_rejected() {
        let header = GameHeader {
            width: 2,
            height: 1,
            my_id: 0,
        };
        let turn = TurnInput {
            rows: vec![".?".to_string()],
            entities: Vec::new(),
        };
        let err = Board::from_turn(&header, &turn).unwrap_err();
        assert!(matches!(err, BotError::UnknownGlyph { glyph: '?', .. }));
    }

    #[test]
    fn test_missing_self_is_rejected() {
        let header = GameHeader {
            width: 2,
            height: 1,
            my_id: 3,
        };
        let turn = TurnInput {
            rows: vec!["..".to_string()],
            entities: Vec::new(),
        };
        assert!(matches!(
            Board::from_turn(&header, &turn),
            Err(BotError::MissingSelf { id: 3 })
        ));
    }

    #[test]
    fn test_placed_bombs_stay_sorted_by_fuse() {
        let mut board = open_board(5, &[(0, 0, 0, 0, 3, 2), (1, 1, 4, 4, 6, 2)], 0);
        board.place_bomb(Bomb::new(0, 3, 2, Position::new(2, 2), 0)).unwrap();
        board.place_bomb(Bomb::new(0, 8, 2, Position::new(1, 1), 0)).unwrap();
        let fuses: Vec<u32> = board.bombs().map(|bomb| bomb.rounds_left).collect();
        assert_eq!(fuses, vec![3, 6, 8]);

        let err = board
            .place_bomb(Bomb::new(0, 9, 2, Position::new(2, 2), 1))
            .unwrap_err();
        assert!(matches!(err, BotError::CellOccupied { .. }));
    }

    #[test]
    fn test_spent_field_takes_a_new_bomb() {
        let mut board = open_board(5, &[(0, 0, 0, 0, 3, 2), (1, 1, 2, 2, 2, 1)], 0);
        let center = Position::new(2, 2);
        // The input bomb is present through round 2.
        let err = board.place_bomb(Bomb::new(0, 10, 1, center, 2)).unwrap_err();
        assert!(matches!(err, BotError::CellOccupied { .. }));

        board.place_bomb(Bomb::new(0, 11, 1, center, 3)).unwrap();
        assert_eq!(board.floor_at(center).unwrap().bombs.len(), 2);
        assert_eq!(board.floor_at(center).unwrap().bomb_at(3).unwrap().rounds_left, 11);

        // Both bombs keep driving their own blasts.
        board.compute_hazards();
        let left = board.field_at(Position::new(1, 2)).unwrap();
        assert!(left.explodes_at(2));
        assert!(left.explodes_at(11));
    }

    #[test]
    fn test_clone_is_independent() {
        let board = open_board(5, &[(0, 0, 0, 0, 3, 2)], 0);
        let mut copy = board.clone();
        assert_eq!(copy, board);

        copy.place_bomb(Bomb::new(0, 8, 2, Position::new(2, 2), 0)).unwrap();
        copy.compute_hazards();
        assert_ne!(copy, board);
        assert_eq!(board.bombs().count(), 0);
        assert!(board.fields().iter().all(|field| field.explode_at.is_empty()));
        let center = Position::new(2, 2);
        assert_eq!(copy.field_at(center).unwrap().id, board.field_at(center).unwrap().id);
    }
}
