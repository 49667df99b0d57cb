use crate::infra::Round;
use crate::state::board::Board;
use crate::state::field::{Cell, Field};

impl Board {
    /// One glyph per cell: occupants first, then the earliest explosion round
    /// (last digit), `-` for cells that never burn.
    pub fn hazard_map(&self) -> String {
        self.render(|field| match &field.cell {
            Cell::Wall => 'X',
            Cell::Floor(floor) => {
                if floor.has_player(0) {
                    if floor.has_bomb(0) { 'P' } else { 'p' }
                } else if floor.has_bomb(0) {
                    'b'
                } else if floor.has_item(0) {
                    'i'
                } else if floor.has_box(0) {
                    'o'
                } else {
                    field
                        .explode_at
                        .first()
                        .and_then(|round| char::from_digit(round % 10, 10))
                        .unwrap_or('-')
                }
            }
        })
    }

    pub fn accessibility_map(&self, round: Round) -> String {
        self.render(|field| if field.is_accessible(round) { '.' } else { 'x' })
    }

    fn render(&self, glyph: impl Fn(&Field) -> char) -> String {
        self.fields()
            .chunks(self.width())
            .map(|row| {
                row.iter()
                    .map(|field| glyph(field).to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use crate::state::board::fixtures::board;

    #[test]
    fn test_hazard_map_glyphs() {
        let mut board = board(
            &["...X", "..1.", "...."],
            &[(0, 0, 0, 0, 1, 2), (1, 1, 1, 1, 3, 2), (2, 0, 3, 2, 1, 0)],
            0,
        );
        board.compute_hazards();
        let expected = "p 3 - X\n3 b o -\n- 3 - i";
        assert_eq!(board.hazard_map(), expected);
    }

    #[test]
    fn test_accessibility_map() {
        let board = board(&["X.0", "..."], &[(0, 0, 1, 1, 1, 2), (1, 0, 2, 1, 4, 2)], 0);
        assert_eq!(board.accessibility_map(0), "x . x\n. . x");
        assert_eq!(board.accessibility_map(5), "x . x\n. . .");
    }
}
