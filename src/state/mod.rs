mod board;
mod explosion;
mod field;
mod obstacle;
mod render;

pub use board::{BombRef, Board};
pub use explosion::{BOX_VALUE, round_weighted};
pub use field::{Cell, Field, FieldId, Floor};
pub use obstacle::{Bomb, Item, ItemKind, Player, Presence, WoodBox, box_content};

#[cfg(test)]
pub(crate) use board::fixtures;
