use std::error::Error;
use std::fmt;
use std::io;

use crate::infra::Position;

#[derive(Debug)]
pub enum BotError {
    Io(io::Error),
    /// Input ended in the middle of a header or turn.
    UnexpectedEof { expected: &'static str },
    MalformedLine { line: String, reason: String },
    UnknownGlyph { glyph: char, position: Position },
    UnknownEntityKind(i32),
    UnknownItemType(i32),
    RowWidthMismatch { row: usize, expected: usize, actual: usize },
    EntityOutOfBounds { position: Position },
    EntityOnWall { position: Position },
    MissingSelf { id: i32 },
    CellOccupied { position: Position },
    NoViableRoute { from: Position },
}

impl fmt::Display for BotError {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BotError::Io(err) => write!(formatter, "I/O error: {}", err),
            BotError::UnexpectedEof { expected } => {
                write!(formatter, "Input ended while reading {}", expected)
            }
            BotError::MalformedLine { line, reason } => {
                write!(formatter, "Malformed input line {:?}: {}", line, reason)
            }
            BotError::UnknownGlyph { glyph, position } => {
                write!(formatter, "Unknown cell glyph {:?} at {}", glyph, position)
            }
            BotError::UnknownEntityKind(kind) => write!(formatter, "Unknown entity kind {}", kind),
            BotError::UnknownItemType(item) => write!(formatter, "Unknown item type {}", item),
            BotError::RowWidthMismatch { row, expected, actual } => write!(
                formatter,
                "Board row {} has {} cells, expected {}",
                row, actual, expected
            ),
            BotError::EntityOutOfBounds { position } => {
                write!(formatter, "Entity at {} lies outside the board", position)
            }
            BotError::EntityOnWall { position } => {
                write!(formatter, "Entity at {} sits on a wall", position)
            }
            BotError::MissingSelf { id } => {
                write!(formatter, "Own player {} is not on the board", id)
            }
            BotError::CellOccupied { position } => {
                write!(formatter, "Cell {} already holds a bomb", position)
            }
            BotError::NoViableRoute { from } => {
                write!(formatter, "No safe route out of {}", from)
            }
        }
    }
}

impl Error for BotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BotError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for BotError {
    fn from(err: io::Error) -> Self {
        BotError::Io(err)
    }
}

pub type Result<T> = std::result::Result<T, BotError>;
