use std::fmt;
use std::str::FromStr;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::{trace, warn};

use crate::error::{BotError, Result};
use crate::infra::replay::ReplayFile;
use crate::infra::{PlayerId, Position};

/// Sent once at game start: `width height myId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameHeader {
    pub width: usize,
    pub height: usize,
    pub my_id: PlayerId,
}

impl FromStr for GameHeader {
    type Err = BotError;

    fn from_str(line: &str) -> Result<Self> {
        let [width, height, my_id] = numbers::<3>(line)?;
        let dimension = |value: i32, what: &str| {
            usize::try_from(value)
                .ok()
                .filter(|&v| v > 0)
                .ok_or_else(|| malformed(line, format!("{} must be positive", what)))
        };
        Ok(Self {
            width: dimension(width, "width")?,
            height: dimension(height, "height")?,
            my_id,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Bomb,
    Item,
    Box,
}

impl TryFrom<i32> for EntityKind {
    type Error = BotError;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(EntityKind::Player),
            1 => Ok(EntityKind::Bomb),
            2 => Ok(EntityKind::Item),
            3 => Ok(EntityKind::Box),
            _ => Err(BotError::UnknownEntityKind(value)),
        }
    }
}

impl EntityKind {
    fn code(self) -> i32 {
        match self {
            EntityKind::Player => 0,
            EntityKind::Bomb => 1,
            EntityKind::Item => 2,
            EntityKind::Box => 3,
        }
    }
}

/// `kind owner x y param1 param2`. Parameters depend on the kind:
/// player (bombs left, range), bomb (fuse, range), item (item type), box (content).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityRecord {
    pub kind: EntityKind,
    pub owner: PlayerId,
    pub position: Position,
    pub param1: i32,
    pub param2: i32,
}

impl FromStr for EntityRecord {
    type Err = BotError;

    fn from_str(line: &str) -> Result<Self> {
        let [kind, owner, x, y, param1, param2] = numbers::<6>(line)?;
        Ok(Self {
            kind: EntityKind::try_from(kind)?,
            owner,
            position: Position::new(x, y),
            param1,
            param2,
        })
    }
}

impl fmt::Display for EntityRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.kind.code(),
            self.owner,
            self.position.x,
            self.position.y,
            self.param1,
            self.param2
        )
    }
}

/// Raw state of one turn, as handed to `Board::from_turn`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnInput {
    pub rows: Vec<String>,
    pub entities: Vec<EntityRecord>,
}

fn malformed(line: &str, reason: impl Into<String>) -> BotError {
    BotError::MalformedLine {
        line: line.to_string(),
        reason: reason.into(),
    }
}

fn numbers<const N: usize>(line: &str) -> Result<[i32; N]> {
    let values = line
        .split_whitespace()
        .map(|token| {
            token
                .parse::<i32>()
                .map_err(|err| malformed(line, format!("{:?}: {}", token, err)))
        })
        .collect::<Result<Vec<_>>>()?;
    let count = values.len();
    values
        .try_into()
        .map_err(|_| malformed(line, format!("expected {} numbers, found {}", N, count)))
}

/// Reads the line protocol: a header once, then one turn at a time.
pub struct TurnReader<R> {
    lines: Lines<R>,
    replay: Option<ReplayFile>,
}

impl<R: AsyncBufRead + Unpin> TurnReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            replay: None,
        }
    }

    pub fn with_replay(mut self, replay: ReplayFile) -> Self {
        self.replay = Some(replay);
        self
    }

    async fn next_line(&mut self) -> Result<Option<String>> {
        let Some(line) = self.lines.next_line().await? else {
            return Ok(None);
        };
        let line = line.trim_end().to_string();
        trace!(line = %line, "<");
        if let Some(replay) = self.replay.as_mut()
            && let Err(err) = replay.append(&line)
        {
            warn!(error = %err, "Replay capture failed, disabling it");
            self.replay = None;
        }
        Ok(Some(line))
    }

    async fn expect_line(&mut self, expected: &'static str) -> Result<String> {
        self.next_line()
            .await?
            .ok_or(BotError::UnexpectedEof { expected })
    }

    pub async fn read_header(&mut self) -> Result<GameHeader> {
        self.expect_line("game header").await?.parse()
    }

    /// Next turn, or `None` once the input is exhausted between turns.
    pub async fn read_turn(&mut self, header: &GameHeader) -> Result<Option<TurnInput>> {
        let Some(first_row) = self.next_line().await? else {
            return Ok(None);
        };

        let mut rows = Vec::with_capacity(header.height);
        rows.push(first_row);
        while rows.len() < header.height {
            rows.push(self.expect_line("board row").await?);
        }

        let count_line = self.expect_line("entity count").await?;
        let count: usize = count_line
            .trim()
            .parse()
            .map_err(|_| malformed(&count_line, "entity count"))?;

        let mut entities = Vec::with_capacity(count);
        for _ in 0..count {
            entities.push(self.expect_line("entity").await?.parse()?);
        }

        Ok(Some(TurnInput { rows, entities }))
    }
}
