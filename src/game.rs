use std::time::Instant;

use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt};

use crate::error::{BotError, Result};
use crate::infra::{GameObserver, TurnReader};
use crate::planners::{Action, DecisionPolicy};
use crate::state::Board;

pub struct Game<R> {
    reader: TurnReader<R>,
    policy: DecisionPolicy,
    observer: Box<dyn GameObserver>,
}

impl<R: AsyncBufRead + Unpin> Game<R> {
    pub fn new(
        reader: TurnReader<R>,
        policy: DecisionPolicy,
        observer: impl GameObserver + 'static,
    ) -> Self {
        Self {
            reader,
            policy,
            observer: Box::new(observer),
        }
    }

    /// Plays until the input ends, writing one action line per turn to `out`.
    /// Returns the number of turns played.
    pub async fn run<W: AsyncWrite + Unpin>(&mut self, out: &mut W) -> Result<u32> {
        let header = self.reader.read_header().await?;
        self.observer.on_game_start(&header);

        let mut turns = 0;
        while let Some(turn) = self.reader.read_turn(&header).await? {
            let turn_start = Instant::now();
            turns += 1;

            let board = Board::from_turn(&header, &turn)?;
            self.observer.on_turn(turns, &board);

            let action = match self.policy.decide(&board) {
                Ok(action) => action,
                Err(err @ BotError::NoViableRoute { .. }) => {
                    self.observer.on_fallback(turns, &err);
                    Action::Move(board.me().position)
                }
                Err(err) => return Err(err),
            };

            out.write_all(format!("{}\n", action).as_bytes()).await?;
            out.flush().await?;
            self.observer
                .on_action_selected(turns, &action, turn_start.elapsed());
        }

        self.observer.on_game_finished(turns);
        Ok(turns)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::*;
    use crate::infra::{Config, GameHeader};

    #[derive(Clone, Default)]
    struct RecordingObserver {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingObserver {
        fn record(&self, event: String) {
            self.events.lock().unwrap().push(event);
        }
    }

    impl GameObserver for RecordingObserver {
        fn on_game_start(&mut self, header: &GameHeader) {
            self.record(format!("start {}x{}", header.width, header.height));
        }

        fn on_turn(&mut self, turn: u32, _board: &Board) {
            self.record(format!("turn {}", turn));
        }

        fn on_action_selected(&mut self, turn: u32, action: &Action, _elapsed: Duration) {
            self.record(format!("action {} {}", turn, action));
        }

        fn on_fallback(&mut self, turn: u32, _error: &BotError) {
            self.record(format!("fallback {}", turn));
        }

        fn on_game_finished(&mut self, turns: u32) {
            self.record(format!("finished {}", turns));
        }
    }

    fn policy() -> DecisionPolicy {
        DecisionPolicy::new(&Config {
            turn_budget: None,
            ..Config::default()
        })
    }

    #[tokio::test]
    async fn test_one_line_per_turn_with_fallback() {
        // Turn 1: trapped under a bomb, so the loop stays put.
        // Turn 2: open board, the first safe neighbour wins the tie.
        let input = "3 3 0\n\
            X.X\nX.X\nXXX\n\
            2\n\
            0 0 1 0 0 3\n\
            1 1 1 1 1 3\n\
            ...\n...\n...\n\
            1\n\
            0 0 1 1 0 3\n";
        let observer = RecordingObserver::default();
        let mut game = Game::new(TurnReader::new(input.as_bytes()), policy(), observer.clone());

        let mut out = Vec::new();
        let turns = game.run(&mut out).await.unwrap();

        assert_eq!(turns, 2);
        assert_eq!(String::from_utf8(out).unwrap(), "MOVE 1 0\nMOVE 0 1\n");
        assert_eq!(
            *observer.events.lock().unwrap(),
            vec![
                "start 3x3",
                "turn 1",
                "fallback 1",
                "action 1 MOVE 1 0",
                "turn 2",
                "action 2 MOVE 0 1",
                "finished 2",
            ]
        );
    }

    #[tokio::test]
    async fn test_bad_board_is_fatal() {
        let input = "2 1 0\n.Q\n0\n";
        let mut game = Game::new(
            TurnReader::new(input.as_bytes()),
            policy(),
            RecordingObserver::default(),
        );
        let mut out = Vec::new();
        let err = game.run(&mut out).await.unwrap_err();
        assert!(matches!(err, BotError::UnknownGlyph { glyph: 'Q', .. }));
        assert!(out.is_empty());
    }
}
