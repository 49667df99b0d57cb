use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

/// Runtime settings, read from the environment (a `.env` file is loaded first by `main`).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Read the game from this file instead of stdin.
    pub input: Option<PathBuf>,
    /// Capture consumed input lines into a replay file in this folder.
    pub replays_folder: Option<PathBuf>,
    /// Look-ahead of the agent's own route search.
    pub horizon: u32,
    /// Look-ahead used to decide whether an opponent can escape its own bomb.
    pub opponent_horizon: u32,
    /// Fuse given to hypothetical bombs.
    pub fuse: u32,
    /// Wall-clock budget per turn; `None` searches exhaustively.
    pub turn_budget: Option<Duration>,
    pub project_opponents: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: None,
            replays_folder: None,
            horizon: 4,
            opponent_horizon: 8,
            fuse: 8,
            turn_budget: Some(Duration::from_millis(90)),
            project_opponents: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let budget_ms = parse_or(&lookup, "BLASTBOT_TURN_BUDGET_MS", 90u64);
        Self {
            input: lookup("BLASTBOT_INPUT").map(PathBuf::from),
            replays_folder: lookup("BLASTBOT_REPLAYS_FOLDER").map(PathBuf::from),
            horizon: parse_or(&lookup, "BLASTBOT_HORIZON", defaults.horizon),
            opponent_horizon: parse_or(&lookup, "BLASTBOT_OPPONENT_HORIZON", defaults.opponent_horizon),
            fuse: parse_or(&lookup, "BLASTBOT_FUSE", defaults.fuse),
            turn_budget: (budget_ms > 0).then(|| Duration::from_millis(budget_ms)),
            project_opponents: parse_or(&lookup, "BLASTBOT_PROJECT_OPPONENTS", defaults.project_opponents),
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring unparsable {}={:?}", key, raw);
            default
        }),
    }
}
