use std::time::Duration;

use blastbot::infra::{Config, DefaultObserver, ReplayFile, TurnReader};
use blastbot::{DecisionPolicy, Game};
use dotenv::dotenv;
use tokio::io::{AsyncBufRead, BufReader};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("blastbot=debug,info"));

    // stdout carries the actions, so logs go to stderr.
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

async fn play<R: AsyncBufRead + Unpin>(
    input: R,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut reader = TurnReader::new(input);
    if let Some(folder) = &config.replays_folder {
        let replay = ReplayFile::new(folder)?;
        tracing::info!(path = %replay.path().display(), "Recording replay");
        reader = reader.with_replay(replay);
    }

    let slow_turn = config.turn_budget.unwrap_or(Duration::from_millis(100));
    let mut game = Game::new(reader, DecisionPolicy::new(config), DefaultObserver::new(slow_turn));
    let mut stdout = tokio::io::stdout();
    game.run(&mut stdout).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_logging();

    let config = Config::from_env();
    tracing::debug!(?config, "Configuration");

    match config.input.as_deref() {
        Some(path) => {
            tracing::info!("Replaying {}", path.display());
            let file = tokio::fs::File::open(path).await?;
            play(BufReader::new(file), &config).await
        }
        None => play(BufReader::new(tokio::io::stdin()), &config).await,
    }
}
