//! Action log replay runner (default binary).
//!
//! Reads a JSON-lines action log from the path given as the first argument
//! (or stdin), replays it through the game reducer and prints a JSON summary
//! with the final state digest on stdout. Logs go to stderr.

use std::fs::File;
use std::io::{self, BufReader};

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use duel_tetris::config::ReplayConfig;
use duel_tetris::replay::replay;

fn main() -> Result<()> {
    let config = ReplayConfig::from_env()?;
    init_tracing(&config.log_level);

    info!(bump_policy = config.bump_policy.as_str(), "Starting replay");

    let (_, summary) = match std::env::args().nth(1) {
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("opening {path}"))?;
            replay(BufReader::new(file), &config)?
        }
        None => replay(io::stdin().lock(), &config)?,
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(io::stderr),
        )
        .init();
}
