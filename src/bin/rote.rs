//! rote - terminal tic-tac-toe against a move-memoizing opponent
//!
//! Plays interactive games on stdin/stdout. The opponent's knowledge base
//! and the game history are read from and written to JSON files in the
//! working directory.

use anyhow::Result;
use clap::Parser;
use rote::{
    Session, SessionConfig, adapters::JsonFileRepository, console::TerminalConsole,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rote")]
#[command(version, about = "Terminal tic-tac-toe against a learning opponent", long_about = None)]
struct Cli {}

fn main() -> Result<()> {
    // Storage warnings stay visible by default; RUST_LOG overrides
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let _cli = Cli::parse();

    let mut session = Session::new(
        TerminalConsole::new(),
        JsonFileRepository::new(),
        SessionConfig::default(),
    );
    session.run()?;
    Ok(())
}
