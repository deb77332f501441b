use std::io;

use anyhow::{Context, Result};
use tracing::info;

use gambit_uci::UciEngine;

fn main() -> Result<()> {
    // stdout carries the UCI protocol, so logs go to stderr.
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    info!("gambit starting");

    let stdin = io::stdin();
    let stdout = io::stdout();
    UciEngine::new()
        .run(stdin.lock(), &mut stdout.lock())
        .context("UCI loop failed")?;
    Ok(())
}
