use std::fs::File;

use anyhow::{Context, Result};
use daily_ledger::{bin_utils::Service, clock::SystemClock, config::Limits};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let filename = std::env::args()
        .nth(1)
        .context("Expected a file name as the first argument")?;
    let file = File::open(&filename).with_context(|| format!("Failed to open `{filename}`"))?;
    let limits = Limits::from_env().context("Failed to load limits")?;

    let service = Service {
        input: file,
        output: &mut std::io::stdout(),
        clock: SystemClock,
        limits,
        reporter: Box::new(|line, result| match result {
            Ok(outcome) => eprintln!("line {line}: {outcome}"),
            Err(err) => eprintln!("line {line}: {err}"),
        }),
    };
    service.run()
}
