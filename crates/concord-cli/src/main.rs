//! Concord CLI - partitioned association-rule consensus.
//!
//! The main entry point for the `concord` binary.

use anyhow::{Context, Result};
use clap::Parser;

use concord_cli::{execute, Cli};

fn main() -> Result<()> {
    concord_core::tracing::init_tracing();

    let cli = Cli::parse();
    let root = std::env::current_dir().context("Failed to determine working directory")?;
    let outcome = execute(&cli, &root)?;

    let stats = outcome.stats;
    println!(
        "{} of {} partitions mined in {:.2?}; {} rules ranked",
        stats.succeeded,
        stats.submitted,
        stats.elapsed,
        outcome.entries.len()
    );
    if !stats.is_complete() {
        println!("  failed partitions: {:?}", stats.failed_partitions());
    }
    for entry in outcome.entries.iter().take(10) {
        println!("  {:>4}: {}", entry.votes, entry.rule);
    }
    Ok(())
}
