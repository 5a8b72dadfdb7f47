//! Skill tracker CLI - personal skill-learning tracker with practice streaks.

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use skill_tracker::cli::{commands::RunContext, run, Cli};
use skill_tracker::storage::FileSlot;
use skill_tracker::{Config, SkillStore, SystemClock};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    init_tracing(&config, cli.verbose);

    let slot = FileSlot::new(&config.data_dir, &config.slot_name);
    let ctx = RunContext {
        slot_path: slot.path().to_path_buf(),
        slot_existed: slot.path().exists(),
    };
    tracing::debug!(slot = %ctx.slot_path.display(), "opening store");

    let mut store = SkillStore::open(slot, SystemClock)
        .with_context(|| format!("Failed to open {}", ctx.slot_path.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(cli.command, &mut store, &ctx, &mut out)?;

    if store.is_dirty() {
        store.flush().context("Failed to save state")?;
    }
    Ok(())
}

/// Log to stderr. `RUST_LOG` wins over the configured filter; `-v` wins over both.
fn init_tracing(config: &Config, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("skill_tracker=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
