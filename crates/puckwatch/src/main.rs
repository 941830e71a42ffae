// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! puckwatch - live NHL game tracking with chat notifications.
//!
//! This is the binary entry point for the puckwatch tracker.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use anyhow::Context;
use clap::{Parser, Subcommand};

mod enqueue;
mod schedule;
mod serve;
mod shutdown;
mod wiring;

/// puckwatch - live NHL game tracking with chat notifications.
#[derive(Parser, Debug)]
#[command(name = "puckwatch", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the tracking worker: gateway endpoint plus queue consumer.
    Serve,
    /// Seed one tracking task per future game on the day's schedule.
    Schedule {
        /// Target date (YYYY-MM-DD). Defaults to today UTC.
        #[arg(long)]
        date: Option<String>,
    },
    /// Enqueue one ad-hoc game-tracking task.
    Enqueue {
        /// Game id to track.
        #[arg(long)]
        game: String,
        /// Execution window length, in hours.
        #[arg(long, default_value_t = 5)]
        duration: i64,
        /// Delay before the first check, in seconds.
        #[arg(long, default_value_t = 0)]
        delay: i64,
        /// Whether the task should send notifications.
        #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
        notify: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = puckwatch_config::load_config().context("loading configuration")?;
    wiring::init_tracing(&config.tracker.log_level);

    if let Err(errors) = puckwatch_config::validate_config(&config) {
        for error in &errors {
            eprintln!("error: {error}");
        }
        anyhow::bail!("invalid configuration ({} problems)", errors.len());
    }

    match cli.command {
        Commands::Serve => serve::run_serve(config).await?,
        Commands::Schedule { date } => schedule::run_schedule(config, date.as_deref()).await?,
        Commands::Enqueue {
            game,
            duration,
            delay,
            notify,
        } => {
            enqueue::run_enqueue(
                config,
                enqueue::EnqueueArgs {
                    game,
                    duration_hours: duration,
                    delay_seconds: delay,
                    notify,
                },
            )
            .await?
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Verify jemalloc is the global allocator by advancing the epoch.
        // Only jemalloc supports this -- the system allocator would fail.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }
}
