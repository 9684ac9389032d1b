use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use clap::Args;
use pomo_core::storage::SessionStore;
use pomo_core::timer::{SessionTimer, TimerConfig};

/// Flags for the root timer command. Ranges are enforced by clap, so a
/// bad value aborts before any side effect.
#[derive(Args)]
pub struct TimerArgs {
    /// Work session duration in minutes (1-120)
    #[arg(short, long, default_value_t = 25,
          value_parser = clap::value_parser!(u64).range(1..=120))]
    work: u64,

    /// Short break duration in minutes (1-60)
    #[arg(short, long, default_value_t = 5,
          value_parser = clap::value_parser!(u64).range(1..=60))]
    short_break: u64,

    /// Long break duration in minutes (1-120)
    #[arg(short, long, default_value_t = 30,
          value_parser = clap::value_parser!(u64).range(1..=120))]
    long_break: u64,

    /// Number of pomodoros before a long break (1-10)
    #[arg(short = 'c', long = "count", default_value_t = 4,
          value_parser = clap::value_parser!(u32).range(1..=10))]
    count: u32,

    /// Show a real-time countdown during sessions (pass false to sleep
    /// silently; silent intervals cannot be skipped)
    #[arg(short = 'd', long, default_value_t = true,
          action = clap::ArgAction::Set, value_name = "BOOL")]
    countdown: bool,

    /// Session title recorded with the run
    #[arg(long)]
    title: Option<String>,

    /// Goal label recorded with the run
    #[arg(long)]
    goal: Option<String>,
}

pub async fn run(args: TimerArgs) -> anyhow::Result<()> {
    // Open the store before the run starts: a storage failure should
    // surface now, not after half an hour of work.
    let store = SessionStore::open().context("could not access session storage")?;

    let config = TimerConfig {
        work: Duration::from_secs(args.work * 60),
        short_break: Duration::from_secs(args.short_break * 60),
        long_break: Duration::from_secs(args.long_break * 60),
        pomos_until_long_break: args.count,
        show_countdown: args.countdown,
        title: args.title.unwrap_or_default(),
        goal_label: args.goal.unwrap_or_default(),
    };

    let stats = SessionTimer::new(config.clone()).run().await;

    if let Some(record) = stats.into_record(&config, Utc::now()) {
        match store.save_record(&record) {
            Ok(_) => println!("✓ Session saved!"),
            Err(err) => {
                tracing::warn!(error = %err, "could not save session record");
                println!("\n⚠  Warning: could not save session data: {err}");
            }
        }
    }

    println!("\n👋 Good bye!");
    Ok(())
}
