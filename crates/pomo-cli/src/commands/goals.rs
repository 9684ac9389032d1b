use anyhow::{bail, Context};
use chrono::{Local, Utc};
use clap::Subcommand;
use pomo_core::goals::{GoalPeriod, GoalProgress, StreakInfo};
use pomo_core::report;
use pomo_core::storage::{GoalConfig, GoalStore, SessionStore};

#[derive(Subcommand)]
pub enum GoalsAction {
    /// Set daily and/or weekly pomodoro goals
    Set {
        /// Daily pomodoro goal
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        daily: Option<u32>,

        /// Weekly pomodoro goal
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        weekly: Option<u32>,
    },
    /// Show the configured goals
    Show,
    /// Show progress toward your goals
    Progress {
        /// Show daily progress only
        #[arg(long)]
        daily: bool,

        /// Show weekly progress only
        #[arg(long)]
        weekly: bool,
    },
    /// Remove all goals
    Clear,
}

pub fn run(action: GoalsAction) -> anyhow::Result<()> {
    let goal_store = GoalStore::open().context("could not access goal storage")?;

    match action {
        GoalsAction::Set { daily, weekly } => {
            if daily.is_none() && weekly.is_none() {
                bail!("specify at least one goal: --daily <N> and/or --weekly <N>");
            }

            let mut config = goal_store.load()?;
            if let Some(daily) = daily {
                config.daily_goal = daily;
            }
            if let Some(weekly) = weekly {
                config.weekly_goal = weekly;
            }
            config.enabled = true;
            goal_store.save(&mut config)?;

            println!("\n✓ Goals updated");
            display_config(&config);
        }
        GoalsAction::Show => {
            let config = goal_store.load()?;
            if !config.enabled {
                println!("\nNo goals set");
                println!("Set one with: pomo goals set --daily 8 --weekly 40");
                return Ok(());
            }
            display_config(&config);
        }
        GoalsAction::Progress { daily, weekly } => {
            let config = goal_store.load()?;
            if !config.enabled {
                println!("\nNo goals set");
                println!("Set one with: pomo goals set --daily 8 --weekly 40");
                return Ok(());
            }

            // Unconfigured goals are never shown, flag or no flag; a
            // 0/0 progress block would read as an achieved goal.
            let (daily, weekly) = if !daily && !weekly {
                (true, true)
            } else {
                (daily, weekly)
            };
            let show_daily = daily && config.daily_goal > 0;
            let show_weekly = weekly && config.weekly_goal > 0;

            let store = SessionStore::open().context("could not access session storage")?;
            let now = Local::now();

            println!("\n  Goal Progress");
            println!("  ════════════════════════════════════════════");

            if show_daily {
                let start = report::today_start(now);
                let records = store.records_since(start)?;
                let progress = GoalProgress::calculate(
                    config.daily_goal,
                    &records,
                    start,
                    GoalPeriod::Daily,
                    Utc::now(),
                );
                display_progress(&progress, GoalPeriod::Daily);
            }
            if show_weekly {
                let start = report::week_start(now);
                let records = store.records_since(start)?;
                let progress = GoalProgress::calculate(
                    config.weekly_goal,
                    &records,
                    start,
                    GoalPeriod::Weekly,
                    Utc::now(),
                );
                display_progress(&progress, GoalPeriod::Weekly);
            }

            let streak = StreakInfo::calculate(&store.load_all()?, now.date_naive());
            if streak.current > 0 {
                super::analyze::display_streak(&streak);
            }
            println!();
        }
        GoalsAction::Clear => {
            goal_store.clear()?;
            println!("\n✓ Goals cleared");
        }
    }
    Ok(())
}

fn display_config(config: &GoalConfig) {
    println!("\n  Configured Goals");
    println!("  ────────────────────────────────────────────");
    println!("  Daily:   {} pomodoros", config.daily_goal);
    println!("  Weekly:  {} pomodoros", config.weekly_goal);
    if let Some(updated) = config.updated_at {
        println!(
            "  Updated: {}",
            updated.with_timezone(&Local).format("%b %d, %Y %H:%M")
        );
    }
    println!();
}

fn display_progress(progress: &GoalProgress, period: GoalPeriod) {
    println!(
        "\n  {} Goal:     {}/{} pomodoros ({:.0}%)",
        period.label(),
        progress.completed,
        progress.goal,
        progress.percentage
    );
    println!("  Progress:       {}", progress_bar(progress.percentage));

    if progress.remaining == 0 {
        println!("  🎉 Goal achieved!");
    } else if progress.on_track {
        println!(
            "  On track ({} to go, {:.0}% of period elapsed)",
            progress.remaining, progress.percent_elapsed
        );
    } else {
        println!(
            "  Behind schedule ({} to go, {:.0}% of period elapsed)",
            progress.remaining, progress.percent_elapsed
        );
    }
}

fn progress_bar(percentage: f64) -> String {
    let width = 20usize;
    let filled = ((percentage / 100.0 * width as f64) as usize).min(width);
    format!(
        "[{}{}]",
        "█".repeat(filled),
        "░".repeat(width - filled)
    )
}

/// One-line weekly goal summary for the insights footer, or `None`
/// when goals are disabled.
pub(super) fn weekly_goal_line(store: &SessionStore) -> anyhow::Result<Option<String>> {
    let config = GoalStore::open()
        .context("could not access goal storage")?
        .load()?;
    if !config.enabled || config.weekly_goal == 0 {
        return Ok(None);
    }

    let now = Local::now();
    let start = report::week_start(now);
    let records = store.records_since(start)?;
    let progress = GoalProgress::calculate(
        config.weekly_goal,
        &records,
        start,
        GoalPeriod::Weekly,
        Utc::now(),
    );

    let status = if progress.remaining == 0 {
        "achieved 🎉".to_string()
    } else if progress.on_track {
        format!("on track, {} to go", progress.remaining)
    } else {
        format!("behind, {} to go", progress.remaining)
    };
    Ok(Some(format!(
        "  Weekly Goal:     {}/{} pomodoros ({status})",
        progress.completed, progress.goal
    )))
}
