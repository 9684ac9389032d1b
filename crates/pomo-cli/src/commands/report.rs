use anyhow::Context;
use chrono::Local;
use clap::Args;
use pomo_core::report::{self, ReportStats};
use pomo_core::storage::{SessionRecord, SessionStore};
use pomo_core::timer::format_duration;

#[derive(Args)]
pub struct ReportArgs {
    /// Show today's statistics (default)
    #[arg(long)]
    today: bool,

    /// Show this week's statistics
    #[arg(long)]
    week: bool,

    /// Show this month's statistics
    #[arg(long)]
    month: bool,

    /// Show this year's statistics
    #[arg(long)]
    year: bool,

    /// Show all-time statistics
    #[arg(long)]
    all: bool,

    /// Show a detailed session list
    #[arg(short, long)]
    detailed: bool,
}

pub fn run(args: ReportArgs) -> anyhow::Result<()> {
    let store = SessionStore::open().context("could not access session storage")?;
    let now = Local::now();

    let (records, title) = if args.all {
        (store.load_all()?, "All Time Statistics")
    } else if args.year {
        (
            store.records_since(report::year_start(now))?,
            "This Year's Statistics",
        )
    } else if args.month {
        (
            store.records_since(report::month_start(now))?,
            "This Month's Statistics",
        )
    } else if args.week {
        (
            store.records_since(report::week_start(now))?,
            "This Week's Statistics",
        )
    } else {
        (
            store.records_since(report::today_start(now))?,
            "Today's Statistics",
        )
    };

    let stats = ReportStats::from_records(&records);
    display_report(&stats, title);
    if args.detailed {
        display_recent_sessions(&records);
    }
    Ok(())
}

fn display_report(stats: &ReportStats, title: &str) {
    if stats.total_sessions == 0 {
        println!("\n📊 {title}\n");
        println!("  No sessions recorded yet. Start a pomodoro to begin tracking!");
        return;
    }

    println!("\n📊 {title}");
    println!("  ════════════════════════════════════════════");
    println!("  Total sessions: {}", stats.total_sessions);
    println!("  Total pomodoros: {}", stats.total_pomos);
    if stats.total_skipped > 0 {
        println!("  Sessions skipped: {}", stats.total_skipped);
    }
    println!("  Average pomodoros per session: {:.1}", stats.average_pomos);
    println!();
    println!("  Total work time: {}", format_duration(stats.total_work_time));
    println!("  Total break time: {}", format_duration(stats.total_break_time));
    println!("  Total time: {}", format_duration(stats.total_duration));
    println!("  ════════════════════════════════════════════");
}

/// Records arrive newest-first from the store; show the ten most
/// recent.
fn display_recent_sessions(records: &[SessionRecord]) {
    if records.is_empty() {
        return;
    }

    println!("\n  Recent Sessions:");
    println!("  ────────────────────────────────────────────");

    for record in records.iter().take(10) {
        let date = record
            .started_at
            .with_timezone(&Local)
            .format("%b %d, %Y %H:%M");
        if record.title.is_empty() {
            println!(
                "  {date} - {} 🍅 ({} work)",
                record.completed_pomos,
                format_duration(record.work_time)
            );
        } else {
            println!("  {date} - {}", record.title);
            println!(
                "    {} 🍅 ({} work)",
                record.completed_pomos,
                format_duration(record.work_time)
            );
        }
    }
    println!();
}
