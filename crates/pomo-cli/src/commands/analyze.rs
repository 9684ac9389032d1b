use anyhow::Context;
use chrono::{Local, Weekday};
use clap::{Args, Subcommand};
use pomo_core::analytics::{
    ComparisonStats, DayOfWeekStats, DaySegment, ProductivityInsights, TimeOfDayStats, Trend,
    WEEKDAYS,
};
use pomo_core::goals::StreakInfo;
use pomo_core::report::{self, ReportStats};
use pomo_core::storage::{SessionRecord, SessionStore};
use pomo_core::timer::format_duration;

use super::goals::weekly_goal_line;

#[derive(Subcommand)]
pub enum AnalyzeAction {
    /// Show comprehensive productivity insights
    Insights(PeriodArgs),
    /// Analyze productivity by time of day
    Time(PeriodArgs),
    /// Analyze productivity by day of week
    Days(PeriodArgs),
    /// Compare productivity against the previous period
    Compare(CompareArgs),
    /// Show your consistency streak
    Streak,
}

#[derive(Args)]
pub struct PeriodArgs {
    /// Analyze this week (default)
    #[arg(long)]
    week: bool,

    /// Analyze this month
    #[arg(long)]
    month: bool,

    /// Analyze all time
    #[arg(long)]
    all: bool,
}

#[derive(Args)]
pub struct CompareArgs {
    /// Compare weeks (default)
    #[arg(long)]
    weeks: bool,

    /// Compare months
    #[arg(long)]
    months: bool,
}

enum Period {
    Week,
    Month,
    All,
}

impl PeriodArgs {
    fn period(&self) -> Period {
        if self.all {
            Period::All
        } else if self.month {
            Period::Month
        } else {
            Period::Week
        }
    }
}

fn load_period(store: &SessionStore, period: &Period) -> anyhow::Result<Vec<SessionRecord>> {
    let now = Local::now();
    let records = match period {
        Period::All => store.load_all()?,
        Period::Month => store.records_since(report::month_start(now))?,
        Period::Week => store.records_since(report::week_start(now))?,
    };
    Ok(records)
}

fn period_suffix(period: &Period) -> &'static str {
    match period {
        Period::All => "All Time",
        Period::Month => "This Month",
        Period::Week => "This Week",
    }
}

pub fn run(action: AnalyzeAction) -> anyhow::Result<()> {
    let store = SessionStore::open().context("could not access session storage")?;

    match action {
        AnalyzeAction::Insights(args) => {
            let period = args.period();
            let records = load_period(&store, &period)?;
            let insights = ProductivityInsights::from_records(&records);
            let stats = ReportStats::from_records(&records);

            display_insights(
                &insights,
                &format!("Productivity Insights - {}", period_suffix(&period)),
                &stats,
            );

            let today = Local::now().date_naive();
            let streak = StreakInfo::calculate(&store.load_all()?, today);
            if streak.current > 0 {
                println!();
                print!("  Streak:          {} days", streak.current);
                if streak.current >= 7 {
                    print!(" 🔥");
                }
                println!();
            }

            // The weekly-goal footer only makes sense for the weekly view.
            if matches!(period, Period::Week) {
                if let Some(line) = weekly_goal_line(&store)? {
                    println!("\n{line}");
                }
            }
            println!();
        }
        AnalyzeAction::Time(args) => {
            let period = args.period();
            let records = load_period(&store, &period)?;
            println!(
                "\n📊 Time of Day Analysis - {}",
                period_suffix(&period)
            );
            display_time_of_day(&TimeOfDayStats::from_records(&records));
            println!();
        }
        AnalyzeAction::Days(args) => {
            let period = args.period();
            let records = load_period(&store, &period)?;
            println!(
                "\n📊 Day of Week Analysis - {}",
                period_suffix(&period)
            );
            display_day_of_week(&DayOfWeekStats::from_records(&records));
            println!();
        }
        AnalyzeAction::Compare(args) => {
            let now = Local::now();
            let (current_start, previous_start, title) = if args.months {
                (
                    report::month_start(now),
                    report::previous_month_start(now),
                    "Month-over-Month Comparison",
                )
            } else {
                (
                    report::week_start(now),
                    report::previous_week_start(now),
                    "Week-over-Week Comparison",
                )
            };

            let current = store.records_since(current_start)?;
            // The previous period ends one second before the current
            // one starts, keeping the two sets disjoint.
            let previous = store
                .records_in_range(previous_start, current_start - chrono::Duration::seconds(1))?;

            let comparison = ComparisonStats::between(
                ReportStats::from_records(&current),
                ReportStats::from_records(&previous),
            );
            display_comparison(&comparison, title);
            println!();
        }
        AnalyzeAction::Streak => {
            let today = Local::now().date_naive();
            let streak = StreakInfo::calculate(&store.load_all()?, today);
            display_streak(&streak);
            println!();
        }
    }
    Ok(())
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn display_time_of_day(tod: &TimeOfDayStats) {
    println!("\n  Time of Day Analysis");
    println!("  ────────────────────────────────────────────");

    for segment in DaySegment::ALL {
        let stats = tod.segment(segment);
        if stats.total_sessions == 0 {
            println!("  {}:\n    No sessions", segment.label());
        } else {
            println!("  {}:", segment.label());
            println!(
                "    Sessions: {} | Pomodoros: {} | Avg: {:.1}",
                stats.total_sessions, stats.total_pomos, stats.average_pomos
            );
        }
    }

    println!();
    match tod.best() {
        Some((segment, avg)) => println!(
            "  Best performing time: {} ({avg:.1} avg pomodoros)",
            segment.label()
        ),
        None => println!("  Best performing time: No data available"),
    }
}

fn display_day_of_week(dow: &DayOfWeekStats) {
    println!("\n  Day of Week Analysis");
    println!("  ────────────────────────────────────────────");

    for weekday in WEEKDAYS {
        let stats = dow.day(weekday);
        let name = format!("{}:", weekday_name(weekday));
        if stats.total_sessions == 0 {
            println!("  {name:<10} No sessions");
        } else {
            println!(
                "  {name:<10} Sessions: {:<3} | Pomodoros: {:<3} | Avg: {:.1}",
                stats.total_sessions, stats.total_pomos, stats.average_pomos
            );
        }
    }

    println!();
    match dow.best() {
        Some((weekday, avg)) => println!(
            "  Most productive day: {} ({avg:.1} avg pomodoros)",
            weekday_name(weekday)
        ),
        None => println!("  Most productive day: No data available"),
    }
}

fn display_comparison(comparison: &ComparisonStats, title: &str) {
    println!("\n  {title}");
    println!("  ════════════════════════════════════════════");

    if comparison.current.total_sessions == 0 && comparison.previous.total_sessions == 0 {
        println!("  No data available for comparison");
        return;
    }

    println!(
        "  This Period:  {} pomodoros | {} work time",
        comparison.current.total_pomos,
        format_duration(comparison.current.total_work_time)
    );
    println!(
        "  Last Period:  {} pomodoros | {} work time",
        comparison.previous.total_pomos,
        format_duration(comparison.previous.total_work_time)
    );
    println!();

    println!(
        "  Change:       {:+} pomodoros ({:+.1}%)",
        comparison.pomo_change, comparison.percent_change
    );

    let symbol = match comparison.trend {
        Trend::Improving => "✓",
        Trend::Declining => "↓",
        Trend::Stable => "→",
    };
    println!("  Trend:        {symbol} {}", comparison.trend);

    if comparison.previous.total_sessions > 0 {
        let delta = comparison.efficiency_current - comparison.efficiency_previous;
        let direction = if delta >= 0.0 { "up" } else { "down" };
        println!(
            "  Focus Rate:   {:.0}% ({direction} {:.0}% from {:.0}%)",
            comparison.efficiency_current,
            delta.abs(),
            comparison.efficiency_previous
        );
    }
}

fn display_insights(insights: &ProductivityInsights, title: &str, stats: &ReportStats) {
    println!("\n📊 {title}");
    println!("  ════════════════════════════════════════════");

    if stats.total_sessions == 0 {
        println!("  No sessions recorded yet");
        return;
    }

    println!("  Sessions:        {} sessions", stats.total_sessions);
    println!("  Total Pomos:     {} pomodoros", stats.total_pomos);

    let efficiency_rating = if insights.focus_efficiency >= 90.0 {
        "excellent"
    } else if insights.focus_efficiency >= 75.0 {
        "good"
    } else {
        "needs improvement"
    };
    println!(
        "  Focus Rate:      {:.0}% ({efficiency_rating})",
        insights.focus_efficiency
    );

    if insights.work_break_ratio > 0.0 {
        let ratio_rating = if (4.0..=6.0).contains(&insights.work_break_ratio) {
            "optimal"
        } else {
            "off-target"
        };
        println!(
            "  Work/Break:      {:.1}:1 ({ratio_rating})",
            insights.work_break_ratio
        );
    }

    let consistency_rating = if insights.consistency_score >= 80.0 {
        "excellent"
    } else if insights.consistency_score >= 60.0 {
        "good"
    } else {
        "needs work"
    };
    println!(
        "  Consistency:     {:.0}/100 ({consistency_rating})",
        insights.consistency_score
    );

    println!();
    match insights.best_segment {
        Some((segment, avg)) => println!(
            "  Best Time:       {} ({avg:.1} avg pomodoros)",
            segment.label()
        ),
        None => println!("  Best Time:       No data available"),
    }
    match insights.best_day {
        Some((weekday, avg)) => println!(
            "  Best Day:        {} ({avg:.1} avg pomodoros)",
            weekday_name(weekday)
        ),
        None => println!("  Best Day:        No data available"),
    }
    println!("  Avg Daily:       {:.1} pomodoros", insights.avg_daily_pomos);
}

pub(super) fn display_streak(streak: &StreakInfo) {
    println!("\n  Consistency Streak");
    println!("  ════════════════════════════════════════════");

    if streak.current == 0 {
        println!("  No active streak");
        if let Some(last) = streak.last_active {
            println!("  Last Active:     {}", last.format("%b %d, %Y"));
        }
        return;
    }

    let fire = if streak.current >= 7 { " 🔥" } else { "" };
    println!("  Current Streak:  {} days{fire}", streak.current);
    println!("  Longest Streak:  {} days", streak.longest);

    let today = Local::now().date_naive();
    let last_active = match streak.last_active {
        Some(last) if last != today => last.format("%b %d, %Y").to_string(),
        _ => "Today".to_string(),
    };
    println!("  Last Active:     {last_active}");
}
