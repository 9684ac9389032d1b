//! The interactive work/break loop.
//!
//! One `SessionTimer::run` call is one session: work intervals
//! alternate with breaks, a long break replacing the short one every
//! `pomos_until_long_break` completed work intervals. After each break
//! the user decides whether to carry on; declining (or EOF) ends the
//! run and yields the accumulated [`SessionStats`].

use std::io::Write;

use chrono::Utc;
use notify_rust::Notification;
use rand::Rng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use super::countdown::{countdown, spawn_skip_listener, IntervalOutcome};
use super::reflection::reflection_prompt;
use super::{format_duration, IntervalKind, SessionStats, TimerConfig};

/// Drives one interactive session.
pub struct SessionTimer {
    config: TimerConfig,
    stats: SessionStats,
    /// Completed work intervals since the last long break.
    completed_in_cycle: u32,
}

impl SessionTimer {
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            stats: SessionStats::new(Utc::now()),
            completed_in_cycle: 0,
        }
    }

    /// Run the session loop until the user stops, returning the final
    /// counters. Persisting the run is the caller's concern.
    pub async fn run(mut self) -> SessionStats {
        let mut rng = rand::thread_rng();

        println!("\n🍅 Pomodoro timer started!");
        if !self.config.goal_label.is_empty() {
            println!("Goal: {}", self.config.goal_label);
        }
        if !self.config.title.is_empty() {
            println!("Session: {}", self.config.title);
        }
        println!(
            "Configuration: {} work / {} short break / {} long break",
            format_duration(self.config.work),
            format_duration(self.config.short_break),
            format_duration(self.config.long_break),
        );

        loop {
            self.run_work_interval().await;

            if self.completed_in_cycle >= self.config.pomos_until_long_break {
                self.run_break(IntervalKind::LongBreak, &mut rng).await;
                self.completed_in_cycle = 0;
                println!("\n🔄 Starting a new pomodoro cycle!");
            } else {
                self.run_break(IntervalKind::ShortBreak, &mut rng).await;
            }

            if !prompt_continue().await {
                break;
            }
        }

        self.display_summary();
        self.stats
    }

    async fn run_work_interval(&mut self) {
        let number = self.completed_in_cycle + 1;
        println!(
            "\n🎯 Starting pomodoro #{number} ({})",
            format_duration(self.config.work)
        );
        alert("It's time to get into the flow");

        match self.wait_out(self.config.work).await {
            IntervalOutcome::Completed => {
                println!("  ✓ Work session completed!");
                self.stats.record_work_completed(self.config.work);
                self.completed_in_cycle += 1;
                println!("\n✓ Pomodoro #{} completed!", self.completed_in_cycle);
                self.display_progress();
            }
            IntervalOutcome::Skipped => {
                self.stats.record_skip();
            }
        }
    }

    async fn run_break(&mut self, kind: IntervalKind, rng: &mut impl Rng) {
        let duration = match kind {
            IntervalKind::LongBreak => self.config.long_break,
            _ => self.config.short_break,
        };
        let pretty = format_duration(duration);

        if kind == IntervalKind::LongBreak {
            println!("\n☕ Take a long break ({pretty})");
            alert(&format!("Take a long break - {pretty}"));
        } else {
            println!("\n☕ Take a short break ({pretty})");
            alert(&format!("Take a short break - {pretty}"));
        }

        println!("\n💭 {}\n", reflection_prompt(rng, kind));

        match self.wait_out(duration).await {
            IntervalOutcome::Completed => {
                alert(&format!("{pretty} break is over"));
                println!("  ✓ Break completed!");
                self.stats.record_break_completed(duration);
            }
            IntervalOutcome::Skipped => {
                println!("  Break skipped!");
                self.stats.record_skip();
            }
        }
    }

    /// Run one cancelable wait with its own skip listener. The listener
    /// is abandoned as soon as the interval ends, whichever way.
    async fn wait_out(&self, duration: std::time::Duration) -> IntervalOutcome {
        let (tx, mut rx) = mpsc::channel(1);
        let listener = self
            .config
            .show_countdown
            .then(|| spawn_skip_listener(tx));

        let outcome = countdown(duration, self.config.show_countdown, &mut rx).await;

        if let Some(handle) = listener {
            handle.abort();
        }
        outcome
    }

    fn display_progress(&self) {
        print!("\nProgress: ");
        for i in 1..=self.config.pomos_until_long_break {
            if i <= self.completed_in_cycle {
                print!("✓ ");
            } else {
                print!("○ ");
            }
        }
        println!(
            "({}/{})",
            self.completed_in_cycle, self.config.pomos_until_long_break
        );
    }

    fn display_summary(&self) {
        let elapsed = self.stats.elapsed(Utc::now());
        println!("\n📊 Session Summary");
        println!("  Pomodoros completed: {}", self.stats.completed_pomos);
        if self.stats.skipped_sessions > 0 {
            println!("  Sessions skipped: {}", self.stats.skipped_sessions);
        }
        println!("  Total work time: {}", format_duration(self.stats.work_time));
        println!(
            "  Total break time: {}",
            format_duration(self.stats.break_time)
        );
        println!("  Session duration: {}", format_duration(elapsed));
    }
}

/// Advisory only: a failed notification is logged and echoed to the
/// console, never fatal.
fn alert(message: &str) {
    let result = Notification::new()
        .summary("Pomodoro")
        .body(message)
        .show();
    if let Err(err) = result {
        tracing::warn!(error = %err, "desktop notification failed");
        println!("\n🔔 ALERT: {message}");
    }
}

/// Ask whether to run another pomodoro. EOF or a read error stops the
/// run (conservative default); anything other than y/n re-prompts.
async fn prompt_continue() -> bool {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\nContinue with another pomodoro? (y/n): ");
        let _ = std::io::stdout().flush();

        match lines.next_line().await {
            Ok(Some(line)) => match line.trim().to_lowercase().as_str() {
                "y" | "yes" => return true,
                "n" | "no" => return false,
                _ => println!("Please enter 'y' or 'n'"),
            },
            Ok(None) | Err(_) => return false,
        }
    }
}
