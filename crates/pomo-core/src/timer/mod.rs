//! The interactive session timer.
//!
//! A run is a loop of alternating work and break intervals. Each
//! interval is a cancelable wait ([`countdown`]) racing a countdown
//! against a user skip signal; [`SessionTimer`] drives the loop and
//! [`SessionStats`] owns the accounting.

pub mod countdown;
mod reflection;
mod session;

pub use countdown::{countdown, spawn_skip_listener, IntervalOutcome};
pub use reflection::reflection_prompt;
pub use session::SessionTimer;

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::SessionRecord;

/// Kind of interval the timer is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalKind {
    Work,
    ShortBreak,
    LongBreak,
}

impl IntervalKind {
    pub fn is_break(self) -> bool {
        matches!(self, IntervalKind::ShortBreak | IntervalKind::LongBreak)
    }
}

/// Configuration for one timer run.
#[derive(Debug, Clone)]
pub struct TimerConfig {
    pub work: Duration,
    pub short_break: Duration,
    pub long_break: Duration,
    /// Work intervals between two long breaks.
    pub pomos_until_long_break: u32,
    /// When false, intervals sleep silently and cannot be skipped.
    pub show_countdown: bool,
    pub title: String,
    pub goal_label: String,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work: Duration::from_secs(25 * 60),
            short_break: Duration::from_secs(5 * 60),
            long_break: Duration::from_secs(30 * 60),
            pomos_until_long_break: 4,
            show_countdown: true,
            title: String::new(),
            goal_label: String::new(),
        }
    }
}

/// In-memory counters for the run in progress.
///
/// Completed intervals add their configured duration; skipped intervals
/// add no time at all, only a skip count.
#[derive(Debug, Clone)]
pub struct SessionStats {
    pub completed_pomos: u32,
    pub skipped_sessions: u32,
    pub work_time: Duration,
    pub break_time: Duration,
    pub started_at: DateTime<Utc>,
}

impl SessionStats {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            completed_pomos: 0,
            skipped_sessions: 0,
            work_time: Duration::ZERO,
            break_time: Duration::ZERO,
            started_at,
        }
    }

    pub fn record_work_completed(&mut self, duration: Duration) {
        self.completed_pomos += 1;
        self.work_time += duration;
    }

    pub fn record_break_completed(&mut self, duration: Duration) {
        self.break_time += duration;
    }

    pub fn record_skip(&mut self) {
        self.skipped_sessions += 1;
    }

    /// Wall-clock time since the run started.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        (now - self.started_at).to_std().unwrap_or_default()
    }

    /// Build the historical record for this run, or `None` when no
    /// pomodoro completed -- such runs are discarded, never stored.
    pub fn into_record(self, config: &TimerConfig, now: DateTime<Utc>) -> Option<SessionRecord> {
        if self.completed_pomos == 0 {
            return None;
        }
        let total_duration = self.elapsed(now);
        Some(SessionRecord {
            id: 0,
            started_at: self.started_at,
            title: config.title.clone(),
            goal_label: config.goal_label.clone(),
            completed_pomos: self.completed_pomos,
            skipped_sessions: self.skipped_sessions,
            work_time: self.work_time,
            break_time: self.break_time,
            total_duration,
        })
    }
}

/// `2h 5m` / `45m` style rendering, whole minutes.
pub fn format_duration(d: Duration) -> String {
    let mins = d.as_secs() / 60;
    let (h, m) = (mins / 60, mins % 60);
    if h > 0 {
        format!("{h}h {m}m")
    } else {
        format!("{m}m")
    }
}
