//! Goal progress and streak calculations.
//!
//! Pure functions of a record slice plus an explicit current instant;
//! the caller decides what "now" and "today" are, which keeps every
//! edge case testable without a clock.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::Serialize;

use crate::analytics::local_date;
use crate::storage::SessionRecord;

/// Which goal window a progress check covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalPeriod {
    Daily,
    Weekly,
}

impl GoalPeriod {
    /// Fixed denominator for elapsed-percentage: 24h or 7x24h.
    pub fn length(self) -> chrono::Duration {
        match self {
            GoalPeriod::Daily => chrono::Duration::hours(24),
            GoalPeriod::Weekly => chrono::Duration::hours(7 * 24),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GoalPeriod::Daily => "Daily",
            GoalPeriod::Weekly => "Weekly",
        }
    }
}

/// Progress toward one goal within its period.
#[derive(Debug, Clone, Serialize)]
pub struct GoalProgress {
    pub goal: u32,
    pub completed: u32,
    /// Percentage of the goal reached; 0 when the goal is 0.
    pub percentage: f64,
    /// Pomodoros still to go; never negative.
    pub remaining: u32,
    /// True when progress keeps pace with elapsed time, or the goal is
    /// already met. Exact equality counts as on track.
    pub on_track: bool,
    pub percent_elapsed: f64,
}

impl GoalProgress {
    /// Compute progress from records already restricted to the goal's
    /// period.
    pub fn calculate(
        goal: u32,
        records: &[SessionRecord],
        period_start: DateTime<Utc>,
        period: GoalPeriod,
        now: DateTime<Utc>,
    ) -> Self {
        let completed: u32 = records.iter().map(|r| r.completed_pomos).sum();

        let percentage = if goal > 0 {
            f64::from(completed) / f64::from(goal) * 100.0
        } else {
            0.0
        };

        let remaining = goal.saturating_sub(completed);

        let elapsed = now - period_start;
        let percent_elapsed =
            elapsed.num_seconds() as f64 / period.length().num_seconds() as f64 * 100.0;

        let on_track = percentage >= percent_elapsed || completed >= goal;

        Self {
            goal,
            completed,
            percentage,
            remaining,
            on_track,
            percent_elapsed,
        }
    }
}

/// Current and longest runs of consecutive active calendar days.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StreakInfo {
    /// Consecutive active days ending today; 0 if today is inactive.
    pub current: u32,
    /// Longest consecutive run anywhere in history; never less than
    /// `current`.
    pub longest: u32,
    pub last_active: Option<NaiveDate>,
}

impl StreakInfo {
    /// Derive streaks from the full history. A day is active when at
    /// least one record on it has a completed pomodoro; zero-pomodoro
    /// records never contribute a date.
    pub fn calculate(records: &[SessionRecord], today: NaiveDate) -> Self {
        let mut dates: Vec<NaiveDate> = records
            .iter()
            .filter(|r| r.completed_pomos > 0)
            .map(local_date)
            .collect();
        dates.sort_unstable();
        dates.dedup();

        if dates.is_empty() {
            return Self::default();
        }

        let last_active = dates.last().copied();
        let active = |date: NaiveDate| dates.binary_search(&date).is_ok();

        let mut current = 0;
        if active(today) {
            current = 1;
            let mut check = today - Days::new(1);
            while active(check) {
                current += 1;
                check = check - Days::new(1);
            }
        }

        let mut longest = 1;
        let mut run = 1;
        for pair in dates.windows(2) {
            if pair[0].succ_opt() == Some(pair[1]) {
                run += 1;
                longest = longest.max(run);
            } else {
                run = 1;
            }
        }

        // A current streak straddling "today" with no historical peer
        // still bounds the longest from below.
        longest = longest.max(current);

        Self {
            current,
            longest,
            last_active,
        }
    }
}
