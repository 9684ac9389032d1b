//! # Pomo Core Library
//!
//! Core business logic for the `pomo` Pomodoro timer CLI.
//!
//! ## Architecture
//!
//! - **Timer**: an interactive work/break state machine whose waits are
//!   cancelable -- each interval races a countdown against a skip signal
//!   typed by the user, and whichever finishes first wins
//! - **Storage**: SQLite-backed append-only session log plus a small
//!   JSON document for goal configuration
//! - **Analytics**: pure functions that turn a slice of stored session
//!   records into aggregate reports, temporal breakdowns, period
//!   comparisons, goal progress, and streaks
//!
//! ## Key Components
//!
//! - [`SessionTimer`]: the interactive timer loop
//! - [`SessionStore`]: session record persistence
//! - [`GoalStore`]: goal configuration persistence
//! - [`ReportStats`]: aggregate statistics over a record set

pub mod analytics;
pub mod error;
pub mod goals;
pub mod report;
pub mod storage;
pub mod timer;

pub use analytics::{
    ComparisonStats, DayOfWeekStats, DaySegment, ProductivityInsights, TimeOfDayStats, Trend,
};
pub use error::{CoreError, GoalsError, Result, StorageError};
pub use goals::{GoalPeriod, GoalProgress, StreakInfo};
pub use report::ReportStats;
pub use storage::{GoalConfig, GoalStore, SessionRecord, SessionStore};
pub use timer::{IntervalKind, SessionStats, SessionTimer, TimerConfig};
