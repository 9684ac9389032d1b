//! Aggregate reporting over session records.
//!
//! [`ReportStats`] is a pure fold over a record slice; the period
//! helpers translate "today", "this week", and friends into UTC
//! instants using the local calendar, since that is the calendar the
//! user sits in.

use std::time::Duration;

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;

use crate::storage::SessionRecord;

/// Aggregate of a record set. Computed, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportStats {
    pub total_sessions: u32,
    pub total_pomos: u32,
    pub total_skipped: u32,
    pub total_work_time: Duration,
    pub total_break_time: Duration,
    pub total_duration: Duration,
    /// Pomodoros per session; 0 when there are no sessions.
    pub average_pomos: f64,
}

impl ReportStats {
    /// Fold a record slice into aggregate statistics. Empty input
    /// yields the all-zero report.
    pub fn from_records(records: &[SessionRecord]) -> Self {
        let mut stats = Self {
            total_sessions: records.len() as u32,
            ..Self::default()
        };

        for record in records {
            stats.total_pomos += record.completed_pomos;
            stats.total_skipped += record.skipped_sessions;
            stats.total_work_time += record.work_time;
            stats.total_break_time += record.break_time;
            stats.total_duration += record.total_duration;
        }

        if stats.total_sessions > 0 {
            stats.average_pomos = f64::from(stats.total_pomos) / f64::from(stats.total_sessions);
        }

        stats
    }
}

/// UTC instant of local midnight on `date`. Midnight can fall inside a
/// DST gap; the first representable instant after it is used then.
fn local_midnight(date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&naive)
        .earliest()
        .or_else(|| {
            Local
                .from_local_datetime(&(naive + chrono::Duration::hours(1)))
                .earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}

/// Start of the local day containing `now`.
pub fn today_start(now: DateTime<Local>) -> DateTime<Utc> {
    local_midnight(now.date_naive())
}

/// Start of the local week containing `now` (Monday).
pub fn week_start(now: DateTime<Local>) -> DateTime<Utc> {
    let date = now.date_naive();
    let back = date.weekday().num_days_from_monday();
    local_midnight(date - Days::new(u64::from(back)))
}

/// Start of the local month containing `now`.
pub fn month_start(now: DateTime<Local>) -> DateTime<Utc> {
    let date = now.date_naive();
    local_midnight(first_of_month(date.year(), date.month()))
}

/// Start of the local year containing `now`.
pub fn year_start(now: DateTime<Local>) -> DateTime<Utc> {
    local_midnight(first_of_month(now.date_naive().year(), 1))
}

/// Monday of the week before the one containing `now`.
pub fn previous_week_start(now: DateTime<Local>) -> DateTime<Utc> {
    let date = now.date_naive();
    let back = date.weekday().num_days_from_monday();
    local_midnight(date - Days::new(u64::from(back) + 7))
}

/// First day of the month before the one containing `now`.
pub fn previous_month_start(now: DateTime<Local>) -> DateTime<Utc> {
    let date = now.date_naive();
    let (year, month) = if date.month() == 1 {
        (date.year() - 1, 12)
    } else {
        (date.year(), date.month() - 1)
    };
    local_midnight(first_of_month(year, month))
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(pomos: u32, skipped: u32, work_secs: u64) -> SessionRecord {
        SessionRecord {
            id: 0,
            started_at: Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap(),
            title: String::new(),
            goal_label: String::new(),
            completed_pomos: pomos,
            skipped_sessions: skipped,
            work_time: Duration::from_secs(work_secs),
            break_time: Duration::from_secs(work_secs / 5),
            total_duration: Duration::from_secs(work_secs + work_secs / 5),
        }
    }

    #[test]
    fn test_empty_records_yield_zero_report() {
        let stats = ReportStats::from_records(&[]);
        assert_eq!(stats, ReportStats::default());
    }

    #[test]
    fn test_report_sums_counts_and_durations() {
        let records = vec![record(4, 1, 6000), record(2, 0, 3000)];
        let stats = ReportStats::from_records(&records);

        assert_eq!(stats.total_sessions, 2);
        assert_eq!(stats.total_pomos, 6);
        assert_eq!(stats.total_skipped, 1);
        assert_eq!(stats.total_work_time, Duration::from_secs(9000));
        assert!((stats.average_pomos - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_report_is_idempotent() {
        let records = vec![record(4, 1, 6000), record(2, 0, 3000)];
        assert_eq!(
            ReportStats::from_records(&records),
            ReportStats::from_records(&records)
        );
    }

    #[test]
    fn test_week_start_is_a_monday() {
        let now = Local.with_ymd_and_hms(2024, 3, 7, 15, 30, 0).unwrap(); // a Thursday
        let start = week_start(now).with_timezone(&Local);
        assert_eq!(start.weekday(), chrono::Weekday::Mon);
        assert_eq!(start.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
    }

    #[test]
    fn test_previous_week_is_seven_days_back() {
        let now = Local.with_ymd_and_hms(2024, 3, 7, 15, 30, 0).unwrap();
        let diff = week_start(now) - previous_week_start(now);
        assert_eq!(diff.num_days(), 7);
    }

    #[test]
    fn test_previous_month_start_wraps_january() {
        let now = Local.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap();
        let start = previous_month_start(now).with_timezone(&Local);
        assert_eq!(start.date_naive(), NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());
    }

    fn records_strategy() -> impl Strategy<Value = Vec<SessionRecord>> {
        prop::collection::vec((0u32..6, 0u32..4, 0u64..20_000), 0..8).prop_map(|raw| {
            raw.into_iter()
                .map(|(pomos, skipped, secs)| record(pomos, skipped, secs))
                .collect()
        })
    }

    proptest! {
        /// Counts are additive across disjoint record sets; the average
        /// must be recomputed, not summed.
        #[test]
        fn prop_report_counts_are_additive(a in records_strategy(), b in records_strategy()) {
            let mut combined = a.clone();
            combined.extend(b.iter().cloned());

            let sa = ReportStats::from_records(&a);
            let sb = ReportStats::from_records(&b);
            let sc = ReportStats::from_records(&combined);

            prop_assert_eq!(sc.total_sessions, sa.total_sessions + sb.total_sessions);
            prop_assert_eq!(sc.total_pomos, sa.total_pomos + sb.total_pomos);
            prop_assert_eq!(sc.total_skipped, sa.total_skipped + sb.total_skipped);
            prop_assert_eq!(sc.total_work_time, sa.total_work_time + sb.total_work_time);
            prop_assert_eq!(sc.total_break_time, sa.total_break_time + sb.total_break_time);
            prop_assert_eq!(sc.total_duration, sa.total_duration + sb.total_duration);
        }
    }
}
