//! Productivity analytics over the session log.
//!
//! Every function here is a pure transformation of a record slice --
//! no hidden state, fully re-playable from storage. Calendar-sensitive
//! grouping (day segments, weekdays, per-date totals) goes through the
//! local timezone of the machine, since records are persisted in UTC.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate, Timelike, Weekday};
use serde::Serialize;

use crate::report::ReportStats;
use crate::storage::SessionRecord;

/// Local calendar date a record belongs to.
pub(crate) fn local_date(record: &SessionRecord) -> NaiveDate {
    record.started_at.with_timezone(&Local).date_naive()
}

/// Four-way partition of the day by local hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DaySegment {
    /// `[6, 12)`
    Morning,
    /// `[12, 18)`
    Afternoon,
    /// `[18, 24)`
    Evening,
    /// `[0, 6)`
    Night,
}

impl DaySegment {
    /// Segments in day order; also the tie-break order for [`TimeOfDayStats::best`].
    pub const ALL: [DaySegment; 4] = [
        DaySegment::Morning,
        DaySegment::Afternoon,
        DaySegment::Evening,
        DaySegment::Night,
    ];

    /// The segment containing a local hour (0-23).
    pub fn of_hour(hour: u32) -> Self {
        match hour {
            6..=11 => DaySegment::Morning,
            12..=17 => DaySegment::Afternoon,
            18..=23 => DaySegment::Evening,
            _ => DaySegment::Night,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DaySegment::Morning => "Morning (6am-12pm)",
            DaySegment::Afternoon => "Afternoon (12pm-6pm)",
            DaySegment::Evening => "Evening (6pm-12am)",
            DaySegment::Night => "Night (12am-6am)",
        }
    }
}

/// Independent aggregate report per day segment.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TimeOfDayStats {
    pub morning: ReportStats,
    pub afternoon: ReportStats,
    pub evening: ReportStats,
    pub night: ReportStats,
}

impl TimeOfDayStats {
    pub fn from_records(records: &[SessionRecord]) -> Self {
        let mut buckets: [Vec<SessionRecord>; 4] = Default::default();
        for record in records {
            let hour = record.started_at.with_timezone(&Local).hour();
            let idx = match DaySegment::of_hour(hour) {
                DaySegment::Morning => 0,
                DaySegment::Afternoon => 1,
                DaySegment::Evening => 2,
                DaySegment::Night => 3,
            };
            buckets[idx].push(record.clone());
        }
        Self {
            morning: ReportStats::from_records(&buckets[0]),
            afternoon: ReportStats::from_records(&buckets[1]),
            evening: ReportStats::from_records(&buckets[2]),
            night: ReportStats::from_records(&buckets[3]),
        }
    }

    pub fn segment(&self, segment: DaySegment) -> &ReportStats {
        match segment {
            DaySegment::Morning => &self.morning,
            DaySegment::Afternoon => &self.afternoon,
            DaySegment::Evening => &self.evening,
            DaySegment::Night => &self.night,
        }
    }

    /// Segment with the strictly highest average pomodoros per session
    /// among segments that have sessions. Ties keep the earlier segment
    /// in day order; `None` when nothing has sessions.
    pub fn best(&self) -> Option<(DaySegment, f64)> {
        best_bucket(DaySegment::ALL.into_iter().map(|s| (s, self.segment(s))))
    }
}

/// Weekday order used for display and tie-breaking.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Independent aggregate report per weekday, Monday first.
#[derive(Debug, Clone, Default)]
pub struct DayOfWeekStats {
    days: [ReportStats; 7],
}

impl DayOfWeekStats {
    pub fn from_records(records: &[SessionRecord]) -> Self {
        let mut buckets: [Vec<SessionRecord>; 7] = Default::default();
        for record in records {
            let weekday = local_date(record).weekday();
            buckets[weekday.num_days_from_monday() as usize].push(record.clone());
        }
        let days = buckets.map(|bucket| ReportStats::from_records(&bucket));
        Self { days }
    }

    pub fn day(&self, weekday: Weekday) -> &ReportStats {
        &self.days[weekday.num_days_from_monday() as usize]
    }

    /// Weekday with the strictly highest average pomodoros per session;
    /// ties keep the earlier day (Monday first).
    pub fn best(&self) -> Option<(Weekday, f64)> {
        best_bucket(WEEKDAYS.into_iter().map(|w| (w, self.day(w))))
    }
}

/// First bucket (in iteration order) with the strictly highest average
/// pomodoros among buckets that have sessions.
fn best_bucket<'a, K: Copy>(
    buckets: impl Iterator<Item = (K, &'a ReportStats)>,
) -> Option<(K, f64)> {
    let mut best = None;
    let mut best_avg = 0.0;
    for (key, stats) in buckets {
        if stats.total_sessions > 0 && stats.average_pomos > best_avg {
            best_avg = stats.average_pomos;
            best = Some((key, stats.average_pomos));
        }
    }
    best
}

/// Period-over-period trend classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Trend::Improving => "improving",
            Trend::Declining => "declining",
            Trend::Stable => "stable",
        };
        f.write_str(s)
    }
}

/// Comparison of a period against the immediately preceding one.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonStats {
    pub current: ReportStats,
    pub previous: ReportStats,
    /// Signed pomodoro delta.
    pub pomo_change: i64,
    pub percent_change: f64,
    pub trend: Trend,
    pub efficiency_current: f64,
    pub efficiency_previous: f64,
}

impl ComparisonStats {
    pub fn between(current: ReportStats, previous: ReportStats) -> Self {
        let pomo_change = i64::from(current.total_pomos) - i64::from(previous.total_pomos);

        let percent_change = if previous.total_pomos > 0 {
            pomo_change as f64 / f64::from(previous.total_pomos) * 100.0
        } else if current.total_pomos > 0 {
            // From zero to anything counts as a 100% increase.
            100.0
        } else {
            0.0
        };

        let trend = if percent_change > 10.0 {
            Trend::Improving
        } else if percent_change < -10.0 {
            Trend::Declining
        } else {
            Trend::Stable
        };

        let efficiency_current = focus_efficiency(&current);
        let efficiency_previous = focus_efficiency(&previous);

        Self {
            current,
            previous,
            pomo_change,
            percent_change,
            trend,
            efficiency_current,
            efficiency_previous,
        }
    }
}

/// Completed pomodoros as a percentage of all attempted intervals;
/// 0 when nothing was attempted.
pub fn focus_efficiency(stats: &ReportStats) -> f64 {
    let attempted = stats.total_pomos + stats.total_skipped;
    if attempted == 0 {
        return 0.0;
    }
    f64::from(stats.total_pomos) / f64::from(attempted) * 100.0
}

/// Work time divided by break time; 0 when break time is zero
/// (deliberate undefined-to-zero policy, not an error).
pub fn work_break_ratio(stats: &ReportStats) -> f64 {
    if stats.total_break_time == Duration::ZERO {
        return 0.0;
    }
    stats.total_work_time.as_secs_f64() / stats.total_break_time.as_secs_f64()
}

/// Regularity of daily output on a 0-100 scale.
///
/// Groups completed pomodoros by local date, takes the coefficient of
/// variation (population standard deviation over mean) of the per-date
/// totals, and maps it through `100 - 50 * CV`, clamped to `[0, 100]`.
pub fn consistency_score(records: &[SessionRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }

    let mut pomos_by_date: HashMap<NaiveDate, u32> = HashMap::new();
    for record in records {
        *pomos_by_date.entry(local_date(record)).or_default() += record.completed_pomos;
    }

    let n = pomos_by_date.len() as f64;
    let sum: f64 = pomos_by_date.values().map(|&c| f64::from(c)).sum();
    let mean = sum / n;
    if mean == 0.0 {
        return 0.0;
    }

    let variance: f64 = pomos_by_date
        .values()
        .map(|&c| {
            let diff = f64::from(c) - mean;
            diff * diff
        })
        .sum::<f64>()
        / n;
    let cv = variance.sqrt() / mean;

    (100.0 - cv * 50.0).clamp(0.0, 100.0)
}

/// The full derived view the `analyze insights` command presents.
#[derive(Debug, Clone)]
pub struct ProductivityInsights {
    pub time_of_day: TimeOfDayStats,
    pub day_of_week: DayOfWeekStats,
    pub best_segment: Option<(DaySegment, f64)>,
    pub best_day: Option<(Weekday, f64)>,
    /// Pomodoros per distinct active local date.
    pub avg_daily_pomos: f64,
    pub focus_efficiency: f64,
    pub work_break_ratio: f64,
    pub consistency_score: f64,
}

impl ProductivityInsights {
    pub fn from_records(records: &[SessionRecord]) -> Self {
        let time_of_day = TimeOfDayStats::from_records(records);
        let day_of_week = DayOfWeekStats::from_records(records);
        let stats = ReportStats::from_records(records);

        let unique_days = records
            .iter()
            .map(local_date)
            .collect::<std::collections::HashSet<_>>()
            .len();
        let avg_daily_pomos = if unique_days > 0 {
            f64::from(stats.total_pomos) / unique_days as f64
        } else {
            0.0
        };

        Self {
            best_segment: time_of_day.best(),
            best_day: day_of_week.best(),
            avg_daily_pomos,
            focus_efficiency: focus_efficiency(&stats),
            work_break_ratio: work_break_ratio(&stats),
            consistency_score: consistency_score(records),
            time_of_day,
            day_of_week,
        }
    }
}
