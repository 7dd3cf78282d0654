//! Group-by aggregation of usage sessions and health samples.
//!
//! Every function borrows its input and returns a freshly built
//! [`Series`] or [`Table`]; keys come out in ascending order.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use lens_core::formatting::ratio_percent;
use lens_core::models::{CategorizedUsage, HealthSample, MetricType, Productivity, UsageSession};
use serde::{Deserialize, Serialize};

use crate::table::{HourOfDay, Series, Table, Week};

pub use lens_core::time_utils::week_start;

/// Column holding all usage hours in [`daily_productivity`].
pub const TOTAL_HOURS: &str = "total_hours";
/// Column holding the productive share of usage, in percent.
pub const PRODUCTIVE_RATIO: &str = "productive_ratio";

const HOURS: &str = "hours";

// ── Generic aggregation ───────────────────────────────────────────────────────

/// How the values falling on one key are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reduction {
    Sum,
    Mean,
    /// Number of non-missing values.
    Count,
}

/// Group `records` by `key_fn` and reduce the values produced by
/// `value_fn`.
///
/// Missing (`None`) and non-finite values are excluded. A key whose values
/// are all missing does not appear in the output.
pub fn aggregate<T, K>(
    records: &[T],
    key_fn: impl Fn(&T) -> K,
    value_fn: impl Fn(&T) -> Option<f64>,
    reduction: Reduction,
    name: &str,
) -> Series<K>
where
    K: Ord + Clone,
{
    let mut groups: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for record in records {
        let Some(value) = value_fn(record).filter(|v| v.is_finite()) else {
            continue;
        };
        let acc = groups.entry(key_fn(record)).or_insert((0.0, 0));
        acc.0 += value;
        acc.1 += 1;
    }

    Series::from_pairs(
        name,
        groups.into_iter().map(|(k, (sum, n))| {
            let v = match reduction {
                Reduction::Sum => sum,
                Reduction::Mean => sum / n as f64,
                Reduction::Count => n as f64,
            };
            (k, v)
        }),
    )
}

/// Sum of all values in `series`.
pub fn total<K: Ord + Clone>(series: &Series<K>) -> f64 {
    series.values().sum()
}

// ── Usage ─────────────────────────────────────────────────────────────────────

/// Usage hours per calendar day (UTC start date).
pub fn usage_by_date(sessions: &[UsageSession]) -> Series<NaiveDate> {
    aggregate(sessions, |s| s.date(), |s| Some(s.duration_hours()), Reduction::Sum, HOURS)
}

/// Usage hours per hour of day the session started in.
pub fn usage_by_hour(sessions: &[UsageSession]) -> Series<HourOfDay> {
    aggregate(
        sessions,
        |s| HourOfDay(s.hour()),
        |s| Some(s.duration_hours()),
        Reduction::Sum,
        HOURS,
    )
}

/// Usage hours per Monday-anchored week.
pub fn usage_by_week(sessions: &[UsageSession]) -> Series<Week> {
    aggregate(
        sessions,
        |s| Week::containing(s.date()),
        |s| Some(s.duration_hours()),
        Reduction::Sum,
        HOURS,
    )
}

pub fn usage_by_date_and_category(usage: &[CategorizedUsage]) -> Series<(NaiveDate, String)> {
    aggregate(
        usage,
        |u| (u.session.date(), u.category.label.clone()),
        |u| Some(u.session.duration_hours()),
        Reduction::Sum,
        HOURS,
    )
}

pub fn usage_by_week_and_category(usage: &[CategorizedUsage]) -> Series<(Week, String)> {
    aggregate(
        usage,
        |u| (Week::containing(u.session.date()), u.category.label.clone()),
        |u| Some(u.session.duration_hours()),
        Reduction::Sum,
        HOURS,
    )
}

/// Total hours per app, largest first. Ties are ordered by app name.
pub fn usage_by_app(sessions: &[UsageSession]) -> Vec<(String, f64)> {
    let by_app = aggregate(
        sessions,
        |s| s.app.clone(),
        |s| Some(s.duration_hours()),
        Reduction::Sum,
        HOURS,
    );
    let mut ranked: Vec<(String, f64)> = by_app.iter().map(|(k, v)| (k.clone(), v)).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

// ── Health ────────────────────────────────────────────────────────────────────

/// Which sleep samples count toward a night's total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SleepPolicy {
    /// Every sleep-analysis sample, including in-bed and awake intervals.
    #[default]
    All,
    /// Only asleep stages (unspecified, core, deep, REM).
    AsleepOnly,
}

/// Nightly sleep hours.
///
/// A sample is credited to the day after it starts, so a night beginning at
/// 23:30 on the 10th counts toward the 11th.
pub fn sleep_by_night(samples: &[HealthSample], policy: SleepPolicy) -> Series<NaiveDate> {
    let selected: Vec<&HealthSample> = samples
        .iter()
        .filter(|s| s.metric == MetricType::SleepAnalysis)
        .filter(|s| match policy {
            SleepPolicy::All => true,
            SleepPolicy::AsleepOnly => s.sleep_state().is_some_and(|st| st.is_asleep()),
        })
        .collect();

    aggregate(
        &selected,
        |s| s.date() + Duration::days(1),
        |s| s.duration_hours(),
        Reduction::Sum,
        "sleep_hours",
    )
}

/// Per-day reduction of one metric's values.
pub fn metric_by_date(
    samples: &[HealthSample],
    metric: MetricType,
    reduction: Reduction,
) -> Series<NaiveDate> {
    let selected: Vec<&HealthSample> = samples.iter().filter(|s| s.metric == metric).collect();
    aggregate(&selected, |s| s.date(), |s| s.value, reduction, metric.short_name())
}

/// Per-hour-of-day reduction of one metric's values.
pub fn metric_by_hour(
    samples: &[HealthSample],
    metric: MetricType,
    reduction: Reduction,
) -> Series<HourOfDay> {
    let selected: Vec<&HealthSample> = samples.iter().filter(|s| s.metric == metric).collect();
    aggregate(
        &selected,
        |s| HourOfDay(s.hour()),
        |s| s.value,
        reduction,
        metric.short_name(),
    )
}

// ── Smoothing ─────────────────────────────────────────────────────────────────

/// Trailing mean over the last `window` points (not calendar days).
///
/// The window shrinks at the start of the series, so the first output equals
/// the first input. A `window` of 0 is treated as 1.
pub fn rolling_mean<K: Ord + Clone>(series: &Series<K>, window: usize) -> Series<K> {
    let window = window.max(1);
    let values: Vec<(&K, f64)> = series.iter().collect();
    let mut out = Vec::with_capacity(values.len());

    for i in 0..values.len() {
        let points = &values[(i + 1).saturating_sub(window)..=i];
        let sum: f64 = points.iter().map(|(_, v)| v).sum();
        out.push((values[i].0.clone(), sum / points.len() as f64));
    }

    Series::from_pairs(format!("{}_rolling", series.name()), out)
}

// ── Productivity ──────────────────────────────────────────────────────────────

/// Column name for a productivity bucket, e.g. `"productive_hours"`.
pub fn bucket_column(bucket: Productivity) -> String {
    format!("{}_hours", bucket.as_str().to_lowercase())
}

/// Per-day usage split by productivity bucket.
///
/// Columns: [`TOTAL_HOURS`], one `<bucket>_hours` column per
/// [`Productivity`] variant (zero when the day has no usage in it), and
/// [`PRODUCTIVE_RATIO`] (missing when the day's total is zero).
pub fn daily_productivity(usage: &[CategorizedUsage]) -> Table<NaiveDate> {
    let mut per_day: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for u in usage {
        let idx = Productivity::ALL
            .iter()
            .position(|p| *p == u.category.productivity)
            .unwrap_or(Productivity::ALL.len() - 1);
        per_day
            .entry(u.session.date())
            .or_insert_with(|| vec![0.0; Productivity::ALL.len()])[idx] +=
            u.session.duration_hours();
    }

    let mut columns = vec![TOTAL_HOURS.to_string()];
    columns.extend(Productivity::ALL.iter().map(|p| bucket_column(*p)));
    columns.push(PRODUCTIVE_RATIO.to_string());

    let productive_idx = Productivity::ALL
        .iter()
        .position(|p| *p == Productivity::Productive)
        .unwrap_or(0);

    let mut table = Table::new(columns);
    for (date, buckets) in per_day {
        let total_hours: f64 = buckets.iter().sum();
        let mut row = vec![Some(total_hours)];
        row.extend(buckets.iter().map(|h| Some(*h)));
        row.push(ratio_percent(buckets[productive_idx], total_hours));
        table.insert(date, row);
    }
    table
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use lens_core::categories::{Categorizer, CategoryTable};

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn session(app: &str, start: &str, end: &str) -> UsageSession {
        UsageSession::new(app, ts(start), ts(end)).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sleep(start: &str, end: &str, code: f64) -> HealthSample {
        HealthSample {
            metric: MetricType::SleepAnalysis,
            start: ts(start),
            end: Some(ts(end)),
            value: Some(code),
        }
    }

    fn heart(start: &str, bpm: Option<f64>) -> HealthSample {
        HealthSample {
            metric: MetricType::HeartRate,
            start: ts(start),
            end: None,
            value: bpm,
        }
    }

    fn scenario_sessions() -> Vec<UsageSession> {
        vec![
            session(
                "com.netflix.Netflix",
                "2024-03-01T20:00:00Z",
                "2024-03-01T21:00:00Z",
            ),
            session(
                "com.microsoft.VSCode",
                "2024-03-01T09:00:00Z",
                "2024-03-01T17:00:00Z",
            ),
        ]
    }

    // ── aggregate ─────────────────────────────────────────────────────────────

    #[test]
    fn test_aggregate_reductions() {
        let data = vec![(1, Some(2.0)), (1, Some(4.0)), (2, Some(5.0))];
        let sum = aggregate(&data, |r| r.0, |r| r.1, Reduction::Sum, "v");
        let mean = aggregate(&data, |r| r.0, |r| r.1, Reduction::Mean, "v");
        let count = aggregate(&data, |r| r.0, |r| r.1, Reduction::Count, "v");

        assert_eq!(sum.get(&1), Some(6.0));
        assert_eq!(mean.get(&1), Some(3.0));
        assert_eq!(count.get(&1), Some(2.0));
        assert_eq!(count.get(&2), Some(1.0));
    }

    #[test]
    fn test_aggregate_excludes_missing_values() {
        let data = vec![(1, Some(2.0)), (1, None), (2, None), (3, Some(f64::NAN))];
        let mean = aggregate(&data, |r| r.0, |r| r.1, Reduction::Mean, "v");
        assert_eq!(mean.get(&1), Some(2.0));
        assert_eq!(mean.get(&2), None, "all-missing key is omitted");
        assert_eq!(mean.get(&3), None);
        assert_eq!(mean.len(), 1);
    }

    #[test]
    fn test_aggregate_does_not_mutate_input() {
        let sessions = scenario_sessions();
        let before = sessions.clone();
        let _ = usage_by_date(&sessions);
        assert_eq!(sessions, before);
    }

    // ── usage ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_usage_by_date_sum_preservation() {
        let sessions = vec![
            session("a", "2024-03-01T09:00:00Z", "2024-03-01T09:45:00Z"),
            session("b", "2024-03-02T22:00:00Z", "2024-03-02T23:30:00Z"),
            session("a", "2024-03-04T01:10:00Z", "2024-03-04T01:20:00Z"),
            session("c", "2024-03-04T12:00:00Z", "2024-03-04T15:00:00Z"),
        ];
        let direct: f64 = sessions.iter().map(|s| s.duration_hours()).sum();

        assert!((total(&usage_by_date(&sessions)) - direct).abs() < 1e-9);
        assert!((total(&usage_by_hour(&sessions)) - direct).abs() < 1e-9);
        assert!((total(&usage_by_week(&sessions)) - direct).abs() < 1e-9);
    }

    #[test]
    fn test_usage_by_week_keys_by_monday() {
        let sessions = vec![session("a", "2024-01-10T09:00:00Z", "2024-01-10T10:00:00Z")];
        let weekly = usage_by_week(&sessions);
        assert_eq!(weekly.get(&Week(date(2024, 1, 8))), Some(1.0));
    }

    #[test]
    fn test_usage_by_hour_uses_start_hour() {
        let sessions = vec![session("a", "2024-01-10T09:50:00Z", "2024-01-10T10:20:00Z")];
        let hourly = usage_by_hour(&sessions);
        assert_eq!(hourly.get(&HourOfDay(9)), Some(0.5));
        assert_eq!(hourly.get(&HourOfDay(10)), None);
    }

    #[test]
    fn test_usage_by_app_ranks_descending() {
        let ranked = usage_by_app(&scenario_sessions());
        assert_eq!(ranked[0], ("com.microsoft.VSCode".to_string(), 8.0));
        assert_eq!(ranked[1], ("com.netflix.Netflix".to_string(), 1.0));
    }

    #[test]
    fn test_usage_by_date_and_category() {
        let table = CategoryTable::builtin();
        let categorized = Categorizer::new(&table).categorize_sessions(&scenario_sessions());
        let by_cat = usage_by_date_and_category(&categorized);

        let day = date(2024, 3, 1);
        assert_eq!(by_cat.get(&(day, "Development".to_string())), Some(8.0));
        assert_eq!(by_cat.get(&(day, "Entertainment".to_string())), Some(1.0));
    }

    #[test]
    fn test_usage_by_week_and_category() {
        let table = CategoryTable::builtin();
        let categorized = Categorizer::new(&table).categorize_sessions(&scenario_sessions());
        let by_cat = usage_by_week_and_category(&categorized);
        // 2024-03-01 is a Friday.
        let week = Week(date(2024, 2, 26));
        assert_eq!(by_cat.get(&(week, "Development".to_string())), Some(8.0));
    }

    // ── sleep ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_sleep_by_night_shifts_to_next_day() {
        let samples = vec![sleep("2024-01-10T23:30:00Z", "2024-01-11T06:30:00Z", 3.0)];
        let nightly = sleep_by_night(&samples, SleepPolicy::All);
        assert_eq!(nightly.get(&date(2024, 1, 11)), Some(7.0));
        assert_eq!(nightly.get(&date(2024, 1, 10)), None);
    }

    #[test]
    fn test_sleep_by_night_policy() {
        let samples = vec![
            sleep("2024-01-10T23:00:00Z", "2024-01-11T07:00:00Z", 0.0),
            sleep("2024-01-10T23:30:00Z", "2024-01-11T02:30:00Z", 3.0),
            sleep("2024-01-11T02:30:00Z", "2024-01-11T03:00:00Z", 2.0),
        ];
        let all = sleep_by_night(&samples, SleepPolicy::All);
        let asleep = sleep_by_night(&samples, SleepPolicy::AsleepOnly);

        assert_eq!(all.get(&date(2024, 1, 11)), Some(11.0));
        assert_eq!(asleep.get(&date(2024, 1, 11)), Some(3.0));
        // The awake interval started on the 11th, so it counts toward the 12th.
        assert_eq!(all.get(&date(2024, 1, 12)), Some(0.5));
    }

    #[test]
    fn test_sleep_by_night_ignores_other_metrics() {
        let samples = vec![heart("2024-01-10T23:30:00Z", Some(60.0))];
        assert!(sleep_by_night(&samples, SleepPolicy::All).is_empty());
    }

    // ── metric_by_* ───────────────────────────────────────────────────────────

    #[test]
    fn test_metric_by_hour_mean_skips_missing() {
        let samples = vec![
            heart("2024-01-10T09:05:00Z", Some(60.0)),
            heart("2024-01-11T09:55:00Z", Some(80.0)),
            heart("2024-01-11T09:30:00Z", None),
            heart("2024-01-11T10:30:00Z", None),
        ];
        let hourly = metric_by_hour(&samples, MetricType::HeartRate, Reduction::Mean);
        assert_eq!(hourly.name(), "HeartRate");
        assert_eq!(hourly.get(&HourOfDay(9)), Some(70.0));
        assert_eq!(hourly.get(&HourOfDay(10)), None);
    }

    #[test]
    fn test_metric_by_date_filters_metric() {
        let mut samples = vec![heart("2024-01-10T09:00:00Z", Some(60.0))];
        samples.push(HealthSample {
            metric: MetricType::HeadphoneAudioExposure,
            start: Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap(),
            end: None,
            value: Some(70.0),
        });
        let audio = metric_by_date(&samples, MetricType::HeadphoneAudioExposure, Reduction::Mean);
        assert_eq!(audio.get(&date(2024, 1, 10)), Some(70.0));
        assert_eq!(audio.len(), 1);
    }

    // ── rolling_mean ──────────────────────────────────────────────────────────

    #[test]
    fn test_rolling_mean_window_edges() {
        let series = Series::from_pairs(
            "hours",
            (1..=10).map(|d| (date(2024, 1, d), d as f64 * 1.5)),
        );
        let rolled = rolling_mean(&series, 7);

        assert_eq!(rolled.get(&date(2024, 1, 1)), Some(1.5));
        let expected: f64 = (4..=10).map(|d| d as f64 * 1.5).sum::<f64>() / 7.0;
        let tenth = rolled.get(&date(2024, 1, 10)).unwrap();
        assert!((tenth - expected).abs() < 1e-9, "{tenth} vs {expected}");
        assert_eq!(rolled.name(), "hours_rolling");
    }

    #[test]
    fn test_rolling_mean_mixed_magnitudes() {
        let series = Series::from_pairs(
            "hours",
            vec![(date(2024, 1, 1), 1e17), (date(2024, 1, 2), 1.0), (date(2024, 1, 3), 1.0)],
        );
        let rolling = rolling_mean(&series, 2);
        assert_eq!(rolling.get(&date(2024, 1, 2)), Some(5e16));
        assert_eq!(rolling.get(&date(2024, 1, 3)), Some(1.0));
    }

    #[test]
    fn test_rolling_mean_window_zero_is_identity() {
        let series = Series::from_pairs("x", vec![(1, 3.0), (2, 5.0)]);
        assert_eq!(rolling_mean(&series, 0).get(&2), Some(5.0));
    }

    // ── daily_productivity ────────────────────────────────────────────────────

    #[test]
    fn test_daily_productivity_end_to_end_scenario() {
        let table = CategoryTable::builtin();
        let categorized = Categorizer::new(&table).categorize_sessions(&scenario_sessions());
        let daily = daily_productivity(&categorized);

        let day = date(2024, 3, 1);
        assert_eq!(daily.get(&day, TOTAL_HOURS), Some(9.0));
        assert_eq!(daily.get(&day, &bucket_column(Productivity::Productive)), Some(8.0));
        assert_eq!(daily.get(&day, &bucket_column(Productivity::Distracting)), Some(1.0));
        assert_eq!(daily.get(&day, &bucket_column(Productivity::Neutral)), Some(0.0));
        let ratio = daily.get(&day, PRODUCTIVE_RATIO).unwrap();
        assert!((ratio - 800.0 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_daily_productivity_zero_total_ratio_missing() {
        let table = CategoryTable::builtin();
        let sessions = vec![session("x", "2024-03-01T09:00:00Z", "2024-03-01T09:00:00Z")];
        let categorized = Categorizer::new(&table).categorize_sessions(&sessions);
        let daily = daily_productivity(&categorized);

        let day = date(2024, 3, 1);
        assert_eq!(daily.get(&day, TOTAL_HOURS), Some(0.0));
        assert_eq!(daily.get(&day, PRODUCTIVE_RATIO), None);
    }
}
