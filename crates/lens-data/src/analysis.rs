//! Analysis views over loaded usage and health data.
//!
//! Each view is a pure function of an [`AnalysisInput`] and an
//! [`AnalysisConfig`] and returns a serializable report. Presentation is
//! left to the caller.

use chrono::{DateTime, NaiveDate, Utc};
use lens_core::error::Result;
use lens_core::models::{
    BrowserVisit, CategorizedUsage, HealthSample, MetricType, Productivity, UsageSession,
};
use serde::Serialize;

use crate::aggregator::{
    bucket_column, daily_productivity, metric_by_date, metric_by_hour, rolling_mean,
    sleep_by_night, total, usage_by_app, usage_by_date, usage_by_hour, Reduction, SleepPolicy,
    PRODUCTIVE_RATIO,
};
use crate::correlator::{
    correlate, inner_join, merge_asof, pearson, shift_days, Correlation, Direction,
};
use crate::impact::{analyze_app_impact, AppHours, AppImpact};
use crate::reader::Downloads;
use crate::roi::WeeklyRoi;
use crate::table::{HourOfDay, Series, Table};

// ── Inputs ────────────────────────────────────────────────────────────────────

/// Borrowed, already-normalized records every view draws from.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisInput<'a> {
    pub sessions: &'a [UsageSession],
    pub categorized: &'a [CategorizedUsage],
    pub health: &'a [HealthSample],
}

/// Tunable parameters shared by the views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnalysisConfig {
    /// Rolling-average window in points.
    pub rolling_window: usize,
    pub sleep_policy: SleepPolicy,
    /// Length of top-app rankings.
    pub top_n: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            rolling_window: 7,
            sleep_policy: SleepPolicy::All,
            top_n: 10,
        }
    }
}

/// Sessions starting on or after `start`.
pub fn sessions_since(sessions: &[UsageSession], start: NaiveDate) -> Vec<UsageSession> {
    sessions.iter().filter(|s| s.date() >= start).cloned().collect()
}

// ── Usage ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageSummary {
    /// Daily hours and their rolling mean.
    pub daily: Table<NaiveDate>,
    pub hourly: Series<HourOfDay>,
    pub top_apps: Vec<AppHours>,
    pub total_hours: f64,
    pub session_count: usize,
    pub average_session_hours: Option<f64>,
    pub most_used_app: Option<String>,
    pub peak_hour: Option<u8>,
}

pub fn usage_summary(input: &AnalysisInput<'_>, config: &AnalysisConfig) -> UsageSummary {
    let daily = usage_by_date(input.sessions);
    let rolling = rolling_mean(&daily, config.rolling_window);
    let hourly = usage_by_hour(input.sessions);
    let ranked = usage_by_app(input.sessions);
    let total_hours = total(&daily);
    let session_count = input.sessions.len();

    UsageSummary {
        daily: Table::from_series(&[&daily, &rolling]),
        peak_hour: hourly.argmax().map(|(h, _)| h.0),
        hourly,
        most_used_app: ranked.first().map(|(app, _)| app.clone()),
        top_apps: ranked
            .into_iter()
            .take(config.top_n)
            .map(|(app, hours)| AppHours { app, hours })
            .collect(),
        total_hours,
        session_count,
        average_session_hours: (session_count > 0).then(|| total_hours / session_count as f64),
    }
}

// ── Heart rate ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthCorrelation {
    /// Usage hours and mean heart rate per hour of day.
    pub hourly: Table<HourOfDay>,
    pub hourly_correlation: Correlation,
    /// Sessions that found a heart-rate sample at or before their start.
    pub matched_sessions: usize,
    /// Session length vs the latest prior heart-rate sample.
    pub session_correlation: Correlation,
}

pub fn health_correlation(input: &AnalysisInput<'_>) -> HealthCorrelation {
    let usage = usage_by_hour(input.sessions).renamed("usage_hours");
    let heart = metric_by_hour(input.health, MetricType::HeartRate, Reduction::Mean)
        .renamed("heart_rate");

    let left: Vec<(DateTime<Utc>, f64)> = input
        .sessions
        .iter()
        .map(|s| (s.start, s.duration_hours()))
        .collect();
    let right: Vec<(DateTime<Utc>, f64)> = input
        .health
        .iter()
        .filter(|s| s.metric == MetricType::HeartRate)
        .filter_map(|s| s.value.map(|v| (s.start, v)))
        .collect();
    let pairs: Vec<(f64, f64)> = merge_asof(&left, &right, Direction::Backward, None)
        .into_iter()
        .filter_map(|(_, hours, bpm)| bpm.map(|b| (hours, b)))
        .collect();

    HealthCorrelation {
        hourly_correlation: correlate(&usage, &heart),
        hourly: inner_join(&usage, &heart),
        matched_sessions: pairs.len(),
        session_correlation: pearson(&pairs),
    }
}

// ── Sleep ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SleepSummary {
    /// Nightly sleep hours and their rolling mean.
    pub nightly: Table<NaiveDate>,
    pub nights: usize,
    pub average_sleep_hours: Option<f64>,
    /// Days with both usage and sleep.
    pub usage_vs_sleep: Table<NaiveDate>,
    pub correlation: Correlation,
}

pub fn sleep_summary(input: &AnalysisInput<'_>, config: &AnalysisConfig) -> SleepSummary {
    let sleep = sleep_by_night(input.health, config.sleep_policy);
    let rolling = rolling_mean(&sleep, config.rolling_window);
    let usage = usage_by_date(input.sessions).renamed("usage_hours");

    SleepSummary {
        nightly: Table::from_series(&[&sleep, &rolling]),
        nights: sleep.len(),
        average_sleep_hours: sleep.mean(),
        usage_vs_sleep: inner_join(&usage, &sleep),
        correlation: correlate(&usage, &sleep),
    }
}

// ── Productivity ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductivityReport {
    /// Per-day hours by productivity bucket plus the productive ratio.
    pub daily: Table<NaiveDate>,
    pub average_productive_hours: Option<f64>,
    pub average_productive_ratio: Option<f64>,
    /// Productive hours beside same-day sleep, next-day sleep and mean
    /// headphone audio exposure.
    pub comparison: Table<NaiveDate>,
    pub same_day_sleep: Correlation,
    pub next_day_sleep: Correlation,
    pub audio_exposure: Correlation,
}

pub fn productivity_ratio(
    input: &AnalysisInput<'_>,
    config: &AnalysisConfig,
) -> ProductivityReport {
    let daily = daily_productivity(input.categorized);
    let productive_col = bucket_column(Productivity::Productive);
    let productive = daily
        .column(&productive_col)
        .unwrap_or_else(|| Series::new(productive_col.as_str()));

    let sleep = sleep_by_night(input.health, config.sleep_policy);
    let same_day = sleep.renamed("same_day_sleep");
    let next_day = shift_days(&sleep, -1).renamed("next_day_sleep");
    let audio = metric_by_date(input.health, MetricType::HeadphoneAudioExposure, Reduction::Mean)
        .renamed("audio_exposure");

    // Left join onto usage days; missing health leaves cells empty.
    let mut comparison = Table::new(vec![
        productive_col.clone(),
        same_day.name().to_string(),
        next_day.name().to_string(),
        audio.name().to_string(),
    ]);
    for (day, hours) in productive.iter() {
        comparison.insert(
            *day,
            vec![Some(hours), same_day.get(day), next_day.get(day), audio.get(day)],
        );
    }

    ProductivityReport {
        average_productive_hours: productive.mean(),
        average_productive_ratio: daily.column_mean(PRODUCTIVE_RATIO),
        same_day_sleep: correlate(&productive, &same_day),
        next_day_sleep: correlate(&productive, &next_day),
        audio_exposure: correlate(&productive, &audio),
        daily,
        comparison,
    }
}

// ── App impact ────────────────────────────────────────────────────────────────

/// Health and usage around each use of apps matching `pattern`.
pub fn app_impact(input: &AnalysisInput<'_>, pattern: &str) -> Result<AppImpact> {
    analyze_app_impact(pattern, input.sessions, input.health, &MetricType::VITALS)
}

// ── Weekly ROI ────────────────────────────────────────────────────────────────

/// Weekly hours by category per download, and browser visits per download.
pub fn weekly_roi(
    input: &AnalysisInput<'_>,
    downloads: &Downloads,
    visits: Option<&[BrowserVisit]>,
) -> WeeklyRoi {
    crate::roi::weekly_roi(input.categorized, downloads, visits)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use lens_core::categories::{Categorizer, CategoryTable};

    fn at(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, h, m, 0).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn session(app: &str, start: DateTime<Utc>, minutes: i64) -> UsageSession {
        UsageSession::new(app, start, start + Duration::minutes(minutes)).unwrap()
    }

    fn sample(
        metric: MetricType,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
        value: f64,
    ) -> HealthSample {
        HealthSample {
            metric,
            start,
            end,
            value: Some(value),
        }
    }

    struct Fixture {
        sessions: Vec<UsageSession>,
        categorized: Vec<CategorizedUsage>,
        health: Vec<HealthSample>,
    }

    impl Fixture {
        fn new(sessions: Vec<UsageSession>, health: Vec<HealthSample>) -> Self {
            let table = CategoryTable::builtin();
            let categorized = Categorizer::new(&table).categorize_sessions(&sessions);
            Self {
                sessions,
                categorized,
                health,
            }
        }

        fn input(&self) -> AnalysisInput<'_> {
            AnalysisInput {
                sessions: &self.sessions,
                categorized: &self.categorized,
                health: &self.health,
            }
        }
    }

    fn scenario() -> Fixture {
        Fixture::new(
            vec![
                session("com.netflix.Netflix", at(1, 20, 0), 60),
                session("com.microsoft.VSCode", at(1, 9, 0), 480),
            ],
            vec![],
        )
    }

    // ── usage_summary ─────────────────────────────────────────────────────────

    #[test]
    fn test_usage_summary_scenario() {
        let fx = scenario();
        let summary = usage_summary(&fx.input(), &AnalysisConfig::default());

        assert_eq!(summary.total_hours, 9.0);
        assert_eq!(summary.session_count, 2);
        assert_eq!(summary.average_session_hours, Some(4.5));
        assert_eq!(summary.most_used_app.as_deref(), Some("com.microsoft.VSCode"));
        assert_eq!(summary.peak_hour, Some(9));
        assert_eq!(summary.daily.get(&date(1), "hours"), Some(9.0));
        assert_eq!(summary.daily.get(&date(1), "hours_rolling"), Some(9.0));
    }

    #[test]
    fn test_usage_summary_top_n() {
        let fx = scenario();
        let config = AnalysisConfig {
            top_n: 1,
            ..Default::default()
        };
        let summary = usage_summary(&fx.input(), &config);
        assert_eq!(summary.top_apps.len(), 1);
        assert_eq!(summary.top_apps[0].hours, 8.0);
    }

    #[test]
    fn test_usage_summary_empty_input() {
        let fx = Fixture::new(vec![], vec![]);
        let summary = usage_summary(&fx.input(), &AnalysisConfig::default());
        assert_eq!(summary.total_hours, 0.0);
        assert_eq!(summary.average_session_hours, None);
        assert_eq!(summary.most_used_app, None);
        assert_eq!(summary.peak_hour, None);
    }

    // ── health_correlation ────────────────────────────────────────────────────

    #[test]
    fn test_health_correlation_session_level_backward_match() {
        let fx = Fixture::new(
            vec![
                session("a", at(1, 9, 0), 30),
                session("b", at(1, 12, 0), 60),
                session("c", at(1, 15, 0), 90),
            ],
            vec![
                sample(MetricType::HeartRate, at(1, 8, 55), None, 60.0),
                sample(MetricType::HeartRate, at(1, 11, 30), None, 70.0),
                sample(MetricType::HeartRate, at(1, 14, 0), None, 80.0),
            ],
        );
        let report = health_correlation(&fx.input());

        assert_eq!(report.matched_sessions, 3);
        assert_eq!(report.session_correlation, Correlation::Coefficient(1.0));
        // Usage hours 9, 12, 15 vs heart rate hours 8, 11, 14: no overlap.
        assert_eq!(
            report.hourly_correlation,
            Correlation::InsufficientData { rows: 0 }
        );
    }

    #[test]
    fn test_health_correlation_no_prior_sample() {
        let fx = Fixture::new(
            vec![session("a", at(1, 7, 0), 30)],
            vec![sample(MetricType::HeartRate, at(1, 8, 0), None, 60.0)],
        );
        let report = health_correlation(&fx.input());
        assert_eq!(report.matched_sessions, 0);
    }

    // ── sleep_summary ─────────────────────────────────────────────────────────

    #[test]
    fn test_sleep_summary_joins_usage_with_shifted_nights() {
        let fx = Fixture::new(
            vec![
                session("a", at(2, 9, 0), 60),
                session("a", at(3, 9, 0), 120),
                session("a", at(4, 9, 0), 180),
            ],
            vec![
                sample(MetricType::SleepAnalysis, at(1, 23, 0), Some(at(2, 7, 0)), 3.0),
                sample(MetricType::SleepAnalysis, at(2, 23, 0), Some(at(3, 6, 0)), 3.0),
                sample(MetricType::SleepAnalysis, at(3, 23, 0), Some(at(4, 5, 0)), 3.0),
            ],
        );
        let summary = sleep_summary(&fx.input(), &AnalysisConfig::default());

        assert_eq!(summary.nights, 3);
        assert_eq!(summary.nightly.get(&date(2), "sleep_hours"), Some(8.0));
        assert_eq!(summary.usage_vs_sleep.len(), 3);
        assert_eq!(summary.correlation, Correlation::Coefficient(-1.0));
        assert_eq!(summary.average_sleep_hours, Some(7.0));
    }

    // ── productivity_ratio ────────────────────────────────────────────────────

    #[test]
    fn test_productivity_ratio_scenario() {
        let fx = scenario();
        let report = productivity_ratio(&fx.input(), &AnalysisConfig::default());

        assert_eq!(report.average_productive_hours, Some(8.0));
        let ratio = report.average_productive_ratio.unwrap();
        assert!((ratio - 800.0 / 9.0).abs() < 1e-9);
        assert_eq!(
            report.same_day_sleep,
            Correlation::InsufficientData { rows: 0 }
        );
    }

    #[test]
    fn test_productivity_ratio_next_day_sleep_alignment() {
        let fx = Fixture::new(
            vec![
                session("com.microsoft.VSCode", at(1, 9, 0), 60),
                session("com.microsoft.VSCode", at(2, 9, 0), 120),
            ],
            vec![
                // Night of the 1st, credited to the 2nd.
                sample(MetricType::SleepAnalysis, at(1, 23, 0), Some(at(2, 6, 0)), 3.0),
            ],
        );
        let report = productivity_ratio(&fx.input(), &AnalysisConfig::default());

        assert_eq!(report.comparison.get(&date(1), "next_day_sleep"), Some(7.0));
        assert_eq!(report.comparison.get(&date(2), "same_day_sleep"), Some(7.0));
        assert_eq!(report.comparison.get(&date(1), "same_day_sleep"), None);
    }

    // ── app_impact / weekly_roi ───────────────────────────────────────────────

    #[test]
    fn test_app_impact_uses_vital_metrics() {
        let fx = scenario();
        let impact = app_impact(&fx.input(), "netflix").unwrap();
        assert_eq!(impact.health_after.len(), MetricType::VITALS.len());
        assert_eq!(impact.matched_apps, vec!["com.netflix.Netflix".to_string()]);
    }

    #[test]
    fn test_weekly_roi_from_input() {
        let fx = scenario();
        let roi = weekly_roi(&fx.input(), &Downloads::Positional(vec![4.0]), None);
        let week = crate::table::Week::containing(date(1));
        assert_eq!(roi.usage_roi.get(&week, "Development"), Some(2.0));
    }

    #[test]
    fn test_sessions_since_filters_by_start_date() {
        let fx = scenario();
        assert_eq!(sessions_since(&fx.sessions, date(1)).len(), 2);
        assert!(sessions_since(&fx.sessions, date(2)).is_empty());
    }
}
