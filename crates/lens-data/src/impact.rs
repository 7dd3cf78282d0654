//! Health and usage in the 24 hours around each use of an app.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use lens_core::error::{LensError, Result};
use lens_core::models::{HealthSample, MetricType, UsageSession};
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use tracing::{debug, warn};

use crate::correlator::{merge_asof, Direction};
use crate::table::Table;

const WINDOW_HOURS: i64 = 24;

/// Mean and sample standard deviation of one metric over a set of hourly
/// slots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    pub metric: MetricType,
    /// Slots that found a nearest sample.
    pub samples: usize,
    pub mean: Option<f64>,
    /// `None` with fewer than two samples.
    pub std: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppHours {
    pub app: String,
    pub hours: f64,
}

/// Health metrics and app usage before and after uses of matching apps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppImpact {
    pub pattern: String,
    /// Distinct app identifiers that matched `pattern`.
    pub matched_apps: Vec<String>,
    /// Distinct clock hours in which a matching session started.
    pub usage_hours: usize,
    pub health_before: Vec<MetricSummary>,
    pub health_after: Vec<MetricSummary>,
    pub usage_before: Vec<AppHours>,
    pub usage_after: Vec<AppHours>,
}

impl AppImpact {
    /// One row per metric: sample count, mean and std before, then after.
    pub fn health_table(&self) -> Table<MetricType> {
        let mut table = Table::new(
            [
                "before_samples",
                "before_mean",
                "before_std",
                "after_samples",
                "after_mean",
                "after_std",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
        );
        for before in &self.health_before {
            let after = self.health_after.iter().find(|a| a.metric == before.metric);
            table.insert(
                before.metric,
                vec![
                    Some(before.samples as f64),
                    before.mean,
                    before.std,
                    after.map(|a| a.samples as f64),
                    after.and_then(|a| a.mean),
                    after.and_then(|a| a.std),
                ],
            );
        }
        table
    }
}

/// Hours per app, keyed by app identifier.
pub fn app_hours_table(apps: &[AppHours]) -> Table<String> {
    let mut table = Table::new(vec!["hours".to_string()]);
    for a in apps {
        table.insert(a.app.clone(), vec![Some(a.hours)]);
    }
    table
}

/// Case-insensitive literal matcher for an app name fragment.
pub fn app_matcher(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(&regex::escape(pattern.trim()))
        .case_insensitive(true)
        .build()
        .map_err(|e| LensError::Config(format!("invalid app pattern \"{}\": {}", pattern, e)))
}

/// Compare the 24 hourly slots before each usage hour of the matching apps
/// with the 24 slots starting at it.
///
/// Each slot is matched to the nearest sample of every metric in `metrics`.
/// Usage is summed per app over sessions starting inside the slots.
pub fn analyze_app_impact(
    pattern: &str,
    sessions: &[UsageSession],
    health: &[HealthSample],
    metrics: &[MetricType],
) -> Result<AppImpact> {
    let matcher = app_matcher(pattern)?;

    let matching: Vec<&UsageSession> = sessions
        .iter()
        .filter(|s| matcher.is_match(&s.app))
        .collect();
    let matched_apps: BTreeSet<String> = matching.iter().map(|s| s.app.clone()).collect();
    let anchors: BTreeSet<DateTime<Utc>> =
        matching.iter().filter_map(|s| floor_hour(s.start)).collect();

    if anchors.is_empty() {
        warn!("No sessions match app pattern \"{}\"", pattern);
    } else {
        debug!(
            "App pattern \"{}\" matched {} apps over {} hours",
            pattern,
            matched_apps.len(),
            anchors.len()
        );
    }

    let mut before: BTreeSet<DateTime<Utc>> = BTreeSet::new();
    let mut after: BTreeSet<DateTime<Utc>> = BTreeSet::new();
    for anchor in &anchors {
        for i in 0..WINDOW_HOURS {
            before.insert(*anchor - Duration::hours(WINDOW_HOURS - i));
            after.insert(*anchor + Duration::hours(i));
        }
    }

    Ok(AppImpact {
        pattern: pattern.to_string(),
        matched_apps: matched_apps.into_iter().collect(),
        usage_hours: anchors.len(),
        health_before: summarize_health(&before, health, metrics),
        health_after: summarize_health(&after, health, metrics),
        usage_before: usage_in_slots(&before, sessions),
        usage_after: usage_in_slots(&after, sessions),
    })
}

fn floor_hour(ts: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let secs = ts.timestamp();
    DateTime::from_timestamp(secs - secs.rem_euclid(3600), 0)
}

fn summarize_health(
    slots: &BTreeSet<DateTime<Utc>>,
    health: &[HealthSample],
    metrics: &[MetricType],
) -> Vec<MetricSummary> {
    let left: Vec<(DateTime<Utc>, ())> = slots.iter().map(|t| (*t, ())).collect();

    metrics
        .iter()
        .map(|metric| {
            let right: Vec<(DateTime<Utc>, f64)> = health
                .iter()
                .filter(|s| s.metric == *metric)
                .filter_map(|s| s.value.map(|v| (s.start, v)))
                .collect();

            let values: Vec<f64> = merge_asof(&left, &right, Direction::Nearest, None)
                .into_iter()
                .filter_map(|(_, _, v)| v)
                .collect();

            let (mean, std) = mean_and_std(&values);
            MetricSummary {
                metric: *metric,
                samples: values.len(),
                mean,
                std,
            }
        })
        .collect()
}

/// Mean and sample (n − 1) standard deviation.
fn mean_and_std(values: &[f64]) -> (Option<f64>, Option<f64>) {
    let n = values.len();
    if n == 0 {
        return (None, None);
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    if n < 2 {
        return (Some(mean), None);
    }
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    (Some(mean), Some(var.sqrt()))
}

fn usage_in_slots(slots: &BTreeSet<DateTime<Utc>>, sessions: &[UsageSession]) -> Vec<AppHours> {
    let inside: Vec<UsageSession> = sessions
        .iter()
        .filter(|s| floor_hour(s.start).is_some_and(|h| slots.contains(&h)))
        .cloned()
        .collect();

    crate::aggregator::usage_by_app(&inside)
        .into_iter()
        .map(|(app, hours)| AppHours { app, hours })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, h, m, 0).unwrap()
    }

    fn session(app: &str, start: DateTime<Utc>, minutes: i64) -> UsageSession {
        UsageSession::new(app, start, start + Duration::minutes(minutes)).unwrap()
    }

    fn hr(ts: DateTime<Utc>, bpm: f64) -> HealthSample {
        HealthSample {
            metric: MetricType::HeartRate,
            start: ts,
            end: None,
            value: Some(bpm),
        }
    }

    #[test]
    fn test_app_matcher_is_literal_and_case_insensitive() {
        let m = app_matcher("reddit").unwrap();
        assert!(m.is_match("com.reddit.Reddit"));
        let dot = app_matcher("a.b").unwrap();
        assert!(!dot.is_match("axb"), "pattern metacharacters are escaped");
    }

    #[test]
    fn test_analyze_app_impact_splits_before_and_after() {
        let sessions = vec![
            session("com.reddit.Reddit", at(10, 12, 15), 30),
            session("com.microsoft.VSCode", at(10, 9, 0), 60),
            session("com.apple.Safari", at(10, 14, 0), 30),
        ];
        // Before slots span 10th 12:00 - 24h .. 11:00; after slots 12:00 .. 11th 11:00.
        let health = vec![hr(at(10, 8, 0), 60.0), hr(at(10, 16, 0), 90.0)];

        let impact =
            analyze_app_impact("REDDIT", &sessions, &health, &[MetricType::HeartRate]).unwrap();

        assert_eq!(impact.matched_apps, vec!["com.reddit.Reddit".to_string()]);
        assert_eq!(impact.usage_hours, 1);

        let before_apps: Vec<&str> = impact.usage_before.iter().map(|a| a.app.as_str()).collect();
        assert_eq!(before_apps, vec!["com.microsoft.VSCode"]);

        let after_apps: Vec<&str> = impact.usage_after.iter().map(|a| a.app.as_str()).collect();
        // Equal hours, so ordered by name.
        assert_eq!(after_apps, vec!["com.apple.Safari", "com.reddit.Reddit"]);

        let before = &impact.health_before[0];
        assert_eq!(before.samples, 24);
        // The last before-slot is 11:00, still closer to the 08:00 sample.
        assert_eq!(before.mean, Some(60.0));
        assert_eq!(before.std, Some(0.0));

        let after = &impact.health_after[0];
        assert_eq!(after.samples, 24);
        // 12:00 ties between the samples and resolves backward to 60.
        assert_eq!(after.mean, Some((60.0 + 23.0 * 90.0) / 24.0));
    }

    #[test]
    fn test_analyze_app_impact_no_match_is_empty() {
        let sessions = vec![session("com.apple.Safari", at(10, 9, 0), 10)];
        let impact =
            analyze_app_impact("tiktok", &sessions, &[], &[MetricType::HeartRate]).unwrap();
        assert!(impact.matched_apps.is_empty());
        assert!(impact.usage_after.is_empty());
        assert_eq!(impact.health_after[0].samples, 0);
        assert_eq!(impact.health_after[0].mean, None);
    }

    #[test]
    fn test_health_table_pairs_before_and_after() {
        let sessions = vec![session("com.reddit.Reddit", at(10, 12, 15), 30)];
        let health = vec![hr(at(10, 8, 0), 60.0), hr(at(10, 16, 0), 90.0)];
        let impact =
            analyze_app_impact("reddit", &sessions, &health, &[MetricType::HeartRate]).unwrap();

        let table = impact.health_table();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&MetricType::HeartRate, "before_samples"), Some(24.0));
        assert_eq!(table.get(&MetricType::HeartRate, "before_mean"), Some(60.0));
        assert_eq!(table.get(&MetricType::HeartRate, "after_samples"), Some(24.0));

        let apps = app_hours_table(&impact.usage_after);
        assert_eq!(apps.get(&"com.reddit.Reddit".to_string(), "hours"), Some(0.5));
    }

    #[test]
    fn test_mean_and_std_sample_deviation() {
        let (mean, std) = mean_and_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(mean, Some(5.0));
        assert!((std.unwrap() - 2.138_089_935).abs() < 1e-6);
        assert_eq!(mean_and_std(&[3.0]), (Some(3.0), None));
    }
}
