use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{LensError, Result};

const SECONDS_PER_HOUR: f64 = 3600.0;

// ── UsageSession ──────────────────────────────────────────────────────────────

/// One contiguous interval during which an application was in the foreground.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSession {
    /// Bundle identifier, e.g. `"com.microsoft.VSCode"`.
    pub app: String,
    /// Session start (UTC).
    pub start: DateTime<Utc>,
    /// Session end (UTC), never before `start`.
    pub end: DateTime<Utc>,
}

impl UsageSession {
    /// Build a session, rejecting intervals that end before they start.
    pub fn new(app: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        let app = app.into();
        if end < start {
            return Err(LensError::InvalidSession {
                app,
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(Self { app, start, end })
    }

    /// `end - start`.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration().num_milliseconds() as f64 / 1000.0
    }

    pub fn duration_hours(&self) -> f64 {
        self.duration_seconds() / SECONDS_PER_HOUR
    }

    /// Calendar date (UTC) the session started on.
    pub fn date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Hour of day (0-23, UTC) the session started in.
    pub fn hour(&self) -> u8 {
        self.start.hour() as u8
    }
}

// ── MetricType ────────────────────────────────────────────────────────────────

/// Health-export record types understood by the parsers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    HeartRate,
    HeartRateVariability,
    RestingHeartRate,
    WalkingHeartRate,
    StepCount,
    SleepAnalysis,
    HeadphoneAudioExposure,
}

impl MetricType {
    pub const ALL: [MetricType; 7] = [
        MetricType::HeartRate,
        MetricType::HeartRateVariability,
        MetricType::RestingHeartRate,
        MetricType::WalkingHeartRate,
        MetricType::StepCount,
        MetricType::SleepAnalysis,
        MetricType::HeadphoneAudioExposure,
    ];

    /// The five cardiovascular/activity metrics compared by the app-impact view.
    pub const VITALS: [MetricType; 5] = [
        MetricType::HeartRate,
        MetricType::HeartRateVariability,
        MetricType::RestingHeartRate,
        MetricType::WalkingHeartRate,
        MetricType::StepCount,
    ];

    /// HealthKit type identifier as written in `export.xml`.
    pub fn identifier(&self) -> &'static str {
        match self {
            MetricType::HeartRate => "HKQuantityTypeIdentifierHeartRate",
            MetricType::HeartRateVariability => "HKQuantityTypeIdentifierHeartRateVariabilitySDNN",
            MetricType::RestingHeartRate => "HKQuantityTypeIdentifierRestingHeartRate",
            MetricType::WalkingHeartRate => "HKQuantityTypeIdentifierWalkingHeartRateAverage",
            MetricType::StepCount => "HKQuantityTypeIdentifierStepCount",
            MetricType::SleepAnalysis => "HKCategoryTypeIdentifierSleepAnalysis",
            MetricType::HeadphoneAudioExposure => "HKQuantityTypeIdentifierHeadphoneAudioExposure",
        }
    }

    /// Short name, e.g. `"HeartRate"`.
    pub fn short_name(&self) -> &'static str {
        let id = self.identifier();
        id.strip_prefix("HKQuantityTypeIdentifier")
            .or_else(|| id.strip_prefix("HKCategoryTypeIdentifier"))
            .unwrap_or(id)
    }

    /// Resolve either the full HealthKit identifier or its short name.
    pub fn from_identifier(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.identifier() == s || m.short_name().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

// ── SleepState ────────────────────────────────────────────────────────────────

/// Sleep-analysis stage encoded in a sleep sample's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SleepState {
    InBed,
    AsleepUnspecified,
    Awake,
    AsleepCore,
    AsleepDeep,
    #[serde(rename = "AsleepREM")]
    AsleepRem,
}

impl SleepState {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(SleepState::InBed),
            1 => Some(SleepState::AsleepUnspecified),
            2 => Some(SleepState::Awake),
            3 => Some(SleepState::AsleepCore),
            4 => Some(SleepState::AsleepDeep),
            5 => Some(SleepState::AsleepRem),
            _ => None,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            SleepState::InBed => 0,
            SleepState::AsleepUnspecified => 1,
            SleepState::Awake => 2,
            SleepState::AsleepCore => 3,
            SleepState::AsleepDeep => 4,
            SleepState::AsleepRem => 5,
        }
    }

    /// Map a HealthKit category value such as
    /// `"HKCategoryValueSleepAnalysisAsleepCore"` to a state.
    pub fn from_category_value(s: &str) -> Option<Self> {
        let name = s.trim().strip_prefix("HKCategoryValueSleepAnalysis")?;
        match name {
            "InBed" => Some(SleepState::InBed),
            "AsleepUnspecified" | "Asleep" => Some(SleepState::AsleepUnspecified),
            "Awake" => Some(SleepState::Awake),
            "AsleepCore" => Some(SleepState::AsleepCore),
            "AsleepDeep" => Some(SleepState::AsleepDeep),
            "AsleepREM" => Some(SleepState::AsleepRem),
            _ => None,
        }
    }

    pub fn is_asleep(&self) -> bool {
        matches!(
            self,
            SleepState::AsleepUnspecified
                | SleepState::AsleepCore
                | SleepState::AsleepDeep
                | SleepState::AsleepRem
        )
    }
}

// ── HealthSample ──────────────────────────────────────────────────────────────

/// One timestamped physiological measurement from a health export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSample {
    pub metric: MetricType,
    /// Sample start (UTC).
    pub start: DateTime<Utc>,
    /// Sample end (UTC). Only meaningful for interval samples such as sleep.
    pub end: Option<DateTime<Utc>>,
    /// Numeric value, `None` when the export value was not numeric.
    pub value: Option<f64>,
}

impl HealthSample {
    /// Sleep stage for sleep samples with a recognised code.
    pub fn sleep_state(&self) -> Option<SleepState> {
        if self.metric != MetricType::SleepAnalysis {
            return None;
        }
        let value = self.value?;
        if value.fract() != 0.0 {
            return None;
        }
        SleepState::from_code(value as i64)
    }

    /// Length of the sample interval in hours; `None` without an end or when
    /// the end precedes the start.
    pub fn duration_hours(&self) -> Option<f64> {
        let end = self.end?;
        let secs = (end - self.start).num_milliseconds() as f64 / 1000.0;
        (secs >= 0.0).then_some(secs / SECONDS_PER_HOUR)
    }

    pub fn date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    pub fn hour(&self) -> u8 {
        self.start.hour() as u8
    }
}

// ── Categories ────────────────────────────────────────────────────────────────

/// Coarse productivity bucket an app category rolls up into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Productivity {
    Productive,
    Distracting,
    Neutral,
    Unknown,
    Other,
}

impl Productivity {
    pub const ALL: [Productivity; 5] = [
        Productivity::Productive,
        Productivity::Distracting,
        Productivity::Neutral,
        Productivity::Unknown,
        Productivity::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Productivity::Productive => "Productive",
            Productivity::Distracting => "Distracting",
            Productivity::Neutral => "Neutral",
            Productivity::Unknown => "Unknown",
            Productivity::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for Productivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category assigned to an app: a fine label plus its productivity bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    /// Fine label, e.g. `"Development"`, or `"Other"` for unmapped apps.
    pub label: String,
    pub productivity: Productivity,
}

/// A usage session tagged with its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedUsage {
    pub session: UsageSession,
    pub category: Category,
}

// ── BrowserVisit ──────────────────────────────────────────────────────────────

/// One page visit from a browser history export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserVisit {
    pub timestamp: DateTime<Utc>,
    /// Site category assigned by the exporting tool.
    pub category: String,
}

impl BrowserVisit {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}
