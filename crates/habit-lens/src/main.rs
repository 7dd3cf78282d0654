mod bootstrap;
mod render;

use std::path::Path;

use anyhow::{bail, Context, Result};
use lens_core::categories::{Categorizer, CategoryTable};
use lens_core::models::{HealthSample, MetricType};
use lens_core::settings::Settings;
use lens_core::time_utils::TimezoneHandler;
use lens_data::aggregator::SleepPolicy;
use lens_data::analysis::{self, AnalysisConfig, AnalysisInput};
use lens_data::health::{find_health_export, load_health_export};
use lens_data::reader::{load_browser_history, load_downloads, load_usage_sessions, ParseReport};

use render::{Format, Report};

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_deref())?;

    tracing::info!("habit-lens v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Timezone: {}, Format: {}",
        settings.view,
        settings.timezone,
        settings.format
    );

    let report = run_view(&settings)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render::render(&mut out, &report, Format::from_name(&settings.format))?;
    Ok(())
}

/// Load the sources the selected view needs and compute it.
fn run_view(settings: &Settings) -> Result<Report> {
    let tz = TimezoneHandler::try_new(&settings.timezone)
        .with_context(|| format!("invalid --timezone \"{}\"", settings.timezone))?;

    let data_dir = bootstrap::discover_data_path(settings.data_dir.as_deref()).context(
        "no data directory found: pass --data-dir or put usage CSV files in ~/.habit-lens/data",
    )?;

    let categories = load_categories(settings.categories.as_deref())?;

    let usage = load_usage_sessions(&data_dir, &tz)
        .with_context(|| format!("failed to load usage logs from {}", data_dir.display()))?;
    log_report("usage", &usage.report);

    let sessions = match settings.start_date {
        Some(start) => analysis::sessions_since(&usage.records, start),
        None => usage.records,
    };
    let categorized = Categorizer::new(&categories).categorize_sessions(&sessions);

    let metrics = metrics_for(&settings.view);
    let health = if metrics.is_empty() {
        Vec::new()
    } else {
        load_health(settings, &data_dir, metrics, &tz)?
    };

    let input = AnalysisInput {
        sessions: &sessions,
        categorized: &categorized,
        health: &health,
    };
    let config = AnalysisConfig {
        rolling_window: settings.rolling_window as usize,
        sleep_policy: if settings.asleep_only {
            SleepPolicy::AsleepOnly
        } else {
            SleepPolicy::All
        },
        top_n: settings.top as usize,
    };

    let report = match settings.view.as_str() {
        "usage" => Report::Usage(analysis::usage_summary(&input, &config)),
        "health" => Report::Health(analysis::health_correlation(&input)),
        "sleep" => Report::Sleep(analysis::sleep_summary(&input, &config)),
        "productivity" => Report::Productivity(analysis::productivity_ratio(&input, &config)),
        "impact" => {
            let pattern = settings
                .app
                .as_deref()
                .context("the impact view needs --app PATTERN")?;
            Report::Impact(analysis::app_impact(&input, pattern)?)
        }
        "roi" => {
            let path = settings
                .downloads
                .as_deref()
                .context("the roi view needs --downloads FILE")?;
            let (downloads, report) = load_downloads(path)
                .with_context(|| format!("failed to load downloads from {}", path.display()))?;
            log_report("downloads", &report);

            let visits = match settings.browser.as_deref() {
                Some(path) => {
                    let parsed = load_browser_history(path, &tz).with_context(|| {
                        format!("failed to load browser history from {}", path.display())
                    })?;
                    log_report("browser history", &parsed.report);
                    Some(parsed.records)
                }
                None => None,
            };
            Report::Roi(analysis::weekly_roi(&input, &downloads, visits.as_deref()))
        }
        other => bail!("unknown view: {}", other),
    };

    Ok(report)
}

/// Health metrics a view reads; empty when it needs no health export.
fn metrics_for(view: &str) -> &'static [MetricType] {
    match view {
        "health" => &[MetricType::HeartRate],
        "sleep" => &[MetricType::SleepAnalysis],
        "productivity" => &[MetricType::SleepAnalysis, MetricType::HeadphoneAudioExposure],
        "impact" => &MetricType::VITALS,
        _ => &[],
    }
}

fn load_categories(supplement: Option<&Path>) -> Result<CategoryTable> {
    let builtin = CategoryTable::builtin();
    match supplement {
        Some(path) => {
            let extra = CategoryTable::load_supplement(path).with_context(|| {
                format!("failed to load category supplement {}", path.display())
            })?;
            Ok(builtin.with_supplement(&extra))
        }
        None => Ok(builtin),
    }
}

fn load_health(
    settings: &Settings,
    data_dir: &Path,
    metrics: &[MetricType],
    tz: &TimezoneHandler,
) -> Result<Vec<HealthSample>> {
    let path = match &settings.health_export {
        Some(path) => path.clone(),
        None => find_health_export(data_dir)?.with_context(|| {
            format!(
                "the {} view needs a health export: pass --health-export or put export.xml in {}",
                settings.view,
                data_dir.display()
            )
        })?,
    };

    let parsed = load_health_export(&path, metrics, tz)
        .with_context(|| format!("failed to load health export {}", path.display()))?;
    log_report("health", &parsed.report);
    Ok(parsed.records)
}

fn log_report(kind: &str, report: &ParseReport) {
    if report.skipped_total() > 0 {
        tracing::warn!(
            "Skipped {} {} records ({} accepted)",
            report.skipped_total(),
            kind,
            report.accepted
        );
        for (reason, n) in &report.skipped {
            tracing::debug!("  {}: {}", reason, n);
        }
    }
}
