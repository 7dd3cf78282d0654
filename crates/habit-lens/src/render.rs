//! Output formatting for view reports.

use std::io::{self, Write};

use lens_core::formatting::{format_hours, format_optional};
use lens_data::analysis::{HealthCorrelation, ProductivityReport, SleepSummary, UsageSummary};
use lens_data::export::write_table;
use lens_data::impact::{app_hours_table, AppHours, AppImpact, MetricSummary};
use lens_data::roi::WeeklyRoi;
use lens_data::table::{GroupKey, Table};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Csv,
    Json,
}

impl Format {
    pub fn from_name(name: &str) -> Self {
        match name {
            "csv" => Format::Csv,
            "json" => Format::Json,
            _ => Format::Text,
        }
    }
}

/// The result of one view.
#[derive(Debug, Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum Report {
    Usage(UsageSummary),
    Health(HealthCorrelation),
    Sleep(SleepSummary),
    Productivity(ProductivityReport),
    Impact(AppImpact),
    Roi(WeeklyRoi),
}

pub fn render<W: Write>(out: &mut W, report: &Report, format: Format) -> anyhow::Result<()> {
    match format {
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
        }
        Format::Csv => render_csv(out, report)?,
        Format::Text => render_text(out, report)?,
    }
    Ok(())
}

// ── CSV ───────────────────────────────────────────────────────────────────────

/// Every table of the report, each introduced by a `# title` line and
/// followed by a blank line.
fn render_csv<W: Write>(out: &mut W, report: &Report) -> anyhow::Result<()> {
    fn section<W: Write, K: GroupKey>(
        out: &mut W,
        title: &str,
        table: &Table<K>,
    ) -> anyhow::Result<()> {
        writeln!(out, "# {}", title)?;
        write_table(&mut *out, table)?;
        writeln!(out)?;
        Ok(())
    }

    match report {
        Report::Usage(r) => {
            section(out, "daily usage", &r.daily)?;
            section(out, "hourly usage", &r.hourly.to_table())?;
        }
        Report::Health(r) => section(out, "hourly usage vs heart rate", &r.hourly)?,
        Report::Sleep(r) => {
            section(out, "nightly sleep", &r.nightly)?;
            section(out, "usage vs sleep", &r.usage_vs_sleep)?;
        }
        Report::Productivity(r) => {
            section(out, "daily productivity", &r.daily)?;
            section(out, "productive hours vs health", &r.comparison)?;
        }
        Report::Impact(r) => {
            section(out, &format!("health around {}", r.pattern), &r.health_table())?;
            section(out, "usage in the 24h before", &app_hours_table(&r.usage_before))?;
            section(out, "usage in the 24h after", &app_hours_table(&r.usage_after))?;
        }
        Report::Roi(r) => {
            section(out, "weekly hours", &r.weekly_hours)?;
            section(out, "downloads", &r.downloads.to_table())?;
            section(out, "hours per download", &r.usage_roi)?;
            if let Some(browser) = &r.browser_roi {
                section(out, "visits per download", browser)?;
            }
        }
    }
    Ok(())
}

// ── Text ──────────────────────────────────────────────────────────────────────

fn render_text<W: Write>(out: &mut W, report: &Report) -> io::Result<()> {
    match report {
        Report::Usage(r) => usage_text(out, r),
        Report::Health(r) => health_text(out, r),
        Report::Sleep(r) => sleep_text(out, r),
        Report::Productivity(r) => productivity_text(out, r),
        Report::Impact(r) => impact_text(out, r),
        Report::Roi(r) => roi_text(out, r),
    }
}

fn usage_text<W: Write>(out: &mut W, r: &UsageSummary) -> io::Result<()> {
    writeln!(out, "Total usage:     {}", format_hours(r.total_hours))?;
    writeln!(out, "Sessions:        {}", r.session_count)?;
    writeln!(
        out,
        "Average session: {}",
        r.average_session_hours.map(format_hours).unwrap_or_else(|| "-".into())
    )?;
    writeln!(out, "Most used app:   {}", r.most_used_app.as_deref().unwrap_or("-"))?;
    writeln!(
        out,
        "Peak hour:       {}",
        r.peak_hour.map(|h| format!("{:02}:00", h)).unwrap_or_else(|| "-".into())
    )?;
    writeln!(out)?;
    app_list(out, "Top apps", &r.top_apps)?;
    text_table(out, "Daily usage (hours)", &r.daily)?;
    text_table(out, "Usage by hour of day", &r.hourly.to_table())
}

fn health_text<W: Write>(out: &mut W, r: &HealthCorrelation) -> io::Result<()> {
    writeln!(out, "Hourly usage vs heart rate: {}", r.hourly_correlation)?;
    writeln!(
        out,
        "Session length vs prior heart rate ({} sessions): {}",
        r.matched_sessions, r.session_correlation
    )?;
    writeln!(out)?;
    text_table(out, "Usage and mean heart rate by hour", &r.hourly)
}

fn sleep_text<W: Write>(out: &mut W, r: &SleepSummary) -> io::Result<()> {
    writeln!(out, "Nights:        {}", r.nights)?;
    writeln!(
        out,
        "Average sleep: {}",
        r.average_sleep_hours.map(format_hours).unwrap_or_else(|| "-".into())
    )?;
    writeln!(out, "Usage vs sleep: {}", r.correlation)?;
    writeln!(out)?;
    text_table(out, "Nightly sleep (hours)", &r.nightly)?;
    text_table(out, "Usage vs sleep", &r.usage_vs_sleep)
}

fn productivity_text<W: Write>(out: &mut W, r: &ProductivityReport) -> io::Result<()> {
    writeln!(
        out,
        "Average productive hours: {}",
        format_optional(r.average_productive_hours, 2)
    )?;
    writeln!(
        out,
        "Average productive ratio: {}%",
        format_optional(r.average_productive_ratio, 1)
    )?;
    writeln!(out, "Productive hours vs same-day sleep: {}", r.same_day_sleep)?;
    writeln!(out, "Productive hours vs next-day sleep: {}", r.next_day_sleep)?;
    writeln!(out, "Productive hours vs audio exposure: {}", r.audio_exposure)?;
    writeln!(out)?;
    text_table(out, "Daily productivity (hours)", &r.daily)?;
    text_table(out, "Productive hours vs health", &r.comparison)
}

fn impact_text<W: Write>(out: &mut W, r: &AppImpact) -> io::Result<()> {
    writeln!(out, "Pattern:      {}", r.pattern)?;
    let matched = if r.matched_apps.is_empty() {
        "-".to_string()
    } else {
        r.matched_apps.join(", ")
    };
    writeln!(out, "Matched apps: {}", matched)?;
    writeln!(out, "Usage hours:  {}", r.usage_hours)?;
    writeln!(out)?;

    let mut rows = vec![vec![
        "metric".to_string(),
        "before".to_string(),
        "±".to_string(),
        "after".to_string(),
        "±".to_string(),
    ]];
    let summary = |m: &MetricSummary| [format_optional(m.mean, 1), format_optional(m.std, 1)];
    for (before, after) in r.health_before.iter().zip(&r.health_after) {
        let mut row = vec![before.metric.short_name().to_string()];
        row.extend(summary(before));
        row.extend(summary(after));
        rows.push(row);
    }
    writeln!(out, "Health in the 24h before / after")?;
    aligned(out, &rows)?;
    writeln!(out)?;

    app_list(out, "Usage in the 24h before", &r.usage_before)?;
    app_list(out, "Usage in the 24h after", &r.usage_after)
}

fn roi_text<W: Write>(out: &mut W, r: &WeeklyRoi) -> io::Result<()> {
    text_table(out, "Weekly hours by category", &r.weekly_hours)?;
    text_table(out, "Downloads", &r.downloads.to_table())?;
    text_table(out, "Hours per download", &r.usage_roi)?;
    if let Some(browser) = &r.browser_roi {
        text_table(out, "Visits per download", browser)?;
    }
    Ok(())
}

fn app_list<W: Write>(out: &mut W, title: &str, apps: &[AppHours]) -> io::Result<()> {
    writeln!(out, "{}", title)?;
    if apps.is_empty() {
        writeln!(out, "  (none)")?;
    }
    let rows: Vec<Vec<String>> = apps
        .iter()
        .map(|a| vec![a.app.clone(), format_hours(a.hours)])
        .collect();
    aligned(out, &rows)?;
    writeln!(out)
}

fn text_table<W: Write, K: GroupKey>(out: &mut W, title: &str, table: &Table<K>) -> io::Result<()> {
    writeln!(out, "{}", title)?;
    if table.is_empty() {
        writeln!(out, "  (no rows)")?;
        return writeln!(out);
    }
    let mut rows = vec![table.header()];
    for (key, row) in table.rows() {
        let mut line = key.key_values();
        line.extend(row.iter().map(|v| format_optional(*v, 2)));
        rows.push(line);
    }
    aligned(out, &rows)?;
    writeln!(out)
}

/// Write `rows` with each column padded to its widest cell; the first column
/// is left-aligned and the rest right-aligned.
fn aligned<W: Write>(out: &mut W, rows: &[Vec<String>]) -> io::Result<()> {
    let ncols = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..ncols)
        .map(|i| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (c, w))| {
                if i == 0 {
                    format!("{:<w$}", c, w = *w)
                } else {
                    format!("{:>w$}", c, w = *w)
                }
            })
            .collect();
        writeln!(out, "  {}", cells.join("  ").trim_end())?;
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
