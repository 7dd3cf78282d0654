//! CSV discovery and loading for screen-time, downloads and browser exports.
//!
//! Malformed rows never abort a parse: they are skipped, logged at debug
//! level and counted in the returned [`ParseReport`]. Only structural
//! problems (unreadable file, missing required header) become errors.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use lens_core::error::{LensError, Result};
use lens_core::models::{BrowserVisit, UsageSession};
use lens_core::time_utils::{parse_date, TimezoneHandler};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::table::{Series, Week};

// ── ParseReport ───────────────────────────────────────────────────────────────

/// Why a record was dropped during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SkipReason {
    /// The row could not be decoded or had too few fields.
    MalformedRow,
    /// A required field was empty.
    MissingField,
    BadTimestamp,
    EndBeforeStart,
    NonNumeric,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkipReason::MalformedRow => "malformed row",
            SkipReason::MissingField => "missing field",
            SkipReason::BadTimestamp => "unparsable timestamp",
            SkipReason::EndBeforeStart => "end before start",
            SkipReason::NonNumeric => "non-numeric value",
        };
        f.write_str(s)
    }
}

/// Accepted and skipped record counts for one or more sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseReport {
    pub sources: Vec<String>,
    pub accepted: usize,
    pub skipped: BTreeMap<SkipReason, usize>,
}

impl ParseReport {
    pub fn for_source(source: impl Into<String>) -> Self {
        Self {
            sources: vec![source.into()],
            ..Default::default()
        }
    }

    pub fn record_skip(&mut self, reason: SkipReason, location: impl fmt::Display) {
        debug!("Skipping record at {}: {}", location, reason);
        *self.skipped.entry(reason).or_insert(0) += 1;
    }

    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }

    pub fn skipped_for(&self, reason: SkipReason) -> usize {
        self.skipped.get(&reason).copied().unwrap_or(0)
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: ParseReport) {
        self.sources.extend(other.sources);
        self.accepted += other.accepted;
        for (reason, n) in other.skipped {
            *self.skipped.entry(reason).or_insert(0) += n;
        }
    }
}

/// Parsed records plus the report describing what was dropped.
#[derive(Debug, Clone)]
pub struct ParseOutput<T> {
    pub records: Vec<T>,
    pub report: ParseReport,
}

// ── File discovery ────────────────────────────────────────────────────────────

/// Find all `.csv` files recursively under `dir`, sorted by path.
pub fn find_usage_files(dir: &Path) -> Result<Vec<PathBuf>> {
    find_files_with_extension(dir, "csv")
}

/// Find all files with extension `ext` (case-insensitive) under `dir`,
/// sorted by path.
pub fn find_files_with_extension(dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(LensError::file_access(
            dir,
            std::io::Error::new(std::io::ErrorKind::NotFound, "directory not found"),
        ));
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|e| e.eq_ignore_ascii_case(ext))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    Ok(files)
}

// ── Usage CSV ─────────────────────────────────────────────────────────────────

const USAGE_APP: &str = "app";
const USAGE_START: &str = "start_time";
const USAGE_END: &str = "end_time";

/// Parse a screen-time CSV (`app,start_time,end_time[,usage]`).
///
/// Durations are always derived from the timestamps; a `usage` column is
/// accepted but ignored.
pub fn parse_usage_csv<R: Read>(
    reader: R,
    source: &str,
    tz: &TimezoneHandler,
) -> Result<ParseOutput<UsageSession>> {
    let mut csv_reader = csv_reader(reader);
    let headers = csv_reader
        .headers()
        .map_err(|e| LensError::parse(source, e))?
        .clone();

    let app_idx = require_column(&headers, USAGE_APP, source)?;
    let start_idx = require_column(&headers, USAGE_START, source)?;
    let end_idx = require_column(&headers, USAGE_END, source)?;

    let mut report = ParseReport::for_source(source);
    let mut sessions = Vec::new();

    for (i, row) in csv_reader.records().enumerate() {
        // +2: one for the header, one for 1-based numbering.
        let location = format!("{}:{}", source, i + 2);
        let row = match row {
            Ok(r) => r,
            Err(_) => {
                report.record_skip(SkipReason::MalformedRow, &location);
                continue;
            }
        };

        let (Some(app), Some(start), Some(end)) =
            (row.get(app_idx), row.get(start_idx), row.get(end_idx))
        else {
            report.record_skip(SkipReason::MalformedRow, &location);
            continue;
        };

        if app.is_empty() {
            report.record_skip(SkipReason::MissingField, &location);
            continue;
        }

        let (Some(start), Some(end)) = (tz.parse_timestamp(start), tz.parse_timestamp(end)) else {
            report.record_skip(SkipReason::BadTimestamp, &location);
            continue;
        };

        match UsageSession::new(app, start, end) {
            Ok(session) => sessions.push(session),
            Err(_) => report.record_skip(SkipReason::EndBeforeStart, &location),
        }
    }

    report.accepted = sessions.len();
    debug!(
        "Parsed {} sessions from {} ({} skipped)",
        report.accepted,
        source,
        report.skipped_total()
    );

    Ok(ParseOutput {
        records: sessions,
        report,
    })
}

/// Load every screen-time CSV under `dir`, sorted by session start.
pub fn load_usage_sessions(dir: &Path, tz: &TimezoneHandler) -> Result<ParseOutput<UsageSession>> {
    let files = find_usage_files(dir)?;
    if files.is_empty() {
        warn!("No CSV files found in {}", dir.display());
    }

    let mut sessions = Vec::new();
    let mut report = ParseReport::default();

    for path in &files {
        let file = std::fs::File::open(path).map_err(|e| LensError::file_access(path, e))?;
        let parsed = parse_usage_csv(file, &path.display().to_string(), tz)?;
        sessions.extend(parsed.records);
        report.merge(parsed.report);
    }

    sessions.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.app.cmp(&b.app)));

    info!(
        "Loaded {} usage sessions from {} files ({} rows skipped)",
        sessions.len(),
        files.len(),
        report.skipped_total()
    );

    Ok(ParseOutput {
        records: sessions,
        report,
    })
}

// ── Downloads CSV ─────────────────────────────────────────────────────────────

/// Weekly download counts.
#[derive(Debug, Clone, PartialEq)]
pub enum Downloads {
    /// Column headers were dates; values are keyed by the week containing
    /// each date.
    Weekly(Series<Week>),
    /// Column headers carried no dates; values are in column order.
    Positional(Vec<f64>),
}

impl Downloads {
    pub fn len(&self) -> usize {
        match self {
            Downloads::Weekly(s) => s.len(),
            Downloads::Positional(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parse a downloads CSV: the first data row, from the second column on,
/// holds one download count per week.
///
/// Non-numeric cells count as zero downloads and are reported.
pub fn parse_downloads_csv<R: Read>(reader: R, source: &str) -> Result<(Downloads, ParseReport)> {
    let mut csv_reader = csv_reader(reader);
    let headers = csv_reader
        .headers()
        .map_err(|e| LensError::parse(source, e))?
        .clone();

    if headers.len() < 2 {
        return Err(LensError::parse(
            source,
            "expected a label column followed by weekly columns",
        ));
    }

    let row = match csv_reader.records().next() {
        Some(Ok(row)) => row,
        Some(Err(e)) => return Err(LensError::parse(source, e)),
        None => return Err(LensError::parse(source, "no data row")),
    };

    let mut report = ParseReport::for_source(source);
    let mut values = Vec::with_capacity(headers.len() - 1);
    for (i, cell) in row.iter().enumerate().skip(1) {
        match cell.replace(',', "").parse::<f64>() {
            Ok(v) if v.is_finite() => {
                report.accepted += 1;
                values.push(v);
            }
            _ => {
                report.record_skip(SkipReason::NonNumeric, format!("{} column {}", source, i + 1));
                values.push(0.0);
            }
        }
    }

    let dates: Option<Vec<NaiveDate>> = headers.iter().skip(1).map(parse_header_date).collect();

    let downloads = match dates {
        Some(dates) if dates.len() == values.len() => {
            let mut by_week: BTreeMap<Week, f64> = BTreeMap::new();
            for (date, v) in dates.into_iter().zip(values) {
                *by_week.entry(Week::containing(date)).or_insert(0.0) += v;
            }
            Downloads::Weekly(Series::from_pairs("downloads", by_week))
        }
        _ => Downloads::Positional(values),
    };

    info!("Loaded {} weekly download values from {}", downloads.len(), source);
    Ok((downloads, report))
}

pub fn load_downloads(path: &Path) -> Result<(Downloads, ParseReport)> {
    let file = std::fs::File::open(path).map_err(|e| LensError::file_access(path, e))?;
    parse_downloads_csv(file, &path.display().to_string())
}

fn parse_header_date(s: &str) -> Option<NaiveDate> {
    parse_date(s).or_else(|| NaiveDate::parse_from_str(s.trim(), "%m/%d/%Y").ok())
}

// ── Browser history CSV ───────────────────────────────────────────────────────

/// Parse a browser history CSV with `Timestamp` and `Category` columns.
pub fn parse_browser_csv<R: Read>(
    reader: R,
    source: &str,
    tz: &TimezoneHandler,
) -> Result<ParseOutput<BrowserVisit>> {
    let mut csv_reader = csv_reader(reader);
    let headers = csv_reader
        .headers()
        .map_err(|e| LensError::parse(source, e))?
        .clone();

    let ts_idx = require_column(&headers, "Timestamp", source)?;
    let cat_idx = require_column(&headers, "Category", source)?;

    let mut report = ParseReport::for_source(source);
    let mut visits = Vec::new();

    for (i, row) in csv_reader.records().enumerate() {
        let location = format!("{}:{}", source, i + 2);
        let Ok(row) = row else {
            report.record_skip(SkipReason::MalformedRow, &location);
            continue;
        };
        let (Some(ts), Some(category)) = (row.get(ts_idx), row.get(cat_idx)) else {
            report.record_skip(SkipReason::MalformedRow, &location);
            continue;
        };
        if category.is_empty() {
            report.record_skip(SkipReason::MissingField, &location);
            continue;
        }
        let Some(timestamp) = tz.parse_timestamp(ts) else {
            report.record_skip(SkipReason::BadTimestamp, &location);
            continue;
        };
        visits.push(BrowserVisit {
            timestamp,
            category: category.to_string(),
        });
    }

    visits.sort_by_key(|v| v.timestamp);
    report.accepted = visits.len();
    info!(
        "Loaded {} browser visits from {} ({} skipped)",
        report.accepted,
        source,
        report.skipped_total()
    );

    Ok(ParseOutput {
        records: visits,
        report,
    })
}

pub fn load_browser_history(
    path: &Path,
    tz: &TimezoneHandler,
) -> Result<ParseOutput<BrowserVisit>> {
    let file = std::fs::File::open(path).map_err(|e| LensError::file_access(path, e))?;
    parse_browser_csv(file, &path.display().to_string(), tz)
}

// ── Private helpers ───────────────────────────────────────────────────────────

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Index of the header named `name` (case-insensitive).
fn require_column(headers: &csv::StringRecord, name: &str, source: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').eq_ignore_ascii_case(name))
        .ok_or_else(|| LensError::parse(source, format!("missing required column \"{}\"", name)))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
