//! Streaming reader for Apple Health `export.xml`.
//!
//! Exports routinely run to hundreds of megabytes, so records are pulled one
//! element at a time with `quick-xml` instead of building a document tree.

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use lens_core::error::{LensError, Result};
use lens_core::models::{HealthSample, MetricType, SleepState};
use lens_core::time_utils::TimezoneHandler;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, info};

use crate::reader::{find_files_with_extension, ParseOutput, ParseReport, SkipReason};

const RECORD_TAG: &[u8] = b"Record";

/// Raw attribute values of one `<Record>`.
#[derive(Debug, Default)]
struct RawRecord {
    kind: Option<String>,
    start: Option<String>,
    end: Option<String>,
    value: Option<String>,
}

/// Parse health samples of the requested `metrics` from an export stream.
///
/// Only top-level `<Record>` elements are read; copies nested inside
/// `<Correlation>` blocks are ignored. Records of other types are filtered
/// out silently; records of a requested type that lack a usable
/// `startDate` are skipped and counted.
pub fn parse_health_export<R: BufRead>(
    reader: R,
    source: &str,
    metrics: &[MetricType],
    tz: &TimezoneHandler,
) -> Result<ParseOutput<HealthSample>> {
    let mut xml = Reader::from_reader(reader);
    xml.config_mut().trim_text(true);

    let mut report = ParseReport::for_source(source);
    let mut samples = Vec::new();
    let mut buf = Vec::new();
    let mut depth: usize = 0;
    let mut seen: usize = 0;

    loop {
        let event = xml.read_event_into(&mut buf).map_err(|e| {
            LensError::parse(
                source,
                format!("malformed XML at byte {}: {}", xml.error_position(), e),
            )
        })?;

        let record = match event {
            Event::Start(ref e) => {
                depth += 1;
                (depth == 2 && e.name().as_ref() == RECORD_TAG)
                    .then(|| read_attributes(e, source))
                    .transpose()?
            }
            Event::Empty(ref e) => (depth == 1 && e.name().as_ref() == RECORD_TAG)
                .then(|| read_attributes(e, source))
                .transpose()?,
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                None
            }
            Event::Eof => break,
            _ => None,
        };

        if let Some(raw) = record {
            seen += 1;
            let metric = raw.kind.as_deref().and_then(MetricType::from_identifier);
            if let Some(metric) = metric.filter(|m| metrics.contains(m)) {
                let location = format!("{} record {}", source, seen);
                if let Some(sample) = build_sample(metric, raw, tz, &mut report, &location) {
                    samples.push(sample);
                }
            }
        }
        buf.clear();
    }

    samples.sort_by_key(|s| s.start);
    report.accepted = samples.len();
    debug!(
        "Scanned {} records in {}, kept {} ({} skipped)",
        seen,
        source,
        report.accepted,
        report.skipped_total()
    );

    Ok(ParseOutput {
        records: samples,
        report,
    })
}

/// Load health samples of the requested `metrics` from an export file.
pub fn load_health_export(
    path: &Path,
    metrics: &[MetricType],
    tz: &TimezoneHandler,
) -> Result<ParseOutput<HealthSample>> {
    let file = std::fs::File::open(path).map_err(|e| LensError::file_access(path, e))?;
    let out = parse_health_export(
        BufReader::new(file),
        &path.display().to_string(),
        metrics,
        tz,
    )?;
    info!(
        "Loaded {} health samples from {}",
        out.records.len(),
        path.display()
    );
    Ok(out)
}

/// The first `.xml` file under `dir`, if any.
pub fn find_health_export(dir: &Path) -> Result<Option<PathBuf>> {
    Ok(find_files_with_extension(dir, "xml")?.into_iter().next())
}

fn read_attributes(e: &BytesStart<'_>, source: &str) -> Result<RawRecord> {
    let mut raw = RawRecord::default();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| LensError::parse(source, err))?;
        let slot = match attr.key.as_ref() {
            b"type" => &mut raw.kind,
            b"startDate" => &mut raw.start,
            b"endDate" => &mut raw.end,
            b"value" => &mut raw.value,
            _ => continue,
        };
        let value = attr
            .unescape_value()
            .map_err(|err| LensError::parse(source, err))?;
        *slot = Some(value.into_owned());
    }
    Ok(raw)
}

fn build_sample(
    metric: MetricType,
    raw: RawRecord,
    tz: &TimezoneHandler,
    report: &mut ParseReport,
    location: &str,
) -> Option<HealthSample> {
    let Some(start_raw) = raw.start.filter(|s| !s.trim().is_empty()) else {
        report.record_skip(SkipReason::MissingField, location);
        return None;
    };
    let Some(start) = tz.parse_timestamp(&start_raw) else {
        report.record_skip(SkipReason::BadTimestamp, location);
        return None;
    };

    let end = match raw.end.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => None,
        Some(s) => match tz.parse_timestamp(s) {
            Some(end) if end < start => {
                report.record_skip(SkipReason::EndBeforeStart, location);
                return None;
            }
            Some(end) => Some(end),
            None => {
                report.record_skip(SkipReason::BadTimestamp, location);
                return None;
            }
        },
    };

    let value = raw.value.as_deref().and_then(|v| parse_value(metric, v));

    Some(HealthSample {
        metric,
        start,
        end,
        value,
    })
}

/// Numeric value of a record. Sleep records may carry a category string
/// instead of a numeric code.
fn parse_value(metric: MetricType, raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if metric == MetricType::SleepAnalysis {
        if let Some(state) = SleepState::from_category_value(raw) {
            return Some(state.code() as f64);
        }
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
