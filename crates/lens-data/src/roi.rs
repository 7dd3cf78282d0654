//! Weekly usage and browsing normalized per download.

use std::collections::{BTreeMap, BTreeSet};

use lens_core::models::{BrowserVisit, CategorizedUsage};
use serde::Serialize;
use tracing::{info, warn};

use crate::aggregator::{aggregate, usage_by_week_and_category, Reduction};
use crate::correlator::align_positional;
use crate::reader::Downloads;
use crate::table::{Series, Table, Week};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyRoi {
    /// Hours per week (rows) and category (columns); zero where unused.
    pub weekly_hours: Table<Week>,
    /// Downloads aligned to the usage weeks.
    pub downloads: Series<Week>,
    /// Hours per download. Missing where a week had no downloads.
    pub usage_roi: Table<Week>,
    /// Visits per download on weeks present in both usage and browsing.
    pub browser_roi: Option<Table<Week>>,
}

/// Weekly hours by category divided by weekly downloads, plus browser visits
/// by category per download when a history is given.
///
/// Dated downloads are matched to usage weeks by key. Undated downloads are
/// matched by position and truncated to the shorter side.
pub fn weekly_roi(
    usage: &[CategorizedUsage],
    downloads: &Downloads,
    visits: Option<&[BrowserVisit]>,
) -> WeeklyRoi {
    let weekly_hours = pivot(&usage_by_week_and_category(usage));
    let week_totals = Series::from_pairs(
        "hours",
        weekly_hours
            .rows()
            .map(|(w, row)| (*w, row.iter().flatten().sum::<f64>())),
    );

    let downloads = match downloads {
        Downloads::Weekly(series) => series.filter_keys(|w| week_totals.get(w).is_some()),
        Downloads::Positional(values) => align_positional(&week_totals, values, "downloads"),
    };
    if downloads.is_empty() {
        warn!("No download values line up with the usage weeks");
    }

    let usage_roi = per_download(&weekly_hours, &downloads);

    let browser_roi = visits.map(|visits| {
        let counts = aggregate(
            visits,
            |v| (Week::containing(v.date()), v.category.clone()),
            |_| Some(1.0),
            Reduction::Count,
            "visits",
        );
        let weekly_visits = pivot(&counts);
        per_download(&weekly_visits, &downloads)
    });

    info!(
        "Computed ROI over {} weeks ({} with downloads)",
        weekly_hours.len(),
        downloads.len()
    );

    WeeklyRoi {
        weekly_hours,
        downloads,
        usage_roi,
        browser_roi,
    }
}

/// Spread `(week, category) → value` into one column per category, filling
/// absent cells with zero.
fn pivot(series: &Series<(Week, String)>) -> Table<Week> {
    let categories: BTreeSet<&String> = series.keys().map(|(_, c)| c).collect();
    let columns: Vec<String> = categories.iter().map(|c| c.to_string()).collect();

    let mut rows: BTreeMap<Week, Vec<Option<f64>>> = BTreeMap::new();
    for ((week, category), value) in series.iter() {
        let Some(idx) = columns.iter().position(|c| c == category) else {
            continue;
        };
        let row = rows
            .entry(*week)
            .or_insert_with(|| vec![Some(0.0); columns.len()]);
        row[idx] = Some(value);
    }

    let mut table = Table::new(columns);
    for (week, row) in rows {
        table.insert(week, row);
    }
    table
}

/// Divide every cell by that week's downloads, keeping only weeks that have
/// a download value. Zero downloads leave the week's cells missing.
fn per_download(table: &Table<Week>, downloads: &Series<Week>) -> Table<Week> {
    let mut out = Table::new(table.columns().to_vec());
    for (week, row) in table.rows() {
        let Some(d) = downloads.get(week) else {
            continue;
        };
        let divided = row
            .iter()
            .map(|cell| cell.filter(|_| d != 0.0).map(|v| v / d))
            .collect();
        out.insert(*week, divided);
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use lens_core::models::{Category, Productivity, UsageSession};

    fn monday(m: u32, d: u32) -> Week {
        Week(NaiveDate::from_ymd_opt(2024, m, d).unwrap())
    }

    fn at(m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, m, d, h, 0, 0).unwrap()
    }

    fn used(label: &str, m: u32, d: u32, hours: i64) -> CategorizedUsage {
        let start = at(m, d, 9);
        CategorizedUsage {
            session: UsageSession::new("app", start, start + chrono::Duration::hours(hours))
                .unwrap(),
            category: Category {
                label: label.to_string(),
                productivity: Productivity::Productive,
            },
        }
    }

    fn usage() -> Vec<CategorizedUsage> {
        vec![
            used("Development", 1, 8, 4),
            used("Marketing", 1, 10, 2),
            used("Development", 1, 16, 6),
        ]
    }

    #[test]
    fn test_weekly_roi_positional_downloads() {
        let roi = weekly_roi(&usage(), &Downloads::Positional(vec![2.0, 0.0, 99.0]), None);

        assert_eq!(roi.weekly_hours.get(&monday(1, 8), "Development"), Some(4.0));
        assert_eq!(roi.weekly_hours.get(&monday(1, 15), "Marketing"), Some(0.0));
        assert_eq!(roi.downloads.len(), 2, "downloads truncated to usage weeks");

        assert_eq!(roi.usage_roi.get(&monday(1, 8), "Development"), Some(2.0));
        assert_eq!(roi.usage_roi.get(&monday(1, 8), "Marketing"), Some(1.0));
        assert_eq!(
            roi.usage_roi.get(&monday(1, 15), "Development"),
            None,
            "zero downloads leave ROI missing"
        );
        assert!(roi.browser_roi.is_none());
    }

    #[test]
    fn test_weekly_roi_dated_downloads_match_by_week() {
        let downloads = Downloads::Weekly(Series::from_pairs(
            "downloads",
            vec![(monday(1, 15), 3.0), (monday(2, 5), 10.0)],
        ));
        let roi = weekly_roi(&usage(), &downloads, None);

        assert_eq!(roi.usage_roi.len(), 1);
        assert_eq!(roi.usage_roi.get(&monday(1, 15), "Development"), Some(2.0));
    }

    #[test]
    fn test_weekly_roi_browser_visits_on_common_weeks() {
        let visits = vec![
            BrowserVisit {
                timestamp: at(1, 9, 10),
                category: "News".into(),
            },
            BrowserVisit {
                timestamp: at(1, 9, 11),
                category: "News".into(),
            },
            BrowserVisit {
                timestamp: at(3, 4, 11),
                category: "News".into(),
            },
        ];
        let roi = weekly_roi(
            &usage(),
            &Downloads::Positional(vec![4.0, 1.0]),
            Some(visits.as_slice()),
        );

        let browser = roi.browser_roi.unwrap();
        assert_eq!(browser.len(), 1, "only weeks with downloads are kept");
        assert_eq!(browser.get(&monday(1, 8), "News"), Some(0.5));
    }
}
