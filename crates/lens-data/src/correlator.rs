//! Joins, alignment and Pearson correlation over keyed series.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use tracing::warn;

use crate::table::{GroupKey, Series, Table};

// ── Correlation ───────────────────────────────────────────────────────────────

/// Outcome of correlating two paired samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Correlation {
    /// Pearson's r, in `[-1, 1]`.
    Coefficient(f64),
    /// Fewer than two paired rows.
    InsufficientData { rows: usize },
    /// At least one side is constant.
    ZeroVariance,
}

impl Correlation {
    pub fn value(&self) -> Option<f64> {
        match self {
            Correlation::Coefficient(r) => Some(*r),
            _ => None,
        }
    }
}

impl fmt::Display for Correlation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Correlation::Coefficient(r) => write!(f, "{:.3}", r),
            Correlation::InsufficientData { rows } => {
                write!(f, "insufficient data ({} paired rows)", rows)
            }
            Correlation::ZeroVariance => f.write_str("undefined (zero variance)"),
        }
    }
}

/// Pearson correlation of `pairs`. Non-finite pairs are dropped first.
pub fn pearson(pairs: &[(f64, f64)]) -> Correlation {
    let pairs: Vec<(f64, f64)> = pairs
        .iter()
        .copied()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();

    let n = pairs.len();
    if n < 2 {
        return Correlation::InsufficientData { rows: n };
    }

    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n as f64;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n as f64;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return Correlation::ZeroVariance;
    }

    Correlation::Coefficient((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// Correlate two series over the keys they share.
pub fn correlate<K: Ord + Clone>(a: &Series<K>, b: &Series<K>) -> Correlation {
    pearson(&paired(a, b))
}

/// Values of `a` and `b` at their shared keys, in key order.
pub fn paired<K: Ord + Clone>(a: &Series<K>, b: &Series<K>) -> Vec<(f64, f64)> {
    a.iter()
        .filter_map(|(k, x)| b.get(k).map(|y| (x, y)))
        .collect()
}

// ── Joins ─────────────────────────────────────────────────────────────────────

/// Two-column table of the keys present in both series.
pub fn inner_join<K: GroupKey>(a: &Series<K>, b: &Series<K>) -> Table<K> {
    a.to_table().join(&b.to_table())
}

/// Square matrix of pairwise correlations between table columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Correlation>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<Correlation> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }
}

/// Correlate every pair of `columns`, each pair over the rows where both
/// values are present. Unknown column names are left out of the matrix.
pub fn correlation_matrix<K: Ord + Clone>(table: &Table<K>, columns: &[&str]) -> CorrelationMatrix {
    let picked: Vec<(usize, &str)> = columns
        .iter()
        .filter_map(|c| table.column_index(c).map(|i| (i, *c)))
        .collect();

    let values = picked
        .iter()
        .map(|(i, _)| {
            picked
                .iter()
                .map(|(j, _)| {
                    let pairs: Vec<(f64, f64)> = table
                        .rows()
                        .filter_map(|(_, row)| Some((row[*i]?, row[*j]?)))
                        .collect();
                    pearson(&pairs)
                })
                .collect()
        })
        .collect();

    CorrelationMatrix {
        columns: picked.iter().map(|(_, c)| c.to_string()).collect(),
        values,
    }
}

/// Re-key a daily series by `days`. `shift_days(&sleep, -1)` lines each
/// night's sleep up with the day before it.
pub fn shift_days(series: &Series<NaiveDate>, days: i64) -> Series<NaiveDate> {
    series.map_keys(|d| *d + Duration::days(days))
}

// ── As-of matching ────────────────────────────────────────────────────────────

/// Which right-hand rows an as-of match may pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    /// The last right row at or before the left timestamp.
    Backward,
    /// The first right row at or after the left timestamp.
    Forward,
    /// Whichever of the two is closer; ties go backward.
    Nearest,
}

/// For each left row, the right row matched by `direction`, if one exists
/// within `tolerance`.
///
/// Output follows left timestamp order. The inputs need not be sorted.
pub fn merge_asof<L: Clone, R: Clone>(
    left: &[(DateTime<Utc>, L)],
    right: &[(DateTime<Utc>, R)],
    direction: Direction,
    tolerance: Option<Duration>,
) -> Vec<(DateTime<Utc>, L, Option<R>)> {
    let mut right_sorted: Vec<&(DateTime<Utc>, R)> = right.iter().collect();
    right_sorted.sort_by_key(|r| r.0);

    let mut left_sorted: Vec<&(DateTime<Utc>, L)> = left.iter().collect();
    left_sorted.sort_by_key(|l| l.0);

    left_sorted
        .into_iter()
        .map(|(at, payload)| {
            let after_or_at = right_sorted.partition_point(|r| r.0 < *at);
            let after = right_sorted.partition_point(|r| r.0 <= *at);
            let backward = after.checked_sub(1).map(|i| right_sorted[i]);
            let forward = right_sorted.get(after_or_at).copied();

            let candidate = match direction {
                Direction::Backward => backward,
                Direction::Forward => forward,
                Direction::Nearest => match (backward, forward) {
                    (Some(b), Some(f)) => {
                        if *at - b.0 <= f.0 - *at {
                            Some(b)
                        } else {
                            Some(f)
                        }
                    }
                    (b, f) => b.or(f),
                },
            };

            let matched = candidate
                .filter(|r| {
                    let gap = if r.0 >= *at { r.0 - *at } else { *at - r.0 };
                    tolerance.map_or(true, |tol| gap <= tol)
                })
                .map(|r| r.1.clone());
            (*at, payload.clone(), matched)
        })
        .collect()
}

// ── Positional alignment ──────────────────────────────────────────────────────

/// Pair `values` with the keys of `series` by position, truncating to the
/// shorter of the two.
pub fn align_positional<K: Ord + Clone>(
    series: &Series<K>,
    values: &[f64],
    name: &str,
) -> Series<K> {
    if series.len() != values.len() {
        warn!(
            "{} has {} keys but {} values for \"{}\"; aligning the first {}",
            series.name(),
            series.len(),
            values.len(),
            name,
            series.len().min(values.len())
        );
    }
    Series::from_pairs(name, series.keys().cloned().zip(values.iter().copied()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
