//! Keyed numeric series and tables.
//!
//! [`Series`] holds one summary value per grouping key; [`Table`] holds a row
//! of optional values per key, one per named column. Both keep their keys in
//! ascending order and are never mutated by the analysis stages: every
//! operation returns a new value.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use lens_core::models::MetricType;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

// ── Grouping keys ─────────────────────────────────────────────────────────────

/// Hour of the day, `0..=23`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HourOfDay(pub u8);

impl fmt::Display for HourOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// A week, identified by its Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Week(pub NaiveDate);

impl Week {
    /// The week containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Week(lens_core::time_utils::week_start(date))
    }

    pub fn monday(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// A key usable for grouping, rendering and export.
///
/// `key_columns` names the leading column(s) a key occupies when a table is
/// written out; `key_values` renders one cell per key column.
pub trait GroupKey: Ord + Clone + fmt::Debug {
    fn key_columns() -> &'static [&'static str];
    fn key_values(&self) -> Vec<String>;
}

impl GroupKey for NaiveDate {
    fn key_columns() -> &'static [&'static str] {
        &["date"]
    }
    fn key_values(&self) -> Vec<String> {
        vec![self.format("%Y-%m-%d").to_string()]
    }
}

impl GroupKey for HourOfDay {
    fn key_columns() -> &'static [&'static str] {
        &["hour"]
    }
    fn key_values(&self) -> Vec<String> {
        vec![self.0.to_string()]
    }
}

impl GroupKey for Week {
    fn key_columns() -> &'static [&'static str] {
        &["week"]
    }
    fn key_values(&self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl GroupKey for String {
    fn key_columns() -> &'static [&'static str] {
        &["app"]
    }
    fn key_values(&self) -> Vec<String> {
        vec![self.clone()]
    }
}

impl GroupKey for MetricType {
    fn key_columns() -> &'static [&'static str] {
        &["metric"]
    }
    fn key_values(&self) -> Vec<String> {
        vec![self.short_name().to_string()]
    }
}

impl GroupKey for (NaiveDate, String) {
    fn key_columns() -> &'static [&'static str] {
        &["date", "category"]
    }
    fn key_values(&self) -> Vec<String> {
        vec![self.0.format("%Y-%m-%d").to_string(), self.1.clone()]
    }
}

impl GroupKey for (Week, String) {
    fn key_columns() -> &'static [&'static str] {
        &["week", "category"]
    }
    fn key_values(&self) -> Vec<String> {
        vec![self.0.to_string(), self.1.clone()]
    }
}

// ── Series ────────────────────────────────────────────────────────────────────

/// A named, key-ordered mapping `K → f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct Series<K: Ord> {
    name: String,
    values: BTreeMap<K, f64>,
}

impl<K: Ord + Clone> Series<K> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: BTreeMap::new(),
        }
    }

    /// Build a series from `(key, value)` pairs. A repeated key keeps the
    /// last value.
    pub fn from_pairs(name: impl Into<String>, pairs: impl IntoIterator<Item = (K, f64)>) -> Self {
        Self {
            name: name.into(),
            values: pairs.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Same values under a different name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: self.values.clone(),
        }
    }

    pub fn get(&self, key: &K) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, f64)> {
        self.values.iter().map(|(k, v)| (k, *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.values.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.values().copied()
    }

    /// Re-key every entry. Values landing on the same new key are summed.
    pub fn map_keys<K2: Ord + Clone>(&self, f: impl Fn(&K) -> K2) -> Series<K2> {
        let mut out: BTreeMap<K2, f64> = BTreeMap::new();
        for (k, v) in &self.values {
            *out.entry(f(k)).or_insert(0.0) += v;
        }
        Series {
            name: self.name.clone(),
            values: out,
        }
    }

    /// Entries whose key satisfies `keep`.
    pub fn filter_keys(&self, keep: impl Fn(&K) -> bool) -> Self {
        Self {
            name: self.name.clone(),
            values: self
                .values
                .iter()
                .filter(|(k, _)| keep(k))
                .map(|(k, v)| (k.clone(), *v))
                .collect(),
        }
    }

    /// The key with the largest value; the earliest key wins ties.
    pub fn argmax(&self) -> Option<(&K, f64)> {
        let mut best: Option<(&K, f64)> = None;
        for (k, v) in &self.values {
            match best {
                Some((_, b)) if *v <= b => {}
                _ => best = Some((k, *v)),
            }
        }
        best
    }

    /// Arithmetic mean of the values, `None` when empty.
    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.values.values().sum::<f64>() / self.values.len() as f64)
    }
}

impl<K: GroupKey> Series<K> {
    /// Single-column table view of this series.
    pub fn to_table(&self) -> Table<K> {
        let mut table = Table::new(vec![self.name.clone()]);
        for (k, v) in &self.values {
            table.insert(k.clone(), vec![Some(*v)]);
        }
        table
    }
}

impl<K: GroupKey> Serialize for Series<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_table().serialize(serializer)
    }
}

// ── Table ─────────────────────────────────────────────────────────────────────

/// Key-ordered rows of optional values, one per named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<K: Ord> {
    columns: Vec<String>,
    rows: BTreeMap<K, Vec<Option<f64>>>,
}

impl<K: Ord + Clone> Table<K> {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: BTreeMap::new(),
        }
    }

    /// Insert or replace the row for `key`. The row is padded with missing
    /// values or truncated to the column count.
    pub fn insert(&mut self, key: K, mut row: Vec<Option<f64>>) {
        row.resize(self.columns.len(), None);
        self.rows.insert(key, row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.rows.keys()
    }

    pub fn rows(&self) -> impl Iterator<Item = (&K, &[Option<f64>])> {
        self.rows.iter().map(|(k, r)| (k, r.as_slice()))
    }

    pub fn row(&self, key: &K) -> Option<&[Option<f64>]> {
        self.rows.get(key).map(|r| r.as_slice())
    }

    pub fn get(&self, key: &K, column: &str) -> Option<f64> {
        let idx = self.column_index(column)?;
        self.rows.get(key).and_then(|r| r[idx])
    }

    /// The non-missing values of `name` as a series, or `None` for an
    /// unknown column.
    pub fn column(&self, name: &str) -> Option<Series<K>> {
        let idx = self.column_index(name)?;
        Some(Series::from_pairs(
            name,
            self.rows
                .iter()
                .filter_map(|(k, r)| r[idx].map(|v| (k.clone(), v))),
        ))
    }

    /// Mean of the non-missing values of `name`.
    pub fn column_mean(&self, name: &str) -> Option<f64> {
        self.column(name).and_then(|s| s.mean())
    }

    /// Inner join on key: rows present in both tables, columns of `self`
    /// followed by those of `other`. Clashing column names from `other` get
    /// a `_right` suffix.
    pub fn join(&self, other: &Table<K>) -> Table<K> {
        let mut columns = self.columns.clone();
        for c in &other.columns {
            if columns.contains(c) {
                columns.push(format!("{}_right", c));
            } else {
                columns.push(c.clone());
            }
        }

        let mut out = Table::new(columns);
        for (k, left) in &self.rows {
            if let Some(right) = other.rows.get(k) {
                let mut row = left.clone();
                row.extend(right.iter().copied());
                out.insert(k.clone(), row);
            }
        }
        out
    }
}

impl<K: GroupKey> Table<K> {
    /// Outer-join several series into one table; a key absent from a series
    /// leaves that cell missing.
    pub fn from_series(series: &[&Series<K>]) -> Table<K> {
        let mut keys: Vec<&K> = series.iter().flat_map(|s| s.keys()).collect();
        keys.sort();
        keys.dedup();

        let mut table = Table::new(series.iter().map(|s| s.name().to_string()).collect());
        for k in keys {
            table.insert(k.clone(), series.iter().map(|s| s.get(k)).collect());
        }
        table
    }

    /// Full header: key columns followed by value columns.
    pub fn header(&self) -> Vec<String> {
        K::key_columns()
            .iter()
            .map(|c| c.to_string())
            .chain(self.columns.iter().cloned())
            .collect()
    }
}

impl<K: GroupKey> Serialize for Table<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for (key, row) in &self.rows {
            seq.serialize_element(&RowRecord {
                key: key.key_values(),
                key_columns: K::key_columns(),
                columns: &self.columns,
                values: row,
            })?;
        }
        seq.end()
    }
}

/// One table row serialized as `{key columns..., value columns...}`.
struct RowRecord<'a> {
    key: Vec<String>,
    key_columns: &'static [&'static str],
    columns: &'a [String],
    values: &'a [Option<f64>],
}

impl Serialize for RowRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.key.len() + self.columns.len()))?;
        for (name, value) in self.key_columns.iter().zip(&self.key) {
            map.serialize_entry(name, value)?;
        }
        for (name, value) in self.columns.iter().zip(self.values) {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
