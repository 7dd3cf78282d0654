//! App categorization.
//!
//! A [`CategoryTable`] is an immutable identifier → label map plus a
//! label → [`Productivity`] map. The [`Categorizer`] borrows a table and maps
//! any app identifier to exactly one [`Category`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use tracing::{debug, info, warn};

use crate::builtin_categories::{BUILTIN_APP_CATEGORIES, BUILTIN_PARENT_CATEGORIES};
use crate::error::{LensError, Result};
use crate::models::{CategorizedUsage, Category, Productivity, UsageSession};

pub use crate::builtin_categories::BUILTIN_TABLE_VERSION;

/// Label assigned to apps missing from the table.
pub const OTHER_LABEL: &str = "Other";

// ── CategoryTable ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTable {
    apps: BTreeMap<String, String>,
    parents: BTreeMap<String, Productivity>,
}

impl CategoryTable {
    /// The versioned default table shipped with habit-lens.
    pub fn builtin() -> Self {
        Self {
            apps: BUILTIN_APP_CATEGORIES
                .iter()
                .map(|(app, label)| (app.to_string(), label.to_string()))
                .collect(),
            parents: BUILTIN_PARENT_CATEGORIES
                .iter()
                .filter_map(|(label, bucket)| {
                    Productivity::parse(bucket).map(|p| (label.to_string(), p))
                })
                .collect(),
        }
    }

    /// Build a table from ordered `(app, label)` and `(label, bucket)` pairs.
    ///
    /// An identifier listed twice with the same value is accepted with a
    /// warning; listed twice with different values it is rejected. Bucket
    /// names must be one of the [`Productivity`] variants.
    pub fn from_pairs<A, P>(apps: A, parents: P) -> Result<Self>
    where
        A: IntoIterator<Item = (String, String)>,
        P: IntoIterator<Item = (String, String)>,
    {
        let apps = collect_unique(apps)?;

        let mut buckets = BTreeMap::new();
        for (label, bucket) in collect_unique(parents)? {
            let productivity = Productivity::parse(&bucket).ok_or_else(|| {
                LensError::Config(format!(
                    "unknown productivity bucket \"{}\" for category \"{}\"",
                    bucket, label
                ))
            })?;
            buckets.insert(label, productivity);
        }

        Ok(Self {
            apps,
            parents: buckets,
        })
    }

    /// Load a supplement from a JSON file shaped like
    /// `{"apps": {"com.example.App": "Development"}, "parents": {"Gaming": "Distracting"}}`.
    pub fn load_supplement(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| LensError::file_access(path, e))?;
        let raw: SupplementFile = serde_json::from_str(&content)?;
        let table = Self::from_pairs(raw.apps, raw.parents)?;
        info!(
            "Loaded {} app and {} parent categories from {}",
            table.apps.len(),
            table.parents.len(),
            path.display()
        );
        Ok(table)
    }

    /// Return a new table with `supplement` layered over `self`.
    ///
    /// Entries in the supplement extend the base table or replace the base
    /// value for the same key. `self` is left untouched.
    pub fn with_supplement(&self, supplement: &CategoryTable) -> CategoryTable {
        let mut merged = self.clone();
        for (app, label) in &supplement.apps {
            if let Some(previous) = merged.apps.insert(app.clone(), label.clone()) {
                if previous != *label {
                    debug!("Supplement reassigns {}: {} -> {}", app, previous, label);
                }
            }
        }
        for (label, bucket) in &supplement.parents {
            merged.parents.insert(label.clone(), *bucket);
        }
        merged
    }

    pub fn label_for(&self, app: &str) -> Option<&str> {
        self.apps.get(app).map(String::as_str)
    }

    pub fn productivity_for(&self, label: &str) -> Option<Productivity> {
        self.parents.get(label).copied()
    }

    /// Number of app identifiers in the table.
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Distinct fine labels, sorted.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.apps.values().map(String::as_str).collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }
}

fn collect_unique<I>(pairs: I) -> Result<BTreeMap<String, String>>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    for (key, value) in pairs {
        match map.get(&key) {
            Some(existing) if *existing == value => {
                warn!("Category table lists {} twice", key);
            }
            Some(existing) => {
                return Err(LensError::DuplicateCategory {
                    app: key,
                    first: existing.clone(),
                    second: value,
                });
            }
            None => {
                map.insert(key, value);
            }
        }
    }
    Ok(map)
}

// ── Supplement file ───────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct SupplementFile {
    #[serde(default, deserialize_with = "ordered_pairs")]
    apps: Vec<(String, String)>,
    #[serde(default, deserialize_with = "ordered_pairs")]
    parents: Vec<(String, String)>,
}

/// Deserialize a JSON object into its entries in document order, keeping
/// repeated keys so that [`collect_unique`] can flag them.
fn ordered_pairs<'de, D>(deserializer: D) -> std::result::Result<Vec<(String, String)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PairVisitor;

    impl<'de> Visitor<'de> for PairVisitor {
        type Value = Vec<(String, String)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an object of string values")
        }

        fn visit_map<M>(self, mut map: M) -> std::result::Result<Self::Value, M::Error>
        where
            M: MapAccess<'de>,
        {
            let mut pairs = Vec::new();
            while let Some((key, value)) = map.next_entry::<String, String>()? {
                pairs.push((key, value));
            }
            Ok(pairs)
        }
    }

    deserializer.deserialize_map(PairVisitor)
}

// ── Categorizer ───────────────────────────────────────────────────────────────

/// Maps app identifiers to categories using a borrowed [`CategoryTable`].
#[derive(Debug, Clone, Copy)]
pub struct Categorizer<'a> {
    table: &'a CategoryTable,
}

impl<'a> Categorizer<'a> {
    pub fn new(table: &'a CategoryTable) -> Self {
        Self { table }
    }

    /// Categorize one app identifier. Never fails: unmapped apps get the
    /// `Other` label and labels without a parent get [`Productivity::Other`].
    pub fn categorize(&self, app: &str) -> Category {
        let label = self.table.label_for(app).unwrap_or(OTHER_LABEL);
        let productivity = self
            .table
            .productivity_for(label)
            .unwrap_or(Productivity::Other);
        Category {
            label: label.to_string(),
            productivity,
        }
    }

    /// Tag every session with its category, returning new values.
    pub fn categorize_sessions(&self, sessions: &[UsageSession]) -> Vec<CategorizedUsage> {
        sessions
            .iter()
            .map(|session| CategorizedUsage {
                category: self.categorize(&session.app),
                session: session.clone(),
            })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
