use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by habit-lens.
///
/// Only conditions that abort an analysis live here. A malformed row, a
/// non-numeric value or a correlation over too few points is absorbed by the
/// stage that sees it and never surfaces as a `LensError`.
#[derive(Error, Debug)]
pub enum LensError {
    /// A source file or directory could not be opened or read.
    #[error("Failed to read {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source could be read but its container format is unusable.
    #[error("Failed to parse {source_name}: {reason}")]
    Parse { source_name: String, reason: String },

    /// The same app identifier was mapped to two different categories.
    #[error("Conflicting category for {app}: \"{first}\" vs \"{second}\"")]
    DuplicateCategory {
        app: String,
        first: String,
        second: String,
    },

    /// A usage session ends before it starts.
    #[error("Invalid session for {app}: end {end} precedes start {start}")]
    InvalidSession {
        app: String,
        start: String,
        end: String,
    },

    /// A timezone name is not a recognised IANA identifier.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LensError {
    /// Build a [`LensError::FileAccess`] for `path`.
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LensError::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// Build a [`LensError::Parse`] naming the failing source.
    pub fn parse(source_name: impl Into<String>, reason: impl ToString) -> Self {
        LensError::Parse {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }
}

/// Convenience alias used throughout the habit-lens crates.
pub type Result<T> = std::result::Result<T, LensError>;
