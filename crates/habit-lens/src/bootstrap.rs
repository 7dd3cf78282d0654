use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const APP_DIR: &str = ".habit-lens";

// ── Directory bootstrap ────────────────────────────────────────────────────────

fn home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Ensure `~/.habit-lens/`, `~/.habit-lens/logs/` and `~/.habit-lens/data/`
/// exist.
pub fn ensure_directories() -> anyhow::Result<()> {
    ensure_directories_in(&home())
}

pub fn ensure_directories_in(home: &Path) -> anyhow::Result<()> {
    let app_dir = home.join(APP_DIR);
    std::fs::create_dir_all(app_dir.join("logs"))?;
    std::fs::create_dir_all(app_dir.join("data"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a Python-style level name to an `EnvFilter` directive.
///
/// Unknown names are passed through so that full directives such as
/// `"lens_data=debug"` keep working.
pub fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" | "WARN" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_string(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Output goes to stderr, and additionally to `log_file` (appending) when
/// given. Falls back to `"info"` if the level cannot be parsed.
pub fn setup_logging(log_level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            Some(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

// ── Data-path discovery ────────────────────────────────────────────────────────

/// The data directory to load from: `explicit` when given, otherwise
/// `~/.habit-lens/data/` if it exists.
pub fn discover_data_path(explicit: Option<&Path>) -> Option<PathBuf> {
    discover_data_path_in(explicit, &home())
}

pub fn discover_data_path_in(explicit: Option<&Path>, home: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let default = home.join(APP_DIR).join("data");
    default.is_dir().then_some(default)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
