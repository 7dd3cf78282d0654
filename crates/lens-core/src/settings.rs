use chrono::NaiveDate;
use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{LensError, Result};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Correlate screen time with sleep, heart rate and audio exposure
#[derive(Parser, Debug, Clone)]
#[command(
    name = "habit-lens",
    about = "Correlate screen time with sleep, heart rate and audio exposure",
    version
)]
pub struct Settings {
    /// Analysis view
    #[arg(long, default_value = "usage", value_parser = ["usage", "health", "sleep", "productivity", "impact", "roi"])]
    pub view: String,

    /// Directory containing screen-time CSV exports
    #[arg(long, env = "HABIT_LENS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Apple Health export.xml (defaults to the first .xml in the data directory)
    #[arg(long)]
    pub health_export: Option<PathBuf>,

    /// JSON file extending the built-in app category table
    #[arg(long)]
    pub categories: Option<PathBuf>,

    /// Timezone assumed for timestamps without an offset ("auto" = system)
    #[arg(long, default_value = "UTC")]
    pub timezone: String,

    /// Trailing window, in data points, for rolling averages
    #[arg(long, default_value = "7", value_parser = clap::value_parser!(u32).range(1..=365))]
    pub rolling_window: u32,

    /// Count only asleep stages toward nightly sleep
    #[arg(long)]
    pub asleep_only: bool,

    /// Number of apps in top-app rankings
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..=1000))]
    pub top: u32,

    /// App name pattern for the impact view (case-insensitive substring)
    #[arg(long)]
    pub app: Option<String>,

    /// Weekly downloads CSV for the ROI view
    #[arg(long)]
    pub downloads: Option<PathBuf>,

    /// Browser history CSV for the ROI view
    #[arg(long)]
    pub browser: Option<PathBuf>,

    /// Ignore usage before this date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_start_date)]
    pub start_date: Option<NaiveDate>,

    /// Output format
    #[arg(long, default_value = "text", value_parser = ["text", "csv", "json"])]
    pub format: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

fn parse_start_date(s: &str) -> std::result::Result<NaiveDate, String> {
    crate::time_utils::parse_date(s).ok_or_else(|| format!("expected YYYY-MM-DD, got \"{}\"", s))
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Values remembered between runs in `~/.habit-lens/last_used.json`.
///
/// Per-run inputs (`--app`, `--downloads`, `--browser`, `--start-date`) are
/// never stored.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_export: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rolling_window: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl LastUsedParams {
    pub fn config_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::config_path_in(&home)
    }

    /// `<home>/.habit-lens/last_used.json`.
    pub fn config_path_in(home: &Path) -> PathBuf {
        home.join(".habit-lens").join("last_used.json")
    }

    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Read saved values; an absent file yields defaults, an unreadable
    /// one yields defaults with a warning.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        let parsed = std::fs::read_to_string(path)
            .map_err(|e| LensError::file_access(path, e))
            .and_then(|content| Ok(serde_json::from_str(&content)?));
        parsed.unwrap_or_else(|e| {
            warn!("Ignoring saved settings: {}", e);
            Self::default()
        })
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Write through a temporary sibling file and rename it into place.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");

        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| LensError::file_access(dir, e))?;
        }
        std::fs::write(&tmp, json).map_err(|e| LensError::file_access(&tmp, e))?;
        std::fs::rename(&tmp, path).map_err(|e| LensError::file_access(path, e))?;
        debug!("Saved settings to {}", path.display());
        Ok(())
    }

    pub fn clear_at(path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                Err(LensError::file_access(path, e))
            }
            _ => Ok(()),
        }
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, fill unset values from the last run, resolve
    /// `"auto"` values, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Same as [`Settings::load_with_last_used`] with explicit arguments and
    /// config path.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                warn!("Could not clear saved settings: {}", e);
            }
            return Self::resolve_auto_values(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins; app, downloads, browser and start_date are per-run.
        if !is_arg_explicitly_set(&matches, "view") {
            if let Some(v) = last.view {
                settings.view = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "data_dir") && settings.data_dir.is_none() {
            settings.data_dir = last.data_dir;
        }
        if !is_arg_explicitly_set(&matches, "health_export") && settings.health_export.is_none() {
            settings.health_export = last.health_export;
        }
        if !is_arg_explicitly_set(&matches, "categories") && settings.categories.is_none() {
            settings.categories = last.categories;
        }
        if !is_arg_explicitly_set(&matches, "timezone") {
            if let Some(v) = last.timezone {
                settings.timezone = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "rolling_window") {
            if let Some(v) = last.rolling_window {
                settings.rolling_window = v.max(1);
            }
        }
        if !is_arg_explicitly_set(&matches, "format") {
            if let Some(v) = last.format {
                settings.format = v;
            }
        }

        settings = Self::resolve_auto_values(settings);

        if let Err(e) = LastUsedParams::from(&settings).save_to(config_path) {
            warn!("Could not save settings: {}", e);
        }

        settings
    }

    /// Resolve `"auto"` sentinel values and apply the `--debug` flag.
    fn resolve_auto_values(mut settings: Settings) -> Settings {
        if settings.timezone == "auto" {
            settings.timezone = crate::time_utils::get_system_timezone();
        }
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            view: Some(s.view.clone()),
            data_dir: s.data_dir.clone(),
            health_export: s.health_export.clone(),
            categories: s.categories.clone(),
            timezone: Some(s.timezone.clone()),
            rolling_window: Some(s.rolling_window),
            format: Some(s.format.clone()),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(tmp: &TempDir) -> PathBuf {
        LastUsedParams::config_path_in(tmp.path())
    }

    fn args(list: &[&str]) -> Vec<std::ffi::OsString> {
        list.iter().map(|s| s.into()).collect()
    }

    // ── LastUsedParams ────────────────────────────────────────────────────────

    #[test]
    fn test_last_used_params_save_load() {
        let tmp = TempDir::new().expect("tempdir");
        let path = config_in(&tmp);
        let params = LastUsedParams {
            view: Some("sleep".to_string()),
            data_dir: Some(PathBuf::from("/data/screentime")),
            timezone: Some("Europe/Berlin".to_string()),
            rolling_window: Some(14),
            format: Some("csv".to_string()),
            ..Default::default()
        };
        params.save_to(&path).expect("save");

        let loaded = LastUsedParams::load_from(&path);
        assert_eq!(loaded.view, Some("sleep".to_string()));
        assert_eq!(loaded.data_dir, Some(PathBuf::from("/data/screentime")));
        assert_eq!(loaded.timezone, Some("Europe/Berlin".to_string()));
        assert_eq!(loaded.rolling_window, Some(14));
        assert_eq!(loaded.format, Some("csv".to_string()));
        assert!(loaded.categories.is_none());
    }

    #[test]
    fn test_last_used_params_default_when_missing() {
        let tmp = TempDir::new().expect("tempdir");
        let loaded = LastUsedParams::load_from(&config_in(&tmp));
        assert!(loaded.view.is_none());
        assert!(loaded.timezone.is_none());
        assert!(loaded.rolling_window.is_none());
    }

    #[test]
    fn test_last_used_params_default_when_corrupt() {
        let tmp = TempDir::new().expect("tempdir");
        let path = config_in(&tmp);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();
        assert!(LastUsedParams::load_from(&path).view.is_none());
    }

    #[test]
    fn test_last_used_params_clear() {
        let tmp = TempDir::new().expect("tempdir");
        let path = config_in(&tmp);
        LastUsedParams::default().save_to(&path).expect("save");
        assert!(path.exists());
        LastUsedParams::clear_at(&path).expect("clear");
        assert!(!path.exists());
    }

    // ── CLI parsing ───────────────────────────────────────────────────────────

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["habit-lens"]);

        assert_eq!(settings.view, "usage");
        assert_eq!(settings.timezone, "UTC");
        assert_eq!(settings.rolling_window, 7);
        assert_eq!(settings.top, 10);
        assert_eq!(settings.format, "text");
        assert_eq!(settings.log_level, "INFO");
        assert!(!settings.asleep_only);
        assert!(settings.start_date.is_none());
        assert!(!settings.debug);
        assert!(!settings.clear);
    }

    #[test]
    fn test_settings_cli_start_date() {
        let settings = Settings::parse_from(["habit-lens", "--start-date", "2024-11-01"]);
        assert_eq!(settings.start_date, NaiveDate::from_ymd_opt(2024, 11, 1));
    }

    #[test]
    fn test_settings_cli_rejects_bad_start_date() {
        let result = Settings::try_parse_from(["habit-lens", "--start-date", "Nov 1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_cli_rejects_zero_window() {
        let result = Settings::try_parse_from(["habit-lens", "--rolling-window", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_cli_rejects_unknown_view() {
        let result = Settings::try_parse_from(["habit-lens", "--view", "dashboard"]);
        assert!(result.is_err());
    }

    // ── load_with_last_used ───────────────────────────────────────────────────

    #[test]
    fn test_load_with_last_used_merges_persisted_view() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = config_in(&tmp);
        LastUsedParams {
            view: Some("sleep".to_string()),
            rolling_window: Some(3),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(args(&["habit-lens"]), &config_path);
        assert_eq!(settings.view, "sleep");
        assert_eq!(settings.rolling_window, 3);
    }

    #[test]
    fn test_load_with_last_used_cli_overrides_persisted() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = config_in(&tmp);
        LastUsedParams {
            view: Some("sleep".to_string()),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(
            args(&["habit-lens", "--view", "health"]),
            &config_path,
        );
        assert_eq!(settings.view, "health");
    }

    #[test]
    fn test_load_with_last_used_clear_removes_file() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = config_in(&tmp);
        LastUsedParams::default()
            .save_to(&config_path)
            .expect("save");

        Settings::load_with_last_used_impl(args(&["habit-lens", "--clear"]), &config_path);
        assert!(!config_path.exists());
    }

    #[test]
    fn test_load_with_last_used_debug_overrides_log_level() {
        let tmp = TempDir::new().expect("tempdir");
        let settings = Settings::load_with_last_used_impl(
            args(&["habit-lens", "--debug"]),
            &config_in(&tmp),
        );
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_load_with_last_used_resolves_auto_timezone() {
        let tmp = TempDir::new().expect("tempdir");
        let settings = Settings::load_with_last_used_impl(
            args(&["habit-lens", "--timezone", "auto"]),
            &config_in(&tmp),
        );
        assert_ne!(settings.timezone, "auto");
    }

    #[test]
    fn test_load_with_last_used_does_not_persist_app_pattern() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = config_in(&tmp);
        Settings::load_with_last_used_impl(
            args(&["habit-lens", "--view", "impact", "--app", "reddit"]),
            &config_path,
        );

        let loaded = LastUsedParams::load_from(&config_path);
        assert_eq!(loaded.view, Some("impact".to_string()));
        let raw = std::fs::read_to_string(&config_path).unwrap();
        assert!(!raw.contains("reddit"));
    }
}
