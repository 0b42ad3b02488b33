// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use strum::{EnumIter, IntoEnumIterator};

fn default_tick_interval() -> u64 {
    1000
}

fn default_urgent_days() -> i64 {
    7
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }

    /// Comma-separated list of accepted spellings, for help output.
    pub fn accepted() -> String {
        LogLevel::iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Off => write!(f, "off"),
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

/// A named tabular classification source (e.g. CSRankings, CORE).
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct TaxonomySource {
    pub name: String,
    pub source: String,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Config {
    /// Path or URL of the conference list. Defaults to `conferences.yaml` in the data dir.
    #[serde(default)]
    pub conferences_source: Option<String>,
    /// Defaults to a single `conferences.csv` in the data dir.
    #[serde(default)]
    pub taxonomies: Vec<TaxonomySource>,
    #[serde(default)]
    pub default_taxonomy: Option<String>,
    #[serde(default)]
    pub hide_next_tier: bool,
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// Countdowns with fewer days left than this are drawn in red.
    #[serde(default = "default_urgent_days")]
    pub urgent_days: i64,
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            conferences_source: None,
            taxonomies: Vec::new(),
            default_taxonomy: None,
            hide_next_tier: false,
            // Match the serde defaults
            tick_interval_ms: 1000,
            urgent_days: 7,
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        // Explicitly detect missing file so callers can fall back to defaults.
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Loads the config, writing defaults to disk on first run.
    /// Syntax and permission errors are returned, not papered over.
    pub fn load_or_init(ctx: &dyn AppContext) -> Result<Self> {
        match Self::load(ctx) {
            Ok(cfg) => Ok(cfg),
            Err(e) if Self::is_missing_config_error(&e) => {
                let cfg = Config::default();
                // Runs before any logger exists, so first-run notices go to stderr.
                if let Err(e) = cfg.save(ctx) {
                    eprintln!("Could not write default config: {}", e);
                } else {
                    eprintln!("Wrote default config to {}", Self::get_path_string(ctx)?);
                }
                Ok(cfg)
            }
            Err(e) => Err(e),
        }
    }

    /// Helper to detect whether an anyhow::Error indicates that the config file was missing.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }

        for cause in err.chain() {
            if let Some(io_err) = cause.downcast_ref::<std::io::Error>()
                && io_err.kind() == std::io::ErrorKind::NotFound
            {
                return true;
            }
        }

        false
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        let toml_str = toml::to_string_pretty(self)?;
        atomic_write(&path, toml_str)
    }

    /// Get the path string using an explicit context.
    pub fn get_path_string(ctx: &dyn AppContext) -> Result<String> {
        let path = ctx.get_config_file_path()?;
        Ok(path.to_string_lossy().to_string())
    }
}

/// Write to a sibling temp file, then rename over the target.
fn atomic_write(path: &Path, contents: String) -> Result<()> {
    let tmp = path.with_extension("toml.tmp");
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TestContext;

    #[test]
    fn test_missing_file_is_detected() {
        let ctx = TestContext::new();
        let err = Config::load(&ctx).unwrap_err();
        assert!(Config::is_missing_config_error(&err));
    }

    #[test]
    fn test_load_or_init_writes_defaults() {
        let ctx = TestContext::new();
        let cfg = Config::load_or_init(&ctx).unwrap();
        assert_eq!(cfg.tick_interval_ms, 1000);
        assert!(ctx.get_config_file_path().unwrap().exists());
        assert!(Config::load(&ctx).is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let ctx = TestContext::new();
        let path = ctx.get_config_file_path().unwrap();
        fs::write(
            &path,
            "log_level = \"debug\"\n\n[[taxonomies]]\nname = \"CORE\"\nsource = \"https://example.org/core.csv\"\n",
        )
        .unwrap();
        let cfg = Config::load(&ctx).unwrap();
        assert_eq!(cfg.log_level, LogLevel::Debug);
        assert_eq!(cfg.taxonomies.len(), 1);
        assert_eq!(cfg.taxonomies[0].name, "CORE");
        assert!(!cfg.hide_next_tier);
        assert_eq!(cfg.tick_interval_ms, 1000);
        assert_eq!(cfg.urgent_days, 7);
    }

    #[test]
    fn test_syntax_error_is_not_missing() {
        let ctx = TestContext::new();
        fs::write(ctx.get_config_file_path().unwrap(), "log_level = ").unwrap();
        let err = Config::load_or_init(&ctx).unwrap_err();
        assert!(!Config::is_missing_config_error(&err));
    }

    #[test]
    fn test_accepted_levels_listed() {
        assert_eq!(
            LogLevel::accepted(),
            "off, error, warn, info, debug, trace"
        );
    }
}
