use anyhow::{Context, Result};
use biaslens_core::analysis::DEFAULT_TREND_WINDOW_DAYS;
use biaslens_core::report::{DEFAULT_TOP_GROUPS, ReportBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// User settings read from `config.json`.
///
/// Command line flags and environment variables take precedence over these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub store_path: Option<PathBuf>,
    pub trend_window_days: usize,
    pub top_groups: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_path: None,
            trend_window_days: DEFAULT_TREND_WINDOW_DAYS,
            top_groups: DEFAULT_TOP_GROUPS,
        }
    }
}

impl Settings {
    /// `<config dir>/biaslens/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("biaslens").join("config.json"))
    }

    /// Load settings from an explicit file, or from the default location.
    ///
    /// An explicit file must exist; a missing default file yields defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => {
                    tracing::debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        tracing::debug!("Loading settings from: {}", path.display());
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        Ok(settings)
    }

    /// Store path precedence: flag/env, then config file, then the data dir
    pub fn resolve_store(&self, cli_store: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = cli_store.or_else(|| self.store_path.clone()) {
            return Ok(path);
        }

        dirs::data_dir()
            .map(|dir| dir.join("biaslens").join("records.json"))
            .context("No record store given; pass --store or set BIASLENS_STORE")
    }

    pub fn report_builder(&self) -> ReportBuilder {
        ReportBuilder::new(self.trend_window_days, self.top_groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"topGroups": 8}"#).unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.top_groups, 8);
        assert_eq!(settings.trend_window_days, DEFAULT_TREND_WINDOW_DAYS);
        assert!(settings.store_path.is_none());
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Settings::load(Some(&dir.path().join("nope.json"))).is_err());
    }

    #[test]
    fn test_cli_store_wins() {
        let settings = Settings {
            store_path: Some(PathBuf::from("from-config.json")),
            ..Settings::default()
        };

        assert_eq!(
            settings.resolve_store(Some(PathBuf::from("from-cli.json"))).unwrap(),
            PathBuf::from("from-cli.json")
        );
        assert_eq!(
            settings.resolve_store(None).unwrap(),
            PathBuf::from("from-config.json")
        );
    }
}
