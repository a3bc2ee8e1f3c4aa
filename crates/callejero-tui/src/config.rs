//! TOML configuration for callejero-tui.
//!
//! Defaults < config file (`<config dir>/callejero/config.toml`) <
//! `CALLEJERO_*` env vars < CLI flags (applied in main).

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

/// Runtime configuration for the TUI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Base URL of the callejero API (the `/api` prefix is appended when
    /// absent).
    pub api_url: String,
    /// Optional per-request timeout in seconds. Absent = requests resolve
    /// or fail per the underlying transport only.
    pub timeout_secs: Option<u64>,
    /// Log file path. Logs never go to stdout/stderr.
    pub log_file: PathBuf,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8000".into(),
            timeout_secs: None,
            log_file: PathBuf::from("/tmp/callejero-tui.log"),
        }
    }
}

/// Platform config file path: `<config dir>/callejero/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "callejero").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load configuration from the platform config file and environment.
pub fn load_config() -> Result<TuiConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(TuiConfig::default()));
    if let Some(path) = config_path() {
        figment = figment.merge(Toml::file(path));
    }
    Ok(figment.merge(Env::prefixed("CALLEJERO_")).extract()?)
}

/// Load configuration from an explicit file path (no env merge).
pub fn load_config_from(path: &Path) -> Result<TuiConfig, ConfigError> {
    Ok(Figment::from(Serialized::defaults(TuiConfig::default()))
        .merge(Toml::file(path))
        .extract()?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_complete() {
        let config = TuiConfig::default();
        assert_eq!(config.api_url, "http://127.0.0.1:8000");
        assert!(config.timeout_secs.is_none());
    }

    #[test]
    fn file_overrides_defaults_partially() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "api_url = \"http://callejero.example:9000\"").unwrap();
        writeln!(file, "timeout_secs = 10").unwrap();

        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.api_url, "http://callejero.example:9000");
        assert_eq!(config.timeout_secs, Some(10));
        // Untouched key keeps its default.
        assert_eq!(config.log_file, PathBuf::from("/tmp/callejero-tui.log"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = load_config_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.api_url, TuiConfig::default().api_url);
    }
}
