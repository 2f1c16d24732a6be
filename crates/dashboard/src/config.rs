//! Dashboard configuration.
//!
//! [`DashboardConfig`] is read from a YAML file where every section is
//! optional, then overridden from the environment. Precedence, lowest first:
//! built-in defaults, config file, `SIMULATOR_*` environment variables,
//! command-line flags (applied by the binary).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sim_client::ClientConfig;
use sim_contract::{validate_params, SimulationParams, ValidationError};
use thiserror::Error;
use tracing::debug;

use crate::theme::ThemeMode;

/// Overrides `simulator.base_url`.
pub const BASE_URL_ENV: &str = "SIMULATOR_BASE_URL";
/// Overrides `simulator.timeout_ms`.
pub const TIMEOUT_ENV: &str = "SIMULATOR_TIMEOUT_MS";

/// What to do when a run is submitted while another is in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResubmitPolicy {
    /// Drop the new submission.
    #[default]
    Ignore,
    /// Issue a new request; the older response is discarded when it lands.
    Supersede,
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("environment variable {var} has invalid value {value:?}")]
    Env { var: &'static str, value: String },

    #[error("invalid simulator base URL {0:?}: expected http:// or https://")]
    BaseUrl(String),

    #[error("simulator timeout must be > 0 ms")]
    ZeroTimeout,

    #[error("invalid default parameters: {0}")]
    Defaults(#[from] ValidationError),
}

/// Top-level dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Simulator connection.
    pub simulator: ClientConfig,

    /// Color theme.
    pub theme: ThemeMode,

    /// Behavior on submission while running.
    pub resubmit: ResubmitPolicy,

    /// Clear the active day when the pointer leaves every chart.
    pub clear_on_pointer_leave: bool,

    /// Parameters the form starts with. Must be complete when given.
    pub defaults: SimulationParams,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            simulator: ClientConfig::default(),
            theme: ThemeMode::default(),
            resubmit: ResubmitPolicy::default(),
            clear_on_pointer_leave: false,
            defaults: SimulationParams::default(),
        }
    }
}

impl DashboardConfig {
    /// Parse a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let text = serde_yaml::to_string(self)?;
        std::fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply overrides from a variable lookup.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(BASE_URL_ENV) {
            debug!(%url, "simulator base URL from environment");
            self.simulator.base_url = url;
        }
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            self.simulator.timeout_ms = raw.trim().parse().map_err(|_| ConfigError::Env {
                var: TIMEOUT_ENV,
                value: raw.clone(),
            })?;
        }
        Ok(())
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|k| std::env::var(k).ok())
    }

    /// Check settings that would otherwise fail only at request time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.simulator.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::BaseUrl(self.simulator.base_url.clone()));
        }
        if self.simulator.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        validate_params(&self.defaults)?;
        Ok(())
    }

    /// Defaults, then `path` if given, then the environment; validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut cfg = match path {
            Some(p) => Self::load_from(p)?,
            None => Self::default(),
        };
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let cfg = DashboardConfig::default();
        assert_eq!(cfg.simulator.base_url, "http://127.0.0.1:8000");
        assert_eq!(cfg.resubmit, ResubmitPolicy::Ignore);
        assert!(!cfg.clear_on_pointer_leave);
        cfg.validate().unwrap();
    }

    #[test]
    fn test_partial_config_parsing() {
        let yaml = r#"
simulator:
  base_url: "https://sim.internal:9000"
theme: dark
resubmit: supersede
"#;
        let cfg = DashboardConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(cfg.simulator.base_url, "https://sim.internal:9000");
        assert_eq!(cfg.simulator.timeout_ms, 10_000);
        assert_eq!(cfg.theme, ThemeMode::Dark);
        assert_eq!(cfg.resubmit, ResubmitPolicy::Supersede);
        assert_eq!(cfg.defaults, SimulationParams::default());
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(
            DashboardConfig::from_yaml_str("  \n").unwrap(),
            DashboardConfig::default()
        );
    }

    #[test]
    fn test_save_and_load() {
        let file = NamedTempFile::new().unwrap();
        let mut cfg = DashboardConfig::default();
        cfg.defaults.initial_price = 60.0;
        cfg.clear_on_pointer_leave = true;
        cfg.save_to(file.path()).unwrap();
        let loaded = DashboardConfig::load_from(file.path()).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = DashboardConfig::load_from(Path::new("/nonexistent/dash.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (BASE_URL_ENV, "http://10.0.0.5:8000"),
            (TIMEOUT_ENV, "2500"),
        ]
        .into_iter()
        .collect();
        let mut cfg = DashboardConfig::default();
        cfg.apply_env_with(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(cfg.simulator.base_url, "http://10.0.0.5:8000");
        assert_eq!(cfg.simulator.timeout_ms, 2500);
    }

    #[test]
    fn test_bad_env_timeout() {
        let mut cfg = DashboardConfig::default();
        let err = cfg
            .apply_env_with(|k| (k == TIMEOUT_ENV).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: TIMEOUT_ENV, .. }));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut cfg = DashboardConfig::default();
        cfg.simulator.base_url = "127.0.0.1:8000".into();
        assert!(matches!(cfg.validate(), Err(ConfigError::BaseUrl(_))));

        let mut cfg = DashboardConfig::default();
        cfg.simulator.timeout_ms = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::ZeroTimeout)));

        let mut cfg = DashboardConfig::default();
        cfg.defaults.initial_price = -1.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Defaults(_))));
    }
}
