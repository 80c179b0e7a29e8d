//! Runtime configuration: which backend to build and how to log.
//!
//! ```toml
//! connectors = "pass-through"
//! log_filter = "rivulet_core=debug"
//! ```
//!
//! Setting [`DISABLE_ENV`] to a truthy value forces pass-through mode no
//! matter what the file says.

use std::fs;
use std::path::Path;

use rivulet_core::{Runtime, RuntimeKind, build_runtime};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::paths;

/// Environment variable that disables the connection graph.
pub const DISABLE_ENV: &str = "RIVULET_DISABLE_CONNECTORS";

const TRUTHY: [&str; 7] = ["1", "True", "true", "Yes", "yes", "Y", "y"];

/// Returns true if `value` is one of the accepted truthy spellings.
///
/// Matching is exact: surrounding whitespace or other capitalizations are not
/// truthy.
pub fn is_truthy(value: &str) -> bool {
    TRUTHY.contains(&value)
}

/// Which backend connectors run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectorMode {
    /// Reactive connection graph.
    #[default]
    Graph,
    /// Plain method calls, connections disabled.
    PassThrough,
}

impl ConnectorMode {
    /// Runtime backend for this mode.
    pub fn kind(self) -> RuntimeKind {
        match self {
            ConnectorMode::Graph => RuntimeKind::Graph,
            ConnectorMode::PassThrough => RuntimeKind::PassThrough,
        }
    }

    /// Name as written in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            ConnectorMode::Graph => "graph",
            ConnectorMode::PassThrough => "pass-through",
        }
    }
}

/// Process-wide runtime settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Backend to build.
    pub connectors: ConnectorMode,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl RuntimeConfig {
    /// Load a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&contents)
    }

    /// Parse a configuration from a TOML string.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save to a TOML file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }
        let contents = self.to_toml()?;
        fs::write(path, contents).map_err(|e| ConfigError::write_file(path, e))
    }

    /// Applies the value of [`DISABLE_ENV`], if any.
    ///
    /// A truthy value switches to pass-through; anything else leaves the mode
    /// unchanged.
    pub fn apply_env_value(&mut self, value: Option<&str>) {
        if value.is_some_and(is_truthy) {
            tracing::debug!(var = DISABLE_ENV, "connectors disabled by environment");
            self.connectors = ConnectorMode::PassThrough;
        }
    }

    /// Reads [`DISABLE_ENV`] from the process environment and applies it.
    pub fn apply_env_overrides(&mut self) {
        let value = std::env::var(DISABLE_ENV).ok();
        self.apply_env_value(value.as_deref());
    }

    /// Resolves the effective configuration.
    ///
    /// Loads `path` if given, otherwise the default config file if it exists,
    /// otherwise defaults; then applies environment overrides.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => {
                let default_path = paths::default_config_path();
                if default_path.is_file() {
                    Self::load(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env_overrides();
        tracing::debug!(mode = config.connectors.name(), "runtime configuration resolved");
        Ok(config)
    }

    /// Builds a runtime of the configured kind.
    pub fn build_runtime(&self) -> Box<dyn Runtime + Send> {
        build_runtime(self.connectors.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_spellings_are_exact() {
        for v in TRUTHY {
            assert!(is_truthy(v), "{v} should be truthy");
        }
        for v in ["0", "", "TRUE", "YES", "no", "false", " 1", "on"] {
            assert!(!is_truthy(v), "{v:?} should not be truthy");
        }
    }

    #[test]
    fn env_value_only_disables() {
        let mut config = RuntimeConfig::default();
        config.apply_env_value(Some("no"));
        assert_eq!(config.connectors, ConnectorMode::Graph);
        config.apply_env_value(None);
        assert_eq!(config.connectors, ConnectorMode::Graph);
        config.apply_env_value(Some("Y"));
        assert_eq!(config.connectors, ConnectorMode::PassThrough);

        let mut config = RuntimeConfig {
            connectors: ConnectorMode::PassThrough,
            log_filter: None,
        };
        config.apply_env_value(Some("0"));
        assert_eq!(config.connectors, ConnectorMode::PassThrough);
    }

    #[test]
    fn parse_modes() {
        let config = RuntimeConfig::from_toml("connectors = \"pass-through\"").unwrap();
        assert_eq!(config.connectors, ConnectorMode::PassThrough);
        assert_eq!(config.log_filter, None);

        let config = RuntimeConfig::from_toml("log_filter = \"debug\"").unwrap();
        assert_eq!(config.connectors, ConnectorMode::Graph);
        assert_eq!(config.log_filter.as_deref(), Some("debug"));

        assert!(RuntimeConfig::from_toml("connectors = \"off\"").is_err());
    }

    #[test]
    fn toml_roundtrip() {
        let config = RuntimeConfig {
            connectors: ConnectorMode::PassThrough,
            log_filter: Some("rivulet_core=trace".into()),
        };
        let parsed = RuntimeConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn builds_configured_backend() {
        let graph = RuntimeConfig::default().build_runtime();
        assert_eq!(graph.kind(), RuntimeKind::Graph);

        let mut config = RuntimeConfig::default();
        config.apply_env_value(Some("1"));
        assert_eq!(config.build_runtime().kind(), RuntimeKind::PassThrough);
    }
}
