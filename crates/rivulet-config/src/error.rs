//! Error types for configuration and patch operations.

use std::path::PathBuf;

use rivulet_core::ConnectorError;
use thiserror::Error;

/// Errors that can occur while loading configuration or building a patch.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Unknown module type
    #[error("unknown module type: {0}")]
    UnknownModuleType(String),

    /// Two modules in a patch share an ID
    #[error("module id '{0}' declared twice")]
    DuplicateModule(String),

    /// A connector reference names a module the patch does not declare
    #[error("'{reference}' refers to undeclared module '{module}'")]
    UnknownModule {
        /// Full reference as written.
        reference: String,
        /// Module part of the reference.
        module: String,
    },

    /// A connector reference is not of the form `module.Connector`
    #[error("invalid connector reference '{0}', expected 'module.Connector'")]
    InvalidReference(String),

    /// A literal cannot be turned into a payload
    #[error("invalid value for '{target}': {reason}")]
    InvalidValue {
        /// Connector the value was meant for.
        target: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A runtime operation failed while building or driving a patch
    #[error("{context}: {source}")]
    Graph {
        /// What was being done.
        context: String,
        /// Underlying connector error.
        #[source]
        source: ConnectorError,
    },
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }

    /// Wrap a connector error with context.
    pub fn graph(context: impl Into<String>, source: ConnectorError) -> Self {
        ConfigError::Graph {
            context: context.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn mock_io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "mock")
    }

    #[test]
    fn read_file_display() {
        let err = ConfigError::read_file("/a/b.toml", mock_io_err());
        let msg = err.to_string();
        assert!(msg.contains("failed to read file"), "got: {msg}");
        assert!(msg.contains("/a/b.toml"), "got: {msg}");
        assert!(err.source().is_some());
    }

    #[test]
    fn create_dir_factory_produces_correct_variant() {
        let err = ConfigError::create_dir("/dir/path", mock_io_err());
        assert!(
            matches!(err, ConfigError::CreateDir { ref path, .. } if path == std::path::Path::new("/dir/path"))
        );
    }

    #[test]
    fn unknown_module_display() {
        let err = ConfigError::UnknownModule {
            reference: "src.GetValue".to_string(),
            module: "src".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "'src.GetValue' refers to undeclared module 'src'"
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn graph_error_keeps_source() {
        let err = ConfigError::graph("connect a.GetValue -> b.SetValue", ConnectorError::Disabled);
        assert!(err.to_string().starts_with("connect a.GetValue -> b.SetValue: "));
        assert!(err.source().is_some());
    }
}
