//! Patch files: declarative module graphs.
//!
//! A patch names module instances, the connections between their connectors,
//! initial input values, and the outputs to report after building.
//!
//! ```toml
//! name = "double"
//! reads = ["b.GetOutput"]
//!
//! [[modules]]
//! id = "a"
//! type = "value"
//! values = { SetValue = 5.0 }
//!
//! [[modules]]
//! id = "b"
//! type = "scale"
//! values = { SetFactor = 2.0 }
//!
//! [[connections]]
//! from = "a.GetValue"
//! to = "b.SetValue"
//! ```
//!
//! Connector references are written `module.Connector`, where `module` is an
//! `id` declared in `[[modules]]`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use rivulet_core::{ConnectorId, ModuleId, Runtime, RuntimeKind, Value};
use rivulet_modules::ModuleRegistry;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::values::{Reading, ReadingValue, parse_literal, value_from_toml};

/// One module instance in a patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleConfig {
    /// Instance name used in connector references.
    pub id: String,
    /// Registry type ID (`value`, `scale`, ...).
    #[serde(rename = "type")]
    pub module_type: String,
    /// Initial values keyed by input connector name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<String, toml::Value>,
}

impl ModuleConfig {
    /// Create a module entry with no initial values.
    pub fn new(id: impl Into<String>, module_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            module_type: module_type.into(),
            values: BTreeMap::new(),
        }
    }

    /// Add an initial value (builder pattern).
    pub fn with_value(mut self, connector: impl Into<String>, value: impl Into<toml::Value>) -> Self {
        self.values.insert(connector.into(), value.into());
        self
    }
}

/// One connection: `from` is an output, `to` a receiving connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Source output reference.
    pub from: String,
    /// Target connector reference.
    pub to: String,
}

/// A declarative module graph.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Patch {
    /// Patch name.
    pub name: String,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Outputs to report, as connector references.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reads: Vec<String>,
    /// Module instances, created in order.
    pub modules: Vec<ModuleConfig>,
    /// Connections, made in order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub connections: Vec<ConnectionConfig>,
}

impl Patch {
    /// Create an empty patch with a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the description (builder pattern).
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a module (builder pattern).
    pub fn with_module(mut self, module: ModuleConfig) -> Self {
        self.modules.push(module);
        self
    }

    /// Add a connection (builder pattern).
    pub fn with_connection(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.connections.push(ConnectionConfig {
            from: from.into(),
            to: to.into(),
        });
        self
    }

    /// Add an output to report (builder pattern).
    pub fn with_read(mut self, reference: impl Into<String>) -> Self {
        self.reads.push(reference.into());
        self
    }

    /// Load a patch from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&contents)
    }

    /// Parse a patch from a TOML string.
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

    /// Instantiates the patch on `runtime`.
    ///
    /// Modules are added in order, then connections are made in order, then
    /// all initial values are applied as a single batch. A pass-through
    /// runtime has no connections, so they are skipped with a warning.
    pub fn build(
        &self,
        registry: &ModuleRegistry,
        runtime: &mut dyn Runtime,
    ) -> Result<BuiltPatch, ConfigError> {
        let mut built = BuiltPatch::default();

        for module in &self.modules {
            if built.module(&module.id).is_some() {
                return Err(ConfigError::DuplicateModule(module.id.clone()));
            }
            let instance = registry
                .create(&module.module_type)
                .ok_or_else(|| ConfigError::UnknownModuleType(module.module_type.clone()))?;
            let id = runtime
                .add_module(instance)
                .map_err(|e| ConfigError::graph(format!("add module '{}'", module.id), e))?;
            built.modules.push((module.id.clone(), id));
        }

        if runtime.kind() == RuntimeKind::PassThrough {
            if !self.connections.is_empty() {
                tracing::warn!(
                    patch = %self.name,
                    count = self.connections.len(),
                    "connectors disabled, skipping connections"
                );
            }
            built.skipped_connections = self.connections.len();
        } else {
            for connection in &self.connections {
                let from = built.resolve(&*runtime, &connection.from)?;
                let to = built.resolve(&*runtime, &connection.to)?;
                runtime.connect(from, to).map_err(|e| {
                    ConfigError::graph(
                        format!("connect {} -> {}", connection.from, connection.to),
                        e,
                    )
                })?;
            }
        }

        let mut batch = Vec::new();
        for module in &self.modules {
            for (name, raw) in &module.values {
                let target = format!("{}.{name}", module.id);
                let value = value_from_toml(raw).map_err(|reason| ConfigError::InvalidValue {
                    target: target.clone(),
                    reason,
                })?;
                batch.push((built.resolve(&*runtime, &target)?, value));
            }
        }
        if !batch.is_empty() {
            runtime
                .set_multiple_values(batch)
                .map_err(|e| ConfigError::graph("apply initial values", e))?;
        }

        for reference in &self.reads {
            let connector = built.resolve(&*runtime, reference)?;
            built.reads.push((reference.clone(), connector));
        }

        tracing::info!(
            patch = %self.name,
            modules = built.modules.len(),
            connections = self.connections.len() - built.skipped_connections,
            "patch built"
        );
        Ok(built)
    }
}

/// Splits `module.Connector` into its two parts.
pub fn split_reference(reference: &str) -> Result<(&str, &str), ConfigError> {
    match reference.split_once('.') {
        Some((module, connector)) if !module.is_empty() && !connector.is_empty() => {
            Ok((module, connector))
        }
        _ => Err(ConfigError::InvalidReference(reference.to_string())),
    }
}

/// Parses a `module.Connector=value` assignment.
pub fn parse_assignment(text: &str) -> Result<(&str, Value), ConfigError> {
    let (reference, literal) = text
        .split_once('=')
        .ok_or_else(|| ConfigError::InvalidReference(text.to_string()))?;
    let reference = reference.trim();
    split_reference(reference)?;
    Ok((reference, parse_literal(literal)))
}

/// Handles to a patch instantiated on a runtime.
#[derive(Debug, Clone, Default)]
pub struct BuiltPatch {
    modules: Vec<(String, ModuleId)>,
    reads: Vec<(String, ConnectorId)>,
    skipped_connections: usize,
}

impl BuiltPatch {
    /// Runtime handle of a module instance.
    pub fn module(&self, id: &str) -> Option<ModuleId> {
        self.modules
            .iter()
            .find(|(name, _)| name == id)
            .map(|(_, module)| *module)
    }

    /// Module instances in declaration order.
    pub fn modules(&self) -> impl Iterator<Item = (&str, ModuleId)> {
        self.modules.iter().map(|(name, id)| (name.as_str(), *id))
    }

    /// Connections not made because the runtime is pass-through.
    pub fn skipped_connections(&self) -> usize {
        self.skipped_connections
    }

    /// Resolves a `module.Connector` reference.
    pub fn resolve(&self, runtime: &dyn Runtime, reference: &str) -> Result<ConnectorId, ConfigError> {
        let (module, connector) = split_reference(reference)?;
        let id = self.module(module).ok_or_else(|| ConfigError::UnknownModule {
            reference: reference.to_string(),
            module: module.to_string(),
        })?;
        runtime
            .connector(id, connector)
            .map_err(|e| ConfigError::graph(format!("resolve {reference}"), e))
    }

    /// Sets an input by reference.
    pub fn set(
        &self,
        runtime: &mut dyn Runtime,
        reference: &str,
        value: Value,
    ) -> Result<(), ConfigError> {
        let input = self.resolve(&*runtime, reference)?;
        runtime
            .set(input, value)
            .map_err(|e| ConfigError::graph(format!("set {reference}"), e))
    }

    /// Applies a `module.Connector=value` assignment.
    pub fn assign(&self, runtime: &mut dyn Runtime, assignment: &str) -> Result<(), ConfigError> {
        let (reference, value) = parse_assignment(assignment)?;
        self.set(runtime, reference, value)
    }

    /// Reads an output by reference.
    pub fn read(&self, runtime: &mut dyn Runtime, reference: &str) -> Result<Reading, ConfigError> {
        let output = self.resolve(&*runtime, reference)?;
        let value = runtime
            .get(output)
            .map_err(|e| ConfigError::graph(format!("read {reference}"), e))?;
        Ok(Reading {
            target: reference.to_string(),
            value: ReadingValue::from(&value),
        })
    }

    /// Reads every output the patch lists under `reads`, in order.
    pub fn read_all(&self, runtime: &mut dyn Runtime) -> Result<Vec<Reading>, ConfigError> {
        self.reads
            .iter()
            .map(|(reference, output)| {
                let value = runtime
                    .get(*output)
                    .map_err(|e| ConfigError::graph(format!("read {reference}"), e))?;
                Ok(Reading {
                    target: reference.clone(),
                    value: ReadingValue::from(&value),
                })
            })
            .collect()
    }
}
