//! The processing-module seam.
//!
//! A [`Module`] is the owner of a set of connectors. It declares them once via
//! [`connectors()`](Module::connectors) and implements the bound methods by port
//! index. The graph owns the module as `Box<dyn Module + Send>` and is the only
//! caller of these methods, so a module never re-enters the runtime while one of
//! its methods runs.
//!
//! Methods that a module does not bind keep their default implementation, which
//! fails with [`UnboundPort`].

use std::fmt;

use thiserror::Error;

use crate::connector::ConnectorSpec;
use crate::edge::ContributionId;
use crate::value::Value;

/// Error type returned by module methods.
pub type ModuleError = Box<dyn std::error::Error + Send + Sync>;

/// Handle to a module inside a graph.
///
/// Module IDs are assigned sequentially and never reused within a graph instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub(crate) u32);

impl ModuleId {
    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModuleId({})", self.0)
    }
}

/// A port has no method bound for the requested operation.
#[derive(Debug, Error)]
#[error("port {port} has no {operation} method")]
pub struct UnboundPort {
    /// Port index.
    pub port: usize,
    /// Operation that was requested.
    pub operation: &'static str,
}

impl UnboundPort {
    fn boxed(port: usize, operation: &'static str) -> ModuleError {
        Box::new(Self { port, operation })
    }
}

/// A processing object exposing connectors.
///
/// # Example
///
/// ```rust
/// use rivulet_core::{ConnectorSpec, Module, ModuleError, Value, ValueType};
///
/// struct Holder(f64);
///
/// impl Module for Holder {
///     fn type_name(&self) -> &'static str {
///         "holder"
///     }
///
///     fn connectors(&self) -> Vec<ConnectorSpec> {
///         vec![
///             ConnectorSpec::input("SetValue", ValueType::of::<f64>(), &["GetValue"]),
///             ConnectorSpec::output("GetValue", ValueType::of::<f64>()),
///         ]
///     }
///
///     fn set_input(&mut self, _port: usize, value: Value) -> Result<(), ModuleError> {
///         self.0 = value.cloned::<f64>().unwrap_or_default();
///         Ok(())
///     }
///
///     fn get_output(&mut self, _port: usize) -> Result<Value, ModuleError> {
///         Ok(Value::new(self.0))
///     }
/// }
/// ```
pub trait Module {
    /// Short name of the module type, used in diagnostics.
    fn type_name(&self) -> &'static str;

    /// Declares the module's connectors. Called once, when the module is added.
    fn connectors(&self) -> Vec<ConnectorSpec>;

    /// Setter bound to an Input port.
    fn set_input(&mut self, port: usize, _value: Value) -> Result<(), ModuleError> {
        Err(UnboundPort::boxed(port, "setter"))
    }

    /// Method bound to a Trigger port.
    fn trigger(&mut self, port: usize) -> Result<(), ModuleError> {
        Err(UnboundPort::boxed(port, "trigger"))
    }

    /// Getter bound to an Output port.
    fn get_output(&mut self, port: usize) -> Result<Value, ModuleError> {
        Err(UnboundPort::boxed(port, "getter"))
    }

    /// Adder bound to a MultiInput port.
    fn add_contribution(
        &mut self,
        port: usize,
        _id: ContributionId,
        _value: Value,
    ) -> Result<(), ModuleError> {
        Err(UnboundPort::boxed(port, "adder"))
    }

    /// Replaces the value of an existing contribution, keeping its position.
    fn replace_contribution(
        &mut self,
        port: usize,
        _id: ContributionId,
        _value: Value,
    ) -> Result<(), ModuleError> {
        Err(UnboundPort::boxed(port, "replacer"))
    }

    /// Remover bound to a MultiInput port.
    fn remove_contribution(&mut self, port: usize, _id: ContributionId) -> Result<(), ModuleError> {
        Err(UnboundPort::boxed(port, "remover"))
    }
}
