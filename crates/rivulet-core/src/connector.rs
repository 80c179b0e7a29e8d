//! Connector roles and declarations.
//!
//! A connector is a typed attachment point bound to one port of a module. The
//! role set is closed: [`Role::Input`], [`Role::Trigger`], [`Role::Output`] and
//! [`Role::MultiInput`]. Modules declare their connectors with
//! [`ConnectorSpec`] when they are added to a graph; the position of a spec in
//! the declaration list is the port index the runtime passes back to the
//! module's bound methods.

use std::fmt;

use crate::value::ValueType;

/// Handle to a connector inside a graph.
///
/// Connector IDs are assigned sequentially and never reused within a graph
/// instance, so a handle to a destroyed connector stays recognisable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectorId(pub(crate) u32);

impl ConnectorId {
    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ConnectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConnectorId({})", self.0)
    }
}

/// The role of a connector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// Receives a single value; at most one upstream connection.
    Input,
    /// Receives a "recompute now" signal without a value.
    Trigger,
    /// Produces a cached, lazily recomputed value.
    Output,
    /// Receives an ordered collection of contributions.
    MultiInput,
}

impl Role {
    /// Human-readable name.
    pub const fn name(&self) -> &'static str {
        match self {
            Role::Input => "input",
            Role::Trigger => "trigger",
            Role::Output => "output",
            Role::MultiInput => "multi-input",
        }
    }

    /// Returns true for roles that can be the target of a connection.
    pub const fn receives(&self) -> bool {
        !matches!(self, Role::Output)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declaration of one connector of a module.
///
/// # Example
///
/// ```rust
/// use rivulet_core::{ConnectorSpec, Role, ValueType};
///
/// let specs = vec![
///     ConnectorSpec::input("SetValue", ValueType::of::<f64>(), &["GetValue"]),
///     ConnectorSpec::trigger("Recalculate", &["GetValue"]),
///     ConnectorSpec::output("GetValue", ValueType::of::<f64>()),
/// ];
/// assert_eq!(specs[1].role, Role::Trigger);
/// assert_eq!(specs[0].dependents, vec!["GetValue"]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectorSpec {
    /// Connector name, unique within its module.
    pub name: &'static str,
    /// Role of the connector.
    pub role: Role,
    /// Declared value type.
    pub value_type: ValueType,
    /// Names of outputs on the same module invalidated when this connector fires.
    pub dependents: Vec<&'static str>,
    /// Whether an output keeps its last value between reads.
    pub caching: bool,
}

impl ConnectorSpec {
    /// Declares an input.
    pub fn input(name: &'static str, value_type: ValueType, dependents: &[&'static str]) -> Self {
        Self::new(name, Role::Input, value_type, dependents)
    }

    /// Declares a trigger.
    pub fn trigger(name: &'static str, dependents: &[&'static str]) -> Self {
        Self::new(name, Role::Trigger, ValueType::Any, dependents)
    }

    /// Declares a caching output.
    pub fn output(name: &'static str, value_type: ValueType) -> Self {
        Self::new(name, Role::Output, value_type, &[])
    }

    /// Declares a multi-input.
    pub fn multi_input(
        name: &'static str,
        value_type: ValueType,
        dependents: &[&'static str],
    ) -> Self {
        Self::new(name, Role::MultiInput, value_type, dependents)
    }

    /// Disables caching: every read of this output calls the getter.
    pub fn non_caching(mut self) -> Self {
        self.caching = false;
        self
    }

    fn new(
        name: &'static str,
        role: Role,
        value_type: ValueType,
        dependents: &[&'static str],
    ) -> Self {
        Self {
            name,
            role,
            value_type,
            dependents: dependents.to_vec(),
            caching: true,
        }
    }
}
