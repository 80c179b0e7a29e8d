//! Error types for connector operations.

use thiserror::Error;

use crate::connector::{ConnectorId, Role};
use crate::edge::{ContributionId, EdgeId};
use crate::module::{ModuleError, ModuleId};

/// Errors that can occur while shaping or firing a connection graph.
///
/// Graph-shape errors (`IncompatibleTypes`, `DuplicateConnection`, ...) are
/// raised by `connect` before any edge exists. `Module` wraps a failure inside a
/// bound method; deliveries made earlier in the same pass are not undone.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// A value of the wrong type was handed to a connector.
    #[error("{connector} expects {expected}, got {found}")]
    TypeMismatch {
        /// Receiving connector.
        connector: ConnectorId,
        /// Declared type name.
        expected: &'static str,
        /// Type name of the offending value.
        found: &'static str,
    },

    /// The output's declared type cannot satisfy the input's declared type.
    #[error("{output} provides {provided}, {input} requires {required}")]
    IncompatibleTypes {
        /// Source output.
        output: ConnectorId,
        /// Target connector.
        input: ConnectorId,
        /// Declared type of the output.
        provided: &'static str,
        /// Declared type of the target.
        required: &'static str,
    },

    /// The identical connection already exists.
    #[error("connection {output} -> {input} already exists")]
    DuplicateConnection {
        /// Source output.
        output: ConnectorId,
        /// Target connector.
        input: ConnectorId,
    },

    /// No connection exists between the two connectors.
    #[error("{output} is not connected to {input}")]
    NotConnected {
        /// Source output.
        output: ConnectorId,
        /// Target connector.
        input: ConnectorId,
    },

    /// The connector's owning module has been destroyed.
    #[error("{0} belongs to a destroyed module")]
    UseAfterDestroy(ConnectorId),

    /// The connector has a different role than the operation needs.
    #[error("{connector} has role {found}, expected {expected}")]
    WrongRole {
        /// Offending connector.
        connector: ConnectorId,
        /// What the operation needed.
        expected: &'static str,
        /// Actual role.
        found: Role,
    },

    /// The handle does not name a connector of this graph.
    #[error("{0} not found")]
    ConnectorNotFound(ConnectorId),

    /// The module has no connector with that name.
    #[error("{module} has no connector named '{name}'")]
    UnknownConnector {
        /// Module searched.
        module: ModuleId,
        /// Requested name.
        name: String,
    },

    /// The handle does not name a live module of this graph.
    #[error("{0} not found")]
    ModuleNotFound(ModuleId),

    /// The handle does not name a live connection.
    #[error("{0} not found")]
    EdgeNotFound(EdgeId),

    /// A connector declares a dependent that is not an output of its module.
    #[error("'{connector}' declares unknown dependent output '{dependent}'")]
    UnknownDependent {
        /// Declaring connector.
        connector: &'static str,
        /// Name that failed to resolve.
        dependent: &'static str,
    },

    /// Two connectors of one module share a name.
    #[error("connector name '{0}' declared twice")]
    DuplicateConnectorName(&'static str),

    /// The multi-input holds no contribution with that ID.
    #[error("{connector} holds no {contribution}")]
    UnknownContribution {
        /// Multi-input searched.
        connector: ConnectorId,
        /// Requested contribution.
        contribution: ContributionId,
    },

    /// The runtime runs in pass-through mode and keeps no connection graph.
    #[error("connections are disabled in pass-through mode")]
    Disabled,

    /// A method bound to a connector failed.
    #[error("method bound to {connector} failed: {source}")]
    Module {
        /// Connector whose method failed.
        connector: ConnectorId,
        /// Error returned by the module.
        source: ModuleError,
    },
}

impl ConnectorError {
    pub(crate) fn wrong_role(connector: ConnectorId, expected: &'static str, found: Role) -> Self {
        ConnectorError::WrongRole {
            connector,
            expected,
            found,
        }
    }
}
