//! Backend-agnostic runtime interface.
//!
//! [`Runtime`] is implemented by [`ConnectionGraph`] (the reactive graph) and
//! [`PassThrough`] (plain method calls, no graph, no caching). Embedders pick
//! one at startup and talk to it through `Box<dyn Runtime + Send>`; code that
//! only sets, triggers and reads works unchanged under either backend.

use crate::connector::ConnectorId;
use crate::edge::{ContributionId, EdgeId};
use crate::error::ConnectorError;
use crate::graph::ConnectionGraph;
use crate::module::{Module, ModuleId};
use crate::passthrough::PassThrough;
use crate::progress::ProgressObserver;
use crate::value::Value;

/// Which backend a runtime is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RuntimeKind {
    /// Reactive connection graph.
    Graph,
    /// Direct method calls without propagation.
    PassThrough,
}

/// Operations shared by both backends.
pub trait Runtime {
    /// Which backend this is.
    fn kind(&self) -> RuntimeKind;

    /// Adds a module and creates its connectors.
    fn add_module(&mut self, module: Box<dyn Module + Send>) -> Result<ModuleId, ConnectorError>;

    /// Looks up a connector of a module by name.
    fn connector(&self, module: ModuleId, name: &str) -> Result<ConnectorId, ConnectorError>;

    /// Calls an Input.
    fn set(&mut self, input: ConnectorId, value: Value) -> Result<(), ConnectorError>;

    /// Calls a Trigger.
    fn trigger(&mut self, trigger: ConnectorId) -> Result<(), ConnectorError>;

    /// Reads an Output.
    fn get(&mut self, output: ConnectorId) -> Result<Value, ConnectorError>;

    /// Adds a contribution to a MultiInput.
    fn add_contribution(
        &mut self,
        multi: ConnectorId,
        value: Value,
    ) -> Result<ContributionId, ConnectorError>;

    /// Removes a contribution from a MultiInput.
    fn remove_contribution(
        &mut self,
        multi: ConnectorId,
        id: ContributionId,
    ) -> Result<(), ConnectorError>;

    /// Connects an output to a receiving connector.
    fn connect(&mut self, output: ConnectorId, input: ConnectorId)
    -> Result<EdgeId, ConnectorError>;

    /// Removes one connection.
    fn disconnect(&mut self, output: ConnectorId, input: ConnectorId)
    -> Result<(), ConnectorError>;

    /// Removes every connection touching a connector.
    fn disconnect_all(&mut self, connector: ConnectorId) -> Result<(), ConnectorError>;

    /// Suspends an output.
    fn deactivate_output(&mut self, output: ConnectorId) -> Result<(), ConnectorError>;

    /// Reactivates an output.
    fn activate_output(&mut self, output: ConnectorId) -> Result<(), ConnectorError>;

    /// Retires a module and hands it back.
    fn destroy_connectors(
        &mut self,
        owner: ModuleId,
    ) -> Result<Box<dyn Module + Send>, ConnectorError>;

    /// Applies several Input sets as one batch.
    fn set_multiple_values(
        &mut self,
        values: Vec<(ConnectorId, Value)>,
    ) -> Result<(), ConnectorError>;

    /// Installs a progress observer. Backends without passes ignore it.
    fn set_observer(&mut self, observer: Option<Box<dyn ProgressObserver + Send>>);
}

impl Runtime for ConnectionGraph {
    fn kind(&self) -> RuntimeKind {
        RuntimeKind::Graph
    }

    fn add_module(&mut self, module: Box<dyn Module + Send>) -> Result<ModuleId, ConnectorError> {
        ConnectionGraph::add_module(self, module)
    }

    fn connector(&self, module: ModuleId, name: &str) -> Result<ConnectorId, ConnectorError> {
        ConnectionGraph::connector(self, module, name)
    }

    fn set(&mut self, input: ConnectorId, value: Value) -> Result<(), ConnectorError> {
        ConnectionGraph::set(self, input, value)
    }

    fn trigger(&mut self, trigger: ConnectorId) -> Result<(), ConnectorError> {
        ConnectionGraph::trigger(self, trigger)
    }

    fn get(&mut self, output: ConnectorId) -> Result<Value, ConnectorError> {
        ConnectionGraph::get(self, output)
    }

    fn add_contribution(
        &mut self,
        multi: ConnectorId,
        value: Value,
    ) -> Result<ContributionId, ConnectorError> {
        ConnectionGraph::add_contribution(self, multi, value)
    }

    fn remove_contribution(
        &mut self,
        multi: ConnectorId,
        id: ContributionId,
    ) -> Result<(), ConnectorError> {
        ConnectionGraph::remove_contribution(self, multi, id)
    }

    fn connect(
        &mut self,
        output: ConnectorId,
        input: ConnectorId,
    ) -> Result<EdgeId, ConnectorError> {
        ConnectionGraph::connect(self, output, input)
    }

    fn disconnect(
        &mut self,
        output: ConnectorId,
        input: ConnectorId,
    ) -> Result<(), ConnectorError> {
        ConnectionGraph::disconnect(self, output, input)
    }

    fn disconnect_all(&mut self, connector: ConnectorId) -> Result<(), ConnectorError> {
        ConnectionGraph::disconnect_all(self, connector)
    }

    fn deactivate_output(&mut self, output: ConnectorId) -> Result<(), ConnectorError> {
        ConnectionGraph::deactivate_output(self, output)
    }

    fn activate_output(&mut self, output: ConnectorId) -> Result<(), ConnectorError> {
        ConnectionGraph::activate_output(self, output)
    }

    fn destroy_connectors(
        &mut self,
        owner: ModuleId,
    ) -> Result<Box<dyn Module + Send>, ConnectorError> {
        ConnectionGraph::destroy_connectors(self, owner)
    }

    fn set_multiple_values(
        &mut self,
        values: Vec<(ConnectorId, Value)>,
    ) -> Result<(), ConnectorError> {
        ConnectionGraph::set_multiple_values(self, values)
    }

    fn set_observer(&mut self, observer: Option<Box<dyn ProgressObserver + Send>>) {
        ConnectionGraph::set_observer(self, observer);
    }
}

impl Runtime for PassThrough {
    fn kind(&self) -> RuntimeKind {
        RuntimeKind::PassThrough
    }

    fn add_module(&mut self, module: Box<dyn Module + Send>) -> Result<ModuleId, ConnectorError> {
        PassThrough::add_module(self, module)
    }

    fn connector(&self, module: ModuleId, name: &str) -> Result<ConnectorId, ConnectorError> {
        PassThrough::connector(self, module, name)
    }

    fn set(&mut self, input: ConnectorId, value: Value) -> Result<(), ConnectorError> {
        PassThrough::set(self, input, value)
    }

    fn trigger(&mut self, trigger: ConnectorId) -> Result<(), ConnectorError> {
        PassThrough::trigger(self, trigger)
    }

    fn get(&mut self, output: ConnectorId) -> Result<Value, ConnectorError> {
        PassThrough::get(self, output)
    }

    fn add_contribution(
        &mut self,
        multi: ConnectorId,
        value: Value,
    ) -> Result<ContributionId, ConnectorError> {
        PassThrough::add_contribution(self, multi, value)
    }

    fn remove_contribution(
        &mut self,
        multi: ConnectorId,
        id: ContributionId,
    ) -> Result<(), ConnectorError> {
        PassThrough::remove_contribution(self, multi, id)
    }

    fn connect(
        &mut self,
        _output: ConnectorId,
        _input: ConnectorId,
    ) -> Result<EdgeId, ConnectorError> {
        Err(ConnectorError::Disabled)
    }

    fn disconnect(
        &mut self,
        _output: ConnectorId,
        _input: ConnectorId,
    ) -> Result<(), ConnectorError> {
        Err(ConnectorError::Disabled)
    }

    fn disconnect_all(&mut self, connector: ConnectorId) -> Result<(), ConnectorError> {
        PassThrough::validate(self, connector)
    }

    fn deactivate_output(&mut self, output: ConnectorId) -> Result<(), ConnectorError> {
        PassThrough::validate_output(self, output)
    }

    fn activate_output(&mut self, output: ConnectorId) -> Result<(), ConnectorError> {
        PassThrough::validate_output(self, output)
    }

    fn destroy_connectors(
        &mut self,
        owner: ModuleId,
    ) -> Result<Box<dyn Module + Send>, ConnectorError> {
        PassThrough::destroy_connectors(self, owner)
    }

    fn set_multiple_values(
        &mut self,
        values: Vec<(ConnectorId, Value)>,
    ) -> Result<(), ConnectorError> {
        PassThrough::set_multiple_values(self, values)
    }

    fn set_observer(&mut self, _observer: Option<Box<dyn ProgressObserver + Send>>) {}
}

/// Creates a boxed runtime of the requested kind.
pub fn build_runtime(kind: RuntimeKind) -> Box<dyn Runtime + Send> {
    match kind {
        RuntimeKind::Graph => Box::new(ConnectionGraph::new()),
        RuntimeKind::PassThrough => Box::new(PassThrough::new()),
    }
}
