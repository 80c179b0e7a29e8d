//! Pass-through backend: connectors without a graph.
//!
//! Every role call invokes the bound module method directly. Nothing is
//! cached, nothing propagates, and connections cannot be made. Modules written
//! against [`Module`] run unchanged, so disabling the graph is a configuration
//! switch rather than a code change.

use crate::arena::ModuleArena;
use crate::connector::{ConnectorId, Role};
use crate::edge::ContributionId;
use crate::error::ConnectorError;
use crate::module::{Module, ModuleId};
use crate::value::Value;

/// Direct-call runtime.
///
/// MultiInput slots remember their contribution IDs so removal can be
/// validated; all other connectors carry no state.
pub struct PassThrough {
    arena: ModuleArena<Vec<ContributionId>>,
    next_contribution: u32,
}

impl Default for PassThrough {
    fn default() -> Self {
        Self::new()
    }
}

impl PassThrough {
    /// Creates an empty runtime.
    pub fn new() -> Self {
        Self {
            arena: ModuleArena::new(),
            next_contribution: 0,
        }
    }

    /// Adds a module and creates its declared connectors.
    pub fn add_module(&mut self, module: Box<dyn Module + Send>) -> Result<ModuleId, ConnectorError> {
        let id = self.arena.insert(module, |_| Vec::new())?;
        #[cfg(feature = "tracing")]
        tracing::debug!(module = %id, "passthrough_add_module");
        Ok(id)
    }

    /// Looks up a connector of a module by name.
    pub fn connector(&self, module: ModuleId, name: &str) -> Result<ConnectorId, ConnectorError> {
        self.arena.lookup(module, name)
    }

    /// Returns the connectors of a live module in declaration order.
    pub fn connectors_of(&self, module: ModuleId) -> Result<&[ConnectorId], ConnectorError> {
        self.arena.connectors_of(module)
    }

    /// Returns the type name a live module reports.
    pub fn module_type(&self, module: ModuleId) -> Result<&'static str, ConnectorError> {
        self.arena.type_name(module)
    }

    /// Returns the role of a connector.
    pub fn role(&self, connector: ConnectorId) -> Result<Role, ConnectorError> {
        self.arena.raw(connector).map(|s| s.role)
    }

    /// Calls the setter bound to an Input.
    pub fn set(&mut self, input: ConnectorId, value: Value) -> Result<(), ConnectorError> {
        self.arena.expect_role(input, Role::Input)?;
        self.arena.check_admits(input, &value)?;
        self.arena.call(input, |m, port| m.set_input(port, value))
    }

    /// Calls the method bound to a Trigger.
    pub fn trigger(&mut self, trigger: ConnectorId) -> Result<(), ConnectorError> {
        self.arena.expect_role(trigger, Role::Trigger)?;
        self.arena.call(trigger, |m, port| m.trigger(port))
    }

    /// Calls the getter bound to an Output. Every read runs the getter.
    pub fn get(&mut self, output: ConnectorId) -> Result<Value, ConnectorError> {
        self.arena.expect_role(output, Role::Output)?;
        let value = self.arena.call(output, |m, port| m.get_output(port))?;
        self.arena.check_admits(output, &value)?;
        Ok(value)
    }

    /// Adds a contribution to a MultiInput.
    pub fn add_contribution(
        &mut self,
        multi: ConnectorId,
        value: Value,
    ) -> Result<ContributionId, ConnectorError> {
        self.arena.expect_role(multi, Role::MultiInput)?;
        self.arena.check_admits(multi, &value)?;
        let id = ContributionId(self.next_contribution);
        self.next_contribution += 1;
        self.arena
            .call(multi, |m, port| m.add_contribution(port, id, value))?;
        self.arena.slot_mut(multi)?.state.push(id);
        Ok(id)
    }

    /// Removes a contribution from a MultiInput.
    pub fn remove_contribution(
        &mut self,
        multi: ConnectorId,
        id: ContributionId,
    ) -> Result<(), ConnectorError> {
        let slot = self.arena.expect_role(multi, Role::MultiInput)?;
        if !slot.state.contains(&id) {
            return Err(ConnectorError::UnknownContribution {
                connector: multi,
                contribution: id,
            });
        }
        self.arena.slot_mut(multi)?.state.retain(|&c| c != id);
        self.arena
            .call(multi, |m, port| m.remove_contribution(port, id))
    }

    /// Returns the contribution IDs of a multi-input in order.
    pub fn contributions(
        &self,
        multi: ConnectorId,
    ) -> Result<Vec<ContributionId>, ConnectorError> {
        Ok(self.arena.expect_role(multi, Role::MultiInput)?.state.clone())
    }

    /// Applies sets in order after validating all of them.
    pub fn set_multiple_values<I>(&mut self, values: I) -> Result<(), ConnectorError>
    where
        I: IntoIterator<Item = (ConnectorId, Value)>,
    {
        let values: Vec<(ConnectorId, Value)> = values.into_iter().collect();
        for (input, value) in &values {
            self.arena.expect_role(*input, Role::Input)?;
            self.arena.check_admits(*input, value)?;
        }
        for (input, value) in values {
            self.arena.call(input, |m, port| m.set_input(port, value))?;
        }
        Ok(())
    }

    /// Retires a module and hands it back.
    pub fn destroy_connectors(
        &mut self,
        owner: ModuleId,
    ) -> Result<Box<dyn Module + Send>, ConnectorError> {
        let (module, _) = self.arena.retire(owner)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(module = %owner, "passthrough_destroy");
        Ok(module)
    }

    /// Fails unless `connector` is live.
    pub(crate) fn validate(&self, connector: ConnectorId) -> Result<(), ConnectorError> {
        self.arena.slot(connector).map(|_| ())
    }

    /// Fails unless `output` is a live Output.
    pub(crate) fn validate_output(&self, output: ConnectorId) -> Result<(), ConnectorError> {
        self.arena.expect_role(output, Role::Output).map(|_| ())
    }
}
