//! Propagation engine: firing receivers, recomputing outputs, pushing values.

use crate::connector::{ConnectorId, Role};
use crate::edge::{ContributionId, EdgeId};
use crate::error::ConnectorError;
use crate::progress::Progress;
use crate::value::Value;

use super::{ConnectionGraph, Contribution, LinkState, Pass};

impl ConnectionGraph {
    // --- Connector roles ---

    /// Calls an Input: type-checks, invokes the bound setter, then fires every
    /// dependent output.
    pub fn set(&mut self, input: ConnectorId, value: Value) -> Result<(), ConnectorError> {
        self.arena.expect_role(input, Role::Input)?;
        self.arena.check_admits(input, &value)?;
        let mut pass = self.begin_pass("set", &[input]);
        let result = self.apply_set(input, value).and_then(|()| self.fire(input, &mut pass));
        self.finish_pass(pass);
        result
    }

    /// Calls a Trigger: invokes the bound method, then fires every dependent
    /// output.
    pub fn trigger(&mut self, trigger: ConnectorId) -> Result<(), ConnectorError> {
        self.arena.expect_role(trigger, Role::Trigger)?;
        let mut pass = self.begin_pass("trigger", &[trigger]);
        let result = self
            .arena
            .call(trigger, |m, port| m.trigger(port))
            .and_then(|()| self.fire(trigger, &mut pass));
        self.finish_pass(pass);
        result
    }

    /// Reads an Output.
    ///
    /// Returns the cached value while it is clean; otherwise calls the getter
    /// and caches the result. Inactive outputs still recompute on read.
    pub fn get(&mut self, output: ConnectorId) -> Result<Value, ConnectorError> {
        self.arena.expect_role(output, Role::Output)?;
        match self.cached(output)? {
            Some(value) => Ok(value),
            None => self.compute(output),
        }
    }

    /// Adds a contribution to a MultiInput directly (not through an edge).
    pub fn add_contribution(
        &mut self,
        multi: ConnectorId,
        value: Value,
    ) -> Result<ContributionId, ConnectorError> {
        self.arena.expect_role(multi, Role::MultiInput)?;
        self.arena.check_admits(multi, &value)?;
        let id = self.next_contribution_id();
        self.arena
            .call(multi, |m, port| m.add_contribution(port, id, value))?;
        if let LinkState::MultiInput { contributions } = &mut self.arena.raw_mut(multi)?.state {
            contributions.push(Contribution { id, edge: None });
        }
        let mut pass = self.begin_pass("add_contribution", &[multi]);
        let result = self.fire(multi, &mut pass);
        self.finish_pass(pass);
        result.map(|()| id)
    }

    /// Removes one contribution from a MultiInput.
    ///
    /// A contribution fed by an edge is removed by disconnecting that edge.
    pub fn remove_contribution(
        &mut self,
        multi: ConnectorId,
        id: ContributionId,
    ) -> Result<(), ConnectorError> {
        let slot = self.arena.expect_role(multi, Role::MultiInput)?;
        let edge = match &slot.state {
            LinkState::MultiInput { contributions } => contributions
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.edge)
                .ok_or(ConnectorError::UnknownContribution {
                    connector: multi,
                    contribution: id,
                })?,
            _ => None,
        };
        if let Some(edge) = edge {
            return self.disconnect_edge(edge);
        }

        // The entry stays until the module has let go of the value.
        self.arena
            .call(multi, |m, port| m.remove_contribution(port, id))?;
        if let LinkState::MultiInput { contributions } = &mut self.arena.raw_mut(multi)?.state {
            contributions.retain(|c| c.id != id);
        }
        let mut pass = self.begin_pass("remove_contribution", &[multi]);
        let result = self.fire(multi, &mut pass);
        self.finish_pass(pass);
        result
    }

    // --- Engine ---

    pub(super) fn apply_set(&mut self, input: ConnectorId, value: Value) -> Result<(), ConnectorError> {
        self.arena.call(input, |m, port| m.set_input(port, value))
    }

    /// Invalidates the dependents of `source` and pushes fresh values past
    /// every active dependent that has outgoing edges.
    ///
    /// Every dependent is invalidated before any of them recomputes, so a
    /// failing getter never leaves a sibling serving a stale cache. Pushes
    /// continue past a failure; the first error is returned.
    pub(super) fn fire(&mut self, source: ConnectorId, pass: &mut Pass) -> Result<(), ConnectorError> {
        let mut eager = Vec::new();
        for output in self.dependents(source) {
            let state = self.output_state_mut(output)?;
            state.dirty = true;
            if !state.active {
                state.pending = true;
            } else if !state.downstream.is_empty() {
                eager.push(output);
            }
        }

        let mut result = Ok(());
        for output in eager {
            let pushed = self
                .recompute(output, pass)
                .and_then(|value| self.push(output, value, pass));
            if result.is_ok() {
                result = pushed;
            }
        }
        result
    }

    /// Sends `value` along every outgoing edge of `output` not yet visited in
    /// this pass, in registration order.
    pub(super) fn push(
        &mut self,
        output: ConnectorId,
        value: Value,
        pass: &mut Pass,
    ) -> Result<(), ConnectorError> {
        let downstream = self.output_state(output)?.downstream.clone();
        for edge in downstream {
            if !pass.visited.insert(edge) {
                #[cfg(feature = "tracing")]
                tracing::trace!(%edge, "graph_cycle_guard: edge already visited");
                continue;
            }
            self.deliver(edge, value.clone(), pass)?;
        }
        Ok(())
    }

    /// Hands a value to the target of one edge, then fires the target.
    pub(super) fn deliver(
        &mut self,
        edge: EdgeId,
        value: Value,
        pass: &mut Pass,
    ) -> Result<(), ConnectorError> {
        let (target, contribution, delivered) = self
            .edge(edge)
            .map(|e| (e.to, e.contribution, e.delivered))
            .ok_or(ConnectorError::EdgeNotFound(edge))?;
        let role = self.arena.slot(target)?.role;

        match (role, contribution) {
            (Role::Input, _) => {
                self.arena.check_admits(target, &value)?;
                self.arena.call(target, |m, port| m.set_input(port, value))?;
            }
            (Role::Trigger, _) => {
                self.arena.call(target, |m, port| m.trigger(port))?;
            }
            (Role::MultiInput, Some(id)) => {
                self.arena.check_admits(target, &value)?;
                if delivered {
                    self.arena
                        .call(target, |m, port| m.replace_contribution(port, id, value))?;
                } else {
                    self.arena
                        .call(target, |m, port| m.add_contribution(port, id, value))?;
                }
            }
            (Role::MultiInput, None) | (Role::Output, _) => {
                return Err(ConnectorError::wrong_role(
                    target,
                    "a receiving connector",
                    role,
                ));
            }
        }
        if let Some(e) = self.edge_mut(edge) {
            e.delivered = true;
        }
        self.fire(target, pass)
    }

    /// Clean cached value of an output, if any.
    pub(super) fn cached(&self, output: ConnectorId) -> Result<Option<Value>, ConnectorError> {
        let caching = self.arena.raw(output)?.caching;
        let state = self.output_state(output)?;
        if caching && !state.dirty {
            Ok(state.cache.clone())
        } else {
            Ok(None)
        }
    }

    /// Calls the getter and updates the cache. Only caching outputs become
    /// clean; a non-caching output stays dirty.
    pub(super) fn compute(&mut self, output: ConnectorId) -> Result<Value, ConnectorError> {
        let value = self.arena.call(output, |m, port| m.get_output(port))?;
        self.arena.check_admits(output, &value)?;
        let caching = self.arena.raw(output)?.caching;
        let state = self.output_state_mut(output)?;
        state.dirty = !caching;
        state.cache = caching.then(|| value.clone());
        #[cfg(feature = "tracing")]
        tracing::trace!(%output, "graph_recompute");
        Ok(value)
    }

    /// `compute` inside a pass, reported to the progress observer.
    pub(super) fn recompute(
        &mut self,
        output: ConnectorId,
        pass: &mut Pass,
    ) -> Result<Value, ConnectorError> {
        let value = self.compute(output)?;
        pass.recomputed += 1;
        if let Some(observer) = self.observer.as_mut() {
            observer.step(Progress {
                current: pass.recomputed,
                max: pass.estimate.max(pass.recomputed),
                connector: output,
            });
        }
        Ok(value)
    }

    /// Value to send downstream: the clean cache if present, else a recompute.
    pub(super) fn value_for_push(
        &mut self,
        output: ConnectorId,
        pass: &mut Pass,
    ) -> Result<Value, ConnectorError> {
        match self.cached(output)? {
            Some(value) => Ok(value),
            None => self.recompute(output, pass),
        }
    }
}
