//! Activation controller: suspending outputs to batch upstream changes.

use crate::connector::{ConnectorId, Role};
use crate::error::ConnectorError;
use crate::value::Value;

use super::{ConnectionGraph, Pass};

impl ConnectionGraph {
    /// Suspends an output. Upstream firings only mark it dirty until it is
    /// reactivated.
    pub fn deactivate_output(&mut self, output: ConnectorId) -> Result<(), ConnectorError> {
        self.arena.expect_role(output, Role::Output)?;
        self.output_state_mut(output)?.active = false;
        #[cfg(feature = "tracing")]
        tracing::debug!(%output, "graph_deactivate");
        Ok(())
    }

    /// Reactivates an output.
    ///
    /// If anything fired while it was inactive and it has outgoing edges, it
    /// recomputes once (unless an explicit read already refreshed it) and pushes
    /// the value downstream. Activating an active output does nothing.
    pub fn activate_output(&mut self, output: ConnectorId) -> Result<(), ConnectorError> {
        self.arena.expect_role(output, Role::Output)?;
        let mut pass = self.begin_pass("activate", &[output]);
        let result = self.reactivate(output, &mut pass);
        self.finish_pass(pass);
        result
    }

    /// Applies several Input sets with one recomputation per affected output.
    ///
    /// Every target is validated (role and value type) before anything
    /// changes. All currently active outputs transitively downstream of the
    /// targets are deactivated, the sets are applied, and exactly those outputs
    /// are reactivated, upstream first. Reactivation happens even when a set
    /// fails; the first error is returned.
    pub fn set_multiple_values<I>(&mut self, values: I) -> Result<(), ConnectorError>
    where
        I: IntoIterator<Item = (ConnectorId, Value)>,
    {
        let values: Vec<(ConnectorId, Value)> = values.into_iter().collect();
        for (input, value) in &values {
            self.arena.expect_role(*input, Role::Input)?;
            self.arena.check_admits(*input, value)?;
        }

        let inputs: Vec<ConnectorId> = values.iter().map(|(input, _)| *input).collect();
        let affected = self.reachable_outputs(&inputs);
        let mut suspended = Vec::with_capacity(affected.len());
        for output in affected {
            let state = self.output_state_mut(output)?;
            if state.active {
                state.active = false;
                suspended.push(output);
            }
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            inputs = inputs.len(),
            suspended = suspended.len(),
            "graph_set_multiple_values"
        );

        let mut pass = self.begin_pass("set_multiple_values", &inputs);
        let mut result = Ok(());
        for (input, value) in values {
            let applied = self
                .apply_set(input, value)
                .and_then(|()| self.fire(input, &mut pass));
            if applied.is_err() {
                result = applied;
                break;
            }
        }
        for output in suspended {
            let reactivated = self.reactivate(output, &mut pass);
            if result.is_ok() {
                result = reactivated;
            }
        }
        self.finish_pass(pass);
        result
    }

    pub(super) fn reactivate(
        &mut self,
        output: ConnectorId,
        pass: &mut Pass,
    ) -> Result<(), ConnectorError> {
        let state = self.output_state_mut(output)?;
        if state.active {
            return Ok(());
        }
        state.active = true;
        let pending = std::mem::take(&mut state.pending);
        let has_downstream = !state.downstream.is_empty();
        #[cfg(feature = "tracing")]
        tracing::debug!(%output, pending, "graph_activate");
        if !pending || !has_downstream {
            return Ok(());
        }
        let value = self.value_for_push(output, pass)?;
        self.push(output, value, pass)
    }
}
