//! Connection registry: creating and removing edges.

use crate::connector::{ConnectorId, Role};
use crate::edge::{Edge, EdgeId};
use crate::error::ConnectorError;

use super::{ConnectionGraph, Contribution, LinkState, Pass};

impl ConnectionGraph {
    /// Connects an output to an input, trigger or multi-input.
    ///
    /// The output's current value is delivered once along the new edge before
    /// this returns. A plain Input accepts one upstream edge: connecting a
    /// second output replaces the first connection. MultiInputs accept any
    /// number of edges, repeated ones included; each edge owns one contribution.
    ///
    /// Returns an error if:
    /// - `output` is not an Output, or `input` cannot receive
    /// - the declared types are incompatible
    /// - the identical Input/Trigger connection already exists
    ///
    /// If the initial delivery fails, the edge stays in place and the module
    /// error is returned.
    pub fn connect(
        &mut self,
        output: ConnectorId,
        input: ConnectorId,
    ) -> Result<EdgeId, ConnectorError> {
        let provided = self.arena.expect_role(output, Role::Output)?.value_type;
        let target = self.arena.slot(input)?;
        let role = target.role;
        if !role.receives() {
            return Err(ConnectorError::wrong_role(
                input,
                "a receiving connector",
                role,
            ));
        }
        if role != Role::Trigger && !target.value_type.accepts(provided) {
            return Err(ConnectorError::IncompatibleTypes {
                output,
                input,
                provided: provided.name(),
                required: target.value_type.name(),
            });
        }

        let mut replaced = None;
        match &target.state {
            LinkState::Input {
                upstream: Some(existing),
            } => {
                if self.edge(*existing).is_some_and(|e| e.from == output) {
                    return Err(ConnectorError::DuplicateConnection { output, input });
                }
                replaced = Some(*existing);
            }
            LinkState::Trigger { .. } => {
                if self.find_edge(output, input).is_some() {
                    return Err(ConnectorError::DuplicateConnection { output, input });
                }
            }
            _ => {}
        }

        // Input edges carry no contribution, so replacing one needs no retraction.
        if let Some(existing) = replaced {
            #[cfg(feature = "tracing")]
            tracing::debug!(%input, old = %existing, "graph_connect: replacing upstream edge");
            self.unlink(existing);
        }

        let id = EdgeId(self.edges.len() as u32);
        let contribution = (role == Role::MultiInput).then(|| self.next_contribution_id());
        self.edges.push(Some(Edge {
            from: output,
            to: input,
            contribution,
            delivered: false,
        }));
        self.output_state_mut(output)?.downstream.push(id);
        match &mut self.arena.raw_mut(input)?.state {
            LinkState::Input { upstream } => *upstream = Some(id),
            LinkState::Trigger { upstream } => upstream.push(id),
            LinkState::MultiInput { contributions } => {
                if let Some(c) = contribution {
                    contributions.push(Contribution {
                        id: c,
                        edge: Some(id),
                    });
                }
            }
            LinkState::Output(_) => {}
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(%output, %input, edge = %id, "graph_connect");

        let mut pass = self.begin_pass("connect", &[output]);
        pass.visited.insert(id);
        let result = self
            .value_for_push(output, &mut pass)
            .and_then(|value| self.deliver(id, value, &mut pass));
        self.finish_pass(pass);
        result.map(|()| id)
    }

    /// Removes one connection `output -> input`.
    ///
    /// For a MultiInput fed several times by the same output, the earliest
    /// connection is removed. Removing a MultiInput contribution fires the
    /// multi-input; disconnecting an Input or Trigger leaves its last value in
    /// place and fires nothing.
    pub fn disconnect(
        &mut self,
        output: ConnectorId,
        input: ConnectorId,
    ) -> Result<(), ConnectorError> {
        self.arena.expect_role(output, Role::Output)?;
        self.arena.slot(input)?;
        let edge = self
            .find_edge(output, input)
            .ok_or(ConnectorError::NotConnected { output, input })?;
        self.disconnect_edge(edge)
    }

    /// Removes a connection by ID.
    pub fn disconnect_edge(&mut self, edge: EdgeId) -> Result<(), ConnectorError> {
        let removed = self.unlink(edge).ok_or(ConnectorError::EdgeNotFound(edge))?;
        #[cfg(feature = "tracing")]
        tracing::debug!(from = %removed.from, to = %removed.to, %edge, "graph_disconnect");
        let mut pass = self.begin_pass("disconnect", &[removed.to]);
        let result = self.retract(&removed, &mut pass);
        self.finish_pass(pass);
        result
    }

    /// Removes every connection touching `connector`, in either direction.
    ///
    /// All edges are removed even if a module method fails while retracting a
    /// contribution; the first failure is returned.
    pub fn disconnect_all(&mut self, connector: ConnectorId) -> Result<(), ConnectorError> {
        let edges = self.arena.slot(connector)?.state.edges();
        let mut pass = self.begin_pass("disconnect_all", &[connector]);
        let result = self.sever(&edges, &mut pass);
        self.finish_pass(pass);
        result
    }

    /// Unlinks and retracts `edges`, returning the first retraction error.
    ///
    /// All edges are unlinked before any retraction fires, so nothing
    /// propagates along an edge that is about to disappear.
    pub(super) fn sever(&mut self, edges: &[EdgeId], pass: &mut Pass) -> Result<(), ConnectorError> {
        let mut removed = Vec::with_capacity(edges.len());
        for &edge in edges {
            let Some(unlinked) = self.unlink(edge) else {
                continue;
            };
            #[cfg(feature = "tracing")]
            tracing::debug!(from = %unlinked.from, to = %unlinked.to, %edge, "graph_disconnect");
            removed.push(unlinked);
        }

        let mut result = Ok(());
        for edge in &removed {
            let retracted = self.retract(edge, pass);
            if result.is_ok() {
                result = retracted;
            }
        }
        result
    }

    /// Structurally removes an edge from the edge table and both endpoints.
    pub(super) fn unlink(&mut self, id: EdgeId) -> Option<Edge> {
        let edge = self.edges.get_mut(id.0 as usize)?.take()?;
        if let Ok(state) = self.output_state_mut(edge.from) {
            state.downstream.retain(|&e| e != id);
        }
        if let Ok(slot) = self.arena.raw_mut(edge.to) {
            match &mut slot.state {
                LinkState::Input { upstream } => {
                    if *upstream == Some(id) {
                        *upstream = None;
                    }
                }
                LinkState::Trigger { upstream } => upstream.retain(|&e| e != id),
                LinkState::MultiInput { contributions } => {
                    contributions.retain(|c| c.edge != Some(id));
                }
                LinkState::Output(_) => {}
            }
        }
        Some(edge)
    }

    /// Tells a live MultiInput target that the contribution carried by a
    /// removed edge is gone, then fires it.
    pub(super) fn retract(&mut self, edge: &Edge, pass: &mut Pass) -> Result<(), ConnectorError> {
        let Some(id) = edge.contribution else {
            return Ok(());
        };
        if !edge.delivered || self.arena.raw(edge.to)?.destroyed {
            return Ok(());
        }
        self.arena
            .call(edge.to, |m, port| m.remove_contribution(port, id))?;
        self.fire(edge.to, pass)
    }
}
