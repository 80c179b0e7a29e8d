//! Connection graph: the reactive connector runtime.
//!
//! [`ConnectionGraph`] owns modules, their connectors and the directed edges
//! between connectors. It is the explicit replacement for a process-wide
//! connector registry: independent graphs never share state.
//!
//! # Semantics
//!
//! - **Push-invalidate, pull-recompute.** When an Input, Trigger or MultiInput
//!   fires, every Output its module declared as dependent is marked dirty. An
//!   Output with no outgoing edges stays dirty until somebody reads it; an Output
//!   with outgoing edges is recomputed once and its value pushed along each edge
//!   in registration order, recursively.
//! - **Batching.** A deactivated Output only records that it changed; on
//!   reactivation it recomputes and pushes once. [`set_multiple_values`] uses
//!   this to apply several sets with one recomputation per affected Output.
//! - **Cycle guard.** Each propagation pass carries a visited-edge set. An edge
//!   reached a second time in the same pass is skipped.
//! - **Manual teardown.** [`destroy_connectors`] severs every edge touching a
//!   module and hands the module back; its connector handles then fail with
//!   [`UseAfterDestroy`](ConnectorError::UseAfterDestroy).
//!
//! # Example
//!
//! ```rust,ignore
//! use rivulet_core::{ConnectionGraph, Value};
//!
//! let mut graph = ConnectionGraph::new();
//! let a = graph.add_module(Box::new(Holder::default()))?;
//! let b = graph.add_module(Box::new(Scaler::new(2.0)))?;
//!
//! let a_get = graph.connector(a, "GetValue")?;
//! let b_set = graph.connector(b, "SetValue")?;
//! graph.connect(a_get, b_set)?;
//!
//! graph.set(graph.connector(a, "SetValue")?, Value::new(5.0))?;
//! let out = graph.get(graph.connector(b, "GetOutput")?)?;
//! assert_eq!(out.cloned::<f64>(), Some(10.0));
//! ```
//!
//! [`set_multiple_values`]: ConnectionGraph::set_multiple_values
//! [`destroy_connectors`]: ConnectionGraph::destroy_connectors

mod activation;
mod lifecycle;
mod propagation;
mod registry;

use std::collections::HashSet;

use crate::arena::ModuleArena;
use crate::connector::{ConnectorId, ConnectorSpec, Role};
use crate::edge::{Connection, ContributionId, Edge, EdgeId};
use crate::error::ConnectorError;
use crate::module::{Module, ModuleId};
use crate::progress::ProgressObserver;
use crate::value::Value;

/// One entry of a MultiInput's ordered contribution list.
pub(crate) struct Contribution {
    pub id: ContributionId,
    /// Edge that feeds this contribution; `None` for direct additions.
    pub edge: Option<EdgeId>,
}

/// Cache and activation state of an Output.
pub(crate) struct OutputState {
    pub cache: Option<Value>,
    pub dirty: bool,
    /// Changed while inactive; activation owes downstream a push.
    pub pending: bool,
    pub active: bool,
    /// Outgoing edges in registration order.
    pub downstream: Vec<EdgeId>,
}

/// Per-connector link state kept by the graph backend.
pub(crate) enum LinkState {
    Input { upstream: Option<EdgeId> },
    Trigger { upstream: Vec<EdgeId> },
    MultiInput { contributions: Vec<Contribution> },
    Output(OutputState),
}

impl LinkState {
    fn for_spec(spec: &ConnectorSpec) -> Self {
        match spec.role {
            Role::Input => LinkState::Input { upstream: None },
            Role::Trigger => LinkState::Trigger {
                upstream: Vec::new(),
            },
            Role::MultiInput => LinkState::MultiInput {
                contributions: Vec::new(),
            },
            Role::Output => LinkState::Output(OutputState {
                cache: None,
                dirty: true,
                pending: false,
                active: true,
                downstream: Vec::new(),
            }),
        }
    }

    /// Edges attached to this connector, in either direction.
    fn edges(&self) -> Vec<EdgeId> {
        match self {
            LinkState::Input { upstream } => upstream.iter().copied().collect(),
            LinkState::Trigger { upstream } => upstream.clone(),
            LinkState::MultiInput { contributions } => {
                contributions.iter().filter_map(|c| c.edge).collect()
            }
            LinkState::Output(state) => state.downstream.clone(),
        }
    }
}

/// State of one propagation pass.
pub(crate) struct Pass {
    visited: HashSet<EdgeId>,
    estimate: usize,
    recomputed: usize,
}

/// Reactive connection graph.
///
/// Holds modules and their connectors in an arena indexed by [`ModuleId`] and
/// [`ConnectorId`], and edges indexed by [`EdgeId`]. All operations run
/// synchronously on the caller's thread; `&mut self` serializes access.
pub struct ConnectionGraph {
    arena: ModuleArena<LinkState>,
    edges: Vec<Option<Edge>>,
    next_contribution: u32,
    observer: Option<Box<dyn ProgressObserver + Send>>,
}

impl Default for ConnectionGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            arena: ModuleArena::new(),
            edges: Vec::new(),
            next_contribution: 0,
            observer: None,
        }
    }

    /// Installs (or removes) the observer notified about propagation passes.
    pub fn set_observer(&mut self, observer: Option<Box<dyn ProgressObserver + Send>>) {
        self.observer = observer;
    }

    // --- Modules and connectors ---

    /// Adds a module and creates its declared connectors.
    ///
    /// Fails if a connector declares a dependent that is not an output of the
    /// same module, or if two connectors share a name.
    pub fn add_module(&mut self, module: Box<dyn Module + Send>) -> Result<ModuleId, ConnectorError> {
        let id = self.arena.insert(module, LinkState::for_spec)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            module = %id,
            kind = self.arena.type_name(id).unwrap_or("?"),
            "graph_add_module"
        );
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

    /// Returns the owner of a connector. Works for destroyed connectors too.
    pub fn owner(&self, connector: ConnectorId) -> Result<ModuleId, ConnectorError> {
        self.arena.raw(connector).map(|s| s.owner)
    }

    /// Returns the role of a connector.
    pub fn role(&self, connector: ConnectorId) -> Result<Role, ConnectorError> {
        self.arena.raw(connector).map(|s| s.role)
    }

    /// Returns the declared name of a connector.
    pub fn name(&self, connector: ConnectorId) -> Result<&'static str, ConnectorError> {
        self.arena.raw(connector).map(|s| s.name)
    }

    /// Returns true if the connector's module has been destroyed.
    pub fn is_destroyed(&self, connector: ConnectorId) -> Result<bool, ConnectorError> {
        self.arena.raw(connector).map(|s| s.destroyed)
    }

    /// Number of live modules.
    pub fn module_count(&self) -> usize {
        self.arena.module_count()
    }

    /// Number of connectors ever created, tombstones included.
    pub fn connector_count(&self) -> usize {
        self.arena.connector_count()
    }

    // --- Introspection ---

    /// Number of live connections.
    pub fn edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.is_some()).count()
    }

    /// Iterates live connections in creation order.
    pub fn connections(&self) -> impl Iterator<Item = Connection> + '_ {
        self.edges.iter().enumerate().filter_map(|(i, e)| {
            e.as_ref().map(|e| Connection {
                id: EdgeId(i as u32),
                from: e.from,
                to: e.to,
            })
        })
    }

    /// Returns the targets of an output's connections, in registration order.
    pub fn downstream(&self, output: ConnectorId) -> Result<Vec<ConnectorId>, ConnectorError> {
        self.arena.expect_role(output, Role::Output)?;
        Ok(self
            .output_state(output)?
            .downstream
            .iter()
            .filter_map(|&e| self.edge(e).map(|e| e.to))
            .collect())
    }

    /// Returns the sources feeding a receiving connector, in connection order.
    pub fn upstream(&self, connector: ConnectorId) -> Result<Vec<ConnectorId>, ConnectorError> {
        let slot = self.arena.slot(connector)?;
        if !slot.role.receives() {
            return Err(ConnectorError::wrong_role(connector, "a receiving connector", slot.role));
        }
        Ok(slot
            .state
            .edges()
            .into_iter()
            .filter_map(|e| self.edge(e).map(|e| e.from))
            .collect())
    }

    /// Returns true if at least one connection `output -> input` exists.
    pub fn is_connected(&self, output: ConnectorId, input: ConnectorId) -> bool {
        self.find_edge(output, input).is_some()
    }

    /// Returns true if the output is active.
    pub fn is_active(&self, output: ConnectorId) -> Result<bool, ConnectorError> {
        self.arena.expect_role(output, Role::Output)?;
        Ok(self.output_state(output)?.active)
    }

    /// Returns true if the output's cached value is stale or missing.
    pub fn is_dirty(&self, output: ConnectorId) -> Result<bool, ConnectorError> {
        self.arena.expect_role(output, Role::Output)?;
        Ok(self.output_state(output)?.dirty)
    }

    /// Returns the contribution IDs of a multi-input in order.
    pub fn contributions(
        &self,
        multi: ConnectorId,
    ) -> Result<Vec<ContributionId>, ConnectorError> {
        let slot = self.arena.expect_role(multi, Role::MultiInput)?;
        match &slot.state {
            LinkState::MultiInput { contributions } => {
                Ok(contributions.iter().map(|c| c.id).collect())
            }
            _ => Ok(Vec::new()),
        }
    }

    // --- Internal helpers ---

    fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0 as usize).and_then(Option::as_ref)
    }

    fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    /// Earliest connection `output -> input`, if any.
    fn find_edge(&self, output: ConnectorId, input: ConnectorId) -> Option<EdgeId> {
        let slot = self.arena.raw(output).ok()?;
        match &slot.state {
            LinkState::Output(state) => state
                .downstream
                .iter()
                .copied()
                .find(|&e| self.edge(e).is_some_and(|e| e.to == input)),
            _ => None,
        }
    }

    fn output_state(&self, id: ConnectorId) -> Result<&OutputState, ConnectorError> {
        let slot = self.arena.raw(id)?;
        match &slot.state {
            LinkState::Output(state) => Ok(state),
            _ => Err(ConnectorError::wrong_role(id, "an output", slot.role)),
        }
    }

    fn output_state_mut(&mut self, id: ConnectorId) -> Result<&mut OutputState, ConnectorError> {
        let slot = self.arena.raw_mut(id)?;
        let role = slot.role;
        match &mut slot.state {
            LinkState::Output(state) => Ok(state),
            _ => Err(ConnectorError::wrong_role(id, "an output", role)),
        }
    }

    fn dependents(&self, id: ConnectorId) -> Vec<ConnectorId> {
        self.arena
            .raw(id)
            .map(|s| s.dependents.clone())
            .unwrap_or_default()
    }

    fn next_contribution_id(&mut self) -> ContributionId {
        let id = ContributionId(self.next_contribution);
        self.next_contribution += 1;
        id
    }

    /// Collects outputs reachable from `sources` through dependency
    /// declarations and connections, in reverse post-order (upstream first on
    /// acyclic graphs).
    fn reachable_outputs(&self, sources: &[ConnectorId]) -> Vec<ConnectorId> {
        let mut visited = HashSet::new();
        let mut postorder = Vec::new();
        for &source in sources {
            let roots = match self.arena.raw(source).map(|s| s.role) {
                Ok(Role::Output) => vec![source],
                Ok(_) => self.dependents(source),
                Err(_) => Vec::new(),
            };
            for output in roots {
                self.visit_output(output, &mut visited, &mut postorder);
            }
        }
        postorder.reverse();
        postorder
    }

    fn visit_output(
        &self,
        output: ConnectorId,
        visited: &mut HashSet<ConnectorId>,
        postorder: &mut Vec<ConnectorId>,
    ) {
        if !visited.insert(output) {
            return;
        }
        if let Ok(state) = self.output_state(output) {
            for &edge in &state.downstream {
                let Some(edge) = self.edge(edge) else { continue };
                for dependent in self.dependents(edge.to) {
                    self.visit_output(dependent, visited, postorder);
                }
            }
        }
        postorder.push(output);
    }

    fn begin_pass(&mut self, label: &'static str, sources: &[ConnectorId]) -> Pass {
        let estimate = if self.observer.is_some() {
            self.reachable_outputs(sources).len()
        } else {
            0
        };
        if let Some(observer) = self.observer.as_mut() {
            observer.begin(label, estimate);
        }
        Pass {
            visited: HashSet::new(),
            estimate,
            recomputed: 0,
        }
    }

    fn finish_pass(&mut self, pass: Pass) {
        #[cfg(feature = "tracing")]
        tracing::trace!(
            recomputed = pass.recomputed,
            edges = pass.visited.len(),
            "graph_pass_done"
        );
        if let Some(observer) = self.observer.as_mut() {
            observer.finish(pass.recomputed);
        }
    }
}
