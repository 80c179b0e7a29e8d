//! Lifecycle manager: retiring a module and severing its connections.

use crate::error::ConnectorError;
use crate::module::{Module, ModuleId};

use super::{ConnectionGraph, LinkState};

impl ConnectionGraph {
    /// Retires a module: severs every connection touching its connectors,
    /// discards cached values and turns the connectors into inert tombstones.
    ///
    /// Contributions the module made to other modules' MultiInputs are removed,
    /// which fires those multi-inputs. The module itself is handed back.
    /// Afterwards every call on one of its connectors fails with
    /// [`UseAfterDestroy`](ConnectorError::UseAfterDestroy), and destroying it
    /// again fails with [`ModuleNotFound`](ConnectorError::ModuleNotFound).
    ///
    /// Connections are all severed before any contribution is retracted. If a
    /// retraction fails, the remaining ones still run, the module is dropped and
    /// the first error is returned.
    pub fn destroy_connectors(
        &mut self,
        owner: ModuleId,
    ) -> Result<Box<dyn Module + Send>, ConnectorError> {
        let (module, connectors) = self.arena.retire(owner)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(module = %owner, connectors = connectors.len(), "graph_destroy");

        let mut edges = Vec::new();
        for &connector in &connectors {
            let slot = self.arena.raw_mut(connector)?;
            edges.extend(slot.state.edges());
            if let LinkState::Output(state) = &mut slot.state {
                state.cache = None;
                state.dirty = true;
                state.pending = false;
            }
        }

        // Every edge of the module goes before any retraction fires, so
        // feedback into the retired connectors cannot happen.
        let mut pass = self.begin_pass("destroy_connectors", &[]);
        let result = self.sever(&edges, &mut pass);
        self.finish_pass(pass);
        result.map(|()| module)
    }
}
