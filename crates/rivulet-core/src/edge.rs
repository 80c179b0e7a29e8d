//! Connection (edge) types.
//!
//! An edge links one Output to one Input, Trigger or MultiInput. Edges
//! reference connectors by [`ConnectorId`] only, so a module can be retired
//! without the edge table holding it alive.

use std::fmt;

use crate::connector::ConnectorId;

/// Unique identifier for a connection.
///
/// Edge IDs are assigned sequentially and never reused within a graph instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub(crate) u32);

impl EdgeId {
    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}

/// Identity of one contribution held by a MultiInput.
///
/// Modules receive this ID in `add_contribution` and must use it to find the
/// entry again on replace and remove.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContributionId(pub(crate) u32);

impl ContributionId {
    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ContributionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContributionId({})", self.0)
    }
}

/// Public view of a connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Connection {
    /// Edge identifier.
    pub id: EdgeId,
    /// Source output.
    pub from: ConnectorId,
    /// Target input, trigger or multi-input.
    pub to: ConnectorId,
}

/// A directed connection between two connectors.
pub(crate) struct Edge {
    pub from: ConnectorId,
    pub to: ConnectorId,
    /// Contribution owned by this edge when the target is a MultiInput.
    pub contribution: Option<ContributionId>,
    /// Whether the target module has received a value along this edge.
    pub delivered: bool,
}
