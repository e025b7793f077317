//! Compatibility wrapper around [`CompactGraph`].

use super::CompactGraph;
use crate::graph::{Graph, GraphKind, NodeId};

/// Compact graph presented with the reference graph's interface.
///
/// The dispatcher returns this wrapper when the caller works with reference
/// graphs but routed the computation to the compact backend. The wrapped
/// graph remains available through [`CompatGraph::compact`].
///
/// # Examples
/// ```
/// use egonet_core::{AttrPreservation, CompactGraph, Graph, GraphKind};
///
/// let graph = Graph::path_graph(3, GraphKind::Directed);
/// let compat = CompactGraph::from_graph(&graph, AttrPreservation::All).into_compat();
/// assert_eq!(compat.node_count(), 3);
/// assert!(compat.contains_node(2));
/// assert_eq!(compat.to_graph(), graph);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CompatGraph {
    inner: CompactGraph,
}

impl CompatGraph {
    /// Wraps `inner`.
    #[must_use]
    pub fn new(inner: CompactGraph) -> Self {
        Self { inner }
    }

    /// Borrows the wrapped compact graph.
    #[must_use]
    pub fn compact(&self) -> &CompactGraph {
        &self.inner
    }

    /// Unwraps the compact graph.
    #[must_use]
    pub fn into_compact(self) -> CompactGraph {
        self.inner
    }

    /// Graph variant of the wrapped graph.
    #[must_use]
    pub fn kind(&self) -> GraphKind {
        self.inner.kind()
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Number of edges, counting parallel edges separately.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Whether `node` is in the graph.
    #[must_use]
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.inner.contains_node(node)
    }

    /// Materialises the wrapped graph as a reference [`Graph`].
    #[must_use]
    pub fn to_graph(&self) -> Graph {
        self.inner.to_graph()
    }
}

impl From<CompactGraph> for CompatGraph {
    fn from(inner: CompactGraph) -> Self {
        Self::new(inner)
    }
}
