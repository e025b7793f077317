//! Small deterministic graph builders.

use super::{Attrs, EdgeKey, Graph, GraphKind, NodeId};

impl Graph {
    /// Builds a cycle over nodes `0..n` with edges `(i, i + 1 mod n)`.
    ///
    /// `n == 1` yields a single self-loop; `n == 0` yields an empty graph.
    ///
    /// # Examples
    /// ```
    /// use egonet_core::{Graph, GraphKind};
    ///
    /// let cycle = Graph::cycle_graph(7, GraphKind::Directed);
    /// assert_eq!(cycle.node_count(), 7);
    /// assert_eq!(cycle.edge_count(), 7);
    /// assert_eq!(cycle.successors(6).collect::<Vec<_>>(), vec![0]);
    /// ```
    #[must_use]
    pub fn cycle_graph(n: usize, kind: GraphKind) -> Self {
        let mut graph = Self::path_graph(n, kind);
        if let Some(last) = n.checked_sub(1) {
            graph.add_edge(to_node(last), 0);
        }
        graph
    }

    /// Builds [`Graph::cycle_graph`] with parallel edges layered on.
    ///
    /// On multigraph kinds with `n > 1` the directed cycle's edges are added
    /// a second time, followed by an edge `(0, 1)` under `extra_key`. Simple
    /// kinds, and cycles of fewer than two nodes, get the plain cycle.
    ///
    /// # Examples
    /// ```
    /// use egonet_core::{Graph, GraphKind};
    ///
    /// let layered = Graph::layered_cycle_graph(7, GraphKind::DirectedMulti, 10);
    /// assert_eq!(layered.edge_count(), 15);
    /// let simple = Graph::layered_cycle_graph(7, GraphKind::Directed, 10);
    /// assert_eq!(simple.edge_count(), 7);
    /// ```
    #[must_use]
    pub fn layered_cycle_graph(n: usize, kind: GraphKind, extra_key: EdgeKey) -> Self {
        let mut graph = Self::cycle_graph(n, kind);
        if kind.is_multigraph() && n > 1 {
            let layer = Self::cycle_graph(n, GraphKind::Directed);
            graph.add_edges_from(layer.edges().map(|edge| (edge.source, edge.target)));
            graph.add_edge_with_key(0, 1, extra_key, Attrs::new());
        }
        graph
    }

    /// Builds a path over nodes `0..n` with edges `(i, i + 1)`.
    ///
    /// # Examples
    /// ```
    /// use egonet_core::{Graph, GraphKind};
    ///
    /// let path = Graph::path_graph(4, GraphKind::Undirected);
    /// assert_eq!(path.node_count(), 4);
    /// assert_eq!(path.edge_count(), 3);
    /// ```
    #[must_use]
    pub fn path_graph(n: usize, kind: GraphKind) -> Self {
        let mut graph = Self::new(kind);
        for index in 0..n {
            graph.add_node(to_node(index));
        }
        for index in 1..n {
            graph.add_edge(to_node(index - 1), to_node(index));
        }
        graph
    }
}

fn to_node(index: usize) -> NodeId {
    NodeId::try_from(index).unwrap_or(NodeId::MAX)
}
