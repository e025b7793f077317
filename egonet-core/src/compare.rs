//! Structural comparison across graph representations.
//!
//! [`compare_graphs`] checks that two graphs, possibly held by different
//! backends, have the same variant, node set, edge set (with keys for
//! multigraphs) and attribute values. The first difference found is reported
//! as a [`GraphMismatch`].

use std::{collections::BTreeMap, fmt};

use thiserror::Error;

use crate::{
    compact::{CompactGraph, CompatGraph},
    dispatch::AnyGraph,
    graph::{Attrs, EdgeKey, Graph, GraphKind, NodeId},
};

/// Identity of one logical edge, independent of storage layout.
///
/// Undirected edges are identified by their `(min, max)` endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeIdentity {
    /// Tail, or smaller endpoint for undirected graphs.
    pub source: NodeId,
    /// Head, or larger endpoint for undirected graphs.
    pub target: NodeId,
    /// Parallel-edge key.
    pub key: EdgeKey,
}

impl fmt::Display for EdgeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.source, self.target, self.key)
    }
}

/// Read-only structural view shared by every graph representation.
pub trait GraphView {
    /// Returns the graph variant.
    fn kind(&self) -> GraphKind;

    /// Returns every node with its attributes.
    fn node_entries(&self) -> BTreeMap<NodeId, Attrs>;

    /// Returns every logical edge with its attributes.
    fn edge_entries(&self) -> BTreeMap<EdgeIdentity, Attrs>;
}

impl GraphView for Graph {
    fn kind(&self) -> GraphKind {
        Graph::kind(self)
    }

    fn node_entries(&self) -> BTreeMap<NodeId, Attrs> {
        self.nodes()
            .map(|node| (node, self.node_attrs(node).cloned().unwrap_or_default()))
            .collect()
    }

    fn edge_entries(&self) -> BTreeMap<EdgeIdentity, Attrs> {
        self.edges()
            .map(|edge| {
                let identity = EdgeIdentity {
                    source: edge.source,
                    target: edge.target,
                    key: edge.key,
                };
                (identity, edge.attrs.clone())
            })
            .collect()
    }
}

impl GraphView for CompactGraph {
    fn kind(&self) -> GraphKind {
        CompactGraph::kind(self)
    }

    fn node_entries(&self) -> BTreeMap<NodeId, Attrs> {
        self.node_ids()
            .iter()
            .map(|&node| (node, self.node_attrs(node).unwrap_or_default()))
            .collect()
    }

    fn edge_entries(&self) -> BTreeMap<EdgeIdentity, Attrs> {
        self.edges()
            .map(|edge| {
                let identity = EdgeIdentity {
                    source: edge.source,
                    target: edge.target,
                    key: edge.key,
                };
                (identity, edge.attrs)
            })
            .collect()
    }
}

impl GraphView for CompatGraph {
    fn kind(&self) -> GraphKind {
        self.compact().kind()
    }

    fn node_entries(&self) -> BTreeMap<NodeId, Attrs> {
        self.compact().node_entries()
    }

    fn edge_entries(&self) -> BTreeMap<EdgeIdentity, Attrs> {
        self.compact().edge_entries()
    }
}

impl GraphView for AnyGraph {
    fn kind(&self) -> GraphKind {
        AnyGraph::kind(self)
    }

    fn node_entries(&self) -> BTreeMap<NodeId, Attrs> {
        match self {
            Self::Reference(graph) => graph.node_entries(),
            Self::Compact(graph) => graph.node_entries(),
            Self::Compat(graph) => graph.node_entries(),
        }
    }

    fn edge_entries(&self) -> BTreeMap<EdgeIdentity, Attrs> {
        match self {
            Self::Reference(graph) => graph.edge_entries(),
            Self::Compact(graph) => graph.edge_entries(),
            Self::Compat(graph) => graph.edge_entries(),
        }
    }
}

/// First structural difference between two graphs.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GraphMismatch {
    /// The graphs are different variants.
    #[error("graph kinds differ: {left} vs {right}")]
    KindMismatch {
        /// Variant of the left graph.
        left: GraphKind,
        /// Variant of the right graph.
        right: GraphKind,
    },
    /// The node sets differ.
    #[error("node sets differ: only left {only_left:?}, only right {only_right:?}")]
    NodeSetMismatch {
        /// Nodes present only in the left graph.
        only_left: Vec<NodeId>,
        /// Nodes present only in the right graph.
        only_right: Vec<NodeId>,
    },
    /// A node carries different attributes.
    #[error("attributes of node {node} differ: {left:?} vs {right:?}")]
    NodeAttrMismatch {
        /// Node whose attributes differ.
        node: NodeId,
        /// Attributes in the left graph.
        left: Attrs,
        /// Attributes in the right graph.
        right: Attrs,
    },
    /// The edge sets differ.
    #[error("edge sets differ: only left {}, only right {}", list(.only_left), list(.only_right))]
    EdgeSetMismatch {
        /// Edges present only in the left graph.
        only_left: Vec<EdgeIdentity>,
        /// Edges present only in the right graph.
        only_right: Vec<EdgeIdentity>,
    },
    /// An edge carries different attributes.
    #[error("attributes of edge {edge} differ: {left:?} vs {right:?}")]
    EdgeAttrMismatch {
        /// Edge whose attributes differ.
        edge: EdgeIdentity,
        /// Attributes in the left graph.
        left: Attrs,
        /// Attributes in the right graph.
        right: Attrs,
    },
}

fn list(edges: &[EdgeIdentity]) -> String {
    let rendered: Vec<String> = edges.iter().map(ToString::to_string).collect();
    format!("[{}]", rendered.join(", "))
}

/// Compares two graphs structurally.
///
/// # Errors
/// Returns the first [`GraphMismatch`] found, checking the variant, then
/// node identities, node attributes, edge identities and edge attributes.
///
/// # Examples
/// ```
/// use egonet_core::{AttrPreservation, CompactGraph, Graph, GraphKind, compare_graphs};
///
/// let graph = Graph::cycle_graph(4, GraphKind::DirectedMulti);
/// let compact = CompactGraph::from_graph(&graph, AttrPreservation::All);
/// assert!(compare_graphs(&graph, &compact).is_ok());
/// assert!(compare_graphs(&graph, &Graph::path_graph(4, GraphKind::DirectedMulti)).is_err());
/// ```
pub fn compare_graphs<L, R>(left: &L, right: &R) -> Result<(), GraphMismatch>
where
    L: GraphView + ?Sized,
    R: GraphView + ?Sized,
{
    if left.kind() != right.kind() {
        return Err(GraphMismatch::KindMismatch {
            left: left.kind(),
            right: right.kind(),
        });
    }

    let left_nodes = left.node_entries();
    let right_nodes = right.node_entries();
    let (only_left, only_right) = key_difference(&left_nodes, &right_nodes);
    if !only_left.is_empty() || !only_right.is_empty() {
        return Err(GraphMismatch::NodeSetMismatch {
            only_left,
            only_right,
        });
    }
    if let Some((&node, attrs)) = left_nodes
        .iter()
        .find(|&(node, attrs)| right_nodes.get(node) != Some(attrs))
    {
        return Err(GraphMismatch::NodeAttrMismatch {
            node,
            left: attrs.clone(),
            right: right_nodes.get(&node).cloned().unwrap_or_default(),
        });
    }

    let left_edges = left.edge_entries();
    let right_edges = right.edge_entries();
    let (only_left, only_right) = key_difference(&left_edges, &right_edges);
    if !only_left.is_empty() || !only_right.is_empty() {
        return Err(GraphMismatch::EdgeSetMismatch {
            only_left,
            only_right,
        });
    }
    if let Some((&edge, attrs)) = left_edges
        .iter()
        .find(|&(edge, attrs)| right_edges.get(edge) != Some(attrs))
    {
        return Err(GraphMismatch::EdgeAttrMismatch {
            edge,
            left: attrs.clone(),
            right: right_edges.get(&edge).cloned().unwrap_or_default(),
        });
    }
    Ok(())
}

fn key_difference<K: Ord + Copy, V>(
    left: &BTreeMap<K, V>,
    right: &BTreeMap<K, V>,
) -> (Vec<K>, Vec<K>) {
    let only_left = left.keys().filter(|key| !right.contains_key(key)).copied().collect();
    let only_right = right.keys().filter(|key| !left.contains_key(key)).copied().collect();
    (only_left, only_right)
}
