//! Reference graph model.
//!
//! [`Graph`] is an ordered adjacency structure polymorphic over the four
//! [`GraphKind`] variants. Nodes are signed integers; edges are grouped into
//! bundles per node pair, keyed by [`EdgeKey`] so multigraphs can hold
//! parallel edges. Undirected edges are stored once under their canonical
//! `(min, max)` pair and reported that way by [`Graph::edges`].

mod attrs;
mod generators;
mod kind;

use std::collections::{BTreeMap, BTreeSet};

pub use self::{
    attrs::{AttrValue, Attrs, attrs},
    kind::GraphKind,
};

/// Identifier of a node.
pub type NodeId = i64;

/// Key distinguishing parallel edges between the same node pair.
///
/// Simple graphs always use key `0`.
pub type EdgeKey = u64;

type EdgeBundle = BTreeMap<EdgeKey, Attrs>;

/// Borrowed view of one logical edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeRef<'a> {
    /// Tail of the edge; the smaller endpoint for undirected graphs.
    pub source: NodeId,
    /// Head of the edge; the larger endpoint for undirected graphs.
    pub target: NodeId,
    /// Parallel-edge key (`0` for simple graphs).
    pub key: EdgeKey,
    /// Edge attributes.
    pub attrs: &'a Attrs,
}

/// In-memory graph used by the reference backend.
///
/// # Examples
/// ```
/// use egonet_core::{AttrValue, Graph, GraphKind};
///
/// let mut graph = Graph::new(GraphKind::UndirectedMulti);
/// let first = graph.add_edge(1, 2);
/// let second = graph.add_edge(2, 1);
/// assert_eq!((first, second), (0, 1));
/// assert_eq!(graph.edge_count(), 2);
///
/// graph.set_edge_attributes("weight", AttrValue::from(1));
/// assert!(graph.edges().all(|edge| edge.attrs.contains_key("weight")));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Graph {
    kind: GraphKind,
    nodes: BTreeMap<NodeId, Attrs>,
    succ: BTreeMap<NodeId, BTreeSet<NodeId>>,
    pred: BTreeMap<NodeId, BTreeSet<NodeId>>,
    edges: BTreeMap<(NodeId, NodeId), EdgeBundle>,
}

impl Graph {
    /// Creates an empty graph of the given variant.
    #[must_use]
    pub fn new(kind: GraphKind) -> Self {
        Self {
            kind,
            nodes: BTreeMap::new(),
            succ: BTreeMap::new(),
            pred: BTreeMap::new(),
            edges: BTreeMap::new(),
        }
    }

    /// Returns the graph variant.
    #[must_use]
    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    /// Returns whether edges have a direction.
    #[must_use]
    pub fn is_directed(&self) -> bool {
        self.kind.is_directed()
    }

    /// Returns whether parallel edges are permitted.
    #[must_use]
    pub fn is_multigraph(&self) -> bool {
        self.kind.is_multigraph()
    }

    /// Adds `node` if it is not already present.
    pub fn add_node(&mut self, node: NodeId) {
        self.nodes.entry(node).or_default();
        self.succ.entry(node).or_default();
        if self.is_directed() {
            self.pred.entry(node).or_default();
        }
    }

    /// Adds `node` and merges `attrs` into its attribute map.
    pub fn add_node_with_attrs(&mut self, node: NodeId, attrs: Attrs) {
        self.add_node(node);
        if let Some(existing) = self.nodes.get_mut(&node) {
            existing.extend(attrs);
        }
    }

    /// Returns whether `node` is present.
    #[must_use]
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterates node identifiers in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Returns the attributes of `node`, if present.
    #[must_use]
    pub fn node_attrs(&self, node: NodeId) -> Option<&Attrs> {
        self.nodes.get(&node)
    }

    /// Adds an edge without attributes and returns its key.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId) -> EdgeKey {
        self.add_edge_with_attrs(source, target, Attrs::new())
    }

    /// Adds an edge carrying `attrs` and returns its key.
    ///
    /// Multigraphs always create a new parallel edge using the lowest unused
    /// key starting from the current bundle size. Simple graphs update the
    /// existing edge's attributes instead.
    pub fn add_edge_with_attrs(&mut self, source: NodeId, target: NodeId, attrs: Attrs) -> EdgeKey {
        let key = if self.is_multigraph() {
            self.next_key(source, target)
        } else {
            0
        };
        self.insert_edge(source, target, key, attrs);
        key
    }

    /// Adds or updates the edge `(source, target, key)`.
    ///
    /// Simple graphs ignore `key` and store the edge under key `0`. Existing
    /// attributes are merged with `attrs`.
    pub fn add_edge_with_key(&mut self, source: NodeId, target: NodeId, key: EdgeKey, attrs: Attrs) {
        let key = if self.is_multigraph() { key } else { 0 };
        self.insert_edge(source, target, key, attrs);
    }

    /// Adds every `(source, target)` pair as an edge without attributes.
    pub fn add_edges_from<I>(&mut self, edges: I)
    where
        I: IntoIterator<Item = (NodeId, NodeId)>,
    {
        for (source, target) in edges {
            self.add_edge(source, target);
        }
    }

    /// Sets attribute `name` on a single edge.
    ///
    /// Returns `false` when the edge does not exist.
    pub fn set_edge_attribute(
        &mut self,
        source: NodeId,
        target: NodeId,
        key: EdgeKey,
        name: &str,
        value: AttrValue,
    ) -> bool {
        let pair = self.pair(source, target);
        match self.edges.get_mut(&pair).and_then(|bundle| bundle.get_mut(&key)) {
            Some(attrs) => {
                attrs.insert(name.to_owned(), value);
                true
            }
            None => false,
        }
    }

    /// Sets attribute `name` to `value` on every edge.
    pub fn set_edge_attributes(&mut self, name: &str, value: AttrValue) {
        for attrs in self.edges.values_mut().flat_map(BTreeMap::values_mut) {
            attrs.insert(name.to_owned(), value.clone());
        }
    }

    /// Returns the number of logical edges, counting parallel edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeMap::len).sum()
    }

    /// Iterates each logical edge once, ordered by `(source, target, key)`.
    pub fn edges(&self) -> impl Iterator<Item = EdgeRef<'_>> + '_ {
        self.edges.iter().flat_map(|(&(source, target), bundle)| {
            bundle.iter().map(move |(&key, attrs)| EdgeRef {
                source,
                target,
                key,
                attrs,
            })
        })
    }

    /// Returns the parallel edges between `source` and `target`, keyed by
    /// [`EdgeKey`]. Direction matters only for directed graphs.
    #[must_use]
    pub fn parallel_edges(&self, source: NodeId, target: NodeId) -> Option<&BTreeMap<EdgeKey, Attrs>> {
        self.edges.get(&self.pair(source, target))
    }

    /// Iterates nodes reachable over one outgoing edge of `node`.
    ///
    /// For undirected graphs these are all neighbours.
    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.succ.get(&node).into_iter().flatten().copied()
    }

    /// Iterates nodes with an edge into `node`.
    ///
    /// For undirected graphs these are all neighbours.
    pub fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let index = if self.is_directed() { &self.pred } else { &self.succ };
        index.get(&node).into_iter().flatten().copied()
    }

    /// Returns the neighbours of `node` in the undirected view of the graph.
    #[must_use]
    pub fn neighbors(&self, node: NodeId) -> BTreeSet<NodeId> {
        self.successors(node).chain(self.predecessors(node)).collect()
    }

    /// Removes `node` and every incident edge.
    ///
    /// Returns `false` when the node was absent.
    pub fn remove_node(&mut self, node: NodeId) -> bool {
        if self.nodes.remove(&node).is_none() {
            return false;
        }
        let outgoing = self.succ.remove(&node).unwrap_or_default();
        let incoming = if self.is_directed() {
            self.pred.remove(&node).unwrap_or_default()
        } else {
            BTreeSet::new()
        };
        for &other in &outgoing {
            if self.is_directed() {
                if let Some(set) = self.pred.get_mut(&other) {
                    set.remove(&node);
                }
            } else if let Some(set) = self.succ.get_mut(&other) {
                set.remove(&node);
            }
            let pair = self.pair(node, other);
            self.edges.remove(&pair);
        }
        for &other in &incoming {
            if let Some(set) = self.succ.get_mut(&other) {
                set.remove(&node);
            }
            self.edges.remove(&(other, node));
        }
        true
    }

    /// Returns a copy of the subgraph induced by `keep`.
    ///
    /// Node and edge attributes are copied; identifiers in `keep` that are not
    /// in the graph are ignored.
    #[must_use]
    pub fn subgraph(&self, keep: &BTreeSet<NodeId>) -> Self {
        let mut sub = Self::new(self.kind);
        for (&node, attrs) in self.nodes.iter().filter(|(node, _)| keep.contains(node)) {
            sub.add_node_with_attrs(node, attrs.clone());
        }
        for edge in self
            .edges()
            .filter(|edge| keep.contains(&edge.source) && keep.contains(&edge.target))
        {
            sub.insert_edge(edge.source, edge.target, edge.key, edge.attrs.clone());
        }
        sub
    }

    fn pair(&self, source: NodeId, target: NodeId) -> (NodeId, NodeId) {
        if self.is_directed() || source <= target {
            (source, target)
        } else {
            (target, source)
        }
    }

    fn next_key(&self, source: NodeId, target: NodeId) -> EdgeKey {
        let Some(bundle) = self.edges.get(&self.pair(source, target)) else {
            return 0;
        };
        let mut key = bundle.len() as EdgeKey;
        while bundle.contains_key(&key) {
            key += 1;
        }
        key
    }

    fn insert_edge(&mut self, source: NodeId, target: NodeId, key: EdgeKey, attrs: Attrs) {
        self.add_node(source);
        self.add_node(target);
        let pair = self.pair(source, target);
        self.edges
            .entry(pair)
            .or_default()
            .entry(key)
            .or_default()
            .extend(attrs);
        self.succ.entry(source).or_default().insert(target);
        if self.is_directed() {
            self.pred.entry(target).or_default().insert(source);
        } else {
            self.succ.entry(target).or_default().insert(source);
        }
    }
}
