//! Compact backend.
//!
//! [`CompactGraph`] is the backend's native representation: nodes are mapped
//! to dense indices in ascending identifier order, edges live in COO arrays
//! sorted by `(source, target, key)` with a CSR offset index, and attributes
//! are stored column-wise with per-row presence. Undirected edges are stored
//! once per direction (self-loops once) so traversal never needs to
//! symmetrise; directed graphs additionally carry a reverse index for
//! undirected-view traversal.
//!
//! Traversal runs level-synchronous frontier kernels (see `kernels`) that are
//! parallelised with Rayon when the `parallel` feature is enabled.

mod compat;
mod convert;
mod kernels;

use std::{collections::BTreeMap, ops::Range};

use tracing::{debug, instrument};

use crate::{
    EgoParams, Result,
    error::{EgoError, SearchKind},
    graph::{AttrValue, Attrs, EdgeKey, GraphKind, NodeId},
    weights::edge_length,
};

pub use self::{compat::CompatGraph, convert::AttrPreservation};

/// Name under which the compact backend is registered.
pub const BACKEND_NAME: &str = "compact";

type Column = Vec<Option<AttrValue>>;

/// One logical edge materialised from the compact representation.
#[derive(Clone, Debug, PartialEq)]
pub struct CompactEdge {
    /// Tail of the edge; the smaller endpoint for undirected graphs.
    pub source: NodeId,
    /// Head of the edge; the larger endpoint for undirected graphs.
    pub target: NodeId,
    /// Parallel-edge key (`0` for simple graphs).
    pub key: EdgeKey,
    /// Edge attributes gathered from the attribute columns.
    pub attrs: Attrs,
}

#[derive(Clone, Debug, PartialEq)]
struct ReverseIndex {
    offsets: Vec<usize>,
    rows: Vec<usize>,
}

/// Columnar CSR graph owned by the compact backend.
///
/// # Examples
/// ```
/// use egonet_core::{AttrPreservation, CompactGraph, Graph, GraphKind};
///
/// let graph = Graph::cycle_graph(5, GraphKind::Undirected);
/// let compact = CompactGraph::from_graph(&graph, AttrPreservation::All);
/// assert_eq!(compact.node_count(), 5);
/// assert_eq!(compact.edge_count(), 5);
/// assert_eq!(compact.to_graph(), graph);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CompactGraph {
    kind: GraphKind,
    node_ids: Vec<NodeId>,
    node_columns: BTreeMap<String, Column>,
    src: Vec<usize>,
    dst: Vec<usize>,
    keys: Option<Vec<EdgeKey>>,
    edge_columns: BTreeMap<String, Column>,
    offsets: Vec<usize>,
    reverse: Option<ReverseIndex>,
}

impl CompactGraph {
    /// Builds the indices for rows already sorted by `(src, dst, key)`.
    fn assemble(
        kind: GraphKind,
        node_ids: Vec<NodeId>,
        node_columns: BTreeMap<String, Column>,
        src: Vec<usize>,
        dst: Vec<usize>,
        keys: Option<Vec<EdgeKey>>,
        edge_columns: BTreeMap<String, Column>,
    ) -> Self {
        debug_assert_eq!(src.len(), dst.len());
        let offsets = csr_offsets(node_ids.len(), &src);
        let reverse = kind.is_directed().then(|| {
            let mut rows: Vec<usize> = (0..dst.len()).collect();
            rows.sort_by_key(|&row| (dst[row], src[row]));
            ReverseIndex {
                offsets: csr_offsets(node_ids.len(), &dst),
                rows,
            }
        });
        Self {
            kind,
            node_ids,
            node_columns,
            src,
            dst,
            keys,
            edge_columns,
            offsets,
            reverse,
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

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    /// Returns the number of logical edges, counting parallel edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        (0..self.src.len()).filter(|&row| self.is_logical(row)).count()
    }

    /// Returns the node identifiers in index order (ascending).
    #[must_use]
    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_ids
    }

    /// Returns the dense index of `node`, if present.
    #[must_use]
    pub fn index_of(&self, node: NodeId) -> Option<usize> {
        self.node_ids.binary_search(&node).ok()
    }

    /// Returns whether `node` is present.
    #[must_use]
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.index_of(node).is_some()
    }

    /// Gathers the attributes of `node` from the node columns.
    #[must_use]
    pub fn node_attrs(&self, node: NodeId) -> Option<Attrs> {
        self.index_of(node)
            .map(|index| gather(&self.node_columns, index))
    }

    /// Iterates each logical edge once, ordered by `(source, target, key)`.
    pub fn edges(&self) -> impl Iterator<Item = CompactEdge> + '_ {
        (0..self.src.len())
            .filter(|&row| self.is_logical(row))
            .map(|row| CompactEdge {
                source: self.node_ids[self.src[row]],
                target: self.node_ids[self.dst[row]],
                key: self.keys.as_ref().map_or(0, |keys| keys[row]),
                attrs: gather(&self.edge_columns, row),
            })
    }

    /// Undirected edges are stored in both directions; only the row with
    /// `src <= dst` represents the logical edge.
    fn is_logical(&self, row: usize) -> bool {
        self.is_directed() || self.src[row] <= self.dst[row]
    }

    fn out_rows(&self, node: usize) -> Range<usize> {
        self.offsets[node]..self.offsets[node + 1]
    }

    /// Iterates `(row, neighbour)` pairs leaving `node`; with `undirected`
    /// set, rows entering `node` on a directed graph are included too.
    pub(crate) fn adjacent_rows(
        &self,
        node: usize,
        undirected: bool,
    ) -> impl Iterator<Item = (usize, usize)> + '_ {
        let outgoing = self.out_rows(node).map(move |row| (row, self.dst[row]));
        let incoming = self
            .reverse
            .as_ref()
            .filter(|_| undirected)
            .into_iter()
            .flat_map(move |reverse| {
                reverse.rows[reverse.offsets[node]..reverse.offsets[node + 1]]
                    .iter()
                    .map(move |&row| (row, self.src[row]))
            });
        outgoing.chain(incoming)
    }

    /// Reads one length per row from the `attribute` column.
    ///
    /// Rows are read in storage order. The mirrored row of an undirected edge
    /// always sorts after its logical row, so the first offending row is the
    /// same edge the reference backend reports.
    pub(crate) fn row_lengths(&self, attribute: &str) -> Result<Vec<f64>> {
        let column = self.edge_columns.get(attribute);
        (0..self.src.len())
            .map(|row| {
                edge_length(
                    column.and_then(|values| values[row].as_ref()),
                    self.node_ids[self.src[row]],
                    self.node_ids[self.dst[row]],
                    attribute,
                )
            })
            .collect()
    }

    /// Returns the subgraph induced by the nodes whose `keep` flag is set.
    pub(crate) fn induced(&self, keep: &[bool]) -> Self {
        let mut remap = vec![None; self.node_ids.len()];
        let mut node_ids = Vec::new();
        for (index, (&node, _)) in self
            .node_ids
            .iter()
            .zip(keep)
            .enumerate()
            .filter(|(_, (_, kept))| **kept)
        {
            remap[index] = Some(node_ids.len());
            node_ids.push(node);
        }

        let rows: Vec<(usize, usize, usize)> = (0..self.src.len())
            .filter_map(|row| Some((row, remap[self.src[row]]?, remap[self.dst[row]]?)))
            .collect();
        let src = rows.iter().map(|&(_, source, _)| source).collect();
        let dst = rows.iter().map(|&(_, _, target)| target).collect();
        let keys = self
            .keys
            .as_ref()
            .map(|keys| rows.iter().map(|&(row, _, _)| keys[row]).collect());
        let edge_columns = select_columns(
            &self.edge_columns,
            &rows.iter().map(|&(row, _, _)| row).collect::<Vec<_>>(),
        );
        let kept_nodes: Vec<usize> = remap
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.map(|_| index))
            .collect();
        let node_columns = select_columns(&self.node_columns, &kept_nodes);

        Self::assemble(
            self.kind,
            node_ids,
            node_columns,
            src,
            dst,
            keys,
            edge_columns,
        )
    }

    /// Wraps the graph for interface parity with reference graphs.
    #[must_use]
    pub fn into_compat(self) -> CompatGraph {
        CompatGraph::new(self)
    }
}

fn csr_offsets(node_count: usize, heads: &[usize]) -> Vec<usize> {
    let mut offsets = vec![0; node_count + 1];
    for &head in heads {
        offsets[head + 1] += 1;
    }
    for index in 1..=node_count {
        offsets[index] += offsets[index - 1];
    }
    offsets
}

fn gather(columns: &BTreeMap<String, Column>, row: usize) -> Attrs {
    columns
        .iter()
        .filter_map(|(name, values)| {
            values[row]
                .as_ref()
                .map(|value| (name.clone(), value.clone()))
        })
        .collect()
}

/// Keeps the listed rows of every column, dropping columns left empty.
fn select_columns(columns: &BTreeMap<String, Column>, rows: &[usize]) -> BTreeMap<String, Column> {
    columns
        .iter()
        .map(|(name, values)| {
            let selected: Column = rows.iter().map(|&row| values[row].clone()).collect();
            (name.clone(), selected)
        })
        .filter(|(_, values)| values.iter().any(Option::is_some))
        .collect()
}

/// Checks whether the compact backend can run an ego-graph query.
///
/// Weighted queries on the undirected view of a directed multigraph are not
/// supported: the backend does not reduce parallel edges across both
/// directions.
///
/// # Errors
/// Returns [`EgoError::NotImplemented`] for the unsupported combination.
///
/// # Examples
/// ```
/// use egonet_core::{EgoParams, GraphKind, compact};
///
/// let params = EgoParams::new().with_undirected(true).with_distance("weight");
/// assert!(compact::supports(GraphKind::DirectedMulti, &params).is_err());
/// assert!(compact::supports(GraphKind::Directed, &params).is_ok());
/// ```
pub fn supports(kind: GraphKind, params: &EgoParams) -> Result<()> {
    if kind == GraphKind::DirectedMulti && params.undirected() && params.distance().is_some() {
        return Err(EgoError::NotImplemented {
            function: "ego_graph",
            backend: BACKEND_NAME,
            reason: "weighted ego_graph with undirected=true is not supported for directed multigraphs",
        });
    }
    Ok(())
}

/// Extracts the ego graph of `center` using the compact backend.
///
/// # Errors
/// Returns [`EgoError::NotImplemented`] for combinations rejected by
/// [`supports`], [`EgoError::NodeNotFound`] when `center` is absent, and the
/// weight errors described on [`crate::reference::ego_graph`].
///
/// # Examples
/// ```
/// use egonet_core::{AttrPreservation, CompactGraph, EgoParams, Graph, GraphKind, compact};
///
/// let cycle = Graph::cycle_graph(7, GraphKind::Undirected);
/// let compact_cycle = CompactGraph::from_graph(&cycle, AttrPreservation::All);
/// let ego = compact::ego_graph(&compact_cycle, 3, &EgoParams::new())?;
/// assert_eq!(ego.node_ids(), &[2, 3, 4]);
/// assert_eq!(ego.edge_count(), 2);
/// # Ok::<(), egonet_core::EgoError>(())
/// ```
#[instrument(
    name = "compact.ego_graph",
    err,
    skip(graph, params),
    fields(
        kind = %graph.kind(),
        center = center,
        radius = %params.radius(),
        center_included = params.center(),
        undirected = params.undirected(),
        distance = ?params.distance(),
    ),
)]
pub fn ego_graph(graph: &CompactGraph, center: NodeId, params: &EgoParams) -> Result<CompactGraph> {
    supports(graph.kind(), params)?;
    let source = graph.index_of(center).ok_or(EgoError::NodeNotFound {
        node: center,
        search: SearchKind::for_distance(params.distance()),
    })?;
    let mut reached = match params.distance() {
        None => kernels::hop_reach(graph, source, params.radius(), params.undirected()),
        Some(attribute) => {
            let lengths = graph.row_lengths(attribute)?;
            kernels::weighted_reach(
                graph,
                source,
                params.radius(),
                params.undirected(),
                &lengths,
            )
        }
    };
    if !params.center() {
        reached[source] = false;
    }
    let ego = graph.induced(&reached);
    debug!(
        nodes = ego.node_count(),
        edges = ego.edge_count(),
        "compact ego graph extracted"
    );
    Ok(ego)
}
