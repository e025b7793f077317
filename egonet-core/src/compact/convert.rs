//! Conversion between [`Graph`] and [`CompactGraph`].

use std::collections::{BTreeMap, BTreeSet};

use tracing::instrument;

use super::{Column, CompactGraph};
use crate::graph::{Attrs, EdgeKey, Graph, NodeId};

/// Which attributes survive conversion into the compact representation.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum AttrPreservation {
    /// Copy every node and edge attribute.
    #[default]
    All,
    /// Keep topology only; attributes are dropped.
    Structure,
}

impl CompactGraph {
    /// Converts a reference graph into the compact representation.
    #[instrument(
        name = "compact.from_graph",
        skip(graph),
        fields(kind = %graph.kind(), nodes = graph.node_count(), edges = graph.edge_count()),
    )]
    #[must_use]
    pub fn from_graph(graph: &Graph, preservation: AttrPreservation) -> Self {
        let node_ids: Vec<NodeId> = graph.nodes().collect();
        let position = |node: NodeId| {
            let (Ok(index) | Err(index)) = node_ids.binary_search(&node);
            index
        };

        let mut rows: Vec<(usize, usize, EdgeKey, &Attrs)> = Vec::new();
        for edge in graph.edges() {
            let (source, target) = (position(edge.source), position(edge.target));
            rows.push((source, target, edge.key, edge.attrs));
            if !graph.is_directed() && source != target {
                rows.push((target, source, edge.key, edge.attrs));
            }
        }
        rows.sort_unstable_by_key(|&(source, target, key, _)| (source, target, key));

        let (node_columns, edge_columns) = match preservation {
            AttrPreservation::All => {
                let node_attrs: Vec<&Attrs> = node_ids
                    .iter()
                    .filter_map(|&node| graph.node_attrs(node))
                    .collect();
                let edge_attrs: Vec<&Attrs> = rows.iter().map(|&(.., attrs)| attrs).collect();
                (columns(&node_attrs), columns(&edge_attrs))
            }
            AttrPreservation::Structure => (BTreeMap::new(), BTreeMap::new()),
        };
        let keys = graph
            .is_multigraph()
            .then(|| rows.iter().map(|&(_, _, key, _)| key).collect());
        let src = rows.iter().map(|&(source, ..)| source).collect();
        let dst = rows.iter().map(|&(_, target, ..)| target).collect();

        Self::assemble(
            graph.kind(),
            node_ids,
            node_columns,
            src,
            dst,
            keys,
            edge_columns,
        )
    }

    /// Materialises the compact graph as a reference [`Graph`].
    #[must_use]
    pub fn to_graph(&self) -> Graph {
        let mut graph = Graph::new(self.kind());
        for &node in self.node_ids() {
            graph.add_node_with_attrs(node, self.node_attrs(node).unwrap_or_default());
        }
        for edge in self.edges() {
            graph.add_edge_with_key(edge.source, edge.target, edge.key, edge.attrs);
        }
        graph
    }
}

/// Pivots row-wise attribute maps into one column per attribute name.
fn columns(rows: &[&Attrs]) -> BTreeMap<String, Column> {
    let names: BTreeSet<&String> = rows.iter().flat_map(|attrs| attrs.keys()).collect();
    names
        .into_iter()
        .map(|name| {
            let values = rows.iter().map(|attrs| attrs.get(name).cloned()).collect();
            (name.clone(), values)
        })
        .collect()
}
