//! Reference ego-graph algorithm.
//!
//! Hop-count queries run a breadth-first search; weighted queries run
//! Dijkstra over the minimum parallel-edge length. Both searches stop
//! expanding once the next distance would leave the radius, and the result is
//! the subgraph of the input induced by every reached node.

use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet, BinaryHeap, VecDeque},
};

use tracing::{debug, instrument};

use crate::{
    EgoParams, Result,
    error::{EgoError, SearchKind},
    graph::{Graph, NodeId},
    weights::edge_length,
};

/// Extracts the ego graph of `center` from `graph`.
///
/// The result has the same [`crate::GraphKind`] as the input and carries
/// every node and edge attribute of the included elements.
///
/// # Errors
/// Returns [`EgoError::NodeNotFound`] when `center` is absent, and
/// [`EgoError::NegativeWeight`] or [`EgoError::NonNumericWeight`] when a
/// distance attribute is requested and some edge carries an invalid length.
///
/// # Examples
/// ```
/// use egonet_core::{EgoParams, Graph, GraphKind, Radius, reference};
///
/// let cycle = Graph::cycle_graph(7, GraphKind::Undirected);
/// let ego = reference::ego_graph(&cycle, 3, &EgoParams::new())?;
/// assert_eq!(ego.nodes().collect::<Vec<_>>(), vec![2, 3, 4]);
/// assert_eq!(ego.edge_count(), 2);
///
/// let lone = reference::ego_graph(&cycle, 3, &EgoParams::new().with_radius(Radius::Finite(0.0)))?;
/// assert_eq!(lone.node_count(), 1);
/// assert_eq!(lone.edge_count(), 0);
/// # Ok::<(), egonet_core::EgoError>(())
/// ```
#[instrument(
    name = "reference.ego_graph",
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
pub fn ego_graph(graph: &Graph, center: NodeId, params: &EgoParams) -> Result<Graph> {
    let reached = match params.distance() {
        None => hop_reach(graph, center, params)?,
        Some(attribute) => weighted_reach(graph, center, params, attribute)?,
    };
    let mut ego = graph.subgraph(&reached);
    if !params.center() {
        ego.remove_node(center);
    }
    debug!(
        nodes = ego.node_count(),
        edges = ego.edge_count(),
        "reference ego graph extracted"
    );
    Ok(ego)
}

fn adjacent(graph: &Graph, node: NodeId, undirected: bool) -> BTreeSet<NodeId> {
    if undirected {
        graph.neighbors(node)
    } else {
        graph.successors(node).collect()
    }
}

fn hop_reach(graph: &Graph, center: NodeId, params: &EgoParams) -> Result<BTreeSet<NodeId>> {
    if !graph.contains_node(center) {
        return Err(EgoError::NodeNotFound {
            node: center,
            search: SearchKind::HopCount,
        });
    }
    let radius = params.radius();
    let mut seen = BTreeSet::from([center]);
    let mut queue = VecDeque::from([(center, 0_usize)]);
    while let Some((node, depth)) = queue.pop_front() {
        let next = depth + 1;
        if !radius.admits(next as f64) {
            continue;
        }
        for neighbour in adjacent(graph, node, params.undirected()) {
            if seen.insert(neighbour) {
                queue.push_back((neighbour, next));
            }
        }
    }
    Ok(seen)
}

/// Heap entry ordered so that [`BinaryHeap`] pops the smallest distance first.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Tentative {
    distance: f64,
    node: NodeId,
}

impl Eq for Tentative {}

impl Ord for Tentative {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Tentative {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn weighted_reach(
    graph: &Graph,
    center: NodeId,
    params: &EgoParams,
    attribute: &str,
) -> Result<BTreeSet<NodeId>> {
    if !graph.contains_node(center) {
        return Err(EgoError::NodeNotFound {
            node: center,
            search: SearchKind::Weighted,
        });
    }
    for edge in graph.edges() {
        edge_length(edge.attrs.get(attribute), edge.source, edge.target, attribute)?;
    }

    let radius = params.radius();
    let mut settled = BTreeSet::new();
    let mut best = BTreeMap::from([(center, 0.0_f64)]);
    let mut heap = BinaryHeap::from([Tentative {
        distance: 0.0,
        node: center,
    }]);
    while let Some(Tentative { distance, node }) = heap.pop() {
        if !settled.insert(node) {
            continue;
        }
        for neighbour in adjacent(graph, node, params.undirected()) {
            if settled.contains(&neighbour) {
                continue;
            }
            let Some(step) = step_length(graph, node, neighbour, params.undirected(), attribute)?
            else {
                continue;
            };
            let candidate = distance + step;
            if !radius.admits(candidate) {
                continue;
            }
            if best.get(&neighbour).is_none_or(|&known| candidate < known) {
                best.insert(neighbour, candidate);
                heap.push(Tentative {
                    distance: candidate,
                    node: neighbour,
                });
            }
        }
    }
    Ok(settled)
}

/// Shortest single-step length from `from` to `to`, over all parallel edges
/// and, for the undirected view of a directed graph, both directions.
fn step_length(
    graph: &Graph,
    from: NodeId,
    to: NodeId,
    undirected: bool,
    attribute: &str,
) -> Result<Option<f64>> {
    let forward = graph
        .parallel_edges(from, to)
        .into_iter()
        .flat_map(|bundle| bundle.values().map(move |attrs| (from, to, attrs)));
    let backward = graph
        .parallel_edges(to, from)
        .filter(|_| undirected && graph.is_directed())
        .into_iter()
        .flat_map(|bundle| bundle.values().map(move |attrs| (to, from, attrs)));
    let mut shortest: Option<f64> = None;
    for (tail, head, attrs) in forward.chain(backward) {
        let length = edge_length(attrs.get(attribute), tail, head, attribute)?;
        shortest = Some(shortest.map_or(length, |known| known.min(length)));
    }
    Ok(shortest)
}
