//! Frontier kernels for the compact backend.
//!
//! Both kernels advance a whole frontier per round. With the `parallel`
//! feature the per-round expansion fans out over Rayon; results are sorted
//! before they are applied so every round is deterministic.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::CompactGraph;
use crate::Radius;

/// Level-synchronous breadth-first search.
///
/// Returns one flag per node index, set for every node within `radius` hops
/// of `source`.
pub(super) fn hop_reach(
    graph: &CompactGraph,
    source: usize,
    radius: Radius,
    undirected: bool,
) -> Vec<bool> {
    let mut reached = vec![false; graph.node_count()];
    reached[source] = true;
    let mut frontier = vec![source];
    let mut depth = 0_usize;
    while !frontier.is_empty() {
        depth += 1;
        if !radius.admits(depth as f64) {
            break;
        }
        let mut next = expand(graph, &frontier, undirected);
        next.sort_unstable();
        next.dedup();
        next.retain(|&node| !reached[node]);
        for &node in &next {
            reached[node] = true;
        }
        frontier = next;
    }
    reached
}

#[cfg(feature = "parallel")]
fn expand(graph: &CompactGraph, frontier: &[usize], undirected: bool) -> Vec<usize> {
    frontier
        .par_iter()
        .flat_map_iter(|&node| {
            graph
                .adjacent_rows(node, undirected)
                .map(|(_, neighbour)| neighbour)
        })
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn expand(graph: &CompactGraph, frontier: &[usize], undirected: bool) -> Vec<usize> {
    frontier
        .iter()
        .flat_map(|&node| {
            graph
                .adjacent_rows(node, undirected)
                .map(|(_, neighbour)| neighbour)
        })
        .collect()
}

/// Frontier Bellman-Ford over non-negative row lengths.
///
/// Only improvements that stay within `radius` are accepted, so nodes beyond
/// the radius never enter a frontier. Returns one flag per node index, set
/// for every node whose shortest distance from `source` is within `radius`.
pub(super) fn weighted_reach(
    graph: &CompactGraph,
    source: usize,
    radius: Radius,
    undirected: bool,
    lengths: &[f64],
) -> Vec<bool> {
    let mut distances: Vec<Option<f64>> = vec![None; graph.node_count()];
    distances[source] = Some(0.0);
    let mut frontier = vec![source];
    while !frontier.is_empty() {
        let mut candidates = relax(graph, &frontier, undirected, lengths, &distances);
        candidates.retain(|&(node, distance)| {
            radius.admits(distance) && distances[node].is_none_or(|known| distance < known)
        });
        candidates.sort_unstable_by(|left, right| {
            left.0.cmp(&right.0).then(left.1.total_cmp(&right.1))
        });
        candidates.dedup_by_key(|&mut (node, _)| node);
        frontier = candidates
            .into_iter()
            .map(|(node, distance)| {
                distances[node] = Some(distance);
                node
            })
            .collect();
    }
    distances.iter().map(Option::is_some).collect()
}

#[cfg(feature = "parallel")]
fn relax(
    graph: &CompactGraph,
    frontier: &[usize],
    undirected: bool,
    lengths: &[f64],
    distances: &[Option<f64>],
) -> Vec<(usize, f64)> {
    frontier
        .par_iter()
        .flat_map_iter(|&node| candidates_from(graph, node, undirected, lengths, distances))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn relax(
    graph: &CompactGraph,
    frontier: &[usize],
    undirected: bool,
    lengths: &[f64],
    distances: &[Option<f64>],
) -> Vec<(usize, f64)> {
    frontier
        .iter()
        .flat_map(|&node| candidates_from(graph, node, undirected, lengths, distances))
        .collect()
}

fn candidates_from<'a>(
    graph: &'a CompactGraph,
    node: usize,
    undirected: bool,
    lengths: &'a [f64],
    distances: &'a [Option<f64>],
) -> impl Iterator<Item = (usize, f64)> + 'a {
    distances[node].into_iter().flat_map(move |base| {
        graph
            .adjacent_rows(node, undirected)
            .map(move |(row, neighbour)| (neighbour, base + lengths[row]))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AttrPreservation, AttrValue, Graph, GraphKind, attrs};
    use rstest::rstest;

    fn indices(flags: &[bool]) -> Vec<usize> {
        flags
            .iter()
            .enumerate()
            .filter_map(|(index, &flag)| flag.then_some(index))
            .collect()
    }

    #[rstest]
    #[case(false, vec![0, 1, 2])]
    #[case(true, vec![0, 1, 2, 4, 5])]
    fn hop_reach_respects_direction(#[case] undirected: bool, #[case] expected: Vec<usize>) {
        let graph = Graph::cycle_graph(6, GraphKind::Directed);
        let compact = CompactGraph::from_graph(&graph, AttrPreservation::Structure);
        let reached = hop_reach(&compact, 0, Radius::Finite(2.0), undirected);
        assert_eq!(indices(&reached), expected);
    }

    #[test]
    fn weighted_reach_prefers_the_shorter_detour() {
        let mut graph = Graph::new(GraphKind::Directed);
        graph.add_edge_with_attrs(0, 1, attrs([("weight", AttrValue::from(5))]));
        graph.add_edge_with_attrs(0, 2, attrs([("weight", AttrValue::from(1))]));
        graph.add_edge_with_attrs(2, 1, attrs([("weight", AttrValue::from(1))]));
        graph.add_edge_with_attrs(1, 3, attrs([("weight", AttrValue::from(1))]));
        let compact = CompactGraph::from_graph(&graph, AttrPreservation::All);
        let lengths = compact.row_lengths("weight").expect("lengths are valid");
        let reached = weighted_reach(&compact, 0, Radius::Finite(3.0), false, &lengths);
        assert_eq!(indices(&reached), vec![0, 1, 2, 3]);
        let tight = weighted_reach(&compact, 0, Radius::Finite(2.0), false, &lengths);
        assert_eq!(indices(&tight), vec![0, 1, 2]);
    }

    #[test]
    fn zero_radius_keeps_only_the_source() {
        let compact = CompactGraph::from_graph(
            &Graph::cycle_graph(4, GraphKind::Undirected),
            AttrPreservation::Structure,
        );
        let lengths = vec![0.0; 8];
        assert_eq!(indices(&hop_reach(&compact, 2, Radius::Finite(0.0), false)), vec![2]);
        assert_eq!(
            indices(&weighted_reach(&compact, 2, Radius::Finite(-1.0), false, &lengths)),
            vec![2]
        );
    }
}
