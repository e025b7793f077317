//! Seeded synthetic graphs for benchmarking.
//!
//! A [`SyntheticGraph`] is a ring over `0..node_count` with random chords
//! layered on top. Every edge carries a `weight` drawn from half-unit steps,
//! so weighted searches see varied but exactly representable lengths.

use egonet_core::{AttrValue, Graph, GraphKind, NodeId, attrs};
use rand::{Rng, SeedableRng, rngs::SmallRng, seq::SliceRandom};

/// Attribute holding each synthetic edge's length.
pub const WEIGHT: &str = "weight";

const WEIGHTS: [f64; 8] = [0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0];

/// Errors that may occur during synthetic graph generation.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum SyntheticError {
    /// The requested node count was zero.
    #[error("node count must be greater than zero")]
    ZeroNodes,
    /// The requested node count does not fit a node id.
    #[error("node count {0} exceeds the node id range")]
    TooManyNodes(usize),
}

/// Configuration for synthetic graph generation.
#[derive(Clone, Copy, Debug)]
pub struct SyntheticConfig {
    /// Graph variant to build.
    pub kind: GraphKind,
    /// Number of nodes.
    pub node_count: usize,
    /// Random chords added per node on top of the ring.
    pub chords_per_node: usize,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// A seeded random graph.
///
/// # Examples
/// ```
/// use egonet_benches::source::{SyntheticConfig, SyntheticGraph};
/// use egonet_core::GraphKind;
///
/// let config = SyntheticConfig {
///     kind: GraphKind::Directed,
///     node_count: 10,
///     chords_per_node: 2,
///     seed: 42,
/// };
/// let graph = SyntheticGraph::generate(&config).expect("valid config");
/// assert_eq!(graph.graph().node_count(), 10);
/// ```
#[derive(Clone, Debug)]
pub struct SyntheticGraph {
    graph: Graph,
}

impl SyntheticGraph {
    /// Generates the graph eagerly from `config`.
    ///
    /// # Errors
    /// Returns [`SyntheticError::ZeroNodes`] for an empty graph and
    /// [`SyntheticError::TooManyNodes`] when ids would overflow.
    pub fn generate(config: &SyntheticConfig) -> Result<Self, SyntheticError> {
        if config.node_count == 0 {
            return Err(SyntheticError::ZeroNodes);
        }
        let count = NodeId::try_from(config.node_count)
            .map_err(|_| SyntheticError::TooManyNodes(config.node_count))?;

        let mut rng = SmallRng::seed_from_u64(config.seed);
        let mut graph = Graph::new(config.kind);
        for node in 0..count {
            graph.add_node(node);
        }
        for node in 0..count {
            let next = if node + 1 == count { 0 } else { node + 1 };
            graph.add_edge_with_attrs(node, next, weighted(&mut rng));
            for _ in 0..config.chords_per_node {
                let target = rng.gen_range(0..count);
                graph.add_edge_with_attrs(node, target, weighted(&mut rng));
            }
        }
        Ok(Self { graph })
    }

    /// Returns the generated graph.
    #[must_use]
    pub const fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Consumes the wrapper and returns the graph.
    #[must_use]
    pub fn into_graph(self) -> Graph {
        self.graph
    }
}

fn weighted(rng: &mut SmallRng) -> egonet_core::Attrs {
    let weight = WEIGHTS.choose(rng).copied().unwrap_or(1.0);
    attrs([(WEIGHT, AttrValue::from(weight))])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn config(kind: GraphKind, node_count: usize) -> SyntheticConfig {
        SyntheticConfig {
            kind,
            node_count,
            chords_per_node: 3,
            seed: 7,
        }
    }

    #[test]
    fn empty_graphs_are_rejected() {
        let err = SyntheticGraph::generate(&config(GraphKind::Undirected, 0))
            .expect_err("zero nodes is invalid");
        assert_eq!(err, SyntheticError::ZeroNodes);
    }

    #[rstest]
    #[case(GraphKind::Undirected)]
    #[case(GraphKind::Directed)]
    #[case(GraphKind::UndirectedMulti)]
    #[case(GraphKind::DirectedMulti)]
    fn generation_is_seeded(#[case] kind: GraphKind) {
        let first = SyntheticGraph::generate(&config(kind, 50)).expect("valid config");
        let second = SyntheticGraph::generate(&config(kind, 50)).expect("valid config");
        assert_eq!(first.graph(), second.graph());
        assert_eq!(first.graph().node_count(), 50);
    }

    #[test]
    fn multigraphs_keep_every_edge() {
        let graph = SyntheticGraph::generate(&config(GraphKind::DirectedMulti, 20))
            .expect("valid config")
            .into_graph();
        assert_eq!(graph.edge_count(), 20 * 4);
        assert!(graph.edges().all(|edge| edge.attrs.contains_key(WEIGHT)));
    }
}
