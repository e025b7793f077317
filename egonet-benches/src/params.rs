//! Benchmark parameter types.

use std::fmt;

use egonet_core::GraphKind;

/// Parameters for one ego-graph benchmark run.
#[derive(Clone, Copy, Debug)]
pub struct EgoBenchParams {
    /// Graph variant.
    pub kind: GraphKind,
    /// Number of nodes in the graph.
    pub node_count: usize,
    /// Search radius in hops or length units.
    pub radius: f64,
}

impl fmt::Display for EgoBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},n={},r={}", self.kind, self.node_count, self.radius)
    }
}

/// Parameters for a conversion benchmark run.
#[derive(Clone, Copy, Debug)]
pub struct ConversionBenchParams {
    /// Graph variant.
    pub kind: GraphKind,
    /// Number of nodes in the graph.
    pub node_count: usize,
}

impl fmt::Display for ConversionBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},n={}", self.kind, self.node_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_compact() {
        let params = EgoBenchParams {
            kind: GraphKind::DirectedMulti,
            node_count: 1_000,
            radius: 2.5,
        };
        assert_eq!(params.to_string(), "multidigraph,n=1000,r=2.5");
    }
}
