//! Ego-graph extraction benchmarks.
//!
//! Runs the same query on the reference backend and on the compact backend
//! (with the graph converted once up front) so the two can be compared per
//! graph kind, size and radius.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
#![expect(
    clippy::expect_used,
    reason = "benchmark setup is infallible for valid constants"
)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use egonet_benches::{
    error::BenchSetupError,
    params::EgoBenchParams,
    source::{SyntheticConfig, SyntheticGraph, WEIGHT},
};
use egonet_core::{
    AttrPreservation, CompactGraph, EgoParams, Graph, GraphKind, Radius, compact, reference,
};

/// Seed used for all synthetic graphs in this benchmark.
const SEED: u64 = 42;

/// Graph sizes to benchmark.
const NODE_COUNTS: &[usize] = &[1_000, 10_000];

/// Radii to benchmark; weighted runs reuse them as length budgets.
const RADII: &[f64] = &[2.0, 4.0];

const KINDS: &[GraphKind] = &[GraphKind::Undirected, GraphKind::DirectedMulti];

fn prepare(kind: GraphKind, node_count: usize) -> Result<(Graph, CompactGraph), BenchSetupError> {
    let graph = SyntheticGraph::generate(&SyntheticConfig {
        kind,
        node_count,
        chords_per_node: 2,
        seed: SEED,
    })?
    .into_graph();
    let compact = CompactGraph::from_graph(&graph, AttrPreservation::All);
    Ok((graph, compact))
}

fn bench_queries(c: &mut Criterion, group_name: &str, weighted: bool) {
    let mut group = c.benchmark_group(group_name);
    group.sample_size(20);

    for &kind in KINDS {
        for &node_count in NODE_COUNTS {
            let (graph, compact_graph) =
                prepare(kind, node_count).expect("synthetic graph generation must succeed");
            for &radius in RADII {
                let base = EgoParams::new().with_radius(Radius::Finite(radius));
                let params = if weighted { base.with_distance(WEIGHT) } else { base };
                let bench = EgoBenchParams {
                    kind,
                    node_count,
                    radius,
                };
                group.bench_with_input(
                    BenchmarkId::new("reference", bench),
                    &params,
                    |b, query| {
                        b.iter(|| reference::ego_graph(&graph, 0, query).expect("center exists"));
                    },
                );
                group.bench_with_input(BenchmarkId::new("compact", bench), &params, |b, query| {
                    b.iter(|| compact::ego_graph(&compact_graph, 0, query).expect("center exists"));
                });
            }
        }
    }

    group.finish();
}

fn hop_count(c: &mut Criterion) {
    bench_queries(c, "ego_graph_hops", false);
}

fn weighted(c: &mut Criterion) {
    bench_queries(c, "ego_graph_weighted", true);
}

criterion_group!(benches, hop_count, weighted);
criterion_main!(benches);
