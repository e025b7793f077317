//! Property tests: random small graphs give identical results on both
//! backends.

use egonet_core::{AttrValue, DispatchConfig, Dispatcher, Graph, GraphKind, NodeId, attrs};
use egonet_test_support::{
    ci::property_test_profile::suite_proptest_config,
    equivalence::{EgoQuery, Route, assert_not_implemented, run_alternate, run_reference},
};
use proptest::{
    prelude::*,
    test_runner::{TestCaseError, TestCaseResult},
};
use test_strategy::Arbitrary;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Arbitrary)]
enum KindSeed {
    Undirected,
    Directed,
    #[weight(2)]
    UndirectedMulti,
    #[weight(2)]
    DirectedMulti,
}

impl From<KindSeed> for GraphKind {
    fn from(seed: KindSeed) -> Self {
        match seed {
            KindSeed::Undirected => Self::Undirected,
            KindSeed::Directed => Self::Directed,
            KindSeed::UndirectedMulti => Self::UndirectedMulti,
            KindSeed::DirectedMulti => Self::DirectedMulti,
        }
    }
}

/// Weights and radii are multiples of one half so path sums stay exact.
fn halves(raw: u8) -> f64 {
    f64::from(raw) / 2.0
}

#[derive(Clone, Debug)]
struct EgoCase {
    graph: Graph,
    query: EgoQuery,
}

fn ego_case() -> impl Strategy<Value = EgoCase> {
    (any::<KindSeed>(), 1_i64..=8)
        .prop_flat_map(|(seed, nodes)| {
            let edge = (0..nodes, 0..nodes, prop::option::of(0_u8..=4));
            (
                Just(GraphKind::from(seed)),
                Just(nodes),
                prop::collection::vec(edge, 0..=20),
                0..nodes,
                prop::option::of(0_u8..=8),
                any::<(bool, bool, bool)>(),
            )
        })
        .prop_map(|(kind, nodes, edges, center, radius, (included, undirected, weighted))| {
            let mut graph = Graph::new(kind);
            for node in 0..nodes {
                graph.add_node(node);
            }
            for (source, target, weight) in edges {
                let edge_attrs = weight
                    .map(|raw| attrs([("weight", AttrValue::from(halves(raw)))]))
                    .unwrap_or_default();
                graph.add_edge_with_attrs(source, target, edge_attrs);
            }
            let mut query = EgoQuery::new(center)
                .with_radius(radius.map(halves))
                .with_center_included(included)
                .with_undirected(undirected);
            if weighted {
                query = query.with_distance("weight");
            }
            EgoCase { graph, query }
        })
}

fn check_backends_agree(case: &EgoCase) -> TestCaseResult {
    let dispatcher = Dispatcher::new(DispatchConfig::new());
    let expected = run_reference(&case.graph, &case.query)
        .map_err(|err| TestCaseError::fail(format!("reference failed: {err}")))?;
    for route in Route::ALL {
        let result = run_alternate(&case.graph, &case.query, &dispatcher, route);
        if case.query.is_unsupported_on(case.graph.kind()) {
            assert_not_implemented(result);
            continue;
        }
        let actual = result.map_err(|err| TestCaseError::fail(format!("{route:?} failed: {err}")))?;
        egonet_core::compare_graphs(&expected, &actual)
            .map_err(|mismatch| TestCaseError::fail(format!("{route:?}: {mismatch}")))?;
    }
    Ok(())
}

fn check_ego_is_induced(case: &EgoCase) -> TestCaseResult {
    let ego = run_reference(&case.graph, &case.query)
        .map_err(|err| TestCaseError::fail(err.to_string()))?;
    let center: NodeId = case.query.center;
    prop_assert_eq!(ego.contains_node(center), case.query.center_included);
    for edge in case.graph.edges() {
        let inside = ego.contains_node(edge.source) && ego.contains_node(edge.target);
        let kept = ego
            .parallel_edges(edge.source, edge.target)
            .is_some_and(|bundle| bundle.contains_key(&edge.key));
        prop_assert_eq!(inside, kept, "edge {:?}", (edge.source, edge.target, edge.key));
    }
    Ok(())
}

proptest! {
    #![proptest_config(suite_proptest_config(128))]

    #[test]
    fn backends_agree_on_random_graphs(case in ego_case()) {
        check_backends_agree(&case)?;
    }

    #[test]
    fn ego_graphs_are_induced_subgraphs(case in ego_case()) {
        check_ego_is_induced(&case)?;
    }
}
