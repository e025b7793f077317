//! Dispatcher routing, output representation and instrumentation.

use egonet_core::{
    AnyGraph, AttrPreservation, BackendKind, CompactGraph, CompatGraph, DispatchConfig,
    Dispatcher, EgoErrorCode, EgoParams, Graph, GraphKind,
};
use egonet_test_support::{equivalence::assert_equivalent, tracing::RecordingLayer};
use rstest::{fixture, rstest};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

#[fixture]
fn cycle() -> Graph {
    Graph::cycle_graph(7, GraphKind::DirectedMulti)
}

fn unsupported_params() -> EgoParams {
    EgoParams::new().with_undirected(true).with_distance("weight")
}

fn with_recording<T>(run: impl FnOnce() -> T) -> (T, RecordingLayer) {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let output = tracing::subscriber::with_default(subscriber, run);
    (output, layer)
}

#[rstest]
#[case::reference_input_compat(Some(BackendKind::Compact), true, "compat")]
#[case::reference_input_raw(Some(BackendKind::Compact), false, "compact")]
#[case::reference_input_reference(None, true, "reference")]
fn reference_inputs_follow_the_wrapping_setting(
    cycle: Graph,
    #[case] backend: Option<BackendKind>,
    #[case] compat: bool,
    #[case] expected: &str,
) {
    let dispatcher = Dispatcher::new(DispatchConfig::new().with_compat_graphs(compat));
    let ego = dispatcher
        .ego_graph(&AnyGraph::from(cycle.clone()), 3, &EgoParams::new(), backend)
        .expect("query is supported");
    let representation = match &ego {
        AnyGraph::Reference(_) => "reference",
        AnyGraph::Compact(_) => "compact",
        AnyGraph::Compat(_) => "compat",
    };
    assert_eq!(representation, expected);
    let direct = egonet_core::reference::ego_graph(&cycle, 3, &EgoParams::new())
        .expect("center exists");
    assert_equivalent(&direct, &ego);
}

#[rstest]
fn compat_results_unwrap_to_compact_graphs(cycle: Graph) {
    let dispatcher = Dispatcher::default();
    let ego = dispatcher
        .ego_graph(
            &AnyGraph::from(cycle.clone()),
            0,
            &EgoParams::new().with_radius(egonet_core::Radius::Unbounded),
            Some(BackendKind::Compact),
        )
        .expect("query is supported");
    let unwrapped: &CompactGraph = ego.as_compat().map(CompatGraph::compact).expect("compat");
    assert_equivalent(&cycle, unwrapped);
}

#[rstest]
fn explicit_reference_backend_accepts_compact_input(cycle: Graph) {
    let compact = CompactGraph::from_graph(&cycle, AttrPreservation::All);
    let ego = Dispatcher::default()
        .ego_graph(
            &AnyGraph::from(compact),
            3,
            &unsupported_params(),
            Some(BackendKind::Reference),
        )
        .expect("reference supports every combination");
    assert_eq!(ego.backend(), BackendKind::Reference);
    assert_eq!(ego.node_count(), 3);
}

#[rstest]
fn dispatch_span_records_selected_backend(cycle: Graph) {
    let input = AnyGraph::from(CompactGraph::from_graph(&cycle, AttrPreservation::All));
    let (result, layer) = with_recording(|| {
        Dispatcher::default().ego_graph(&input, 3, &EgoParams::new(), None)
    });
    result.expect("query is supported");

    let span = layer.span_named("dispatch.ego_graph").expect("dispatch span");
    assert_eq!(span.field("backend"), Some("compact"));
    assert_eq!(span.field("input"), Some("compact"));
    assert_eq!(span.field("center"), Some("3"));
    assert_eq!(span.field("kind"), Some("multidigraph"));
    assert!(layer.span_named("compact.ego_graph").is_some());
    assert!(layer.span_named("reference.ego_graph").is_none());

    let done = layer.events_with_message("ego graph extracted");
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].level, Level::INFO);
    assert_eq!(done[0].field("nodes"), Some("2"));
}

#[rstest]
fn fallback_emits_warning_and_runs_reference(cycle: Graph) {
    let input = AnyGraph::from(CompactGraph::from_graph(&cycle, AttrPreservation::All));
    let dispatcher = Dispatcher::new(DispatchConfig::new().with_fallback_to_reference(true));
    let (result, layer) = with_recording(|| {
        dispatcher.ego_graph(&input, 3, &unsupported_params(), None)
    });
    let ego = result.expect("fallback succeeds");
    assert_eq!(ego.backend(), BackendKind::Reference);

    let warnings = layer.events_with_message("falling back to reference backend");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].level, Level::WARN);
    assert!(
        warnings[0]
            .field("reason")
            .is_some_and(|reason| reason.contains("not implemented by 'compact'"))
    );
    assert!(layer.span_named("reference.ego_graph").is_some());
    assert!(layer.span_named("compact.ego_graph").is_none());
}

#[rstest]
#[case::disabled(false, None)]
#[case::explicit(true, Some(BackendKind::Compact))]
fn unsupported_calls_fail_without_warning(
    cycle: Graph,
    #[case] fallback: bool,
    #[case] backend: Option<BackendKind>,
) {
    let input = AnyGraph::from(CompactGraph::from_graph(&cycle, AttrPreservation::All));
    let dispatcher = Dispatcher::new(DispatchConfig::new().with_fallback_to_reference(fallback));
    let (result, layer) = with_recording(|| {
        dispatcher.ego_graph(&input, 3, &unsupported_params(), backend)
    });
    let err = result.expect_err("compact backend declines");
    assert_eq!(err.code(), EgoErrorCode::NotImplemented);
    assert!(layer.events_with_message("falling back to reference backend").is_empty());
}

#[rstest]
fn missing_center_is_reported_through_the_dispatcher(cycle: Graph) {
    let err = Dispatcher::default()
        .ego_graph(&AnyGraph::from(cycle), -1, &EgoParams::new(), Some(BackendKind::Compact))
        .expect_err("center is missing");
    assert_eq!(err.code(), EgoErrorCode::NodeNotFound);
    assert_eq!(err.to_string(), "source -1 is not in G");
}

#[rstest]
#[case(Some("1"), Some("0"), true, false)]
#[case(Some("off"), None, false, true)]
#[case(None, Some("YES"), false, true)]
fn config_reads_documented_variables(
    #[case] fallback: Option<&str>,
    #[case] compat: Option<&str>,
    #[case] expected_fallback: bool,
    #[case] expected_compat: bool,
) {
    let config = DispatchConfig::from_vars(|name| match name {
        egonet_core::FALLBACK_ENV => fallback.map(str::to_owned),
        egonet_core::COMPAT_ENV => compat.map(str::to_owned),
        _ => None,
    })
    .expect("values are valid");
    assert_eq!(config.fallback_to_reference(), expected_fallback);
    assert_eq!(config.use_compat_graphs(), expected_compat);
}

#[rstest]
fn config_rejects_unknown_values() {
    let err = DispatchConfig::from_vars(|name| {
        (name == "EGONET_USE_COMPAT_GRAPHS").then(|| "sometimes".to_owned())
    })
    .expect_err("value is invalid");
    assert_eq!(err.code(), EgoErrorCode::InvalidConfig);
    assert!(err.to_string().contains("EGONET_USE_COMPAT_GRAPHS"));
}
