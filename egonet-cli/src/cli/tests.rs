//! Unit tests for the CLI commands and edge-list ingestion.

use super::commands::{load_graph, open_edge_list, parse_edge_list, run_ego};
use super::{
    Cli, CliError, Command, EgoCommand, EgoSummary, GraphSource, InputArg, KindArg,
    MULTI_EDGE_KEY, OutputFormat, render_summary,
};

use std::io::Cursor;
use std::path::{Path, PathBuf};

use clap::Parser;
use egonet_core::{
    AnyGraph, AttrValue, BackendKind, DispatchConfig, EgoError, EgoErrorCode, Graph, GraphKind,
    Radius,
};
use egonet_test_support::tracing::RecordingLayer;
use rstest::rstest;
use tempfile::TempDir;
use tracing_subscriber::layer::SubscriberExt;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn ego_command(args: &[&str]) -> EgoCommand {
    let argv = ["egonet", "ego"].into_iter().chain(args.iter().copied());
    match Cli::try_parse_from(argv).expect("arguments must parse").command {
        Command::Ego(ego) => ego,
    }
}

fn write_edge_list(dir: &TempDir, contents: &str) -> std::io::Result<PathBuf> {
    let path = dir.path().join("edges.txt");
    std::fs::write(&path, contents)?;
    Ok(path)
}

fn rendered(summary: &EgoSummary, format: OutputFormat) -> String {
    let mut buffer = Vec::new();
    render_summary(summary, format, &mut buffer).expect("rendering into memory succeeds");
    String::from_utf8(buffer).expect("output is UTF-8")
}

#[test]
fn parses_negative_centers_and_infinite_radii() {
    let ego = ego_command(&[
        "--center", "-3", "--radius", "inf", "--backend", " Compact ", "--no-center", "cycle",
    ]);
    assert_eq!(ego.center, -3);
    assert_eq!(ego.backend, Some(BackendKind::Compact));
    let params = ego.params().expect("radius is valid");
    assert_eq!(params.radius(), Radius::Unbounded);
    assert!(!params.center());
    assert_eq!(ego.format, OutputFormat::Text);
    assert_eq!(ego.input, InputArg::Reference);
}

#[test]
fn rejects_unknown_backends() {
    let err = Cli::try_parse_from(["egonet", "ego", "--center", "0", "--backend", "gpu", "cycle"])
        .expect_err("gpu is not a backend");
    assert!(err.to_string().contains("unknown backend `gpu`"));
}

#[rstest]
#[case::defaults(&[], DispatchConfig::new(), false, true)]
#[case::flags(&["--fallback", "--no-compat"], DispatchConfig::new(), true, false)]
#[case::environment_kept(
    &[],
    DispatchConfig::new().with_fallback_to_reference(true).with_compat_graphs(false),
    true,
    false
)]
fn flags_overlay_the_environment(
    #[case] flags: &[&str],
    #[case] base: DispatchConfig,
    #[case] fallback: bool,
    #[case] compat: bool,
) {
    let mut args = vec!["--center", "0"];
    args.extend_from_slice(flags);
    args.push("cycle");
    let config = ego_command(&args).config(base);
    assert_eq!(config.fallback_to_reference(), fallback);
    assert_eq!(config.use_compat_graphs(), compat);
}

#[rstest]
#[case::compat(&["--backend", "compact"], "compat")]
#[case::raw(&["--backend", "compact", "--no-compat"], "compact")]
#[case::reference(&[], "reference")]
#[case::compact_input(&["--input", "compact"], "compact")]
#[case::compat_input(&["--input", "compat"], "compat")]
fn representation_follows_input_and_flags(#[case] flags: &[&str], #[case] expected: &str) {
    let mut args = vec!["--center", "0", "--radius", "1", "--verify"];
    args.extend_from_slice(flags);
    args.extend_from_slice(&["cycle", "--nodes", "7"]);
    let command = ego_command(&args);
    let summary = run_ego(&command, command.config(DispatchConfig::new())).expect("query runs");
    assert_eq!(summary.representation(), expected);
    assert!(summary.verified);
    assert_eq!(summary.ego.node_count(), 3);
    assert_eq!(summary.ego.edge_count(), 2);
}

#[rstest]
#[case::fallback(&["--fallback"], Ok("reference"))]
#[case::declined(&[], Err(EgoErrorCode::NotImplemented))]
fn unsupported_queries_fall_back_only_when_asked(
    #[case] flags: &[&str],
    #[case] expected: Result<&str, EgoErrorCode>,
) {
    let mut args = vec![
        "--center",
        "0",
        "--radius",
        "1",
        "--input",
        "compact",
        "--undirected",
        "--distance",
        "weight",
    ];
    args.extend_from_slice(flags);
    args.extend_from_slice(&["cycle", "--kind", "multidigraph", "--multi-edges"]);
    let command = ego_command(&args);
    let outcome = run_ego(&command, command.config(DispatchConfig::new()));
    match (outcome, expected) {
        (Ok(summary), Ok(representation)) => {
            assert_eq!(summary.representation(), representation);
            assert_eq!(summary.ego.node_count(), 3);
        }
        (Err(CliError::Core(err)), Err(code)) => assert_eq!(err.code(), code),
        (other, _) => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn missing_centers_surface_core_errors() {
    let command = ego_command(&["--center", "99", "--backend", "compact", "cycle"]);
    let err = run_ego(&command, DispatchConfig::new()).expect_err("99 is not in the cycle");
    assert!(matches!(
        err,
        CliError::Core(EgoError::NodeNotFound { node: 99, .. })
    ));
}

#[test]
fn multi_edge_cycles_carry_the_extra_key() -> TestResult {
    let command = ego_command(&["--center", "0", "cycle", "--kind", "multigraph", "--multi-edges"]);
    let graph = load_graph(&command.source)?;
    assert_eq!(graph.kind(), GraphKind::UndirectedMulti);
    assert_eq!(graph.edge_count(), 15);
    let keys: Vec<u64> = graph
        .parallel_edges(0, 1)
        .map(|bundle| bundle.keys().copied().collect())
        .unwrap_or_default();
    assert_eq!(keys, vec![0, 1, MULTI_EDGE_KEY]);
    Ok(())
}

#[test]
fn single_node_multi_edge_cycle_is_a_self_loop() -> TestResult {
    let command = ego_command(&[
        "--center", "0", "cycle", "--nodes", "1", "--kind", "multidigraph", "--multi-edges",
    ]);
    let graph = load_graph(&command.source)?;
    assert_eq!(graph.nodes().collect::<Vec<_>>(), vec![0]);
    assert_eq!(graph.edge_count(), 1);
    Ok(())
}

#[test]
fn edge_lists_accept_comments_and_weights() -> TestResult {
    let input = "# weighted triangle\n0 1 1\n\n1 2 1.5  # short hop\n0 2 5\n";
    let graph = parse_edge_list(Cursor::new(input), GraphKind::Directed)?;
    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 3);
    let weight = graph
        .parallel_edges(1, 2)
        .and_then(|bundle| bundle.get(&0))
        .and_then(|attrs| attrs.get("weight"))
        .cloned();
    assert_eq!(weight, Some(AttrValue::Float(1.5)));
    Ok(())
}

#[rstest]
#[case::too_many_fields("0 1 2 3\n", 1, "expected 2 or 3 fields")]
#[case::bad_node("0 1\nzero 1\n", 2, "`zero` is not a node id")]
#[case::bad_weight("0 1 heavy\n", 1, "`heavy` is not a finite number")]
#[case::nan_weight("0 1 1\n1 2 NaN\n", 2, "`NaN` is not a finite number")]
#[case::infinite_weight("0 1 inf\n", 1, "`inf` is not a finite number")]
#[case::lonely_node("\n\n7\n", 3, "found 1")]
fn malformed_edge_lists_report_the_line(
    #[case] input: &str,
    #[case] expected_line: usize,
    #[case] fragment: &str,
) {
    let err = parse_edge_list(Cursor::new(input), GraphKind::Undirected)
        .expect_err("input is malformed");
    match err {
        CliError::InvalidEdgeList { line, reason } => {
            assert_eq!(line, expected_line);
            assert!(reason.contains(fragment), "unexpected reason: {reason}");
        }
        other => panic!("expected InvalidEdgeList, got {other:?}"),
    }
}

#[test]
fn weighted_queries_on_edge_lists_agree_across_backends() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_edge_list(&dir, "0 1 1\n1 2 1\n0 2 5\n2 3 0.5\n")?;
    let path_arg = path.to_str().expect("temp paths are UTF-8");
    let command = ego_command(&[
        "--center", "0", "--radius", "2", "--distance", "weight", "--backend", "compact",
        "--verify", "edges", path_arg, "--kind", "digraph",
    ]);
    let summary = run_ego(&command, DispatchConfig::new())?;
    let nodes: Vec<i64> = summary.ego.to_reference().nodes().collect();
    assert_eq!(nodes, vec![0, 1, 2]);
    assert_eq!(summary.ego.edge_count(), 3);
    Ok(())
}

#[test]
fn missing_edge_lists_report_the_path() {
    let path = Path::new("/nonexistent/egonet/edges.txt");
    let err = open_edge_list(path).expect_err("file does not exist");
    match err {
        CliError::Io { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected Io, got {other:?}"),
    }
}

#[test]
fn text_output_lists_nodes_and_edges() {
    let mut graph = Graph::path_graph(2, GraphKind::Directed);
    graph.set_edge_attribute(0, 1, 0, "weight", AttrValue::from(2));
    let summary = EgoSummary {
        center: 0,
        ego: AnyGraph::from(graph),
        verified: true,
    };
    let text = rendered(&summary, OutputFormat::Text);
    let expected = "representation: reference\nkind: digraph\ncenter: 0\nverified: true\n\
                    nodes: 2\nedges: 1\nnode\t0\t\nnode\t1\t\nedge\t0\t1\t0\tweight=2\n";
    assert_eq!(text, expected);
}

#[test]
fn json_output_is_a_single_document() -> TestResult {
    let command = ego_command(&[
        "--center", "1", "--radius", "1", "--backend", "compact", "cycle", "--nodes", "4",
    ]);
    let summary = run_ego(&command, DispatchConfig::new())?;
    let document: serde_json::Value =
        serde_json::from_str(&rendered(&summary, OutputFormat::Json))?;
    assert_eq!(document["representation"], "compat");
    assert_eq!(document["kind"], "graph");
    assert_eq!(document["center"], 1);
    assert_eq!(document["nodes"].as_array().map(Vec::len), Some(3));
    assert_eq!(document["edges"][0]["source"], 0);
    assert_eq!(document["edges"][0]["target"], 1);
    Ok(())
}

#[test]
fn ego_span_records_source_and_center() {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let command = ego_command(&["--center", "2", "cycle", "--kind", "digraph"]);
    tracing::subscriber::with_default(subscriber, || {
        run_ego(&command, DispatchConfig::new()).expect("query runs");
    });

    let span = layer.span_named("cli.ego").expect("cli.ego span must close");
    assert_eq!(span.field("source"), Some("cycle"));
    assert_eq!(span.field("center"), Some("2"));
    assert_eq!(layer.events_with_message("command completed").len(), 1);
    assert!(layer.span_named("dispatch.ego_graph").is_some());
    assert!(matches!(command.source, GraphSource::Cycle(ref args) if args.kind == KindArg::Digraph));
}
