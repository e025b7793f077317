//! Command implementations and argument parsing for the egonet CLI.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use egonet_core::{
    AnyGraph, AttrPreservation, AttrValue, Attrs, BackendKind, CompactGraph, DispatchConfig,
    Dispatcher, EdgeKey, EgoError, EgoParams, Graph, GraphKind, GraphMismatch, GraphView, NodeId,
    Radius, attrs, compare_graphs, reference,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{Span, field, info, instrument};

/// Attribute that receives the optional third column of an edge list.
pub const EDGE_LIST_WEIGHT: &str = "weight";

/// Key of the extra `(0, 1)` edge added by `cycle --multi-edges`.
pub const MULTI_EDGE_KEY: EdgeKey = 10;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "egonet", about = "Extract ego graphs on a selectable backend.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Extract the ego graph around one node.
    Ego(EgoCommand),
}

/// Options accepted by the `ego` command.
#[derive(Debug, Args, Clone)]
pub struct EgoCommand {
    /// Center node of the ego graph.
    #[arg(long, allow_negative_numbers = true)]
    pub center: NodeId,

    /// Inclusive radius; accepts `inf`. Omitted means unbounded.
    #[arg(long, allow_negative_numbers = true)]
    pub radius: Option<f64>,

    /// Drop the center from the result.
    #[arg(long = "no-center")]
    pub no_center: bool,

    /// Ignore edge direction while searching.
    #[arg(long)]
    pub undirected: bool,

    /// Edge attribute holding lengths; hop counts are used when omitted.
    #[arg(long)]
    pub distance: Option<String>,

    /// Representation the graph is handed to the dispatcher in.
    #[arg(long, value_enum, default_value_t = InputArg::Reference)]
    pub input: InputArg,

    /// Backend to run on; inferred from the input when omitted.
    #[arg(long, value_parser = parse_backend)]
    pub backend: Option<BackendKind>,

    /// Fall back to the reference backend for unsupported queries.
    #[arg(long)]
    pub fallback: bool,

    /// Return raw compact graphs instead of compat-wrapped ones.
    #[arg(long = "no-compat")]
    pub no_compat: bool,

    /// Also run the reference backend and check both results agree.
    #[arg(long)]
    pub verify: bool,

    /// Output format for the summary.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Graph to query.
    #[command(subcommand)]
    pub source: GraphSource,
}

impl EgoCommand {
    /// Builds the extraction parameters described by the flags.
    ///
    /// # Errors
    /// Returns [`EgoError::InvalidRadius`] for a NaN radius.
    pub fn params(&self) -> Result<EgoParams, EgoError> {
        let params = EgoParams::new()
            .with_radius(Radius::new(self.radius)?)
            .with_center(!self.no_center)
            .with_undirected(self.undirected);
        Ok(match self.distance.as_deref() {
            Some(attribute) => params.with_distance(attribute),
            None => params,
        })
    }

    /// Overlays the command's flags on `base`.
    ///
    /// `--fallback` only ever enables fallback and `--no-compat` only ever
    /// disables wrapping, so the environment still applies when a flag is
    /// absent.
    #[must_use]
    pub fn config(&self, base: DispatchConfig) -> DispatchConfig {
        base.with_fallback_to_reference(base.fallback_to_reference() || self.fallback)
            .with_compat_graphs(base.use_compat_graphs() && !self.no_compat)
    }
}

fn parse_backend(raw: &str) -> Result<BackendKind, EgoError> {
    raw.parse()
}

/// Where the queried graph comes from.
#[derive(Debug, Subcommand, Clone)]
pub enum GraphSource {
    /// Generate a cycle over `0..nodes`.
    Cycle(CycleArgs),
    /// Read a whitespace-separated edge list.
    Edges(EdgesArgs),
}

/// Cycle generator arguments.
#[derive(Debug, Args, Clone)]
pub struct CycleArgs {
    /// Number of nodes in the cycle.
    #[arg(long, default_value_t = 7)]
    pub nodes: usize,

    /// Graph variant to build.
    #[arg(long, value_enum, default_value_t = KindArg::Graph)]
    pub kind: KindArg,

    /// Layer a second directed cycle and a keyed `(0, 1)` edge on multigraphs.
    #[arg(long = "multi-edges")]
    pub multi_edges: bool,
}

/// Edge-list arguments.
#[derive(Debug, Args, Clone)]
pub struct EdgesArgs {
    /// File with one `u v [weight]` edge per line; `#` starts a comment.
    pub path: PathBuf,

    /// Graph variant to build.
    #[arg(long, value_enum, default_value_t = KindArg::Graph)]
    pub kind: KindArg,
}

/// Graph variants selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// Undirected simple graph.
    Graph,
    /// Directed simple graph.
    Digraph,
    /// Undirected multigraph.
    Multigraph,
    /// Directed multigraph.
    Multidigraph,
}

impl From<KindArg> for GraphKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Graph => Self::Undirected,
            KindArg::Digraph => Self::Directed,
            KindArg::Multigraph => Self::UndirectedMulti,
            KindArg::Multidigraph => Self::DirectedMulti,
        }
    }
}

/// Input representations selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputArg {
    /// Reference graph.
    Reference,
    /// Raw compact graph.
    Compact,
    /// Compat-wrapped compact graph.
    Compat,
}

impl InputArg {
    fn wrap(self, graph: &Graph) -> AnyGraph {
        let compact = || CompactGraph::from_graph(graph, AttrPreservation::All);
        match self {
            Self::Reference => AnyGraph::from(graph.clone()),
            Self::Compact => AnyGraph::from(compact()),
            Self::Compat => AnyGraph::from(compact().into_compat()),
        }
    }
}

/// Output formats for [`render_summary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Line-oriented text.
    #[default]
    Text,
    /// A single JSON document.
    Json,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// File I/O failed while loading an edge list.
    #[error("failed to read `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// An edge-list line could not be parsed.
    #[error("invalid edge list at line {line}: {reason}")]
    InvalidEdgeList {
        /// One-based line number.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },
    /// Extraction or dispatch failed.
    #[error(transparent)]
    Core(#[from] EgoError),
    /// `--verify` found the backends disagreeing.
    #[error("backends disagree: {0}")]
    Mismatch(#[from] GraphMismatch),
}

/// Outcome of the `ego` command.
#[derive(Debug, Clone)]
pub struct EgoSummary {
    /// Center node that was queried.
    pub center: NodeId,
    /// Extracted ego graph in the representation the dispatcher returned.
    pub ego: AnyGraph,
    /// Whether the result was checked against the reference backend.
    pub verified: bool,
}

impl EgoSummary {
    /// Label of the returned representation.
    #[must_use]
    pub fn representation(&self) -> &'static str {
        match self.ego {
            AnyGraph::Reference(_) => "reference",
            AnyGraph::Compact(_) => "compact",
            AnyGraph::Compat(_) => "compat",
        }
    }
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading the graph, extraction or verification
/// fails.
///
/// # Examples
/// ```
/// use clap::Parser;
/// use egonet_cli::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from([
///     "egonet", "ego", "--center", "0", "--radius", "1", "--backend", "compact",
///     "cycle", "--nodes", "7",
/// ]);
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.ego.node_count(), 3);
/// assert_eq!(summary.representation(), "compat");
/// # Ok::<(), egonet_cli::cli::CliError>(())
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<EgoSummary, CliError> {
    match cli.command {
        Command::Ego(ego) => {
            Span::current().record("command", field::display("ego"));
            let config = ego.config(DispatchConfig::from_env()?);
            run_ego(&ego, config)
        }
    }
}

#[instrument(
    name = "cli.ego",
    err,
    skip(command, config),
    fields(source = field::Empty, center = command.center, verify = command.verify),
)]
pub(super) fn run_ego(command: &EgoCommand, config: DispatchConfig) -> Result<EgoSummary, CliError> {
    let graph = load_graph(&command.source)?;
    let params = command.params()?;
    let dispatcher = Dispatcher::new(config);
    let input = command.input.wrap(&graph);
    let ego = dispatcher.ego_graph(&input, command.center, &params, command.backend)?;

    if command.verify {
        let expected = reference::ego_graph(&graph, command.center, &params)?;
        compare_graphs(&expected, &ego)?;
    }

    info!(
        nodes = ego.node_count(),
        edges = ego.edge_count(),
        verified = command.verify,
        "command completed"
    );
    Ok(EgoSummary {
        center: command.center,
        ego,
        verified: command.verify,
    })
}

pub(super) fn load_graph(source: &GraphSource) -> Result<Graph, CliError> {
    let span = Span::current();
    match source {
        GraphSource::Cycle(args) => {
            span.record("source", field::display("cycle"));
            Ok(cycle_graph(args))
        }
        GraphSource::Edges(args) => {
            span.record("source", field::display("edges"));
            let reader = open_edge_list(&args.path)?;
            parse_edge_list(reader, args.kind.into())
        }
    }
}

fn cycle_graph(args: &CycleArgs) -> Graph {
    let kind = GraphKind::from(args.kind);
    if args.multi_edges {
        Graph::layered_cycle_graph(args.nodes, kind, MULTI_EDGE_KEY)
    } else {
        Graph::cycle_graph(args.nodes, kind)
    }
}

#[instrument(name = "cli.open_edge_list", err, fields(path = field::Empty))]
pub(super) fn open_edge_list(path: &Path) -> Result<BufReader<File>, CliError> {
    Span::current().record("path", field::display(path.display()));
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Parses `u v [weight]` lines into a graph of `kind`.
///
/// Blank lines and text after `#` are ignored. Integral weights are stored as
/// integers, others as floats, under [`EDGE_LIST_WEIGHT`].
///
/// # Errors
/// Returns [`CliError::InvalidEdgeList`] for malformed lines and
/// [`CliError::Io`] when reading fails.
pub(super) fn parse_edge_list(reader: impl BufRead, kind: GraphKind) -> Result<Graph, CliError> {
    let mut graph = Graph::new(kind);
    for (index, line) in reader.lines().enumerate() {
        let number = index + 1;
        let line = line.map_err(|source| CliError::Io {
            path: PathBuf::from("<edge list>"),
            source,
        })?;
        let content = line.split('#').next().unwrap_or_default();
        let fields: Vec<&str> = content.split_whitespace().collect();
        match fields.as_slice() {
            [] => {}
            [source, target] => {
                graph.add_edge(parse_node(source, number)?, parse_node(target, number)?);
            }
            [source, target, weight] => {
                let weight = parse_weight(weight, number)?;
                graph.add_edge_with_attrs(
                    parse_node(source, number)?,
                    parse_node(target, number)?,
                    attrs([(EDGE_LIST_WEIGHT, weight)]),
                );
            }
            other => {
                return Err(CliError::InvalidEdgeList {
                    line: number,
                    reason: format!("expected 2 or 3 fields, found {}", other.len()),
                });
            }
        }
    }
    Ok(graph)
}

fn parse_node(raw: &str, line: usize) -> Result<NodeId, CliError> {
    raw.parse().map_err(|_| CliError::InvalidEdgeList {
        line,
        reason: format!("`{raw}` is not a node id"),
    })
}

fn parse_weight(raw: &str, line: usize) -> Result<AttrValue, CliError> {
    if let Ok(value) = raw.parse::<i64>() {
        return Ok(AttrValue::from(value));
    }
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(AttrValue::from)
        .ok_or_else(|| CliError::InvalidEdgeList {
            line,
            reason: format!("`{raw}` is not a finite number"),
        })
}

#[derive(Serialize)]
struct JsonSummary {
    representation: &'static str,
    kind: &'static str,
    center: NodeId,
    verified: bool,
    nodes: Vec<JsonNode>,
    edges: Vec<JsonEdge>,
}

#[derive(Serialize)]
struct JsonNode {
    id: NodeId,
    attrs: serde_json::Map<String, serde_json::Value>,
}

#[derive(Serialize)]
struct JsonEdge {
    source: NodeId,
    target: NodeId,
    key: EdgeKey,
    attrs: serde_json::Map<String, serde_json::Value>,
}

fn json_attrs(attrs: &Attrs) -> serde_json::Map<String, serde_json::Value> {
    attrs
        .iter()
        .map(|(name, value)| {
            let json = match value {
                AttrValue::Int(value) => serde_json::Value::from(*value),
                AttrValue::Float(value) => serde_json::Value::from(*value),
                AttrValue::Text(value) => serde_json::Value::from(value.as_str()),
                AttrValue::Bool(value) => serde_json::Value::from(*value),
            };
            (name.clone(), json)
        })
        .collect()
}

fn text_attrs(attrs: &Attrs) -> String {
    let pairs: Vec<String> = attrs
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect();
    pairs.join(",")
}

/// Renders `summary` to `writer` in the requested format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// use egonet_cli::cli::{EgoSummary, OutputFormat, render_summary};
/// use egonet_core::{AnyGraph, Graph, GraphKind};
///
/// let summary = EgoSummary {
///     center: 0,
///     ego: AnyGraph::from(Graph::path_graph(2, GraphKind::Directed)),
///     verified: false,
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, OutputFormat::Text, &mut buffer)?;
/// let text = String::from_utf8(buffer).expect("output is UTF-8");
/// assert!(text.contains("edge\t0\t1\t0\t"));
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn render_summary(
    summary: &EgoSummary,
    format: OutputFormat,
    mut writer: impl Write,
) -> io::Result<()> {
    let nodes = summary.ego.node_entries();
    let edges = summary.ego.edge_entries();
    match format {
        OutputFormat::Text => {
            writeln!(writer, "representation: {}", summary.representation())?;
            writeln!(writer, "kind: {}", summary.ego.kind())?;
            writeln!(writer, "center: {}", summary.center)?;
            writeln!(writer, "verified: {}", summary.verified)?;
            writeln!(writer, "nodes: {}", nodes.len())?;
            writeln!(writer, "edges: {}", edges.len())?;
            for (node, attrs) in &nodes {
                writeln!(writer, "node\t{node}\t{}", text_attrs(attrs))?;
            }
            for (edge, attrs) in &edges {
                writeln!(
                    writer,
                    "edge\t{}\t{}\t{}\t{}",
                    edge.source,
                    edge.target,
                    edge.key,
                    text_attrs(attrs)
                )?;
            }
        }
        OutputFormat::Json => {
            let document = JsonSummary {
                representation: summary.representation(),
                kind: summary.ego.kind().as_str(),
                center: summary.center,
                verified: summary.verified,
                nodes: nodes
                    .iter()
                    .map(|(&id, attrs)| JsonNode {
                        id,
                        attrs: json_attrs(attrs),
                    })
                    .collect(),
                edges: edges
                    .iter()
                    .map(|(edge, attrs)| JsonEdge {
                        source: edge.source,
                        target: edge.target,
                        key: edge.key,
                        attrs: json_attrs(attrs),
                    })
                    .collect(),
            };
            serde_json::to_writer_pretty(&mut writer, &document)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
