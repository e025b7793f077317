//! Backend dispatch.
//!
//! Routes ego-graph calls to the reference or compact backend, converting the
//! input into the selected backend's representation, falling back to the
//! reference backend when configured, and wrapping compact results for
//! callers that started from reference graphs.

use std::{borrow::Cow, fmt, str::FromStr, sync::Arc};

use tracing::{Span, field, info, instrument, warn};

use crate::{
    EgoParams, Result,
    compact::{self, AttrPreservation, CompactGraph, CompatGraph},
    config::DispatchConfig,
    error::EgoError,
    graph::{Graph, GraphKind, NodeId},
    reference,
};

/// Backends an ego-graph call can be routed to.
///
/// # Examples
/// ```
/// use egonet_core::BackendKind;
///
/// let backend: BackendKind = "Compact".parse()?;
/// assert_eq!(backend, BackendKind::Compact);
/// assert_eq!(backend.to_string(), "compact");
/// assert!("gpu".parse::<BackendKind>().is_err());
/// # Ok::<(), egonet_core::EgoError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// The reference implementation over [`Graph`].
    Reference,
    /// The compact columnar implementation over [`CompactGraph`].
    Compact,
}

impl BackendKind {
    /// Every backend, in registration order.
    pub const ALL: [Self; 2] = [Self::Reference, Self::Compact];

    /// Returns the registered backend name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Reference => "reference",
            Self::Compact => compact::BACKEND_NAME,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackendKind {
    type Err = EgoError;

    fn from_str(name: &str) -> Result<Self> {
        let wanted = name.trim();
        Self::ALL
            .into_iter()
            .find(|backend| backend.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| EgoError::UnknownBackend {
                name: Arc::from(name),
            })
    }
}

/// A graph in any backend's representation.
#[derive(Clone, Debug, PartialEq)]
pub enum AnyGraph {
    /// Reference graph.
    Reference(Graph),
    /// Raw compact graph.
    Compact(CompactGraph),
    /// Compatibility-wrapped compact graph.
    Compat(CompatGraph),
}

impl AnyGraph {
    /// Returns the backend that owns this representation.
    #[must_use]
    pub fn backend(&self) -> BackendKind {
        match self {
            Self::Reference(_) => BackendKind::Reference,
            Self::Compact(_) | Self::Compat(_) => BackendKind::Compact,
        }
    }

    /// Graph variant of the wrapped graph.
    #[must_use]
    pub fn kind(&self) -> GraphKind {
        match self {
            Self::Reference(graph) => graph.kind(),
            Self::Compact(graph) => graph.kind(),
            Self::Compat(graph) => graph.kind(),
        }
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        match self {
            Self::Reference(graph) => graph.node_count(),
            Self::Compact(graph) => graph.node_count(),
            Self::Compat(graph) => graph.node_count(),
        }
    }

    /// Number of edges, counting parallel edges separately.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        match self {
            Self::Reference(graph) => graph.edge_count(),
            Self::Compact(graph) => graph.edge_count(),
            Self::Compat(graph) => graph.edge_count(),
        }
    }

    /// Whether `node` is in the graph.
    #[must_use]
    pub fn contains_node(&self, node: NodeId) -> bool {
        match self {
            Self::Reference(graph) => graph.contains_node(node),
            Self::Compact(graph) => graph.contains_node(node),
            Self::Compat(graph) => graph.contains_node(node),
        }
    }

    /// Returns the reference graph, if this is one.
    #[must_use]
    pub fn as_reference(&self) -> Option<&Graph> {
        match self {
            Self::Reference(graph) => Some(graph),
            _ => None,
        }
    }

    /// Returns the raw compact graph, if this is one.
    #[must_use]
    pub fn as_compact(&self) -> Option<&CompactGraph> {
        match self {
            Self::Compact(graph) => Some(graph),
            _ => None,
        }
    }

    /// Returns the compat-wrapped graph, if this is one.
    #[must_use]
    pub fn as_compat(&self) -> Option<&CompatGraph> {
        match self {
            Self::Compat(graph) => Some(graph),
            _ => None,
        }
    }

    /// Converts to a reference graph, borrowing when already one.
    #[must_use]
    pub fn to_reference(&self) -> Cow<'_, Graph> {
        match self {
            Self::Reference(graph) => Cow::Borrowed(graph),
            Self::Compact(graph) => Cow::Owned(graph.to_graph()),
            Self::Compat(graph) => Cow::Owned(graph.to_graph()),
        }
    }

    /// Converts to a compact graph with every attribute preserved, borrowing
    /// when already compact.
    #[must_use]
    pub fn to_compact(&self) -> Cow<'_, CompactGraph> {
        match self {
            Self::Reference(graph) => {
                Cow::Owned(CompactGraph::from_graph(graph, AttrPreservation::All))
            }
            Self::Compact(graph) => Cow::Borrowed(graph),
            Self::Compat(graph) => Cow::Borrowed(graph.compact()),
        }
    }
}

impl From<Graph> for AnyGraph {
    fn from(graph: Graph) -> Self {
        Self::Reference(graph)
    }
}

impl From<CompactGraph> for AnyGraph {
    fn from(graph: CompactGraph) -> Self {
        Self::Compact(graph)
    }
}

impl From<CompatGraph> for AnyGraph {
    fn from(graph: CompatGraph) -> Self {
        Self::Compat(graph)
    }
}

/// Routes ego-graph calls between backends.
///
/// # Examples
/// ```
/// use egonet_core::{AnyGraph, BackendKind, DispatchConfig, Dispatcher, EgoParams, Graph, GraphKind};
///
/// let dispatcher = Dispatcher::new(DispatchConfig::new());
/// let graph = AnyGraph::from(Graph::cycle_graph(7, GraphKind::Undirected));
/// let ego = dispatcher.ego_graph(&graph, 3, &EgoParams::new(), Some(BackendKind::Compact))?;
/// assert!(ego.as_compat().is_some());
/// assert_eq!(ego.node_count(), 3);
/// # Ok::<(), egonet_core::EgoError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Dispatcher {
    config: DispatchConfig,
}

impl Dispatcher {
    /// Builds a dispatcher with an explicit configuration.
    #[must_use]
    pub fn new(config: DispatchConfig) -> Self {
        Self { config }
    }

    /// Builds a dispatcher configured from the process environment.
    ///
    /// # Errors
    /// Propagates [`EgoError::InvalidConfig`] from [`DispatchConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        DispatchConfig::from_env().map(Self::new)
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> DispatchConfig {
        self.config
    }

    /// Extracts the ego graph of `center`.
    ///
    /// With `backend` set the call runs on that backend; otherwise the
    /// backend owning `graph`'s representation is used. When the compact
    /// backend declares the query unsupported, an implicitly selected call
    /// falls back to the reference backend if the configuration allows it and
    /// returns a reference graph. Explicit selections never fall back.
    ///
    /// # Errors
    /// Returns [`EgoError::NotImplemented`] for unsupported compact queries
    /// that do not fall back, and any error raised by the backend itself.
    #[instrument(
        name = "dispatch.ego_graph",
        err,
        skip(self, graph, params),
        fields(
            input = %graph.backend(),
            requested = ?backend,
            backend = field::Empty,
            kind = %graph.kind(),
            center = center,
            radius = %params.radius(),
        ),
    )]
    pub fn ego_graph(
        &self,
        graph: &AnyGraph,
        center: NodeId,
        params: &EgoParams,
        backend: Option<BackendKind>,
    ) -> Result<AnyGraph> {
        let selected = backend.unwrap_or_else(|| graph.backend());
        Span::current().record("backend", selected.name());
        record_dispatch(selected);

        let ego = match selected {
            BackendKind::Reference => self.run_reference(graph, center, params)?,
            BackendKind::Compact => match compact::supports(graph.kind(), params) {
                Ok(()) => self.run_compact(graph, center, params)?,
                Err(err) if backend.is_none() && self.config.fallback_to_reference() => {
                    warn!(reason = %err, "falling back to reference backend");
                    record_fallback();
                    self.run_reference(graph, center, params)?
                }
                Err(err) => return Err(err),
            },
        };
        info!(
            output = %ego.backend(),
            nodes = ego.node_count(),
            edges = ego.edge_count(),
            "ego graph extracted"
        );
        Ok(ego)
    }

    fn run_reference(&self, graph: &AnyGraph, center: NodeId, params: &EgoParams) -> Result<AnyGraph> {
        reference::ego_graph(&graph.to_reference(), center, params).map(AnyGraph::Reference)
    }

    fn run_compact(&self, graph: &AnyGraph, center: NodeId, params: &EgoParams) -> Result<AnyGraph> {
        let ego = compact::ego_graph(&graph.to_compact(), center, params)?;
        Ok(match graph {
            AnyGraph::Compact(_) => AnyGraph::Compact(ego),
            AnyGraph::Compat(_) => AnyGraph::Compat(ego.into_compat()),
            AnyGraph::Reference(_) if self.config.use_compat_graphs() => {
                AnyGraph::Compat(ego.into_compat())
            }
            AnyGraph::Reference(_) => AnyGraph::Compact(ego),
        })
    }
}

#[cfg(feature = "metrics")]
fn record_dispatch(backend: BackendKind) {
    metrics::counter!("egonet_dispatch_total", "backend" => backend.name()).increment(1);
}

#[cfg(not(feature = "metrics"))]
fn record_dispatch(_backend: BackendKind) {}

#[cfg(feature = "metrics")]
fn record_fallback() {
    metrics::counter!("egonet_fallback_total").increment(1);
}

#[cfg(not(feature = "metrics"))]
fn record_fallback() {}
