//! Equivalence harness for ego-graph backends.
//!
//! Builds the fixture graphs, runs the same query through the reference and
//! compact backends, and asserts that results, errors and fallbacks line up.

use std::fmt::Debug;

use egonet_core::{
    AnyGraph, AttrPreservation, BackendKind, CompactGraph, Dispatcher, EgoError, EgoParams, Graph,
    GraphKind, GraphView, NodeId, Radius, Result, compare_graphs, reference,
};

/// Key of the extra parallel edge added to multigraph fixtures.
pub const EXTRA_EDGE_KEY: u64 = 10;

/// Builds a cycle over `0..base_cycle_size` of the given kind.
///
/// With `add_multi_edges` set the cycle comes from
/// [`Graph::layered_cycle_graph`] with [`EXTRA_EDGE_KEY`]. Simple kinds and
/// single-node cycles ignore the flag.
///
/// # Examples
/// ```
/// use egonet_core::GraphKind;
/// use egonet_test_support::equivalence::construct_graph;
///
/// assert_eq!(construct_graph(7, GraphKind::Directed, true).edge_count(), 7);
/// assert_eq!(construct_graph(7, GraphKind::DirectedMulti, true).edge_count(), 15);
/// ```
#[must_use]
pub fn construct_graph(base_cycle_size: usize, kind: GraphKind, add_multi_edges: bool) -> Graph {
    if add_multi_edges {
        Graph::layered_cycle_graph(base_cycle_size, kind, EXTRA_EDGE_KEY)
    } else {
        Graph::cycle_graph(base_cycle_size, kind)
    }
}

/// One ego-graph query as the harness parametrises it.
#[derive(Clone, Debug, PartialEq)]
pub struct EgoQuery {
    /// Center node.
    pub center: NodeId,
    /// Radius; `None` means unbounded.
    pub radius: Option<f64>,
    /// Whether the center stays in the result.
    pub center_included: bool,
    /// Whether reachability ignores edge direction.
    pub undirected: bool,
    /// Distance attribute; `None` counts hops.
    pub distance: Option<String>,
}

impl EgoQuery {
    /// Query for `center` with radius 1 and the remaining defaults.
    #[must_use]
    pub fn new(center: NodeId) -> Self {
        Self {
            center,
            radius: Some(1.0),
            center_included: true,
            undirected: false,
            distance: None,
        }
    }

    /// Sets the radius; `None` is unbounded.
    #[must_use]
    pub fn with_radius(mut self, radius: Option<f64>) -> Self {
        self.radius = radius;
        self
    }

    /// Sets whether the center stays in the result.
    #[must_use]
    pub fn with_center_included(mut self, included: bool) -> Self {
        self.center_included = included;
        self
    }

    /// Sets whether reachability ignores edge direction.
    #[must_use]
    pub fn with_undirected(mut self, undirected: bool) -> Self {
        self.undirected = undirected;
        self
    }

    /// Weights the search by `attribute`.
    #[must_use]
    pub fn with_distance(mut self, attribute: &str) -> Self {
        self.distance = Some(attribute.to_owned());
        self
    }

    /// Same query with a different center.
    #[must_use]
    pub fn centered_at(&self, center: NodeId) -> Self {
        Self {
            center,
            ..self.clone()
        }
    }

    /// Converts the query into backend parameters.
    ///
    /// # Errors
    /// Returns [`EgoError::InvalidRadius`] for a NaN radius.
    pub fn params(&self) -> Result<EgoParams> {
        let params = EgoParams::new()
            .with_radius(Radius::new(self.radius)?)
            .with_center(self.center_included)
            .with_undirected(self.undirected);
        Ok(match &self.distance {
            Some(attribute) => params.with_distance(attribute.as_str()),
            None => params,
        })
    }

    /// Whether the compact backend declares this query unsupported on `kind`.
    #[must_use]
    pub fn is_unsupported_on(&self, kind: GraphKind) -> bool {
        self.params()
            .is_ok_and(|params| egonet_core::compact::supports(kind, &params).is_err())
    }
}

/// Runs `query` through the reference algorithm.
///
/// # Errors
/// Propagates the reference backend's error, typically
/// [`EgoError::NodeNotFound`].
pub fn run_reference(graph: &Graph, query: &EgoQuery) -> Result<Graph> {
    reference::ego_graph(graph, query.center, &query.params()?)
}

/// How the alternate backend is reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// Reference graph with the compact backend named explicitly.
    Explicit,
    /// Compact graph with the backend inferred from it.
    Implicit,
    /// Compat-wrapped graph with the backend inferred from it.
    ImplicitCompat,
}

impl Route {
    /// Every route, in declaration order.
    pub const ALL: [Self; 3] = [Self::Explicit, Self::Implicit, Self::ImplicitCompat];
}

/// Runs `query` through the compact backend via `dispatcher`.
///
/// The result either matches [`run_reference`], fails with the same
/// [`EgoError::NodeNotFound`], fails with [`EgoError::NotImplemented`] for
/// the unsupported combination, or, for implicit routes with fallback
/// enabled, is a reference graph produced by the fallback.
///
/// # Errors
/// Propagates the dispatcher's error.
pub fn run_alternate(
    graph: &Graph,
    query: &EgoQuery,
    dispatcher: &Dispatcher,
    route: Route,
) -> Result<AnyGraph> {
    let compact = || CompactGraph::from_graph(graph, AttrPreservation::All);
    let (input, backend) = match route {
        Route::Explicit => (AnyGraph::from(graph.clone()), Some(BackendKind::Compact)),
        Route::Implicit => (AnyGraph::from(compact()), None),
        Route::ImplicitCompat => (AnyGraph::from(compact().into_compat()), None),
    };
    dispatcher.ego_graph(&input, query.center, &query.params()?, backend)
}

/// Asserts that two graphs are structurally identical.
///
/// # Panics
/// Panics with the first [`egonet_core::GraphMismatch`] found.
#[track_caller]
pub fn assert_equivalent<L, R>(left: &L, right: &R)
where
    L: GraphView + ?Sized,
    R: GraphView + ?Sized,
{
    if let Err(mismatch) = compare_graphs(left, right) {
        panic!("graphs are not equivalent: {mismatch}");
    }
}

/// Asserts that `result` failed because `center` is missing.
///
/// Both phrasings are accepted: "is not in G" from hop-count searches and
/// "not found in graph" from weighted searches.
///
/// # Panics
/// Panics when `result` succeeded or failed for another reason.
#[track_caller]
pub fn assert_node_not_found<T: Debug>(result: Result<T>, center: NodeId) {
    match result {
        Err(err @ EgoError::NodeNotFound { node, .. }) => {
            assert_eq!(node, center, "wrong node reported");
            let message = err.to_string();
            assert!(
                message.contains("not in G") || message.contains("not found in graph"),
                "unexpected message: {message}"
            );
        }
        other => panic!("expected NodeNotFound for {center}, got {other:?}"),
    }
}

/// Asserts that `result` failed because the backend declined the query.
///
/// # Panics
/// Panics when `result` succeeded or failed for another reason.
#[track_caller]
pub fn assert_not_implemented<T: Debug>(result: Result<T>) {
    match result {
        Err(err @ EgoError::NotImplemented { .. }) => {
            let message = err.to_string();
            assert!(message.contains("ego_graph"), "unexpected message: {message}");
            assert!(
                message.contains("not implemented by"),
                "unexpected message: {message}"
            );
        }
        other => panic!("expected NotImplemented, got {other:?}"),
    }
}
