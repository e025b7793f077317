//! The four graph variants supported by every backend.

use std::fmt;

/// Graph variant: directedness crossed with multi-edge support.
///
/// # Examples
/// ```
/// use egonet_core::GraphKind;
///
/// assert!(GraphKind::DirectedMulti.is_directed());
/// assert!(GraphKind::DirectedMulti.is_multigraph());
/// assert!(!GraphKind::Undirected.is_directed());
/// assert_eq!(GraphKind::ALL.len(), 4);
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum GraphKind {
    /// Undirected graph with at most one edge per node pair.
    Undirected,
    /// Directed graph with at most one edge per ordered node pair.
    Directed,
    /// Undirected graph allowing parallel edges distinguished by key.
    UndirectedMulti,
    /// Directed graph allowing parallel edges distinguished by key.
    DirectedMulti,
}

impl GraphKind {
    /// Every variant, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::Undirected,
        Self::Directed,
        Self::UndirectedMulti,
        Self::DirectedMulti,
    ];

    /// Returns whether edges have a direction.
    #[must_use]
    pub const fn is_directed(self) -> bool {
        matches!(self, Self::Directed | Self::DirectedMulti)
    }

    /// Returns whether parallel edges are permitted.
    #[must_use]
    pub const fn is_multigraph(self) -> bool {
        matches!(self, Self::UndirectedMulti | Self::DirectedMulti)
    }

    /// Stable lowercase label used in logs and CLI output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Undirected => "graph",
            Self::Directed => "digraph",
            Self::UndirectedMulti => "multigraph",
            Self::DirectedMulti => "multidigraph",
        }
    }
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
