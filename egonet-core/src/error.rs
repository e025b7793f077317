//! Error types for the egonet core library.
//!
//! Defines the error enum shared by every backend and the dispatcher, stable
//! machine-readable codes, and a convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

use crate::graph::NodeId;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Which search failed to locate the center node.
///
/// Hop-count and weighted searches report a missing source with different
/// wording; callers matching on messages must accept both.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SearchKind {
    /// Breadth-first search over hop counts.
    HopCount,
    /// Shortest-path search over a distance attribute.
    Weighted,
}

impl SearchKind {
    /// Selects the search used for an optional distance attribute.
    #[must_use]
    pub const fn for_distance(distance: Option<&str>) -> Self {
        match distance {
            Some(_) => Self::Weighted,
            None => Self::HopCount,
        }
    }
}

fn missing_node_message(node: &NodeId, search: &SearchKind) -> String {
    match search {
        SearchKind::HopCount => format!("source {node} is not in G"),
        SearchKind::Weighted => format!("node {node} not found in graph"),
    }
}

/// Error type produced by ego-graph extraction and backend dispatch.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum EgoError {
    /// The requested center node is not part of the graph.
    #[error("{}", missing_node_message(.node, .search))]
    NodeNotFound {
        /// The missing node.
        node: NodeId,
        /// Search that detected the absence.
        search: SearchKind,
    },
    /// The selected backend declares the parameter combination unsupported.
    #[error("`{function}` is not implemented by '{backend}': {reason}")]
    NotImplemented {
        /// Operation that was requested.
        function: &'static str,
        /// Backend that declined the call.
        backend: &'static str,
        /// Human-readable explanation of the unsupported combination.
        reason: &'static str,
    },
    /// No backend is registered under the requested name.
    #[error("unknown backend `{name}`; expected `reference` or `compact`")]
    UnknownBackend {
        /// Name supplied by the caller.
        name: Arc<str>,
    },
    /// The radius was NaN.
    #[error("radius must not be NaN")]
    InvalidRadius,
    /// An edge carried a negative length for the distance attribute.
    #[error("edge ({from}, {to}) has a negative `{attribute}` value")]
    NegativeWeight {
        /// Tail of the offending edge.
        from: NodeId,
        /// Head of the offending edge.
        to: NodeId,
        /// Distance attribute being read.
        attribute: Arc<str>,
    },
    /// An edge carried a non-numeric, NaN or infinite value for the distance
    /// attribute.
    #[error("edge ({from}, {to}) has a non-numeric `{attribute}` value")]
    NonNumericWeight {
        /// Tail of the offending edge.
        from: NodeId,
        /// Head of the offending edge.
        to: NodeId,
        /// Distance attribute being read.
        attribute: Arc<str>,
    },
    /// A configuration variable held an unparseable value.
    #[error("environment variable `{variable}` has invalid value `{value}`; expected true or false")]
    InvalidConfig {
        /// Name of the environment variable.
        variable: &'static str,
        /// Raw value that failed to parse.
        value: Arc<str>,
    },
}

define_error_codes! {
    /// Stable codes describing [`EgoError`] variants.
    enum EgoErrorCode for EgoError {
        /// The requested center node is not part of the graph.
        NodeNotFound => NodeNotFound { .. } => "EGONET_NODE_NOT_FOUND",
        /// The selected backend declares the parameter combination unsupported.
        NotImplemented => NotImplemented { .. } => "EGONET_NOT_IMPLEMENTED",
        /// No backend is registered under the requested name.
        UnknownBackend => UnknownBackend { .. } => "EGONET_UNKNOWN_BACKEND",
        /// The radius was NaN.
        InvalidRadius => InvalidRadius => "EGONET_INVALID_RADIUS",
        /// An edge carried a negative length for the distance attribute.
        NegativeWeight => NegativeWeight { .. } => "EGONET_NEGATIVE_WEIGHT",
        /// An edge carried a non-numeric value for the distance attribute.
        NonNumericWeight => NonNumericWeight { .. } => "EGONET_NON_NUMERIC_WEIGHT",
        /// A configuration variable held an unparseable value.
        InvalidConfig => InvalidConfig { .. } => "EGONET_INVALID_CONFIG",
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, EgoError>;
