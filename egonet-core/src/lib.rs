//! Egonet core library.
//!
//! Ego-graph extraction over a reference graph model and a compact columnar
//! backend, with a dispatcher that routes calls between the two and a
//! structural comparison used to prove they agree.
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod compact;
mod compare;
mod config;
mod dispatch;
mod error;
mod graph;
mod params;
pub mod reference;
mod weights;

pub use crate::{
    compact::{AttrPreservation, CompactEdge, CompactGraph, CompatGraph},
    compare::{EdgeIdentity, GraphMismatch, GraphView, compare_graphs},
    config::{COMPAT_ENV, DispatchConfig, FALLBACK_ENV},
    dispatch::{AnyGraph, BackendKind, Dispatcher},
    error::{EgoError, EgoErrorCode, Result, SearchKind},
    graph::{AttrValue, Attrs, EdgeKey, EdgeRef, Graph, GraphKind, NodeId, attrs},
    params::{EgoParams, Radius},
};
