//! Benchmark support crate for egonet.
//!
//! Provides seeded synthetic graphs and parameter types used by the
//! Criterion benchmarks comparing the reference and compact backends.

pub mod error;
pub mod params;
pub mod source;
