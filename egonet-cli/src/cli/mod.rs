//! Command-line interface for ego-graph extraction.
//!
//! The `ego` command builds a graph from a generated cycle or an edge-list
//! file, runs one query through the dispatcher and optionally checks the
//! result against the reference backend.

mod commands;

pub use commands::{
    Cli, CliError, Command, CycleArgs, EDGE_LIST_WEIGHT, EdgesArgs, EgoCommand, EgoSummary,
    GraphSource, InputArg, KindArg, MULTI_EDGE_KEY, OutputFormat, render_summary, run_cli,
};

#[cfg(test)]
mod tests;
