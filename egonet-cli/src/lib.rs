//! Support library for the egonet CLI binary.
//!
//! Exposes the command pipeline and logging setup so doctests and tests can
//! drive the CLI without spawning a subprocess.

pub mod cli;
pub mod logging;
