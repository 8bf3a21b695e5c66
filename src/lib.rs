//! `flux-corrgen` library crate.
//!
//! The binary (`corrgen`) is a thin wrapper around this library so that:
//!
//! - the synthesis engine is testable without spawning processes
//! - modules are reusable (e.g., driving generation from a build script)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod emit;
pub mod error;
pub mod expr;
pub mod io;
pub mod registry;
pub mod report;
pub mod synth;
