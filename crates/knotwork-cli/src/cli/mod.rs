//! CLI command implementations.
//!
//! This module contains the implementations for the CLI subcommands:
//! - `generate` - Random grid traced into a knot
//! - `trace` - Knot from a stroke graph drawn in SVG
//! - `benchmark` - Time generation and tracing over seeded grids

pub mod benchmark;
pub mod common;
pub mod generate;
pub mod recipe;
pub mod trace;

pub use benchmark::cmd_benchmark;
pub use generate::cmd_generate;
pub use trace::cmd_trace;
