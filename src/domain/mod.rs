//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - model vocabulary (`Term`, `ModelSpec`)
//! - fit outputs (`FittedModel`, `Comparison`, `EliminationStep`)
//! - selector and run configuration (`SelectionSettings`, `RunConfig`)

pub mod types;

pub use types::*;
