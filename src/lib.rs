//! `backelim` library crate.
//!
//! The binary (`backelim`) is a thin wrapper around this library so that:
//!
//! - fitting and selection are testable without spawning processes
//! - the selector can be driven from other code on an in-memory `Dataset`

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
