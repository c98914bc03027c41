//! Input/output helpers.
//!
//! - delimited-file ingest + column typing (`ingest`)
//! - report exports (JSON/CSV) and dataset writing (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
