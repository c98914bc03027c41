//! Design-matrix construction for linear models with interaction terms.
//!
//! Models are described by a `ModelSpec`; this module turns a spec plus a model
//! frame into the numeric matrix the least squares solver consumes.

pub mod design;

pub use design::*;
