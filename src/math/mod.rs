//! Mathematical utilities: least squares and distribution helpers.

pub mod dist;
pub mod ols;

pub use dist::*;
pub use ols::*;
