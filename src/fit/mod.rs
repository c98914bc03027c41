//! Model fitting and selection orchestration.
//!
//! Responsibilities:
//!
//! - fit a `ModelSpec` by ordinary least squares (`fitter`)
//! - compare nested fits with a partial F test (`compare`)
//! - enumerate the interaction hierarchy of the full model (`terms`)
//! - run level-by-level backward elimination (`selection`)

pub mod compare;
pub mod fitter;
pub mod selection;
pub mod terms;

pub use compare::*;
pub use fitter::*;
pub use selection::*;
pub use terms::*;
