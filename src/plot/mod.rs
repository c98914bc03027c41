//! Terminal plots of a fitted model.

pub mod ascii;

pub use ascii::{qq_points, render_qq_plot, render_residual_plot};
