//! Z-score standardization.
//!
//! Every column (outcome included) becomes `(x - mean) / sd` using the sample
//! standard deviation, so a model fitted on the result has coefficients that are
//! comparable in magnitude across predictors.

use crate::data::frame::ModelFrame;
use crate::data::summary::mean_sd;
use crate::error::SelectError;

/// Standardize every column of `frame`.
///
/// Fails with `DegenerateColumn` for a constant column (or a frame with fewer
/// than two rows, where the sample standard deviation is undefined).
pub fn standardize(frame: &ModelFrame) -> Result<ModelFrame, SelectError> {
    frame.map_columns(|name, values| {
        let degenerate = || SelectError::DegenerateColumn {
            column: name.to_string(),
        };
        if values.len() < 2 || values.iter().all(|v| *v == values[0]) {
            return Err(degenerate());
        }
        let (mean, sd) = mean_sd(values);
        if !(sd.is_finite() && sd > 0.0) {
            return Err(degenerate());
        }
        Ok(values.iter().map(|v| (v - mean) / sd).collect())
    })
}
