//! Design matrix for `ModelSpec`s.
//!
//! The fitter relies on two primitive operations:
//! - resolve each term to the frame columns it multiplies together
//! - fill one design row (intercept first, then one entry per term)

use nalgebra::DMatrix;

use crate::data::ModelFrame;
use crate::domain::{INTERCEPT_LABEL, ModelSpec, Term};
use crate::error::SelectError;

/// A resolved design matrix with column labels.
#[derive(Debug, Clone)]
pub struct Design {
    pub x: DMatrix<f64>,
    /// `(Intercept)` followed by the term labels in spec order.
    pub labels: Vec<String>,
}

/// Borrow the frame columns backing each term of `spec`.
fn resolve_terms<'a>(
    frame: &'a ModelFrame,
    spec: &ModelSpec,
) -> Result<Vec<Vec<&'a [f64]>>, SelectError> {
    spec.terms
        .iter()
        .map(|term| resolve_term(frame, term))
        .collect()
}

fn resolve_term<'a>(frame: &'a ModelFrame, term: &Term) -> Result<Vec<&'a [f64]>, SelectError> {
    term.vars().iter().map(|v| frame.require(v)).collect()
}

/// Fill a design row: constant term first, then the product of each term's columns.
///
/// # Panics
/// Panics if `out` is shorter than `terms.len() + 1`. Callers size it from the `ModelSpec`.
pub fn fill_design_row(terms: &[Vec<&[f64]>], row: usize, out: &mut [f64]) {
    out[0] = 1.0;
    for (j, cols) in terms.iter().enumerate() {
        out[j + 1] = cols.iter().map(|c| c[row]).product();
    }
}

/// Build the `n × (terms + 1)` design matrix for `spec`.
pub fn build_design(frame: &ModelFrame, spec: &ModelSpec) -> Result<Design, SelectError> {
    let terms = resolve_terms(frame, spec)?;
    let n = frame.n_rows();
    let p = spec.n_params();

    let mut x = DMatrix::<f64>::zeros(n, p);
    let mut row = vec![0.0; p];
    for i in 0..n {
        fill_design_row(&terms, i, &mut row);
        for (j, v) in row.iter().enumerate() {
            x[(i, j)] = *v;
        }
    }

    let mut labels = Vec::with_capacity(p);
    labels.push(INTERCEPT_LABEL.to_string());
    labels.extend(spec.terms.iter().map(Term::to_string));

    Ok(Design { x, labels })
}
