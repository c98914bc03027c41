//! Post-selection diagnostics: multicollinearity, autocorrelation, residual spread,
//! and standardized coefficients.

use serde::Serialize;

use crate::data::{ModelFrame, quantile_sorted, sorted_copy, standardize};
use crate::domain::{FittedModel, ModelSpec, Term};
use crate::error::SelectError;
use crate::fit::{fit, main_effects_spec};

/// Variance inflation factor of one predictor.
#[derive(Debug, Clone, Serialize)]
pub struct Vif {
    pub variable: String,
    pub vif: f64,
    pub tolerance: f64,
}

/// Durbin-Watson statistic and lag-1 residual autocorrelation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DurbinWatson {
    pub statistic: f64,
    pub autocorrelation: f64,
}

/// Five-number summary of the residuals.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ResidualSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    pub vif: Vec<Vif>,
    pub durbin_watson: Option<DurbinWatson>,
    pub residuals: Option<ResidualSummary>,
}

/// Diagnostics for `model`, with VIFs over the main-effect `predictors`.
pub fn diagnose(
    frame: &ModelFrame,
    model: &FittedModel,
    predictors: &[String],
) -> Result<Diagnostics, SelectError> {
    Ok(Diagnostics {
        vif: variance_inflation(frame, predictors)?,
        durbin_watson: durbin_watson(&model.residuals),
        residuals: residual_summary(&model.residuals),
    })
}

/// VIF_j = 1 / (1 - R²_j), where R²_j comes from regressing predictor `j` on the others.
///
/// Returns no rows for fewer than two predictors.
pub fn variance_inflation(frame: &ModelFrame, predictors: &[String]) -> Result<Vec<Vif>, SelectError> {
    if predictors.len() < 2 {
        return Ok(Vec::new());
    }

    predictors
        .iter()
        .map(|target| -> Result<Vif, SelectError> {
            let others = predictors
                .iter()
                .filter(|p| *p != target)
                .map(|p| Term::main(p.clone()));
            let aux = fit(frame, &ModelSpec::new(target.clone(), others))?;
            let vif = if aux.r_squared < 1.0 {
                1.0 / (1.0 - aux.r_squared)
            } else {
                f64::INFINITY
            };
            Ok(Vif {
                variable: target.clone(),
                vif,
                tolerance: 1.0 / vif,
            })
        })
        .collect()
}

/// `Σ (e_t - e_{t-1})² / Σ e_t²` over residuals in row order.
pub fn durbin_watson(residuals: &[f64]) -> Option<DurbinWatson> {
    if residuals.len() < 2 {
        return None;
    }
    let ss: f64 = residuals.iter().map(|e| e * e).sum();
    if ss <= 0.0 {
        return None;
    }
    let mut diff_ss = 0.0;
    let mut lag_cross = 0.0;
    for w in residuals.windows(2) {
        diff_ss += (w[1] - w[0]).powi(2);
        lag_cross += w[1] * w[0];
    }
    Some(DurbinWatson {
        statistic: diff_ss / ss,
        autocorrelation: lag_cross / ss,
    })
}

pub fn residual_summary(residuals: &[f64]) -> Option<ResidualSummary> {
    let sorted = sorted_copy(residuals);
    Some(ResidualSummary {
        min: *sorted.first()?,
        q1: quantile_sorted(&sorted, 0.25)?,
        median: quantile_sorted(&sorted, 0.5)?,
        q3: quantile_sorted(&sorted, 0.75)?,
        max: *sorted.last()?,
    })
}

/// Fit the main-effects model on z-scored data (outcome included).
///
/// The slopes are standardized coefficients: the change in outcome SDs per
/// predictor SD.
pub fn standardized_model(
    frame: &ModelFrame,
    outcome: &str,
    predictors: &[String],
) -> Result<FittedModel, SelectError> {
    let z = standardize(frame)?;
    fit(&z, &main_effects_spec(outcome, predictors))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(cols: Vec<(&str, Vec<f64>)>) -> ModelFrame {
        let (names, values): (Vec<String>, Vec<Vec<f64>>) =
            cols.into_iter().map(|(n, v)| (n.to_string(), v)).unzip();
        ModelFrame::from_columns(names, values).unwrap()
    }

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn orthogonal_predictors_have_unit_vif() {
        let f = frame(vec![
            ("a", vec![1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0]),
            ("b", vec![1.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0, -1.0]),
        ]);
        let vif = variance_inflation(&f, &names(&["a", "b"])).unwrap();
        assert_eq!(vif.len(), 2);
        for v in vif {
            assert!((v.vif - 1.0).abs() < 1e-9, "{v:?}");
        }
    }

    #[test]
    fn correlated_predictors_inflate_variance() {
        let f = frame(vec![
            ("a", vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
            ("b", vec![1.1, 2.0, 2.9, 4.2, 5.0, 5.8]),
        ]);
        let vif = variance_inflation(&f, &names(&["a", "b"])).unwrap();
        assert!(vif[0].vif > 10.0);
        assert!((vif[0].vif - vif[1].vif).abs() < 1e-9);
        assert!(variance_inflation(&f, &names(&["a"])).unwrap().is_empty());
    }

    #[test]
    fn durbin_watson_of_alternating_residuals() {
        let dw = durbin_watson(&[1.0, -1.0, 1.0, -1.0, 1.0, -1.0]).unwrap();
        assert!((dw.statistic - 20.0 / 6.0).abs() < 1e-12);
        assert!((dw.autocorrelation + 5.0 / 6.0).abs() < 1e-12);

        let smooth = durbin_watson(&[1.0, 1.0, 1.0, -1.0, -1.0, -1.0]).unwrap();
        assert!(smooth.statistic < 1.0);
        assert!(durbin_watson(&[0.0, 0.0]).is_none());
    }

    #[test]
    fn residual_summary_quartiles() {
        let s = residual_summary(&[-2.0, 1.0, 0.0, -1.0, 2.0]).unwrap();
        assert_eq!((s.min, s.q1, s.median, s.q3, s.max), (-2.0, -1.0, 0.0, 1.0, 2.0));
        assert!(residual_summary(&[]).is_none());
    }

    #[test]
    fn standardized_slope_equals_correlation_for_one_predictor() {
        let f = frame(vec![
            ("y", vec![1.0, 3.0, 2.0, 5.0, 4.0]),
            ("x", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
        ]);
        let m = standardized_model(&f, "y", &names(&["x"])).unwrap();
        assert!(m.coefficients[0].estimate.abs() < 1e-12);
        assert!((m.coefficient("x").unwrap().estimate - 0.8).abs() < 1e-10);
    }

    #[test]
    fn standardized_model_rejects_constant_column() {
        let f = frame(vec![
            ("y", vec![1.0, 3.0, 2.0]),
            ("x", vec![2.0, 2.0, 2.0]),
        ]);
        assert!(matches!(
            standardized_model(&f, "y", &names(&["x"])),
            Err(SelectError::DegenerateColumn { .. })
        ));
    }
}
