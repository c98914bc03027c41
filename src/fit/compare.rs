//! Nested-model comparison (partial F test).
//!
//! For a reduced model `R` whose terms are a strict subset of the full model `F`:
//!
//! ```text
//! F = ((RSS_R - RSS_F) / (df_R - df_F)) / (RSS_F / df_F)
//! ```
//!
//! compared against an `F(df_R - df_F, df_F)` distribution. A small p value
//! means the extra terms of `F` significantly improve fit.
//!
//! Comparing a model against itself is rejected as `NotNested`: nesting is
//! always strict here.

use crate::domain::{Comparison, FittedModel};
use crate::error::SelectError;
use crate::fit::fitter::f_ratio;
use crate::math::f_upper_tail;

/// Compare `reduced` against `full` at significance level `alpha`.
pub fn compare(
    reduced: &FittedModel,
    full: &FittedModel,
    alpha: f64,
) -> Result<Comparison, SelectError> {
    if !reduced.spec.is_strictly_nested_in(&full.spec) {
        return Err(SelectError::NotNested {
            reduced: reduced.spec.to_string(),
            full: full.spec.to_string(),
        });
    }
    if reduced.n_obs != full.n_obs {
        return Err(SelectError::invalid_input(format!(
            "models were fitted on different data ({} vs {} rows)",
            reduced.n_obs, full.n_obs
        )));
    }
    validate_alpha(alpha)?;

    if full.df_residual == 0 {
        return Err(SelectError::Unidentifiable {
            n_obs: full.n_obs,
            n_params: full.spec.n_params(),
            message: format!("`{}` leaves no residual degrees of freedom", full.spec),
        });
    }

    let df = reduced.df_residual - full.df_residual;
    let f_statistic = f_ratio(reduced.rss - full.rss, df, full.rss, full.df_residual);
    let p_value = f_upper_tail(f_statistic, df, full.df_residual).ok_or_else(|| {
        SelectError::Unidentifiable {
            n_obs: full.n_obs,
            n_params: full.spec.n_params(),
            message: format!("no F distribution for df=({df}, {})", full.df_residual),
        }
    })?;

    Ok(Comparison {
        reduced: reduced.spec.clone(),
        full: full.spec.clone(),
        df,
        df_residual: full.df_residual,
        rss_reduced: reduced.rss,
        rss_full: full.rss,
        f_statistic,
        p_value,
        alpha,
        significant: p_value < alpha,
    })
}

/// Significance thresholds must lie strictly between 0 and 1.
pub fn validate_alpha(alpha: f64) -> Result<(), SelectError> {
    if alpha > 0.0 && alpha < 1.0 {
        Ok(())
    } else {
        Err(SelectError::invalid_input(format!(
            "significance threshold must be in (0, 1), got {alpha}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ModelFrame;
    use crate::domain::{ModelSpec, Term};
    use crate::fit::fitter::fit;

    fn abc_frame() -> ModelFrame {
        // y depends on a strongly, on b weakly; c is noise.
        let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        let b = [0.5, -1.0, 0.7, 0.2, -0.4, 1.1, -0.9, 0.3, 0.8, -0.6];
        let c = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0, 5.0, 3.0];
        let noise = [0.1, -0.2, 0.05, 0.15, -0.1, 0.2, -0.05, -0.15, 0.1, -0.1];
        let y: Vec<f64> = (0..10).map(|i| 2.0 + 3.0 * a[i] + 0.5 * b[i] + noise[i]).collect();
        ModelFrame::from_columns(
            vec!["y".into(), "a".into(), "b".into(), "c".into()],
            vec![y, a.to_vec(), b.to_vec(), c.to_vec()],
        )
        .unwrap()
    }

    fn spec(terms: &[&str]) -> ModelSpec {
        ModelSpec::new("y", terms.iter().map(|t| Term::main(*t)))
    }

    #[test]
    fn dropping_a_strong_predictor_is_significant() {
        let f = abc_frame();
        let full = fit(&f, &spec(&["a", "b", "c"])).unwrap();
        let reduced = fit(&f, &spec(&["b", "c"])).unwrap();
        let cmp = compare(&reduced, &full, 0.05).unwrap();
        assert_eq!(cmp.df, 1);
        assert_eq!(cmp.df_residual, 6);
        assert!(cmp.significant);
        assert!(cmp.p_value < 1e-6);
        assert!(cmp.rss_reduced >= cmp.rss_full);
    }

    #[test]
    fn models_fitted_on_different_rows_are_rejected() {
        let f = abc_frame();
        let names = ["y", "a", "b", "c"];
        let shorter = ModelFrame::from_columns(
            names.iter().map(|n| n.to_string()).collect(),
            names.iter().map(|n| f.column(n).unwrap()[..8].to_vec()).collect(),
        )
        .unwrap();
        let full = fit(&f, &spec(&["a", "b"])).unwrap();
        let reduced = fit(&shorter, &spec(&["a"])).unwrap();
        let err = compare(&reduced, &full, 0.05).unwrap_err();
        assert!(matches!(err, SelectError::InvalidInput { .. }), "{err:?}");
        assert!(err.to_string().contains("different data"), "{err}");
    }

    #[test]
    fn dropping_noise_is_not_significant() {
        let f = abc_frame();
        let full = fit(&f, &spec(&["a", "b", "c"])).unwrap();
        let reduced = fit(&f, &spec(&["a", "b"])).unwrap();
        let cmp = compare(&reduced, &full, 0.05).unwrap();
        assert!(!cmp.significant, "p={}", cmp.p_value);
    }

    #[test]
    fn self_comparison_is_not_nested() {
        let f = abc_frame();
        let m = fit(&f, &spec(&["a", "b"])).unwrap();
        let err = compare(&m, &m, 0.05).unwrap_err();
        assert!(matches!(err, SelectError::NotNested { .. }));
    }

    #[test]
    fn reversed_direction_is_not_nested() {
        let f = abc_frame();
        let big = fit(&f, &spec(&["a", "b", "c"])).unwrap();
        let small = fit(&f, &spec(&["a"])).unwrap();
        let err = compare(&big, &small, 0.05).unwrap_err();
        assert!(matches!(err, SelectError::NotNested { .. }));
        assert!(compare(&small, &big, 0.05).is_ok());
    }

    #[test]
    fn alpha_outside_unit_interval_is_rejected() {
        let f = abc_frame();
        let full = fit(&f, &spec(&["a", "b"])).unwrap();
        let reduced = fit(&f, &spec(&["a"])).unwrap();
        assert!(compare(&reduced, &full, 0.0).is_err());
        assert!(compare(&reduced, &full, 1.0).is_err());
    }

    #[test]
    fn saturated_full_model_has_no_residual_df() {
        let f = ModelFrame::from_columns(
            vec!["y".into(), "a".into()],
            vec![vec![1.0, 3.0], vec![0.0, 1.0]],
        )
        .unwrap();
        let full = fit(&f, &spec(&["a"])).unwrap();
        let reduced = fit(&f, &spec(&[])).unwrap();
        let err = compare(&reduced, &full, 0.05).unwrap_err();
        assert!(matches!(err, SelectError::Unidentifiable { .. }));
    }
}
