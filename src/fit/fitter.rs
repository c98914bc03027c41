//! Ordinary least squares fitting of a single `ModelSpec`.
//!
//! Given a complete-case model frame and a spec we:
//! - build the design matrix (intercept + one column per term)
//! - solve for β by SVD least squares
//! - derive residuals, sums of squares, and coefficient inference
//!
//! Fitting is a pure function of `(frame, spec)`: the same inputs always give a
//! bit-identical `FittedModel`.

use nalgebra::DVector;

use crate::data::ModelFrame;
use crate::domain::{Coefficient, FittedModel, ModelSpec, OverallF};
use crate::error::SelectError;
use crate::math::{f_upper_tail, numerical_rank, solve_least_squares, t_two_sided};
use crate::models::build_design;

/// Fit `spec` to `frame` by ordinary least squares.
///
/// Fails with `Unidentifiable` if there are fewer rows than parameters or the
/// design matrix is rank deficient, and with `InvalidInput` if a referenced
/// column is missing from the frame.
pub fn fit(frame: &ModelFrame, spec: &ModelSpec) -> Result<FittedModel, SelectError> {
    let y = frame.require(&spec.outcome)?;
    let n = frame.n_rows();
    let p = spec.n_params();

    if n < p {
        return Err(SelectError::Unidentifiable {
            n_obs: n,
            n_params: p,
            message: format!("fewer complete rows than parameters in `{spec}`"),
        });
    }

    let design = build_design(frame, spec)?;
    let y_vec = DVector::from_column_slice(y);

    let Some(ls) = solve_least_squares(&design.x, &y_vec) else {
        let rank = numerical_rank(&design.x);
        return Err(SelectError::Unidentifiable {
            n_obs: n,
            n_params: p,
            message: format!("design matrix of `{spec}` is rank deficient (rank {rank})"),
        });
    };

    let fitted_vec = &design.x * &ls.beta;
    let fitted: Vec<f64> = fitted_vec.iter().copied().collect();
    let residuals: Vec<f64> = y.iter().zip(&fitted).map(|(yi, fi)| yi - fi).collect();

    let rss: f64 = residuals.iter().map(|r| r * r).sum();
    let mean_y = y.iter().sum::<f64>() / n as f64;
    let tss: f64 = y.iter().map(|v| (v - mean_y).powi(2)).sum();

    let df_residual = n - p;
    let sigma2 = if df_residual > 0 {
        rss / df_residual as f64
    } else {
        f64::NAN
    };

    let r_squared = if tss > 0.0 { 1.0 - rss / tss } else { f64::NAN };
    let adj_r_squared = if df_residual > 0 {
        1.0 - (1.0 - r_squared) * (n as f64 - 1.0) / df_residual as f64
    } else {
        f64::NAN
    };

    let coefficients = design
        .labels
        .iter()
        .enumerate()
        .map(|(j, name)| {
            let estimate = ls.beta[j];
            let std_error = (sigma2 * ls.xtx_inv[(j, j)]).sqrt();
            let t_value = estimate / std_error;
            let p_value = t_two_sided(t_value, df_residual).unwrap_or(f64::NAN);
            Coefficient {
                name: name.clone(),
                estimate,
                std_error,
                t_value,
                p_value,
            }
        })
        .collect();

    let df_model = p - 1;
    let overall_f = if df_model > 0 && df_residual > 0 {
        let f_statistic = f_ratio(tss - rss, df_model, rss, df_residual);
        f_upper_tail(f_statistic, df_model, df_residual).map(|p_value| OverallF {
            f_statistic,
            df_model,
            df_residual,
            p_value,
        })
    } else {
        None
    };

    tracing::trace!(model = %spec, rss, r_squared, "fitted");

    Ok(FittedModel {
        spec: spec.clone(),
        coefficients,
        n_obs: n,
        df_residual,
        rss,
        tss,
        r_squared,
        adj_r_squared,
        sigma: sigma2.sqrt(),
        overall_f,
        fitted,
        residuals,
    })
}

/// `(extra_ss / df1) / (rss / df2)`, with a zero numerator giving exactly 0 and
/// a zero denominator giving `+∞`.
pub(crate) fn f_ratio(extra_ss: f64, df1: usize, rss: f64, df2: usize) -> f64 {
    let numer = extra_ss.max(0.0) / df1 as f64;
    let denom = rss / df2 as f64;
    if numer == 0.0 {
        0.0
    } else if denom <= 0.0 {
        f64::INFINITY
    } else {
        numer / denom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Term;
    use crate::fit::terms::full_model_spec;
    use proptest::prelude::*;

    fn frame(cols: Vec<(&str, Vec<f64>)>) -> ModelFrame {
        let (names, values): (Vec<String>, Vec<Vec<f64>>) =
            cols.into_iter().map(|(n, v)| (n.to_string(), v)).unzip();
        ModelFrame::from_columns(names, values).unwrap()
    }

    #[test]
    fn simple_regression_matches_hand_computation() {
        let f = frame(vec![
            ("y", vec![1.0, 3.0, 2.0, 5.0, 4.0]),
            ("x", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
        ]);
        let spec = ModelSpec::new("y", [Term::main("x")]);
        let m = fit(&f, &spec).unwrap();

        assert!((m.coefficients[0].estimate - 0.6).abs() < 1e-10);
        assert!((m.coefficients[1].estimate - 0.8).abs() < 1e-10);
        assert!((m.rss - 3.6).abs() < 1e-10);
        assert!((m.tss - 10.0).abs() < 1e-10);
        assert!((m.r_squared - 0.64).abs() < 1e-10);
        assert_eq!(m.df_residual, 3);

        let slope = m.coefficient("x").unwrap();
        assert!((slope.std_error - (1.2f64 / 10.0).sqrt()).abs() < 1e-10);
        assert!((slope.p_value - 0.1041).abs() < 1e-3, "p={}", slope.p_value);

        let overall = m.overall_f.unwrap();
        assert!((overall.f_statistic - 16.0 / 3.0).abs() < 1e-9);
        // With one predictor the overall F test equals the slope t test.
        assert!((overall.p_value - slope.p_value).abs() < 1e-9);
    }

    #[test]
    fn intercept_only_model_has_no_overall_f() {
        let f = frame(vec![("y", vec![1.0, 2.0, 3.0])]);
        let m = fit(&f, &ModelSpec::new("y", [])).unwrap();
        assert!(m.overall_f.is_none());
        assert!((m.coefficients[0].estimate - 2.0).abs() < 1e-12);
        assert!((m.rss - m.tss).abs() < 1e-12);
    }

    #[test]
    fn too_few_rows_is_unidentifiable() {
        let f = frame(vec![
            ("y", vec![1.0, 2.0, 3.0]),
            ("a", vec![1.0, 4.0, 2.0]),
            ("b", vec![0.5, 0.1, 0.9]),
            ("c", vec![3.0, 1.0, 2.0]),
        ]);
        let p: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let spec = full_model_spec("y", &p, 3).unwrap();
        let err = fit(&f, &spec).unwrap_err();
        assert!(matches!(
            err,
            SelectError::Unidentifiable {
                n_obs: 3,
                n_params: 8,
                ..
            }
        ));
    }

    #[test]
    fn collinear_predictors_are_unidentifiable() {
        let f = frame(vec![
            ("y", vec![1.0, 2.0, 2.5, 4.0, 5.5]),
            ("a", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
            ("b", vec![2.0, 4.0, 6.0, 8.0, 10.0]),
        ]);
        let spec = ModelSpec::new("y", [Term::main("a"), Term::main("b")]);
        let err = fit(&f, &spec).unwrap_err();
        assert!(err.to_string().contains("rank deficient"), "{err}");
    }

    #[test]
    fn fit_is_deterministic() {
        let f = frame(vec![
            ("y", vec![1.0, 3.0, 2.0, 5.0, 4.0, 6.5]),
            ("x", vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
            ("z", vec![0.3, 0.1, 0.8, 0.2, 0.9, 0.4]),
        ]);
        let spec = ModelSpec::new(
            "y",
            [Term::main("x"), Term::main("z"), Term::new(["x", "z"]).unwrap()],
        );
        let a = fit(&f, &spec).unwrap();
        let b = fit(&f, &spec).unwrap();
        assert_eq!(a.rss.to_bits(), b.rss.to_bits());
        assert_eq!(a.fitted, b.fitted);
    }

    proptest! {
        #[test]
        fn adding_terms_never_increases_rss(
            rows in prop::collection::vec(
                (-10.0f64..10.0, -5.0f64..5.0, 0.0f64..3.0, -20.0f64..20.0),
                12..30,
            )
        ) {
            let f = frame(vec![
                ("a", rows.iter().map(|r| r.0).collect()),
                ("b", rows.iter().map(|r| r.1).collect()),
                ("c", rows.iter().map(|r| r.2).collect()),
                ("y", rows.iter().map(|r| r.3).collect()),
            ]);
            let p: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
            let full = full_model_spec("y", &p, 3).unwrap();
            let reduced = full.without(&Term::new(["a", "b", "c"]).unwrap());
            let main = full_model_spec("y", &p, 1).unwrap();

            let (Ok(full_fit), Ok(reduced_fit), Ok(main_fit)) =
                (fit(&f, &full), fit(&f, &reduced), fit(&f, &main))
            else {
                // Degenerate draws (e.g. shrunk to constants) are not identifiable.
                return Ok(());
            };

            let tol = 1e-8 * (1.0 + full_fit.tss);
            prop_assert!(reduced_fit.rss + tol >= full_fit.rss);
            prop_assert!(main_fit.rss + tol >= reduced_fit.rss);
        }
    }
}
