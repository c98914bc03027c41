//! Tail probabilities and quantiles for the test statistics we report.

use statrs::distribution::{ContinuousCDF, FisherSnedecor, Normal, StudentsT};

/// Upper-tail probability `P(F > f)` for an F distribution.
///
/// Returns `None` for invalid degrees of freedom or a non-finite statistic
/// other than `+∞` (which maps to 0).
pub fn f_upper_tail(f: f64, df1: usize, df2: usize) -> Option<f64> {
    if df1 == 0 || df2 == 0 || f.is_nan() {
        return None;
    }
    if f == f64::INFINITY {
        return Some(0.0);
    }
    if f <= 0.0 {
        return Some(1.0);
    }
    let dist = FisherSnedecor::new(df1 as f64, df2 as f64).ok()?;
    Some(dist.sf(f).clamp(0.0, 1.0))
}

/// Two-sided p value for a t statistic.
pub fn t_two_sided(t: f64, df: usize) -> Option<f64> {
    if df == 0 || t.is_nan() {
        return None;
    }
    if t.is_infinite() {
        return Some(0.0);
    }
    let dist = StudentsT::new(0.0, 1.0, df as f64).ok()?;
    Some((2.0 * dist.sf(t.abs())).clamp(0.0, 1.0))
}

/// Standard normal quantile.
pub fn normal_quantile(p: f64) -> f64 {
    // Unit normal parameters are always valid.
    match Normal::new(0.0, 1.0) {
        Ok(dist) => dist.inverse_cdf(p),
        Err(_) => f64::NAN,
    }
}
