//! Term hierarchy of the full model.
//!
//! For base predictors `x_1..x_n` and a maximum order `k`, the full model holds
//! every subset of the predictors with size `1..=k`. With `k = n` that is
//! `2^n - 1` terms.

use crate::domain::{ModelSpec, Term};
use crate::error::SelectError;

/// All index combinations of size `k` drawn from `0..n`, in lexicographic order.
pub fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if k == 0 || k > n {
        return out;
    }

    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        out.push(idx.clone());

        // Find the rightmost index that can still be advanced.
        let Some(i) = (0..k).rev().find(|&i| idx[i] < n - k + i) else {
            break;
        };
        idx[i] += 1;
        for j in i + 1..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
    out
}

/// Every term of order `1..=max_order` over `predictors`.
pub fn hierarchy_terms(predictors: &[String], max_order: usize) -> Vec<Term> {
    let mut terms = Vec::new();
    for order in 1..=max_order.min(predictors.len()) {
        for combo in combinations(predictors.len(), order) {
            if let Some(term) = Term::new(combo.iter().map(|&i| predictors[i].clone())) {
                terms.push(term);
            }
        }
    }
    terms
}

/// The maximal model: outcome on all terms up to `max_order`.
pub fn full_model_spec(
    outcome: &str,
    predictors: &[String],
    max_order: usize,
) -> Result<ModelSpec, SelectError> {
    if predictors.is_empty() {
        return Err(SelectError::invalid_input("at least one predictor is required"));
    }
    if max_order == 0 || max_order > predictors.len() {
        return Err(SelectError::invalid_input(format!(
            "interaction order must be in 1..={}, got {max_order}",
            predictors.len()
        )));
    }
    Ok(ModelSpec::new(outcome, hierarchy_terms(predictors, max_order)))
}

/// The main-effects-only model.
pub fn main_effects_spec(outcome: &str, predictors: &[String]) -> ModelSpec {
    ModelSpec::new(outcome, predictors.iter().map(|p| Term::main(p.clone())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preds(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn combinations_are_lexicographic() {
        assert_eq!(
            combinations(4, 2),
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );
        assert_eq!(combinations(3, 3), vec![vec![0, 1, 2]]);
        assert!(combinations(2, 3).is_empty());
        assert!(combinations(2, 0).is_empty());
    }

    #[test]
    fn full_model_has_two_pow_n_minus_one_terms() {
        for n in 1..=5 {
            let p: Vec<String> = (0..n).map(|i| format!("x{i}")).collect();
            let spec = full_model_spec("y", &p, n).unwrap();
            assert_eq!(spec.terms.len(), (1 << n) - 1, "n={n}");
        }
    }

    #[test]
    fn wine_full_model_shape() {
        let p = preds(&["pH", "volatile acidity", "alcohol"]);
        let spec = full_model_spec("quality", &p, 3).unwrap();
        assert_eq!(spec.terms_of_order(1).len(), 3);
        assert_eq!(spec.terms_of_order(2).len(), 3);
        assert_eq!(spec.terms_of_order(3).len(), 1);
        assert_eq!(spec.max_order(), 3);
    }

    #[test]
    fn order_limit_is_validated() {
        let p = preds(&["a", "b"]);
        assert!(full_model_spec("y", &p, 0).is_err());
        assert!(full_model_spec("y", &p, 3).is_err());
        assert!(full_model_spec("y", &[], 1).is_err());
        assert_eq!(full_model_spec("y", &p, 1).unwrap(), main_effects_spec("y", &p));
    }
}
