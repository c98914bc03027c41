//! Hierarchical backward elimination using nested F tests.
//!
//! The procedure walks the interaction hierarchy from the highest order down:
//!
//! 1. Fit the full model (every term up to the maximum order).
//! 2. For each interaction order `k = max..=2`: test every order-`k` term of the
//!    current best model by dropping it and comparing against that *same* current
//!    best. All non-significant terms of the level are then removed together in
//!    one batch and the reduced model is refitted.
//! 3. Main-effects validation: each main effect is tested the same way. Under
//!    `MainEffectPolicy::Keep` the comparisons are only logged; under `Drop` the
//!    level is applied like an interaction level.
//!
//! Batch removal within a level matters when predictors are correlated: a greedy
//! one-term-at-a-time elimination can keep a different set of terms.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::data::ModelFrame;
use crate::domain::{
    EliminationStep, FittedModel, MainEffectPolicy, ModelSpec, SelectionSettings, Term,
};
use crate::error::SelectError;
use crate::fit::compare::{compare, validate_alpha};
use crate::fit::fitter::fit;
use crate::fit::terms::full_model_spec;

/// Output of backward elimination.
#[derive(Debug, Clone)]
pub struct Selection {
    /// The maximal model the procedure started from.
    pub full: FittedModel,
    /// The minimal adequate model.
    pub best: FittedModel,
    /// Every comparison made, in the order it was made.
    pub steps: Vec<EliminationStep>,
    pub alpha: f64,
    pub main_effects: MainEffectPolicy,
}

impl Selection {
    /// Steps logged for one interaction order.
    pub fn steps_at(&self, level: usize) -> impl Iterator<Item = &EliminationStep> {
        self.steps.iter().filter(move |s| s.level == level)
    }

    /// Terms removed over the whole run, in removal order.
    pub fn removed_terms(&self) -> Vec<&Term> {
        self.steps
            .iter()
            .filter(|s| s.removed)
            .map(|s| &s.term)
            .collect()
    }
}

/// Run hierarchical backward elimination on `frame`.
pub fn backward_eliminate(
    frame: &ModelFrame,
    settings: &SelectionSettings,
) -> Result<Selection, SelectError> {
    validate_alpha(settings.alpha)?;
    let predictors = dedup_predictors(&settings.predictors);
    if predictors.iter().any(|p| *p == settings.outcome) {
        return Err(SelectError::invalid_input(format!(
            "outcome `{}` is also listed as a predictor",
            settings.outcome
        )));
    }
    frame.require(&settings.outcome)?;
    for p in &predictors {
        frame.require(p)?;
    }

    let max_order = settings.max_order.unwrap_or(predictors.len());
    let full_spec = full_model_spec(&settings.outcome, &predictors, max_order)?;

    info!(
        model = %full_spec,
        terms = full_spec.terms.len(),
        rows = frame.n_rows(),
        "fitting full model"
    );
    let full = fit(frame, &full_spec)?;

    let mut steps = Vec::new();
    let mut current = full.clone();

    for level in (2..=max_order).rev() {
        let (next, level_steps) = eliminate_level(frame, current, level, settings.alpha, true)?;
        steps.extend(level_steps);
        current = next;
    }

    let apply = settings.main_effects == MainEffectPolicy::Drop;
    let (best, level_steps) = eliminate_level(frame, current, 1, settings.alpha, apply)?;
    steps.extend(level_steps);

    info!(model = %best.spec, comparisons = steps.len(), "selection finished");

    Ok(Selection {
        full,
        best,
        steps,
        alpha: settings.alpha,
        main_effects: settings.main_effects,
    })
}

/// Test every term of `level` against `current` and optionally apply the batch.
///
/// Returns the (possibly unchanged) current best model and the steps logged.
fn eliminate_level(
    frame: &ModelFrame,
    current: FittedModel,
    level: usize,
    alpha: f64,
    apply: bool,
) -> Result<(FittedModel, Vec<EliminationStep>), SelectError> {
    let candidates = current.spec.terms_of_order(level);
    if candidates.is_empty() {
        return Ok((current, Vec::new()));
    }

    // Candidates are independent of each other; evaluate them in parallel and
    // keep candidate order for the log.
    let results: Vec<Result<EliminationStep, SelectError>> = candidates
        .par_iter()
        .map(|term| -> Result<EliminationStep, SelectError> {
            let reduced = fit(frame, &current.spec.without(term))?;
            let comparison = compare(&reduced, &current, alpha)?;
            Ok(EliminationStep {
                level,
                term: term.clone(),
                removed: apply && !comparison.significant,
                comparison,
            })
        })
        .collect();

    let mut steps = Vec::with_capacity(results.len());
    for result in results {
        let step = result?;
        debug!(
            level,
            term = %step.term,
            f = step.comparison.f_statistic,
            p = step.comparison.p_value,
            removed = step.removed,
            "compared"
        );
        steps.push(step);
    }

    let dropped: Vec<&Term> = steps.iter().filter(|s| s.removed).map(|s| &s.term).collect();
    if dropped.is_empty() {
        info!(level, tested = steps.len(), "no terms removed");
        return Ok((current, steps));
    }

    let kept = ModelSpec::new(
        current.spec.outcome.clone(),
        current
            .spec
            .terms
            .iter()
            .filter(|t| !dropped.contains(t))
            .cloned(),
    );
    info!(level, removed = dropped.len(), model = %kept, "removed terms");
    let next = fit(frame, &kept)?;
    Ok((next, steps))
}

fn dedup_predictors(predictors: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(predictors.len());
    for p in predictors {
        if !out.contains(p) {
            out.push(p.clone());
        }
    }
    out
}
