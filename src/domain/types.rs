//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting and selection
//! - exported to JSON as part of a run report

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Label used for the implied constant column.
pub const INTERCEPT_LABEL: &str = "(Intercept)";

/// A model term: one base variable (main effect) or a set of them (interaction).
///
/// Variables are stored sorted and deduplicated, so two terms built from the
/// same names in a different order compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<String>", try_from = "Vec<String>")]
pub struct Term {
    vars: Vec<String>,
}

impl Term {
    /// Build a term from variable names. Returns `None` for an empty set.
    pub fn new<I, S>(vars: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = vars.into_iter().map(Into::into).collect();
        if set.is_empty() {
            return None;
        }
        Some(Self {
            vars: set.into_iter().collect(),
        })
    }

    pub fn main(var: impl Into<String>) -> Self {
        Self {
            vars: vec![var.into()],
        }
    }

    pub fn vars(&self) -> &[String] {
        &self.vars
    }

    /// Interaction order (1 for a main effect).
    pub fn order(&self) -> usize {
        self.vars.len()
    }

    pub fn is_main_effect(&self) -> bool {
        self.vars.len() == 1
    }
}

impl TryFrom<Vec<String>> for Term {
    type Error = String;

    fn try_from(vars: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(vars).ok_or_else(|| "a term needs at least one variable".to_string())
    }
}

impl From<Term> for Vec<String> {
    fn from(term: Term) -> Self {
        term.vars
    }
}

impl Ord for Term {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.order()
            .cmp(&other.order())
            .then_with(|| self.vars.cmp(&other.vars))
    }
}

impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, var) in self.vars.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            f.write_str(&quote_name(var))?;
        }
        Ok(())
    }
}

/// Wrap a variable name in backticks unless it is a plain identifier.
pub fn quote_name(name: &str) -> String {
    let plain = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if plain {
        name.to_string()
    } else {
        format!("`{name}`")
    }
}

/// Outcome plus a set of terms. An intercept is always implied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelSpec {
    pub outcome: String,
    pub terms: BTreeSet<Term>,
}

impl ModelSpec {
    pub fn new(outcome: impl Into<String>, terms: impl IntoIterator<Item = Term>) -> Self {
        Self {
            outcome: outcome.into(),
            terms: terms.into_iter().collect(),
        }
    }

    /// Number of estimated coefficients (terms + intercept).
    pub fn n_params(&self) -> usize {
        self.terms.len() + 1
    }

    pub fn contains(&self, term: &Term) -> bool {
        self.terms.contains(term)
    }

    /// A new spec with `term` removed.
    pub fn without(&self, term: &Term) -> Self {
        let mut terms = self.terms.clone();
        terms.remove(term);
        Self {
            outcome: self.outcome.clone(),
            terms,
        }
    }

    /// Terms of exactly the given interaction order, in canonical order.
    pub fn terms_of_order(&self, order: usize) -> Vec<Term> {
        self.terms
            .iter()
            .filter(|t| t.order() == order)
            .cloned()
            .collect()
    }

    /// Highest interaction order present (0 for the intercept-only model).
    pub fn max_order(&self) -> usize {
        self.terms.iter().map(Term::order).max().unwrap_or(0)
    }

    /// `true` if `self` has the same outcome and a strict subset of `other`'s terms.
    pub fn is_strictly_nested_in(&self, other: &ModelSpec) -> bool {
        self.outcome == other.outcome
            && self.terms.len() < other.terms.len()
            && self.terms.is_subset(&other.terms)
    }
}

impl fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ~ ", quote_name(&self.outcome))?;
        if self.terms.is_empty() {
            return f.write_str("1");
        }
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                f.write_str(" + ")?;
            }
            write!(f, "{term}")?;
        }
        Ok(())
    }
}

/// One row of a coefficient table.
#[derive(Debug, Clone, Serialize)]
pub struct Coefficient {
    pub name: String,
    pub estimate: f64,
    pub std_error: f64,
    pub t_value: f64,
    pub p_value: f64,
}

/// Overall F test of a model against the intercept-only model.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct OverallF {
    pub f_statistic: f64,
    pub df_model: usize,
    pub df_residual: usize,
    pub p_value: f64,
}

/// Result of an ordinary least squares fit.
///
/// Every candidate during elimination produces a fresh `FittedModel`; none are
/// modified after creation.
#[derive(Debug, Clone, Serialize)]
pub struct FittedModel {
    pub spec: ModelSpec,
    /// `(Intercept)` first, then one row per term in spec order.
    pub coefficients: Vec<Coefficient>,
    pub n_obs: usize,
    pub df_residual: usize,
    pub rss: f64,
    pub tss: f64,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    /// Residual standard error.
    pub sigma: f64,
    pub overall_f: Option<OverallF>,
    #[serde(skip)]
    pub fitted: Vec<f64>,
    #[serde(skip)]
    pub residuals: Vec<f64>,
}

impl FittedModel {
    pub fn coefficient(&self, name: &str) -> Option<&Coefficient> {
        self.coefficients.iter().find(|c| c.name == name)
    }
}

/// Outcome of a nested-model partial F test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub reduced: ModelSpec,
    pub full: ModelSpec,
    /// Numerator degrees of freedom (parameters dropped).
    pub df: usize,
    /// Denominator degrees of freedom (residual df of the full model).
    pub df_residual: usize,
    pub rss_reduced: f64,
    pub rss_full: f64,
    pub f_statistic: f64,
    pub p_value: f64,
    pub alpha: f64,
    /// `p_value < alpha`: the dropped terms significantly improve fit.
    pub significant: bool,
}

/// One candidate removal tried by the selector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EliminationStep {
    /// Interaction order of the candidate (1 = main-effects validation).
    pub level: usize,
    pub term: Term,
    pub comparison: Comparison,
    /// Whether the term was dropped from the current best model.
    pub removed: bool,
}

/// What to do with non-significant main effects after the interaction levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MainEffectPolicy {
    /// Log the comparisons but never drop a main effect.
    #[default]
    Keep,
    /// Drop non-significant main effects in one batch, like an interaction level.
    Drop,
}

/// Settings of the backward elimination procedure.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSettings {
    pub outcome: String,
    pub predictors: Vec<String>,
    pub alpha: f64,
    /// Highest interaction order in the full model (`None` = all predictors).
    pub max_order: Option<usize>,
    pub main_effects: MainEffectPolicy,
}

impl SelectionSettings {
    pub fn new(outcome: impl Into<String>, predictors: &[&str]) -> Self {
        Self {
            outcome: outcome.into(),
            predictors: predictors.iter().map(|p| p.to_string()).collect(),
            alpha: DEFAULT_ALPHA,
            max_order: None,
            main_effects: MainEffectPolicy::Keep,
        }
    }
}

/// Conventional significance threshold.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus environment defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub data_path: PathBuf,
    pub delimiter: Option<u8>,
    pub selection: SelectionSettings,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_json: Option<PathBuf>,
    pub export_residuals: Option<PathBuf>,
}
