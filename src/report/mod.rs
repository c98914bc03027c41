//! Run reports: the serializable record of one selection run, plus the
//! diagnostics and terminal formatting built on top of it.

pub mod diagnostics;
pub mod format;

use serde::Serialize;

use crate::domain::{EliminationStep, FittedModel, MainEffectPolicy};
use crate::fit::Selection;

pub use diagnostics::{Diagnostics, DurbinWatson, ResidualSummary, Vif};

/// Everything a `select` run produced, in export-ready form.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub tool: &'static str,
    pub version: &'static str,
    /// Local time, RFC 3339.
    pub generated_at: String,
    pub data_path: String,
    pub rows_read: usize,
    pub rows_used: usize,
    pub rows_dropped: usize,
    pub alpha: f64,
    pub main_effects: MainEffectPolicy,
    pub formula: String,
    pub full_model: FittedModel,
    pub final_model: FittedModel,
    pub steps: Vec<EliminationStep>,
    /// Main-effects fit on z-scored data; absent when a column is constant.
    pub standardized: Option<FittedModel>,
    /// Zero-variance column that prevented the standardized fit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degenerate_column: Option<String>,
    pub diagnostics: Diagnostics,
}

/// Row bookkeeping of the data a run was fitted on.
#[derive(Debug, Clone, Copy)]
pub struct RowCounts {
    pub read: usize,
    pub used: usize,
    pub dropped: usize,
}

impl RunReport {
    pub fn new(
        data_path: impl Into<String>,
        rows: RowCounts,
        selection: &Selection,
        standardized: Result<FittedModel, String>,
        diagnostics: Diagnostics,
    ) -> Self {
        let (standardized, degenerate_column) = match standardized {
            Ok(model) => (Some(model), None),
            Err(column) => (None, Some(column)),
        };
        Self {
            tool: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            generated_at: chrono::Local::now().to_rfc3339(),
            data_path: data_path.into(),
            rows_read: rows.read,
            rows_used: rows.used,
            rows_dropped: rows.dropped,
            alpha: selection.alpha,
            main_effects: selection.main_effects,
            formula: selection.best.spec.to_string(),
            full_model: selection.full.clone(),
            final_model: selection.best.clone(),
            steps: selection.steps.clone(),
            standardized,
            degenerate_column,
            diagnostics,
        }
    }
}
