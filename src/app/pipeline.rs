//! Shared pipeline logic behind the `select` and `explore` commands.
//!
//! Keeping this in one place keeps the core workflow out of the printing code:
//! ingest -> complete-case frame -> backward elimination -> standardized fit
//! -> diagnostics -> report

use std::path::Path;

use tracing::{info, warn};

use crate::data::{ColumnSummary, CorrelationMatrix, Dataset, ModelFrame};
use crate::domain::RunConfig;
use crate::error::{AppError, SelectError};
use crate::fit::Selection;
use crate::io::ingest::{IngestedData, load_dataset};
use crate::report::diagnostics::{diagnose, standardized_model};
use crate::report::{RowCounts, RunReport};

/// All computed outputs of a single `backelim select` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub selection: Selection,
    pub report: RunReport,
}

/// Execute the full selection pipeline for `config`.
pub fn run_select(config: &RunConfig) -> Result<RunOutput, AppError> {
    let ingest = load_input(&config.data_path, config.delimiter)?;
    let (selection, report) = select_on_dataset(
        &ingest.dataset,
        &config.data_path.display().to_string(),
        ingest.rows_read,
        config,
    )?;
    Ok(RunOutput {
        ingest,
        selection,
        report,
    })
}

/// Selection on an already-loaded dataset.
pub fn select_on_dataset(
    dataset: &Dataset,
    data_label: &str,
    rows_read: usize,
    config: &RunConfig,
) -> Result<(Selection, RunReport), AppError> {
    let settings = &config.selection;

    let mut vars = vec![settings.outcome.clone()];
    vars.extend(settings.predictors.iter().cloned());
    let frame = ModelFrame::from_dataset(dataset, &vars)?;
    if frame.dropped_rows() > 0 {
        warn!(
            dropped = frame.dropped_rows(),
            used = frame.n_rows(),
            "dropped rows with missing values in the model columns"
        );
    }

    let selection = crate::fit::backward_eliminate(&frame, settings)?;

    let predictors: Vec<String> = frame
        .names()
        .iter()
        .filter(|n| **n != settings.outcome)
        .cloned()
        .collect();

    let standardized = match standardized_model(&frame, &settings.outcome, &predictors) {
        Ok(model) => Ok(model),
        Err(SelectError::DegenerateColumn { column }) => {
            warn!(%column, "zero-variance column, skipping standardized coefficients");
            Err(column)
        }
        Err(err) => return Err(err.into()),
    };

    let diagnostics = diagnose(&frame, &selection.best, &predictors)?;

    let report = RunReport::new(
        data_label,
        RowCounts {
            read: rows_read,
            used: frame.n_rows(),
            dropped: frame.dropped_rows(),
        },
        &selection,
        standardized,
        diagnostics,
    );

    Ok((selection, report))
}

/// Outputs of `backelim explore`.
#[derive(Debug, Clone)]
pub struct Exploration {
    pub ingest: IngestedData,
    pub summaries: Vec<ColumnSummary>,
    /// `None` if the requested columns have no complete cases in common.
    pub correlations: Option<CorrelationMatrix>,
}

/// Summarize a file; correlate `columns` (all numeric columns if empty).
pub fn run_explore(path: &Path, delimiter: Option<u8>, columns: &[String]) -> Result<Exploration, AppError> {
    let ingest = load_input(path, delimiter)?;
    let summaries = crate::data::summarize_dataset(&ingest.dataset);

    let explicit = !columns.is_empty();
    let columns: Vec<String> = if explicit {
        columns.to_vec()
    } else {
        ingest
            .dataset
            .columns()
            .filter(|(_, c)| c.is_numeric())
            .map(|(name, _)| name.to_string())
            .collect()
    };

    let correlations = if columns.len() < 2 {
        None
    } else {
        match ModelFrame::from_dataset(&ingest.dataset, &columns) {
            Ok(frame) => Some(crate::data::correlation_matrix(&frame)),
            // Default columns may share no complete case.
            Err(err) if !explicit => {
                warn!(%err, "skipping correlation matrix");
                None
            }
            Err(err) => return Err(err.into()),
        }
    };

    Ok(Exploration {
        ingest,
        summaries,
        correlations,
    })
}

fn load_input(path: &Path, delimiter: Option<u8>) -> Result<IngestedData, AppError> {
    let ingest = load_dataset(path, delimiter)?;
    info!(
        path = %path.display(),
        rows = ingest.rows_read,
        columns = ingest.dataset.names().len(),
        delimiter = %char::from(ingest.delimiter).escape_default(),
        "loaded dataset"
    );
    for e in &ingest.row_errors {
        warn!(line = e.line, "skipped row: {}", e.message);
    }
    Ok(ingest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Column, SampleConfig, generate_wine_sample};
    use crate::domain::SelectionSettings;
    use std::path::PathBuf;

    fn config() -> RunConfig {
        RunConfig {
            data_path: PathBuf::from("sample.csv"),
            delimiter: None,
            selection: SelectionSettings::new("quality", &["pH", "volatile acidity", "alcohol"]),
            plot: false,
            plot_width: 40,
            plot_height: 10,
            export_json: None,
            export_residuals: None,
        }
    }

    #[test]
    fn select_on_sample_reports_rows_and_diagnostics() {
        let sample = generate_wine_sample(&SampleConfig {
            rows: 400,
            missing_rate: 0.02,
            ..SampleConfig::default()
        })
        .unwrap();

        let (selection, report) = select_on_dataset(&sample.dataset, "sample", 400, &config()).unwrap();
        assert_eq!(report.rows_read, 400);
        assert_eq!(report.rows_used + report.rows_dropped, 400);
        assert!(report.rows_dropped > 0);
        assert_eq!(report.formula, selection.best.spec.to_string());
        assert_eq!(report.diagnostics.vif.len(), 3);
        assert!(report.standardized.is_some());
        assert!(report.degenerate_column.is_none());
        assert!(report.diagnostics.durbin_watson.is_some());
    }

    #[test]
    fn constant_outcome_names_the_degenerate_column() {
        let sample = generate_wine_sample(&SampleConfig {
            rows: 60,
            ..SampleConfig::default()
        })
        .unwrap();
        let mut columns = vec![("quality", vec![5.0; 60])];
        for name in ["pH", "volatile acidity", "alcohol"] {
            let Some(Column::Numeric(cells)) = sample.dataset.column(name) else {
                panic!("sample lacks numeric `{name}`");
            };
            columns.push((name, cells.iter().map(|c| c.unwrap_or(0.0)).collect()));
        }
        let ds = Dataset::from_numeric(columns).unwrap();

        let (_, report) = select_on_dataset(&ds, "flat", 60, &config()).unwrap();
        assert!(report.standardized.is_none());
        assert_eq!(report.degenerate_column.as_deref(), Some("quality"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["degenerate_column"], "quality");
        assert!(crate::report::format::format_run_summary(&report).contains("`quality` has zero variance"));
    }

    #[test]
    fn missing_predictor_is_invalid_input() {
        let ds = Dataset::from_numeric(vec![("quality", vec![5.0, 6.0, 5.0])]).unwrap();
        let err = select_on_dataset(&ds, "x", 3, &config()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("not found"), "{err}");
    }
}
