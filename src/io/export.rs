//! Exports: JSON run report, per-row residual CSV, and dataset CSV.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream
//! scripts; nothing here is ever read back by the tool.

use std::fs::File;
use std::path::Path;

use crate::data::{Column, Dataset};
use crate::domain::FittedModel;
use crate::error::AppError;
use crate::report::RunReport;

/// Write the run report as pretty-printed JSON.
pub fn write_report_json(path: &Path, report: &RunReport) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create report JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, report)
        .map_err(|e| AppError::new(2, format!("Failed to write report JSON: {e}")))?;
    Ok(())
}

/// Write observed/fitted/residual triples for each complete-case row.
pub fn write_residuals_csv(path: &Path, model: &FittedModel) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create residual CSV '{}': {e}", path.display())))?;

    writer
        .write_record(["row", "observed", "fitted", "residual"])
        .map_err(|e| AppError::new(2, format!("Failed to write residual CSV header: {e}")))?;

    for (i, (fitted, residual)) in model.fitted.iter().zip(&model.residuals).enumerate() {
        writer
            .write_record([
                (i + 1).to_string(),
                format!("{:.10}", fitted + residual),
                format!("{fitted:.10}"),
                format!("{residual:.10}"),
            ])
            .map_err(|e| AppError::new(2, format!("Failed to write residual CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush residual CSV: {e}")))?;
    Ok(())
}

/// Write a dataset as comma-separated text; missing cells are written as `NA`.
pub fn write_dataset_csv(path: &Path, dataset: &Dataset) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create CSV '{}': {e}", path.display())))?;

    writer
        .write_record(dataset.names())
        .map_err(|e| AppError::new(2, format!("Failed to write CSV header: {e}")))?;

    let columns: Vec<&Column> = dataset.columns().map(|(_, c)| c).collect();
    for row in 0..dataset.n_rows() {
        let record: Vec<String> = columns
            .iter()
            .map(|col| match col {
                Column::Numeric(v) => v[row].map(|x| format!("{x}")).unwrap_or_else(|| "NA".to_string()),
                Column::Text(v) => v[row].clone(),
            })
            .collect();
        writer
            .write_record(&record)
            .map_err(|e| AppError::new(2, format!("Failed to write CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush CSV: {e}")))?;
    Ok(())
}
