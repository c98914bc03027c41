//! Delimited-file ingest.
//!
//! This module turns a CSV (or semicolon-separated, as the UCI wine files are)
//! into a typed [`Dataset`]. It does not decide which columns a model uses; the
//! complete-case projection happens later in `data::frame`.
//!
//! Design goals:
//! - **Exact column names** (only a BOM and surrounding whitespace are stripped;
//!   `volatile acidity` stays one identifier)
//! - **Row-level validation** (skip unreadable rows, but report what happened)
//! - **Deterministic typing**: a column is numeric iff every non-missing cell
//!   parses as a number

use std::path::Path;

use csv::StringRecord;

use crate::data::{Column, Dataset};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: typed dataset + what happened while reading it.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub dataset: Dataset,
    pub delimiter: u8,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load a delimited file into a [`Dataset`].
///
/// `delimiter = None` auto-detects from the header line.
pub fn load_dataset(path: &Path, delimiter: Option<u8>) -> Result<IngestedData, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| AppError::new(2, format!("Failed to read '{}': {e}", path.display())))?;
    parse_dataset(&content, delimiter)
}

/// Parse delimited text (see [`load_dataset`]).
pub fn parse_dataset(content: &str, delimiter: Option<u8>) -> Result<IngestedData, AppError> {
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(content));

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read headers: {e}")))?
        .clone();
    let names: Vec<String> = headers.iter().map(normalize_header_name).collect();
    if names.is_empty() || names.iter().all(String::is_empty) {
        return Err(AppError::new(2, "Input has no header row."));
    }
    if let Some(idx) = names.iter().position(String::is_empty) {
        return Err(AppError::new(2, format!("Header column {} is empty.", idx + 1)));
    }

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); names.len()];
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        if record.len() > names.len() {
            row_errors.push(RowError {
                line,
                message: format!("{} fields, header has {}", record.len(), names.len()),
            });
            continue;
        }
        push_record(&record, &mut cells);
    }

    let columns: Vec<Column> = cells.into_iter().map(type_column).collect();
    let dataset = Dataset::new(names, columns).map_err(|e| AppError::new(2, e.to_string()))?;

    if dataset.n_rows() == 0 {
        return Err(AppError::new(2, "Input has no data rows."));
    }

    Ok(IngestedData {
        dataset,
        delimiter,
        row_errors,
        rows_read,
    })
}

/// Pick `;`, tab or `,` based on which occurs in the header line.
fn detect_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or("");
    if header.contains(';') {
        b';'
    } else if header.contains('\t') && !header.contains(',') {
        b'\t'
    } else {
        b','
    }
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, the first column can never be matched.
    name.trim_start_matches('\u{feff}').trim().to_string()
}

/// Short rows are padded with missing cells.
fn push_record(record: &StringRecord, cells: &mut [Vec<String>]) {
    for (j, col) in cells.iter_mut().enumerate() {
        col.push(record.get(j).unwrap_or("").to_string());
    }
}

fn is_missing(cell: &str) -> bool {
    matches!(
        cell.to_ascii_lowercase().as_str(),
        "" | "na" | "nan" | "null"
    )
}

fn type_column(raw: Vec<String>) -> Column {
    let parsed: Option<Vec<Option<f64>>> = raw
        .iter()
        .map(|cell| {
            if is_missing(cell) {
                Some(None)
            } else {
                cell.parse::<f64>().ok().filter(|v| v.is_finite()).map(Some)
            }
        })
        .collect();

    match parsed {
        Some(values) => Column::Numeric(values),
        None => Column::Text(
            raw.into_iter()
                .map(|c| if is_missing(&c) { String::new() } else { c })
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_uci_style_semicolon_file() {
        let text = concat!(
            "\"fixed acidity\";\"volatile acidity\";\"pH\";\"alcohol\";\"quality\"\n",
            "7.4;0.7;3.51;9.4;5\n",
            "7.8;0.88;3.2;9.8;5\n",
            "11.2;0.28;3.16;9.8;6\n",
        );
        let data = parse_dataset(text, None).unwrap();
        assert_eq!(data.delimiter, b';');
        assert_eq!(data.rows_read, 3);
        assert_eq!(
            data.dataset.names(),
            &["fixed acidity", "volatile acidity", "pH", "alcohol", "quality"]
        );
        assert_eq!(
            data.dataset.column("volatile acidity"),
            Some(&Column::Numeric(vec![Some(0.7), Some(0.88), Some(0.28)]))
        );
    }

    #[test]
    fn missing_tokens_and_short_rows_become_missing_cells() {
        let text = "pH,alcohol,quality\n3.5,NA,5\n3.2,,6\n3.1,10.2\n";
        let data = parse_dataset(text, None).unwrap();
        assert_eq!(
            data.dataset.column("alcohol"),
            Some(&Column::Numeric(vec![None, None, Some(10.2)]))
        );
        assert_eq!(
            data.dataset.column("quality"),
            Some(&Column::Numeric(vec![Some(5.0), Some(6.0), None]))
        );
    }

    #[test]
    fn non_numeric_cells_make_a_text_column() {
        let text = "colour,quality\nred,5\nwhite,6\n,7\n";
        let data = parse_dataset(text, None).unwrap();
        let colour = data.dataset.column("colour").unwrap();
        assert!(!colour.is_numeric());
        assert_eq!(
            colour,
            &Column::Text(vec!["red".into(), "white".into(), String::new()])
        );
    }

    #[test]
    fn header_names_are_exact_apart_from_bom_and_padding() {
        let text = "\u{feff}pH , Volatile Acidity\n3.3,0.5\n";
        let data = parse_dataset(text, None).unwrap();
        assert_eq!(data.dataset.names(), &["pH", "Volatile Acidity"]);
        assert!(data.dataset.column("volatile acidity").is_none());
    }

    #[test]
    fn overlong_rows_are_reported_and_skipped() {
        let text = "a,b\n1,2\n3,4,5\n6,7\n";
        let data = parse_dataset(text, None).unwrap();
        assert_eq!(data.rows_read, 3);
        assert_eq!(data.dataset.n_rows(), 2);
        assert_eq!(data.row_errors.len(), 1);
        assert_eq!(data.row_errors[0].line, 3);
    }

    #[test]
    fn duplicate_headers_and_empty_input_are_rejected() {
        assert_eq!(parse_dataset("a,a\n1,2\n", None).unwrap_err().exit_code(), 2);
        assert_eq!(parse_dataset("a,b\n", None).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn load_from_disk_and_report_missing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "x\ty\n1\t2\n3\t4\n").unwrap();
        let data = load_dataset(file.path(), None).unwrap();
        assert_eq!(data.delimiter, b'\t');
        assert_eq!(data.dataset.n_rows(), 2);

        let err = load_dataset(Path::new("/definitely/not/here.csv"), None).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("here.csv"));
    }
}
