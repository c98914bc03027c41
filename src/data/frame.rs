//! Raw datasets and complete-case model frames.
//!
//! A [`Dataset`] is what ingest produces: named columns that are either numeric
//! (with missing cells) or text. A [`ModelFrame`] is the clean, all-numeric,
//! complete-case projection onto the columns a model actually uses.

use std::collections::HashSet;

use crate::error::SelectError;

/// One column of a loaded dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// `None` marks a missing cell.
    Numeric(Vec<Option<f64>>),
    Text(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Numeric(_))
    }
}

/// An immutable table of named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    names: Vec<String>,
    columns: Vec<Column>,
    n_rows: usize,
}

impl Dataset {
    /// Build a dataset, checking that names are unique and columns have equal length.
    pub fn new(names: Vec<String>, columns: Vec<Column>) -> Result<Self, SelectError> {
        if names.len() != columns.len() {
            return Err(SelectError::invalid_input(format!(
                "{} column names for {} columns",
                names.len(),
                columns.len()
            )));
        }
        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(SelectError::invalid_input(format!(
                    "duplicate column name `{name}`"
                )));
            }
        }
        let n_rows = columns.first().map(Column::len).unwrap_or(0);
        if let Some((name, col)) = names.iter().zip(&columns).find(|(_, c)| c.len() != n_rows) {
            return Err(SelectError::invalid_input(format!(
                "column `{name}` has {} rows, expected {n_rows}",
                col.len()
            )));
        }
        Ok(Self {
            names,
            columns,
            n_rows,
        })
    }

    /// Convenience constructor for fully observed numeric data.
    pub fn from_numeric(columns: Vec<(&str, Vec<f64>)>) -> Result<Self, SelectError> {
        let (names, cols): (Vec<String>, Vec<Column>) = columns
            .into_iter()
            .map(|(name, values)| {
                (
                    name.to_string(),
                    Column::Numeric(values.into_iter().map(Some).collect()),
                )
            })
            .unzip();
        Self::new(names, cols)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.columns[i])
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(String::as_str).zip(self.columns.iter())
    }
}

/// All-numeric, complete-case data used for fitting.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelFrame {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
    n_rows: usize,
    dropped_rows: usize,
}

impl ModelFrame {
    /// Build a frame from already-clean numeric columns.
    pub fn from_columns(names: Vec<String>, columns: Vec<Vec<f64>>) -> Result<Self, SelectError> {
        let raw: Vec<Column> = columns
            .into_iter()
            .map(|c| Column::Numeric(c.into_iter().map(Some).collect()))
            .collect();
        let dataset = Dataset::new(names.clone(), raw)?;
        Self::from_dataset(&dataset, &names)
    }

    /// Project `dataset` onto `vars`, dropping rows with any missing value among them.
    ///
    /// Duplicate names in `vars` are ignored after their first occurrence.
    pub fn from_dataset(dataset: &Dataset, vars: &[String]) -> Result<Self, SelectError> {
        let mut names: Vec<String> = Vec::with_capacity(vars.len());
        for v in vars {
            if !names.contains(v) {
                names.push(v.clone());
            }
        }
        if names.is_empty() {
            return Err(SelectError::invalid_input("no columns requested"));
        }

        let mut sources = Vec::with_capacity(names.len());
        for name in &names {
            match dataset.column(name) {
                Some(Column::Numeric(values)) => sources.push(values),
                Some(Column::Text(_)) => {
                    return Err(SelectError::invalid_input(format!(
                        "column `{name}` is not numeric"
                    )));
                }
                None => {
                    return Err(SelectError::invalid_input(format!(
                        "column `{name}` not found (available: {})",
                        dataset.names().join(", ")
                    )));
                }
            }
        }

        let mut columns: Vec<Vec<f64>> = vec![Vec::with_capacity(dataset.n_rows()); names.len()];
        let mut dropped_rows = 0usize;
        for row in 0..dataset.n_rows() {
            let complete = sources
                .iter()
                .all(|col| matches!(col[row], Some(v) if v.is_finite()));
            if !complete {
                dropped_rows += 1;
                continue;
            }
            for (out, col) in columns.iter_mut().zip(&sources) {
                if let Some(v) = col[row] {
                    out.push(v);
                }
            }
        }

        let n_rows = columns[0].len();
        if n_rows == 0 {
            return Err(SelectError::invalid_input(format!(
                "no complete cases for columns: {}",
                names.join(", ")
            )));
        }

        Ok(Self {
            names,
            columns,
            n_rows,
            dropped_rows,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Rows removed from the source dataset because of missing values.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i].as_slice())
    }

    /// Like [`ModelFrame::column`] but reports a missing column as `InvalidInput`.
    pub fn require(&self, name: &str) -> Result<&[f64], SelectError> {
        self.column(name).ok_or_else(|| {
            SelectError::invalid_input(format!("column `{name}` is not in the model frame"))
        })
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
    }

    /// A frame with the same shape whose columns are transformed by `f`.
    pub(crate) fn map_columns<F>(&self, mut f: F) -> Result<Self, SelectError>
    where
        F: FnMut(&str, &[f64]) -> Result<Vec<f64>, SelectError>,
    {
        let columns = self
            .columns()
            .map(|(name, col)| f(name, col))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            names: self.names.clone(),
            columns,
            n_rows: self.n_rows,
            dropped_rows: self.dropped_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn drops_rows_with_missing_relevant_values_only() {
        let ds = Dataset::new(
            names(&["y", "x", "unused"]),
            vec![
                Column::Numeric(vec![Some(1.0), Some(2.0), None, Some(4.0)]),
                Column::Numeric(vec![Some(1.0), None, Some(3.0), Some(4.0)]),
                Column::Numeric(vec![None, None, None, None]),
            ],
        )
        .unwrap();

        let frame = ModelFrame::from_dataset(&ds, &names(&["y", "x"])).unwrap();
        assert_eq!(frame.n_rows(), 2);
        assert_eq!(frame.dropped_rows(), 2);
        assert_eq!(frame.column("y").unwrap(), &[1.0, 4.0]);
        assert_eq!(frame.column("x").unwrap(), &[1.0, 4.0]);
    }

    #[test]
    fn rejects_missing_and_text_columns() {
        let ds = Dataset::new(
            names(&["y", "label"]),
            vec![
                Column::Numeric(vec![Some(1.0)]),
                Column::Text(vec!["red".to_string()]),
            ],
        )
        .unwrap();

        let err = ModelFrame::from_dataset(&ds, &names(&["y", "label"])).unwrap_err();
        assert!(matches!(err, SelectError::InvalidInput { .. }));
        assert!(err.to_string().contains("not numeric"));

        let err = ModelFrame::from_dataset(&ds, &names(&["y", "pH"])).unwrap_err();
        assert!(err.to_string().contains("`pH` not found"));
    }

    #[test]
    fn duplicate_variable_requests_are_collapsed() {
        let ds = Dataset::from_numeric(vec![("y", vec![1.0, 2.0]), ("x", vec![3.0, 4.0])]).unwrap();
        let frame = ModelFrame::from_dataset(&ds, &names(&["y", "x", "x"])).unwrap();
        assert_eq!(frame.names(), &names(&["y", "x"])[..]);
    }

    #[test]
    fn dataset_rejects_ragged_columns() {
        let err = Dataset::new(
            names(&["a", "b"]),
            vec![
                Column::Numeric(vec![Some(1.0)]),
                Column::Numeric(vec![Some(1.0), Some(2.0)]),
            ],
        )
        .unwrap_err();
        assert!(err.to_string().contains("expected 1"));
    }

    #[test]
    fn no_complete_cases_is_invalid_input() {
        let ds = Dataset::new(
            names(&["y"]),
            vec![Column::Numeric(vec![None, Some(f64::NAN)])],
        )
        .unwrap();
        let err = ModelFrame::from_dataset(&ds, &names(&["y"])).unwrap_err();
        assert!(err.to_string().contains("no complete cases"));
    }
}
