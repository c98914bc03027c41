//! Synthetic wine-quality sample generation.
//!
//! Produces a frame shaped like the red wine dataset (`pH`, `volatile acidity`,
//! `alcohol`, `quality`) where quality depends on the three predictors through
//! main effects only. Useful for demos and for exercising the selector on data
//! whose correct answer is known.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::data::frame::{Column, Dataset, ModelFrame};
use crate::error::SelectError;

/// Predictor distributions: (name, mean, sd, floor).
///
/// Moments roughly follow the red wine data; the floor keeps draws physical.
const PREDICTORS: [(&str, f64, f64, f64); 3] = [
    ("pH", 3.31, 0.154, 2.7),
    ("volatile acidity", 0.528, 0.179, 0.12),
    ("alcohol", 10.42, 1.07, 8.4),
];

/// Main-effect coefficients, aligned with `PREDICTORS`.
const EFFECTS: [f64; 3] = [-0.8, -1.2, 0.31];

const INTERCEPT: f64 = 5.7;

pub const OUTCOME: &str = "quality";

#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub rows: usize,
    pub seed: u64,
    /// Standard deviation of the Gaussian noise added to quality.
    pub noise_sd: f64,
    /// Round quality to the nearest integer score (as in the real data).
    pub round_outcome: bool,
    /// Probability that any single predictor cell is left missing.
    pub missing_rate: f64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            rows: 1_599,
            seed: 42,
            noise_sd: 0.65,
            round_outcome: true,
            missing_rate: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SampleData {
    pub dataset: Dataset,
}

impl SampleData {
    /// Complete-case frame over every generated column.
    pub fn to_frame(&self) -> Result<ModelFrame, SelectError> {
        ModelFrame::from_dataset(&self.dataset, self.dataset.names())
    }
}

/// Names of the generated predictor columns, in column order.
pub fn predictor_names() -> Vec<String> {
    PREDICTORS.iter().map(|(name, ..)| name.to_string()).collect()
}

pub fn generate_wine_sample(config: &SampleConfig) -> Result<SampleData, SelectError> {
    if config.rows == 0 {
        return Err(SelectError::invalid_input("sample row count must be > 0"));
    }
    if !(config.noise_sd.is_finite() && config.noise_sd >= 0.0) {
        return Err(SelectError::invalid_input("noise standard deviation must be >= 0"));
    }
    if !(0.0..1.0).contains(&config.missing_rate) {
        return Err(SelectError::invalid_input("missing rate must be in [0, 1)"));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let unit = Normal::new(0.0, 1.0)
        .map_err(|e| SelectError::invalid_input(format!("noise distribution error: {e}")))?;

    let mut predictors: Vec<Vec<Option<f64>>> =
        vec![Vec::with_capacity(config.rows); PREDICTORS.len()];
    let mut quality = Vec::with_capacity(config.rows);

    for _ in 0..config.rows {
        let mut y = INTERCEPT;
        for (j, &(_, mean, sd, floor)) in PREDICTORS.iter().enumerate() {
            let x = (mean + sd * unit.sample(&mut rng)).max(floor);
            y += EFFECTS[j] * x;

            let missing = config.missing_rate > 0.0 && rng.gen_bool(config.missing_rate);
            predictors[j].push(if missing { None } else { Some(x) });
        }
        y += config.noise_sd * unit.sample(&mut rng);
        if config.round_outcome {
            y = y.round();
        }
        quality.push(Some(y));
    }

    let mut names: Vec<String> = predictor_names();
    names.push(OUTCOME.to_string());
    let mut columns: Vec<Column> = predictors.into_iter().map(Column::Numeric).collect();
    columns.push(Column::Numeric(quality));

    Ok(SampleData {
        dataset: Dataset::new(names, columns)?,
    })
}
