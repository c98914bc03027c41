//! Data handling: raw datasets, model frames, and derived tables.

pub mod frame;
pub mod sample;
pub mod standardize;
pub mod summary;

pub use frame::{Column, Dataset, ModelFrame};
pub use sample::{SampleConfig, SampleData, generate_wine_sample};
pub use standardize::standardize;
pub use summary::*;
