//! Error types.
//!
//! Two layers:
//!
//! - [`SelectError`]: the domain taxonomy raised by fitting, comparison,
//!   standardization and the selector itself.
//! - [`AppError`]: what the binary reports (message + process exit code).

use thiserror::Error;

/// Failures raised by the modelling pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectError {
    /// Missing/malformed columns or invalid selector settings.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Design matrix cannot be estimated (too few rows or rank deficient).
    #[error("unidentifiable model ({n_obs} observations, {n_params} parameters): {message}")]
    Unidentifiable {
        n_obs: usize,
        n_params: usize,
        message: String,
    },

    /// Comparison requested between models where `reduced` is not a strict subset of `full`.
    #[error("models are not nested: `{reduced}` is not a strict sub-model of `{full}`")]
    NotNested { reduced: String, full: String },

    /// Zero-variance column encountered during standardization.
    #[error("column `{column}` has zero variance and cannot be standardized")]
    DegenerateColumn { column: String },
}

impl SelectError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Exit code used when this error terminates the binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            SelectError::InvalidInput { .. } => 2,
            SelectError::Unidentifiable { .. } => 3,
            SelectError::NotNested { .. } | SelectError::DegenerateColumn { .. } => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<SelectError> for AppError {
    fn from(err: SelectError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
