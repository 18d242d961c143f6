use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier weights not found at path: {path}")]
    WeightsNotFound { path: PathBuf },

    #[error("failed to load classifier weights: {reason}")]
    LoadFailed { reason: String },

    #[error("classifier inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("invalid classifier shape: {reason}")]
    InvalidShape { reason: String },
}

impl From<candle_core::Error> for ClassifierError {
    fn from(err: candle_core::Error) -> Self {
        ClassifierError::InferenceFailed {
            reason: err.to_string(),
        }
    }
}
