use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncoderError {
    #[error("encoder model not found at path: {path}")]
    ModelNotFound { path: PathBuf },

    #[error("failed to load encoder model: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("encoder inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("tokenization failed: {reason}")]
    TokenizationFailed { reason: String },

    #[error("invalid encoder configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl From<candle_core::Error> for EncoderError {
    fn from(err: candle_core::Error) -> Self {
        EncoderError::InferenceFailed {
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for EncoderError {
    fn from(err: std::io::Error) -> Self {
        EncoderError::ModelLoadFailed {
            reason: err.to_string(),
        }
    }
}
