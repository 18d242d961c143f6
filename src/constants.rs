//! Cross-cutting, shared constants.
//!
//! # Dimension Invariants
//!
//! The classifier head must have been trained on embeddings of the exact
//! dimensionality the encoder produces. A mismatch does not fail loudly on
//! its own; it silently yields nonsense predictions. Modules agree on
//! dimensions at load time:
//!
//! 1. The encoder reports its hidden size after loading the checkpoint
//! 2. The classifier reports the input width of its weight matrix
//! 3. [`validate_embedding_dim`] is called once at pipeline construction and
//!    rejects the pair before any request is served

/// Maximum subword tokens fed to the encoder. Longer inputs are truncated,
/// never rejected.
pub const MAX_SEQ_LEN: usize = 256;

/// Number of output classes produced by the verdict classifier.
pub const NUM_CLASSES: usize = 2;

/// Hidden size of the BERT-base family, used as the stub embedding dimension
/// when no checkpoint is loaded.
pub const DEFAULT_HIDDEN_SIZE: usize = 768;

/// Error returned when dimension validation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimValidationError {
    /// An embedding dimension of zero means a corrupt or empty artifact.
    ZeroDimension,
    /// Encoder output width does not match the classifier's expected input width.
    DimensionMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for DimValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroDimension => write!(f, "embedding dimension cannot be zero"),
            Self::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "dimension mismatch: classifier expects {}, encoder produces {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for DimValidationError {}

/// Validates that the encoder's output dimension matches the classifier's
/// expected input dimension.
///
/// Call this at pipeline construction to catch artifact mismatches before the
/// first request, rather than serving silently wrong predictions.
pub fn validate_embedding_dim(actual: usize, expected: usize) -> Result<(), DimValidationError> {
    if actual == 0 || expected == 0 {
        return Err(DimValidationError::ZeroDimension);
    }
    if actual != expected {
        return Err(DimValidationError::DimensionMismatch { expected, actual });
    }
    Ok(())
}
