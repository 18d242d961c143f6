use thiserror::Error;

use crate::classifier::ClassifierError;
use crate::constants::DimValidationError;
use crate::encoder::EncoderError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("encoder error: {0}")]
    Encoder(#[from] EncoderError),

    #[error("classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("embedding dimension mismatch: {0}")]
    DimensionMismatch(#[from] DimValidationError),

    #[error("classifier produces {classes} classes but the label table names {labels}")]
    ClassCountMismatch { classes: usize, labels: usize },

    #[error("class index {index} has no label (table has {labels} entries)")]
    LabelIndexOutOfRange { index: usize, labels: usize },
}
