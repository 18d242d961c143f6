use std::path::PathBuf;

use super::error::EncoderError;
use super::source::EmbeddingSource;
use crate::constants::{DEFAULT_HIDDEN_SIZE, MAX_SEQ_LEN};

/// Configuration for [`NewsEncoder`](super::NewsEncoder).
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Directory holding `config.json` and `model.safetensors`.
    pub encoder_path: PathBuf,
    /// Path to `tokenizer.json` (or a directory containing it).
    pub tokenizer_path: PathBuf,
    /// Max tokens per article before truncation.
    pub max_seq_len: usize,
    /// Which encoder output becomes the embedding.
    pub embedding_source: EmbeddingSource,
    /// Embedding width reported in stub mode (real mode reads it from
    /// `config.json`).
    pub embedding_dim: usize,
    /// If true, run in deterministic stub mode (no model files required).
    pub testing_stub: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            encoder_path: PathBuf::new(),
            tokenizer_path: PathBuf::new(),
            max_seq_len: MAX_SEQ_LEN,
            embedding_source: EmbeddingSource::Cls,
            embedding_dim: DEFAULT_HIDDEN_SIZE,
            testing_stub: false,
        }
    }
}

impl EncoderConfig {
    /// Creates a config for a model directory, inferring `tokenizer.json`
    /// from the same directory.
    pub fn new<P: Into<PathBuf>>(encoder_path: P) -> Self {
        let encoder_path = encoder_path.into();
        let tokenizer_path = encoder_path.clone();

        Self {
            encoder_path,
            tokenizer_path,
            ..Default::default()
        }
    }

    /// Creates a stub config (no model files; produces deterministic
    /// embeddings).
    pub fn stub() -> Self {
        Self {
            testing_stub: true,
            ..Default::default()
        }
    }

    /// Validates required fields for non-stub mode.
    pub fn validate(&self) -> Result<(), EncoderError> {
        if self.max_seq_len == 0 {
            return Err(EncoderError::InvalidConfig {
                reason: "max_seq_len must be greater than zero".to_string(),
            });
        }

        if self.embedding_dim == 0 {
            return Err(EncoderError::InvalidConfig {
                reason: "embedding_dim must be greater than zero".to_string(),
            });
        }

        if self.testing_stub {
            return Ok(());
        }

        if self.encoder_path.as_os_str().is_empty() {
            return Err(EncoderError::InvalidConfig {
                reason: "encoder_path is required (stubbing is disabled)".to_string(),
            });
        }

        if !self.encoder_path.exists() {
            return Err(EncoderError::ModelNotFound {
                path: self.encoder_path.clone(),
            });
        }

        Ok(())
    }

    /// Returns `true` if the encoder weights file exists.
    pub fn model_available(&self) -> bool {
        !self.encoder_path.as_os_str().is_empty()
            && self.encoder_path.join("model.safetensors").exists()
    }

    /// Returns `true` if the tokenizer path exists.
    pub fn tokenizer_available(&self) -> bool {
        !self.tokenizer_path.as_os_str().is_empty() && self.tokenizer_path.exists()
    }
}
