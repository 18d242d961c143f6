//! News article encoder (BERT family via candle).
//!
//! Turns raw article text into one fixed-width embedding per request, using
//! either the `[CLS]` hidden state or the checkpoint's pooler output. Use
//! [`EncoderConfig::stub`] for tests without model files.

/// Encoder configuration.
pub mod config;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
/// Embedding source selection (`cls` / `pooled`).
pub mod source;
/// Tokenizer loading helpers.
pub(crate) mod utils;


pub use config::EncoderConfig;
pub use error::EncoderError;
pub use source::EmbeddingSource;

use candle_core::{DType, Device, IndexOp, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use device::select_device;
use utils::load_tokenizer_with_limits;

struct LoadedEncoder {
    bert: BertModel,
    pooler: Option<Linear>,
    tokenizer: Tokenizer,
    device: Device,
    hidden_size: usize,
}

enum EncoderBackend {
    Model(Box<LoadedEncoder>),
    Stub { device: Device },
}

/// Article encoder producing one embedding per input (supports stub mode).
pub struct NewsEncoder {
    backend: EncoderBackend,
    config: EncoderConfig,
}

impl std::fmt::Debug for NewsEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsEncoder")
            .field(
                "backend",
                &match &self.backend {
                    EncoderBackend::Model(loaded) => format!("Model({:?})", loaded.device),
                    EncoderBackend::Stub { device } => format!("Stub({:?})", device),
                },
            )
            .field("embedding_dim", &self.embedding_dim())
            .field("embedding_source", &self.config.embedding_source)
            .field("max_seq_len", &self.config.max_seq_len)
            .finish()
    }
}

impl NewsEncoder {
    /// Loads the encoder from a config (stub mode is supported).
    pub fn load(config: EncoderConfig) -> Result<Self, EncoderError> {
        config.validate()?;

        let device = select_device()?;
        debug!(?device, "Selected compute device for encoder");

        if config.testing_stub {
            warn!("Encoder running in STUB mode (testing only)");
            return Ok(Self {
                backend: EncoderBackend::Stub { device },
                config,
            });
        }

        let loaded = Self::load_model(&config, device)?;

        info!(
            encoder_path = %config.encoder_path.display(),
            hidden_size = loaded.hidden_size,
            max_seq_len = config.max_seq_len,
            embedding_source = %config.embedding_source,
            "Encoder model loaded successfully"
        );

        Ok(Self {
            backend: EncoderBackend::Model(Box::new(loaded)),
            config,
        })
    }

    /// Creates a stub encoder for tests.
    #[cfg(any(test, feature = "mock"))]
    pub fn stub() -> Result<Self, EncoderError> {
        Self::load(EncoderConfig::stub())
    }

    fn load_model(config: &EncoderConfig, device: Device) -> Result<LoadedEncoder, EncoderError> {
        let tokenizer = load_tokenizer_with_limits(&config.tokenizer_path, config.max_seq_len)
            .map_err(|e| EncoderError::TokenizationFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            })?;

        let config_path = config.encoder_path.join("config.json");
        if !config_path.exists() {
            return Err(EncoderError::ModelLoadFailed {
                reason: format!("Missing config.json in {}", config.encoder_path.display()),
            });
        }

        let weights_path = config.encoder_path.join("model.safetensors");
        if !weights_path.exists() {
            return Err(EncoderError::ModelLoadFailed {
                reason: format!(
                    "Missing model.safetensors in {}",
                    config.encoder_path.display()
                ),
            });
        }

        let config_content = std::fs::read_to_string(&config_path)?;
        let bert_config: BertConfig =
            serde_json::from_str(&config_content).map_err(|e| EncoderError::ModelLoadFailed {
                reason: format!("Failed to parse config.json: {}", e),
            })?;
        let hidden_size = bert_config.hidden_size;

        let vb =
            unsafe { VarBuilder::from_mmaped_safetensors(&[&weights_path], DType::F32, &device)? };

        // Checkpoints exported by different toolchains prefix the encoder
        // weights differently.
        let root = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            vb.pp("bert")
        } else if vb.contains_tensor("roberta.embeddings.word_embeddings.weight") {
            vb.pp("roberta")
        } else {
            vb
        };

        let bert = BertModel::load(root.clone(), &bert_config)?;

        let pooler = match config.embedding_source {
            EmbeddingSource::Cls => None,
            EmbeddingSource::Pooled => {
                if !root.contains_tensor("pooler.dense.weight") {
                    return Err(EncoderError::InvalidConfig {
                        reason: "embedding source 'pooled' requires pooler weights in the \
                                 checkpoint"
                            .to_string(),
                    });
                }

                let dense =
                    candle_nn::linear(hidden_size, hidden_size, root.pp("pooler").pp("dense"))?;
                Some(dense)
            }
        };

        Ok(LoadedEncoder {
            bert,
            pooler,
            tokenizer,
            device,
            hidden_size,
        })
    }

    /// Encodes one article into an embedding vector.
    pub fn embed(&self, text: &str) -> Result<Vec<f32>, EncoderError> {
        match &self.backend {
            EncoderBackend::Model(loaded) => Self::embed_with_model(text, loaded),
            EncoderBackend::Stub { .. } => self.embed_stub(text),
        }
    }

    fn embed_with_model(text: &str, loaded: &LoadedEncoder) -> Result<Vec<f32>, EncoderError> {
        let encoding = loaded
            .tokenizer
            .encode(text, true)
            .map_err(|e| EncoderError::TokenizationFailed {
                reason: e.to_string(),
            })?;

        if encoding.get_ids().is_empty() {
            return Ok(vec![0.0; loaded.hidden_size]);
        }

        debug!(
            text_len = text.len(),
            token_count = encoding.get_ids().len(),
            "Encoding article (transformer forward pass)"
        );

        let token_ids = Tensor::new(encoding.get_ids(), &loaded.device)?.unsqueeze(0)?;
        let type_ids = Tensor::new(encoding.get_type_ids(), &loaded.device)?.unsqueeze(0)?;
        let attention_mask = Tensor::new(encoding.get_attention_mask(), &loaded.device)?
            .unsqueeze(0)?;

        // hidden_states shape: [1, seq_len, hidden_size]
        let hidden_states = loaded
            .bert
            .forward(&token_ids, &type_ids, Some(&attention_mask))?;

        let cls = hidden_states.i((.., 0, ..))?;

        let embedding = match &loaded.pooler {
            Some(pooler) => pooler.forward(&cls)?.tanh()?,
            None => cls,
        };

        let embedding = embedding.squeeze(0)?.to_vec1::<f32>()?;

        Ok(embedding)
    }

    fn embed_stub(&self, text: &str) -> Result<Vec<f32>, EncoderError> {
        use std::hash::{DefaultHasher, Hash, Hasher};

        debug!(text_len = text.len(), "Generating stub embedding");

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let seed = hasher.finish();

        let mut embedding = Vec::with_capacity(self.config.embedding_dim);
        let mut state = seed;

        for _ in 0..self.config.embedding_dim {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            embedding.push(value);
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut embedding {
                *x /= norm;
            }
        }

        Ok(embedding)
    }

    /// Returns the embedding width this encoder produces.
    pub fn embedding_dim(&self) -> usize {
        match &self.backend {
            EncoderBackend::Model(loaded) => loaded.hidden_size,
            EncoderBackend::Stub { .. } => self.config.embedding_dim,
        }
    }

    /// Returns which encoder output becomes the embedding.
    pub fn embedding_source(&self) -> EmbeddingSource {
        self.config.embedding_source
    }

    /// Returns the compute device in use.
    pub fn device(&self) -> &Device {
        match &self.backend {
            EncoderBackend::Model(loaded) => &loaded.device,
            EncoderBackend::Stub { device } => device,
        }
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EncoderBackend::Stub { .. })
    }

    /// Returns `true` if a model is loaded.
    pub fn has_model(&self) -> bool {
        matches!(self.backend, EncoderBackend::Model(_))
    }

    /// Returns the encoder configuration.
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }
}
