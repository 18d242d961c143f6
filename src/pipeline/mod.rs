//! End-to-end verdict pipeline: join the article fields, encode, classify,
//! and map the winning class index to its label.
//!
//! A [`Pipeline`] is immutable after construction and shared across requests
//! behind an `Arc`.

mod error;


pub use error::PipelineError;

use tracing::{debug, info};

use crate::classifier::LinearClassifier;
use crate::config::Config;
use crate::constants::validate_embedding_dim;
use crate::encoder::{EncoderConfig, NewsEncoder};
use crate::labels::LabelMap;

/// Final classification for one article.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    /// Label of the winning class.
    pub label: String,
    /// Softmax probabilities in class-index order.
    pub probabilities: Vec<f32>,
}

/// Immutable inference pipeline shared across requests.
pub struct Pipeline {
    encoder: NewsEncoder,
    classifier: LinearClassifier,
    labels: LabelMap,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("encoder", &self.encoder)
            .field("classifier", &self.classifier)
            .field("labels", &self.labels)
            .finish()
    }
}

impl Pipeline {
    /// Assembles a pipeline and checks that the pieces fit together: the
    /// encoder output width must match the classifier input, and the label
    /// table must name every class.
    pub fn new(
        encoder: NewsEncoder,
        classifier: LinearClassifier,
        labels: LabelMap,
    ) -> Result<Self, PipelineError> {
        validate_embedding_dim(encoder.embedding_dim(), classifier.input_dim())?;

        if classifier.num_classes() != labels.num_classes() {
            return Err(PipelineError::ClassCountMismatch {
                classes: classifier.num_classes(),
                labels: labels.num_classes(),
            });
        }

        Ok(Self {
            encoder,
            classifier,
            labels,
        })
    }

    /// Loads every model artifact the config names and assembles the
    /// pipeline. Any failure here is fatal at startup.
    pub fn load(config: &Config) -> Result<Self, PipelineError> {
        let encoder_config = EncoderConfig {
            encoder_path: config.encoder_path.clone(),
            tokenizer_path: config.tokenizer_path.clone(),
            embedding_source: config.embedding_source,
            ..Default::default()
        };
        let encoder = NewsEncoder::load(encoder_config)?;

        let classifier = LinearClassifier::load(&config.classifier_path, encoder.device())?;

        let pipeline = Self::new(encoder, classifier, config.labels.clone())?;

        info!(
            embedding_dim = pipeline.classifier.input_dim(),
            labels = %pipeline.labels,
            embedding_source = %pipeline.encoder.embedding_source(),
            "Inference pipeline ready"
        );

        Ok(pipeline)
    }

    /// Builds a fully stubbed pipeline for tests (no model files).
    #[cfg(any(test, feature = "mock"))]
    pub fn stub() -> Result<Self, PipelineError> {
        Self::stub_with_labels(LabelMap::default())
    }

    /// Builds a stubbed pipeline with a specific label table.
    #[cfg(any(test, feature = "mock"))]
    pub fn stub_with_labels(labels: LabelMap) -> Result<Self, PipelineError> {
        let encoder = NewsEncoder::stub()?;
        let classifier = LinearClassifier::stub(encoder.embedding_dim())?;
        Self::new(encoder, classifier, labels)
    }

    /// Classifies one article, joining title and body the way the model was
    /// trained on: `title`, one space, then `text`.
    pub fn classify(&self, title: &str, text: &str) -> Result<Verdict, PipelineError> {
        let joined_input = format!("{title} {text}");

        debug!(
            title_len = title.len(),
            text_len = text.len(),
            "Classifying article"
        );

        let embedding = self.encoder.embed(&joined_input)?;
        let prediction = self.classifier.predict(&embedding)?;

        let label = self
            .labels
            .label_for(prediction.class_index)
            .ok_or_else(|| PipelineError::LabelIndexOutOfRange {
                index: prediction.class_index,
                labels: self.labels.num_classes(),
            })?
            .to_string();

        debug!(label = %label, "Article classified");

        Ok(Verdict {
            label,
            probabilities: prediction.probabilities,
        })
    }

    /// Returns the encoder stage.
    pub fn encoder(&self) -> &NewsEncoder {
        &self.encoder
    }

    /// Returns the label table in class-index order.
    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }

    /// Returns the embedding width flowing between the stages.
    pub fn embedding_dim(&self) -> usize {
        self.classifier.input_dim()
    }
}
