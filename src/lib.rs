//! Veritas library crate (used by the server and integration tests).
//!
//! # Public API Surface
//!
//! This crate exposes the building blocks of the verdict service so the
//! server binary and integration tests share one implementation. The exports
//! are organized by module:
//!
//! ## Core Types (Stable)
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`Pipeline`], [`Verdict`] - End-to-end article classification
//! - [`LabelMap`] - Class-index to public-label table
//!
//! ## Encoding & Classification
//! - [`NewsEncoder`], [`EncoderConfig`], [`EmbeddingSource`] - Article embeddings
//! - [`LinearClassifier`], [`Prediction`] - Verdict head over embeddings
//!
//! ## Gateway
//! - [`AppState`], [`create_router_with_state`] - Axum router assembly
//! - [`PredictRequest`], [`PredictResponse`] - Wire types for `/predict`
//! - [`ApiError`], [`ErrorResponse`] - HTTP error mapping
//!
//! ## Constants
//! Sequence-length and dimension constants are exported for consistency
//! across modules; [`validate_embedding_dim`] guards encoder/classifier
//! compatibility at startup.
//!
//! ## Test/Mock Support
//! Stub constructors (`Pipeline::stub`, `NewsEncoder::stub`,
//! `LinearClassifier::stub`) are available behind
//! `#[cfg(any(test, feature = "mock"))]`.

pub mod classifier;
pub mod config;
pub mod constants;
pub mod encoder;
pub mod gateway;
pub mod labels;
pub mod pipeline;

pub use classifier::{ClassifierError, LinearClassifier, Prediction};
pub use config::{Config, ConfigError};
pub use constants::{
    DEFAULT_HIDDEN_SIZE, DimValidationError, MAX_SEQ_LEN, NUM_CLASSES, validate_embedding_dim,
};
pub use encoder::{EmbeddingSource, EncoderConfig, EncoderError, NewsEncoder};
pub use gateway::error::{ApiError, ErrorResponse};
pub use gateway::payload::{PredictRequest, PredictResponse};
pub use gateway::{
    AppState, VERITAS_STATUS_ERROR, VERITAS_STATUS_HEADER, VERITAS_STATUS_HEALTHY,
    VERITAS_STATUS_READY, VERITAS_STATUS_VERDICT, create_router_with_state, predict_handler,
};
pub use labels::{LABEL_FAKE, LABEL_TRUE, LabelError, LabelMap};
pub use pipeline::{Pipeline, PipelineError, Verdict};
