use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::pipeline::Pipeline;

/// Shared handler state. Clones are cheap: the pipeline sits behind an `Arc`
/// and is never mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,

    /// Weights file the classifier was loaded from, re-checked by `/ready`.
    pub classifier_path: PathBuf,

    /// Directory holding the landing page and its assets.
    pub static_path: PathBuf,
}

impl AppState {
    pub fn new(pipeline: Arc<Pipeline>, config: &Config) -> Self {
        Self {
            pipeline,
            classifier_path: config.classifier_path.clone(),
            static_path: config.static_path.clone(),
        }
    }
}
