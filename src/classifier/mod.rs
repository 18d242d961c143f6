//! Verdict head: a softmax classifier over article embeddings.
//!
//! The head is a single linear layer stored as a safetensors file, applied to
//! one embedding per request. Two-class heads trained as logistic regression
//! export cleanly into this shape.

mod error;


pub use error::ClassifierError;

use std::collections::HashMap;
use std::path::Path;

use candle_core::{D, DType, Device, Tensor};
use candle_nn::{Linear, Module};
use tracing::{debug, info};

#[cfg(any(test, feature = "mock"))]
use crate::constants::NUM_CLASSES;

/// Result of classifying one embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Index of the highest-probability class (ties keep the lowest index).
    pub class_index: usize,
    /// Softmax probabilities in class-index order.
    pub probabilities: Vec<f32>,
}

/// Linear classifier head loaded from safetensors weights.
pub struct LinearClassifier {
    linear: Linear,
    input_dim: usize,
    num_classes: usize,
    device: Device,
}

impl std::fmt::Debug for LinearClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinearClassifier")
            .field("input_dim", &self.input_dim)
            .field("num_classes", &self.num_classes)
            .field("device", &format!("{:?}", self.device))
            .finish()
    }
}

impl LinearClassifier {
    /// Loads head weights from a safetensors file.
    ///
    /// Accepts bare `weight`/`bias` tensor names as well as the
    /// `classifier.`-prefixed names left behind when the head is exported
    /// from a full fine-tuned checkpoint.
    pub fn load(path: &Path, device: &Device) -> Result<Self, ClassifierError> {
        if !path.exists() {
            return Err(ClassifierError::WeightsNotFound {
                path: path.to_path_buf(),
            });
        }

        let tensors = candle_core::safetensors::load(path, device).map_err(|e| {
            ClassifierError::LoadFailed {
                reason: e.to_string(),
            }
        })?;

        let weight = Self::named_tensor(&tensors, "weight")?;
        let bias = Self::named_tensor(&tensors, "bias")?;

        let classifier = Self::from_tensors(weight, bias)?;

        info!(
            path = %path.display(),
            input_dim = classifier.input_dim,
            num_classes = classifier.num_classes,
            "Classifier head loaded"
        );

        Ok(classifier)
    }

    /// Builds a head from a weight `[classes, dim]` and bias `[classes]`
    /// tensor pair.
    pub fn from_tensors(weight: Tensor, bias: Tensor) -> Result<Self, ClassifierError> {
        let weight = weight
            .to_dtype(DType::F32)
            .map_err(|e| ClassifierError::LoadFailed {
                reason: e.to_string(),
            })?;
        let bias = bias
            .to_dtype(DType::F32)
            .map_err(|e| ClassifierError::LoadFailed {
                reason: e.to_string(),
            })?;

        let (num_classes, input_dim) =
            weight.dims2().map_err(|_| ClassifierError::InvalidShape {
                reason: format!(
                    "weight must be rank 2 [classes, dim], got shape {:?}",
                    weight.dims()
                ),
            })?;

        let bias_len = bias.dims1().map_err(|_| ClassifierError::InvalidShape {
            reason: format!("bias must be rank 1 [classes], got shape {:?}", bias.dims()),
        })?;

        if bias_len != num_classes {
            return Err(ClassifierError::InvalidShape {
                reason: format!(
                    "bias has {} entries but weight describes {} classes",
                    bias_len, num_classes
                ),
            });
        }

        if num_classes < 2 {
            return Err(ClassifierError::InvalidShape {
                reason: format!("classifier needs at least 2 classes, got {}", num_classes),
            });
        }

        if input_dim == 0 {
            return Err(ClassifierError::InvalidShape {
                reason: "classifier input dimension must be greater than zero".to_string(),
            });
        }

        let device = weight.device().clone();

        Ok(Self {
            linear: Linear::new(weight, Some(bias)),
            input_dim,
            num_classes,
            device,
        })
    }

    /// Builds a deterministic test head with alternating-sign weights.
    #[cfg(any(test, feature = "mock"))]
    pub fn stub(input_dim: usize) -> Result<Self, ClassifierError> {
        let device = Device::Cpu;

        let mut data: Vec<f32> = Vec::with_capacity(NUM_CLASSES * input_dim);
        for class in 0..NUM_CLASSES {
            for i in 0..input_dim {
                let sign = if (i + class) % 2 == 0 { 1.0 } else { -1.0 };
                data.push(sign);
            }
        }

        let weight = Tensor::from_vec(data, (NUM_CLASSES, input_dim), &device)?;
        let bias = Tensor::zeros(NUM_CLASSES, DType::F32, &device)?;

        Self::from_tensors(weight, bias)
    }

    /// Classifies one embedding, returning the winning class index and the
    /// full probability distribution.
    pub fn predict(&self, embedding: &[f32]) -> Result<Prediction, ClassifierError> {
        if embedding.len() != self.input_dim {
            return Err(ClassifierError::InvalidShape {
                reason: format!(
                    "embedding has {} values, classifier expects {}",
                    embedding.len(),
                    self.input_dim
                ),
            });
        }

        let input = Tensor::from_vec(embedding.to_vec(), (1, self.input_dim), &self.device)?;
        let logits = self.linear.forward(&input)?;
        let probabilities = candle_nn::ops::softmax(&logits, D::Minus1)?
            .squeeze(0)?
            .to_vec1::<f32>()?;

        let class_index = argmax(&probabilities);

        debug!(class_index, "Classified embedding");

        Ok(Prediction {
            class_index,
            probabilities,
        })
    }

    /// Returns the embedding width this head expects.
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    /// Returns the number of output classes.
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    fn named_tensor(
        tensors: &HashMap<String, Tensor>,
        name: &str,
    ) -> Result<Tensor, ClassifierError> {
        tensors
            .get(name)
            .or_else(|| tensors.get(&format!("classifier.{name}")))
            .cloned()
            .ok_or_else(|| ClassifierError::LoadFailed {
                reason: format!("missing tensor '{name}' (or 'classifier.{name}')"),
            })
    }
}

/// First maximum wins, so ties resolve to the lowest class index.
fn argmax(probabilities: &[f32]) -> usize {
    let mut best = 0;
    for (index, p) in probabilities.iter().enumerate().skip(1) {
        if *p > probabilities[best] {
            best = index;
        }
    }
    best
}
