use serde::{Deserialize, Serialize};

/// Article submitted for a verdict. Unknown fields are ignored.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PredictRequest {
    pub title: String,
    pub text: String,
}

/// Wire shape of a successful `/predict` response.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PredictResponse {
    pub prediction: String,
    pub probabilities: Vec<f32>,
}
