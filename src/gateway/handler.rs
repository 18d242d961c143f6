use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, error, instrument};

use crate::gateway::error::ApiError;
use crate::gateway::payload::{PredictRequest, PredictResponse};
use crate::gateway::state::AppState;
use crate::gateway::{VERITAS_STATUS_HEADER, VERITAS_STATUS_VERDICT};
use crate::pipeline::Verdict;

#[instrument(skip(state, request))]
pub async fn predict_handler(
    State(state): State<AppState>,
    Json(request): Json<serde_json::Value>,
) -> Result<Response, ApiError> {
    let request: PredictRequest = serde_json::from_value(request)
        .map_err(|e| ApiError::InvalidRequest(format!("Invalid request schema: {}", e)))?;

    debug!(
        title_len = request.title.len(),
        text_len = request.text.len(),
        "Processing predict request"
    );

    // The forward pass holds a CPU core for its full duration.
    let pipeline = state.pipeline.clone();
    let verdict =
        tokio::task::spawn_blocking(move || pipeline.classify(&request.title, &request.text))
            .await
            .map_err(|e| ApiError::InternalError(format!("Inference task failed: {}", e)))?
            .map_err(|e| {
                error!(error = %e, "Classification failed");
                ApiError::InferenceFailed(e)
            })?;

    debug!(prediction = %verdict.label, "Verdict ready");

    Ok(make_response(verdict))
}

pub(crate) fn make_response(verdict: Verdict) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        VERITAS_STATUS_HEADER,
        HeaderValue::from_static(VERITAS_STATUS_VERDICT),
    );

    let body = PredictResponse {
        prediction: verdict.label,
        probabilities: verdict.probabilities,
    };

    (StatusCode::OK, headers, Json(body)).into_response()
}
