use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::response::Redirect;
use axum::Json;
use mood_core::{InferenceModel, LabeledScore, ModelInfo};
use mood_inference::preprocess;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decode::{decode_data_url, decode_image};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Multipart part carrying the uploaded image.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize, Deserialize)]
pub struct DetectionResponse {
    pub success: bool,
    pub results: Vec<LabeledScore>,
}

#[derive(Debug, Deserialize)]
pub struct DetectBase64Request {
    /// Data URL (`data:image/png;base64,...`) or bare base64.
    pub image: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
}

#[derive(Debug, Serialize)]
pub struct ModelInfoResponse {
    pub model_loaded: bool,
    #[serde(flatten)]
    pub info: Option<ModelInfo>,
}

pub async fn root() -> Redirect {
    Redirect::temporary("/static/index.html")
}

pub async fn detect_emotion(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<DetectionResponse>> {
    let model = state.model()?;
    let mut multipart =
        multipart.map_err(|e| ApiError::bad_request(format!("Invalid upload: {}", e.body_text())))?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid upload: {}", e.body_text())))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let is_image = field
            .content_type()
            .is_some_and(|ct| ct.starts_with("image/"));
        if !is_image {
            return Err(ApiError::bad_request("File must be an image"));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid upload: {}", e.body_text())))?;
        upload = Some(bytes);
        break;
    }

    let bytes = upload.ok_or_else(|| ApiError::bad_request("No file provided"))?;
    classify(model, bytes.to_vec()).await
}

pub async fn detect_emotion_base64(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DetectBase64Request>, JsonRejection>,
) -> ApiResult<Json<DetectionResponse>> {
    let model = state.model()?;
    let Json(request) = payload.map_err(|e| {
        debug!(rejection = %e.body_text(), "Rejected base64 payload");
        ApiError::validation("No image provided")
    })?;

    let bytes = decode_data_url(&request.image)?;
    classify(model, bytes).await
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        model_loaded: state.model_loaded(),
    })
}

pub async fn model_info(State(state): State<Arc<AppState>>) -> Json<ModelInfoResponse> {
    Json(ModelInfoResponse {
        model_loaded: state.model_loaded(),
        info: state.model.as_ref().map(|model| model.info()),
    })
}

/// Decode, preprocess and run one image through `model`.
async fn classify(
    model: &Arc<dyn InferenceModel>,
    bytes: Vec<u8>,
) -> ApiResult<Json<DetectionResponse>> {
    let target_size = model.target_size()?;
    let tensor = tokio::task::spawn_blocking(move || -> ApiResult<_> {
        let image = decode_image(&bytes)?;
        Ok(preprocess(&image, target_size))
    })
    .await
    .map_err(|e| ApiError::internal(format!("preprocessing task failed: {e}")))??;

    let results = model.predict(tensor.into_dyn()).await?;
    debug!(
        top = results.first().map(|r| r.label.as_str()),
        classes = results.len(),
        "Classified image"
    );
    Ok(Json(DetectionResponse {
        success: true,
        results,
    }))
}
