use std::sync::Arc;

use mood_core::InferenceModel;

use crate::error::{ApiError, ApiResult};

/// Application context built once at startup. The model is `None` when the
/// artifact failed to load; inference endpoints then answer 500.
#[derive(Clone, Default)]
pub struct AppState {
    pub model: Option<Arc<dyn InferenceModel>>,
}

impl AppState {
    pub fn new(model: Option<Arc<dyn InferenceModel>>) -> Self {
        Self { model }
    }

    pub fn model_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn model(&self) -> ApiResult<&Arc<dyn InferenceModel>> {
        self.model.as_ref().ok_or(ApiError::ModelUnavailable)
    }
}
