use std::sync::Arc;

use mood_core::{InferenceModel, Result};
use ndarray::{ArrayD, Axis};
use tracing::info;

use crate::{Backend, Config};

pub mod dummy;
pub mod onnx;

pub use dummy::DummyModel;
pub use onnx::OnnxModel;

/// Build the model selected by `config`.
pub fn create_model(config: &Config) -> Result<Arc<dyn InferenceModel>> {
    let model: Arc<dyn InferenceModel> = match config.backend {
        Backend::Onnx => {
            let mut model = OnnxModel::load(&config.model_path, config.labels.clone())?;
            if let Some(size) = config.input_size {
                model = model.with_input_size(size);
            }
            Arc::new(model)
        }
        Backend::Dummy => {
            let mut model = DummyModel::new(config.labels.clone());
            if let Some(size) = config.input_size {
                model = model.with_input_size(size);
            }
            Arc::new(model)
        }
    };
    info!(model = model.name(), "Inference model ready");
    Ok(model)
}

/// Insert a leading batch axis into a single `(C, H, W)` image tensor.
pub fn with_batch_axis(tensor: ArrayD<f32>) -> ArrayD<f32> {
    if tensor.ndim() == 3 {
        tensor.insert_axis(Axis(0))
    } else {
        tensor
    }
}
