//! ONNX Runtime backed classifier.
//!
//! The session is created once and shared. `Session::run` needs exclusive
//! access, so calls are serialised through a mutex and executed on the
//! blocking pool.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use mood_core::{check_input_shape, Error, InferenceModel, InputShape, LabeledScore, Result};
use ndarray::ArrayD;
use ort::execution_providers::{CPUExecutionProvider, CUDAExecutionProvider};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::{TensorRef, ValueType};
use tracing::{debug, info};

use super::with_batch_axis;
use crate::postprocess::{rank, squeeze};

pub struct OnnxModel {
    session: Arc<Mutex<Session>>,
    model_path: PathBuf,
    input_name: String,
    output_name: String,
    input_shape: InputShape,
    labels: Option<Vec<String>>,
    input_size: Option<(u32, u32)>,
}

impl fmt::Debug for OnnxModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnnxModel")
            .field("model_path", &self.model_path)
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("input_shape", &self.input_shape)
            .finish()
    }
}

impl OnnxModel {
    /// Load the artifact at `model_path`.
    ///
    /// Fails with [`Error::ModelLoad`] when the file is missing or the
    /// runtime rejects it.
    pub fn load(model_path: impl AsRef<Path>, labels: Option<Vec<String>>) -> Result<Self> {
        let model_path = model_path.as_ref();
        if !model_path.exists() {
            return Err(Error::ModelLoad(format!(
                "Model file not found at {}",
                model_path.display()
            )));
        }

        let session = create_session(model_path)?;

        let input = session
            .inputs
            .first()
            .ok_or_else(|| Error::ModelLoad("model declares no inputs".to_string()))?;
        let input_name = input.name.clone();
        let input_shape: InputShape = match &input.input_type {
            ValueType::Tensor { shape, .. } => shape.iter().map(|&d| (d > 0).then_some(d)).collect(),
            other => {
                return Err(Error::ModelLoad(format!(
                    "model input '{}' is not a tensor: {:?}",
                    input_name, other
                )))
            }
        };
        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| Error::ModelLoad("model declares no outputs".to_string()))?;

        info!(
            model_path = %model_path.display(),
            input_name = %input_name,
            input_shape = ?input_shape,
            "Loaded ONNX model"
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            model_path: model_path.to_path_buf(),
            input_name,
            output_name,
            input_shape,
            labels,
            input_size: None,
        })
    }

    /// Preprocess to `(height, width)` instead of the declared spatial size.
    pub fn with_input_size(mut self, size: (u32, u32)) -> Self {
        self.input_size = Some(size);
        self
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

/// Session preferring CUDA, falling back to CPU.
fn create_session(model_path: &Path) -> Result<Session> {
    Session::builder()
        .map_err(|e| Error::ModelLoad(format!("ORT session builder: {e}")))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| Error::ModelLoad(format!("ORT optimization level: {e}")))?
        .with_execution_providers([
            CUDAExecutionProvider::default().build(),
            CPUExecutionProvider::default().build(),
        ])
        .map_err(|e| Error::ModelLoad(format!("ORT execution providers: {e}")))?
        .commit_from_file(model_path)
        .map_err(|e| Error::ModelLoad(format!("ORT load model {}: {e}", model_path.display())))
}

fn run_session(
    session: &Mutex<Session>,
    input_name: &str,
    output_name: &str,
    input: ArrayD<f32>,
) -> Result<Vec<f32>> {
    let input = input.as_standard_layout();
    let tensor = TensorRef::from_array_view(input.view())
        .map_err(|e| Error::Inference(format!("Failed to create input tensor: {e}")))?;

    let mut session = session
        .lock()
        .map_err(|_| Error::Inference("ORT session poisoned".to_string()))?;
    let outputs = session
        .run(ort::inputs![input_name => tensor])
        .map_err(|e| Error::Inference(format!("ORT run failed: {e}")))?;

    let output = outputs
        .get(output_name)
        .ok_or_else(|| Error::Inference(format!("Missing output tensor '{output_name}'")))?;
    let (shape, data) = output
        .try_extract_tensor::<f32>()
        .map_err(|e| Error::Inference(format!("Failed to extract output tensor: {e}")))?;

    squeeze(shape, data)
}

#[async_trait::async_trait]
impl InferenceModel for OnnxModel {
    fn name(&self) -> &str {
        "ONNX"
    }

    fn input_shape(&self) -> &[Option<i64>] {
        &self.input_shape
    }

    fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }

    fn target_size(&self) -> Result<(u32, u32)> {
        match self.input_size {
            Some(size) => Ok(size),
            None => mood_core::spatial_size(&self.input_shape),
        }
    }

    async fn predict(&self, tensor: ArrayD<f32>) -> Result<Vec<LabeledScore>> {
        let batched = with_batch_axis(tensor);
        check_input_shape(batched.shape(), &self.input_shape)?;
        debug!(shape = ?batched.shape(), "Running forward pass");

        let session = Arc::clone(&self.session);
        let input_name = self.input_name.clone();
        let output_name = self.output_name.clone();
        let raw = tokio::task::spawn_blocking(move || {
            run_session(&session, &input_name, &output_name, batched)
        })
        .await
        .map_err(|e| Error::Inference(format!("inference task failed: {e}")))??;

        rank(raw, self.labels())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_artifact() {
        let err = OnnxModel::load("/nonexistent/model.onnx", None).unwrap_err();
        match err {
            Error::ModelLoad(msg) => assert!(msg.contains("not found")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_corrupt_artifact_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"definitely not a protobuf graph").unwrap();
        let err = OnnxModel::load(file.path(), None).unwrap_err();
        assert!(matches!(err, Error::ModelLoad(_)));
    }
}
