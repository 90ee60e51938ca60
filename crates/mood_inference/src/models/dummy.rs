use std::fmt;

use mood_core::{check_input_shape, InferenceModel, InputShape, LabeledScore, Result};
use ndarray::ArrayD;

use super::with_batch_axis;
use crate::postprocess::rank;

/// Emits a fixed raw output vector for every input, ranked like a real
/// forward pass. Used when no model artifact is at hand.
pub struct DummyModel {
    input_shape: InputShape,
    labels: Option<Vec<String>>,
    raw_output: Vec<f32>,
}

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel")
            .field("input_shape", &self.input_shape)
            .field("outputs", &self.raw_output.len())
            .finish()
    }
}

impl DummyModel {
    pub const DEFAULT_RAW_OUTPUT: [f32; 7] = [0.1, 0.0, 0.0, 2.5, 0.0, 0.0, 0.2];
    pub const DEFAULT_INPUT_SIZE: (u32, u32) = (48, 48);

    pub fn new(labels: Option<Vec<String>>) -> Self {
        let (height, width) = Self::DEFAULT_INPUT_SIZE;
        Self {
            input_shape: vec![None, Some(3), Some(height as i64), Some(width as i64)],
            labels,
            raw_output: Self::DEFAULT_RAW_OUTPUT.to_vec(),
        }
    }

    pub fn with_input_size(mut self, (height, width): (u32, u32)) -> Self {
        self.input_shape = vec![None, Some(3), Some(height as i64), Some(width as i64)];
        self
    }

    pub fn with_raw_output(mut self, raw_output: Vec<f32>) -> Self {
        self.raw_output = raw_output;
        self
    }
}

#[async_trait::async_trait]
impl InferenceModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    fn input_shape(&self) -> &[Option<i64>] {
        &self.input_shape
    }

    fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }

    async fn predict(&self, tensor: ArrayD<f32>) -> Result<Vec<LabeledScore>> {
        let batched = with_batch_axis(tensor);
        check_input_shape(batched.shape(), &self.input_shape)?;
        rank(self.raw_output.clone(), self.labels())
    }
}
