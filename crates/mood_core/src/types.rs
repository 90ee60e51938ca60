use serde::{Deserialize, Serialize};

/// Declared model input shape. `None` marks a dynamic dimension.
pub type InputShape = Vec<Option<i64>>;

/// One class of a ranked prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledScore {
    pub label: String,
    pub confidence: f32,
    pub percentage: String,
}

impl LabeledScore {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
            percentage: format!("{:.2}%", confidence * 100.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub input_shape: InputShape,
    pub labels: Option<Vec<String>>,
}
