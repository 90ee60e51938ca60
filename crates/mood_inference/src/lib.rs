use std::path::PathBuf;

pub mod labels;
pub mod models;
pub mod postprocess;
pub mod preprocess;

pub use labels::{emotion_labels, load_labels, EMOTION_LABELS};
pub use models::{create_model, DummyModel, OnnxModel};
pub use preprocess::preprocess;

pub const DEFAULT_MODEL_PATH: &str = "models/mood_model.onnx";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Backend {
    /// ONNX Runtime session over a model artifact on disk
    Onnx,
    /// Fixed output vector, no artifact needed
    Dummy,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub backend: Backend,
    pub model_path: PathBuf,
    pub labels: Option<Vec<String>>,
    /// `(height, width)` override for the preprocessing target size.
    pub input_size: Option<(u32, u32)>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::Onnx,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            labels: Some(emotion_labels()),
            input_size: None,
        }
    }
}

/// Parse an `HxW` size such as `48x48`.
pub fn parse_input_size(s: &str) -> std::result::Result<(u32, u32), String> {
    let (h, w) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected HEIGHTxWIDTH, got '{}'", s))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| format!("invalid dimension '{}' in '{}'", v, s))
    };
    Ok((parse(h)?, parse(w)?))
}

pub mod prelude {
    pub use super::models::create_model;
    pub use super::preprocess::preprocess;
    pub use super::{Backend, Config};
    pub use mood_core::{Error, InferenceModel, LabeledScore, ModelInfo, Result};
}
