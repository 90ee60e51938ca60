pub mod error;
pub mod models;
pub mod types;

pub use error::{Error, Result};
pub use models::{check_input_shape, spatial_size, InferenceModel};
pub use types::{InputShape, LabeledScore, ModelInfo};
