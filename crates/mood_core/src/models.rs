use async_trait::async_trait;
use ndarray::ArrayD;
use std::fmt;

use crate::types::{LabeledScore, ModelInfo};
use crate::{Error, Result};

#[async_trait]
pub trait InferenceModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Declared input shape, including the batch dimension.
    fn input_shape(&self) -> &[Option<i64>];

    /// Configured label set, if any.
    fn labels(&self) -> Option<&[String]>;

    /// `(height, width)` the preprocessor has to produce for this model.
    fn target_size(&self) -> Result<(u32, u32)> {
        spatial_size(self.input_shape())
    }

    fn info(&self) -> ModelInfo {
        ModelInfo {
            input_shape: self.input_shape().to_vec(),
            labels: self.labels().map(<[String]>::to_vec),
        }
    }

    /// Run one image tensor through the network and rank the classes,
    /// highest confidence first. A `(C, H, W)` tensor gets a batch axis.
    async fn predict(&self, tensor: ArrayD<f32>) -> Result<Vec<LabeledScore>>;
}

/// Last two dimensions of a declared shape, as `(height, width)`.
pub fn spatial_size(shape: &[Option<i64>]) -> Result<(u32, u32)> {
    let fixed = |dim: Option<i64>| dim.and_then(|d| u32::try_from(d).ok()).filter(|d| *d > 0);
    match shape {
        [.., h, w] => match (fixed(*h), fixed(*w)) {
            (Some(h), Some(w)) => Ok((h, w)),
            _ => Err(Error::Inference(format!(
                "input shape {:?} has dynamic spatial dimensions, an explicit input size is required",
                shape
            ))),
        },
        _ => Err(Error::Inference(format!(
            "input shape {:?} has fewer than two dimensions",
            shape
        ))),
    }
}

/// Check a batched tensor shape against the declared one. Dynamic
/// dimensions accept any size.
pub fn check_input_shape(actual: &[usize], declared: &[Option<i64>]) -> Result<()> {
    let matches = actual.len() == declared.len()
        && actual
            .iter()
            .zip(declared)
            .all(|(a, d)| d.map_or(true, |d| d == *a as i64));
    if matches {
        Ok(())
    } else {
        Err(Error::Inference(format!(
            "tensor shape {:?} does not match model input shape {:?}",
            actual, declared
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spatial_size_takes_last_two_dims() {
        assert_eq!(spatial_size(&[None, Some(3), Some(48), Some(64)]).unwrap(), (48, 64));
        assert_eq!(spatial_size(&[Some(224), Some(224)]).unwrap(), (224, 224));
    }

    #[test]
    fn test_spatial_size_rejects_dynamic_dims() {
        assert!(spatial_size(&[Some(1), Some(3), None, None]).is_err());
        assert!(spatial_size(&[Some(1), Some(3), Some(-1), Some(48)]).is_err());
        assert!(spatial_size(&[Some(3)]).is_err());
    }

    #[test]
    fn test_check_input_shape() {
        let declared = [None, Some(3), Some(48), Some(48)];
        assert!(check_input_shape(&[1, 3, 48, 48], &declared).is_ok());
        assert!(check_input_shape(&[4, 3, 48, 48], &declared).is_ok());
        assert!(check_input_shape(&[1, 3, 64, 48], &declared).is_err());
        assert!(check_input_shape(&[3, 48, 48], &declared).is_err());
    }
}
