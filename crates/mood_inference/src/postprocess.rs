//! Turning a raw output vector into ranked, labeled confidences.

use std::cmp::Ordering;

use mood_core::{Error, LabeledScore, Result};
use tracing::warn;

/// Drop every size-1 dimension. What remains must be a plain vector.
pub fn squeeze(shape: &[i64], data: &[f32]) -> Result<Vec<f32>> {
    let wide_dims = shape.iter().filter(|&&d| d != 1).count();
    if wide_dims > 1 {
        return Err(Error::Inference(format!(
            "unexpected output shape {:?}, expected a single score vector",
            shape
        )));
    }
    Ok(data.to_vec())
}

/// Numerically stable softmax.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Configured label at `index`, or a `Class_<index>` placeholder past its end.
pub fn label_for(index: usize, labels: Option<&[String]>) -> String {
    match labels.and_then(|labels| labels.get(index)) {
        Some(label) => label.clone(),
        None => format!("Class_{}", index),
    }
}

/// Normalise (when there is more than one score), label and sort descending.
/// Equal confidences keep class-index order.
pub fn rank(raw: Vec<f32>, labels: Option<&[String]>) -> Result<Vec<LabeledScore>> {
    if raw.is_empty() {
        return Err(Error::Inference("model produced an empty output".to_string()));
    }

    let scores = if raw.len() > 1 { softmax(&raw) } else { raw };

    let configured = labels.map_or(0, <[String]>::len);
    if configured < scores.len() {
        warn!(
            configured,
            outputs = scores.len(),
            "label set shorter than model output, using placeholder names for {} classes",
            scores.len() - configured
        );
    }

    let mut results: Vec<LabeledScore> = scores
        .into_iter()
        .enumerate()
        .map(|(i, score)| LabeledScore::new(label_for(i, labels), score))
        .collect();

    results.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::emotion_labels;

    #[test]
    fn test_softmax_is_a_distribution() {
        let probs = softmax(&[1.0, 2.0, 3.0, -4.0]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_softmax_handles_large_logits() {
        let probs = softmax(&[1000.0, 1000.0]);
        assert!((probs[0] - 0.5).abs() < 1e-6);
        assert!((probs[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_emotion_scenario_ranks_happy_first() {
        let labels = emotion_labels();
        let raw = vec![0.1, 0.0, 0.0, 2.5, 0.0, 0.0, 0.2];
        let results = rank(raw, Some(labels.as_slice())).unwrap();

        assert_eq!(results.len(), 7);
        assert_eq!(results[0].label, "happy");
        assert!(results[1..].iter().all(|r| r.confidence < results[0].confidence));
        for label in &labels {
            assert!(results.iter().any(|r| &r.label == label));
        }
        let sum: f32 = results.iter().map(|r| r.confidence).sum();
        assert!((sum - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_rank_is_sorted_and_stable_on_ties() {
        let labels: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        let results = rank(vec![0.5, 2.0, 0.5, 0.5], Some(labels.as_slice())).unwrap();
        let order: Vec<&str> = results.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c", "d"]);
        assert!(results.windows(2).all(|w| w[0].confidence >= w[1].confidence));
    }

    #[test]
    fn test_short_label_set_gets_placeholders() {
        let labels = vec!["first".to_string(), "second".to_string()];
        let results = rank(vec![3.0, 2.0, 1.0, 0.0], Some(labels.as_slice())).unwrap();
        let names: Vec<&str> = results.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "Class_2", "Class_3"]);
    }

    #[test]
    fn test_missing_or_empty_labels_use_placeholders() {
        assert_eq!(label_for(0, None), "Class_0");
        assert_eq!(label_for(4, Some(&[][..])), "Class_4");
        let results = rank(vec![0.0, 1.0], None).unwrap();
        assert_eq!(results[0].label, "Class_1");
    }

    #[test]
    fn test_single_output_is_not_normalised() {
        let results = rank(vec![0.3], Some(&["score".to_string()][..])).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].confidence, 0.3);
        assert_eq!(results[0].percentage, "30.00%");
    }

    #[test]
    fn test_empty_output_is_an_error() {
        assert!(rank(vec![], None).is_err());
    }

    #[test]
    fn test_squeeze() {
        assert_eq!(squeeze(&[1, 7], &[0.0; 7]).unwrap().len(), 7);
        assert_eq!(squeeze(&[1, 1, 1], &[0.5]).unwrap(), vec![0.5]);
        assert_eq!(squeeze(&[], &[0.5]).unwrap(), vec![0.5]);
        assert!(squeeze(&[2, 3], &[0.0; 6]).is_err());
    }
}
