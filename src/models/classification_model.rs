use crate::annotations::detection::DetectedRegion;
use crate::error::{Result, WeedDetectionError};
use crate::models::ort_inference_session::OrtInferenceSession;
use crate::models::region_utils::{decode_region_output, non_maximum_suppression};
use ndarray::{Array4, Ix3};
use std::path::Path;

/// Defines a trait that all species classifiers must follow.
///
/// `classify` takes a preprocessed (1, 3, size, size) array in [0, 1] and returns one
/// probability per class in [`crate::WeedType::CLASS_NAMES`] order, summing to 1.
pub trait ClassificationModel: Send + Sync {
    fn name(&self) -> &str;

    fn classify(&self, input: &Array4<f32>) -> Result<Vec<f32>>;
}

/// Defines a trait for models that localize weeds within the image.
///
/// Regions below `confidence` are discarded; the rest are returned in normalized coordinates.
pub trait RegionModel: Send + Sync {
    fn name(&self) -> &str;

    fn detect_regions(&self, input: &Array4<f32>, confidence: f32) -> Result<Vec<DetectedRegion>>;
}

/// Turns a raw output vector into a probability distribution.
///
/// Outputs that already look like probabilities are divided by their sum; anything with a
/// negative entry is treated as logits and put through a softmax.
pub fn normalize_probabilities(raw: &[f32]) -> Result<Vec<f32>> {
    if raw.is_empty() {
        return Err(WeedDetectionError::inference("model produced no outputs"));
    }
    if raw.iter().any(|v| !v.is_finite()) {
        return Err(WeedDetectionError::inference(
            "model produced non-finite outputs",
        ));
    }
    if raw.iter().any(|v| *v < 0.0) {
        let max = raw.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let exps: Vec<f32> = raw.iter().map(|v| (v - max).exp()).collect();
        let sum: f32 = exps.iter().sum();
        return Ok(exps.into_iter().map(|e| e / sum).collect());
    }
    let sum: f32 = raw.iter().sum();
    if sum <= 0.0 {
        return Err(WeedDetectionError::inference(
            "model outputs sum to zero, cannot normalize",
        ));
    }
    Ok(raw.iter().map(|v| v / sum).collect())
}

/// Species classifier backed by an ONNX export of the classification network.
pub struct OnnxClassifier {
    ort_session: OrtInferenceSession,
    num_classes: usize,
}

impl OnnxClassifier {
    pub fn new(model_path: &Path, num_classes: usize) -> Result<Self> {
        let ort_session = OrtInferenceSession::new(model_path)?;
        Ok(OnnxClassifier {
            ort_session,
            num_classes,
        })
    }
}

impl ClassificationModel for OnnxClassifier {
    fn name(&self) -> &str {
        "onnx classifier"
    }

    fn classify(&self, input: &Array4<f32>) -> Result<Vec<f32>> {
        let output = self.ort_session.run(input)?;
        let raw: Vec<f32> = output.iter().copied().collect();
        if raw.len() != self.num_classes {
            return Err(WeedDetectionError::inference(format!(
                "{:?} returned {} scores, expected {}",
                self.ort_session.model_path(),
                raw.len(),
                self.num_classes
            )));
        }
        normalize_probabilities(&raw)
    }
}

/// Region detector backed by an ONNX export with a YOLO-style (1, 4 + classes, anchors) output.
pub struct OnnxRegionDetector {
    ort_session: OrtInferenceSession,
    input_size: u32,
    nms_iou_threshold: f32,
}

impl OnnxRegionDetector {
    pub fn new(model_path: &Path, input_size: u32, nms_iou_threshold: f32) -> Result<Self> {
        let ort_session = OrtInferenceSession::new(model_path)?;
        Ok(OnnxRegionDetector {
            ort_session,
            input_size,
            nms_iou_threshold,
        })
    }
}

impl RegionModel for OnnxRegionDetector {
    fn name(&self) -> &str {
        "onnx region detector"
    }

    fn detect_regions(&self, input: &Array4<f32>, confidence: f32) -> Result<Vec<DetectedRegion>> {
        let output = self.ort_session.run(input)?;
        let output = output.into_dimensionality::<Ix3>().map_err(|e| {
            WeedDetectionError::inference(format!("region output is not 3-dimensional: {}", e))
        })?;
        let regions = decode_region_output(output.view(), self.input_size as f32, confidence)?;
        Ok(non_maximum_suppression(regions, self.nms_iou_threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probabilities_are_rescaled_to_sum_one() {
        let probs = normalize_probabilities(&[2.0, 1.0, 1.0]).unwrap();
        assert_eq!(probs, vec![0.5, 0.25, 0.25]);
    }

    #[test]
    fn logits_go_through_softmax() {
        let probs = normalize_probabilities(&[-1.0, 1.0]).unwrap();
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(probs[1] > probs[0]);
    }

    #[test]
    fn degenerate_outputs_are_inference_errors() {
        assert!(normalize_probabilities(&[]).is_err());
        assert!(normalize_probabilities(&[0.0, 0.0]).is_err());
        assert!(normalize_probabilities(&[f32::NAN, 1.0]).is_err());
    }

    #[test]
    fn missing_model_file_fails_initialization() {
        let err = OnnxClassifier::new(Path::new("./no/such/model.onnx"), 8)
            .err()
            .unwrap();
        assert!(matches!(err, WeedDetectionError::Initialization(_)));
    }
}
