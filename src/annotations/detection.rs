use crate::annotations::bounding_box::{BoundingBox, BoundingBoxGeometry};
use serde::{Deserialize, Serialize};

/// A detection is what is produced as output from a region model.
///
/// A detection is any annotation combined with a confidence score in [0, 1]: a probability value
/// that encodes the model's belief that the detection is true. The annotation is flattened when
/// serialized, so a region reads as `{x, y, width, height, confidence}`.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Detection<T: BoundingBoxGeometry> {
    #[serde(flatten)]
    pub annotation: T,
    pub confidence: f32,
}

/// A candidate location of a weed within the analyzed image.
pub type DetectedRegion = Detection<BoundingBox>;

impl DetectedRegion {
    pub fn new(x: f32, y: f32, width: f32, height: f32, confidence: f32) -> crate::Result<Self> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(crate::WeedDetectionError::InvalidRegion(format!(
                "confidence must lie in [0, 1], got {}.",
                confidence
            )));
        }
        Ok(Detection {
            annotation: BoundingBox::new(x, y, width, height)?,
            confidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_serializes_flat() {
        let region = DetectedRegion::new(0.3, 0.2, 0.25, 0.3, 0.85).unwrap();
        let json = serde_json::to_value(&region).unwrap();
        assert_eq!(json["confidence"].as_f64().unwrap() as f32, 0.85);
        assert_eq!(json["width"].as_f64().unwrap() as f32, 0.25);
        assert!(json.get("annotation").is_none());
    }

    #[test]
    fn region_rejects_confidence_above_one() {
        assert!(DetectedRegion::new(0.3, 0.2, 0.25, 0.3, 1.5).is_err());
    }
}
