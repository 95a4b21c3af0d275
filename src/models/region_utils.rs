use crate::annotations::bounding_box::{BoundingBox, BoundingBoxGeometry};
use crate::annotations::detection::{DetectedRegion, Detection};
use crate::error::{Result, WeedDetectionError};
use itertools::Itertools;
use ndarray::{ArrayView3, Axis};

/// Decodes a YOLO-style region output into normalized regions.
///
/// The output has shape (1, 4 + classes, anchors): for every anchor, the box center, width and
/// height in input pixels followed by one score per class. The best class score becomes the
/// region confidence; anchors below `confidence` are skipped.
pub fn decode_region_output(
    output: ArrayView3<f32>,
    input_size: f32,
    confidence: f32,
) -> Result<Vec<DetectedRegion>> {
    let (batch, channels, _) = output.dim();
    if batch != 1 || channels < 5 {
        return Err(WeedDetectionError::inference(format!(
            "unexpected region output shape {:?}",
            output.shape()
        )));
    }
    let anchors = output.index_axis(Axis(0), 0);
    let anchors = anchors.t();
    let mut regions: Vec<DetectedRegion> = Vec::new();
    for row in anchors.axis_iter(Axis(0)) {
        let Some(prob) = row
            .iter()
            .skip(4) // skips bounding box coords.
            .copied()
            .max_by(|a, b| a.total_cmp(b))
        else {
            continue;
        };
        if prob < confidence {
            continue;
        }
        let (x, y, w, h) = (row[0], row[1], row[2], row[3]);
        let bbox = BoundingBox::from_xyxy_clipped(
            (x - w / 2.0) / input_size,
            (y - h / 2.0) / input_size,
            (x + w / 2.0) / input_size,
            (y + h / 2.0) / input_size,
        );
        match bbox {
            Ok(annotation) => regions.push(Detection {
                annotation,
                confidence: prob.clamp(0.0, 1.0),
            }),
            Err(e) => log::debug!("Dropping anchor: {}", e),
        }
    }
    Ok(regions)
}

/// Non maximum suppression is a way of removing duplicate detections.
///
/// Regions carry no class, so any two boxes overlapping more than `iou_threshold` are treated as
/// the same weed and only the more confident one is kept. The result is sorted by descending
/// confidence.
pub fn non_maximum_suppression<T: BoundingBoxGeometry>(
    detections: Vec<Detection<T>>,
    iou_threshold: f32,
) -> Vec<Detection<T>> {
    let detections: Vec<Detection<T>> = detections
        .into_iter()
        .sorted_by(|a, b| b.confidence.total_cmp(&a.confidence))
        .collect();
    let mut keep: Vec<bool> = vec![true; detections.len()];
    for current_index in 0..detections.len() {
        if !keep[current_index] {
            continue;
        }
        for other_index in current_index + 1..detections.len() {
            if !keep[other_index] {
                continue;
            }
            let iou = detections[current_index]
                .annotation
                .intersection_over_union(&detections[other_index].annotation);
            if iou > iou_threshold {
                keep[other_index] = false;
            }
        }
    }
    detections
        .into_iter()
        .zip(keep)
        .filter_map(|(det, kept)| kept.then_some(det))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn region(x: f32, y: f32, w: f32, h: f32, confidence: f32) -> DetectedRegion {
        DetectedRegion::new(x, y, w, h, confidence).unwrap()
    }

    #[test]
    fn nms_no_overlap() {
        let dets = vec![
            region(0.0, 0.0, 0.1, 0.1, 0.6),
            region(0.2, 0.2, 0.1, 0.1, 0.6),
        ];
        let nms_result = non_maximum_suppression(dets.clone(), 0.5);
        assert_eq!(nms_result, dets);
    }

    #[test]
    fn nms_standard_usage() {
        let dets = vec![
            region(0.0, 0.0, 0.4, 0.4, 0.6),
            region(0.0, 0.0, 0.5, 0.5, 0.55),
            region(0.6, 0.6, 0.4, 0.4, 0.75),
        ];
        let nms_result = non_maximum_suppression(dets, 0.5);
        let true_dets = vec![
            region(0.6, 0.6, 0.4, 0.4, 0.75),
            region(0.0, 0.0, 0.4, 0.4, 0.6),
        ];
        assert_eq!(nms_result, true_dets);
    }

    #[test]
    fn nms_suppressed_box_does_not_suppress_others() {
        // b overlaps a heavily and c overlaps b, but c barely touches a.
        let dets = vec![
            region(0.0, 0.0, 0.4, 0.4, 0.9),
            region(0.1, 0.0, 0.4, 0.4, 0.8),
            region(0.35, 0.0, 0.4, 0.4, 0.7),
        ];
        let nms_result = non_maximum_suppression(dets, 0.4);
        assert_eq!(nms_result.len(), 2);
        assert_eq!(nms_result[1].confidence, 0.7);
    }

    #[test]
    fn decodes_center_format_to_normalized_boxes() {
        // 2 classes, 3 anchors; input is 100 px square.
        let mut output = Array3::<f32>::zeros((1, 6, 3));
        // anchor 0: centered at (50, 50), 20x40, class 1 score 0.9
        output[[0, 0, 0]] = 50.0;
        output[[0, 1, 0]] = 50.0;
        output[[0, 2, 0]] = 20.0;
        output[[0, 3, 0]] = 40.0;
        output[[0, 5, 0]] = 0.9;
        // anchor 1: low score
        output[[0, 0, 1]] = 10.0;
        output[[0, 1, 1]] = 10.0;
        output[[0, 2, 1]] = 10.0;
        output[[0, 3, 1]] = 10.0;
        output[[0, 4, 1]] = 0.2;
        // anchor 2: overshoots the right edge and is clipped
        output[[0, 0, 2]] = 95.0;
        output[[0, 1, 2]] = 20.0;
        output[[0, 2, 2]] = 20.0;
        output[[0, 3, 2]] = 20.0;
        output[[0, 4, 2]] = 0.7;

        let regions = decode_region_output(output.view(), 100.0, 0.5).unwrap();
        assert_eq!(regions.len(), 2);
        let first = &regions[0].annotation;
        assert!((first.x() - 0.4).abs() < 1e-6);
        assert!((first.y() - 0.3).abs() < 1e-6);
        assert!((first.width() - 0.2).abs() < 1e-6);
        assert!((first.height() - 0.4).abs() < 1e-6);
        assert_eq!(regions[0].confidence, 0.9);
        assert!((regions[1].annotation.right() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_output_without_class_scores() {
        let output = Array3::<f32>::zeros((1, 4, 10));
        assert!(decode_region_output(output.view(), 100.0, 0.5).is_err());
    }
}
