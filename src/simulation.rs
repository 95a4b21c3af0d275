//! Randomized stand-in for model inference.
//!
//! The detection page calls this path instead of a trained network. Every result has the same
//! shape as a real one: a winning class, one prediction per class and a handful of regions.
//! Only the contents are random.

use crate::annotations::bounding_box::BoundingBox;
use crate::annotations::detection::{DetectedRegion, Detection};
use crate::annotations::prediction::{DetectionResult, rank_predictions};
use crate::error::{Result, WeedDetectionError};
use crate::weeds::weed_type::WeedType;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Tunables of the simulated path. Ranges are inclusive `(low, high)` pairs.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Raw weight drawn for class 0, biased upward so one species usually dominates.
    pub dominant_weight_range: (f32, f32),
    /// Raw weight drawn for every other class.
    pub other_weight_range: (f32, f32),
    /// Reported top confidence never drops below this percentage.
    pub confidence_floor: f32,
    pub region_count: (usize, usize),
    pub field_scan_region_count: (usize, usize),
    pub region_position_range: (f32, f32),
    pub region_size_range: (f32, f32),
    pub region_confidence_range: (f32, f32),
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            dominant_weight_range: (0.3, 0.9),
            other_weight_range: (0.0, 0.3),
            confidence_floor: 40.0,
            region_count: (1, 2),
            field_scan_region_count: (2, 4),
            region_position_range: (0.1, 0.7),
            region_size_range: (0.15, 0.35),
            region_confidence_range: (0.8, 1.0),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        let unit_ranges = [
            ("dominant_weight_range", self.dominant_weight_range),
            ("other_weight_range", self.other_weight_range),
            ("region_position_range", self.region_position_range),
            ("region_size_range", self.region_size_range),
            ("region_confidence_range", self.region_confidence_range),
        ];
        for (name, (low, high)) in unit_ranges {
            if !(0.0..=1.0).contains(&low) || !(0.0..=1.0).contains(&high) || low > high {
                return Err(WeedDetectionError::config(format!(
                    "simulation.{} must be an ordered pair within [0, 1], got ({}, {})",
                    name, low, high
                )));
            }
        }
        if self.dominant_weight_range.0 <= 0.0 {
            return Err(WeedDetectionError::config(
                "simulation.dominant_weight_range must start above 0",
            ));
        }
        if self.region_size_range.0 <= 0.0 {
            return Err(WeedDetectionError::config(
                "simulation.region_size_range must start above 0",
            ));
        }
        if !(0.0..=100.0).contains(&self.confidence_floor) {
            return Err(WeedDetectionError::config(format!(
                "simulation.confidence_floor must be a percentage, got {}",
                self.confidence_floor
            )));
        }
        for (name, (low, high)) in [
            ("region_count", self.region_count),
            ("field_scan_region_count", self.field_scan_region_count),
        ] {
            if low == 0 || low > high {
                return Err(WeedDetectionError::config(format!(
                    "simulation.{} must be an ordered pair starting at 1 or more, got ({}, {})",
                    name, low, high
                )));
            }
        }
        Ok(())
    }
}

/// Orders a `(low, high)` pair and clamps both ends into `[0, 1]`.
///
/// Sampling goes through this so that a config built in code without `validate()` can never
/// produce an empty range. Non-finite bounds become 0.
fn unit_range((low, high): (f32, f32)) -> (f32, f32) {
    let clamp = |v: f32| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
    let (low, high) = (clamp(low), clamp(high));
    if low <= high { (low, high) } else { (high, low) }
}

fn count_range((low, high): (usize, usize)) -> (usize, usize) {
    if low <= high { (low, high) } else { (high, low) }
}

/// Draws one raw weight per class, class 0 from the dominant range.
pub fn sample_class_weights<R: Rng + ?Sized>(rng: &mut R, config: &SimulationConfig) -> Vec<f32> {
    (0..WeedType::NUM_CLASSES)
        .map(|index| {
            let (low, high) = unit_range(if index == 0 {
                config.dominant_weight_range
            } else {
                config.other_weight_range
            });
            rng.random_range(low..=high)
        })
        .collect()
}

/// Normalizes raw weights into a ranked result with no regions.
///
/// The winner's reported confidence is floored at `confidence_floor`; the ranked list keeps the
/// unfloored percentages so that it still sums to 100. Negative or non-finite weights count as
/// zero, and an all-zero draw is treated as uniform.
pub fn prediction_from_weights(weights: &[f32], confidence_floor: f32) -> DetectionResult {
    let weights: Vec<f32> = weights
        .iter()
        .map(|w| if w.is_finite() { w.max(0.0) } else { 0.0 })
        .collect();
    let sum: f32 = weights.iter().sum();
    let probabilities: Vec<f32> = if sum > 0.0 && sum.is_finite() {
        weights.iter().map(|w| w / sum).collect()
    } else {
        log::warn!("Simulated class weights sum to {}, using a uniform draw", sum);
        vec![1.0 / weights.len().max(1) as f32; weights.len()]
    };
    let all_predictions = rank_predictions(&probabilities);
    let (weed_type, raw_top) = all_predictions
        .first()
        .map(|p| (p.weed_type, p.confidence))
        .unwrap_or((WeedType::Unknown, 0.0));
    DetectionResult {
        weed_type,
        confidence: raw_top.max(confidence_floor.clamp(0.0, 100.0)),
        all_predictions,
        regions: Vec::new(),
    }
}

/// Generates between `count.0` and `count.1` regions at random positions.
///
/// Sizes are shrunk where needed so every box stays inside the image.
pub fn simulate_regions<R: Rng + ?Sized>(
    rng: &mut R,
    config: &SimulationConfig,
    count: (usize, usize),
) -> Vec<DetectedRegion> {
    let (pos_low, pos_high) = unit_range(config.region_position_range);
    let (size_low, size_high) = unit_range(config.region_size_range);
    let (conf_low, conf_high) = unit_range(config.region_confidence_range);
    let (count_low, count_high) = count_range(count);
    let n = rng.random_range(count_low..=count_high);
    (0..n)
        .filter_map(|_| {
            let x: f32 = rng.random_range(pos_low..=pos_high);
            let y: f32 = rng.random_range(pos_low..=pos_high);
            let width = rng.random_range(size_low..=size_high).min(1.0 - x);
            let height = rng.random_range(size_low..=size_high).min(1.0 - y);
            let confidence = rng.random_range(conf_low..=conf_high);
            match BoundingBox::new(x, y, width, height) {
                Ok(annotation) => Some(Detection {
                    annotation,
                    confidence,
                }),
                Err(e) => {
                    log::warn!("Skipping simulated region: {}", e);
                    None
                }
            }
        })
        .collect()
}

/// One simulated detection with the standard region count.
pub fn simulate_prediction<R: Rng + ?Sized>(
    rng: &mut R,
    config: &SimulationConfig,
) -> DetectionResult {
    simulate_with_regions(rng, config, config.region_count)
}

/// A simulated detection over a wider field photo, which reports more regions.
pub fn simulate_field_scan<R: Rng + ?Sized>(
    rng: &mut R,
    config: &SimulationConfig,
) -> DetectionResult {
    simulate_with_regions(rng, config, config.field_scan_region_count)
}

fn simulate_with_regions<R: Rng + ?Sized>(
    rng: &mut R,
    config: &SimulationConfig,
    count: (usize, usize),
) -> DetectionResult {
    let weights = sample_class_weights(rng, config);
    let mut result = prediction_from_weights(&weights, config.confidence_floor);
    result.regions = simulate_regions(rng, config, count);
    log::debug!(
        "Simulated {} at {:.2}% with {} regions",
        result.weed_type,
        result.confidence,
        result.regions.len()
    );
    result
}
