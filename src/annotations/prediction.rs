use crate::annotations::detection::DetectedRegion;
use crate::weeds::weed_type::WeedType;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// One class and the model's confidence in it, as a percentage in [0, 100].
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Prediction {
    #[serde(rename = "type")]
    pub weed_type: WeedType,
    pub confidence: f32,
}

/// The aggregate output of one classification attempt.
///
/// Created fresh by every detection call and owned by the caller. `all_predictions` always holds
/// one entry per class, sorted by descending confidence.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub weed_type: WeedType,
    pub confidence: f32,
    pub all_predictions: Vec<Prediction>,
    pub regions: Vec<DetectedRegion>,
}

impl DetectionResult {
    /// The runner-up predictions, i.e. everything except the winning class.
    pub fn alternatives(&self) -> impl Iterator<Item = &Prediction> {
        self.all_predictions
            .iter()
            .filter(move |p| p.weed_type != self.weed_type)
    }
}

/// Converts a probability to a percentage rounded to two decimals.
pub fn to_percentage(probability: f32) -> f32 {
    (probability * 100.0 * 100.0).round() / 100.0
}

/// Maps a probability vector (in class order) to predictions sorted by descending confidence.
///
/// Sorting happens on the raw probabilities, before rounding, so the first entry is always the
/// argmax. The sort is stable: classes with equal probability keep their class order.
pub fn rank_predictions(probabilities: &[f32]) -> Vec<Prediction> {
    probabilities
        .iter()
        .copied()
        .enumerate()
        .sorted_by(|a, b| b.1.total_cmp(&a.1))
        .map(|(index, probability)| Prediction {
            weed_type: WeedType::from_class_index(index),
            confidence: to_percentage(probability),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentages_have_two_decimals() {
        assert_eq!(to_percentage(0.123456), 12.35);
        assert_eq!(to_percentage(1.0), 100.0);
        assert_eq!(to_percentage(0.0), 0.0);
    }

    #[test]
    fn ranking_is_descending_and_stable() {
        let ranked = rank_predictions(&[0.2, 0.5, 0.2, 0.1]);
        let types: Vec<WeedType> = ranked.iter().map(|p| p.weed_type).collect();
        assert_eq!(
            types,
            vec![
                WeedType::RamaNegra,
                WeedType::YuyoColorado,
                WeedType::Roseta,
                WeedType::Cardo
            ]
        );
        assert_eq!(ranked[0].confidence, 50.0);
    }

    #[test]
    fn ranking_uses_unrounded_probabilities() {
        // The first two both round to 33.33; the second is larger before rounding.
        let ranked = rank_predictions(&[0.333301, 0.333302, 0.333397]);
        assert_eq!(ranked[0].weed_type, WeedType::Roseta);
        assert_eq!(ranked[1].weed_type, WeedType::RamaNegra);
    }

    #[test]
    fn result_uses_camel_case_fields() {
        let result = DetectionResult {
            weed_type: WeedType::Roseta,
            confidence: 61.5,
            all_predictions: rank_predictions(&[0.1, 0.3, 0.6]),
            regions: vec![],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("weedType").is_some());
        assert_eq!(json["allPredictions"][0]["type"], "roseta");
        assert_eq!(result.alternatives().count(), 2);
    }
}
