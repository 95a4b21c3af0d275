use crate::error::{Result, WeedDetectionError};
use crate::models::network::NetworkDefinition;
use crate::simulation::SimulationConfig;
use crate::weeds::weed_type::WeedType;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_IMAGE_SIZE: u32 = 400;
const DEFAULT_REGION_CONFIDENCE_THRESHOLD: f32 = 0.5;
const DEFAULT_NMS_IOU_THRESHOLD: f32 = 0.45;

pub const CONFIG_ENV_VAR: &str = "WEED_DETECT_CONFIG";
pub const CLASSIFIER_MODEL_ENV_VAR: &str = "WEED_DETECT_CLASSIFIER_MODEL";
pub const REGION_MODEL_ENV_VAR: &str = "WEED_DETECT_REGION_MODEL";
pub const IMAGE_SIZE_ENV_VAR: &str = "WEED_DETECT_IMAGE_SIZE";

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct DetectorConfigFile {
    image_size: Option<u32>,
    models: Option<ModelsConfigFile>,
    regions: Option<RegionsConfigFile>,
    simulation: Option<SimulationConfig>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ModelsConfigFile {
    classifier: Option<PathBuf>,
    region: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RegionsConfigFile {
    confidence_threshold: Option<f32>,
    nms_iou_threshold: Option<f32>,
}

/// Settings for a [`crate::WeedDetector`].
///
/// Weight files are optional. Without a classifier the detector still loads (the network
/// definitions are built) but real detection reports the models as unavailable.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorConfig {
    /// Side of the square network input, in pixels.
    pub image_size: u32,
    pub classifier_model_path: Option<PathBuf>,
    pub region_model_path: Option<PathBuf>,
    pub region_confidence_threshold: f32,
    pub nms_iou_threshold: f32,
    pub simulation: SimulationConfig,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        DetectorConfig {
            image_size: DEFAULT_IMAGE_SIZE,
            classifier_model_path: None,
            region_model_path: None,
            region_confidence_threshold: DEFAULT_REGION_CONFIDENCE_THRESHOLD,
            nms_iou_threshold: DEFAULT_NMS_IOU_THRESHOLD,
            simulation: SimulationConfig::default(),
        }
    }
}

impl DetectorConfig {
    /// Loads from the file named by `WEED_DETECT_CONFIG` (if set), then applies env overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from);
        Self::load_from(path.as_deref())
    }

    /// Loads from an explicit file, or defaults when `None`, then applies env overrides.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let file_cfg = match path {
            Some(path) => read_config_file(path)?,
            None => DetectorConfigFile::default(),
        };
        let mut cfg = Self::from_file(file_cfg);
        cfg.apply_env()?;
        cfg.validate()?;
        log::debug!("Loaded detector config: {:?}", cfg);
        Ok(cfg)
    }

    /// Parses a TOML document without consulting the environment.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file_cfg: DetectorConfigFile = toml::from_str(contents)
            .map_err(|e| WeedDetectionError::config(format!("invalid config: {}", e)))?;
        let cfg = Self::from_file(file_cfg);
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: DetectorConfigFile) -> Self {
        let models = file.models.unwrap_or_default();
        let regions = file.regions.unwrap_or_default();
        DetectorConfig {
            image_size: file.image_size.unwrap_or(DEFAULT_IMAGE_SIZE),
            classifier_model_path: models.classifier,
            region_model_path: models.region,
            region_confidence_threshold: regions
                .confidence_threshold
                .unwrap_or(DEFAULT_REGION_CONFIDENCE_THRESHOLD),
            nms_iou_threshold: regions
                .nms_iou_threshold
                .unwrap_or(DEFAULT_NMS_IOU_THRESHOLD),
            simulation: file.simulation.unwrap_or_default(),
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(path) = std::env::var(CLASSIFIER_MODEL_ENV_VAR) {
            self.classifier_model_path = Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var(REGION_MODEL_ENV_VAR) {
            self.region_model_path = Some(PathBuf::from(path));
        }
        if let Ok(size) = std::env::var(IMAGE_SIZE_ENV_VAR) {
            self.image_size = size.trim().parse().map_err(|_| {
                WeedDetectionError::config(format!(
                    "{} must be a positive integer, got {:?}",
                    IMAGE_SIZE_ENV_VAR, size
                ))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if NetworkDefinition::classifier(self.image_size as usize, WeedType::NUM_CLASSES).is_err()
            || NetworkDefinition::region_proposer(self.image_size as usize, WeedType::NUM_CLASSES)
                .is_err()
        {
            return Err(WeedDetectionError::config(format!(
                "image_size {} is too small for the network stacks",
                self.image_size
            )));
        }
        for (name, value) in [
            ("regions.confidence_threshold", self.region_confidence_threshold),
            ("regions.nms_iou_threshold", self.nms_iou_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(WeedDetectionError::config(format!(
                    "{} must lie in [0, 1], got {}",
                    name, value
                )));
            }
        }
        self.simulation.validate()
    }
}

fn read_config_file(path: &Path) -> Result<DetectorConfigFile> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        WeedDetectionError::config(format!("failed to read config {}: {}", path.display(), e))
    })?;
    toml::from_str(&contents).map_err(|e| {
        WeedDetectionError::config(format!("failed to parse config {}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = DetectorConfig::default();
        assert_eq!(cfg.image_size, 400);
        assert!(cfg.classifier_model_path.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn parses_partial_toml() {
        let cfg = DetectorConfig::from_toml_str(
            r#"
            image_size = 224

            [models]
            classifier = "models/weeds.onnx"

            [regions]
            confidence_threshold = 0.6

            [simulation]
            region_count = [2, 3]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.image_size, 224);
        assert_eq!(
            cfg.classifier_model_path,
            Some(PathBuf::from("models/weeds.onnx"))
        );
        assert!(cfg.region_model_path.is_none());
        assert_eq!(cfg.region_confidence_threshold, 0.6);
        assert_eq!(cfg.nms_iou_threshold, DEFAULT_NMS_IOU_THRESHOLD);
        assert_eq!(cfg.simulation.region_count, (2, 3));
        assert_eq!(cfg.simulation.confidence_floor, 40.0);
    }

    #[test]
    fn rejects_tiny_image_size() {
        let err = DetectorConfig::from_toml_str("image_size = 16").unwrap_err();
        assert!(matches!(err, WeedDetectionError::Config(_)));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(DetectorConfig::from_toml_str("image_sise = 400").is_err());
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        assert!(DetectorConfig::from_toml_str("[regions]\nnms_iou_threshold = 1.5").is_err());
    }
}
