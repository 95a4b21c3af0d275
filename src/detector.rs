use crate::annotations::prediction::{DetectionResult, rank_predictions};
use crate::config::DetectorConfig;
use crate::error::{Result, WeedDetectionError};
use crate::image_utils::image_io::{decode_image_bytes, read_image};
use crate::image_utils::preprocessing::preprocess_image;
use crate::models::classification_model::{
    ClassificationModel, OnnxClassifier, OnnxRegionDetector, RegionModel, normalize_probabilities,
};
use crate::models::network::NetworkDefinition;
use crate::simulation;
use crate::weeds::weed_info::{WeedInfo, get_weed_info};
use crate::weeds::weed_type::WeedType;
use image::DynamicImage;
use rand::Rng;
use std::fmt;
use std::path::Path;

/// Everything built by a successful [`WeedDetector::load_models`].
pub struct LoadedModels {
    pub classifier_graph: NetworkDefinition,
    pub region_graph: NetworkDefinition,
    classifier: Option<Box<dyn ClassificationModel>>,
    region_model: Option<Box<dyn RegionModel>>,
}

impl LoadedModels {
    /// True when trained classifier weights are attached and real detection can run.
    pub fn has_weights(&self) -> bool {
        self.classifier.is_some()
    }
}

/// Model lifecycle: `Uninitialized` -> `Loading` -> `Ready`.
///
/// `Loading` only exists while `load_models` runs and keeps a second call from building the
/// graphs twice. A failed load returns to `Uninitialized`.
pub enum ModelState {
    Uninitialized,
    Loading,
    Ready(LoadedModels),
}

impl fmt::Debug for ModelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelState::Uninitialized => write!(f, "Uninitialized"),
            ModelState::Loading => write!(f, "Loading"),
            ModelState::Ready(models) => write!(f, "Ready(weights: {})", models.has_weights()),
        }
    }
}

type InjectedModels = (Box<dyn ClassificationModel>, Option<Box<dyn RegionModel>>);

/// Facade over species classification and region detection.
///
/// Two paths produce a [`DetectionResult`]:
/// * [`WeedDetector::detect_weed`] runs the real networks and needs trained weights.
/// * [`WeedDetector::simulate_prediction`] fabricates a plausible result and never fails.
///
/// The simulated path and [`WeedDetector::get_weed_info`] do not depend on the model state.
pub struct WeedDetector {
    config: DetectorConfig,
    state: ModelState,
    injected: Option<InjectedModels>,
    load_count: usize,
}

impl WeedDetector {
    /// Creates a detector. No models are loaded until [`WeedDetector::load_models`].
    pub fn new(config: DetectorConfig) -> Self {
        if let Err(e) = config.validate() {
            log::warn!("Detector config does not validate, simulation will clamp it: {}", e);
        }
        WeedDetector {
            config,
            state: ModelState::Uninitialized,
            injected: None,
            load_count: 0,
        }
    }

    /// Creates a detector that will use the given backends instead of opening ONNX files.
    pub fn with_models(
        config: DetectorConfig,
        classifier: Box<dyn ClassificationModel>,
        region_model: Option<Box<dyn RegionModel>>,
    ) -> Self {
        WeedDetector {
            injected: Some((classifier, region_model)),
            ..WeedDetector::new(config)
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn state(&self) -> &ModelState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ModelState::Ready(_))
    }

    /// How many times the network graphs have actually been built.
    pub fn load_count(&self) -> usize {
        self.load_count
    }

    /// Builds the network graphs and opens any configured weights.
    ///
    /// Returns immediately when the models are ready or a load is in progress.
    pub fn load_models(&mut self) -> Result<()> {
        match self.state {
            ModelState::Ready(_) | ModelState::Loading => return Ok(()),
            ModelState::Uninitialized => {}
        }
        self.state = ModelState::Loading;
        log::info!("Loading weed detection models...");
        match self.build_models() {
            Ok(models) => {
                self.load_count += 1;
                log::info!(
                    "Models loaded ({} classifier parameters, weights attached: {})",
                    models.classifier_graph.parameter_count(),
                    models.has_weights()
                );
                self.state = ModelState::Ready(models);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load weed detection models: {}", e);
                self.state = ModelState::Uninitialized;
                Err(match e {
                    WeedDetectionError::Initialization(_) => e,
                    other => WeedDetectionError::initialization(other.to_string()),
                })
            }
        }
    }

    fn build_models(&mut self) -> Result<LoadedModels> {
        let input_size = self.config.image_size as usize;
        let classifier_graph = NetworkDefinition::classifier(input_size, WeedType::NUM_CLASSES)?;
        let region_graph = NetworkDefinition::region_proposer(input_size, WeedType::NUM_CLASSES)?;

        let (classifier, region_model) = match self.injected.take() {
            Some((classifier, region_model)) => (Some(classifier), region_model),
            None => {
                let classifier: Option<Box<dyn ClassificationModel>> =
                    match &self.config.classifier_model_path {
                        Some(path) => Some(Box::new(OnnxClassifier::new(
                            path,
                            WeedType::NUM_CLASSES,
                        )?)),
                        None => None,
                    };
                let region_model: Option<Box<dyn RegionModel>> =
                    match &self.config.region_model_path {
                        Some(path) => Some(Box::new(OnnxRegionDetector::new(
                            path,
                            self.config.image_size,
                            self.config.nms_iou_threshold,
                        )?)),
                        None => None,
                    };
                (classifier, region_model)
            }
        };
        if classifier.is_none() {
            log::warn!("No classifier weights configured, real detection is unavailable");
        }
        Ok(LoadedModels {
            classifier_graph,
            region_graph,
            classifier,
            region_model,
        })
    }

    /// Runs the real classification and region networks on an image.
    ///
    /// Fails with [`WeedDetectionError::ModelUnavailable`] unless the models are loaded with
    /// classifier weights. No confidence floor is applied on this path.
    pub fn detect_weed(&self, image: &DynamicImage) -> Result<DetectionResult> {
        let (classifier, region_model) = match &self.state {
            ModelState::Ready(LoadedModels {
                classifier: Some(classifier),
                region_model,
                ..
            }) => (classifier, region_model),
            _ => return Err(WeedDetectionError::ModelUnavailable),
        };

        let input = preprocess_image(image, self.config.image_size)?;
        let scores = classifier.classify(&input)?;
        if scores.len() != WeedType::NUM_CLASSES {
            return Err(WeedDetectionError::inference(format!(
                "{} returned {} probabilities for {} classes",
                classifier.name(),
                scores.len(),
                WeedType::NUM_CLASSES
            )));
        }
        let probabilities = normalize_probabilities(&scores)?;
        let regions = match region_model {
            Some(model) => model.detect_regions(&input, self.config.region_confidence_threshold)?,
            None => Vec::new(),
        };
        drop(input);

        let all_predictions = rank_predictions(&probabilities);
        let (weed_type, confidence) = all_predictions
            .first()
            .map(|p| (p.weed_type, p.confidence))
            .unwrap_or((WeedType::Unknown, 0.0));
        log::info!(
            "Detected {} at {:.2}% with {} regions",
            weed_type,
            confidence,
            regions.len()
        );
        Ok(DetectionResult {
            weed_type,
            confidence,
            all_predictions,
            regions,
        })
    }

    /// Decodes an image file and runs [`WeedDetector::detect_weed`] on it.
    pub fn detect_weed_in_file(&self, path: &Path) -> Result<DetectionResult> {
        let image = read_image(path)?;
        self.detect_weed(&image)
    }

    /// Decodes an uploaded image buffer and runs [`WeedDetector::detect_weed`] on it.
    pub fn detect_weed_in_bytes(&self, bytes: &[u8]) -> Result<DetectionResult> {
        let image = decode_image_bytes(bytes)?;
        self.detect_weed(&image)
    }

    /// A fabricated detection with 1-2 regions, using the thread-local RNG.
    pub fn simulate_prediction(&self) -> DetectionResult {
        self.simulate_prediction_with(&mut rand::rng())
    }

    /// Same as [`WeedDetector::simulate_prediction`] with a caller-supplied RNG.
    pub fn simulate_prediction_with<R: Rng + ?Sized>(&self, rng: &mut R) -> DetectionResult {
        simulation::simulate_prediction(rng, &self.config.simulation)
    }

    /// A fabricated detection over a wider field photo, with 2-4 regions.
    pub fn simulate_field_scan_with<R: Rng + ?Sized>(&self, rng: &mut R) -> DetectionResult {
        simulation::simulate_field_scan(rng, &self.config.simulation)
    }

    pub fn get_weed_info(&self, weed_type: WeedType) -> &'static WeedInfo {
        get_weed_info(weed_type)
    }
}
