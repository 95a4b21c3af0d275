//! Weed species identification: a classification and region-detection facade with a
//! randomized stand-in path for demos.
//!
//! ```no_run
//! use weed_detect::{DetectorConfig, WeedDetector};
//!
//! let detector = WeedDetector::new(DetectorConfig::default());
//! let result = detector.simulate_prediction();
//! println!("{} ({:.2}%)", result.weed_type, result.confidence);
//! ```

pub mod annotations;
pub mod config;
pub mod detector;
pub mod error;
pub mod image_utils;
pub mod models;
pub mod simulation;
pub mod weeds;

pub use annotations::detection::DetectedRegion;
pub use annotations::prediction::{DetectionResult, Prediction};
pub use config::DetectorConfig;
pub use detector::{ModelState, WeedDetector};
pub use error::{Result, WeedDetectionError};
pub use weeds::weed_info::{WeedInfo, control_recommendation, get_weed_info};
pub use weeds::weed_type::WeedType;
