//! Error types for the weed detection library.

use thiserror::Error;

/// Result type alias for the weed detection library.
pub type Result<T> = std::result::Result<T, WeedDetectionError>;

/// Errors surfaced by the detector and its helpers.
///
/// The simulated path and the species catalog never produce these; only model
/// loading, real inference, image decoding and configuration can fail.
#[derive(Error, Debug)]
pub enum WeedDetectionError {
    #[error("Model initialization failed: {0}")]
    Initialization(String),

    #[error("Models are not available, load weights before running real detection")]
    ModelUnavailable,

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ONNX runtime error: {0}")]
    Ort(#[from] ort::Error),
}

impl WeedDetectionError {
    pub fn initialization<S: Into<String>>(msg: S) -> Self {
        Self::Initialization(msg.into())
    }

    pub fn inference<S: Into<String>>(msg: S) -> Self {
        Self::Inference(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }
}
