use crate::error::{Result, WeedDetectionError};
use ndarray::{Array4, ArrayD, IxDyn};
use ort::session::Session;
use ort::value::TensorRef;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// An onnxruntime inference session.
///
/// Both ONNX-backed models in this crate are thin wrappers around one of these. Running a
/// session needs exclusive access, so it sits behind a mutex and the models can be shared.
pub struct OrtInferenceSession {
    session: Mutex<Session>,
    model_path: PathBuf,
}

impl OrtInferenceSession {
    pub fn new(model_path: &Path) -> Result<Self> {
        if !model_path.exists() {
            return Err(WeedDetectionError::initialization(format!(
                "Model path does not exist, or cannot be read: {:?}",
                model_path
            )));
        }
        let session = Session::builder()?.commit_from_file(model_path)?;
        log::info!("Opened ONNX session for {:?}", model_path);
        Ok(Self {
            session: Mutex::new(session),
            model_path: model_path.to_path_buf(),
        })
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Runs the model on a single NCHW input and copies out its first output.
    ///
    /// The returned array is owned; the runtime's output buffers are released before returning.
    pub fn run(&self, input: &Array4<f32>) -> Result<ArrayD<f32>> {
        let mut session = self
            .session
            .lock()
            .map_err(|_| WeedDetectionError::inference("ONNX session lock poisoned"))?;
        let outputs = session.run(ort::inputs![TensorRef::from_array_view(input)?])?;
        let (shape, data) = outputs[0].try_extract_tensor::<f32>()?;
        let dims: Vec<usize> = shape.iter().map(|&d| d.max(0) as usize).collect();
        ArrayD::from_shape_vec(IxDyn(&dims), data.to_vec())
            .map_err(|e| WeedDetectionError::inference(format!("bad output shape: {}", e)))
    }
}
