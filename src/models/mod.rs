pub mod classification_model;
pub mod network;
pub mod ort_inference_session;
pub mod region_utils;
