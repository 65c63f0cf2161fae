use crate::Device;
use relay_base::TensorError;
use relay_image::ImageError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum InferError {
    #[error("backend error: {0}")]
    BackendError(String),
    #[error("model load error: {0}")]
    ModelLoad(String),
    #[error("model file not found: {}", .0.display())]
    ModelMissing(PathBuf),
    #[error("unsupported device: {0}")]
    UnsupportedDevice(Device),
    #[error("unsupported dtype: {0}")]
    UnsupportedDtype(String),
    #[error("invalid input '{name}', model expects one of {expected_names:?}")]
    InvalidInput {
        name: String,
        expected_names: Vec<String>,
    },
    #[error("model produced no output named '{0}'")]
    MissingOutput(String),
    #[error("shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: String, got: String },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("image error: {0}")]
    Image(#[from] ImageError),
    #[error("tensor error: {0}")]
    Tensor(#[from] TensorError),
}
