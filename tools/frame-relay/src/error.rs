use relay_image::ImageError;
use relay_infer::InferError;

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("input line is not UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("invalid frame request: {0}")]
    Json(#[from] serde_json::Error),
    #[error("bad frame: {0}")]
    Frame(#[from] ImageError),
    #[error("detector failed: {0}")]
    Detector(#[from] InferError),
    #[error("detector panicked: {0}")]
    Panic(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
