use relay_base::TensorError;

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("frame dimensions must be non-zero, got {width}x{height}")]
    ZeroDimension { width: usize, height: usize },
    #[error("frame dimensions {width}x{height} overflow")]
    Overflow { width: usize, height: usize },
    #[error("frame has {got} samples, expected {expected} for {width}x{height}x3")]
    SampleCount {
        width: usize,
        height: usize,
        expected: usize,
        got: usize,
    },
    #[error("expected [H, W, 3] frame, got shape {0:?}")]
    Shape(Vec<usize>),
    #[error("crop size must be non-zero")]
    EmptyCrop,
    #[error("tensor error: {0}")]
    Tensor(#[from] TensorError),
}
