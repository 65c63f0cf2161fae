pub mod landmark;
pub mod logging;
pub mod rect;
pub mod tensor;
pub mod vec2;

pub use landmark::Landmark;
pub use logging::{FileLogger, StderrLogger, init_file_logger, init_stderr_logger};
pub use rect::Rect;
pub use tensor::{Tensor, TensorError};
pub use vec2::Vec2;
