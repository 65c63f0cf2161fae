//! Frame handling for the relay.
//!
//! Frames are `Tensor<u8>` in HWC layout (`[height, width, 3]`). Model inputs
//! produced by [`crop`] are `Tensor<f32>` in NHWC layout (`[1, size, size, 3]`)
//! with values in `[0.0, 1.0]`.

pub mod crop;
pub mod error;
pub mod frame;
pub mod roi;

pub use crop::crop;
pub use error::ImageError;
pub use frame::{CHANNELS, ChannelOrder, frame_from_samples, frame_size, to_rgb};
pub use roi::{Roi, normalize_radians, rotation_between};
