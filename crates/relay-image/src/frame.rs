use crate::ImageError;
use relay_base::Tensor;
use serde::{Deserialize, Serialize};

/// Samples per pixel in every frame the relay accepts.
pub const CHANNELS: usize = 3;

/// Order of the three samples of each incoming pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    #[default]
    Rgb,
    Bgr,
}

impl std::str::FromStr for ChannelOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rgb" => Ok(ChannelOrder::Rgb),
            "bgr" => Ok(ChannelOrder::Bgr),
            other => Err(format!("unknown channel order '{other}', expected rgb or bgr")),
        }
    }
}

/// Number of samples a `width` x `height` frame must carry.
pub fn frame_size(width: usize, height: usize) -> Result<usize, ImageError> {
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or(ImageError::Overflow { width, height })
}

/// Build an HWC frame from a flat row-major sample buffer.
pub fn frame_from_samples(
    width: usize,
    height: usize,
    data: Vec<u8>,
) -> Result<Tensor<u8>, ImageError> {
    if width == 0 || height == 0 {
        return Err(ImageError::ZeroDimension { width, height });
    }

    let expected = frame_size(width, height)?;
    if data.len() != expected {
        return Err(ImageError::SampleCount {
            width,
            height,
            expected,
            got: data.len(),
        });
    }

    Ok(Tensor::new(vec![height, width, CHANNELS], data)?)
}

/// Reorder samples in place so the frame is RGB.
pub fn to_rgb(frame: &mut Tensor<u8>, order: ChannelOrder) {
    if order == ChannelOrder::Bgr {
        for pixel in frame.data.chunks_exact_mut(CHANNELS) {
            pixel.swap(0, 2);
        }
    }
}
