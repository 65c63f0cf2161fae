use crate::RelayError;
use relay_base::{Landmark, Tensor};
use relay_image::frame_from_samples;
use serde::{Deserialize, Serialize};

/// Written on its own line once the detectors are loaded.
pub const READY_TOKEN: &str = "READY";

/// One input line: a packed 3-channel frame, row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRequest {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl FrameRequest {
    pub fn parse(line: &[u8]) -> Result<Self, RelayError> {
        let text = std::str::from_utf8(line)?;
        Ok(serde_json::from_str(text)?)
    }

    /// `[height, width, 3]` tensor; fails when `data` does not hold exactly
    /// `width * height * 3` samples.
    pub fn into_frame(self) -> Result<Tensor<u8>, RelayError> {
        Ok(frame_from_samples(self.width, self.height, self.data)?)
    }
}

/// One output line.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameResult {
    pub pose_landmarks: Vec<Landmark>,
    pub hand_landmarks: Vec<Vec<Landmark>>,
}

impl FrameResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.pose_landmarks.is_empty() && self.hand_landmarks.is_empty()
    }

    pub fn to_line(&self) -> Result<String, RelayError> {
        Ok(serde_json::to_string(self)?)
    }
}
