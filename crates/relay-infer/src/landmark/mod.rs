//! Pose and hand landmark detection on RGB frames.
//!
//! The detectors crop a region of interest out of the frame, run a landmark
//! model on it and project the model's points back into normalized frame
//! coordinates. Between frames they track: the landmarks found in one frame
//! define where to look in the next.

mod config;
mod hand;
mod model;
mod palm;
mod pose;
mod smoothing;

pub use config::{HandConfig, LandmarkModelSpec, PalmModelSpec, PoseConfig};
pub use hand::{OnnxHandDetector, hand_roi};
pub use model::{LandmarkModel, LandmarkOutput, select_output};
pub use palm::{
    PALM_KEYPOINTS, PalmDetection, PalmDetector, decode_palms, generate_palm_anchors,
    non_max_suppression,
};
pub use pose::{OnnxPoseDetector, pose_roi};
pub use smoothing::LandmarkSmoother;

use crate::InferError;
use relay_base::{Landmark, Tensor};

pub const POSE_LANDMARK_COUNT: usize = 33;
pub const HAND_LANDMARK_COUNT: usize = 21;

pub trait PoseDetector {
    /// Landmarks of the most prominent person in an HWC RGB frame, or
    /// `None` when nobody is found.
    fn detect_pose(&mut self, frame: &Tensor<u8>) -> Result<Option<Vec<Landmark>>, InferError>;
}

pub trait HandDetector {
    /// One landmark list per detected hand, or `None` when no hand is found.
    fn detect_hands(
        &mut self,
        frame: &Tensor<u8>,
    ) -> Result<Option<Vec<Vec<Landmark>>>, InferError>;
}

impl<T: PoseDetector + ?Sized> PoseDetector for Box<T> {
    fn detect_pose(&mut self, frame: &Tensor<u8>) -> Result<Option<Vec<Landmark>>, InferError> {
        (**self).detect_pose(frame)
    }
}

impl<T: HandDetector + ?Sized> HandDetector for Box<T> {
    fn detect_hands(
        &mut self,
        frame: &Tensor<u8>,
    ) -> Result<Option<Vec<Vec<Landmark>>>, InferError> {
        (**self).detect_hands(frame)
    }
}

pub(crate) fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Height and width of an HWC frame.
pub(crate) fn frame_dims(frame: &Tensor<u8>) -> Result<(usize, usize), InferError> {
    match frame.hw() {
        Some((h, w)) if h > 0 && w > 0 => Ok((h, w)),
        _ => Err(InferError::ShapeMismatch {
            expected: "[H, W, 3]".to_string(),
            got: format!("{:?}", frame.shape),
        }),
    }
}
