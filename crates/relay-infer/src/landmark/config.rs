use super::{HAND_LANDMARK_COUNT, POSE_LANDMARK_COUNT};
use crate::InferError;
use serde::{Deserialize, Serialize};

/// Shape of a landmark model's input and outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkModelSpec {
    /// Side of the square RGB input, in pixels.
    pub input_size: usize,
    pub landmark_count: usize,
    /// Floats per landmark; the first three are x, y (input pixels) and z.
    pub values_per_landmark: usize,
    /// Output names, falling back to the first and second declared outputs.
    pub landmarks_output: String,
    pub score_output: String,
    /// The score output holds a logit rather than a probability.
    pub score_is_logit: bool,
}

impl LandmarkModelSpec {
    pub fn pose() -> Self {
        Self {
            input_size: 256,
            landmark_count: POSE_LANDMARK_COUNT,
            values_per_landmark: 5,
            landmarks_output: "Identity".to_string(),
            score_output: "Identity_1".to_string(),
            score_is_logit: true,
        }
    }

    pub fn hand() -> Self {
        Self {
            input_size: 224,
            landmark_count: HAND_LANDMARK_COUNT,
            values_per_landmark: 3,
            landmarks_output: "Identity".to_string(),
            score_output: "Identity_1".to_string(),
            score_is_logit: false,
        }
    }

    pub fn validate(&self) -> Result<(), InferError> {
        if self.input_size == 0 {
            return Err(InferError::Config("model input_size must be positive".to_string()));
        }
        if self.landmark_count == 0 {
            return Err(InferError::Config("model landmark_count must be positive".to_string()));
        }
        if self.values_per_landmark < 3 {
            return Err(InferError::Config(format!(
                "model values_per_landmark must be at least 3, got {}",
                self.values_per_landmark
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PalmModelSpec {
    pub input_size: usize,
    pub regressors_output: String,
    pub scores_output: String,
    /// IoU above which overlapping palm boxes are suppressed.
    pub min_suppression_threshold: f32,
}

impl Default for PalmModelSpec {
    fn default() -> Self {
        Self {
            input_size: 192,
            regressors_output: "Identity".to_string(),
            scores_output: "Identity_1".to_string(),
            min_suppression_threshold: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseConfig {
    pub static_image_mode: bool,
    /// 0 lite, 1 full, 2 heavy.
    pub model_complexity: u8,
    pub smooth_landmarks: bool,
    /// Weight of the newest detection when smoothing.
    pub smoothing_factor: f32,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
    pub model: LandmarkModelSpec,
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            static_image_mode: false,
            model_complexity: 1,
            smooth_landmarks: true,
            smoothing_factor: 0.5,
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
            model: LandmarkModelSpec::pose(),
        }
    }
}

impl PoseConfig {
    pub fn model_file(&self) -> Result<&'static str, InferError> {
        match self.model_complexity {
            0 => Ok("pose_landmark_lite.onnx"),
            1 => Ok("pose_landmark_full.onnx"),
            2 => Ok("pose_landmark_heavy.onnx"),
            other => Err(InferError::Config(format!(
                "pose model_complexity must be 0, 1 or 2, got {other}"
            ))),
        }
    }

    pub fn validate(&self) -> Result<(), InferError> {
        self.model_file()?;
        check_confidence("pose min_detection_confidence", self.min_detection_confidence)?;
        check_confidence("pose min_tracking_confidence", self.min_tracking_confidence)?;
        if !(self.smoothing_factor > 0.0 && self.smoothing_factor <= 1.0) {
            return Err(InferError::Config(format!(
                "pose smoothing_factor must be in (0, 1], got {}",
                self.smoothing_factor
            )));
        }
        self.model.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandConfig {
    pub static_image_mode: bool,
    pub max_num_hands: usize,
    /// 0 lite, 1 full.
    pub model_complexity: u8,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
    pub model: LandmarkModelSpec,
    pub palm: PalmModelSpec,
}

impl Default for HandConfig {
    fn default() -> Self {
        Self {
            static_image_mode: false,
            max_num_hands: 2,
            model_complexity: 1,
            min_detection_confidence: 0.4,
            min_tracking_confidence: 0.4,
            model: LandmarkModelSpec::hand(),
            palm: PalmModelSpec::default(),
        }
    }
}

impl HandConfig {
    pub fn model_file(&self) -> Result<&'static str, InferError> {
        match self.model_complexity {
            0 => Ok("hand_landmark_lite.onnx"),
            1 => Ok("hand_landmark_full.onnx"),
            other => Err(hand_complexity_error(other)),
        }
    }

    pub fn palm_model_file(&self) -> Result<&'static str, InferError> {
        match self.model_complexity {
            0 => Ok("palm_detection_lite.onnx"),
            1 => Ok("palm_detection_full.onnx"),
            other => Err(hand_complexity_error(other)),
        }
    }

    pub fn validate(&self) -> Result<(), InferError> {
        self.model_file()?;
        if self.max_num_hands == 0 {
            return Err(InferError::Config("max_num_hands must be at least 1".to_string()));
        }
        check_confidence("hand min_detection_confidence", self.min_detection_confidence)?;
        check_confidence("hand min_tracking_confidence", self.min_tracking_confidence)?;
        if self.palm.input_size == 0 {
            return Err(InferError::Config("palm input_size must be positive".to_string()));
        }
        self.model.validate()
    }
}

fn hand_complexity_error(complexity: u8) -> InferError {
    InferError::Config(format!(
        "hand model_complexity must be 0 or 1, got {complexity}"
    ))
}

fn check_confidence(name: &str, value: f32) -> Result<(), InferError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(InferError::Config(format!("{name} must be in [0, 1], got {value}")))
    }
}
