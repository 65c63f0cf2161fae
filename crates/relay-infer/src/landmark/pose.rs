use super::{
    LandmarkModel, LandmarkOutput, LandmarkSmoother, PoseConfig, PoseDetector, frame_dims,
};
use crate::{Backend, InferError, ModelSource, Session};
use relay_base::{Landmark, Tensor, Vec2};
use relay_image::{Roi, rotation_between};
use std::path::Path;

const LEFT_SHOULDER: usize = 11;
const RIGHT_SHOULDER: usize = 12;
const LEFT_HIP: usize = 23;
const RIGHT_HIP: usize = 24;

const ROI_SCALE: f32 = 1.25;

/// Single-person pose landmarks from an ONNX landmark model.
pub struct OnnxPoseDetector {
    model: LandmarkModel,
    config: PoseConfig,
    previous_roi: Option<Roi>,
    smoother: LandmarkSmoother,
}

impl OnnxPoseDetector {
    /// Load the landmark model matching `config.model_complexity` from
    /// `model_dir`.
    pub fn new(
        backend: &dyn Backend,
        model_dir: &Path,
        config: PoseConfig,
    ) -> Result<Self, InferError> {
        config.validate()?;
        let path = model_dir.join(config.model_file()?);
        if !path.is_file() {
            return Err(InferError::ModelMissing(path));
        }
        let session = backend.load_model(ModelSource::File(path))?;
        Self::from_session(session, config)
    }

    pub fn from_session(session: Box<dyn Session>, config: PoseConfig) -> Result<Self, InferError> {
        config.validate()?;
        let model = LandmarkModel::new(session, config.model.clone())?;
        let smoother = LandmarkSmoother::new(config.smoothing_factor);
        Ok(Self {
            model,
            config,
            previous_roi: None,
            smoother,
        })
    }

    pub fn config(&self) -> &PoseConfig {
        &self.config
    }

    /// ROI the next frame will be searched in, if a person is being tracked.
    pub fn tracked_roi(&self) -> Option<Roi> {
        self.previous_roi
    }

    pub fn reset(&mut self) {
        self.previous_roi = None;
        self.smoother.reset();
    }

    fn attempt(
        &mut self,
        frame: &Tensor<u8>,
        roi: &Roi,
        threshold: f32,
    ) -> Result<Option<LandmarkOutput>, InferError> {
        let output = self.model.run(frame, roi)?;
        if output.score >= threshold {
            Ok(Some(output))
        } else {
            log::trace!("pose score {:.3} below {:.3}", output.score, threshold);
            Ok(None)
        }
    }
}

impl PoseDetector for OnnxPoseDetector {
    fn detect_pose(&mut self, frame: &Tensor<u8>) -> Result<Option<Vec<Landmark>>, InferError> {
        let (h, w) = frame_dims(frame)?;

        let tracked = match self.previous_roi.take() {
            Some(roi) if !self.config.static_image_mode => {
                self.attempt(frame, &roi, self.config.min_tracking_confidence)?
            }
            _ => None,
        };
        let found = match tracked {
            Some(output) => Some(output),
            None => self.attempt(
                frame,
                &Roi::letterbox(w, h),
                self.config.min_detection_confidence,
            )?,
        };

        let Some(output) = found else {
            self.reset();
            return Ok(None);
        };

        if !self.config.static_image_mode {
            self.previous_roi = pose_roi(&output.points);
        }
        let landmarks = output.normalized(w, h);
        if self.config.smooth_landmarks && !self.config.static_image_mode {
            Ok(Some(self.smoother.apply(landmarks)))
        } else {
            Ok(Some(landmarks))
        }
    }
}

/// ROI covering a body, turned so the hip-to-shoulder axis points up.
pub fn pose_roi(points: &[Vec2<f32>]) -> Option<Roi> {
    let rotation = if points.len() > RIGHT_HIP {
        let hips = points[LEFT_HIP].lerp(points[RIGHT_HIP], 0.5);
        let shoulders = points[LEFT_SHOULDER].lerp(points[RIGHT_SHOULDER], 0.5);
        rotation_between(hips, shoulders)
    } else {
        0.0
    };
    Roi::around_points(points, rotation, ROI_SCALE, 0.0)
}
