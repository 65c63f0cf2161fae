use super::{HandConfig, HandDetector, LandmarkModel, LandmarkOutput, PalmDetector, frame_dims};
use crate::{Backend, InferError, ModelSource, Session};
use relay_base::{Landmark, Tensor, Vec2};
use relay_image::{Roi, rotation_between};
use std::path::Path;

const WRIST: usize = 0;
const MIDDLE_FINGER_MCP: usize = 9;

const ROI_SCALE: f32 = 2.0;
const ROI_SHIFT_Y: f32 = -0.1;
const PALM_OVERLAP_IOU: f32 = 0.5;

/// Multi-hand landmarks: a palm detector finds new hands, the landmark model
/// follows them from frame to frame.
pub struct OnnxHandDetector {
    landmarks: LandmarkModel,
    palms: PalmDetector,
    config: HandConfig,
    tracked: Vec<Roi>,
}

impl OnnxHandDetector {
    /// Load the hand landmark and palm detection models matching
    /// `config.model_complexity` from `model_dir`.
    pub fn new(
        backend: &dyn Backend,
        model_dir: &Path,
        config: HandConfig,
    ) -> Result<Self, InferError> {
        config.validate()?;
        let landmark_path = model_dir.join(config.model_file()?);
        let palm_path = model_dir.join(config.palm_model_file()?);
        for path in [&landmark_path, &palm_path] {
            if !path.is_file() {
                return Err(InferError::ModelMissing(path.clone()));
            }
        }
        let landmarks = backend.load_model(ModelSource::File(landmark_path))?;
        let palms = backend.load_model(ModelSource::File(palm_path))?;
        Self::from_sessions(landmarks, palms, config)
    }

    pub fn from_sessions(
        landmarks: Box<dyn Session>,
        palms: Box<dyn Session>,
        config: HandConfig,
    ) -> Result<Self, InferError> {
        config.validate()?;
        Ok(Self {
            landmarks: LandmarkModel::new(landmarks, config.model.clone())?,
            palms: PalmDetector::new(palms, config.palm.clone())?,
            config,
            tracked: Vec::new(),
        })
    }

    pub fn config(&self) -> &HandConfig {
        &self.config
    }

    pub fn tracked_rois(&self) -> &[Roi] {
        &self.tracked
    }

    pub fn reset(&mut self) {
        self.tracked.clear();
    }

    fn accept(
        &mut self,
        frame: &Tensor<u8>,
        roi: &Roi,
    ) -> Result<Option<(LandmarkOutput, Roi)>, InferError> {
        let output = self.landmarks.run(frame, roi)?;
        if output.score < self.config.min_tracking_confidence {
            log::trace!("hand score {:.3} below threshold", output.score);
            return Ok(None);
        }
        Ok(hand_roi(&output.points).map(|next| (output, next)))
    }
}

impl HandDetector for OnnxHandDetector {
    fn detect_hands(
        &mut self,
        frame: &Tensor<u8>,
    ) -> Result<Option<Vec<Vec<Landmark>>>, InferError> {
        let (h, w) = frame_dims(frame)?;
        let max_hands = self.config.max_num_hands;
        let mut hands: Vec<(LandmarkOutput, Roi)> = Vec::new();

        let previous = std::mem::take(&mut self.tracked);
        if !self.config.static_image_mode {
            for roi in previous.iter().take(max_hands) {
                if let Some(hand) = self.accept(frame, roi)? {
                    hands.push(hand);
                }
            }
        }

        if hands.len() < max_hands {
            let palms = self
                .palms
                .detect(frame, self.config.min_detection_confidence)?;
            for palm in palms {
                if hands.len() >= max_hands {
                    break;
                }
                let Some(roi) = palm.hand_roi() else {
                    continue;
                };
                let bounds = roi.bounding_rect();
                let covered = hands
                    .iter()
                    .any(|(_, next)| next.bounding_rect().iou(&bounds) > PALM_OVERLAP_IOU);
                if covered {
                    continue;
                }
                if let Some(hand) = self.accept(frame, &roi)? {
                    hands.push(hand);
                }
            }
        }

        if !self.config.static_image_mode {
            self.tracked = hands.iter().map(|(_, next)| *next).collect();
        }
        if hands.is_empty() {
            return Ok(None);
        }
        Ok(Some(
            hands
                .iter()
                .map(|(output, _)| output.normalized(w, h))
                .collect(),
        ))
    }
}

/// ROI covering a hand, turned so the wrist-to-middle-finger axis points up.
pub fn hand_roi(points: &[Vec2<f32>]) -> Option<Roi> {
    let rotation = if points.len() > MIDDLE_FINGER_MCP {
        rotation_between(points[WRIST], points[MIDDLE_FINGER_MCP])
    } else {
        0.0
    };
    Roi::around_points(points, rotation, ROI_SCALE, ROI_SHIFT_Y)
}
