use super::{PalmModelSpec, select_output, sigmoid};
use crate::{InferError, Session};
use relay_base::{Rect, Tensor, Vec2};
use relay_image::{Roi, crop, rotation_between};

pub const PALM_KEYPOINTS: usize = 7;

const STRIDES: [usize; 4] = [8, 16, 16, 16];
const ANCHORS_PER_LAYER: usize = 2;
const REGRESSOR_VALUES: usize = 4 + 2 * PALM_KEYPOINTS;
const SCORE_CLIP: f32 = 100.0;

const ROI_SCALE: f32 = 2.6;
const ROI_SHIFT_Y: f32 = -0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct PalmDetection {
    pub score: f32,
    pub bbox: Rect<f32>,
    pub keypoints: [Vec2<f32>; PALM_KEYPOINTS],
}

impl PalmDetection {
    /// Square around the whole hand, turned so the fingers point up.
    pub fn hand_roi(&self) -> Option<Roi> {
        let rotation = rotation_between(self.keypoints[0], self.keypoints[2]);
        let size = self.bbox.size.x.max(self.bbox.size.y) * ROI_SCALE;
        if !(size > 0.0) || !size.is_finite() {
            return None;
        }
        let shift = Vec2::new(0.0, self.bbox.size.y * ROI_SHIFT_Y).rotated(rotation);
        Some(Roi::new(self.bbox.center() + shift, size, rotation))
    }

    fn mapped(self, roi: &Roi) -> Self {
        let min = roi.project(self.bbox.origin);
        let max = roi.project(self.bbox.max());
        Self {
            score: self.score,
            bbox: Rect::from_min_max(min, max),
            keypoints: self.keypoints.map(|k| roi.project(k)),
        }
    }
}

/// Anchor centers of the palm SSD, normalized to the input square.
pub fn generate_palm_anchors(input_size: usize) -> Vec<Vec2<f32>> {
    let mut anchors = Vec::new();
    let mut layer = 0;
    while layer < STRIDES.len() {
        let stride = STRIDES[layer];
        let mut same = 0;
        while layer + same < STRIDES.len() && STRIDES[layer + same] == stride {
            same += 1;
        }
        let cells = input_size.div_ceil(stride);
        let per_cell = same * ANCHORS_PER_LAYER;
        for y in 0..cells {
            for x in 0..cells {
                let center = Vec2::new(
                    (x as f32 + 0.5) / cells as f32,
                    (y as f32 + 0.5) / cells as f32,
                );
                anchors.extend(std::iter::repeat_n(center, per_cell));
            }
        }
        layer += same;
    }
    anchors
}

/// Decode raw SSD outputs into detections above `threshold`, in coordinates
/// normalized to the input square, best first.
pub fn decode_palms(
    regressors: &Tensor<f32>,
    scores: &Tensor<f32>,
    anchors: &[Vec2<f32>],
    input_size: usize,
    threshold: f32,
) -> Result<Vec<PalmDetection>, InferError> {
    if regressors.data.len() != anchors.len() * REGRESSOR_VALUES {
        return Err(InferError::ShapeMismatch {
            expected: format!("[1, {}, {}]", anchors.len(), REGRESSOR_VALUES),
            got: format!("{:?}", regressors.shape),
        });
    }
    if scores.data.len() != anchors.len() {
        return Err(InferError::ShapeMismatch {
            expected: format!("[1, {}, 1]", anchors.len()),
            got: format!("{:?}", scores.shape),
        });
    }

    let s = input_size as f32;
    let mut detections = Vec::new();
    for (i, anchor) in anchors.iter().enumerate() {
        let score = sigmoid(scores.data[i].clamp(-SCORE_CLIP, SCORE_CLIP));
        if score < threshold {
            continue;
        }
        let r = &regressors.data[i * REGRESSOR_VALUES..(i + 1) * REGRESSOR_VALUES];
        let center = *anchor + Vec2::new(r[0], r[1]) / s;
        let half = Vec2::new(r[2], r[3]) / (2.0 * s);
        let keypoints =
            std::array::from_fn(|k| *anchor + Vec2::new(r[4 + 2 * k], r[5 + 2 * k]) / s);
        detections.push(PalmDetection {
            score,
            bbox: Rect::from_min_max(center - half, center + half),
            keypoints,
        });
    }
    detections.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(detections)
}

/// Greedy suppression over detections sorted best first.
pub fn non_max_suppression(detections: Vec<PalmDetection>, iou_threshold: f32) -> Vec<PalmDetection> {
    let mut keep: Vec<PalmDetection> = Vec::new();
    for detection in detections {
        if keep.iter().all(|k| k.bbox.iou(&detection.bbox) <= iou_threshold) {
            keep.push(detection);
        }
    }
    keep
}

pub struct PalmDetector {
    session: Box<dyn Session>,
    spec: PalmModelSpec,
    anchors: Vec<Vec2<f32>>,
}

impl PalmDetector {
    pub fn new(session: Box<dyn Session>, spec: PalmModelSpec) -> Result<Self, InferError> {
        if session.input_names().is_empty() {
            return Err(InferError::ModelLoad("palm model declares no inputs".to_string()));
        }
        let anchors = generate_palm_anchors(spec.input_size);
        Ok(Self {
            session,
            spec,
            anchors,
        })
    }

    pub fn anchors(&self) -> &[Vec2<f32>] {
        &self.anchors
    }

    /// Palms in frame pixels, best first.
    pub fn detect(
        &mut self,
        frame: &Tensor<u8>,
        threshold: f32,
    ) -> Result<Vec<PalmDetection>, InferError> {
        let (h, w) = super::frame_dims(frame)?;
        let roi = Roi::letterbox(w, h);
        let input = crop(frame, &roi, self.spec.input_size)?;
        let input_name = self.session.input_names()[0].clone();
        let outputs = self.session.run(&[(input_name.as_str(), input)])?;

        let names = self.session.output_names();
        let regressors = select_output(&outputs, names, &self.spec.regressors_output, 0)?;
        let scores = select_output(&outputs, names, &self.spec.scores_output, 1)?;

        let decoded = decode_palms(
            regressors,
            scores,
            &self.anchors,
            self.spec.input_size,
            threshold,
        )?;
        let kept = non_max_suppression(decoded, self.spec.min_suppression_threshold);
        Ok(kept.into_iter().map(|d| d.mapped(&roi)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hand_roi_upright_palm() {
        let palm = PalmDetection {
            score: 0.9,
            bbox: Rect::new(Vec2::new(40.0, 40.0), Vec2::new(20.0, 20.0)),
            keypoints: [
                Vec2::new(50.0, 60.0),
                Vec2::zero(),
                Vec2::new(50.0, 40.0),
                Vec2::zero(),
                Vec2::zero(),
                Vec2::zero(),
                Vec2::zero(),
            ],
        };
        let roi = palm.hand_roi().unwrap();
        assert!(roi.rotation.abs() < 1e-5);
        assert!((roi.size - 52.0).abs() < 1e-4);
        assert!((roi.center.x - 50.0).abs() < 1e-4);
        assert!((roi.center.y - 40.0).abs() < 1e-4);
    }

    #[test]
    fn test_mapped_through_letterbox() {
        let palm = PalmDetection {
            score: 0.8,
            bbox: Rect::from_min_max(Vec2::new(0.25, 0.25), Vec2::new(0.75, 0.75)),
            keypoints: [Vec2::new(0.5, 0.5); PALM_KEYPOINTS],
        };
        let mapped = palm.mapped(&Roi::letterbox(200, 100));
        assert!((mapped.bbox.origin.x - 50.0).abs() < 1e-4);
        assert!((mapped.bbox.origin.y - 0.0).abs() < 1e-4);
        assert!((mapped.bbox.size.x - 100.0).abs() < 1e-4);
        assert!((mapped.keypoints[0].y - 50.0).abs() < 1e-4);
    }
}
