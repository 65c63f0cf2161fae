use super::{LandmarkModelSpec, sigmoid};
use crate::{InferError, Session};
use relay_base::{Landmark, Tensor, Vec2};
use relay_image::{Roi, crop};
use std::collections::HashMap;

/// Landmark model bound to its output layout.
pub struct LandmarkModel {
    session: Box<dyn Session>,
    spec: LandmarkModelSpec,
}

/// Result of running a landmark model on one ROI.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkOutput {
    /// Presence probability.
    pub score: f32,
    /// Landmark positions in frame pixels.
    pub points: Vec<Vec2<f32>>,
    /// Depth in frame pixels, same scale as x.
    pub depths: Vec<f32>,
}

impl LandmarkOutput {
    /// Landmarks in normalized frame coordinates.
    pub fn normalized(&self, width: usize, height: usize) -> Vec<Landmark> {
        let (w, h) = (width as f32, height as f32);
        self.points
            .iter()
            .zip(&self.depths)
            .map(|(p, z)| Landmark::new(p.x / w, p.y / h, z / w))
            .collect()
    }
}

impl LandmarkModel {
    pub fn new(session: Box<dyn Session>, spec: LandmarkModelSpec) -> Result<Self, InferError> {
        spec.validate()?;
        if session.input_names().is_empty() {
            return Err(InferError::ModelLoad("landmark model declares no inputs".to_string()));
        }
        Ok(Self { session, spec })
    }

    pub fn spec(&self) -> &LandmarkModelSpec {
        &self.spec
    }

    pub fn run(&mut self, frame: &Tensor<u8>, roi: &Roi) -> Result<LandmarkOutput, InferError> {
        let size = self.spec.input_size;
        let input = crop(frame, roi, size)?;
        let input_name = self.session.input_names()[0].clone();
        let outputs = self.session.run(&[(input_name.as_str(), input)])?;

        let names = self.session.output_names();
        let landmarks = select_output(&outputs, names, &self.spec.landmarks_output, 0)?;
        let score = select_output(&outputs, names, &self.spec.score_output, 1)?;

        let count = self.spec.landmark_count;
        let stride = self.spec.values_per_landmark;
        if landmarks.data.len() < count * stride {
            return Err(InferError::ShapeMismatch {
                expected: format!("{} landmark values", count * stride),
                got: format!("{:?}", landmarks.shape),
            });
        }
        let raw_score = *score.data.first().ok_or_else(|| InferError::ShapeMismatch {
            expected: "a presence score".to_string(),
            got: format!("{:?}", score.shape),
        })?;
        let score = if self.spec.score_is_logit {
            sigmoid(raw_score)
        } else {
            raw_score
        };

        let s = size as f32;
        let mut points = Vec::with_capacity(count);
        let mut depths = Vec::with_capacity(count);
        for values in landmarks.data.chunks_exact(stride).take(count) {
            points.push(roi.project(Vec2::new(values[0] / s, values[1] / s)));
            depths.push(values[2] / s * roi.size);
        }

        Ok(LandmarkOutput {
            score,
            points,
            depths,
        })
    }
}

/// Output tensor called `name`, or the `index`th declared output when the
/// model uses other names.
pub fn select_output<'a>(
    outputs: &'a HashMap<String, Tensor<f32>>,
    output_names: &[String],
    name: &str,
    index: usize,
) -> Result<&'a Tensor<f32>, InferError> {
    outputs
        .get(name)
        .or_else(|| output_names.get(index).and_then(|n| outputs.get(n)))
        .ok_or_else(|| InferError::MissingOutput(name.to_string()))
}
