use relay_base::Landmark;

/// Exponential moving average over consecutive landmark sets.
#[derive(Debug, Clone)]
pub struct LandmarkSmoother {
    factor: f32,
    previous: Option<Vec<Landmark>>,
}

impl LandmarkSmoother {
    /// `factor` is the weight of the newest set: 1.0 disables smoothing.
    pub fn new(factor: f32) -> Self {
        Self {
            factor: factor.clamp(0.0, 1.0),
            previous: None,
        }
    }

    pub fn apply(&mut self, landmarks: Vec<Landmark>) -> Vec<Landmark> {
        let smoothed = match &self.previous {
            Some(previous) if previous.len() == landmarks.len() => previous
                .iter()
                .zip(&landmarks)
                .map(|(p, n)| p.lerp(*n, self.factor))
                .collect(),
            _ => landmarks,
        };
        self.previous = Some(smoothed.clone());
        smoothed
    }

    pub fn reset(&mut self) {
        self.previous = None;
    }
}
