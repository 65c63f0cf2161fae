use relay_base::{Rect, Vec2};
use std::f32::consts::PI;

/// Region of interest: a square of side `size` pixels centered on `center`,
/// turned by `rotation` radians. Model crops are taken from it and model
/// outputs are projected back through it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Roi {
    pub center: Vec2<f32>,
    pub size: f32,
    pub rotation: f32,
}

impl Roi {
    pub fn new(center: Vec2<f32>, size: f32, rotation: f32) -> Self {
        Self {
            center,
            size,
            rotation,
        }
    }

    /// The whole `width` x `height` frame padded to a centered square.
    pub fn letterbox(width: usize, height: usize) -> Self {
        let (w, h) = (width as f32, height as f32);
        Self {
            center: Vec2::new(w / 2.0, h / 2.0),
            size: w.max(h),
            rotation: 0.0,
        }
    }

    /// Square around `points` measured along the `rotation` axis, shifted by
    /// `shift_y` heights along that axis and scaled by `scale`.
    pub fn around_points(
        points: &[Vec2<f32>],
        rotation: f32,
        scale: f32,
        shift_y: f32,
    ) -> Option<Self> {
        let pivot = Rect::bounding(points.iter().copied())?.center();
        let local = Rect::bounding(points.iter().map(|&p| (p - pivot).rotated(-rotation)))?;

        let mut center = pivot + local.center().rotated(rotation);
        center = center + Vec2::new(0.0, local.size.y * shift_y).rotated(rotation);

        let size = local.size.x.max(local.size.y) * scale;
        if !(size > 0.0) || !size.is_finite() {
            return None;
        }

        Some(Self {
            center,
            size,
            rotation,
        })
    }

    /// Map a point in ROI-normalized coordinates (`[0, 1]` across the square)
    /// to frame pixels.
    pub fn project(&self, point: Vec2<f32>) -> Vec2<f32> {
        let offset = (point - Vec2::new(0.5, 0.5)) * self.size;
        self.center + offset.rotated(self.rotation)
    }

    /// Inverse of [`Roi::project`].
    pub fn unproject(&self, point: Vec2<f32>) -> Vec2<f32> {
        (point - self.center).rotated(-self.rotation) / self.size + Vec2::new(0.5, 0.5)
    }

    /// Axis-aligned box covering the (possibly rotated) square.
    pub fn bounding_rect(&self) -> Rect<f32> {
        let corners = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
        ];
        Rect::bounding(corners.into_iter().map(|c| self.project(c)))
            .unwrap_or_else(|| Rect::new(self.center, Vec2::zero()))
    }

    pub fn is_axis_aligned(&self) -> bool {
        self.rotation.abs() < 1e-6
    }
}

/// Wrap an angle into `[-PI, PI)`.
pub fn normalize_radians(angle: f32) -> f32 {
    angle - 2.0 * PI * ((angle + PI) / (2.0 * PI)).floor()
}

/// Rotation that turns the `from -> to` direction upright (pointing up in
/// the crop).
pub fn rotation_between(from: Vec2<f32>, to: Vec2<f32>) -> f32 {
    normalize_radians(PI / 2.0 - (-(to.y - from.y)).atan2(to.x - from.x))
}
