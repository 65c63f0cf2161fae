use crate::Vec2;

/// Axis-aligned rectangle, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect<T> {
    pub origin: Vec2<T>,
    pub size: Vec2<T>,
}

impl<T> Rect<T> {
    pub fn new(origin: Vec2<T>, size: Vec2<T>) -> Self {
        Self { origin, size }
    }
}

impl Rect<f32> {
    pub fn from_min_max(min: Vec2<f32>, max: Vec2<f32>) -> Self {
        Self {
            origin: min,
            size: max - min,
        }
    }

    /// Smallest rectangle containing every point, `None` for an empty iterator.
    pub fn bounding(points: impl IntoIterator<Item = Vec2<f32>>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| {
            (
                Vec2::new(min.x.min(p.x), min.y.min(p.y)),
                Vec2::new(max.x.max(p.x), max.y.max(p.y)),
            )
        });
        Some(Self::from_min_max(min, max))
    }

    pub fn max(&self) -> Vec2<f32> {
        self.origin + self.size
    }

    pub fn center(&self) -> Vec2<f32> {
        self.origin + self.size / 2.0
    }

    pub fn area(&self) -> f32 {
        self.size.x * self.size.y
    }

    pub fn intersection(&self, other: &Rect<f32>) -> Option<Rect<f32>> {
        let self_max = self.max();
        let other_max = other.max();
        let min = Vec2::new(
            self.origin.x.max(other.origin.x),
            self.origin.y.max(other.origin.y),
        );
        let max = Vec2::new(self_max.x.min(other_max.x), self_max.y.min(other_max.y));
        if min.x >= max.x || min.y >= max.y {
            return None;
        }
        Some(Rect::from_min_max(min, max))
    }

    /// Intersection over union, 0.0 for disjoint or degenerate boxes.
    pub fn iou(&self, other: &Rect<f32>) -> f32 {
        if self.size.x <= 0.0 || self.size.y <= 0.0 || other.size.x <= 0.0 || other.size.y <= 0.0
        {
            return 0.0;
        }

        let intersection_area = self.intersection(other).map_or(0.0, |r| r.area());
        let union_area = self.area() + other.area() - intersection_area;
        if union_area <= 0.0 {
            return 0.0;
        }

        intersection_area / union_area
    }
}
