//! Ray type used for picking queries.

use glam::Vec3;

/// A half-line starting at `origin` and extending along `direction`.
///
/// The direction is stored as given. Intersection distances are only in world
/// units when the direction has unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point in world space.
    pub origin: Vec3,
    /// Direction of travel.
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray from an origin and direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Create a ray from `start` towards `end`, normalizing the direction.
    ///
    /// Returns `None` when the two points coincide.
    pub fn between(start: Vec3, end: Vec3) -> Option<Self> {
        let direction = (end - start).try_normalize()?;
        Some(Self::new(start, direction))
    }

    /// Point reached after travelling `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
