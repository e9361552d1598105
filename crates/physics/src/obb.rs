//! Oriented bounding boxes and the ray/box slab test.

use glam::{Mat4, Vec3};

use crate::Ray;

/// Threshold below which a ray is treated as parallel to a box axis.
pub const PARALLEL_EPSILON: f32 = 0.001;

/// Box of `width x height x length` centered on its local origin and placed in
/// the world by `transform`.
///
/// The columns of the transform's upper 3x3 are the world-space box axes and
/// its translation is the world-space center. The axes are used as-is, so a
/// scaled transform scales the effective extents too. Callers are expected to
/// keep the axes orthogonal; shear has no meaningful slab interpretation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obb {
    /// Extent along the local X axis.
    pub width: f32,
    /// Extent along the local Y axis.
    pub height: f32,
    /// Extent along the local Z axis.
    pub length: f32,
    /// Local-to-world transform.
    pub transform: Mat4,
}

impl Obb {
    /// Create a box with the given extents and transform.
    pub fn new(width: f32, height: f32, length: f32, transform: Mat4) -> Self {
        Self {
            width,
            height,
            length,
            transform,
        }
    }

    /// Create a cube with edge `size`.
    pub fn cube(size: f32, transform: Mat4) -> Self {
        Self::new(size, size, size, transform)
    }

    /// Local-space corner with the smallest coordinates.
    pub fn near_corner(&self) -> Vec3 {
        Vec3::new(-self.width, -self.height, -self.length) * 0.5
    }

    /// Local-space corner with the largest coordinates.
    pub fn far_corner(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.length) * 0.5
    }

    /// World-space center.
    pub fn center(&self) -> Vec3 {
        self.transform.w_axis.truncate()
    }

    /// World-space X, Y and Z box axes (unnormalized).
    pub fn axes(&self) -> [Vec3; 3] {
        [
            self.transform.x_axis.truncate(),
            self.transform.y_axis.truncate(),
            self.transform.z_axis.truncate(),
        ]
    }

    /// Distance along `ray` to the point where it enters this box.
    ///
    /// Only hits with `t >= 0` count; a ray starting inside the box reports
    /// `Some(0.0)`. Returns `None` when the ray misses.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let delta = self.center() - ray.origin;
        let near = self.near_corner();
        let far = self.far_corner();

        let mut range = SlabRange {
            t_min: 0.0,
            t_max: f32::INFINITY,
        };

        for (i, axis) in self.axes().into_iter().enumerate() {
            if !range.clip(ray, axis, near[i], far[i], delta) {
                return None;
            }
            if range.t_max < range.t_min {
                return None;
            }
        }

        Some(range.t_min)
    }
}

/// Running `[t_min, t_max]` interval shared by the three slabs.
struct SlabRange {
    t_min: f32,
    t_max: f32,
}

impl SlabRange {
    /// Narrow the interval by the slab around `axis`.
    ///
    /// Returns `false` when the ray runs parallel to the slab and outside it.
    fn clip(&mut self, ray: &Ray, axis: Vec3, near: f32, far: f32, delta: Vec3) -> bool {
        let e = axis.dot(delta);
        let f = ray.direction.dot(axis);

        if f.abs() > PARALLEL_EPSILON {
            let mut t1 = (e + near) / f;
            let mut t2 = (e + far) / f;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            self.t_max = self.t_max.min(t2);
            self.t_min = self.t_min.max(t1);
            true
        } else {
            // Parallel: the ray's offset along this axis is fixed.
            !(-e + near > 0.0 || -e + far < 0.0)
        }
    }
}
