#![warn(missing_docs)]
//! Look-at camera plus the screen/world mapping used for mouse picking.

mod unproject;

use cubepick_physics::Ray;
use glam::{Mat4, Vec2, Vec3};
use tracing::trace;

pub use unproject::{project, unproject, UnprojectError, Viewport};

/// Fixed camera looking from `eye` towards `target`.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// World up direction.
    pub up: Vec3,

    /// Vertical field of view in radians.
    pub fov: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
    /// Near clipping plane distance.
    pub near: f32,
    /// Far clipping plane distance.
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(-1.0, 5.0, 8.5),
            target: Vec3::new(0.0, -1.0, -1.5),
            up: Vec3::Y,
            fov: 1.0,
            aspect: 960.0 / 540.0,
            near: 0.5,
            far: 100.0,
        }
    }
}

impl Camera {
    /// Create a camera at `eye` looking at `target`, keeping default projection settings.
    pub fn look_at(eye: Vec3, target: Vec3) -> Self {
        Self {
            eye,
            target,
            ..Default::default()
        }
    }

    /// Direction the camera faces.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize()
    }

    /// Compute the view matrix (world space -> camera space).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Compute the projection matrix (camera space -> clip space, depth in `[0, 1]`).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// Compute the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Rebuild the projection for a `width x height` window.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            // Minimized windows report a zero size; keep the last usable projection.
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    /// Build a world-space picking ray through a mouse position.
    ///
    /// `mouse` is in viewport pixels with a top-left origin, as reported by
    /// windowing systems; it is mirrored vertically before unprojection. The ray
    /// starts on the near plane and points at the far plane with a unit-length
    /// direction.
    pub fn screen_ray(&self, mouse: Vec2, viewport: &Viewport) -> Result<Ray, UnprojectError> {
        let window_y = viewport.y + viewport.height - (mouse.y - viewport.y);
        let view = self.view_matrix();
        let projection = self.projection_matrix();

        let start = unproject(Vec3::new(mouse.x, window_y, 0.0), &view, &projection, viewport)?;
        let end = unproject(Vec3::new(mouse.x, window_y, 1.0), &view, &projection, viewport)?;
        let ray = Ray::between(start, end).ok_or(UnprojectError::DegenerateRay)?;

        trace!(?mouse, origin = ?ray.origin, direction = ?ray.direction, "screen ray");
        Ok(ray)
    }

    /// Window coordinates (top-left origin) of a world-space point, plus its depth.
    pub fn world_to_screen(&self, point: Vec3, viewport: &Viewport) -> Result<Vec3, UnprojectError> {
        let window = project(point, &self.view_matrix(), &self.projection_matrix(), viewport)?;
        let mouse_y = viewport.y + viewport.height - (window.y - viewport.y);
        Ok(Vec3::new(window.x, mouse_y, window.z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubepick_physics::{Obb, World};

    #[test]
    fn camera_default_initialization() {
        let camera = Camera::default();
        assert_eq!(camera.eye, Vec3::new(-1.0, 5.0, 8.5));
        assert_eq!(camera.target, Vec3::new(0.0, -1.0, -1.5));
        assert_eq!(camera.near, 0.5);
        assert_eq!(camera.far, 100.0);
    }

    #[test]
    fn camera_matrices_are_valid() {
        let camera = Camera::default();

        let view = camera.view_matrix();
        let proj = camera.projection_matrix();
        let view_proj = camera.view_projection_matrix();

        assert!(view.to_cols_array().iter().all(|x| x.is_finite()));
        assert!(proj.to_cols_array().iter().all(|x| x.is_finite()));
        assert!(view_proj.determinant().abs() > 0.0);
    }

    #[test]
    fn resize_ignores_zero_size() {
        let mut camera = Camera::default();
        camera.resize(800, 400);
        assert_eq!(camera.aspect, 2.0);
        camera.resize(0, 400);
        assert_eq!(camera.aspect, 2.0);
    }

    #[test]
    fn screen_center_ray_follows_forward() {
        let camera = Camera::default();
        let viewport = Viewport::from_size(960, 540);
        let ray = camera.screen_ray(Vec2::new(480.0, 270.0), &viewport).unwrap();

        assert!((ray.direction.length() - 1.0).abs() < 1e-5);
        assert!(ray.direction.dot(camera.forward()) > 0.9999);
        // Origin sits on the near plane.
        let along = (ray.origin - camera.eye).dot(camera.forward());
        assert!((along - camera.near).abs() < 1e-3);
    }

    #[test]
    fn screen_center_ray_hits_box_in_front() {
        let camera = Camera::default();
        let viewport = Viewport::from_size(960, 540);
        let center = camera.eye + camera.forward() * 6.0;

        let mut world = World::new();
        let handle = world.add_object(Obb::cube(1.0, Mat4::from_translation(center)));

        let ray = camera.screen_ray(Vec2::new(480.0, 270.0), &viewport).unwrap();
        assert_eq!(world.ray_test(&ray), Some(handle));
    }

    #[test]
    fn huge_far_plane_keeps_picking() {
        let camera = Camera {
            far: 1.0e7,
            ..Default::default()
        };
        let viewport = Viewport::from_size(960, 540);
        let ray = camera.screen_ray(Vec2::new(480.0, 270.0), &viewport).unwrap();
        assert!(ray.direction.dot(camera.forward()) > 0.999);
    }

    #[test]
    fn mouse_y_is_flipped() {
        let camera = Camera::look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        let viewport = Viewport::from_size(100, 100);

        // Top of the window looks upwards.
        let ray = camera.screen_ray(Vec2::new(50.0, 0.0), &viewport).unwrap();
        assert!(ray.direction.y > 0.0);
        let ray = camera.screen_ray(Vec2::new(50.0, 100.0), &viewport).unwrap();
        assert!(ray.direction.y < 0.0);
    }

    #[test]
    fn world_to_screen_inverts_screen_ray() {
        let camera = Camera::default();
        let viewport = Viewport::from_size(960, 540);
        let point = Vec3::new(2.0, 0.0, -1.0);

        let screen = camera.world_to_screen(point, &viewport).unwrap();
        let ray = camera
            .screen_ray(Vec2::new(screen.x, screen.y), &viewport)
            .unwrap();

        // The point lies on the ray.
        let to_point = point - ray.origin;
        let off_axis = to_point - ray.direction * to_point.dot(ray.direction);
        assert!(off_axis.length() < 1e-2);
    }
}
