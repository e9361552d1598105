//! Property-based tests for unprojection
//!
//! Validates:
//! - project followed by unproject returns the original point
//! - picking rays have unit-length directions
//! - a box placed under the cursor is picked

use cubepick_camera::{project, unproject, Camera, Viewport};
use cubepick_physics::{Obb, World};
use glam::{Mat4, Vec2, Vec3};
use proptest::prelude::*;

fn camera() -> impl Strategy<Value = Camera> {
    (
        (-10.0f32..10.0, 1.0f32..10.0, 5.0f32..15.0),
        (-2.0f32..2.0, -2.0f32..2.0, -2.0f32..2.0),
        0.6f32..1.4,
    )
        .prop_map(|(eye, target, fov)| {
            let mut camera = Camera::look_at(
                Vec3::new(eye.0, eye.1, eye.2),
                Vec3::new(target.0, target.1, target.2),
            );
            camera.fov = fov;
            camera
        })
}

proptest! {
    /// Property: unproject(project(p)) == p for points inside the frustum
    #[test]
    fn round_trip_reconstructs_point(
        camera in camera(),
        depth in 2.0f32..30.0,
        offset in (-0.3f32..0.3, -0.3f32..0.3),
    ) {
        let viewport = Viewport::from_size(960, 540);
        let view = camera.view_matrix();
        let projection = camera.projection_matrix();

        let forward = camera.forward();
        let right = forward.cross(camera.up).normalize();
        let up = right.cross(forward);
        let point = camera.eye
            + forward * depth
            + right * offset.0 * depth
            + up * offset.1 * depth;

        let window = project(point, &view, &projection, &viewport).unwrap();
        let back = unproject(window, &view, &projection, &viewport).unwrap();
        let tolerance = 1e-3 * depth.max(1.0) * depth.max(1.0);
        prop_assert!((back - point).length() < tolerance, "{back:?} != {point:?}");
    }

    /// Property: picking rays are unit length
    #[test]
    fn screen_ray_direction_is_normalized(
        camera in camera(),
        x in 0.0f32..960.0,
        y in 0.0f32..540.0,
    ) {
        let viewport = Viewport::from_size(960, 540);
        let ray = camera.screen_ray(Vec2::new(x, y), &viewport).unwrap();
        prop_assert!((ray.direction.length() - 1.0).abs() < 1e-4);
    }

    /// Property: a box under the cursor is picked
    #[test]
    fn box_under_cursor_is_picked(
        camera in camera(),
        depth in 3.0f32..20.0,
        x in 100.0f32..860.0,
        y in 100.0f32..440.0,
    ) {
        let viewport = Viewport::from_size(960, 540);
        let probe = camera.screen_ray(Vec2::new(x, y), &viewport).unwrap();
        let center = probe.origin + probe.direction * depth;

        let mut world = World::new();
        let handle = world.add_object(Obb::cube(0.5, Mat4::from_translation(center)));

        let screen = camera.world_to_screen(center, &viewport).unwrap();
        let ray = camera.screen_ray(Vec2::new(screen.x, screen.y), &viewport).unwrap();
        prop_assert_eq!(world.ray_test(&ray), Some(handle));
    }
}
