//! The picking demo: a cube grid, three spinning cubes and a highlight.

use crate::config::DemoConfig;
use crate::input::{FrameInput, MouseButton};
use cubepick_camera::{Camera, UnprojectError, Viewport};
use cubepick_physics::{Obb, ObbHandle, World};
use cubepick_scene::{CubeStyle, Pick, Picker, Scene, SceneObjectId, Selection};
use glam::{Mat4, Vec2, Vec3};
use std::collections::HashMap;
use tracing::{debug, info, warn};

const SELECTION_COLOR: Vec3 = Vec3::new(1.0, 0.0, 0.0);

/// One of the coloured cubes spinning about a fixed axis.
struct Rotatable {
    object: SceneObjectId,
    obb: Option<ObbHandle>,
    base: Mat4,
    axis: Vec3,
}

/// What happened to the pick attempt in a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickOutcome {
    /// Left button not held; no ray was cast.
    Idle,
    /// The ray hit a bound object.
    Picked(Pick),
    /// The ray hit nothing; the previous selection stays.
    Missed,
    /// No ray could be built this frame.
    Skipped(UnprojectError),
}

pub struct PickingDemo {
    config: DemoConfig,
    camera: Camera,
    viewport: Viewport,
    scene: Scene,
    world: World,
    picker: Picker,
    selection: Selection,
    rotatables: Vec<Rotatable>,
    labels: HashMap<SceneObjectId, String>,
    rotation: f32,
    frame: u64,
}

impl PickingDemo {
    pub fn new(config: DemoConfig) -> Self {
        let camera = config.camera.build(config.width, config.height);
        let viewport = Viewport::from_size(config.width, config.height);

        let mut scene = Scene::new();
        let mut world = World::new();
        let mut picker = Picker::new();
        let mut labels = HashMap::new();

        let n = config.grid_size as usize;
        let half = (config.grid_size / 2) as f32;
        let grid = scene.add_instanced_group(CubeStyle::FaceColored, n * n);
        for x in 0..n {
            for z in 0..n {
                let id = grid[x * n + z];
                let pos = Vec3::new(x as f32 - half, 0.0, z as f32 - half) - Vec3::splat(0.5);
                let transform = Mat4::from_translation(pos);
                scene.set_transform(id, transform);

                let obb = world.add_object(Obb::cube(1.0, transform));
                picker.bind(obb, id);
                labels.insert(id, format!("grid[{x},{z}]"));
            }
        }

        let marker = scene.add_single(CubeStyle::Solid(SELECTION_COLOR));
        let selection = Selection::with_scale(&mut scene, marker, config.selection_scale);

        let spinners = [
            ("yellow", Vec3::new(1.0, 1.0, 0.0), Vec3::new(-2.0, 2.0, 0.0), Vec3::X),
            ("green", Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 2.0, 0.0), Vec3::Y),
            ("blue", Vec3::new(0.0, 0.0, 1.0), Vec3::new(2.0, 2.0, 0.0), Vec3::Z),
        ];
        let mut rotatables = Vec::with_capacity(spinners.len());
        for (name, color, position, axis) in spinners {
            let object = scene.add_single(CubeStyle::Solid(color));
            let base = Mat4::from_translation(position);
            scene.set_transform(object, base);

            let obb = config.pick_rotating_cubes.then(|| {
                let handle = world.add_object(Obb::cube(1.0, base));
                picker.bind(handle, object);
                handle
            });
            labels.insert(object, name.to_string());
            rotatables.push(Rotatable {
                object,
                obb,
                base,
                axis,
            });
        }

        info!(
            objects = scene.object_count(),
            obbs = world.len(),
            grid = n,
            "demo scene built"
        );

        Self {
            config,
            camera,
            viewport,
            scene,
            world,
            picker,
            selection,
            rotatables,
            labels,
            rotation: 0.0,
            frame: 0,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            debug!(width, height, "ignoring zero-sized resize");
            return;
        }
        self.viewport = Viewport::from_size(width, height);
        self.camera.resize(width, height);
        debug!(width, height, "viewport resized");
    }

    /// Cast a ray under the cursor while the left button is held.
    pub fn process_input(&mut self, input: &FrameInput) -> PickOutcome {
        if !input.is_down(MouseButton::Left) {
            return PickOutcome::Idle;
        }
        self.pick_at(input.mouse_pos)
    }

    /// Pick whatever lies under `mouse` and select it.
    pub fn pick_at(&mut self, mouse: Vec2) -> PickOutcome {
        let ray = match self.camera.screen_ray(mouse, &self.viewport) {
            Ok(ray) => ray,
            Err(err) => {
                warn!(%err, frame = self.frame, "skipping pick");
                return PickOutcome::Skipped(err);
            }
        };

        match self.picker.pick(&self.world, &ray) {
            Some(pick) => {
                self.selection.select(&mut self.scene, pick.object);
                debug!(
                    object = self.label(pick.object),
                    distance = pick.distance,
                    "picked"
                );
                PickOutcome::Picked(pick)
            }
            None => PickOutcome::Missed,
        }
    }

    /// Advance one frame: spin the coloured cubes and keep their boxes and
    /// the highlight in sync.
    pub fn update(&mut self) {
        self.frame += 1;
        self.rotation += self.config.rotation_speed;
        for spinner in &self.rotatables {
            let transform = spinner.base * Mat4::from_axis_angle(spinner.axis, self.rotation);
            self.scene.set_transform(spinner.object, transform);
            if let Some(obb) = spinner.obb {
                self.world.set_transform(obb, transform);
            }
        }
        self.selection.refresh(&mut self.scene);
    }

    pub fn label(&self, object: SceneObjectId) -> &str {
        self.labels.get(&object).map(String::as_str).unwrap_or("?")
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn selected(&self) -> Option<SceneObjectId> {
        self.selection.selected()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo() -> PickingDemo {
        PickingDemo::new(DemoConfig::default())
    }

    fn run_frame(demo: &mut PickingDemo, input: &FrameInput) -> PickOutcome {
        if let Some((width, height)) = input.resized {
            demo.resize(width, height);
        }
        let outcome = demo.process_input(input);
        demo.update();
        outcome
    }

    /// Grid cubes in `x * n + z` order.
    fn grid(demo: &PickingDemo) -> Vec<SceneObjectId> {
        demo.scene.drawables()[0].objects().to_vec()
    }

    fn spinner(demo: &PickingDemo, name: &str) -> SceneObjectId {
        demo.rotatables
            .iter()
            .map(|spinner| spinner.object)
            .find(|object| demo.label(*object) == name)
            .unwrap()
    }

    /// Mouse position over the world-space `point`.
    fn mouse_over(demo: &PickingDemo, point: Vec3) -> Vec2 {
        let screen = demo.camera.world_to_screen(point, &demo.viewport).unwrap();
        Vec2::new(screen.x, screen.y)
    }

    fn center_of(demo: &PickingDemo, object: SceneObjectId) -> Vec3 {
        demo.scene
            .object(object)
            .unwrap()
            .transform
            .w_axis
            .truncate()
    }

    #[test]
    fn scene_has_grid_marker_and_spinners() {
        let demo = demo();
        assert_eq!(grid(&demo).len(), 121);
        assert_eq!(demo.scene.object_count(), 121 + 1 + 3);
        assert_eq!(demo.world().len(), 121 + 3);
        assert!(!demo.scene.object(demo.selection.marker()).unwrap().visible);
    }

    #[test]
    fn grid_cube_positions_match_layout() {
        let demo = demo();
        // x = 0, z = 0 is the far-left corner at (-5, 0, -5) - 0.5.
        let corner = center_of(&demo, grid(&demo)[0]);
        assert_eq!(corner, Vec3::new(-5.5, -0.5, -5.5));
        let last = center_of(&demo, grid(&demo)[120]);
        assert_eq!(last, Vec3::new(4.5, -0.5, 4.5));
    }

    #[test]
    fn idle_frames_cast_no_ray() {
        let mut demo = demo();
        let outcome = run_frame(&mut demo, &FrameInput::hover(Vec2::new(480.0, 270.0)));
        assert_eq!(outcome, PickOutcome::Idle);
        assert!(demo.selected().is_none());
    }

    #[test]
    fn clicking_a_grid_cube_selects_it() {
        let mut demo = demo();
        let target = grid(&demo)[5 * 11 + 8];
        // Aim at the top face so no neighbour can occlude it.
        let top = center_of(&demo, target) + Vec3::new(0.0, 0.5, 0.0);
        let mouse = mouse_over(&demo, top);

        let outcome = run_frame(&mut demo, &FrameInput::left_click(mouse));
        let PickOutcome::Picked(pick) = outcome else {
            panic!("expected a pick, got {outcome:?}");
        };
        assert_eq!(pick.object, target);
        assert_eq!(demo.selected(), Some(target));
        assert_eq!(demo.label(target), "grid[5,8]");

        let marker = demo.scene.object(demo.selection.marker()).unwrap();
        assert!(marker.visible);
        assert_eq!(marker.transform.w_axis.truncate(), center_of(&demo, target));
    }

    #[test]
    fn missing_keeps_previous_selection() {
        let mut demo = demo();
        let target = grid(&demo)[60];
        let top = center_of(&demo, target) + Vec3::new(0.0, 0.5, 0.0);
        let mouse = mouse_over(&demo, top);
        run_frame(&mut demo, &FrameInput::left_click(mouse));
        assert_eq!(demo.selected(), Some(target));

        // Straight up into the sky.
        let sky = mouse_over(&demo, Vec3::new(0.0, 40.0, -40.0));
        assert_eq!(run_frame(&mut demo, &FrameInput::left_click(sky)), PickOutcome::Missed);
        assert_eq!(demo.selected(), Some(target));
    }

    #[test]
    fn spinning_cube_can_be_picked_and_followed() {
        let mut demo = demo();
        let green = spinner(&demo, "green");
        let mouse = mouse_over(&demo, center_of(&demo, green));

        let PickOutcome::Picked(pick) = run_frame(&mut demo, &FrameInput::left_click(mouse)) else {
            panic!("green cube should be pickable");
        };
        assert_eq!(pick.object, green);

        for _ in 0..10 {
            run_frame(&mut demo, &FrameInput::hover(mouse));
        }
        let cube = demo.scene.object(green).unwrap().transform;
        let marker = demo.scene.object(demo.selection.marker()).unwrap().transform;
        let expected = cube * Mat4::from_scale(Vec3::splat(cubepick_scene::SELECTION_SCALE));
        assert!(marker.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn spinners_can_be_excluded_from_picking() {
        let config = DemoConfig {
            pick_rotating_cubes: false,
            ..Default::default()
        };
        let mut demo = PickingDemo::new(config);
        assert_eq!(demo.world().len(), 121);

        let green = spinner(&demo, "green");
        let mouse = mouse_over(&demo, center_of(&demo, green));
        if let PickOutcome::Picked(pick) = run_frame(&mut demo, &FrameInput::left_click(mouse)) {
            assert_ne!(pick.object, green);
        }
    }

    #[test]
    fn rotation_advances_each_frame() {
        let mut demo = demo();
        let blue = spinner(&demo, "blue");
        let before = demo.scene.object(blue).unwrap().transform;
        run_frame(&mut demo, &FrameInput::default());
        let after = demo.scene.object(blue).unwrap().transform;
        assert!(!before.abs_diff_eq(after, 1e-6));
        // Rotation keeps the cube in place.
        assert_eq!(after.w_axis.truncate(), Vec3::new(2.0, 2.0, 0.0));
        assert_eq!(demo.frame_count(), 1);
    }

    #[test]
    fn resize_rebuilds_projection() {
        let mut demo = demo();
        run_frame(&mut demo, &FrameInput {
            resized: Some((400, 400)),
            ..Default::default()
        });
        assert_eq!(demo.camera.aspect, 1.0);
        assert_eq!(demo.camera.aspect, demo.viewport.aspect());
        assert_eq!(demo.viewport.width, 400.0);

        demo.resize(0, 10);
        assert_eq!(demo.viewport.width, 400.0);
    }
}
