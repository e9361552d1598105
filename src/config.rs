use anyhow::{Context, Result};
use cubepick_camera::Camera;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;

const DEFAULT_CONFIG_PATH: &str = "config/demo.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
    pub camera: CameraConfig,
    /// Cubes per side of the ground grid.
    pub grid_size: u32,
    /// Radians added to the rotating cubes' angle every frame.
    pub rotation_speed: f32,
    /// Highlight scale relative to the selected cube.
    pub selection_scale: f32,
    /// Register the rotating cubes with the picking world.
    pub pick_rotating_cubes: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: [f32; 3],
    pub target: [f32; 3],
    /// Vertical field of view in radians.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            width: 960,
            height: 540,
            camera: CameraConfig::default(),
            grid_size: 11,
            rotation_speed: 0.01,
            selection_scale: cubepick_scene::SELECTION_SCALE,
            pick_rotating_cubes: true,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        let camera = Camera::default();
        Self {
            eye: camera.eye.to_array(),
            target: camera.target.to_array(),
            fov: camera.fov,
            near: camera.near,
            far: camera.far,
        }
    }
}

impl CameraConfig {
    /// Build a camera for a `width x height` viewport.
    pub fn build(&self, width: u32, height: u32) -> Camera {
        let mut camera = Camera::look_at(Vec3::from_array(self.eye), Vec3::from_array(self.target));
        camera.fov = self.fov;
        camera.near = self.near;
        camera.far = self.far;
        camera.resize(width, height);
        camera
    }
}

impl DemoConfig {
    /// Load the demo configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<DemoConfig>(&contents) {
                Ok(cfg) => cfg.sanitized(),
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    DemoConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_CONFIG_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                DemoConfig::default()
            }
        }
    }

    /// Save the configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    /// Clamp values that would make the camera or grid unusable.
    fn sanitized(mut self) -> Self {
        if self.width == 0 || self.height == 0 {
            warn!(
                width = self.width,
                height = self.height,
                "viewport size must be non-zero; using defaults"
            );
            let defaults = DemoConfig::default();
            self.width = defaults.width;
            self.height = defaults.height;
        }
        if !(self.camera.near > 0.0 && self.camera.far > self.camera.near) {
            warn!(
                near = self.camera.near,
                far = self.camera.far,
                "clip planes must satisfy 0 < near < far; using defaults"
            );
            let defaults = CameraConfig::default();
            self.camera.near = defaults.near;
            self.camera.far = defaults.far;
        }
        self.grid_size = self.grid_size.min(64);
        self
    }
}
