//! Drawable variants and the per-instance data handed to a renderer.

use glam::{Mat4, Vec3};

use crate::SceneObjectId;

/// How a cube mesh is colored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CubeStyle {
    /// A distinct color per face.
    FaceColored,
    /// One color on every face.
    Solid(Vec3),
}

impl CubeStyle {
    /// Per-instance tint; the alpha channel flags a solid color.
    pub fn tint(&self) -> [f32; 4] {
        match self {
            CubeStyle::FaceColored => [1.0, 1.0, 1.0, 0.0],
            CubeStyle::Solid(color) => [color.x, color.y, color.z, 1.0],
        }
    }
}

/// Something the renderer draws.
#[derive(Debug, Clone, PartialEq)]
pub enum Drawable {
    /// One mesh drawn with one scene object's transform.
    Single {
        /// Mesh style.
        style: CubeStyle,
        /// Object supplying transform and visibility.
        object: SceneObjectId,
    },
    /// One mesh drawn once per instance, each with its own transform.
    InstancedGroup {
        /// Mesh style shared by all instances.
        style: CubeStyle,
        /// Objects supplying per-instance transform and visibility.
        instances: Vec<SceneObjectId>,
    },
}

impl Drawable {
    /// Mesh style of this drawable.
    pub fn style(&self) -> CubeStyle {
        match self {
            Drawable::Single { style, .. } | Drawable::InstancedGroup { style, .. } => *style,
        }
    }

    /// Scene objects this drawable reads.
    pub fn objects(&self) -> &[SceneObjectId] {
        match self {
            Drawable::Single { object, .. } => std::slice::from_ref(object),
            Drawable::InstancedGroup { instances, .. } => instances,
        }
    }
}

/// Instance data uploaded to the GPU.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceData {
    /// Model matrix, column major.
    pub model: [[f32; 4]; 4],
    /// Instance tint (see [`CubeStyle::tint`]).
    pub tint: [f32; 4],
}

impl InstanceData {
    /// Build instance data for a transform and style.
    pub fn new(transform: Mat4, style: CubeStyle) -> Self {
        Self {
            model: transform.to_cols_array_2d(),
            tint: style.tint(),
        }
    }
}

/// Visible instances of one drawable, ready for a single draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawBatch {
    /// Mesh to bind.
    pub style: CubeStyle,
    /// One entry per visible instance.
    pub instances: Vec<InstanceData>,
}

impl DrawBatch {
    /// Raw bytes of the instance buffer.
    pub fn instance_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }
}
