//! Binding between physics boxes and scene objects.

use std::collections::HashMap;

use cubepick_physics::{ObbHandle, Ray, World};
use tracing::debug;

use crate::SceneObjectId;

/// Result of a successful pick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pick {
    /// Box that was hit.
    pub obb: ObbHandle,
    /// Scene object bound to that box.
    pub object: SceneObjectId,
    /// Distance along the ray to the box.
    pub distance: f32,
}

/// Side table from box handles to the scene objects they stand for.
#[derive(Debug, Default, Clone)]
pub struct Picker {
    bindings: HashMap<ObbHandle, SceneObjectId>,
}

impl Picker {
    /// Create an empty binding table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a box to a scene object, replacing any previous binding.
    pub fn bind(&mut self, obb: ObbHandle, object: SceneObjectId) {
        self.bindings.insert(obb, object);
    }

    /// Drop the binding for a box (for example after removing it from the world).
    pub fn unbind(&mut self, obb: ObbHandle) -> Option<SceneObjectId> {
        self.bindings.remove(&obb)
    }

    /// Scene object bound to a box.
    pub fn object_for(&self, obb: ObbHandle) -> Option<SceneObjectId> {
        self.bindings.get(&obb).copied()
    }

    /// Number of bound boxes.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no box is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Cast `ray` into `world` and resolve the nearest box to its scene object.
    ///
    /// A hit on a box without a binding yields `None`.
    pub fn pick(&self, world: &World, ray: &Ray) -> Option<Pick> {
        let hit = world.ray_test_hit(ray)?;
        let Some(object) = self.object_for(hit.handle) else {
            debug!(obb = ?hit.handle, "hit box has no scene binding");
            return None;
        };
        Some(Pick {
            obb: hit.handle,
            object,
            distance: hit.distance,
        })
    }
}
