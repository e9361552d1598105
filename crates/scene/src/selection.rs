//! Highlight cube that follows the picked object.

use glam::{Mat4, Vec3};
use tracing::debug;

use crate::{Scene, SceneObjectId};

/// Uniform scale of the highlight relative to the selected object.
pub const SELECTION_SCALE: f32 = 1.05;

/// Tracks the selected object and keeps the highlight cube wrapped around it.
#[derive(Debug, Clone)]
pub struct Selection {
    marker: SceneObjectId,
    scale: f32,
    selected: Option<SceneObjectId>,
}

impl Selection {
    /// Use `marker` as the highlight object. It starts hidden.
    pub fn new(scene: &mut Scene, marker: SceneObjectId) -> Self {
        Self::with_scale(scene, marker, SELECTION_SCALE)
    }

    /// Like [`Selection::new`] with a custom highlight scale.
    pub fn with_scale(scene: &mut Scene, marker: SceneObjectId, scale: f32) -> Self {
        scene.set_visible(marker, false);
        Self {
            marker,
            scale,
            selected: None,
        }
    }

    /// The highlight object.
    pub fn marker(&self) -> SceneObjectId {
        self.marker
    }

    /// Currently selected object.
    pub fn selected(&self) -> Option<SceneObjectId> {
        self.selected
    }

    /// Select `object` and wrap the highlight around it.
    ///
    /// Returns `true` when the selection changed.
    pub fn select(&mut self, scene: &mut Scene, object: SceneObjectId) -> bool {
        let changed = self.selected != Some(object);
        self.selected = Some(object);
        self.refresh(scene);
        if changed {
            debug!(?object, "selection changed");
        }
        changed
    }

    /// Clear the selection and hide the highlight.
    pub fn clear(&mut self, scene: &mut Scene) {
        self.selected = None;
        scene.set_visible(self.marker, false);
    }

    /// Re-align the highlight with the selected object (call after it moves).
    pub fn refresh(&mut self, scene: &mut Scene) {
        let transform = self
            .selected
            .and_then(|id| scene.object(id))
            .map(|object| object.transform * Mat4::from_scale(Vec3::splat(self.scale)));

        match transform {
            Some(transform) => {
                scene.set_transform(self.marker, transform);
                scene.set_visible(self.marker, true);
            }
            None => {
                self.selected = None;
                scene.set_visible(self.marker, false);
            }
        }
    }
}
