//! Scene objects and the drawables that reference them.

use glam::Mat4;
use slotmap::{new_key_type, SlotMap};
use tracing::debug;

use crate::{CubeStyle, DrawBatch, Drawable, InstanceData};

new_key_type! {
    /// Identity of an object owned by a [`Scene`].
    pub struct SceneObjectId;
}

/// Transform and visibility of one drawn thing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneObject {
    /// Local-to-world transform.
    pub transform: Mat4,
    /// Hidden objects are skipped when building draw batches.
    pub visible: bool,
}

impl Default for SceneObject {
    fn default() -> Self {
        Self {
            transform: Mat4::IDENTITY,
            visible: true,
        }
    }
}

/// All drawable state of the demo.
#[derive(Debug, Default)]
pub struct Scene {
    objects: SlotMap<SceneObjectId, SceneObject>,
    drawables: Vec<Drawable>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single drawable and return the object that controls it.
    pub fn add_single(&mut self, style: CubeStyle) -> SceneObjectId {
        let object = self.objects.insert(SceneObject::default());
        self.drawables.push(Drawable::Single { style, object });
        object
    }

    /// Add an instanced group of `count` objects sharing one mesh.
    pub fn add_instanced_group(&mut self, style: CubeStyle, count: usize) -> Vec<SceneObjectId> {
        let instances: Vec<_> = (0..count)
            .map(|_| self.objects.insert(SceneObject::default()))
            .collect();
        debug!(count, ?style, "instanced group added");
        self.drawables.push(Drawable::InstancedGroup {
            style,
            instances: instances.clone(),
        });
        instances
    }

    /// Look up an object.
    pub fn object(&self, id: SceneObjectId) -> Option<&SceneObject> {
        self.objects.get(id)
    }

    /// Set an object's transform. Returns `false` for unknown ids.
    pub fn set_transform(&mut self, id: SceneObjectId, transform: Mat4) -> bool {
        match self.objects.get_mut(id) {
            Some(object) => {
                object.transform = transform;
                true
            }
            None => false,
        }
    }

    /// Show or hide an object. Returns `false` for unknown ids.
    pub fn set_visible(&mut self, id: SceneObjectId, visible: bool) -> bool {
        match self.objects.get_mut(id) {
            Some(object) => {
                object.visible = visible;
                true
            }
            None => false,
        }
    }

    /// Number of objects.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Drawables in creation order.
    pub fn drawables(&self) -> &[Drawable] {
        &self.drawables
    }

    /// Per-drawable batches of visible instances, in creation order.
    ///
    /// Drawables with no visible instance produce no batch.
    pub fn draw_batches(&self) -> Vec<DrawBatch> {
        self.drawables
            .iter()
            .filter_map(|drawable| {
                let style = drawable.style();
                let instances: Vec<_> = drawable
                    .objects()
                    .iter()
                    .filter_map(|id| self.objects.get(*id))
                    .filter(|object| object.visible)
                    .map(|object| InstanceData::new(object.transform, style))
                    .collect();
                (!instances.is_empty()).then_some(DrawBatch { style, instances })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn single_and_group_produce_batches_in_order() {
        let mut scene = Scene::new();
        let grid = scene.add_instanced_group(CubeStyle::FaceColored, 4);
        let marker = scene.add_single(CubeStyle::Solid(Vec3::X));

        assert_eq!(scene.object_count(), 5);
        let batches = scene.draw_batches();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].instances.len(), 4);
        assert_eq!(batches[1].style, CubeStyle::Solid(Vec3::X));

        scene.set_visible(grid[1], false);
        scene.set_visible(marker, false);
        let batches = scene.draw_batches();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].instances.len(), 3);
    }

    #[test]
    fn transforms_flow_into_instance_data() {
        let mut scene = Scene::new();
        let id = scene.add_single(CubeStyle::FaceColored);
        let transform = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert!(scene.set_transform(id, transform));

        let batches = scene.draw_batches();
        assert_eq!(batches[0].instances[0].model, transform.to_cols_array_2d());
    }

    #[test]
    fn drawables_expose_their_objects() {
        let mut scene = Scene::new();
        let group = scene.add_instanced_group(CubeStyle::FaceColored, 2);
        let single = scene.add_single(CubeStyle::FaceColored);

        assert_eq!(scene.drawables()[0].objects(), group.as_slice());
        assert_eq!(scene.drawables()[1].objects(), &[single]);
    }
}
