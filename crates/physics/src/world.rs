//! Collection of pickable boxes and the nearest-hit query.

use slotmap::{new_key_type, SlotMap};
use tracing::trace;

use crate::{Obb, Ray};

new_key_type! {
    /// Stable identity of a box owned by a [`World`].
    ///
    /// Handles are generation-checked: once a box is removed its handle never
    /// resolves again, even if the slot is reused.
    pub struct ObbHandle;
}

/// Result of a successful [`World::ray_test_hit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Box that was hit.
    pub handle: ObbHandle,
    /// Distance along the ray to the entry point.
    pub distance: f32,
}

/// Owns the pickable boxes and answers ray queries by linear scan.
///
/// Iteration order is insertion order, which makes tie-breaking between boxes
/// with equal entry distance deterministic: the earlier box wins.
#[derive(Debug, Default, Clone)]
pub struct World {
    objects: SlotMap<ObbHandle, Obb>,
    order: Vec<ObbHandle>,
}

impl World {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `obb` and return its handle.
    pub fn add_object(&mut self, obb: Obb) -> ObbHandle {
        let handle = self.objects.insert(obb);
        self.order.push(handle);
        trace!(?handle, count = self.order.len(), "obb added");
        handle
    }

    /// Remove a box, returning it if the handle was still live.
    pub fn remove_object(&mut self, handle: ObbHandle) -> Option<Obb> {
        let obb = self.objects.remove(handle)?;
        self.order.retain(|&h| h != handle);
        trace!(?handle, count = self.order.len(), "obb removed");
        Some(obb)
    }

    /// Look up a box.
    pub fn get(&self, handle: ObbHandle) -> Option<&Obb> {
        self.objects.get(handle)
    }

    /// Look up a box for mutation.
    pub fn get_mut(&mut self, handle: ObbHandle) -> Option<&mut Obb> {
        self.objects.get_mut(handle)
    }

    /// Replace the transform of a live box. Returns `false` for stale handles.
    pub fn set_transform(&mut self, handle: ObbHandle, transform: glam::Mat4) -> bool {
        match self.objects.get_mut(handle) {
            Some(obb) => {
                obb.transform = transform;
                true
            }
            None => false,
        }
    }

    /// Whether `handle` refers to a live box.
    pub fn contains(&self, handle: ObbHandle) -> bool {
        self.objects.contains_key(handle)
    }

    /// Number of boxes.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the world holds no boxes.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate boxes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ObbHandle, &Obb)> + '_ {
        self.order
            .iter()
            .filter_map(move |&handle| self.objects.get(handle).map(|obb| (handle, obb)))
    }

    /// Remove every box.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.order.clear();
    }

    /// Box with the nearest entry point along `ray`, if any.
    pub fn ray_test(&self, ray: &Ray) -> Option<ObbHandle> {
        self.ray_test_hit(ray).map(|hit| hit.handle)
    }

    /// Like [`World::ray_test`] but also reports the entry distance.
    pub fn ray_test_hit(&self, ray: &Ray) -> Option<RayHit> {
        let mut nearest: Option<RayHit> = None;
        let mut min_distance = f32::INFINITY;

        for (handle, obb) in self.iter() {
            let Some(distance) = obb.intersect_ray(ray) else {
                continue;
            };
            // Strict comparison keeps the first box on ties.
            if distance < min_distance {
                min_distance = distance;
                nearest = Some(RayHit { handle, distance });
            }
        }

        nearest
    }
}
