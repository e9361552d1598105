#![warn(missing_docs)]
//! Picking primitives: rays, oriented bounding boxes and the world that owns them.
//!
//! The world answers one query, [`World::ray_test`], which returns the box whose
//! entry point is nearest to the ray origin. Boxes are identified by
//! generation-checked [`ObbHandle`]s so callers can keep side tables (for
//! example "box -> scene object") without holding references into the world.

mod obb;
mod ray;
mod world;

pub use obb::{Obb, PARALLEL_EPSILON};
pub use ray::Ray;
pub use world::{ObbHandle, RayHit, World};
