#![warn(missing_docs)]
//! Scene-side bookkeeping for the picking demo.
//!
//! The scene owns transforms and visibility for everything that gets drawn.
//! Rendering itself lives elsewhere: [`Scene::draw_batches`] hands a renderer
//! GPU-ready instance data grouped by mesh. [`Picker`] ties physics boxes to
//! scene objects and [`Selection`] drives the highlight cube.

mod drawable;
mod picker;
mod scene;
mod selection;

pub use drawable::{CubeStyle, DrawBatch, Drawable, InstanceData};
pub use picker::{Pick, Picker};
pub use scene::{Scene, SceneObject, SceneObjectId};
pub use selection::{Selection, SELECTION_SCALE};
