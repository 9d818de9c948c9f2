//! Scene graph for the viewer: box objects, lighting, and ray picking.
//!
//! # Invariants
//! - Renderers and locomotion read the scene; only the app edits it.
//! - Iteration order is stable (BTreeMap) so instance order does not flicker.

mod pick;
mod scene;

pub use pick::PickHit;
pub use scene::{DirectionalLight, Scene, SceneObject};
