//! wgpu backend for the viewer.
//!
//! Draws a grid floor, the scene's boxes, and debug markers (rig, hands).
//! Two view sources feed it: the desktop [`OrbitCamera`] and, in XR mode,
//! the rig's head pose through the same [`Lens`].
//!
//! # Invariants
//! - The renderer never mutates the scene.
//! - Locomotion runs per frame ahead of rendering; the renderer only reads
//!   the resulting view.

mod camera;
mod gpu;
mod shaders;

pub use camera::{Lens, OrbitCamera, screen_ray};
pub use gpu::{Marker, WgpuRenderer};
