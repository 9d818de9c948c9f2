//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers never mutate the scene or the player rig.
//! - Render state derives from the scene plus a view.
//!
//! The GPU backend lives in `xrview-render-wgpu`; the text renderer here backs
//! the CLI and tests.

mod renderer;

pub use renderer::{DebugTextRenderer, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    concat!("xrview-render v", env!("CARGO_PKG_VERSION"))
}
