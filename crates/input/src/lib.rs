//! XR input sampling: per-frame input snapshots normalized into a left/right hand pair.
//!
//! # Invariants
//! - Both hand slots are cleared and repopulated every frame; nothing carries over.
//! - Sampling never fails. Missing or malformed sources read as no input.
//! - Desktop emulation produces the same [`XrFrame`] a headset runtime would.

pub mod emulator;
pub mod frame;
pub mod sampler;
pub mod script;

pub use emulator::{EmulatorButtons, HeadsetEmulator};
pub use frame::{Gamepad, HandJoints, InputSource, XrFrame};
pub use sampler::{HandPair, HandState, SamplerConfig, apply_deadzone, sample_hands};
pub use script::{FrameScript, ScriptError, ScriptFrame};

pub fn crate_info() -> &'static str {
    concat!("xrview-input v", env!("CARGO_PKG_VERSION"))
}
