//! Shared types for the xrview workspace: transforms, poses, rays, handedness.

mod types;

pub use types::{Handedness, ObjectId, Pose, Ray, Transform, flatten_direction};
