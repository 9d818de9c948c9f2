use glam::{Mat4, Quat, Vec3};
use std::f32::consts::{PI, TAU};
use xrview_common::Pose;

use crate::motion::Motion;

/// The movable player: a dolly position plus a yaw pivot carrying the camera.
///
/// Tracked head and hand poses are local to the pivot, so the camera only
/// ever follows the rig.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerRig {
    pub position: Vec3,
    /// Pivot rotation about +Y, radians, kept in `(-PI, PI]`.
    pub yaw: f32,
}

impl PlayerRig {
    pub fn new(position: Vec3) -> Self {
        Self { position, yaw: 0.0 }
    }

    pub fn orientation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    /// The rig as a pose in world space.
    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.orientation())
    }

    /// Apply a rig-local motion: translation is rotated by the current yaw,
    /// then the yaw delta is added.
    pub fn apply(&mut self, motion: &Motion) {
        self.position += self.orientation() * motion.translation;
        if motion.yaw != 0.0 {
            self.yaw = wrap_angle(self.yaw + motion.yaw);
        }
    }

    /// World pose of a head pose given in tracking space.
    pub fn head_world(&self, head_local: &Pose) -> Pose {
        self.pose().compose(head_local)
    }

    pub fn view_matrix(&self, head_local: &Pose) -> Mat4 {
        self.head_world(head_local).matrix().inverse()
    }
}

fn wrap_angle(a: f32) -> f32 {
    let wrapped = (a + PI).rem_euclid(TAU) - PI;
    if wrapped == -PI { PI } else { wrapped }
}
