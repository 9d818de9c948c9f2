//! Locomotion: per-frame XR input mapped to player rig motion.
//!
//! Each frame runs sample → resolve → apply, synchronously, inside the render
//! callback. The only state that survives between frames is the rig itself and
//! the gesture tracker's pinch lock.
//!
//! # Invariants
//! - At most one locomotion mode applies per frame; stick input always wins.
//! - Missing session data, axes or joints mean no motion, never an error.
//! - Frame time is clamped to `NavConfig::max_dt` before integrating.

pub mod config;
pub mod gesture;
pub mod motion;
pub mod resolver;
pub mod rig;

pub use config::{ConfigError, NavConfig, PinchMode, TurnReference};
pub use gesture::GestureTracker;
pub use motion::{Motion, MotionMode};
pub use resolver::resolve;
pub use rig::PlayerRig;

use xrview_input::{HandPair, XrFrame};

pub fn crate_info() -> &'static str {
    concat!("xrview-locomotion v", env!("CARGO_PKG_VERSION"))
}

/// Owns the rig, the per-frame hand pair, and the gesture tracker.
#[derive(Debug, Clone)]
pub struct Locomotion {
    config: NavConfig,
    pub rig: PlayerRig,
    hands: HandPair,
    tracker: GestureTracker,
    last: Motion,
}

impl Locomotion {
    pub fn new(config: NavConfig) -> Self {
        Self {
            config,
            rig: PlayerRig::default(),
            hands: HandPair::default(),
            tracker: GestureTracker::new(),
            last: Motion::idle(),
        }
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    /// Switch pinch behavior mid-session. Drops any held pinch lock.
    pub fn set_pinch_mode(&mut self, mode: PinchMode) {
        if self.config.pinch_mode != mode {
            tracing::info!(?mode, "pinch mode changed");
            self.config.pinch_mode = mode;
            self.tracker.reset();
        }
    }

    /// Run one frame: sample hands, resolve motion, apply it to the rig.
    pub fn step(&mut self, frame: &XrFrame, dt: f32) -> Motion {
        self.hands.refill(frame, &self.config.sampler());
        let motion = resolve(
            &self.hands,
            frame.head.as_ref(),
            dt,
            &self.config,
            &mut self.tracker,
        );

        if motion.mode.name() != self.last.mode.name() {
            tracing::debug!(
                from = self.last.mode.name(),
                to = motion.mode.name(),
                "locomotion mode changed"
            );
        }
        tracing::trace!(
            mode = motion.mode.name(),
            dx = motion.translation.x,
            dz = motion.translation.z,
            yaw = motion.yaw,
            "locomotion step"
        );

        self.rig.apply(&motion);
        self.last = motion;
        motion
    }

    pub fn hands(&self) -> &HandPair {
        &self.hands
    }

    pub fn last_motion(&self) -> &Motion {
        &self.last
    }

    pub fn tracker(&self) -> &GestureTracker {
        &self.tracker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};
    use xrview_common::{Handedness, Pose};
    use xrview_input::{Gamepad, HandJoints, InputSource};

    fn head() -> Option<Pose> {
        Some(Pose::new(Vec3::new(0.0, 1.6, 0.0), Quat::IDENTITY))
    }

    fn stick(side: Handedness, x: f32, y: f32) -> InputSource {
        InputSource {
            handedness: Some(side),
            target_ray: Some(Pose::new(Vec3::new(0.0, 1.2, -0.3), Quat::IDENTITY)),
            gamepad: Some(Gamepad { axes: vec![x, y] }),
            ..Default::default()
        }
    }

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("locomotion"));
    }

    #[test]
    fn stick_forward_scenario() {
        let mut loco = Locomotion::new(NavConfig {
            move_speed: 2.0,
            max_dt: 0.1,
            ..Default::default()
        });
        let frame = XrFrame {
            head: head(),
            sources: vec![stick(Handedness::Left, 0.0, -1.0)],
        };
        loco.step(&frame, 0.1);
        assert!((loco.rig.position - Vec3::new(0.0, 0.0, -0.2)).length() < 1e-6);
    }

    #[test]
    fn zero_input_is_idempotent() {
        let mut loco = Locomotion::new(NavConfig::default());
        let frame = XrFrame {
            head: head(),
            sources: vec![stick(Handedness::Left, 0.05, -0.1), stick(Handedness::Right, 0.0, 0.0)],
        };
        let before = loco.rig;
        loco.step(&frame, 0.016);
        loco.step(&frame, 0.016);
        assert_eq!(loco.rig, before);
        assert_eq!(loco.last_motion().mode, MotionMode::Idle);
    }

    #[test]
    fn no_session_data_is_no_motion() {
        let mut loco = Locomotion::new(NavConfig::default());
        let m = loco.step(&XrFrame::default(), 0.016);
        assert_eq!(m, Motion::idle());
        assert!(loco.hands().left.is_none());
    }

    #[test]
    fn motion_follows_rig_yaw() {
        let mut loco = Locomotion::new(NavConfig {
            max_dt: 1.0,
            ..Default::default()
        });
        loco.rig.yaw = std::f32::consts::PI;
        let frame = XrFrame {
            head: head(),
            sources: vec![stick(Handedness::Left, 0.0, -1.0)],
        };
        loco.step(&frame, 0.5);
        // Turned around: forward in tracking space is +Z in the world.
        assert!(loco.rig.position.z > 0.99);
    }

    #[test]
    fn gesture_session_pull_and_release() {
        let mut loco = Locomotion::new(NavConfig::default());
        loco.set_pinch_mode(PinchMode::Gesture);

        let tracked = |index_z: f32, gap: f32| XrFrame {
            head: head(),
            sources: vec![InputSource {
                handedness: Some(Handedness::Right),
                hand: Some(HandJoints {
                    wrist: Vec3::new(0.2, 1.1, index_z + 0.1),
                    thumb_tip: Vec3::new(0.2, 1.2, index_z),
                    index_tip: Vec3::new(0.2 + gap, 1.2, index_z),
                }),
                ..Default::default()
            }],
        };

        loco.step(&tracked(-0.5, 0.005), 0.016);
        assert_eq!(loco.tracker().lock(), Some(Handedness::Right));

        let m = loco.step(&tracked(-0.4, 0.005), 0.016);
        assert_eq!(m.mode, MotionMode::Gesture(Handedness::Right));
        assert!(m.translation.z < 0.0);

        loco.step(&tracked(-0.4, 0.08), 0.016);
        assert_eq!(loco.tracker().lock(), None);
        assert_eq!(loco.last_motion().mode, MotionMode::Idle);
    }
}
