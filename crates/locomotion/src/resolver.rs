use glam::Vec3;
use xrview_common::{Pose, flatten_direction};
use xrview_input::{HandPair, HandState};

use crate::config::{NavConfig, PinchMode};
use crate::gesture::GestureTracker;
use crate::motion::{Motion, MotionMode};

/// Decide this frame's motion from the sampled hands and head pose.
///
/// Everything is in rig-local space. Priority, highest first:
/// 1. stick deflection beyond the deadzone (always wins),
/// 2. both hands pinching (step mode, when enabled): step backward,
/// 3. exactly one hand pinching (step mode): step along its ray,
/// 4. in gesture mode, the pinch-locked hand's gesture,
/// 5. nothing.
///
/// `dt` is clamped to `[0, max_dt]` here. Missing data never errors; it just
/// yields no motion.
pub fn resolve(
    hands: &HandPair,
    head: Option<&Pose>,
    dt: f32,
    config: &NavConfig,
    tracker: &mut GestureTracker,
) -> Motion {
    let dt = config.clamp_dt(dt);

    // The tracker sees every frame so pinch transitions are never missed.
    let gesture = match config.pinch_mode {
        PinchMode::Gesture => tracker.observe(hands, head, dt, config),
        PinchMode::Step => {
            tracker.reset();
            None
        }
    };

    if let Some(motion) = axis_drive(hands, head, dt, config) {
        return motion;
    }

    match config.pinch_mode {
        PinchMode::Step => pinch_step(hands, head, dt, config),
        PinchMode::Gesture => gesture.unwrap_or_default(),
    }
}

/// The hand with the larger filtered stick deflection, left on a tie.
fn driving_hand(hands: &HandPair) -> Option<&HandState> {
    hands
        .iter()
        .filter(|h| h.axis.length_squared() > 0.0)
        .fold(None, |best: Option<&HandState>, h| match best {
            Some(b) if b.axis.length_squared() >= h.axis.length_squared() => Some(b),
            _ => Some(h),
        })
}

fn axis_drive(
    hands: &HandPair,
    head: Option<&Pose>,
    dt: f32,
    config: &NavConfig,
) -> Option<Motion> {
    let hand = driving_hand(hands)?;
    let mode = MotionMode::AxisDrive(hand.handedness);

    let Some(forward) = head.and_then(|h| flatten_direction(h.forward())) else {
        return Some(Motion::translate(mode, Vec3::ZERO));
    };
    // Stick forward reports negative y.
    let mut translation = forward * (-hand.axis.y) * config.move_speed * dt;
    if config.strafe {
        if let Some(right) = head.and_then(|h| flatten_direction(h.right())) {
            translation += right * hand.axis.x * config.move_speed * dt;
        }
    }
    Some(Motion::translate(mode, translation))
}

fn pinch_step(hands: &HandPair, head: Option<&Pose>, dt: f32, config: &NavConfig) -> Motion {
    match hands.pinching_count() {
        2 if config.dual_pinch => {
            let Some(forward) = head.and_then(|h| flatten_direction(h.forward())) else {
                return Motion::idle();
            };
            let speed = config.step_speed * config.dual_pinch_multiplier;
            Motion::translate(MotionMode::DualPinchReverse, -forward * speed * dt)
        }
        1 => {
            let Some(hand) = hands.iter().find(|h| h.is_pinching) else {
                return Motion::idle();
            };
            let Some(direction) = hand.pointer.and_then(|p| flatten_direction(p.forward())) else {
                return Motion::idle();
            };
            Motion::translate(
                MotionMode::PinchStep(hand.handedness),
                direction * config.step_speed * dt,
            )
        }
        _ => Motion::idle(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec2};
    use xrview_common::Handedness;

    fn hand(side: Handedness, axis: Vec2, pinching: bool) -> HandState {
        HandState {
            handedness: side,
            axis,
            is_pinching: pinching,
            is_hand_tracking: false,
            source_index: 0,
            pointer: Some(Pose::new(Vec3::new(0.0, 1.2, -0.3), Quat::IDENTITY)),
            tip: Some(Vec3::new(0.0, 1.2, -0.3)),
        }
    }

    fn head() -> Pose {
        Pose::new(Vec3::new(0.0, 1.6, 0.0), Quat::IDENTITY)
    }

    fn run(hands: &HandPair, dt: f32, config: &NavConfig) -> Motion {
        resolve(hands, Some(&head()), dt, config, &mut GestureTracker::new())
    }

    #[test]
    fn axis_drive_matches_formula_exactly() {
        // Head forward (0,0,-1), left stick (0,-1), dt 0.1, move speed 2.0.
        let config = NavConfig {
            move_speed: 2.0,
            max_dt: 1.0,
            ..Default::default()
        };
        let hands = HandPair {
            left: Some(hand(Handedness::Left, Vec2::new(0.0, -1.0), false)),
            right: None,
        };
        let m = run(&hands, 0.1, &config);

        let forward = Vec3::new(0.0, 0.0, -1.0);
        let expected = forward * (-(-1.0_f32)) * config.move_speed * 0.1;
        assert_eq!(m.translation, expected);
        assert!((m.translation - Vec3::new(0.0, 0.0, -0.2)).length() < 1e-6);
        assert_eq!(m.mode, MotionMode::AxisDrive(Handedness::Left));
    }

    #[test]
    fn zero_axis_means_zero_translation() {
        let hands = HandPair {
            left: Some(hand(Handedness::Left, Vec2::ZERO, false)),
            right: Some(hand(Handedness::Right, Vec2::ZERO, false)),
        };
        let m = run(&hands, 0.05, &NavConfig::default());
        assert_eq!(m, Motion::idle());
    }

    #[test]
    fn axis_preempts_pinch() {
        let hands = HandPair {
            left: Some(hand(Handedness::Left, Vec2::new(0.0, 0.5), true)),
            right: Some(hand(Handedness::Right, Vec2::ZERO, true)),
        };
        let m = run(&hands, 0.02, &NavConfig::default());
        assert_eq!(m.mode, MotionMode::AxisDrive(Handedness::Left));
        // Stick pulled back moves backward (+Z).
        assert!(m.translation.z > 0.0);
    }

    #[test]
    fn no_strafe_by_default() {
        let hands = HandPair {
            left: None,
            right: Some(hand(Handedness::Right, Vec2::new(1.0, 0.0), false)),
        };
        let m = run(&hands, 0.02, &NavConfig::default());
        assert_eq!(m.mode, MotionMode::AxisDrive(Handedness::Right));
        assert_eq!(m.translation, Vec3::ZERO);

        let strafing = NavConfig {
            strafe: true,
            ..Default::default()
        };
        let m = run(&hands, 0.02, &strafing);
        assert!(m.translation.x > 0.0);
        assert_eq!(m.translation.z, 0.0);
    }

    #[test]
    fn larger_deflection_drives() {
        let hands = HandPair {
            left: Some(hand(Handedness::Left, Vec2::new(0.0, -0.3), false)),
            right: Some(hand(Handedness::Right, Vec2::new(0.0, 0.9), false)),
        };
        let m = run(&hands, 0.02, &NavConfig::default());
        assert_eq!(m.mode, MotionMode::AxisDrive(Handedness::Right));
    }

    #[test]
    fn dual_pinch_steps_backward_only() {
        let config = NavConfig::default();
        let hands = HandPair {
            left: Some(hand(Handedness::Left, Vec2::ZERO, true)),
            right: Some(hand(Handedness::Right, Vec2::ZERO, true)),
        };
        let m = run(&hands, 0.02, &config);
        assert_eq!(m.mode, MotionMode::DualPinchReverse);
        let expected = config.step_speed * config.dual_pinch_multiplier * 0.02;
        assert!((m.translation - Vec3::new(0.0, 0.0, expected)).length() < 1e-6);
        assert_eq!(m.yaw, 0.0);
    }

    #[test]
    fn dual_pinch_disabled_does_nothing() {
        let config = NavConfig {
            dual_pinch: false,
            ..Default::default()
        };
        let hands = HandPair {
            left: Some(hand(Handedness::Left, Vec2::ZERO, true)),
            right: Some(hand(Handedness::Right, Vec2::ZERO, true)),
        };
        assert_eq!(run(&hands, 0.02, &config), Motion::idle());
    }

    #[test]
    fn single_pinch_follows_hand_ray_flattened() {
        let config = NavConfig::default();
        let mut right = hand(Handedness::Right, Vec2::ZERO, true);
        // Ray pointing left and slightly down.
        let turn = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2) * Quat::from_rotation_x(-0.3);
        right.pointer = Some(Pose::new(Vec3::new(0.2, 1.2, -0.3), turn));
        let hands = HandPair {
            left: Some(hand(Handedness::Left, Vec2::ZERO, false)),
            right: Some(right),
        };
        let m = run(&hands, 0.02, &config);
        assert_eq!(m.mode, MotionMode::PinchStep(Handedness::Right));
        assert!((m.translation - Vec3::new(-config.step_speed * 0.02, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn dt_is_clamped() {
        let hands = HandPair {
            left: Some(hand(Handedness::Left, Vec2::new(0.0, -1.0), false)),
            right: None,
        };
        let config = NavConfig::default();
        let hitch = run(&hands, 2.0, &config);
        let capped = run(&hands, config.max_dt, &config);
        assert_eq!(hitch.translation, capped.translation);
    }

    #[test]
    fn missing_head_degrades_to_no_motion() {
        let hands = HandPair {
            left: Some(hand(Handedness::Left, Vec2::new(0.0, -1.0), false)),
            right: None,
        };
        let config = NavConfig::default();
        let m = resolve(&hands, None, 0.02, &config, &mut GestureTracker::new());
        assert!(m.is_still());

        let m = resolve(&HandPair::default(), None, 0.02, &config, &mut GestureTracker::new());
        assert_eq!(m, Motion::idle());
    }

    #[test]
    fn gesture_mode_replaces_pinch_step() {
        let config = NavConfig {
            pinch_mode: PinchMode::Gesture,
            ..Default::default()
        };
        let mut tracker = GestureTracker::new();
        let hands = HandPair {
            left: None,
            right: Some(hand(Handedness::Right, Vec2::ZERO, true)),
        };
        let m = resolve(&hands, Some(&head()), 0.02, &config, &mut tracker);
        assert_eq!(m.mode, MotionMode::Gesture(Handedness::Right));
        assert_eq!(tracker.lock(), Some(Handedness::Right));

        // Stick input still wins while the lock is held.
        let mut pushing = hands;
        pushing.right.as_mut().unwrap().axis = Vec2::new(0.0, -1.0);
        let m = resolve(&pushing, Some(&head()), 0.02, &config, &mut tracker);
        assert_eq!(m.mode, MotionMode::AxisDrive(Handedness::Right));
        assert_eq!(tracker.lock(), Some(Handedness::Right));
    }

    #[test]
    fn stick_frames_keep_gesture_tip_current() {
        let config = NavConfig {
            pinch_mode: PinchMode::Gesture,
            ..Default::default()
        };
        let mut tracker = GestureTracker::new();
        let at = |tip: Vec3, axis: Vec2| HandPair {
            left: None,
            right: Some(HandState {
                tip: Some(tip),
                ..hand(Handedness::Right, axis, true)
            }),
        };
        let a = Vec3::new(0.2, 1.2, -0.5);
        let b = Vec3::new(0.2, 1.2, -0.3);

        let m = resolve(&at(a, Vec2::ZERO), Some(&head()), 0.02, &config, &mut tracker);
        assert_eq!(m.mode, MotionMode::Gesture(Handedness::Right));

        // The hand moves while the stick owns the frame.
        let m = resolve(&at(b, Vec2::new(0.0, -1.0)), Some(&head()), 0.02, &config, &mut tracker);
        assert_eq!(m.mode, MotionMode::AxisDrive(Handedness::Right));

        // Back to the gesture with the hand where it was: no catch-up jump.
        let m = resolve(&at(b, Vec2::ZERO), Some(&head()), 0.02, &config, &mut tracker);
        assert_eq!(m.mode, MotionMode::Gesture(Handedness::Right));
        assert_eq!(m.translation, Vec3::ZERO);
    }
}
