use glam::{EulerRot, Quat, Vec3};
use xrview_common::{Handedness, Pose};

use crate::frame::{Gamepad, HandJoints, InputSource, XrFrame};

/// Buttons the desktop emulator listens to, already decoded from the keyboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmulatorButtons {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub pinch_left: bool,
    pub pinch_right: bool,
    pub swing_left: bool,
    pub swing_right: bool,
}

/// Fakes a headset with two hands so XR locomotion can be driven from a desktop.
///
/// Produces the same [`XrFrame`] a runtime would, in rig-local space.
#[derive(Debug, Clone)]
pub struct HeadsetEmulator {
    pub yaw: f32,
    pub pitch: f32,
    pub eye_height: f32,
    pub sensitivity: f32,
    /// Report hands as tracked joints instead of controllers.
    pub hand_tracking: bool,
}

/// Sideways reach of a swung hand from the head, in meters.
const SWING_REACH: f32 = 0.5;
const OPEN_GAP: f32 = 0.06;
const PINCH_GAP: f32 = 0.005;

impl Default for HeadsetEmulator {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            eye_height: 1.6,
            sensitivity: 0.003,
            hand_tracking: false,
        }
    }
}

impl HeadsetEmulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn look(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * self.sensitivity;
        self.pitch -= dy * self.sensitivity;
        self.pitch = self
            .pitch
            .clamp(-89.0_f32.to_radians(), 89.0_f32.to_radians());
    }

    pub fn head_pose(&self) -> Pose {
        Pose::new(
            Vec3::new(0.0, self.eye_height, 0.0),
            Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0),
        )
    }

    pub fn frame(&self, buttons: &EmulatorButtons) -> XrFrame {
        let head = self.head_pose();
        XrFrame {
            head: Some(head),
            sources: vec![
                self.source(Handedness::Left, buttons),
                self.source(Handedness::Right, buttons),
            ],
        }
    }

    fn source(&self, side: Handedness, buttons: &EmulatorButtons) -> InputSource {
        let body_yaw = Quat::from_rotation_y(self.yaw);
        let (side_x, pinching) = match side {
            Handedness::Left => (-0.2, buttons.pinch_left),
            Handedness::Right => (0.2, buttons.pinch_right),
        };
        let x = match (buttons.swing_left, buttons.swing_right) {
            (true, false) => -SWING_REACH,
            (false, true) => SWING_REACH,
            _ => side_x,
        };
        let local = Vec3::new(x, self.eye_height - 0.4, -0.35);
        let position = body_yaw * local;
        let target_ray = Pose::new(position, body_yaw);

        if self.hand_tracking {
            let thumb_tip = position + body_yaw * Vec3::new(0.0, 0.05, -0.1);
            let gap = if pinching { PINCH_GAP } else { OPEN_GAP };
            InputSource {
                handedness: Some(side),
                target_ray: Some(target_ray),
                gamepad: None,
                hand: Some(HandJoints {
                    wrist: position,
                    thumb_tip,
                    index_tip: thumb_tip + body_yaw * Vec3::new(gap, 0.0, 0.0),
                }),
                select: false,
            }
        } else {
            let axes = match side {
                Handedness::Left => {
                    let x = axis_from(buttons.left, buttons.right);
                    let y = axis_from(buttons.forward, buttons.back);
                    vec![x, y]
                }
                Handedness::Right => vec![0.0, 0.0],
            };
            InputSource {
                handedness: Some(side),
                target_ray: Some(target_ray),
                gamepad: Some(Gamepad { axes }),
                hand: None,
                select: pinching,
            }
        }
    }
}

/// -1 when `neg` alone is held, +1 when `pos` alone is held.
fn axis_from(neg: bool, pos: bool) -> f32 {
    match (neg, pos) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    }
}
