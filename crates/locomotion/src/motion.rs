use glam::Vec3;
use xrview_common::Handedness;

/// Which locomotion path produced a frame's motion.
///
/// At most one mode applies per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MotionMode {
    /// Nothing moved.
    #[default]
    Idle,
    /// Continuous stick drive along head forward.
    AxisDrive(Handedness),
    /// Both hands pinching: step backward.
    DualPinchReverse,
    /// One hand pinching: step along that hand's ray.
    PinchStep(Handedness),
    /// Pinch-locked hand gesture: pull to move, swing to turn.
    Gesture(Handedness),
}

impl MotionMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AxisDrive(_) => "axis-drive",
            Self::DualPinchReverse => "dual-pinch-reverse",
            Self::PinchStep(_) => "pinch-step",
            Self::Gesture(_) => "gesture",
        }
    }
}

/// A frame's locomotion result, in rig-local space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Motion {
    pub mode: MotionMode,
    pub translation: Vec3,
    /// Yaw delta in radians, positive turns left (counter-clockwise seen from above).
    pub yaw: f32,
}

impl Motion {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn translate(mode: MotionMode, translation: Vec3) -> Self {
        Self {
            mode,
            translation,
            yaw: 0.0,
        }
    }

    /// True when applying this motion would not change the rig.
    pub fn is_still(&self) -> bool {
        self.translation == Vec3::ZERO && self.yaw == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_is_still() {
        let m = Motion::idle();
        assert_eq!(m.mode, MotionMode::Idle);
        assert!(m.is_still());
    }

    #[test]
    fn mode_names_are_distinct() {
        let names = [
            MotionMode::Idle.name(),
            MotionMode::AxisDrive(Handedness::Left).name(),
            MotionMode::DualPinchReverse.name(),
            MotionMode::PinchStep(Handedness::Right).name(),
            MotionMode::Gesture(Handedness::Right).name(),
        ];
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
