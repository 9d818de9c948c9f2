use glam::Vec3;
use serde::{Deserialize, Serialize};
use xrview_common::{Handedness, Pose};

/// One frame's worth of XR input, as reported by the runtime.
///
/// Poses are expressed in the tracking reference space, i.e. relative to the
/// player rig. [`XrFrame::to_world`] re-expresses them in world space.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct XrFrame {
    /// Head (viewer) pose. `None` when the session has no viewer pose yet.
    #[serde(default)]
    pub head: Option<Pose>,
    /// Active input sources, in runtime order.
    #[serde(default)]
    pub sources: Vec<InputSource>,
}

/// A single controller or tracked hand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSource {
    /// `None` when the runtime reports no handedness.
    #[serde(default)]
    pub handedness: Option<Handedness>,
    /// Pointing ray pose.
    #[serde(default)]
    pub target_ray: Option<Pose>,
    /// Gamepad-style axes, present on controllers.
    #[serde(default)]
    pub gamepad: Option<Gamepad>,
    /// Tracked joints, present on hand-tracking sources.
    #[serde(default)]
    pub hand: Option<HandJoints>,
    /// Primary action (trigger, or the runtime's own pinch detection) held.
    #[serde(default)]
    pub select: bool,
}

/// Analog axes reported by a gamepad-style source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Gamepad {
    #[serde(default)]
    pub axes: Vec<f32>,
}

impl Gamepad {
    /// Axis value at `index`, or zero when missing or not finite.
    pub fn axis(&self, index: usize) -> f32 {
        match self.axes.get(index) {
            Some(v) if v.is_finite() => *v,
            _ => 0.0,
        }
    }
}

/// The subset of hand joints locomotion cares about.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandJoints {
    pub wrist: Vec3,
    pub thumb_tip: Vec3,
    pub index_tip: Vec3,
}

impl HandJoints {
    /// Thumb-tip to index-tip distance, `None` if any joint is not finite.
    pub fn pinch_gap(&self) -> Option<f32> {
        if self.thumb_tip.is_finite() && self.index_tip.is_finite() {
            Some(self.thumb_tip.distance(self.index_tip))
        } else {
            None
        }
    }

    fn transformed(&self, rig: &Pose) -> Self {
        Self {
            wrist: rig.transform_point(self.wrist),
            thumb_tip: rig.transform_point(self.thumb_tip),
            index_tip: rig.transform_point(self.index_tip),
        }
    }
}

impl InputSource {
    pub fn is_hand_tracking(&self) -> bool {
        self.hand.is_some()
    }
}

impl XrFrame {
    /// Re-express every pose in the frame through the rig pose.
    pub fn to_world(&self, rig: &Pose) -> XrFrame {
        XrFrame {
            head: self.head.map(|h| rig.compose(&h)),
            sources: self
                .sources
                .iter()
                .map(|s| InputSource {
                    target_ray: s.target_ray.map(|r| rig.compose(&r)),
                    hand: s.hand.map(|j| j.transformed(rig)),
                    ..s.clone()
                })
                .collect(),
        }
    }
}
