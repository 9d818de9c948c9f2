use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use xrview_common::{Handedness, Pose};

use crate::frame::{InputSource, XrFrame};

/// Tunables for turning raw sources into hand states.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Axis components with `|v| <= deadzone` read as zero.
    pub deadzone: f32,
    /// Thumb-to-index distance (meters) below which a tracked hand pinches.
    pub pinch_distance: f32,
    /// Side assigned to hand-tracking sources that report no handedness.
    pub default_hand: Handedness,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            deadzone: 0.1,
            pinch_distance: 0.02,
            default_hand: Handedness::Right,
        }
    }
}

/// Normalized state of one hand for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandState {
    pub handedness: Handedness,
    /// Deadzone-filtered `(x, y)` from the first two gamepad axes.
    pub axis: Vec2,
    pub is_pinching: bool,
    pub is_hand_tracking: bool,
    /// Index of the source in [`XrFrame::sources`].
    pub source_index: usize,
    /// Pointing ray pose, if the source reported one.
    pub pointer: Option<Pose>,
    /// Index fingertip, falling back to the pointer origin for controllers.
    pub tip: Option<Vec3>,
}

/// Left and right hand slots. Rebuilt from scratch every frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HandPair {
    pub left: Option<HandState>,
    pub right: Option<HandState>,
}

impl HandPair {
    pub fn get(&self, side: Handedness) -> Option<&HandState> {
        match side {
            Handedness::Left => self.left.as_ref(),
            Handedness::Right => self.right.as_ref(),
        }
    }

    fn slot_mut(&mut self, side: Handedness) -> &mut Option<HandState> {
        match side {
            Handedness::Left => &mut self.left,
            Handedness::Right => &mut self.right,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &HandState> {
        self.left.iter().chain(self.right.iter())
    }

    pub fn pinching_count(&self) -> usize {
        self.iter().filter(|h| h.is_pinching).count()
    }

    pub fn is_pinching(&self, side: Handedness) -> bool {
        self.get(side).is_some_and(|h| h.is_pinching)
    }

    pub fn clear(&mut self) {
        self.left = None;
        self.right = None;
    }

    /// Clear both slots and repopulate them from `frame`.
    ///
    /// The first source claiming a side keeps it. Hand-tracking sources with
    /// no handedness take the default side, or the other side when the
    /// default is already taken. Anything else without handedness is skipped.
    pub fn refill(&mut self, frame: &XrFrame, config: &SamplerConfig) {
        self.clear();
        for (index, source) in frame.sources.iter().enumerate() {
            let Some(side) = self.side_for(source, config) else {
                tracing::trace!(index, "skipping input source without a free side");
                continue;
            };
            *self.slot_mut(side) = Some(hand_state(index, side, source, config));
        }
    }

    fn side_for(&self, source: &InputSource, config: &SamplerConfig) -> Option<Handedness> {
        match source.handedness {
            Some(side) if self.get(side).is_none() => Some(side),
            Some(_) => None,
            None if source.is_hand_tracking() => [config.default_hand, config.default_hand.other()]
                .into_iter()
                .find(|side| self.get(*side).is_none()),
            None => None,
        }
    }
}

/// Snap a single axis value to zero inside the deadzone.
///
/// The threshold itself is inside the deadzone. Non-finite values read as zero.
pub fn apply_deadzone(value: f32, deadzone: f32) -> f32 {
    if !value.is_finite() || value.abs() <= deadzone {
        0.0
    } else {
        value
    }
}

/// Build the hand pair for one frame.
pub fn sample_hands(frame: &XrFrame, config: &SamplerConfig) -> HandPair {
    let mut hands = HandPair::default();
    hands.refill(frame, config);
    hands
}

fn hand_state(
    index: usize,
    side: Handedness,
    source: &InputSource,
    config: &SamplerConfig,
) -> HandState {
    let axis = source
        .gamepad
        .as_ref()
        .map(|pad| {
            Vec2::new(
                apply_deadzone(pad.axis(0), config.deadzone),
                apply_deadzone(pad.axis(1), config.deadzone),
            )
        })
        .unwrap_or(Vec2::ZERO);

    let joint_pinch = source
        .hand
        .and_then(|j| j.pinch_gap())
        .is_some_and(|gap| gap < config.pinch_distance);

    let pointer = source.target_ray.filter(Pose::is_finite);
    let tip = source
        .hand
        .map(|j| j.index_tip)
        .filter(|p| p.is_finite())
        .or_else(|| pointer.map(|p| p.position));

    HandState {
        handedness: side,
        axis,
        is_pinching: source.select || joint_pinch,
        is_hand_tracking: source.is_hand_tracking(),
        source_index: index,
        pointer,
        tip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{Gamepad, HandJoints};

    fn controller(side: Handedness, x: f32, y: f32) -> InputSource {
        InputSource {
            handedness: Some(side),
            gamepad: Some(Gamepad { axes: vec![x, y] }),
            ..Default::default()
        }
    }

    fn tracked_hand(side: Option<Handedness>, gap: f32) -> InputSource {
        InputSource {
            handedness: side,
            hand: Some(HandJoints {
                wrist: Vec3::new(0.0, 1.0, -0.2),
                thumb_tip: Vec3::new(0.0, 1.1, -0.3),
                index_tip: Vec3::new(gap, 1.1, -0.3),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn deadzone_boundary_is_zero() {
        assert_eq!(apply_deadzone(0.1, 0.1), 0.0);
        assert_eq!(apply_deadzone(-0.1, 0.1), 0.0);
        assert_eq!(apply_deadzone(0.1001, 0.1), 0.1001);
        assert_eq!(apply_deadzone(f32::NAN, 0.1), 0.0);
    }

    #[test]
    fn controllers_fill_their_own_sides() {
        let frame = XrFrame {
            head: None,
            sources: vec![
                controller(Handedness::Left, 0.05, -0.8),
                controller(Handedness::Right, 0.5, 0.0),
            ],
        };
        let hands = sample_hands(&frame, &SamplerConfig::default());

        let left = hands.left.unwrap();
        assert_eq!(left.axis, Vec2::new(0.0, -0.8));
        assert_eq!(left.source_index, 0);
        assert!(!left.is_hand_tracking);
        assert_eq!(hands.right.unwrap().axis, Vec2::new(0.5, 0.0));
    }

    #[test]
    fn unhanded_tracked_hands_take_default_then_other_side() {
        let frame = XrFrame {
            head: None,
            sources: vec![tracked_hand(None, 0.05), tracked_hand(None, 0.05)],
        };
        let hands = sample_hands(&frame, &SamplerConfig::default());
        assert_eq!(hands.right.unwrap().source_index, 0);
        assert_eq!(hands.left.unwrap().source_index, 1);
    }

    #[test]
    fn unhanded_controller_is_skipped() {
        let mut source = controller(Handedness::Left, 0.0, -1.0);
        source.handedness = None;
        let frame = XrFrame {
            head: None,
            sources: vec![source],
        };
        let hands = sample_hands(&frame, &SamplerConfig::default());
        assert!(hands.left.is_none() && hands.right.is_none());
    }

    #[test]
    fn duplicate_side_keeps_first_source() {
        let frame = XrFrame {
            head: None,
            sources: vec![
                controller(Handedness::Left, 0.0, -1.0),
                controller(Handedness::Left, 0.0, 1.0),
            ],
        };
        let hands = sample_hands(&frame, &SamplerConfig::default());
        assert_eq!(hands.left.unwrap().axis.y, -1.0);
        assert!(hands.right.is_none());
    }

    #[test]
    fn joint_pinch_uses_strict_threshold() {
        let config = SamplerConfig::default();
        let close = XrFrame {
            head: None,
            sources: vec![tracked_hand(Some(Handedness::Left), 0.01)],
        };
        assert!(sample_hands(&close, &config).is_pinching(Handedness::Left));

        let open = XrFrame {
            head: None,
            sources: vec![tracked_hand(Some(Handedness::Left), 0.05)],
        };
        let hands = sample_hands(&open, &config);
        assert!(!hands.is_pinching(Handedness::Left));
        assert!(hands.left.unwrap().is_hand_tracking);
    }

    #[test]
    fn select_counts_as_pinch() {
        let mut source = controller(Handedness::Right, 0.0, 0.0);
        source.select = true;
        let frame = XrFrame {
            head: None,
            sources: vec![source],
        };
        let hands = sample_hands(&frame, &SamplerConfig::default());
        assert_eq!(hands.pinching_count(), 1);
    }

    #[test]
    fn refill_drops_disconnected_sources() {
        let config = SamplerConfig::default();
        let mut hands = sample_hands(
            &XrFrame {
                head: None,
                sources: vec![controller(Handedness::Left, 0.0, -1.0)],
            },
            &config,
        );
        assert!(hands.left.is_some());

        hands.refill(&XrFrame::default(), &config);
        assert_eq!(hands, HandPair::default());
    }

    #[test]
    fn tip_prefers_index_joint_over_pointer() {
        let mut source = tracked_hand(Some(Handedness::Right), 0.05);
        source.target_ray = Some(Pose::default());
        let frame = XrFrame {
            head: None,
            sources: vec![source],
        };
        let hands = sample_hands(&frame, &SamplerConfig::default());
        assert_eq!(hands.right.unwrap().tip, Some(Vec3::new(0.05, 1.1, -0.3)));
    }
}
