use glam::Vec3;
use xrview_common::{Handedness, Pose, flatten_direction};
use xrview_input::HandPair;

use crate::config::{NavConfig, TurnReference};
use crate::motion::{Motion, MotionMode};

/// Cross-frame state for the pinch-locked hand gesture.
///
/// The first hand seen pinching owns the lock until its own pinch ends;
/// the other hand is ignored meanwhile. Pinch start and end are detected by
/// polling each frame, never by callbacks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureTracker {
    lock: Option<Handedness>,
    /// Fingertip where the lock was acquired (rig-local).
    anchor: Option<Vec3>,
    /// Fingertip on the previous observed frame (rig-local).
    prev_tip: Option<Vec3>,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> Option<Handedness> {
        self.lock
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Poll pinch state: release a lock whose hand stopped pinching, then
    /// acquire one if free. Right wins when both hands start on the same frame.
    pub fn update_lock(&mut self, hands: &HandPair) -> Option<Handedness> {
        if let Some(side) = self.lock {
            if !hands.is_pinching(side) {
                tracing::debug!(hand = side.as_str(), "pinch lock released");
                self.reset();
            }
        }
        if self.lock.is_none() {
            let candidate = [Handedness::Right, Handedness::Left]
                .into_iter()
                .find(|side| hands.is_pinching(*side));
            if let Some(side) = candidate {
                tracing::debug!(hand = side.as_str(), "pinch lock acquired");
                self.lock = Some(side);
                self.anchor = hands.get(side).and_then(|h| h.tip);
                self.prev_tip = self.anchor;
                return self.lock;
            }
        }
        self.lock
    }

    /// Observe this frame and compute the gesture motion.
    ///
    /// Returns `None` when no hand holds the lock. Must be called every frame,
    /// including frames where another mode wins, so the previous fingertip
    /// never goes stale.
    pub fn observe(
        &mut self,
        hands: &HandPair,
        head: Option<&Pose>,
        dt: f32,
        config: &NavConfig,
    ) -> Option<Motion> {
        let side = self.update_lock(hands)?;
        let mode = MotionMode::Gesture(side);

        let Some(tip) = hands.get(side).and_then(|h| h.tip) else {
            self.prev_tip = None;
            return Some(Motion::translate(mode, Vec3::ZERO));
        };
        let anchor = *self.anchor.get_or_insert(tip);
        let prev = self.prev_tip.replace(tip);

        let Some(head) = head else {
            return Some(Motion::translate(mode, Vec3::ZERO));
        };
        let (Some(forward), Some(right)) = (
            flatten_direction(head.forward()),
            flatten_direction(head.right()),
        ) else {
            return Some(Motion::translate(mode, Vec3::ZERO));
        };

        // Pull toward the body to move forward.
        let translation = prev
            .map(|p| -(tip - p).dot(forward) * forward * config.drag_gain)
            .unwrap_or(Vec3::ZERO);

        let reference = match config.turn_reference {
            TurnReference::Head => head.position,
            TurnReference::Anchor => anchor,
        };
        let lateral = (tip - reference).dot(right);
        let excess = (lateral.abs() - config.gesture_deadband).max(0.0);
        let yaw = -lateral.signum() * excess * config.rotate_speed * dt;

        Some(Motion {
            mode,
            translation,
            yaw: if excess > 0.0 { yaw } else { 0.0 },
        })
    }
}
