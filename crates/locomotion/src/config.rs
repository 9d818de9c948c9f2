use serde::{Deserialize, Serialize};
use std::path::Path;
use xrview_common::Handedness;
use xrview_input::SamplerConfig;

/// Errors from loading or validating navigation config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config extension: {0:?}")]
    UnsupportedFormat(String),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// What a pinch does when no stick is pushed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinchMode {
    /// Pinch steps along the hand's ray; both hands step backward.
    #[default]
    Step,
    /// First pinching hand grabs a lock; pull to move, swing sideways to turn.
    Gesture,
}

/// Where the gesture turn measures the locked hand's sideways offset from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnReference {
    /// The head: hold the pinching hand out to the side to turn.
    #[default]
    Head,
    /// The fingertip where the pinch began: swing sideways from there to turn.
    Anchor,
}

/// Navigation tunables. Fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Stick drive speed, m/s at full deflection.
    pub move_speed: f32,
    /// Pinch step speed, m/s.
    pub step_speed: f32,
    /// Per-axis deadzone. Values at or below it read as zero.
    pub deadzone: f32,
    /// Thumb-to-index distance (m) that counts as a pinch.
    pub pinch_distance: f32,
    /// Side for hand-tracking sources without handedness.
    pub default_hand: Handedness,
    /// Both hands pinching steps backward.
    pub dual_pinch: bool,
    /// Speed multiplier for the dual-pinch backward step.
    pub dual_pinch_multiplier: f32,
    /// Let the stick's X axis strafe. Off for comfort.
    pub strafe: bool,
    pub pinch_mode: PinchMode,
    /// Gesture turn rate, rad/s per meter of lateral hand offset.
    pub rotate_speed: f32,
    /// Lateral hand offset (m) ignored before turning starts. Covers a hand
    /// held in front of the body when measured from the head.
    pub gesture_deadband: f32,
    pub turn_reference: TurnReference,
    /// Scale from hand pull distance to rig translation.
    pub drag_gain: f32,
    /// Largest frame time (s) a single step may integrate.
    pub max_dt: f32,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            move_speed: 2.0,
            step_speed: 1.0,
            deadzone: 0.1,
            pinch_distance: 0.02,
            default_hand: Handedness::Right,
            dual_pinch: true,
            dual_pinch_multiplier: 2.0,
            strafe: false,
            pinch_mode: PinchMode::Step,
            rotate_speed: 3.0,
            gesture_deadband: 0.25,
            turn_reference: TurnReference::Head,
            drag_gain: 1.0,
            max_dt: 0.05,
        }
    }
}

impl NavConfig {
    /// Load from YAML or JSON, chosen by file extension, then validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let config: Self = match ext.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&text)?,
            "json" => serde_json::from_str(&text)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded navigation config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("move_speed", self.move_speed),
            ("step_speed", self.step_speed),
            ("dual_pinch_multiplier", self.dual_pinch_multiplier),
            ("rotate_speed", self.rotate_speed),
            ("gesture_deadband", self.gesture_deadband),
            ("drag_gain", self.drag_gain),
            ("pinch_distance", self.pinch_distance),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a non-negative number, got {value}"),
                });
            }
        }
        if !(0.0..1.0).contains(&self.deadzone) {
            return Err(ConfigError::Invalid {
                field: "deadzone",
                reason: format!("must be in [0, 1), got {}", self.deadzone),
            });
        }
        if !(self.max_dt.is_finite() && self.max_dt > 0.0) {
            return Err(ConfigError::Invalid {
                field: "max_dt",
                reason: format!("must be positive, got {}", self.max_dt),
            });
        }
        Ok(())
    }

    pub fn sampler(&self) -> SamplerConfig {
        SamplerConfig {
            deadzone: self.deadzone,
            pinch_distance: self.pinch_distance,
            default_hand: self.default_hand,
        }
    }

    /// Clamp a frame time to `[0, max_dt]`. Non-finite input becomes zero.
    pub fn clamp_dt(&self, dt: f32) -> f32 {
        if dt.is_finite() {
            dt.clamp(0.0, self.max_dt)
        } else {
            0.0
        }
    }
}
