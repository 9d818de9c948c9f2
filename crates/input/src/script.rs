use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::frame::XrFrame;

/// Errors from loading a recorded or hand-written frame script.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported script extension: {0:?}")]
    UnsupportedFormat(String),
}

/// A frame plus the time elapsed since the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptFrame {
    /// Seconds since the previous frame; omitted means 0.
    #[serde(default)]
    pub dt: f32,
    #[serde(flatten)]
    pub frame: XrFrame,
    /// Repeat this frame `repeat` times (at least once).
    #[serde(default = "one")]
    pub repeat: u32,
}

fn one() -> u32 {
    1
}

/// A sequence of XR frames for headless playback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameScript {
    pub frames: Vec<ScriptFrame>,
}

impl FrameScript {
    /// Load a script, picking YAML or JSON from the file extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let script = match ext.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&text)?,
            "json" => serde_json::from_str(&text)?,
            other => return Err(ScriptError::UnsupportedFormat(other.to_string())),
        };
        tracing::debug!(path = %path.display(), "loaded frame script");
        Ok(script)
    }

    /// Iterate `(dt, frame)` with repeats expanded.
    pub fn expanded(&self) -> impl Iterator<Item = (f32, &XrFrame)> {
        self.frames
            .iter()
            .flat_map(|f| std::iter::repeat_n((f.dt, &f.frame), f.repeat.max(1) as usize))
    }

    pub fn total_frames(&self) -> usize {
        self.frames.iter().map(|f| f.repeat.max(1) as usize).sum()
    }
}
