use serde::Deserialize;
use std::fs;
use std::path::Path;

use stepdx_core::input::Key;

/// Scripted key input for headless runs.
#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    /// Wall-clock seconds each replay frame stands for.
    #[serde(default = "default_dt")]
    pub frame_dt: f32,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub press: Vec<Key>,
    #[serde(default)]
    pub release: Vec<Key>,
    /// How many frames this entry covers. Key transitions happen on the
    /// first of them only.
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

/// Key transitions for a single simulated frame. Releases are applied before
/// presses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub release: Vec<Key>,
    pub press: Vec<Key>,
}

impl ReplaySequence {
    pub fn expanded_inputs(&self) -> Vec<FrameInput> {
        let mut out = Vec::new();
        for frame in &self.frames {
            out.push(FrameInput {
                release: frame.release.clone(),
                press: frame.press.clone(),
            });
            for _ in 1..frame.repeat.max(1) {
                out.push(FrameInput::default());
            }
        }
        out
    }

    pub fn frame_count(&self) -> usize {
        self.frames.iter().map(|f| f.repeat.max(1) as usize).sum()
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if !replay.frame_dt.is_finite() || replay.frame_dt <= 0.0 {
        return Err("Replay validation failed: frame_dt must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_dt() -> f32 {
    1.0 / 60.0
}

const fn default_repeat() -> u32 {
    1
}
