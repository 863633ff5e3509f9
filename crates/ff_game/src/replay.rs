//! Scripted input for headless runs.
//!
//! A replay lists frames of held keys; `repeat` holds them for several frames.
//! Running the same script against the same assets always ends in the same
//! state, which is what the `--replay` mode and the scenario tests rely on.

use ff_core::input::{InputState, Key, MouseBtn};
use ff_render::SceneGraph;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::game::{Game, GameStats};

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayScript {
    /// Frame-normalised delta fed to every frame (1.0 is one 60 Hz frame).
    #[serde(default = "default_delta")]
    pub delta: f32,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub click: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayStep {
    pub keys: Vec<Key>,
    pub click: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplaySummary {
    pub stats: GameStats,
    pub level: Option<usize>,
    pub alive: bool,
    pub camera: (f32, f32),
}

impl ReplayScript {
    pub fn expanded_inputs(&self) -> Vec<ReplayStep> {
        let mut out = Vec::new();
        for frame in &self.frames {
            let keys: Vec<Key> = frame
                .keys
                .iter()
                .filter_map(|name| Key::from_name(name))
                .collect();
            for _ in 0..frame.repeat.max(1) {
                out.push(ReplayStep {
                    keys: keys.clone(),
                    click: frame.click,
                });
            }
        }
        out
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplayScript, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    parse_replay(&raw).map_err(|e| format!("Replay {}: {e}", path.display()))
}

pub fn parse_replay(raw: &str) -> Result<ReplayScript, String> {
    let replay: ReplayScript =
        serde_json::from_str(raw).map_err(|e| format!("Failed to parse replay JSON: {e}"))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplayScript) -> Result<(), String> {
    if !(replay.delta.is_finite() && replay.delta > 0.0) {
        return Err("Replay validation failed: delta must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    for (i, frame) in replay.frames.iter().enumerate() {
        if let Some(name) = frame.keys.iter().find(|n| Key::from_name(n).is_none()) {
            return Err(format!(
                "Replay validation failed: frame {} names unknown key '{}'",
                i, name
            ));
        }
    }
    Ok(())
}

/// Feed every scripted frame to `game`. Clicks last exactly one frame.
pub fn run_replay<S: SceneGraph>(game: &mut Game<S>, replay: &ReplayScript) -> ReplaySummary {
    let mut input = InputState::new();
    let steps = replay.expanded_inputs();
    for step in &steps {
        input.set_held(&step.keys);
        if step.click {
            input.mouse_down(MouseBtn::Left);
        }
        game.frame(replay.delta, &input);
        input.end_frame();
        input.mouse_up(MouseBtn::Left);
    }

    let summary = ReplaySummary {
        stats: game.stats(),
        level: game.levels().current_index(),
        alive: game.player().is_alive(),
        camera: game.camera().position.into(),
    };
    log::info!(
        "replay finished after {} frames: {:?}",
        steps.len(),
        summary
    );
    summary
}

const fn default_delta() -> f32 {
    1.0
}

const fn default_repeat() -> u32 {
    1
}
