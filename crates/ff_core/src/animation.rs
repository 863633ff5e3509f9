//! Frame-based sprite animation clips and deterministic tick logic.
//!
//! A clip is a sequence of sprite frames with per-frame durations. Timing
//! uses integer microseconds (`u64`) so that replaying the same frame deltas
//! always lands on the same frame.
//!
//! The JSON format stores `duration_ms` for readability; on load it is
//! converted to `duration_us`.
//!
//! Player poses and animated tiles both play through [`AnimationState`].
//! Gameplay that waits for "the animation finished" (the jump) watches
//! [`AnimationState::cycles`] rather than a timer.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const ANIMATION_FORMAT_VERSION: &str = "1";

/// A single frame in an animation clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationFrame {
    pub sprite_id: String,
    pub duration_us: u64,
}

/// A named sequence of frames that can loop or play once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationClip {
    pub frames: Vec<AnimationFrame>,
    pub looping: bool,
}

impl AnimationClip {
    /// One-frame clip that never advances.
    pub fn still(sprite_id: impl Into<String>) -> Self {
        Self {
            frames: vec![AnimationFrame {
                sprite_id: sprite_id.into(),
                duration_us: u64::MAX,
            }],
            looping: false,
        }
    }

    /// Total duration of one full cycle in microseconds.
    pub fn total_duration_us(&self) -> u64 {
        self.frames
            .iter()
            .fold(0u64, |acc, f| acc.saturating_add(f.duration_us))
    }

    pub fn first_sprite(&self) -> &str {
        self.frames.first().map(|f| f.sprite_id.as_str()).unwrap_or("")
    }
}

/// Top-level animation definition file.
#[derive(Debug, Clone)]
pub struct AnimationFile {
    pub version: String,
    pub animation_id: String,
    pub animations: HashMap<String, AnimationClip>,
}

impl AnimationFile {
    /// Fails with the first clip name in `names` that the file does not define.
    pub fn require_clips(&self, names: &[&str]) -> Result<(), String> {
        for name in names {
            if !self.animations.contains_key(*name) {
                return Err(format!(
                    "Animation set '{}' is missing required clip '{}'",
                    self.animation_id, name
                ));
            }
        }
        Ok(())
    }
}

/// Runtime state for one active animation instance.
#[derive(Debug, Clone)]
pub struct AnimationState {
    pub clip_name: String,
    pub frame_index: usize,
    pub elapsed_us: u64,
    pub finished: bool,
    /// Completed passes through the clip: incremented on every wrap of a
    /// looping clip and once when a non-looping clip reaches its end.
    pub cycles: u32,
}

impl AnimationState {
    pub fn new(clip_name: &str) -> Self {
        Self {
            clip_name: clip_name.to_string(),
            frame_index: 0,
            elapsed_us: 0,
            finished: false,
            cycles: 0,
        }
    }

    /// Rewind to the first frame of `clip_name`.
    pub fn restart(&mut self, clip_name: &str) {
        *self = Self::new(clip_name);
    }

    /// Advance the animation by `dt_us` microseconds. Returns the current
    /// frame's `sprite_id`.
    pub fn tick<'a>(&mut self, dt_us: u64, clip: &'a AnimationClip) -> &'a str {
        if clip.frames.is_empty() || self.finished {
            return if let Some(frame) = clip.frames.get(self.frame_index) {
                &frame.sprite_id
            } else if let Some(frame) = clip.frames.last() {
                &frame.sprite_id
            } else {
                ""
            };
        }

        if self.frame_index >= clip.frames.len() {
            self.frame_index = 0;
        }
        self.elapsed_us = self.elapsed_us.saturating_add(dt_us);

        loop {
            let current_frame = &clip.frames[self.frame_index];
            if self.elapsed_us < current_frame.duration_us {
                break;
            }

            self.elapsed_us -= current_frame.duration_us;
            self.frame_index += 1;

            if self.frame_index >= clip.frames.len() {
                self.cycles = self.cycles.saturating_add(1);
                if clip.looping {
                    self.frame_index = 0;
                } else {
                    self.frame_index = clip.frames.len() - 1;
                    self.elapsed_us = 0;
                    self.finished = true;
                    break;
                }
            }
        }

        &clip.frames[self.frame_index].sprite_id
    }
}

// --- JSON deserialization types (private) ---

#[derive(Debug, Deserialize)]
struct AnimationFileJson {
    version: String,
    animation_id: String,
    animations: HashMap<String, AnimationClipJson>,
}

#[derive(Debug, Deserialize)]
struct AnimationClipJson {
    frames: Vec<AnimationFrameJson>,
    #[serde(default)]
    looping: bool,
}

#[derive(Debug, Deserialize)]
struct AnimationFrameJson {
    sprite_id: String,
    duration_ms: u64,
}

/// Load an animation definition file from disk.
pub fn load_animation_file(path: &Path) -> Result<AnimationFile, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read animation file {}: {e}", path.display()))?;
    parse_animation_file(&raw)
        .map_err(|e| format!("Animation file {}: {e}", path.display()))
}

/// Parse and validate an animation definition from a JSON string.
pub fn parse_animation_file(raw: &str) -> Result<AnimationFile, String> {
    let json: AnimationFileJson =
        serde_json::from_str(raw).map_err(|e| format!("Failed to parse animation JSON: {e}"))?;
    validate_animation_json(&json)?;

    let mut animations = HashMap::new();
    for (name, clip_json) in json.animations {
        let frames = clip_json
            .frames
            .into_iter()
            .map(|f| AnimationFrame {
                sprite_id: f.sprite_id,
                duration_us: f.duration_ms * 1000,
            })
            .collect();
        animations.insert(
            name,
            AnimationClip {
                frames,
                looping: clip_json.looping,
            },
        );
    }

    log::debug!(
        "Parsed animation set '{}' with {} clips",
        json.animation_id,
        animations.len()
    );

    Ok(AnimationFile {
        version: json.version,
        animation_id: json.animation_id,
        animations,
    })
}

fn validate_animation_json(json: &AnimationFileJson) -> Result<(), String> {
    if json.version != ANIMATION_FORMAT_VERSION {
        return Err(format!(
            "Animation validation failed: unsupported version '{}'",
            json.version
        ));
    }
    if json.animation_id.is_empty() {
        return Err("Animation validation failed: animation_id is empty".to_string());
    }
    for (name, clip) in &json.animations {
        if clip.frames.is_empty() {
            return Err(format!(
                "Animation validation failed: clip '{}' has no frames",
                name
            ));
        }
        for (i, frame) in clip.frames.iter().enumerate() {
            if frame.sprite_id.is_empty() {
                return Err(format!(
                    "Animation validation failed: clip '{}' frame {} has empty sprite_id",
                    name, i
                ));
            }
            if frame.duration_ms == 0 {
                return Err(format!(
                    "Animation validation failed: clip '{}' frame {} has zero duration",
                    name, i
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "ff_anim_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn make_clip(durations_ms: &[u64], looping: bool) -> AnimationClip {
        AnimationClip {
            frames: durations_ms
                .iter()
                .enumerate()
                .map(|(i, &d)| AnimationFrame {
                    sprite_id: format!("sprite_{}", i),
                    duration_us: d * 1000,
                })
                .collect(),
            looping,
        }
    }

    #[test]
    fn tick_advances_through_frames() {
        let clip = make_clip(&[100, 100, 100], true);
        let mut state = AnimationState::new("run_left");

        assert_eq!(state.tick(0, &clip), "sprite_0");
        assert_eq!(state.tick(50_000, &clip), "sprite_0");
        assert_eq!(state.tick(60_000, &clip), "sprite_1");
    }

    #[test]
    fn looping_wraps_around_and_counts_cycles() {
        let clip = make_clip(&[100, 100], true);
        let mut state = AnimationState::new("idle_up_left");

        let id = state.tick(250_000, &clip);
        assert_eq!(id, "sprite_0");
        assert!(!state.finished);
        assert_eq!(state.cycles, 1);
    }

    #[test]
    fn non_looping_stops_on_last_frame() {
        let clip = make_clip(&[100, 100], false);
        let mut state = AnimationState::new("jump_left");

        assert_eq!(state.tick(300_000, &clip), "sprite_1");
        assert!(state.finished);
        assert_eq!(state.cycles, 1);

        assert_eq!(state.tick(100_000, &clip), "sprite_1");
        assert!(state.finished);
        assert_eq!(state.cycles, 1, "finished clip does not keep counting");
    }

    #[test]
    fn restart_rewinds_to_first_frame() {
        let clip = make_clip(&[100, 100], false);
        let mut state = AnimationState::new("jump_left");
        state.tick(300_000, &clip);
        state.restart("jump_right");
        assert_eq!(state.clip_name, "jump_right");
        assert_eq!(state.frame_index, 0);
        assert_eq!(state.cycles, 0);
        assert!(!state.finished);
    }

    #[test]
    fn still_clip_never_finishes() {
        let clip = AnimationClip::still("tile_3");
        let mut state = AnimationState::new("tile");
        for _ in 0..1000 {
            assert_eq!(state.tick(16_667, &clip), "tile_3");
        }
        assert!(!state.finished);
        assert_eq!(state.cycles, 0);
    }

    #[test]
    fn determinism_identical_results() {
        let clip = make_clip(&[100, 150, 80], true);
        let dt = 16_667u64;

        let mut state_a = AnimationState::new("run_right");
        let mut state_b = AnimationState::new("run_right");

        for _ in 0..100 {
            let id_a = state_a.tick(dt, &clip);
            let id_b = state_b.tick(dt, &clip);
            assert_eq!(id_a, id_b);
        }
        assert_eq!(state_a.frame_index, state_b.frame_index);
        assert_eq!(state_a.elapsed_us, state_b.elapsed_us);
        assert_eq!(state_a.cycles, state_b.cycles);
    }

    #[test]
    fn load_animation_file_parses_valid_json() {
        let path = temp_file_path("valid");
        let json = r#"
        {
          "version": "1",
          "animation_id": "player",
          "animations": {
            "idle_up_left": {
              "frames": [
                { "sprite_id": "player/idle_ul_0", "duration_ms": 100 },
                { "sprite_id": "player/idle_ul_1", "duration_ms": 100 }
              ],
              "looping": true
            },
            "jump_left": {
              "frames": [
                { "sprite_id": "player/jump_l_0", "duration_ms": 120 }
              ]
            }
          }
        }
        "#;
        fs::write(&path, json).expect("write temp file");

        let file = load_animation_file(&path).expect("should parse");
        assert_eq!(file.animation_id, "player");
        assert_eq!(file.animations.len(), 2);

        let idle = &file.animations["idle_up_left"];
        assert!(idle.looping);
        assert_eq!(idle.frames[0].duration_us, 100_000);
        assert!(!file.animations["jump_left"].looping);

        assert!(file.require_clips(&["idle_up_left", "jump_left"]).is_ok());
        let err = file
            .require_clips(&["idle_up_left", "dead"])
            .expect_err("dead clip is missing");
        assert!(err.contains("'dead'"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn parse_rejects_bad_version() {
        let json = r#"
        {
          "version": "9.9",
          "animation_id": "player",
          "animations": {
            "idle": { "frames": [{ "sprite_id": "a", "duration_ms": 100 }] }
          }
        }
        "#;
        let err = parse_animation_file(json).expect_err("bad version should fail");
        assert!(err.contains("unsupported version"));
    }

    #[test]
    fn parse_rejects_zero_duration() {
        let json = r#"
        {
          "version": "1",
          "animation_id": "player",
          "animations": {
            "idle": { "frames": [{ "sprite_id": "a", "duration_ms": 0 }] }
          }
        }
        "#;
        let err = parse_animation_file(json).expect_err("zero duration should fail");
        assert!(err.contains("zero duration"));
    }

    #[test]
    fn missing_file_reports_path() {
        let path = temp_file_path("missing");
        let err = load_animation_file(&path).expect_err("missing file should fail");
        assert!(err.contains("Failed to read animation file"));
    }

    #[test]
    fn total_duration_us() {
        let clip = make_clip(&[100, 200, 300], true);
        assert_eq!(clip.total_duration_us(), 600_000);
    }
}
