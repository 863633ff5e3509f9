//! Game configuration: tuning constants and asset locations.
//!
//! Every tuning field has a default, so a config file only needs to name the
//! tileset, the player animation set and the level list.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use ff_render::{MAX_ZOOM, MIN_ZOOM};

pub const DEFAULT_CONFIG_PATH: &str = "assets/game.json";

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GameConfig {
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default = "default_camera_speed")]
    pub camera_speed: f32,
    #[serde(default = "default_initial_zoom")]
    pub initial_zoom: f32,
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f32,
    /// World pixels the camera leaps when a jump starts.
    #[serde(default = "default_jump_distance")]
    pub jump_distance: f32,
    #[serde(default = "default_death_time_ms")]
    pub death_time_ms: u64,
    /// Delay before the player and HUD rejoin the stage after a level change.
    #[serde(default = "default_transition_delay_ms")]
    pub transition_delay_ms: u64,
    /// Local pixels per frame a collapsing tile sinks.
    #[serde(default = "default_fall_speed")]
    pub fall_speed: f32,
    #[serde(default = "default_player_size")]
    pub player_size: [f32; 2],
    #[serde(default = "default_pixelate_block_px")]
    pub pixelate_block_px: f32,
    pub tileset: PathBuf,
    pub player_animations: PathBuf,
    pub levels: Vec<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            camera_speed: default_camera_speed(),
            initial_zoom: default_initial_zoom(),
            zoom_step: default_zoom_step(),
            jump_distance: default_jump_distance(),
            death_time_ms: default_death_time_ms(),
            transition_delay_ms: default_transition_delay_ms(),
            fall_speed: default_fall_speed(),
            player_size: default_player_size(),
            pixelate_block_px: default_pixelate_block_px(),
            tileset: PathBuf::from("assets/tilesets/overworld.json"),
            player_animations: PathBuf::from("assets/animations/player.json"),
            levels: Vec::new(),
        }
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&raw).map_err(|e| format!("Config {}: {e}", path.display()))
}

pub fn parse_config(raw: &str) -> Result<GameConfig, String> {
    let config: GameConfig =
        serde_json::from_str(raw).map_err(|e| format!("Failed to parse config JSON: {e}"))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &GameConfig) -> Result<(), String> {
    if config.viewport.width == 0 || config.viewport.height == 0 {
        return Err("Config validation failed: viewport must be non-empty".to_string());
    }
    if !(config.camera_speed.is_finite() && config.camera_speed > 0.0) {
        return Err("Config validation failed: camera_speed must be > 0".to_string());
    }
    if !(MIN_ZOOM..=MAX_ZOOM).contains(&config.initial_zoom) {
        return Err(format!(
            "Config validation failed: initial_zoom {} outside [{MIN_ZOOM}, {MAX_ZOOM}]",
            config.initial_zoom
        ));
    }
    if !(config.zoom_step.is_finite() && config.zoom_step > 0.0) {
        return Err("Config validation failed: zoom_step must be > 0".to_string());
    }
    if !(config.jump_distance.is_finite() && config.jump_distance >= 0.0) {
        return Err("Config validation failed: jump_distance must be >= 0".to_string());
    }
    if !(config.fall_speed.is_finite() && config.fall_speed >= 0.0) {
        return Err("Config validation failed: fall_speed must be >= 0".to_string());
    }
    if config.player_size.iter().any(|s| !(s.is_finite() && *s > 0.0)) {
        return Err("Config validation failed: player_size must be > 0".to_string());
    }
    if config.levels.is_empty() {
        return Err("Config validation failed: levels list is empty".to_string());
    }
    if config.death_time_ms == 0 {
        log::warn!("death_time_ms is 0; respawn happens on the next frame");
    }
    Ok(())
}

const fn default_camera_speed() -> f32 {
    10.0
}

const fn default_initial_zoom() -> f32 {
    1.0
}

const fn default_zoom_step() -> f32 {
    0.01
}

const fn default_jump_distance() -> f32 {
    32.0
}

const fn default_death_time_ms() -> u64 {
    3000
}

const fn default_transition_delay_ms() -> u64 {
    500
}

const fn default_fall_speed() -> f32 {
    2.0
}

const fn default_player_size() -> [f32; 2] {
    [16.0, 16.0]
}

const fn default_pixelate_block_px() -> f32 {
    6.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "ff_config_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn minimal_config_fills_defaults() {
        let config = parse_config(
            r#"{
              "tileset": "assets/tilesets/overworld.json",
              "player_animations": "assets/animations/player.json",
              "levels": ["assets/maps/level1.json"]
            }"#,
        )
        .expect("minimal config should parse");
        assert_eq!(config.death_time_ms, 3000);
        assert_eq!(config.transition_delay_ms, 500);
        assert_eq!(config.viewport, Viewport::default());
        assert_eq!(config.player_size, [16.0, 16.0]);
        assert!((config.zoom_step - 0.01).abs() < f32::EPSILON);
        assert_eq!(config.levels.len(), 1);
    }

    #[test]
    fn rejects_empty_level_list() {
        let err = parse_config(
            r#"{ "tileset": "t.json", "player_animations": "p.json", "levels": [] }"#,
        )
        .expect_err("empty levels should fail");
        assert!(err.contains("levels list is empty"));
    }

    #[test]
    fn rejects_out_of_range_zoom() {
        let err = parse_config(
            r#"{ "initial_zoom": 9.0, "tileset": "t.json", "player_animations": "p.json", "levels": ["a.json"] }"#,
        )
        .expect_err("zoom 9 should fail");
        assert!(err.contains("initial_zoom"));
    }

    #[test]
    fn rejects_non_positive_player_size() {
        let err = parse_config(
            r#"{ "player_size": [16.0, 0.0], "tileset": "t.json", "player_animations": "p.json", "levels": ["a.json"] }"#,
        )
        .expect_err("zero height should fail");
        assert!(err.contains("player_size"));
    }

    #[test]
    fn load_from_path_reports_file_name() {
        let path = temp_file_path("broken");
        fs::write(&path, "{ not json").expect("write temp file");
        let err = load_config_from_path(&path).expect_err("broken json should fail");
        assert!(err.contains("Failed to parse config JSON"));
        assert!(err.contains(&path.display().to_string()));
        let _ = fs::remove_file(path);
    }
}
