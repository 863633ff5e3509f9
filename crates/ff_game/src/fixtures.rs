//! Shared test data: a small tileset, player clips and map builders.

use ff_core::animation::parse_animation_file;
use glam::Vec2;

use crate::animation::{Pose, PoseClips};
use crate::config::GameConfig;
use crate::map::{TileLayer, TileMapFile};
use crate::player::PlayerConfig;
use crate::tileset::{parse_tileset, Tileset};

/// Map tile id that wins the level.
pub const GOAL: u32 = 9;
/// Ordinary ground.
pub const FLOOR: u32 = 1;

pub fn tileset() -> Tileset {
    parse_tileset(
        r#"{
          "name": "test", "image": "test.png",
          "tilewidth": 16, "tileheight": 16, "tilecount": 16, "columns": 4,
          "tiles": [
            { "id": 8, "properties": [ { "name": "goal", "type": "bool", "value": true } ] },
            { "id": 2, "animation": [ { "tileid": 2 }, { "tileid": 3 } ] }
          ]
        }"#,
    )
    .expect("fixture tileset parses")
}

/// Two 100 ms frames per pose; jump clips play once.
pub fn pose_clips() -> PoseClips {
    let clips: Vec<String> = Pose::ALL
        .iter()
        .map(|p| {
            format!(
                r#""{0}": {{ "frames": [ {{ "sprite_id": "hero/{0}_0", "duration_ms": 100 }}, {{ "sprite_id": "hero/{0}_1", "duration_ms": 100 }} ], "looping": {1} }}"#,
                p.clip_name(),
                !p.is_jump()
            )
        })
        .collect();
    let raw = format!(
        r#"{{ "version": "1", "animation_id": "hero", "animations": {{ {} }} }}"#,
        clips.join(", ")
    );
    let file = parse_animation_file(&raw).expect("fixture animation parses");
    PoseClips::from_file(file).expect("fixture animation is complete")
}

pub fn player_config() -> PlayerConfig {
    PlayerConfig {
        size: Vec2::splat(16.0),
        jump_distance: 32.0,
        death_time_ms: 3000,
    }
}

/// Small viewport so screen maths stays readable in assertions.
pub fn game_config(levels: usize) -> GameConfig {
    let mut config = GameConfig::default();
    config.viewport.width = 320;
    config.viewport.height = 180;
    config.levels = (0..levels)
        .map(|i| format!("level{i}.json").into())
        .collect();
    config
}

/// One visible 16 px layer.
pub fn map(width: u32, height: u32, data: Vec<u32>) -> TileMapFile {
    TileMapFile {
        width,
        height,
        tilewidth: 16,
        tileheight: 16,
        backgroundcolor: Some("#102030".to_string()),
        layers: vec![TileLayer {
            name: "ground".to_string(),
            width,
            height,
            visible: true,
            data,
        }],
    }
}

/// A corridor of floor running right from the origin with a goal at the end.
pub fn corridor(length: u32) -> TileMapFile {
    let mut data = vec![FLOOR; length as usize];
    if let Some(last) = data.last_mut() {
        *last = GOAL;
    }
    map(length, 1, data)
}
