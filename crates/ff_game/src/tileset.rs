//! Tileset metadata loading and tile drawable resolution.
//!
//! A tileset names one sheet image and optionally annotates individual tiles
//! with animations or properties. Annotations use zero-based local ids while
//! maps use one-based tile ids, so annotation `id` N describes map tile N+1.
//!
//! [`TileSource`] is the factory seam the level controller draws through; it
//! never sees textures, only drawables and tile classes.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use ff_core::animation::{AnimationClip, AnimationFrame};
use ff_render::Drawable;
use glam::Vec2;

use crate::collision::TileClass;

pub const DEFAULT_TILE_FRAME_MS: u64 = 150;

const GOAL_PROPERTY: &str = "goal";

#[derive(Debug, Deserialize, Clone)]
pub struct TilesetFile {
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub tilewidth: u32,
    pub tileheight: u32,
    #[serde(default)]
    pub tilecount: u32,
    #[serde(default)]
    pub columns: u32,
    #[serde(default)]
    pub tiles: Vec<TileAnnotation>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TileAnnotation {
    pub id: u32,
    #[serde(default)]
    pub animation: Vec<TileAnimationFrame>,
    #[serde(default)]
    pub properties: Vec<TileProperty>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct TileAnimationFrame {
    pub tileid: u32,
    #[serde(default)]
    pub duration: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TileProperty {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub value: serde_json::Value,
}

impl TileAnnotation {
    /// Map tile id this annotation describes.
    pub fn tile_id(&self) -> u32 {
        self.id + 1
    }

    fn is_goal(&self) -> bool {
        self.properties
            .iter()
            .any(|p| p.name == GOAL_PROPERTY && p.value.as_bool() == Some(true))
    }
}

/// Factory for tile drawables, plus the classification gameplay needs.
pub trait TileSource {
    fn tile_size(&self) -> Vec2;
    fn drawable_for_tile(&self, tile_id: u32) -> Drawable;
    fn classify(&self, tile_id: u32) -> TileClass;
}

#[derive(Debug, Clone)]
pub struct Tileset {
    pub name: String,
    pub image: String,
    pub tile_size: Vec2,
    goal_tiles: HashSet<u32>,
    animations: HashMap<u32, AnimationClip>,
}

impl Tileset {
    pub fn from_file(file: TilesetFile) -> Self {
        let goal_tiles: HashSet<u32> = file
            .tiles
            .iter()
            .filter(|t| t.is_goal())
            .map(TileAnnotation::tile_id)
            .collect();

        let mut animations = HashMap::new();
        for tile in file.tiles.iter().filter(|t| !t.animation.is_empty()) {
            let frames = tile
                .animation
                .iter()
                .map(|frame| AnimationFrame {
                    sprite_id: sprite_id_for(&file.name, frame.tileid + 1),
                    duration_us: frame.duration.unwrap_or(DEFAULT_TILE_FRAME_MS) * 1000,
                })
                .collect();
            animations.insert(
                tile.tile_id(),
                AnimationClip {
                    frames,
                    looping: true,
                },
            );
        }

        Self {
            name: file.name,
            image: file.image,
            tile_size: Vec2::new(file.tilewidth as f32, file.tileheight as f32),
            goal_tiles,
            animations,
        }
    }

    pub fn goal_tiles(&self) -> &HashSet<u32> {
        &self.goal_tiles
    }

    pub fn is_animated(&self, tile_id: u32) -> bool {
        self.animations.contains_key(&tile_id)
    }

    pub fn sprite_id(&self, tile_id: u32) -> String {
        sprite_id_for(&self.name, tile_id)
    }
}

impl TileSource for Tileset {
    fn tile_size(&self) -> Vec2 {
        self.tile_size
    }

    fn drawable_for_tile(&self, tile_id: u32) -> Drawable {
        let size = self.tile_size;
        if tile_id == 0 {
            return Drawable::Blank { size };
        }
        match self.animations.get(&tile_id) {
            Some(clip) => Drawable::Animated {
                clip: clip.clone(),
                size,
            },
            None => Drawable::Sprite {
                sprite_id: self.sprite_id(tile_id),
                size,
            },
        }
    }

    fn classify(&self, tile_id: u32) -> TileClass {
        TileClass::of(tile_id, &self.goal_tiles)
    }
}

fn sprite_id_for(tileset: &str, tile_id: u32) -> String {
    format!("{tileset}:{tile_id}")
}

pub fn load_tileset_from_path(path: &Path) -> Result<Tileset, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read tileset {}: {e}", path.display()))?;
    parse_tileset(&raw).map_err(|e| format!("Tileset {}: {e}", path.display()))
}

pub fn parse_tileset(raw: &str) -> Result<Tileset, String> {
    let file: TilesetFile =
        serde_json::from_str(raw).map_err(|e| format!("Failed to parse tileset JSON: {e}"))?;
    validate_tileset(&file)?;
    Ok(Tileset::from_file(file))
}

fn validate_tileset(file: &TilesetFile) -> Result<(), String> {
    if file.name.trim().is_empty() {
        return Err("Tileset validation failed: name must not be empty".to_string());
    }
    if file.tilewidth == 0 || file.tileheight == 0 {
        return Err("Tileset validation failed: tilewidth/tileheight must be > 0".to_string());
    }

    let mut ids = HashSet::new();
    for tile in &file.tiles {
        if !ids.insert(tile.id) {
            return Err(format!(
                "Tileset validation failed: duplicate annotation for tile id {}",
                tile.id
            ));
        }
        if file.tilecount > 0 && tile.id >= file.tilecount {
            return Err(format!(
                "Tileset validation failed: tile id {} outside tilecount {}",
                tile.id, file.tilecount
            ));
        }
        for frame in &tile.animation {
            if file.tilecount > 0 && frame.tileid >= file.tilecount {
                return Err(format!(
                    "Tileset validation failed: tile {} animates to missing tile {}",
                    tile.id, frame.tileid
                ));
            }
            if frame.duration == Some(0) {
                return Err(format!(
                    "Tileset validation failed: tile {} has a zero-length animation frame",
                    tile.id
                ));
            }
        }
        for prop in tile.properties.iter().filter(|p| p.name == GOAL_PROPERTY) {
            if !prop.value.is_boolean() {
                log::warn!(
                    "Tile {} has non-boolean '{}' property ({}); ignoring",
                    tile.id,
                    GOAL_PROPERTY,
                    prop.kind
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    const SAMPLE: &str = r#"
    {
      "name": "overworld",
      "image": "overworld.png",
      "tilewidth": 16, "tileheight": 16, "tilecount": 64, "columns": 8,
      "tiles": [
        { "id": 4, "animation": [ { "tileid": 4, "duration": 200 }, { "tileid": 5 } ] },
        { "id": 9, "properties": [ { "name": "goal", "type": "bool", "value": true } ] },
        { "id": 10, "properties": [ { "name": "goal", "type": "bool", "value": false } ] }
      ]
    }
    "#;

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "ff_tileset_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn goal_set_uses_one_based_tile_ids() {
        let tileset = parse_tileset(SAMPLE).expect("tileset should parse");
        assert!(tileset.goal_tiles().contains(&10));
        assert!(!tileset.goal_tiles().contains(&9));
        assert!(!tileset.goal_tiles().contains(&11));
        assert_eq!(tileset.classify(10), TileClass::Goal);
        assert_eq!(tileset.classify(11), TileClass::Walkable);
        assert_eq!(tileset.classify(0), TileClass::Empty);
    }

    #[test]
    fn animated_tiles_get_looping_clips_with_default_duration() {
        let tileset = parse_tileset(SAMPLE).expect("tileset should parse");
        assert!(tileset.is_animated(5));
        match tileset.drawable_for_tile(5) {
            Drawable::Animated { clip, size } => {
                assert!(clip.looping);
                assert_eq!(size, Vec2::splat(16.0));
                assert_eq!(clip.frames[0].sprite_id, "overworld:5");
                assert_eq!(clip.frames[0].duration_us, 200_000);
                assert_eq!(clip.frames[1].sprite_id, "overworld:6");
                assert_eq!(clip.frames[1].duration_us, DEFAULT_TILE_FRAME_MS * 1000);
            }
            other => panic!("expected animated drawable, got {other:?}"),
        }
    }

    #[test]
    fn static_and_empty_tiles() {
        let tileset = parse_tileset(SAMPLE).expect("tileset should parse");
        assert_eq!(
            tileset.drawable_for_tile(3),
            Drawable::Sprite {
                sprite_id: "overworld:3".to_string(),
                size: Vec2::splat(16.0),
            }
        );
        assert_eq!(
            tileset.drawable_for_tile(0),
            Drawable::Blank {
                size: Vec2::splat(16.0)
            }
        );
    }

    #[test]
    fn rejects_annotation_outside_tilecount() {
        let err = parse_tileset(
            r#"{ "name": "t", "tilewidth": 16, "tileheight": 16, "tilecount": 4,
                 "tiles": [ { "id": 4 } ] }"#,
        )
        .expect_err("id 4 of 4 should fail");
        assert!(err.contains("outside tilecount"));
    }

    #[test]
    fn rejects_duplicate_annotations() {
        let err = parse_tileset(
            r#"{ "name": "t", "tilewidth": 16, "tileheight": 16,
                 "tiles": [ { "id": 1 }, { "id": 1 } ] }"#,
        )
        .expect_err("duplicate should fail");
        assert!(err.contains("duplicate annotation"));
    }

    #[test]
    fn missing_file_names_path() {
        let path = temp_file_path("missing");
        let err = load_tileset_from_path(&path).expect_err("missing file should fail");
        assert!(err.starts_with("Failed to read tileset"));
        assert!(err.contains(&path.display().to_string()));
    }

    #[test]
    fn loads_from_disk() {
        let path = temp_file_path("ok");
        fs::write(&path, SAMPLE).expect("write tileset");
        let tileset = load_tileset_from_path(&path).expect("tileset should load");
        assert_eq!(tileset.name, "overworld");
        assert_eq!(tileset.image, "overworld.png");
        let _ = fs::remove_file(path);
    }
}
