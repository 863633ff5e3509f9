//! Level map documents: row-major tile layers exported from a tile editor.
//!
//! Only `visible` layers contribute cells, concatenated in document order.
//! Each layer is indexed by its own `width`.

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Tile editors store flip/rotation flags in the top bits of a tile id.
const TILE_FLAG_MASK: u32 = 0xF000_0000;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TileMapFile {
    pub width: u32,
    pub height: u32,
    pub tilewidth: u32,
    pub tileheight: u32,
    #[serde(default)]
    pub backgroundcolor: Option<String>,
    pub layers: Vec<TileLayer>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TileLayer {
    #[serde(default)]
    pub name: String,
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub data: Vec<u32>,
}

/// One cell of a visible layer, in level load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapCell {
    pub tile_id: u32,
    pub column: u32,
    pub row: u32,
}

impl TileMapFile {
    pub fn visible_layers(&self) -> impl Iterator<Item = &TileLayer> {
        self.layers.iter().filter(|layer| layer.visible)
    }

    /// Every visible cell in row-major order per layer, layers in order.
    pub fn cells(&self) -> impl Iterator<Item = MapCell> + '_ {
        self.visible_layers().flat_map(|layer| {
            let width = layer.width.max(1);
            layer
                .data
                .iter()
                .enumerate()
                .map(move |(index, &raw)| MapCell {
                    tile_id: strip_tile_flags(raw),
                    column: index as u32 % width,
                    row: index as u32 / width,
                })
        })
    }

    pub fn cell_count(&self) -> usize {
        self.visible_layers().map(|layer| layer.data.len()).sum()
    }

    pub fn background_color(&self) -> Option<u32> {
        self.backgroundcolor
            .as_deref()
            .and_then(parse_background_color)
    }
}

pub fn strip_tile_flags(raw: u32) -> u32 {
    raw & !TILE_FLAG_MASK
}

/// Parse `#rrggbb` or `#aarrggbb` into `0xrrggbb`.
pub fn parse_background_color(raw: &str) -> Option<u32> {
    let hex = raw.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    let rgb = match hex.len() {
        6 => hex,
        8 => &hex[2..],
        _ => return None,
    };
    u32::from_str_radix(rgb, 16).ok()
}

pub fn load_map_from_path(path: &Path) -> Result<TileMapFile, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read map file {}: {e}", path.display()))?;
    parse_map(&raw).map_err(|e| format!("Map {}: {e}", path.display()))
}

pub fn parse_map(raw: &str) -> Result<TileMapFile, String> {
    let map: TileMapFile =
        serde_json::from_str(raw).map_err(|e| format!("Failed to parse map JSON: {e}"))?;
    validate_map(&map)?;
    Ok(map)
}

fn validate_map(map: &TileMapFile) -> Result<(), String> {
    if map.tilewidth == 0 || map.tileheight == 0 {
        return Err("Map validation failed: tilewidth and tileheight must be > 0".to_string());
    }
    if map.visible_layers().next().is_none() {
        log::warn!("Map has no visible layers; the level will be empty");
    }
    for (i, layer) in map.visible_layers().enumerate() {
        if layer.width == 0 {
            return Err(format!(
                "Map validation failed: visible layer {} ('{}') has zero width",
                i, layer.name
            ));
        }
        let expected = layer.width as usize * layer.height as usize;
        if layer.data.len() != expected {
            return Err(format!(
                "Map validation failed: layer '{}' has {} cells, expected {}x{}={}",
                layer.name,
                layer.data.len(),
                layer.width,
                layer.height,
                expected
            ));
        }
    }
    if let Some(color) = &map.backgroundcolor {
        if parse_background_color(color).is_none() {
            log::warn!("Ignoring unparseable map background color '{color}'");
        }
    }
    Ok(())
}

const fn default_visible() -> bool {
    true
}
