//! Ordered level list with exactly one level on stage at a time.

use std::path::Path;

use ff_render::SceneGraph;

use crate::map::{load_map_from_path, TileMapFile};
use crate::tilemap::{Tilemap, TilemapConfig};
use crate::tileset::TileSource;

/// Read every map, keeping going past broken ones: a level whose map cannot
/// be read is built empty.
pub fn read_maps<P: AsRef<Path>>(paths: &[P]) -> Vec<(String, Option<TileMapFile>)> {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            let map = match load_map_from_path(path) {
                Ok(map) => Some(map),
                Err(err) => {
                    log::error!("{err}");
                    None
                }
            };
            (name, map)
        })
        .collect()
}

pub struct LevelManager {
    levels: Vec<Tilemap>,
    current: Option<usize>,
}

impl LevelManager {
    pub fn load_levels(
        maps: Vec<(String, Option<TileMapFile>)>,
        tiles: &dyn TileSource,
        scene: &mut dyn SceneGraph,
        config: TilemapConfig,
    ) -> Self {
        let levels: Vec<Tilemap> = maps
            .into_iter()
            .map(|(name, map)| {
                let mut tilemap = Tilemap::new(name, scene, config);
                tilemap.load_level(map, tiles, scene);
                tilemap
            })
            .collect();
        log::info!("{} levels loaded", levels.len());
        Self {
            levels,
            current: None,
        }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&Tilemap> {
        self.current.and_then(|i| self.levels.get(i))
    }

    pub fn current_mut(&mut self) -> Option<&mut Tilemap> {
        match self.current {
            Some(i) => self.levels.get_mut(i),
            None => None,
        }
    }

    pub fn level(&self, index: usize) -> Option<&Tilemap> {
        self.levels.get(index)
    }

    /// Put level `index` on stage, fresh, hiding whatever was there.
    pub fn choose_level(
        &mut self,
        index: usize,
        tiles: &dyn TileSource,
        scene: &mut dyn SceneGraph,
    ) -> Option<&mut Tilemap> {
        if index >= self.levels.len() {
            log::warn!(
                "level index {index} out of range ({} levels)",
                self.levels.len()
            );
            return None;
        }
        if let Some(current) = self.current.and_then(|i| self.levels.get_mut(i)) {
            current.hide_level(scene);
        }
        let level = &mut self.levels[index];
        level.reset(tiles, scene);
        level.show_level(scene);
        log::info!("level {} ('{}') chosen", index, level.name());
        self.current = Some(index);
        Some(level)
    }

    /// Index after the current one, wrapping past the last level.
    pub fn next_index(&self) -> usize {
        match (self.current, self.levels.len()) {
            (_, 0) => 0,
            (Some(i), len) => (i + 1) % len,
            (None, _) => 0,
        }
    }

    pub fn advance(&mut self, tiles: &dyn TileSource, scene: &mut dyn SceneGraph) -> usize {
        let next = self.next_index();
        self.choose_level(next, tiles, scene);
        next
    }
}
