//! One level's tiles on screen, and the per-frame floor check.
//!
//! Cells live under a single container node in load order, so cell index `i`
//! is both the i-th tile id of the level and the i-th rendered child. The
//! container carries the camera transform; cells only know their local grid
//! position.

use ff_render::{Camera2D, Drawable, Filter, NodeId, SceneGraph};
use glam::Vec2;

use crate::collision::{self, FallingSet, SweepReport, TileClass};
use crate::map::TileMapFile;
use crate::player::Player;
use crate::signals::FrameCtx;
use crate::tileset::TileSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelPhase {
    Loading,
    Showing,
    Hidden,
}

#[derive(Debug, Clone, Copy)]
struct TileCell {
    node: NodeId,
    tile_id: u32,
    class: TileClass,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilemapConfig {
    pub fall_speed: f32,
    pub pixelate_block_px: f32,
}

pub struct Tilemap {
    name: String,
    container: NodeId,
    map: Option<TileMapFile>,
    cells: Vec<TileCell>,
    falling: FallingSet,
    background: Option<u32>,
    phase: LevelPhase,
    config: TilemapConfig,
}

impl Tilemap {
    pub fn new(name: impl Into<String>, scene: &mut dyn SceneGraph, config: TilemapConfig) -> Self {
        Self {
            name: name.into(),
            container: scene.spawn(Drawable::Container),
            map: None,
            cells: Vec::new(),
            falling: FallingSet::new(),
            background: None,
            phase: LevelPhase::Loading,
            config,
        }
    }

    /// Build a cell per visible map entry. `None` leaves the level empty.
    pub fn load_level(
        &mut self,
        map: Option<TileMapFile>,
        tiles: &dyn TileSource,
        scene: &mut dyn SceneGraph,
    ) {
        let Some(map) = map else {
            log::warn!("level '{}': no map data, staying empty", self.name);
            self.finish_loading();
            return;
        };
        self.clear_tiles(scene);

        let cell_size = Vec2::new(map.tilewidth as f32, map.tileheight as f32);
        for cell in map.cells() {
            let node = scene.spawn(tiles.drawable_for_tile(cell.tile_id));
            scene.add_child(self.container, node);
            scene.set_position(
                node,
                Vec2::new(cell.column as f32, cell.row as f32) * cell_size,
            );
            self.cells.push(TileCell {
                node,
                tile_id: cell.tile_id,
                class: tiles.classify(cell.tile_id),
            });
        }
        self.background = map.background_color();
        if tiles.tile_size() != cell_size {
            log::warn!(
                "level '{}': map cells are {:?} but tileset tiles are {:?}",
                self.name,
                cell_size,
                tiles.tile_size()
            );
        }
        log::info!(
            "level '{}' loaded: {} cells, {} goal cells",
            self.name,
            self.cells.len(),
            self.cells
                .iter()
                .filter(|c| c.class == TileClass::Goal)
                .count()
        );
        self.map = Some(map);
        self.finish_loading();
    }

    fn finish_loading(&mut self) {
        if self.phase == LevelPhase::Loading {
            self.phase = LevelPhase::Hidden;
        }
    }

    fn clear_tiles(&mut self, scene: &mut dyn SceneGraph) {
        for cell in self.cells.drain(..) {
            scene.destroy(cell.node);
        }
        self.falling.clear();
        scene.clear_filters(self.container);
    }

    /// Rebuild from the retained map: every cell back in place, nothing
    /// falling, no pixelation.
    pub fn reset(&mut self, tiles: &dyn TileSource, scene: &mut dyn SceneGraph) {
        self.clear_tiles(scene);
        let map = self.map.take();
        self.load_level(map, tiles, scene);
    }

    pub fn show_level(&mut self, scene: &mut dyn SceneGraph) -> bool {
        if let Some(color) = self.background {
            scene.set_background(color);
        }
        self.phase = LevelPhase::Showing;
        scene.attach(self.container)
    }

    pub fn hide_level(&mut self, scene: &mut dyn SceneGraph) -> bool {
        if self.phase == LevelPhase::Showing {
            self.phase = LevelPhase::Hidden;
        }
        scene.detach(self.container)
    }

    /// Sink falling cells, then check what is under the player.
    pub fn update(&mut self, delta: f32, player: &mut Player, ctx: &mut FrameCtx<'_>) -> SweepReport {
        let drop = Vec2::new(0.0, self.config.fall_speed * delta.max(0.0));
        for index in self.falling.iter() {
            if let Some(cell) = self.cells.get(index) {
                ctx.scene.translate(cell.node, drop);
            }
        }

        if self.phase != LevelPhase::Showing || !player.is_attached(&*ctx.scene) {
            return SweepReport::default();
        }

        let scene = &*ctx.scene;
        let player_node = player.node();
        let overlapping = self
            .cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.tile_id != 0 && scene.box_overlap(player_node, cell.node))
            .map(|(index, cell)| (index, cell.class));
        let report = collision::sweep(overlapping, player.has_moved(), &mut self.falling);

        if !report.newly_falling.is_empty() {
            log::trace!(
                "level '{}': cells {:?} start falling",
                self.name,
                report.newly_falling
            );
        }
        if report.goal_reached {
            player.win(ctx.events);
        } else if !report.supported && player.dead(ctx) {
            ctx.scene.add_filter(
                self.container,
                Filter::Pixelate {
                    block_px: self.config.pixelate_block_px,
                },
            );
        }
        report
    }

    /// Place the container so the camera position lands on screen centre.
    pub fn reproject(&self, camera: &Camera2D, scene: &mut dyn SceneGraph) {
        scene.set_position(self.container, camera.world_origin_on_screen());
        scene.set_scale(self.container, camera.zoom());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    pub fn is_showing(&self) -> bool {
        self.phase == LevelPhase::Showing
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn tile_count(&self) -> usize {
        self.cells.len()
    }

    pub fn tile_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.cells.iter().map(|c| c.tile_id)
    }

    pub fn tile_node(&self, index: usize) -> Option<NodeId> {
        self.cells.get(index).map(|c| c.node)
    }

    pub fn falling(&self) -> &FallingSet {
        &self.falling
    }

    pub fn background_color(&self) -> Option<u32> {
        self.background
    }

    pub fn has_map(&self) -> bool {
        self.map.is_some()
    }
}
