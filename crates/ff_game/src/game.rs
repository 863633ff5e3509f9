//! Frame orchestration.
//!
//! `Game::frame` is the only entry point per frame:
//!
//!   0. advance timers, run due tasks of the live session, handle events
//!   a. title showing: update it and stop there
//!   b. alive: held keys steer the player (camera velocity), jump, zoom;
//!      dead: camera halts
//!   c. level update (falling cells, floor sweep), then reproject the level
//!   d. player update (pose, sprite frame)
//!   e. camera integrates and is handed to the scene
//!   f. handle the events the frame raised
//!
//! Level changes start a new session. Tasks scheduled under the old session
//! are cancelled, so a pending respawn cannot touch the next level.

use std::mem;
use std::path::Path;
use std::rc::Rc;

use ff_core::events::EventQueue;
use ff_core::input::{InputState, Key};
use ff_core::schedule::{Scheduler, SessionId};
use ff_core::time::{delta_to_ms, delta_to_us};
use ff_render::{Camera2D, Drawable, NodeId, SceneGraph};
use glam::Vec2;

use crate::animation::PoseClips;
use crate::config::GameConfig;
use crate::direction::DirectionMask;
use crate::levels::{read_maps, LevelManager};
use crate::map::TileMapFile;
use crate::player::{Player, PlayerConfig};
use crate::signals::{FrameCtx, GameEvent, ScheduledTask};
use crate::tilemap::TilemapConfig;
use crate::tileset::{load_tileset_from_path, Tileset};
use crate::title::TitleScreen;

const HUD_POSITION: Vec2 = Vec2::new(8.0, 8.0);
const HUD_SIZE: Vec2 = Vec2::new(96.0, 16.0);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameStats {
    pub frames: u64,
    pub deaths: u32,
    pub respawns: u32,
    pub wins: u32,
    pub stale_tasks: u32,
}

pub struct Game<S: SceneGraph> {
    scene: S,
    camera: Camera2D,
    events: EventQueue<GameEvent>,
    timers: Scheduler<ScheduledTask>,
    session: SessionId,
    tileset: Tileset,
    clips: Rc<PoseClips>,
    player_config: PlayerConfig,
    levels: LevelManager,
    player: Player,
    title: TitleScreen,
    hud: NodeId,
    transition_delay_ms: u64,
    stats: GameStats,
}

impl<S: SceneGraph> Game<S> {
    /// Load the tileset, player clips and every level named by `config`.
    /// Missing tileset or clips are errors; broken level maps only leave
    /// that level empty.
    pub fn from_config(scene: S, config: &GameConfig) -> Result<Self, String> {
        let tileset = load_tileset_from_path(&config.tileset)?;
        let clips = PoseClips::load(&config.player_animations)?;
        let maps = read_maps(&config.levels);
        Ok(Self::new(scene, config, tileset, clips, maps))
    }

    pub fn new(
        mut scene: S,
        config: &GameConfig,
        tileset: Tileset,
        clips: PoseClips,
        maps: Vec<(String, Option<TileMapFile>)>,
    ) -> Self {
        let mut camera = Camera2D::new(config.viewport.width, config.viewport.height)
            .with_zoom(config.initial_zoom);
        camera.speed = config.camera_speed;
        camera.zoom_step = config.zoom_step;

        let levels = LevelManager::load_levels(
            maps,
            &tileset,
            &mut scene,
            TilemapConfig {
                fall_speed: config.fall_speed,
                pixelate_block_px: config.pixelate_block_px,
            },
        );
        let clips = Rc::new(clips);
        let player_config = PlayerConfig::from_game(config);
        let player = Player::spawn(&mut scene, Rc::clone(&clips), player_config, &camera);
        let mut title = TitleScreen::new(&mut scene, camera.screen_center() * 2.0);
        title.display(&mut scene);
        let hud = spawn_hud(&mut scene, 0);

        log::info!(
            "game ready: {} levels, tileset '{}', animation set '{}'",
            levels.len(),
            tileset.name,
            clips.animation_id
        );

        Self {
            scene,
            camera,
            events: EventQueue::new(),
            timers: Scheduler::new(),
            session: SessionId::default(),
            tileset,
            clips,
            player_config,
            levels,
            player,
            title,
            hud,
            transition_delay_ms: config.transition_delay_ms,
            stats: GameStats::default(),
        }
    }

    pub fn frame(&mut self, delta: f32, input: &InputState) {
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        self.stats.frames += 1;

        self.run_due_tasks(delta_to_ms(delta));
        self.dispatch_events();

        if self.title.is_showing() {
            self.title.update(input, &mut self.events);
            self.dispatch_events();
            return;
        }

        if self.player.is_alive() {
            self.player
                .steer(DirectionMask::from_input(input), &mut self.camera);
            if input.is_key_pressed("space") {
                self.player.jump(&mut self.camera);
            }
            if input.is_held(Key::ZoomIn) {
                self.camera.set_zoom(1.0);
            }
            if input.is_held(Key::ZoomOut) {
                self.camera.set_zoom(-1.0);
            }
        } else {
            self.camera.halt();
        }

        let was_alive = self.player.is_alive();
        {
            let mut ctx = FrameCtx {
                scene: &mut self.scene,
                camera: &mut self.camera,
                events: &mut self.events,
                timers: &mut self.timers,
                session: self.session,
            };
            if let Some(tilemap) = self.levels.current_mut() {
                tilemap.update(delta, &mut self.player, &mut ctx);
                tilemap.reproject(ctx.camera, ctx.scene);
            }
            self.player.update(delta, &mut ctx);
        }
        if was_alive && !self.player.is_alive() {
            self.stats.deaths += 1;
        }

        self.camera.update(delta);
        self.scene.set_camera(self.camera.build_uniform());
        self.scene.advance(delta_to_us(delta));

        self.dispatch_events();
    }

    /// Follow a window resize: new projection, player re-centred.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.camera.viewport = (width, height);
        self.player.place(&mut self.scene, &self.camera);
        if let Some(tilemap) = self.levels.current() {
            tilemap.reproject(&self.camera, &mut self.scene);
        }
    }

    fn run_due_tasks(&mut self, dt_ms: f64) {
        for (session, task) in self.timers.advance(dt_ms) {
            if session != self.session {
                self.stats.stale_tasks += 1;
                log::debug!("dropping {:?} from ended {}", task, session);
                continue;
            }
            match task {
                ScheduledTask::Respawn => {
                    let mut ctx = FrameCtx {
                        scene: &mut self.scene,
                        camera: &mut self.camera,
                        events: &mut self.events,
                        timers: &mut self.timers,
                        session: self.session,
                    };
                    self.player.respawn(&mut ctx);
                }
                ScheduledTask::Reattach => {
                    self.player.attach(&mut self.scene);
                    self.scene.attach(self.hud);
                    log::debug!("player back on stage ({})", self.session);
                }
            }
        }
    }

    fn dispatch_events(&mut self) {
        let mut advanced = false;
        while let Some(event) = self.events.pop() {
            log::trace!("handling {:?}", event);
            match event {
                GameEvent::TitlePlayClicked => self.start_from_title(),
                GameEvent::DeadNoLonger => self.restart_level(),
                GameEvent::LevelWon if advanced => {
                    log::debug!("extra level win in the same frame ignored");
                }
                GameEvent::LevelWon => {
                    advanced = true;
                    self.advance_level();
                }
            }
        }
    }

    fn start_from_title(&mut self) {
        if !self.title.is_showing() {
            return;
        }
        self.title.hide(&mut self.scene);
        self.begin_session();
        self.levels.choose_level(0, &self.tileset, &mut self.scene);
        self.camera.reset();
        self.camera.halt();
        self.replace_player();
        self.refresh_hud(0);
        self.player.attach(&mut self.scene);
        self.scene.attach(self.hud);
        self.reproject_current();
    }

    fn restart_level(&mut self) {
        self.stats.respawns += 1;
        if let Some(tilemap) = self.levels.current_mut() {
            tilemap.reset(&self.tileset, &mut self.scene);
            tilemap.reproject(&self.camera, &mut self.scene);
        }
    }

    fn advance_level(&mut self) {
        self.stats.wins += 1;
        self.begin_session();
        let next = self.levels.advance(&self.tileset, &mut self.scene);
        self.camera.reset();
        self.camera.halt();
        self.replace_player();
        self.scene.detach(self.hud);
        self.refresh_hud(next);
        self.reproject_current();
        self.timers.schedule(
            self.transition_delay_ms as f64,
            self.session,
            ScheduledTask::Reattach,
        );
        log::info!("advancing to level {} ({})", next, self.session);
    }

    fn begin_session(&mut self) {
        let cancelled = self.timers.cancel_session(self.session);
        if cancelled > 0 {
            log::debug!("{} cancelled {} pending tasks", self.session, cancelled);
        }
        self.session = self.session.next();
    }

    /// Swap in a fresh, detached player.
    fn replace_player(&mut self) {
        let fresh = Player::spawn(
            &mut self.scene,
            Rc::clone(&self.clips),
            self.player_config,
            &self.camera,
        );
        let old = mem::replace(&mut self.player, fresh);
        old.despawn(&mut self.scene);
    }

    fn refresh_hud(&mut self, level_index: usize) {
        let attached = self.scene.is_attached(self.hud);
        self.scene.destroy(self.hud);
        self.hud = spawn_hud(&mut self.scene, level_index);
        if attached {
            self.scene.attach(self.hud);
        }
    }

    fn reproject_current(&mut self) {
        if let Some(tilemap) = self.levels.current() {
            tilemap.reproject(&self.camera, &mut self.scene);
        }
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn levels(&self) -> &LevelManager {
        &self.levels
    }

    pub fn title(&self) -> &TitleScreen {
        &self.title
    }

    pub fn hud(&self) -> NodeId {
        self.hud
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn stats(&self) -> GameStats {
        self.stats
    }

    pub fn pending_tasks(&self) -> usize {
        self.timers.pending_count()
    }
}

fn spawn_hud(scene: &mut dyn SceneGraph, level_index: usize) -> NodeId {
    let hud = scene.spawn(Drawable::Label {
        text: format!("LEVEL {}", level_index + 1),
        size: HUD_SIZE,
    });
    scene.set_position(hud, HUD_POSITION);
    hud
}

/// Build a game from a config file on disk.
pub fn load_game<S: SceneGraph>(scene: S, config_path: &Path) -> Result<(Game<S>, GameConfig), String> {
    let config = crate::config::load_config_from_path(config_path)?;
    let game = Game::from_config(scene, &config)?;
    Ok((game, config))
}
