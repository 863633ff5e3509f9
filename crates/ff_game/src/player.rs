//! The player: a screen-fixed sprite that steers the camera.
//!
//! The player never moves on screen. Its locomotion intent becomes camera
//! velocity, so the level slides underneath it; `world_position` is simply
//! where the camera is looking.
//!
//! Life cycle: alive -> `dead()` -> (death time) -> `respawn()` -> alive.
//! Jumping is a sub-state of alive that ends when the jump clip has played
//! through once.

use std::rc::Rc;

use ff_core::animation::AnimationState;
use ff_core::events::EventQueue;
use ff_core::time::delta_to_us;
use ff_render::{Camera2D, Drawable, Filter, NodeId, SceneGraph};
use glam::Vec2;

use crate::animation::{Pose, PoseClips};
use crate::config::GameConfig;
use crate::direction::{DirectionMask, Facing};
use crate::signals::{FrameCtx, GameEvent, ScheduledTask};

const DEATH_OVERLAY_COLOR: u32 = 0x20_0008;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerConfig {
    pub size: Vec2,
    pub jump_distance: f32,
    pub death_time_ms: u64,
}

impl PlayerConfig {
    pub fn from_game(config: &GameConfig) -> Self {
        Self {
            size: Vec2::from(config.player_size),
            jump_distance: config.jump_distance,
            death_time_ms: config.death_time_ms,
        }
    }
}

pub struct Player {
    node: NodeId,
    overlay: NodeId,
    clips: Rc<PoseClips>,
    config: PlayerConfig,
    facing: Facing,
    intent: Vec2,
    pose: Pose,
    anim: AnimationState,
    world_position: Vec2,
    alive: bool,
    has_moved: bool,
    jump_available: bool,
    currently_jumping: bool,
}

impl Player {
    /// Create the sprite and the (detached) death overlay. The player is not
    /// put on stage here.
    pub fn spawn(
        scene: &mut dyn SceneGraph,
        clips: Rc<PoseClips>,
        config: PlayerConfig,
        camera: &Camera2D,
    ) -> Self {
        let facing = Facing::default();
        let pose = Pose::idle(facing);
        let node = scene.spawn(Drawable::Sprite {
            sprite_id: clips.clip(pose).first_sprite().to_string(),
            size: config.size,
        });
        let overlay = scene.spawn(Drawable::Rect {
            size: camera.screen_center() * 2.0,
            color: DEATH_OVERLAY_COLOR,
        });
        scene.add_filter(overlay, Filter::DeathTint);

        let player = Self {
            node,
            overlay,
            clips,
            config,
            facing,
            intent: Vec2::ZERO,
            pose,
            anim: AnimationState::new(pose.clip_name()),
            world_position: camera.position,
            alive: true,
            has_moved: false,
            jump_available: true,
            currently_jumping: false,
        };
        player.place(scene, camera);
        player
    }

    /// Centre the sprite on the viewport.
    pub fn place(&self, scene: &mut dyn SceneGraph, camera: &Camera2D) {
        scene.set_position(self.node, camera.screen_center() - self.config.size * 0.5);
    }

    pub fn despawn(self, scene: &mut dyn SceneGraph) {
        scene.destroy(self.node);
        scene.destroy(self.overlay);
    }

    pub fn attach(&self, scene: &mut dyn SceneGraph) -> bool {
        scene.attach(self.node)
    }

    pub fn detach(&self, scene: &mut dyn SceneGraph) -> bool {
        scene.detach(self.node)
    }

    pub fn is_attached(&self, scene: &dyn SceneGraph) -> bool {
        scene.is_attached(self.node)
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn overlay(&self) -> NodeId {
        self.overlay
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    pub fn jump_available(&self) -> bool {
        self.jump_available
    }

    pub fn is_jumping(&self) -> bool {
        self.currently_jumping
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn intent(&self) -> Vec2 {
        self.intent
    }

    pub fn world_position(&self) -> Vec2 {
        self.world_position
    }

    /// Fold held directions into facing and intent, and hand the intent to the
    /// camera as velocity.
    pub fn steer(&mut self, mask: DirectionMask, camera: &mut Camera2D) {
        if !self.alive {
            self.intent = Vec2::ZERO;
            camera.halt();
            return;
        }
        self.facing.apply(mask);
        self.intent = mask.intent();
        if self.intent != Vec2::ZERO && !self.has_moved {
            self.has_moved = true;
            log::debug!("player started moving");
        }
        camera.set_velocity_from_intent(self.intent);
    }

    /// Leap `jump_distance` along the current intent. Needs a jump in hand and
    /// somewhere to go.
    pub fn jump(&mut self, camera: &mut Camera2D) -> bool {
        if !self.alive || !self.jump_available || self.intent == Vec2::ZERO {
            return false;
        }
        camera.position += self.intent.normalize_or_zero() * self.config.jump_distance;
        self.jump_available = false;
        self.currently_jumping = true;
        self.has_moved = true;
        self.set_pose(Pose::jump(self.intent));
        log::debug!("jump toward {:?}", self.intent);
        true
    }

    /// Returns true only on the alive -> dead transition.
    pub fn dead(&mut self, ctx: &mut FrameCtx<'_>) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        self.intent = Vec2::ZERO;
        self.currently_jumping = false;
        ctx.camera.halt();
        if !ctx.scene.is_attached(self.overlay) {
            ctx.scene.attach(self.overlay);
        }
        self.set_pose(Pose::Dead);
        ctx.timers.schedule(
            self.config.death_time_ms as f64,
            ctx.session,
            ScheduledTask::Respawn,
        );
        log::info!(
            "player died at {:?}; respawn in {} ms ({})",
            self.world_position,
            self.config.death_time_ms,
            ctx.session
        );
        true
    }

    /// Returns true only on the dead -> alive transition.
    pub fn respawn(&mut self, ctx: &mut FrameCtx<'_>) -> bool {
        if self.alive {
            return false;
        }
        ctx.camera.reset();
        ctx.camera.halt();
        if ctx.scene.is_attached(self.overlay) {
            ctx.scene.detach(self.overlay);
        }
        self.alive = true;
        self.has_moved = false;
        self.jump_available = true;
        self.currently_jumping = false;
        self.intent = Vec2::ZERO;
        self.world_position = ctx.camera.position;
        self.set_pose(Pose::idle(self.facing));
        ctx.events.send(GameEvent::DeadNoLonger);
        log::info!("player respawned");
        true
    }

    pub fn win(&self, events: &mut EventQueue<GameEvent>) {
        log::info!("goal reached at {:?}", self.world_position);
        events.send(GameEvent::LevelWon);
    }

    /// Pick the pose, play it, and finish the jump once its clip has cycled.
    pub fn update(&mut self, delta: f32, ctx: &mut FrameCtx<'_>) {
        self.world_position = ctx.camera.position;
        if !self.alive {
            self.set_pose(Pose::Dead);
        } else if !self.currently_jumping {
            self.set_pose(Pose::locomotion(self.facing, self.intent));
        }

        let frame = self
            .anim
            .tick(delta_to_us(delta), self.clips.clip(self.pose));
        ctx.scene.set_sprite(self.node, frame);

        if self.currently_jumping && self.anim.cycles > 0 {
            self.currently_jumping = false;
            self.jump_available = true;
            log::debug!("jump landed at {:?}", self.world_position);
        }
    }

    fn set_pose(&mut self, pose: Pose) {
        if self.pose != pose {
            self.pose = pose;
            self.anim.restart(pose.clip_name());
        }
    }
}
