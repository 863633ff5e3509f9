//! Cross-component signals and the per-frame context that carries them.
//!
//! Components never call the orchestrator back. They push a [`GameEvent`]
//! (handled after the frame's simulation) or schedule a [`ScheduledTask`]
//! tagged with the current session, which the orchestrator drops if the
//! level has changed by the time it comes due.

use ff_core::events::EventQueue;
use ff_core::schedule::{Scheduler, SessionId};
use ff_render::{Camera2D, SceneGraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    TitlePlayClicked,
    DeadNoLonger,
    LevelWon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledTask {
    Respawn,
    /// Put the player and HUD back on stage after a level change.
    Reattach,
}

pub struct FrameCtx<'a> {
    pub scene: &'a mut dyn SceneGraph,
    pub camera: &'a mut Camera2D,
    pub events: &'a mut EventQueue<GameEvent>,
    pub timers: &'a mut Scheduler<ScheduledTask>,
    pub session: SessionId,
}
