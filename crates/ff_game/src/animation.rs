//! Player poses and the clip set that plays them.
//!
//! Wraps the core `AnimationFile` from `ff_core::animation`. Every pose must
//! have a clip; a set missing one is refused at load, so lookups at runtime
//! cannot fail.

use std::path::Path;

use ff_core::animation::{load_animation_file, AnimationClip, AnimationFile};
use glam::Vec2;

use crate::direction::{Facing, Horizontal, Vertical};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pose {
    IdleUpLeft,
    IdleUpRight,
    IdleDownLeft,
    IdleDownRight,
    RunLeft,
    RunUpLeft,
    RunRight,
    RunUpRight,
    JumpLeft,
    JumpRight,
    JumpUpDown,
    Dead,
}

impl Pose {
    pub const ALL: [Pose; 12] = [
        Pose::IdleUpLeft,
        Pose::IdleUpRight,
        Pose::IdleDownLeft,
        Pose::IdleDownRight,
        Pose::RunLeft,
        Pose::RunUpLeft,
        Pose::RunRight,
        Pose::RunUpRight,
        Pose::JumpLeft,
        Pose::JumpRight,
        Pose::JumpUpDown,
        Pose::Dead,
    ];

    pub fn clip_name(self) -> &'static str {
        match self {
            Pose::IdleUpLeft => "idle_up_left",
            Pose::IdleUpRight => "idle_up_right",
            Pose::IdleDownLeft => "idle_down_left",
            Pose::IdleDownRight => "idle_down_right",
            Pose::RunLeft => "run_left",
            Pose::RunUpLeft => "run_up_left",
            Pose::RunRight => "run_right",
            Pose::RunUpRight => "run_up_right",
            Pose::JumpLeft => "jump_left",
            Pose::JumpRight => "jump_right",
            Pose::JumpUpDown => "jump_up_down",
            Pose::Dead => "dead",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    pub fn is_jump(self) -> bool {
        matches!(self, Pose::JumpLeft | Pose::JumpRight | Pose::JumpUpDown)
    }

    pub fn idle(facing: Facing) -> Pose {
        match (facing.vertical, facing.horizontal) {
            (Vertical::Up, Horizontal::Left) => Pose::IdleUpLeft,
            (Vertical::Up, Horizontal::Right) => Pose::IdleUpRight,
            (Vertical::Down, Horizontal::Left) => Pose::IdleDownLeft,
            (Vertical::Down, Horizontal::Right) => Pose::IdleDownRight,
        }
    }

    /// Pose for a grounded frame. Pure vertical travel runs toward the side
    /// the player last faced.
    pub fn locomotion(facing: Facing, intent: Vec2) -> Pose {
        if intent == Vec2::ZERO {
            return Pose::idle(facing);
        }
        let side = if intent.x < 0.0 {
            Horizontal::Left
        } else if intent.x > 0.0 {
            Horizontal::Right
        } else {
            facing.horizontal
        };
        let climbing = intent.y != 0.0 && facing.vertical == Vertical::Up;
        match (side, climbing) {
            (Horizontal::Left, true) => Pose::RunUpLeft,
            (Horizontal::Left, false) => Pose::RunLeft,
            (Horizontal::Right, true) => Pose::RunUpRight,
            (Horizontal::Right, false) => Pose::RunRight,
        }
    }

    pub fn jump(intent: Vec2) -> Pose {
        if intent.x < 0.0 {
            Pose::JumpLeft
        } else if intent.x > 0.0 {
            Pose::JumpRight
        } else {
            Pose::JumpUpDown
        }
    }
}

/// One clip per pose, indexed by pose.
#[derive(Debug, Clone)]
pub struct PoseClips {
    pub animation_id: String,
    clips: Vec<AnimationClip>,
}

impl PoseClips {
    pub fn from_file(mut file: AnimationFile) -> Result<Self, String> {
        let names: Vec<&str> = Pose::ALL.iter().map(|p| p.clip_name()).collect();
        file.require_clips(&names)?;

        let mut clips = Vec::with_capacity(Pose::ALL.len());
        for pose in Pose::ALL {
            let clip = file.animations.remove(pose.clip_name()).ok_or_else(|| {
                format!(
                    "Animation set '{}' is missing required clip '{}'",
                    file.animation_id,
                    pose.clip_name()
                )
            })?;
            clips.push(clip);
        }
        for extra in file.animations.keys() {
            log::debug!(
                "Animation set '{}' clip '{}' is not used by any pose",
                file.animation_id,
                extra
            );
        }

        Ok(Self {
            animation_id: file.animation_id,
            clips,
        })
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let file = load_animation_file(path)?;
        Self::from_file(file).map_err(|e| format!("{}: {e}", path.display()))
    }

    pub fn clip(&self, pose: Pose) -> &AnimationClip {
        &self.clips[pose.index()]
    }
}
