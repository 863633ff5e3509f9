//! Render-tree contract and a retained, headless implementation.
//!
//! Gameplay never draws. It creates drawables, parents them, moves them,
//! toggles filters and asks whether two of them overlap on screen. The
//! [`SceneGraph`] trait is that whole surface; a GPU backend implements it by
//! drawing what [`RetainedScene`] merely records.
//!
//! Nodes attached to the stage are drawn. Children of a container are drawn
//! when their container is. Positions are top-left anchored and local to the
//! parent; a parent's scale applies to its children's offsets and sizes.

use std::collections::HashMap;
use std::mem;

use ff_core::animation::{AnimationClip, AnimationState};
use glam::Vec2;

use crate::camera::CameraUniform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

/// Axis-aligned box in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self {
            min,
            max: min + size,
        }
    }

    pub fn from_center_half(center: Vec2, half: Vec2) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Strict overlap: boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Drawable {
    /// Groups children; its bounds are the union of theirs.
    Container,
    /// Occupies space but draws nothing (empty tile cells).
    Blank { size: Vec2 },
    Sprite { sprite_id: String, size: Vec2 },
    Animated { clip: AnimationClip, size: Vec2 },
    Rect { size: Vec2, color: u32 },
    Label { text: String, size: Vec2 },
}

impl Drawable {
    pub fn size(&self) -> Option<Vec2> {
        match self {
            Drawable::Container => None,
            Drawable::Blank { size }
            | Drawable::Sprite { size, .. }
            | Drawable::Animated { size, .. }
            | Drawable::Rect { size, .. }
            | Drawable::Label { size, .. } => Some(*size),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Filter {
    /// Darkening overlay while the player is dead.
    DeathTint,
    /// Blocky pixelation applied to the level on death.
    Pixelate { block_px: f32 },
}

impl Filter {
    fn same_kind(&self, other: &Filter) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }
}

pub trait SceneGraph {
    fn spawn(&mut self, drawable: Drawable) -> NodeId;

    /// Remove a node and its whole subtree. Unknown ids are ignored.
    fn destroy(&mut self, node: NodeId);

    /// Parent `child` under `parent`, detaching it from wherever it was.
    fn add_child(&mut self, parent: NodeId, child: NodeId) -> bool;

    /// Attach to the stage. Returns false if already attached or unknown.
    fn attach(&mut self, node: NodeId) -> bool;

    /// Detach from the stage. Returns false if it was not attached.
    fn detach(&mut self, node: NodeId) -> bool;

    fn is_attached(&self, node: NodeId) -> bool;

    fn set_position(&mut self, node: NodeId, position: Vec2);

    fn position(&self, node: NodeId) -> Option<Vec2>;

    fn translate(&mut self, node: NodeId, offset: Vec2) {
        if let Some(position) = self.position(node) {
            self.set_position(node, position + offset);
        }
    }

    fn set_scale(&mut self, node: NodeId, scale: f32);

    fn set_sprite(&mut self, node: NodeId, sprite_id: &str);

    /// Add a filter unless one of the same kind is present. Returns whether it
    /// was added.
    fn add_filter(&mut self, node: NodeId, filter: Filter) -> bool;

    fn clear_filters(&mut self, node: NodeId);

    fn has_filter(&self, node: NodeId, filter: Filter) -> bool;

    /// Screen-space bounds after all parent transforms.
    fn world_bounds(&self, node: NodeId) -> Option<Aabb>;

    fn box_overlap(&self, a: NodeId, b: NodeId) -> bool {
        match (self.world_bounds(a), self.world_bounds(b)) {
            (Some(a), Some(b)) => a.overlaps(&b),
            _ => false,
        }
    }

    fn set_background(&mut self, color: u32);

    fn set_camera(&mut self, uniform: CameraUniform);

    /// Advance self-playing drawables (animated tiles) by `dt_us`.
    fn advance(&mut self, dt_us: u64);
}

#[derive(Debug, Clone)]
struct Node {
    drawable: Drawable,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    position: Vec2,
    scale: f32,
    filters: Vec<Filter>,
    sprite: String,
    anim: Option<AnimationState>,
}

/// In-memory render tree. Used headless and as the source of truth a drawing
/// backend would read each frame.
#[derive(Debug, Default)]
pub struct RetainedScene {
    nodes: HashMap<NodeId, Node>,
    stage: Vec<NodeId>,
    next_id: u32,
    background: Option<u32>,
    camera: Option<CameraUniform>,
}

impl RetainedScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Stage children in draw order.
    pub fn stage(&self) -> &[NodeId] {
        &self.stage
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(&node)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn sprite(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(&node).map(|n| n.sprite.as_str())
    }

    pub fn scale(&self, node: NodeId) -> Option<f32> {
        self.nodes.get(&node).map(|n| n.scale)
    }

    pub fn filters(&self, node: NodeId) -> &[Filter] {
        self.nodes
            .get(&node)
            .map(|n| n.filters.as_slice())
            .unwrap_or(&[])
    }

    pub fn background(&self) -> Option<u32> {
        self.background
    }

    pub fn camera(&self) -> Option<&CameraUniform> {
        self.camera.as_ref()
    }

    fn unlink(&mut self, node: NodeId) {
        let parent = self.nodes.get_mut(&node).and_then(|n| n.parent.take());
        if let Some(parent) = parent {
            if let Some(p) = self.nodes.get_mut(&parent) {
                p.children.retain(|c| *c != node);
            }
        }
        self.stage.retain(|n| *n != node);
    }

    /// Translation and scale after applying every ancestor.
    fn world_transform(&self, node: NodeId) -> Option<(Vec2, f32)> {
        let n = self.nodes.get(&node)?;
        match n.parent {
            Some(parent) => {
                let (parent_pos, parent_scale) = self.world_transform(parent)?;
                Some((parent_pos + n.position * parent_scale, parent_scale * n.scale))
            }
            None => Some((n.position, n.scale)),
        }
    }
}

impl SceneGraph for RetainedScene {
    fn spawn(&mut self, drawable: Drawable) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        let (sprite, anim) = match &drawable {
            Drawable::Sprite { sprite_id, .. } => (sprite_id.clone(), None),
            Drawable::Animated { clip, .. } => {
                (clip.first_sprite().to_string(), Some(AnimationState::new("tile")))
            }
            _ => (String::new(), None),
        };
        self.nodes.insert(
            id,
            Node {
                drawable,
                parent: None,
                children: Vec::new(),
                position: Vec2::ZERO,
                scale: 1.0,
                filters: Vec::new(),
                sprite,
                anim,
            },
        );
        id
    }

    fn destroy(&mut self, node: NodeId) {
        if !self.nodes.contains_key(&node) {
            log::trace!("destroy ignored for unknown node {:?}", node);
            return;
        }
        self.unlink(node);
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(removed) = self.nodes.remove(&id) {
                stack.extend(removed.children);
            }
        }
    }

    fn add_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if parent == child || !self.nodes.contains_key(&parent) || !self.nodes.contains_key(&child)
        {
            return false;
        }
        self.unlink(child);
        if let Some(c) = self.nodes.get_mut(&child) {
            c.parent = Some(parent);
        }
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(child);
        }
        true
    }

    fn attach(&mut self, node: NodeId) -> bool {
        if !self.nodes.contains_key(&node) || self.stage.contains(&node) {
            return false;
        }
        self.unlink(node);
        self.stage.push(node);
        true
    }

    fn detach(&mut self, node: NodeId) -> bool {
        let before = self.stage.len();
        self.stage.retain(|n| *n != node);
        self.stage.len() != before
    }

    fn is_attached(&self, node: NodeId) -> bool {
        self.stage.contains(&node)
    }

    fn set_position(&mut self, node: NodeId, position: Vec2) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.position = position;
        }
    }

    fn position(&self, node: NodeId) -> Option<Vec2> {
        self.nodes.get(&node).map(|n| n.position)
    }

    fn set_scale(&mut self, node: NodeId, scale: f32) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.scale = scale;
        }
    }

    fn set_sprite(&mut self, node: NodeId, sprite_id: &str) {
        if let Some(n) = self.nodes.get_mut(&node) {
            if n.sprite != sprite_id {
                n.sprite = sprite_id.to_string();
            }
        }
    }

    fn add_filter(&mut self, node: NodeId, filter: Filter) -> bool {
        match self.nodes.get_mut(&node) {
            Some(n) if !n.filters.iter().any(|f| f.same_kind(&filter)) => {
                n.filters.push(filter);
                true
            }
            _ => false,
        }
    }

    fn clear_filters(&mut self, node: NodeId) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.filters.clear();
        }
    }

    fn has_filter(&self, node: NodeId, filter: Filter) -> bool {
        self.nodes
            .get(&node)
            .is_some_and(|n| n.filters.iter().any(|f| f.same_kind(&filter)))
    }

    fn world_bounds(&self, node: NodeId) -> Option<Aabb> {
        let n = self.nodes.get(&node)?;
        match n.drawable.size() {
            Some(size) => {
                let (pos, scale) = self.world_transform(node)?;
                Some(Aabb::from_min_size(pos, size * scale))
            }
            None => n
                .children
                .iter()
                .filter_map(|c| self.world_bounds(*c))
                .reduce(|a, b| a.union(&b)),
        }
    }

    fn set_background(&mut self, color: u32) {
        self.background = Some(color);
    }

    fn set_camera(&mut self, uniform: CameraUniform) {
        self.camera = Some(uniform);
    }

    fn advance(&mut self, dt_us: u64) {
        for node in self.nodes.values_mut() {
            let Node {
                drawable,
                anim,
                sprite,
                ..
            } = node;
            if let (Drawable::Animated { clip, .. }, Some(state)) = (&*drawable, anim.as_mut()) {
                let frame = state.tick(dt_us, clip);
                if sprite.as_str() != frame {
                    *sprite = frame.to_string();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ff_core::animation::AnimationFrame;

    fn tile(scene: &mut RetainedScene, size: f32) -> NodeId {
        scene.spawn(Drawable::Sprite {
            sprite_id: "tile".to_string(),
            size: Vec2::splat(size),
        })
    }

    #[test]
    fn edge_contact_is_not_overlap() {
        let a = Aabb::from_min_size(Vec2::ZERO, Vec2::splat(16.0));
        let b = Aabb::from_min_size(Vec2::new(16.0, 0.0), Vec2::splat(16.0));
        let c = Aabb::from_min_size(Vec2::new(15.0, 15.0), Vec2::splat(16.0));
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }

    #[test]
    fn attach_and_detach_are_idempotent() {
        let mut scene = RetainedScene::new();
        let node = tile(&mut scene, 16.0);
        assert!(scene.attach(node));
        assert!(!scene.attach(node));
        assert_eq!(scene.stage().len(), 1);
        assert!(scene.detach(node));
        assert!(!scene.detach(node));
        assert!(!scene.is_attached(node));
    }

    #[test]
    fn child_bounds_follow_parent_transform() {
        let mut scene = RetainedScene::new();
        let container = scene.spawn(Drawable::Container);
        let child = tile(&mut scene, 16.0);
        assert!(scene.add_child(container, child));
        scene.set_position(child, Vec2::new(32.0, 16.0));
        scene.set_position(container, Vec2::new(100.0, 50.0));
        scene.set_scale(container, 2.0);

        let bounds = scene.world_bounds(child).expect("child has bounds");
        assert_eq!(bounds.min, Vec2::new(164.0, 82.0));
        assert_eq!(bounds.size(), Vec2::splat(32.0));

        let union = scene.world_bounds(container).expect("container has bounds");
        assert_eq!(union, bounds);
    }

    #[test]
    fn box_overlap_uses_screen_space() {
        let mut scene = RetainedScene::new();
        let container = scene.spawn(Drawable::Container);
        let t = tile(&mut scene, 16.0);
        scene.add_child(container, t);
        let player = scene.spawn(Drawable::Rect {
            size: Vec2::splat(8.0),
            color: 0xffffff,
        });
        scene.set_position(player, Vec2::new(4.0, 4.0));
        assert!(scene.box_overlap(player, t));

        scene.set_position(container, Vec2::new(-16.0, 0.0));
        assert!(!scene.box_overlap(player, t));
    }

    #[test]
    fn destroy_removes_subtree() {
        let mut scene = RetainedScene::new();
        let container = scene.spawn(Drawable::Container);
        for _ in 0..3 {
            let t = tile(&mut scene, 8.0);
            scene.add_child(container, t);
        }
        scene.attach(container);
        assert_eq!(scene.node_count(), 4);
        scene.destroy(container);
        assert_eq!(scene.node_count(), 0);
        assert!(scene.stage().is_empty());
    }

    #[test]
    fn filters_do_not_stack_by_kind() {
        let mut scene = RetainedScene::new();
        let node = scene.spawn(Drawable::Container);
        assert!(scene.add_filter(node, Filter::Pixelate { block_px: 4.0 }));
        assert!(!scene.add_filter(node, Filter::Pixelate { block_px: 8.0 }));
        assert!(scene.add_filter(node, Filter::DeathTint));
        assert_eq!(scene.filters(node).len(), 2);
        assert!(scene.has_filter(node, Filter::Pixelate { block_px: 0.0 }));
        scene.clear_filters(node);
        assert!(scene.filters(node).is_empty());
    }

    #[test]
    fn advance_plays_animated_drawables() {
        let mut scene = RetainedScene::new();
        let clip = AnimationClip {
            frames: vec![
                AnimationFrame {
                    sprite_id: "water_0".to_string(),
                    duration_us: 150_000,
                },
                AnimationFrame {
                    sprite_id: "water_1".to_string(),
                    duration_us: 150_000,
                },
            ],
            looping: true,
        };
        let node = scene.spawn(Drawable::Animated {
            clip,
            size: Vec2::splat(16.0),
        });
        assert_eq!(scene.sprite(node), Some("water_0"));
        scene.advance(160_000);
        assert_eq!(scene.sprite(node), Some("water_1"));
        scene.advance(150_000);
        assert_eq!(scene.sprite(node), Some("water_0"));
    }
}
