//! Title overlay. While it shows, the game waits for a play click.

use ff_core::events::EventQueue;
use ff_core::input::{InputState, Key, MouseBtn};
use ff_render::{Drawable, NodeId, SceneGraph};
use glam::Vec2;

use crate::signals::GameEvent;

pub const TITLE_TEXT: &str = "FLOORFALL - press space";

pub struct TitleScreen {
    node: NodeId,
    visible: bool,
}

impl TitleScreen {
    pub fn new(scene: &mut dyn SceneGraph, viewport: Vec2) -> Self {
        let node = scene.spawn(Drawable::Label {
            text: TITLE_TEXT.to_string(),
            size: viewport,
        });
        Self {
            node,
            visible: false,
        }
    }

    pub fn display(&mut self, scene: &mut dyn SceneGraph) {
        self.visible = true;
        if !scene.is_attached(self.node) {
            scene.attach(self.node);
        }
    }

    pub fn hide(&mut self, scene: &mut dyn SceneGraph) {
        self.visible = false;
        if scene.is_attached(self.node) {
            scene.detach(self.node);
        }
    }

    pub fn is_showing(&self) -> bool {
        self.visible
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Enter, space or a left click counts as pressing play.
    pub fn update(&mut self, input: &InputState, events: &mut EventQueue<GameEvent>) {
        if !self.visible {
            return;
        }
        if input.is_just_pressed(Key::Enter)
            || input.is_just_pressed(Key::Space)
            || input.is_mouse_just_pressed(MouseBtn::Left)
        {
            self.play_button_clicked(events);
        }
    }

    pub fn play_button_clicked(&self, events: &mut EventQueue<GameEvent>) {
        log::debug!("title play clicked");
        events.send(GameEvent::TitlePlayClicked);
    }
}
