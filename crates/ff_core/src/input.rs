//! Input state tracking with both edge-triggered and level-triggered queries.
//!
//! - **Level-triggered (held):** `is_held(key)` is true every frame the key is
//!   physically down. Movement and jumping read this; the game observes only
//!   momentary held state, there is no input buffering.
//!
//! - **Edge-triggered (just_pressed / just_released):** true only during the
//!   frame the transition happened, cleared by `end_frame()`. The title screen
//!   and the zoom keys read these.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Space,
    Up,
    Down,
    Left,
    Right,
    Enter,
    Escape,
    ZoomIn,
    ZoomOut,
}

impl Key {
    /// Keys addressable by name from replay scripts and `is_key_pressed`.
    pub const NAMED: &'static [(&'static str, Key)] = &[
        ("w", Key::W),
        ("a", Key::A),
        ("s", Key::S),
        ("d", Key::D),
        ("space", Key::Space),
        (" ", Key::Space),
        ("up", Key::Up),
        ("down", Key::Down),
        ("left", Key::Left),
        ("right", Key::Right),
        ("enter", Key::Enter),
        ("escape", Key::Escape),
        ("zoom_in", Key::ZoomIn),
        ("zoom_out", Key::ZoomOut),
    ];

    pub fn from_name(name: &str) -> Option<Key> {
        let lowered = name.to_ascii_lowercase();
        Self::NAMED
            .iter()
            .find(|(n, _)| *n == lowered)
            .map(|(_, key)| *key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseBtn {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone)]
pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,

    mouse_held: HashSet<MouseBtn>,
    mouse_just_pressed: HashSet<MouseBtn>,
    mouse_just_released: HashSet<MouseBtn>,

    pub mouse_position: (f64, f64),
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
            mouse_held: HashSet::new(),
            mouse_just_pressed: HashSet::new(),
            mouse_just_released: HashSet::new(),
            mouse_position: (0.0, 0.0),
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.just_released.insert(key);
        }
    }

    /// Replace the held set wholesale, deriving edges against the previous
    /// frame. Used by scripted input where each frame lists its held keys.
    pub fn set_held(&mut self, keys: &[Key]) {
        let next: HashSet<Key> = keys.iter().copied().collect();
        for key in self.held.difference(&next) {
            self.just_released.insert(*key);
        }
        for key in next.difference(&self.held) {
            self.just_pressed.insert(*key);
        }
        self.held = next;
    }

    pub fn mouse_down(&mut self, btn: MouseBtn) {
        if self.mouse_held.insert(btn) {
            self.mouse_just_pressed.insert(btn);
        }
    }

    pub fn mouse_up(&mut self, btn: MouseBtn) {
        if self.mouse_held.remove(&btn) {
            self.mouse_just_released.insert(btn);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Held-state query by key name (`"w"`, `"a"`, `"s"`, `"d"`, `"space"`).
    /// Unknown names are never pressed.
    pub fn is_key_pressed(&self, name: &str) -> bool {
        Key::from_name(name).is_some_and(|key| self.is_held(key))
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    pub fn is_mouse_held(&self, btn: MouseBtn) -> bool {
        self.mouse_held.contains(&btn)
    }

    pub fn is_mouse_just_pressed(&self, btn: MouseBtn) -> bool {
        self.mouse_just_pressed.contains(&btn)
    }

    pub fn is_mouse_just_released(&self, btn: MouseBtn) -> bool {
        self.mouse_just_released.contains(&btn)
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
        self.mouse_just_pressed.clear();
        self.mouse_just_released.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_down_sets_held_and_just_pressed() {
        let mut input = InputState::new();
        input.key_down(Key::A);
        assert!(input.is_held(Key::A));
        assert!(input.is_just_pressed(Key::A));
    }

    #[test]
    fn test_key_up_clears_held_sets_just_released() {
        let mut input = InputState::new();
        input.key_down(Key::A);
        input.key_up(Key::A);
        assert!(!input.is_held(Key::A));
        assert!(input.is_just_released(Key::A));
    }

    #[test]
    fn test_key_up_without_down_is_no_op() {
        let mut input = InputState::new();
        input.key_up(Key::A);
        assert!(!input.is_just_released(Key::A));
        assert!(!input.is_held(Key::A));
    }

    #[test]
    fn test_end_frame_clears_transient_state() {
        let mut input = InputState::new();
        input.key_down(Key::D);
        input.key_down(Key::Space);
        input.end_frame();
        assert!(!input.is_just_pressed(Key::D));
        assert!(!input.is_just_pressed(Key::Space));
        assert!(input.is_held(Key::D));
        assert!(input.is_held(Key::Space));
    }

    #[test]
    fn test_set_held_derives_edges() {
        let mut input = InputState::new();
        input.set_held(&[Key::W, Key::D]);
        assert!(input.is_just_pressed(Key::W));
        assert!(input.is_just_pressed(Key::D));
        input.end_frame();

        input.set_held(&[Key::D, Key::Space]);
        assert!(input.is_just_released(Key::W));
        assert!(!input.is_just_pressed(Key::D));
        assert!(input.is_just_pressed(Key::Space));
        assert!(!input.is_held(Key::W));
    }

    #[test]
    fn test_is_key_pressed_by_name() {
        let mut input = InputState::new();
        input.key_down(Key::Space);
        input.key_down(Key::S);
        assert!(input.is_key_pressed("space"));
        assert!(input.is_key_pressed(" "));
        assert!(input.is_key_pressed("S"));
        assert!(!input.is_key_pressed("w"));
        assert!(!input.is_key_pressed("q"));
    }

    #[test]
    fn test_key_from_name() {
        assert_eq!(Key::from_name("w"), Some(Key::W));
        assert_eq!(Key::from_name("Enter"), Some(Key::Enter));
        assert_eq!(Key::from_name("f13"), None);
    }

    #[test]
    fn test_mouse_click_edges() {
        let mut input = InputState::new();
        input.mouse_down(MouseBtn::Left);
        assert!(input.is_mouse_held(MouseBtn::Left));
        assert!(input.is_mouse_just_pressed(MouseBtn::Left));
        input.end_frame();
        assert!(!input.is_mouse_just_pressed(MouseBtn::Left));

        input.mouse_up(MouseBtn::Left);
        assert!(input.is_mouse_just_released(MouseBtn::Left));
        assert!(!input.is_mouse_held(MouseBtn::Left));
    }

    #[test]
    fn test_default_state_is_empty() {
        let input = InputState::new();
        assert!(!input.is_held(Key::A));
        assert!(!input.is_held(Key::Space));
        assert!(!input.is_just_pressed(Key::A));
        assert!(!input.is_mouse_held(MouseBtn::Left));
        assert!((input.mouse_position.0 - 0.0).abs() < f64::EPSILON);
    }
}
