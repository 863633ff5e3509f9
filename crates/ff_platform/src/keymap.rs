//! Translation from winit key codes to game keys.

use ff_core::input::{Key, MouseBtn};
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

pub fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyS => Some(Key::S),
        KeyCode::KeyD => Some(Key::D),
        KeyCode::Space => Some(Key::Space),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::Enter | KeyCode::NumpadEnter => Some(Key::Enter),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::Equal | KeyCode::NumpadAdd => Some(Key::ZoomIn),
        KeyCode::Minus | KeyCode::NumpadSubtract => Some(Key::ZoomOut),
        _ => None,
    }
}

pub fn map_mouse_button(button: MouseButton) -> Option<MouseBtn> {
    match button {
        MouseButton::Left => Some(MouseBtn::Left),
        MouseButton::Right => Some(MouseBtn::Right),
        MouseButton::Middle => Some(MouseBtn::Middle),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_keys_map_to_wasd_and_arrows() {
        assert_eq!(map_key(KeyCode::KeyW), Some(Key::W));
        assert_eq!(map_key(KeyCode::KeyD), Some(Key::D));
        assert_eq!(map_key(KeyCode::ArrowLeft), Some(Key::Left));
        assert_eq!(map_key(KeyCode::Space), Some(Key::Space));
    }

    #[test]
    fn zoom_keys_have_numpad_aliases() {
        assert_eq!(map_key(KeyCode::Equal), Some(Key::ZoomIn));
        assert_eq!(map_key(KeyCode::NumpadAdd), Some(Key::ZoomIn));
        assert_eq!(map_key(KeyCode::NumpadSubtract), Some(Key::ZoomOut));
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        assert_eq!(map_key(KeyCode::KeyQ), None);
        assert_eq!(map_mouse_button(MouseButton::Back), None);
        assert_eq!(map_mouse_button(MouseButton::Left), Some(MouseBtn::Left));
    }
}
