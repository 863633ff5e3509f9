//! Facing state and raw directional input.
//!
//! Held keys produce a [`DirectionMask`] by pressing each held direction in
//! the fixed order up, left, down, right. A press clears the opposite bit, so
//! with both keys of an axis held the later one wins (right over left, down
//! over up). The mask is folded into a [`Facing`], which always has exactly
//! one horizontal and one vertical side; an axis with no bit set keeps its
//! previous side.

use ff_core::input::InputState;
use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    fn bit(self) -> u8 {
        match self {
            Direction::Up => 0b0001,
            Direction::Down => 0b0010,
            Direction::Left => 0b0100,
            Direction::Right => 0b1000,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirectionMask(u8);

impl DirectionMask {
    pub const NONE: DirectionMask = DirectionMask(0);

    /// Every combination of the four bits, for exhaustive checks.
    pub fn all_masks() -> impl Iterator<Item = DirectionMask> {
        (0u8..16).map(DirectionMask)
    }

    /// WASD and arrow keys, read as held state, pressed in binding order.
    pub fn from_input(input: &InputState) -> Self {
        const BINDINGS: [(&str, Direction); 8] = [
            ("w", Direction::Up),
            ("up", Direction::Up),
            ("a", Direction::Left),
            ("left", Direction::Left),
            ("s", Direction::Down),
            ("down", Direction::Down),
            ("d", Direction::Right),
            ("right", Direction::Right),
        ];
        let mut mask = Self::NONE;
        for (name, dir) in BINDINGS {
            if input.is_key_pressed(name) {
                mask.press(dir);
            }
        }
        mask
    }

    pub fn insert(&mut self, dir: Direction) {
        self.0 |= dir.bit();
    }

    /// Set `dir` and clear its opposite. The orthogonal axis is untouched.
    pub fn press(&mut self, dir: Direction) {
        self.0 = (self.0 | dir.bit()) & !dir.opposite().bit();
    }

    pub fn contains(self, dir: Direction) -> bool {
        self.0 & dir.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn horizontal(self) -> Option<Horizontal> {
        match (self.contains(Direction::Left), self.contains(Direction::Right)) {
            (true, false) => Some(Horizontal::Left),
            (false, true) => Some(Horizontal::Right),
            _ => None,
        }
    }

    pub fn vertical(self) -> Option<Vertical> {
        match (self.contains(Direction::Up), self.contains(Direction::Down)) {
            (true, false) => Some(Vertical::Up),
            (false, true) => Some(Vertical::Down),
            _ => None,
        }
    }

    /// Unit steps per axis in screen orientation (y down). Opposite keys
    /// cancel.
    pub fn intent(self) -> Vec2 {
        let x = match self.horizontal() {
            Some(Horizontal::Left) => -1.0,
            Some(Horizontal::Right) => 1.0,
            None => 0.0,
        };
        let y = match self.vertical() {
            Some(Vertical::Up) => -1.0,
            Some(Vertical::Down) => 1.0,
            None => 0.0,
        };
        Vec2::new(x, y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Horizontal {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vertical {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Facing {
    pub horizontal: Horizontal,
    pub vertical: Vertical,
}

impl Default for Facing {
    fn default() -> Self {
        Self {
            horizontal: Horizontal::Left,
            vertical: Vertical::Up,
        }
    }
}

impl Facing {
    pub fn new(horizontal: Horizontal, vertical: Vertical) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    pub fn apply(&mut self, mask: DirectionMask) {
        if let Some(h) = mask.horizontal() {
            self.horizontal = h;
        }
        if let Some(v) = mask.vertical() {
            self.vertical = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ff_core::input::Key;

    #[test]
    fn press_clears_opposite_but_keeps_orthogonal() {
        let mut mask = DirectionMask::NONE;
        mask.press(Direction::Up);
        mask.press(Direction::Left);
        mask.press(Direction::Right);
        assert!(mask.contains(Direction::Up));
        assert!(mask.contains(Direction::Right));
        assert!(!mask.contains(Direction::Left));
        mask.press(Direction::Down);
        assert!(!mask.contains(Direction::Up));
        assert_eq!(mask.intent(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn opposite_keys_cancel_intent() {
        let mut mask = DirectionMask::NONE;
        mask.insert(Direction::Left);
        mask.insert(Direction::Right);
        mask.insert(Direction::Down);
        assert_eq!(mask.horizontal(), None);
        assert_eq!(mask.intent(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn facing_keeps_previous_side_on_ambiguous_axis() {
        let mut facing = Facing::new(Horizontal::Right, Vertical::Down);
        let mut mask = DirectionMask::NONE;
        mask.insert(Direction::Left);
        mask.insert(Direction::Right);
        mask.insert(Direction::Up);
        facing.apply(mask);
        assert_eq!(facing, Facing::new(Horizontal::Right, Vertical::Up));
        facing.apply(DirectionMask::NONE);
        assert_eq!(facing, Facing::new(Horizontal::Right, Vertical::Up));
    }

    #[test]
    fn facing_is_defined_for_every_mask() {
        for start in [
            Facing::new(Horizontal::Left, Vertical::Up),
            Facing::new(Horizontal::Right, Vertical::Down),
        ] {
            for mask in DirectionMask::all_masks() {
                let mut facing = start;
                facing.apply(mask);
                if let Some(h) = mask.horizontal() {
                    assert_eq!(facing.horizontal, h);
                } else {
                    assert_eq!(facing.horizontal, start.horizontal);
                }
                if let Some(v) = mask.vertical() {
                    assert_eq!(facing.vertical, v);
                } else {
                    assert_eq!(facing.vertical, start.vertical);
                }
            }
        }
    }

    #[test]
    fn mask_from_held_keys_accepts_arrows() {
        let mut input = InputState::new();
        input.key_down(Key::Up);
        input.key_down(Key::D);
        let mask = DirectionMask::from_input(&input);
        assert_eq!(mask.vertical(), Some(Vertical::Up));
        assert_eq!(mask.horizontal(), Some(Horizontal::Right));
        assert_eq!(mask.intent(), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn opposite_held_keys_resolve_to_the_later_binding() {
        let mut input = InputState::new();
        input.set_held(&[Key::A, Key::D, Key::W, Key::S]);
        let mask = DirectionMask::from_input(&input);
        assert_eq!(mask.horizontal(), Some(Horizontal::Right));
        assert_eq!(mask.vertical(), Some(Vertical::Down));
        assert_eq!(mask.intent(), Vec2::new(1.0, 1.0));

        input.set_held(&[Key::Left, Key::Right]);
        assert_eq!(DirectionMask::from_input(&input).intent(), Vec2::new(1.0, 0.0));
    }
}
