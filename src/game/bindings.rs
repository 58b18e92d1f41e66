//! Key binding table for playable characters

use std::collections::HashMap;

use crate::game::flags::Flag;
use crate::input::keys;

/// What a key edge does to the character holding the binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Activate a flag
    Flag(Flag),
    /// Schedule a flag for removal at the next tick boundary
    Unflag(Flag),
}

/// Press/release handler pair for one keycode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub on_pressed: KeyAction,
    pub on_released: KeyAction,
}

impl KeyBinding {
    /// Binding that holds `flag` active while the key is down
    fn hold(flag: Flag) -> Self {
        Self {
            on_pressed: KeyAction::Flag(flag),
            on_released: KeyAction::Unflag(flag),
        }
    }
}

/// The default binds: arrow keys drive movement and rotation
pub fn default_key_binds() -> HashMap<i32, KeyBinding> {
    let mut binds = HashMap::new();
    binds.insert(keys::UP, KeyBinding::hold(Flag::MoveForward));
    binds.insert(keys::DOWN, KeyBinding::hold(Flag::MoveBackward));
    binds.insert(keys::LEFT, KeyBinding::hold(Flag::RotateLeft));
    binds.insert(keys::RIGHT, KeyBinding::hold(Flag::RotateRight));
    binds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_map_to_held_movement_flags() {
        let binds = default_key_binds();
        assert_eq!(binds.len(), 4);

        let up = binds[&keys::UP];
        assert_eq!(up.on_pressed, KeyAction::Flag(Flag::MoveForward));
        assert_eq!(up.on_released, KeyAction::Unflag(Flag::MoveForward));

        let left = binds[&keys::LEFT];
        assert_eq!(left.on_pressed, KeyAction::Flag(Flag::RotateLeft));
        assert_eq!(left.on_released, KeyAction::Unflag(Flag::RotateLeft));
    }

    #[test]
    fn unbound_keycodes_are_absent() {
        let binds = default_key_binds();
        assert!(!binds.contains_key(&0));
        assert!(!binds.contains_key(&54)); // Z on the toolkit key table
    }
}
