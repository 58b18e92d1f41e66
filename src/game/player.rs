//! The controllable character: kinematics, flag lifecycle, input processing

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::game::bindings::{default_key_binds, KeyAction, KeyBinding};
use crate::game::flags::{Flag, Flaggable, MOVEMENT_SPEED, ROTATION_SPEED};
use crate::game::inventory::ItemContainer;
use crate::net::dispatcher::PacketDispatcher;
use crate::net::packets::Packet;

/// A character in the world. Every character is a flaggable; the one owned
/// by this client additionally feeds the input processor methods, which emit
/// edge packets. Remote characters receive their key edges through
/// [`Player::key_pressed`] / [`Player::key_unpressed`] after server relay.
pub struct Player {
    /// Unique id assigned by the server for the connection; immutable
    player_id: i32,
    game_id: i32,

    x: f32,
    y: f32,
    /// Rotation in degrees, unnormalized; 0 faces +x, positive is
    /// counter-clockwise
    rotation: f32,

    /// Currently active flags, applied every tick
    flags: HashSet<Flag>,
    /// Flags leaving `flags` at the next tick boundary
    flags_to_remove: HashSet<Flag>,

    /// Keycode binds, built on first access
    key_binds: Option<HashMap<i32, KeyBinding>>,

    inventory: ItemContainer,

    dispatcher: Arc<dyn PacketDispatcher>,
}

impl Player {
    pub fn new(
        player_id: i32,
        game_id: i32,
        spawn_x: f32,
        spawn_y: f32,
        spawn_rotation: f32,
        dispatcher: Arc<dyn PacketDispatcher>,
    ) -> Self {
        Self {
            player_id,
            game_id,
            x: spawn_x,
            y: spawn_y,
            rotation: spawn_rotation,
            flags: HashSet::new(),
            flags_to_remove: HashSet::new(),
            key_binds: None,
            inventory: ItemContainer::inventory(),
            dispatcher,
        }
    }

    pub fn player_id(&self) -> i32 {
        self.player_id
    }

    pub fn game_id(&self) -> i32 {
        self.game_id
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Authoritative position overwrite from the server
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    /// Authoritative rotation overwrite from the server (degrees)
    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }

    pub fn inventory(&self) -> &ItemContainer {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut ItemContainer {
        &mut self.inventory
    }

    /// One forward step along the current heading
    pub fn move_forward(&mut self) {
        let angle = self.rotation.to_radians();
        self.x += MOVEMENT_SPEED * angle.cos();
        self.y += MOVEMENT_SPEED * angle.sin();
    }

    /// One backward step along the current heading
    pub fn move_back(&mut self) {
        let angle = self.rotation.to_radians();
        self.x -= MOVEMENT_SPEED * angle.cos();
        self.y -= MOVEMENT_SPEED * angle.sin();
    }

    /// One counter-clockwise rotation step
    pub fn rotate_left(&mut self) {
        self.rotation += ROTATION_SPEED;
    }

    /// One clockwise rotation step
    pub fn rotate_right(&mut self) {
        self.rotation -= ROTATION_SPEED;
    }

    pub(crate) fn send_location_packet(&self) {
        self.dispatcher.send_udp(Packet::Location {
            player_id: self.player_id,
            x: self.x,
            y: self.y,
        });
    }

    pub(crate) fn send_rotation_packet(&self) {
        self.dispatcher.send_udp(Packet::Rotation {
            player_id: self.player_id,
            rotation: self.rotation,
        });
    }

    fn key_binds(&mut self) -> &HashMap<i32, KeyBinding> {
        self.key_binds.get_or_insert_with(default_key_binds)
    }

    fn run_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::Flag(flag) => self.flag(flag),
            KeyAction::Unflag(flag) => self.flag_to_remove(flag),
        }
    }

    /// Run the bound press handler without emitting an edge packet. Entry
    /// point for key edges relayed by the server for remote characters;
    /// unbound keycodes are inert.
    pub fn key_pressed(&mut self, keycode: i32) {
        if let Some(binding) = self.key_binds().get(&keycode).copied() {
            self.run_action(binding.on_pressed);
        }
    }

    /// Run the bound release handler without emitting an edge packet
    pub fn key_unpressed(&mut self, keycode: i32) {
        if let Some(binding) = self.key_binds().get(&keycode).copied() {
            self.run_action(binding.on_released);
        }
    }

    /// Local key-down edge from the toolkit. For bound keycodes the edge
    /// packet goes out before the local handler runs. Always returns `true`:
    /// the character sits at the end of the toolkit's input chain.
    pub fn key_down(&mut self, keycode: i32) -> bool {
        if self.key_binds().contains_key(&keycode) {
            self.dispatcher.send_udp(Packet::KeyPressed {
                player_id: self.player_id,
                keycode,
            });
            self.key_pressed(keycode);
        }
        true
    }

    /// Local key-up edge from the toolkit; symmetric to [`Player::key_down`]
    pub fn key_up(&mut self, keycode: i32) -> bool {
        if self.key_binds().contains_key(&keycode) {
            self.dispatcher.send_udp(Packet::KeyReleased {
                player_id: self.player_id,
                keycode,
            });
            self.key_unpressed(keycode);
        }
        true
    }

    // Remaining input-chain methods are inert for characters.

    pub fn key_typed(&mut self, _character: char) -> bool {
        false
    }

    pub fn touch_down(&mut self, _screen_x: i32, _screen_y: i32, _pointer: i32, _button: i32) -> bool {
        false
    }

    pub fn touch_up(&mut self, _screen_x: i32, _screen_y: i32, _pointer: i32, _button: i32) -> bool {
        false
    }

    pub fn touch_dragged(&mut self, _screen_x: i32, _screen_y: i32, _pointer: i32) -> bool {
        false
    }

    pub fn mouse_moved(&mut self, _screen_x: i32, _screen_y: i32) -> bool {
        false
    }

    pub fn scrolled(&mut self, _amount: i32) -> bool {
        false
    }
}

impl Flaggable for Player {
    fn flag(&mut self, flag: Flag) {
        self.flags.insert(flag);
        // A re-press cancels a removal queued earlier in the same inter-tick
        // window: the last edge wins at the next reap.
        self.flags_to_remove.remove(&flag);
    }

    fn flag_to_remove(&mut self, flag: Flag) {
        self.flags_to_remove.insert(flag);
    }

    fn process_flags(&mut self) {
        // Reap strictly before any apply: releases queued since the last
        // tick take effect now, and a removal of a non-active flag is a
        // plain set difference.
        for flag in std::mem::take(&mut self.flags_to_remove) {
            self.flags.remove(&flag);
        }

        let active: Vec<Flag> = self.flags.iter().copied().collect();
        for flag in active {
            flag.apply(self);
        }
    }
}
