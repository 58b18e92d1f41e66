//! World registry of characters ticked each frame

use std::collections::HashMap;

use tracing::{info, warn};

use crate::game::flags::Flaggable;
use crate::game::player::Player;

/// All characters currently in the game, keyed by player id. The session
/// task owns the world; joins and leaves arrive as queued events and are
/// applied between tick sweeps, never during one.
#[derive(Default)]
pub struct World {
    players: HashMap<i32, Player>,
    /// Id of the character controlled by this client, once assigned
    local_player_id: Option<i32>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record which character the server handed to this client
    pub fn set_local_player(&mut self, player_id: i32) {
        self.local_player_id = Some(player_id);
    }

    pub fn local_player_id(&self) -> Option<i32> {
        self.local_player_id
    }

    pub fn add_player(&mut self, player: Player) {
        let player_id = player.player_id();
        if self.players.contains_key(&player_id) {
            warn!(player_id, "Player already in world, replacing");
        }
        self.players.insert(player_id, player);

        info!(
            player_id,
            player_count = self.players.len(),
            "Player joined world"
        );
    }

    pub fn remove_player(&mut self, player_id: i32) -> Option<Player> {
        let removed = self.players.remove(&player_id);
        if removed.is_some() {
            info!(
                player_id,
                player_count = self.players.len(),
                "Player left world"
            );
        }
        removed
    }

    pub fn player(&self, player_id: i32) -> Option<&Player> {
        self.players.get(&player_id)
    }

    pub fn player_mut(&mut self, player_id: i32) -> Option<&mut Player> {
        self.players.get_mut(&player_id)
    }

    /// The character controlled by this client, if it has joined yet
    pub fn local_player_mut(&mut self) -> Option<&mut Player> {
        let id = self.local_player_id?;
        self.players.get_mut(&id)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Tick every flaggable once. Characters never read or write each
    /// other's state during the sweep, so iteration order is irrelevant.
    pub fn process_flags(&mut self) {
        for player in self.players.values_mut() {
            player.process_flags();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::game::flags::Flag;
    use crate::net::dispatcher::{CaptureDispatcher, PacketDispatcher};

    fn join(world: &mut World, dispatcher: &Arc<CaptureDispatcher>, player_id: i32) {
        world.add_player(Player::new(
            player_id,
            1,
            0.0,
            0.0,
            0.0,
            Arc::clone(dispatcher) as Arc<dyn PacketDispatcher>,
        ));
    }

    #[test]
    fn sweep_ticks_every_character_once() {
        let dispatcher = Arc::new(CaptureDispatcher::new());
        let mut world = World::new();
        join(&mut world, &dispatcher, 1);
        join(&mut world, &dispatcher, 2);

        for id in [1, 2] {
            world.player_mut(id).unwrap().flag(Flag::MoveForward);
        }
        world.process_flags();

        assert_eq!(dispatcher.drain().len(), 2);
        assert!((world.player(1).unwrap().x() - 5.0).abs() < 1e-3);
        assert!((world.player(2).unwrap().x() - 5.0).abs() < 1e-3);
    }

    #[test]
    fn leave_stops_a_character_from_ticking() {
        let dispatcher = Arc::new(CaptureDispatcher::new());
        let mut world = World::new();
        join(&mut world, &dispatcher, 1);

        world.player_mut(1).unwrap().flag(Flag::MoveForward);
        assert!(world.remove_player(1).is_some());
        assert!(world.remove_player(1).is_none());

        world.process_flags();
        assert!(dispatcher.drain().is_empty());
        assert!(world.is_empty());
    }

    #[test]
    fn local_player_lookup_follows_the_assigned_id() {
        let dispatcher = Arc::new(CaptureDispatcher::new());
        let mut world = World::new();

        assert!(world.local_player_mut().is_none());

        world.set_local_player(7);
        assert!(world.local_player_mut().is_none());

        join(&mut world, &dispatcher, 7);
        assert_eq!(world.local_player_mut().unwrap().player_id(), 7);
    }
}
