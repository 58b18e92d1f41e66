//! Client simulation modules

pub mod bindings;
pub mod flags;
pub mod inventory;
pub mod player;
pub mod session;
pub mod world;

pub use flags::{Flag, Flaggable};
pub use player::Player;
pub use session::{GameSession, SessionHandle};
pub use world::World;

use crate::net::packets::ServerPacket;

/// Event delivered to the session task between frames
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A key went down on the local keyboard
    KeyDown { keycode: i32 },
    /// A key was released on the local keyboard
    KeyUp { keycode: i32 },
    /// A decoded datagram from the server
    Server {
        packet: ServerPacket,
        received_at: u64,
    },
}
