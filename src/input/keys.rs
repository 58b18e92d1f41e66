//! Keycode constants
//!
//! Integer values follow the windowing toolkit's key enumeration so that
//! key edges relayed through the server mean the same key on every client.

pub const UP: i32 = 19;
pub const DOWN: i32 = 20;
pub const LEFT: i32 = 21;
pub const RIGHT: i32 = 22;
