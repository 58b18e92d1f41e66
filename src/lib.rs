//! Client-side input and movement core for a top-down multiplayer arena game
//!
//! The core turns local key edges into per-character intent flags, applies
//! the flags to kinematic state once per rendered frame, and streams minimal
//! UDP packets describing the change to the game server. Inbound datagrams
//! relay other players' key edges and authoritative state corrections.

pub mod app;
pub mod config;
pub mod game;
pub mod input;
pub mod net;
pub mod util;
