//! Network plumbing: wire types, outbound dispatch, inbound listening

pub mod dispatcher;
pub mod listener;
pub mod packets;

pub use dispatcher::{CaptureDispatcher, PacketDispatcher, UdpPacketDispatcher};
pub use packets::{Packet, ServerPacket};
