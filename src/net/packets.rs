//! UDP protocol message definitions
//! These are the wire types for client-server communication

use serde::{Deserialize, Serialize};

/// Packets sent from client to server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Packet {
    /// A bound key went down on this client
    KeyPressed {
        player_id: i32,
        /// Toolkit keycode that was pressed
        keycode: i32,
    },

    /// A bound key was released on this client
    KeyReleased {
        player_id: i32,
        /// Toolkit keycode that was lifted
        keycode: i32,
    },

    /// Current position of a character, sent every tick a move flag is active
    Location {
        player_id: i32,
        x: f32,
        y: f32,
    },

    /// Current rotation of a character in degrees, sent every tick a rotate
    /// flag is active
    Rotation {
        player_id: i32,
        rotation: f32,
    },
}

/// Packets sent from server to client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerPacket {
    /// Welcome message after the connection is accepted
    Welcome {
        /// The id assigned to this client's own character
        player_id: i32,
        server_time: u64,
    },

    /// A character entered the game
    PlayerJoined {
        player_id: i32,
        game_id: i32,
        /// Spawn position
        x: f32,
        y: f32,
        /// Spawn rotation in degrees
        rotation: f32,
    },

    /// A character left the game
    PlayerLeft {
        player_id: i32,
    },

    /// Another player's key edge, relayed after client-server latency
    KeyPressed {
        player_id: i32,
        keycode: i32,
    },

    /// Another player's key release, relayed after client-server latency
    KeyReleased {
        player_id: i32,
        keycode: i32,
    },

    /// Authoritative position correction for a character
    Location {
        player_id: i32,
        x: f32,
        y: f32,
    },

    /// Authoritative rotation correction for a character (degrees)
    Rotation {
        player_id: i32,
        rotation: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outgoing_packets_use_tagged_snake_case_wire_shape() {
        let json = serde_json::to_value(Packet::Location {
            player_id: 7,
            x: 5.0,
            y: 0.0,
        })
        .unwrap();

        assert_eq!(json["type"], "location");
        assert_eq!(json["player_id"], 7);
        assert_eq!(json["x"], 5.0);
        assert_eq!(json["y"], 0.0);
    }

    #[test]
    fn relayed_key_edges_decode_from_server_payloads() {
        let packet: ServerPacket =
            serde_json::from_str(r#"{"type":"key_pressed","player_id":3,"keycode":19}"#).unwrap();

        assert_eq!(
            packet,
            ServerPacket::KeyPressed {
                player_id: 3,
                keycode: 19
            }
        );
    }
}
