//! Inbound datagram listener

use std::sync::Arc;

use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::game::SessionEvent;
use crate::net::packets::ServerPacket;
use crate::util::time::unix_millis;

/// Largest datagram the server emits; anything bigger is malformed
const MAX_DATAGRAM: usize = 1400;

/// Read datagrams off the socket and forward them to the session task.
/// Runs until the session side of the channel is dropped.
pub async fn run(socket: Arc<UdpSocket>, event_tx: mpsc::Sender<SessionEvent>) {
    let mut buf = [0u8; MAX_DATAGRAM];

    loop {
        let len = match socket.recv(&mut buf).await {
            Ok(len) => len,
            Err(e) => {
                // Datagram errors are transient (e.g. a port-unreachable
                // bounce on a connected socket); keep listening.
                warn!(error = %e, "UDP recv failed");
                continue;
            }
        };

        match serde_json::from_slice::<ServerPacket>(&buf[..len]) {
            Ok(packet) => {
                let event = SessionEvent::Server {
                    packet,
                    received_at: unix_millis(),
                };

                if event_tx.send(event).await.is_err() {
                    debug!("Session gone, stopping listener");
                    break;
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to parse server packet");
            }
        }
    }
}
