//! Outgoing packet dispatch

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::net::packets::Packet;

/// Fire-and-forget sink for outgoing packets.
///
/// Sends are best-effort datagrams: no retry, no acknowledgement, no
/// ordering. A failed send never reaches the caller.
pub trait PacketDispatcher: Send + Sync {
    /// Enqueue a packet for transmission and return immediately
    fn send_udp(&self, packet: Packet);
}

/// Dispatcher backed by a writer task that owns the socket send half
pub struct UdpPacketDispatcher {
    packet_tx: mpsc::UnboundedSender<Packet>,
}

impl UdpPacketDispatcher {
    /// Spawn the writer task. The socket must already be connected to the
    /// game server.
    pub fn new(socket: Arc<UdpSocket>) -> Self {
        let (packet_tx, mut packet_rx) = mpsc::unbounded_channel::<Packet>();

        tokio::spawn(async move {
            while let Some(packet) = packet_rx.recv().await {
                let payload = match serde_json::to_vec(&packet) {
                    Ok(payload) => payload,
                    Err(e) => {
                        warn!(error = %e, "Failed to encode packet");
                        continue;
                    }
                };

                if let Err(e) = socket.send(&payload).await {
                    debug!(error = %e, "UDP send failed, dropping packet");
                }
            }

            debug!("Packet writer stopped");
        });

        Self { packet_tx }
    }
}

impl PacketDispatcher for UdpPacketDispatcher {
    fn send_udp(&self, packet: Packet) {
        if self.packet_tx.send(packet).is_err() {
            debug!("Packet writer gone, dropping packet");
        }
    }
}

/// Dispatcher that buffers packets in memory instead of sending them.
/// Stands in for the UDP dispatcher in tests and offline replays.
#[derive(Default)]
pub struct CaptureDispatcher {
    sent: Mutex<Vec<Packet>>,
}

impl CaptureDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// All packets dispatched so far, oldest first
    pub fn sent(&self) -> Vec<Packet> {
        self.sent.lock().clone()
    }

    /// Take the buffered packets, leaving the buffer empty
    pub fn drain(&self) -> Vec<Packet> {
        self.sent.lock().drain(..).collect()
    }
}

impl PacketDispatcher for CaptureDispatcher {
    fn send_udp(&self, packet: Packet) {
        self.sent.lock().push(packet);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_dispatcher_preserves_send_order() {
        let dispatcher = CaptureDispatcher::new();
        dispatcher.send_udp(Packet::KeyPressed {
            player_id: 1,
            keycode: 19,
        });
        dispatcher.send_udp(Packet::Location {
            player_id: 1,
            x: 5.0,
            y: 0.0,
        });

        let sent = dispatcher.drain();
        assert_eq!(sent.len(), 2);
        assert!(matches!(sent[0], Packet::KeyPressed { .. }));
        assert!(matches!(sent[1], Packet::Location { .. }));
        assert!(dispatcher.sent().is_empty());
    }
}
