//! Client session and per-frame tick loop

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::game::player::Player;
use crate::game::world::World;
use crate::game::SessionEvent;
use crate::net::dispatcher::PacketDispatcher;
use crate::net::packets::ServerPacket;
use crate::util::time::{tick_delta, Timer, CLIENT_TPS, TICK_DURATION_MICROS};

/// Handle used by input and network tasks to reach the session
#[derive(Clone)]
pub struct SessionHandle {
    pub event_tx: mpsc::Sender<SessionEvent>,
}

impl SessionHandle {
    /// Forward a local key-down edge to the session task
    pub async fn key_down(&self, keycode: i32) {
        let _ = self.event_tx.send(SessionEvent::KeyDown { keycode }).await;
    }

    /// Forward a local key-up edge to the session task
    pub async fn key_up(&self, keycode: i32) {
        let _ = self.event_tx.send(SessionEvent::KeyUp { keycode }).await;
    }
}

/// The client game session: owns the world and runs the frame loop.
/// All world mutation happens on this task; input and network events reach
/// it through the handle's channel and are drained at the top of each frame.
pub struct GameSession {
    world: World,
    event_rx: mpsc::Receiver<SessionEvent>,
    dispatcher: Arc<dyn PacketDispatcher>,
}

impl GameSession {
    pub fn new(dispatcher: Arc<dyn PacketDispatcher>) -> (Self, SessionHandle) {
        let (event_tx, event_rx) = mpsc::channel(256);

        let session = Self {
            world: World::new(),
            event_rx,
            dispatcher,
        };

        (session, SessionHandle { event_tx })
    }

    /// Run the per-frame loop until every handle is dropped
    pub async fn run(mut self) {
        info!(tps = CLIENT_TPS, "Client session started");

        let tick_duration = Duration::from_micros(TICK_DURATION_MICROS);
        let mut tick_interval = interval(tick_duration);
        tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tick_interval.tick().await;

            // Everything delivered before this frame is visible to its tick
            if !self.process_events() {
                info!("Event channel closed, stopping session");
                break;
            }

            let frame_timer = Timer::new();
            self.run_tick(tick_delta());

            let elapsed = frame_timer.elapsed_micros();
            if elapsed > TICK_DURATION_MICROS {
                warn!(elapsed_micros = elapsed, "Frame overran its tick budget");
            }
        }
    }

    /// Drain queued events; returns `false` once the channel is closed
    fn process_events(&mut self) -> bool {
        loop {
            match self.event_rx.try_recv() {
                Ok(event) => self.handle_event(event),
                Err(mpsc::error::TryRecvError::Empty) => return true,
                Err(mpsc::error::TryRecvError::Disconnected) => return false,
            }
        }
    }

    fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::KeyDown { keycode } => {
                if let Some(player) = self.world.local_player_mut() {
                    player.key_down(keycode);
                } else {
                    debug!(keycode, "Key edge before local player joined, dropped");
                }
            }
            SessionEvent::KeyUp { keycode } => {
                if let Some(player) = self.world.local_player_mut() {
                    player.key_up(keycode);
                } else {
                    debug!(keycode, "Key edge before local player joined, dropped");
                }
            }
            SessionEvent::Server {
                packet,
                received_at,
            } => {
                debug!(received_at, "Applying server packet");
                self.handle_server_packet(packet);
            }
        }
    }

    fn handle_server_packet(&mut self, packet: ServerPacket) {
        match packet {
            ServerPacket::Welcome {
                player_id,
                server_time,
            } => {
                info!(player_id, server_time, "Welcomed by server");
                self.world.set_local_player(player_id);
            }
            ServerPacket::PlayerJoined {
                player_id,
                game_id,
                x,
                y,
                rotation,
            } => {
                let player =
                    Player::new(player_id, game_id, x, y, rotation, self.dispatcher.clone());
                self.world.add_player(player);
            }
            ServerPacket::PlayerLeft { player_id } => {
                self.world.remove_player(player_id);
            }
            ServerPacket::KeyPressed { player_id, keycode } => {
                if let Some(player) = self.world.player_mut(player_id) {
                    player.key_pressed(keycode);
                }
            }
            ServerPacket::KeyReleased { player_id, keycode } => {
                if let Some(player) = self.world.player_mut(player_id) {
                    player.key_unpressed(keycode);
                }
            }
            ServerPacket::Location { player_id, x, y } => {
                if let Some(player) = self.world.player_mut(player_id) {
                    player.set_position(x, y);
                }
            }
            ServerPacket::Rotation {
                player_id,
                rotation,
            } => {
                if let Some(player) = self.world.player_mut(player_id) {
                    player.set_rotation(rotation);
                }
            }
        }
    }

    /// One frame: reap and apply flags on every character. `delta` is
    /// accepted for parity with the frame callback; flag steps are per-tick
    /// constants, so it does not scale them.
    fn run_tick(&mut self, _delta: f32) {
        self.world.process_flags();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::keys;
    use crate::net::dispatcher::CaptureDispatcher;
    use crate::net::packets::Packet;
    use crate::util::time::unix_millis;

    fn session_with_capture() -> (GameSession, SessionHandle, Arc<CaptureDispatcher>) {
        let dispatcher = Arc::new(CaptureDispatcher::new());
        let (session, handle) =
            GameSession::new(Arc::clone(&dispatcher) as Arc<dyn PacketDispatcher>);
        (session, handle, dispatcher)
    }

    fn server(packet: ServerPacket) -> SessionEvent {
        SessionEvent::Server {
            packet,
            received_at: unix_millis(),
        }
    }

    #[test]
    fn welcome_and_join_wire_up_the_local_player() {
        let (mut session, _handle, dispatcher) = session_with_capture();

        session.handle_event(server(ServerPacket::Welcome {
            player_id: 7,
            server_time: 0,
        }));
        session.handle_event(server(ServerPacket::PlayerJoined {
            player_id: 7,
            game_id: 1,
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
        }));

        session.handle_event(SessionEvent::KeyDown { keycode: keys::UP });
        session.run_tick(tick_delta());

        let sent = dispatcher.drain();
        assert_eq!(
            sent[0],
            Packet::KeyPressed {
                player_id: 7,
                keycode: keys::UP
            }
        );
        assert_eq!(
            sent[1],
            Packet::Location {
                player_id: 7,
                x: 5.0,
                y: 0.0
            }
        );
    }

    #[test]
    fn key_edges_before_join_are_dropped() {
        let (mut session, _handle, dispatcher) = session_with_capture();

        session.handle_event(SessionEvent::KeyDown { keycode: keys::UP });
        session.run_tick(tick_delta());

        assert!(dispatcher.drain().is_empty());
    }

    #[test]
    fn relayed_edges_drive_remote_characters_silently() {
        let (mut session, _handle, dispatcher) = session_with_capture();

        // Local player is 7; 9 is a remote character
        session.handle_event(server(ServerPacket::Welcome {
            player_id: 7,
            server_time: 0,
        }));
        for player_id in [7, 9] {
            session.handle_event(server(ServerPacket::PlayerJoined {
                player_id,
                game_id: 1,
                x: 0.0,
                y: 0.0,
                rotation: 0.0,
            }));
        }
        dispatcher.drain();

        session.handle_event(server(ServerPacket::KeyPressed {
            player_id: 9,
            keycode: keys::LEFT,
        }));
        session.run_tick(tick_delta());

        // No edge packet is re-emitted for the relay, only the tick state
        let sent = dispatcher.drain();
        assert_eq!(
            sent,
            vec![Packet::Rotation {
                player_id: 9,
                rotation: 5.0
            }]
        );

        session.handle_event(server(ServerPacket::KeyReleased {
            player_id: 9,
            keycode: keys::LEFT,
        }));
        session.run_tick(tick_delta());
        assert!(dispatcher.drain().is_empty());
    }

    #[test]
    fn authoritative_corrections_overwrite_kinematics() {
        let (mut session, _handle, _dispatcher) = session_with_capture();

        session.handle_event(server(ServerPacket::PlayerJoined {
            player_id: 3,
            game_id: 1,
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
        }));
        session.handle_event(server(ServerPacket::Location {
            player_id: 3,
            x: 40.0,
            y: -8.0,
        }));
        session.handle_event(server(ServerPacket::Rotation {
            player_id: 3,
            rotation: 180.0,
        }));

        let player = session.world.player(3).unwrap();
        assert_eq!(player.x(), 40.0);
        assert_eq!(player.y(), -8.0);
        assert_eq!(player.rotation(), 180.0);

        // Unknown ids are ignored, not created
        session.handle_event(server(ServerPacket::Location {
            player_id: 99,
            x: 1.0,
            y: 1.0,
        }));
        assert!(session.world.player(99).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn frame_loop_drains_events_then_ticks() {
        let (session, handle, dispatcher) = session_with_capture();
        let session_task = tokio::spawn(session.run());

        handle
            .event_tx
            .send(server(ServerPacket::Welcome {
                player_id: 7,
                server_time: 0,
            }))
            .await
            .unwrap();
        handle
            .event_tx
            .send(server(ServerPacket::PlayerJoined {
                player_id: 7,
                game_id: 1,
                x: 0.0,
                y: 0.0,
                rotation: 0.0,
            }))
            .await
            .unwrap();
        handle.key_down(keys::UP).await;

        // Let a few frames elapse on the paused clock
        tokio::time::sleep(Duration::from_micros(TICK_DURATION_MICROS * 4)).await;

        let sent = dispatcher.sent();
        assert!(matches!(sent.first(), Some(Packet::KeyPressed { .. })));
        assert!(sent
            .iter()
            .any(|p| matches!(p, Packet::Location { .. })));

        // Dropping the last handle ends the loop
        drop(handle);
        session_task.await.unwrap();
    }
}
