//! Client state shared across tasks

use std::sync::Arc;

use tokio::net::UdpSocket;

use crate::config::Config;
use crate::game::{GameSession, SessionHandle};
use crate::net::dispatcher::{PacketDispatcher, UdpPacketDispatcher};

/// Shared client state
#[derive(Clone)]
pub struct ClientState {
    pub config: Arc<Config>,
    pub socket: Arc<UdpSocket>,
    pub dispatcher: Arc<dyn PacketDispatcher>,
    pub session: SessionHandle,
}

impl ClientState {
    /// Bind the socket and wire up the dispatcher and session. The returned
    /// session still has to be spawned by the caller.
    pub async fn connect(config: Config) -> anyhow::Result<(Self, GameSession)> {
        let config = Arc::new(config);

        let socket = UdpSocket::bind(config.bind_addr).await?;
        socket.connect(config.server_addr).await?;
        let socket = Arc::new(socket);

        let dispatcher: Arc<dyn PacketDispatcher> =
            Arc::new(UdpPacketDispatcher::new(socket.clone()));

        let (session, handle) = GameSession::new(dispatcher.clone());

        let state = Self {
            config,
            socket,
            dispatcher,
            session: handle,
        };

        Ok((state, session))
    }
}
