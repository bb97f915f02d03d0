//! TCP acceptor: turns inbound connections into sessions on the one room.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, ToSocketAddrs};

use crate::error::Result;
use crate::room::Room;
use crate::session::Session;

/// The chat server: a listener plus the process's single [`Room`].
pub struct Server {
    listener: TcpListener,
    room: Arc<Room>,
}

impl Server {
    /// Bind the listening socket.
    ///
    /// Bind failure is a startup error and is returned to the caller;
    /// everything after a successful bind is handled per connection.
    pub async fn bind<A: ToSocketAddrs>(addr: A) -> Result<Server> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Server {
            listener,
            room: Arc::new(Room::new()),
        })
    }

    /// The address the server is listening on.
    ///
    /// Useful when binding port 0.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections forever.
    ///
    /// Each accepted stream becomes a session that joins the room and
    /// starts its pipelines immediately; the loop re-arms without waiting
    /// on any session's activity. A failed accept affects only that
    /// connection attempt and the loop keeps going.
    pub async fn run(self) -> Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    tracing::debug!("accepted connection from {}", peer);
                    Session::new(stream, Arc::clone(&self.room)).start();
                }
                Err(e) => {
                    tracing::warn!("accept failed: {}", e);
                }
            }
        }
    }
}
