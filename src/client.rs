//! Client-side connection: read pipeline feeding a display sink, plus the
//! outbound pipeline for typed lines.
//!
//! The client owns one TCP connection. Received frames are decoded and
//! their bodies handed to a caller-supplied sink; outbound bodies are
//! framed and enqueued. `send` and `close` are synchronous because the
//! outbound queue is unbounded — producers (like a blocking stdin thread)
//! never wait on the socket.
//!
//! # Example
//!
//! ```ignore
//! use chatwire::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::connect(("localhost", 7000), |body| {
//!         print!("{}", String::from_utf8_lossy(&body));
//!     })
//!     .await?;
//!
//!     client.send(b"hello\n")?;
//!     client.close();
//!     client.wait_for_shutdown().await;
//!     Ok(())
//! }
//! ```

use bytes::Bytes;

use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::oneshot;

use crate::error::Result;
use crate::protocol::Frame;
use crate::writer::{spawn_writer_task, WriterHandle};

/// Handle for sending on a client connection.
///
/// Cheaply cloneable; hand one to the thread producing outbound lines.
#[derive(Clone)]
pub struct ClientHandle {
    writer: WriterHandle,
}

impl ClientHandle {
    /// Frame a body and enqueue it for transmission.
    ///
    /// Bodies longer than the protocol maximum are truncated, matching
    /// [`Frame::new`]. Fails once the connection is gone.
    pub fn send(&self, body: &[u8]) -> Result<()> {
        self.writer.send(Frame::new(body))
    }

    /// Request an orderly shutdown.
    ///
    /// The request queues behind any pending frames, so it cannot race an
    /// in-flight write. The server observes EOF and drops the session;
    /// the read pipeline then ends on its own.
    pub fn close(&self) {
        self.writer.shutdown();
    }
}

/// A running client connection.
pub struct Client {
    handle: ClientHandle,
    shutdown_rx: oneshot::Receiver<()>,
}

impl Client {
    /// Connect to a server and start both pipelines.
    ///
    /// `addr` accepts a `(host, port)` pair, resolving hostnames. The
    /// `sink` receives every decoded frame body, in server order.
    pub async fn connect<A, F>(addr: A, sink: F) -> Result<Client>
    where
        A: ToSocketAddrs,
        F: FnMut(Bytes) + Send + 'static,
    {
        let stream = TcpStream::connect(addr).await?;
        let (mut reader, write_half) = stream.into_split();

        let (writer, _writer_task) = spawn_writer_task(write_half);

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        tokio::spawn(async move {
            let mut sink = sink;
            loop {
                match Frame::read_from(&mut reader).await {
                    Ok(frame) => sink(frame.body_bytes()),
                    Err(e) => {
                        tracing::debug!("server connection ended: {}", e);
                        break;
                    }
                }
            }
            let _ = shutdown_tx.send(());
        });

        Ok(Client {
            handle: ClientHandle { writer },
            shutdown_rx,
        })
    }

    /// Get a cloneable sending handle.
    pub fn handle(&self) -> ClientHandle {
        self.handle.clone()
    }

    /// Frame a body and enqueue it for transmission.
    pub fn send(&self, body: &[u8]) -> Result<()> {
        self.handle.send(body)
    }

    /// Request an orderly shutdown. See [`ClientHandle::close`].
    pub fn close(&self) {
        self.handle.close()
    }

    /// Block until the read pipeline ends (server closed or I/O error).
    pub async fn wait_for_shutdown(self) {
        let _ = self.shutdown_rx.await;
    }
}
