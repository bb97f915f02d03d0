//! # chatwire
//!
//! A minimal real-time text broadcast service over TCP: every connected
//! client receives every message, in the order the server received it.
//!
//! ## Architecture
//!
//! - **Protocol**: length-prefixed frames — a 4-byte ASCII decimal header
//!   followed by up to 512 opaque body bytes.
//! - **Room**: the single broadcast domain; fans frames out to its
//!   subscriber set and replays the last 100 frames to newcomers.
//! - **Session**: one per accepted connection; a read pipeline feeding the
//!   room and a dedicated writer task draining an unbounded outbound queue.
//! - **Server / Client**: the TCP acceptor and the connecting side.
//!
//! ## Example
//!
//! ```ignore
//! use chatwire::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = Server::bind("0.0.0.0:7000").await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod protocol;
pub mod room;
pub mod server;
pub mod session;
pub mod writer;

pub use client::{Client, ClientHandle};
pub use error::{ChatwireError, Result};
pub use protocol::Frame;
pub use room::Room;
pub use server::Server;
pub use session::Session;
