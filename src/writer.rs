//! Dedicated writer task: one outbound pipeline per connection.
//!
//! Frames are enqueued on an mpsc channel and written by a single task, so
//! at most one write is ever in flight per connection and enqueueing never
//! touches the socket.
//!
//! # Architecture
//!
//! ```text
//! Room fan-out ─┐
//! History replay┼─► mpsc::UnboundedSender<Command> ─► Writer Task ─► Socket
//! close()      ─┘
//! ```
//!
//! The queue is unbounded: a slow reader grows its queue rather than
//! stalling the room. Orderly close travels through the same channel as
//! frames, so it can never race an in-flight write.

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{ChatwireError, Result};
use crate::protocol::Frame;

/// Instruction for the writer task.
#[derive(Debug)]
enum Command {
    /// Transmit one frame.
    Frame(Frame),
    /// Shut the write half down and stop.
    Shutdown,
}

/// Handle for enqueueing frames onto a connection's outbound pipeline.
///
/// Cheaply cloneable; clones feed the same writer task.
#[derive(Clone)]
pub struct WriterHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl WriterHandle {
    /// Enqueue a frame for transmission.
    ///
    /// Fails only if the writer task is gone (connection closed).
    pub fn send(&self, frame: Frame) -> Result<()> {
        self.tx
            .send(Command::Frame(frame))
            .map_err(|_| ChatwireError::ConnectionClosed)
    }

    /// Request an orderly shutdown of the write half.
    ///
    /// Queued frames ahead of the request are still transmitted. Harmless
    /// if the writer task has already stopped.
    pub fn shutdown(&self) {
        let _ = self.tx.send(Command::Shutdown);
    }
}

/// Spawn the writer task for a connection's write half.
///
/// Returns the handle for enqueueing and the task's join handle. The task
/// ends cleanly when every handle is dropped (after draining the queue) or
/// when a shutdown command arrives; it ends with `Err` on a write failure,
/// which the owner treats as connection teardown.
pub fn spawn_writer_task<W>(writer: W) -> (WriterHandle, JoinHandle<Result<()>>)
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(writer_loop(rx, writer));
    (WriterHandle { tx }, task)
}

/// Main writer loop - pops commands and performs the writes.
async fn writer_loop<W>(mut rx: mpsc::UnboundedReceiver<Command>, mut writer: W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(command) = rx.recv().await {
        match command {
            Command::Frame(frame) => {
                writer.write_all(&frame.encode()).await?;
                writer.flush().await?;
            }
            Command::Shutdown => {
                writer.shutdown().await?;
                return Ok(());
            }
        }
    }
    Ok(())
}
