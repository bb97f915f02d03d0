//! Server-side session: one connection's read pipeline and room membership.
//!
//! A session bridges raw I/O to the room. Its read pipeline turns the byte
//! stream into frames and hands them to [`Room::deliver`]; broadcasts come
//! back through the [`Subscriber`] capability into the outbound writer
//! task.
//!
//! # Teardown
//!
//! The room holds a shared handle to the session and each pipeline task
//! owns its I/O half, so nothing is freed while an operation is
//! outstanding. Whichever pipeline fails first leaves the room; the other
//! pipeline's later `leave` is the idempotent no-op the room guarantees.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::Result;
use crate::protocol::Frame;
use crate::room::{Room, Subscriber, SubscriberId};
use crate::writer::{spawn_writer_task, WriterHandle};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// A newly accepted connection, not yet part of the room.
pub struct Session<S> {
    id: SubscriberId,
    stream: S,
    room: Arc<Room>,
}

/// Shared handle to a running session's outbound pipeline.
///
/// This is what the room holds as a member: delivering a frame enqueues it
/// for transmission and never blocks.
#[derive(Clone)]
pub struct SessionHandle {
    id: SubscriberId,
    writer: WriterHandle,
}

impl SessionHandle {
    /// The session's identity within the room.
    pub fn id(&self) -> SubscriberId {
        self.id
    }
}

impl Subscriber for SessionHandle {
    fn deliver(&self, frame: Frame) {
        // A failed enqueue means the writer is gone and the session's
        // leave is already in flight; the frame is simply not deliverable.
        let _ = self.writer.send(frame);
    }
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    /// Wrap an accepted stream. The session is inert until [`start`].
    ///
    /// [`start`]: Session::start
    pub fn new(stream: S, room: Arc<Room>) -> Self {
        Self {
            id: NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
            stream,
            room,
        }
    }

    /// Join the room and spawn the read and write pipelines.
    ///
    /// Joining first means the history replay is queued before any frame
    /// broadcast after this call, so a newcomer always observes replay
    /// then live traffic, in order.
    pub fn start(self) -> SessionHandle {
        let (mut reader, write_half) = tokio::io::split(self.stream);
        let (writer, writer_task) = spawn_writer_task(write_half);

        let handle = SessionHandle {
            id: self.id,
            writer,
        };
        self.room.join(self.id, Arc::new(handle.clone()));

        let id = self.id;
        let room = Arc::clone(&self.room);
        tokio::spawn(async move {
            if let Err(e) = read_pipeline(&mut reader, &room).await {
                tracing::debug!(session = id, "read pipeline ended: {}", e);
            }
            room.leave(id);
        });

        let room = self.room;
        tokio::spawn(async move {
            match writer_task.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::debug!(session = id, "write pipeline failed: {}", e);
                    room.leave(id);
                }
                Err(e) => {
                    tracing::error!(session = id, "write pipeline panicked: {}", e);
                    room.leave(id);
                }
            }
        });

        handle
    }
}

/// Read frames off the wire and deliver them to the room until the
/// connection ends.
async fn read_pipeline<R>(reader: &mut R, room: &Room) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    loop {
        let frame = Frame::read_from(reader).await?;
        room.deliver(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt};
    use tokio::time::timeout;

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    #[tokio::test]
    async fn test_session_joins_room_on_start() {
        let room = Arc::new(Room::new());
        let (ours, _theirs) = duplex(4096);

        Session::new(ours, room.clone()).start();
        assert_eq!(room.member_count(), 1);
    }

    #[tokio::test]
    async fn test_received_frame_is_broadcast_back() {
        let room = Arc::new(Room::new());
        let (ours, mut theirs) = duplex(4096);
        Session::new(ours, room.clone()).start();

        // The peer sends one frame; the room echoes it to all members,
        // which here is just the sender itself.
        theirs.write_all(&Frame::new(b"hello").encode()).await.unwrap();

        let frame = timeout(Duration::from_secs(1), Frame::read_from(&mut theirs))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(frame.body(), b"hello");
    }

    #[tokio::test]
    async fn test_peer_disconnect_leaves_room() {
        let room = Arc::new(Room::new());
        let (ours, theirs) = duplex(4096);
        Session::new(ours, room.clone()).start();
        settle().await;
        assert_eq!(room.member_count(), 1);

        drop(theirs);
        settle().await;
        assert_eq!(room.member_count(), 0);
    }

    #[tokio::test]
    async fn test_bad_header_abandons_connection() {
        let room = Arc::new(Room::new());
        let (ours, mut theirs) = duplex(4096);
        Session::new(ours, room.clone()).start();

        theirs.write_all(b"zzzz").await.unwrap();
        settle().await;

        assert_eq!(room.member_count(), 0);

        // The session's write half is released; the peer sees EOF.
        let mut rest = Vec::new();
        timeout(Duration::from_secs(1), theirs.read_to_end(&mut rest))
            .await
            .unwrap()
            .unwrap();
        assert!(rest.is_empty());
    }

    #[tokio::test]
    async fn test_oversized_declared_length_abandons_connection() {
        let room = Arc::new(Room::new());
        let (ours, mut theirs) = duplex(4096);
        Session::new(ours, room.clone()).start();

        theirs.write_all(b" 600").await.unwrap();
        settle().await;
        assert_eq!(room.member_count(), 0);
    }

    #[tokio::test]
    async fn test_late_session_receives_history() {
        let room = Arc::new(Room::new());
        room.deliver(Frame::new(b"before"));

        let (ours, mut theirs) = duplex(4096);
        Session::new(ours, room.clone()).start();

        let frame = timeout(Duration::from_secs(1), Frame::read_from(&mut theirs))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(frame.body(), b"before");
    }
}
