//! The broadcast domain: subscriber set and recent-message replay ring.
//!
//! There is exactly one [`Room`] per server process. All joins, leaves, and
//! deliveries serialize through one mutex, so the order frames arrive at
//! the room is the order every subscriber observes them.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use chatwire::protocol::Frame;
//! use chatwire::room::{Room, Subscriber};
//!
//! struct Printer;
//! impl Subscriber for Printer {
//!     fn deliver(&self, frame: Frame) {
//!         println!("{} bytes", frame.body_len());
//!     }
//! }
//!
//! let room = Room::new();
//! room.join(1, Arc::new(Printer));
//! room.deliver(Frame::new(b"hello"));
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::protocol::Frame;

/// Maximum number of frames kept for replay to late joiners.
pub const MAX_RECENT_FRAMES: usize = 100;

/// Identity of a room subscriber.
pub type SubscriberId = u64;

/// Capability to receive a broadcast frame.
///
/// The room depends on nothing else about its members: one infallible,
/// non-blocking operation. Sessions implement it by enqueueing onto their
/// outbound pipeline.
pub trait Subscriber: Send + Sync {
    /// Hand a frame to this subscriber for transmission.
    fn deliver(&self, frame: Frame);
}

struct RoomState {
    members: HashMap<SubscriberId, Arc<dyn Subscriber>>,
    recent: VecDeque<Frame>,
}

/// The single broadcast room.
///
/// Holds shared references to its member subscribers and a bounded FIFO
/// ring of the most recent frames. Never fails: a member that cannot
/// accept a delivery is simply on its way out of the room.
pub struct Room {
    state: Mutex<RoomState>,
}

impl Room {
    /// Create an empty room.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RoomState {
                members: HashMap::new(),
                recent: VecDeque::with_capacity(MAX_RECENT_FRAMES),
            }),
        }
    }

    /// Add a subscriber and replay the recent history to it.
    ///
    /// The full ring is delivered to the newcomer only, in chronological
    /// order, before any frame delivered after this call. Joining with an
    /// id that is already a member is a no-op (no duplicate replay).
    pub fn join(&self, id: SubscriberId, subscriber: Arc<dyn Subscriber>) {
        let mut state = self.state.lock();
        if state.members.contains_key(&id) {
            return;
        }

        for frame in &state.recent {
            subscriber.deliver(frame.clone());
        }
        state.members.insert(id, subscriber);
    }

    /// Remove a subscriber. No-op if it is not a member.
    ///
    /// Sessions that fail on both their read and write pipelines call this
    /// twice; the second call must be harmless.
    pub fn leave(&self, id: SubscriberId) {
        self.state.lock().members.remove(&id);
    }

    /// Record a frame in the history ring and broadcast it to every member.
    ///
    /// The sender is not excluded: a member whose frame is delivered here
    /// receives its own message back like everyone else. Eviction keeps the
    /// ring at [`MAX_RECENT_FRAMES`], oldest first.
    pub fn deliver(&self, frame: Frame) {
        let mut state = self.state.lock();

        state.recent.push_back(frame.clone());
        while state.recent.len() > MAX_RECENT_FRAMES {
            state.recent.pop_front();
        }

        for member in state.members.values() {
            member.deliver(frame.clone());
        }
    }

    /// Current number of members.
    pub fn member_count(&self) -> usize {
        self.state.lock().members.len()
    }
}

impl Default for Room {
    fn default() -> Self {
        Self::new()
    }
}
