//! Scoped event subscriptions.
//!
//! A mounted stack section holds one [`Subscription`] per channel it listens
//! on.  Dropping the subscription removes the listener, so tearing down a
//! section releases everything it acquired no matter what state it was in.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use tracing::trace;

/// Host event channels a section can listen on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Scroll,
    Resize,
    Intersection,
}

#[derive(Debug, Default)]
struct Listeners {
    next_id: u64,
    active: HashMap<u64, Channel>,
}

/// Single-threaded listener table shared by the host loop and its sections.
#[derive(Debug, Clone, Default)]
pub struct ListenerRegistry {
    inner: Rc<RefCell<Listeners>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, channel: Channel) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.active.insert(id, channel);
        trace!(id, ?channel, "listener added");
        Subscription {
            id,
            channel,
            registry: Rc::downgrade(&self.inner),
        }
    }

    /// Number of live listeners on `channel`.
    pub fn count(&self, channel: Channel) -> usize {
        self.inner
            .borrow()
            .active
            .values()
            .filter(|&&c| c == channel)
            .count()
    }

    pub fn has_listeners(&self, channel: Channel) -> bool {
        self.count(channel) > 0
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().active.is_empty()
    }
}

/// Live listener registration; removed from its registry on drop.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    channel: Channel,
    registry: Weak<RefCell<Listeners>>,
}

impl Subscription {
    pub fn channel(&self) -> Channel {
        self.channel
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            inner.borrow_mut().active.remove(&self.id);
            trace!(id = self.id, channel = ?self.channel, "listener removed");
        }
    }
}
