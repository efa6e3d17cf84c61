//! Request-order tickets.
//!
//! Two overlapping requests for the same resource can complete in either
//! order. Each request takes a ticket before it is sent; when its response
//! arrives it is applied only if no newer ticket was issued for the same
//! key in the meantime. The last request *issued* wins, not the last
//! response to land.

use std::collections::HashMap;
use std::hash::Hash;

use parking_lot::Mutex;

/// Monotonic ticket.
pub type Ticket = u64;

/// Issues tickets per key and answers whether a ticket is still the latest.
#[derive(Debug)]
pub struct RequestSequencer<K = ()> {
    latest: Mutex<HashMap<K, Ticket>>,
    counter: Mutex<Ticket>,
}

impl<K> Default for RequestSequencer<K> {
    fn default() -> Self {
        Self {
            latest: Mutex::new(HashMap::new()),
            counter: Mutex::new(0),
        }
    }
}

impl<K: Eq + Hash> RequestSequencer<K> {
    /// Creates an empty sequencer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new ticket for `key`, superseding earlier ones.
    pub fn issue(&self, key: K) -> Ticket {
        let ticket = {
            let mut counter = self.counter.lock();
            *counter += 1;
            *counter
        };
        self.latest.lock().insert(key, ticket);
        ticket
    }

    /// True if `ticket` is still the newest for `key`.
    pub fn is_latest(&self, key: &K, ticket: Ticket) -> bool {
        self.latest.lock().get(key) == Some(&ticket)
    }

    /// Invalidates all outstanding tickets.
    pub fn reset(&self) {
        self.latest.lock().clear();
    }
}
