//! Bounded queue of events waiting for the next snapshot.
//!
//! A host that never asks for snapshots must not grow memory without
//! limit: once full, the oldest event is dropped for each new one.

use std::collections::VecDeque;

use log::debug;

use cosmic_core::events::BattleEvent;

#[derive(Debug, Clone)]
pub struct EventBacklog {
    events: VecDeque<BattleEvent>,
    capacity: usize,
    /// Events dropped since the last `take`.
    dropped: usize,
}

impl EventBacklog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
            dropped: 0,
        }
    }

    pub fn push(&mut self, event: BattleEvent) {
        if self.capacity == 0 {
            self.dropped += 1;
            return;
        }
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(event);
    }

    /// Hand over every queued event, oldest first.
    pub fn take(&mut self) -> Vec<BattleEvent> {
        if self.dropped > 0 {
            debug!("{} events dropped since the last snapshot", self.dropped);
            self.dropped = 0;
        }
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.dropped = 0;
    }
}

impl Extend<BattleEvent> for EventBacklog {
    fn extend<I: IntoIterator<Item = BattleEvent>>(&mut self, iter: I) {
        for event in iter {
            self.push(event);
        }
    }
}
