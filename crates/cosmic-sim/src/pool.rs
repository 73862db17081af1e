//! Fixed-capacity free-list pool with generation-checked handles.
//!
//! Every slot is allocated at construction. `acquire`/`release` are O(1)
//! and never allocate after the pool is built.

use std::sync::{Arc, Mutex, MutexGuard};

use log::warn;

use cosmic_core::components::Entity;
use cosmic_core::error::PoolExhausted;

/// Stable reference to a pool slot. A handle goes stale once its slot is
/// released, even if the slot is later reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    pub index: u32,
    pub generation: u32,
}

impl std::fmt::Display for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}g{}", self.index, self.generation)
    }
}

/// Lifetime counters of a pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub acquired: u64,
    pub released: u64,
    /// Spawn requests that found the pool full.
    pub dropped: u64,
}

pub struct EntityPool<T> {
    slots: Vec<T>,
    generations: Vec<u32>,
    active: Vec<bool>,
    free_indices: Vec<u32>,
    stats: PoolStats,
}

/// An entity pool shared between the simulation and input threads. The
/// lock guards every mutation of the pool's active set.
pub type SharedPool = Arc<Mutex<EntityPool<Entity>>>;

impl<T: Default> EntityPool<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| T::default()).collect(),
            generations: vec![0; capacity],
            active: vec![false; capacity],
            // Reversed so the lowest index is handed out first
            free_indices: (0..capacity as u32).rev().collect(),
            stats: PoolStats::default(),
        }
    }

    pub fn shared(capacity: usize) -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self::new(capacity)))
    }

    /// Claim a free slot. The slot holds `T::default()` until written.
    pub fn acquire(&mut self) -> Result<Handle, PoolExhausted> {
        match self.free_indices.pop() {
            Some(index) => {
                self.active[index as usize] = true;
                self.stats.acquired += 1;
                Ok(Handle {
                    index,
                    generation: self.generations[index as usize],
                })
            }
            None => {
                self.stats.dropped += 1;
                Err(PoolExhausted {
                    capacity: self.slots.len(),
                })
            }
        }
    }

    /// Claim a free slot and store `item` in it.
    pub fn spawn(&mut self, item: T) -> Result<Handle, PoolExhausted> {
        let handle = self.acquire()?;
        self.slots[handle.index as usize] = item;
        Ok(handle)
    }

    /// Spawn up to `count` items built by `make(i)`. Stops at the first
    /// exhausted acquire and returns how many were spawned.
    pub fn spawn_many(&mut self, count: usize, mut make: impl FnMut(usize) -> T) -> usize {
        for i in 0..count {
            if self.spawn(make(i)).is_err() {
                return i;
            }
        }
        count
    }

    /// Reset the slot and return it to the free set. Returns false (and
    /// changes nothing) for a stale or already-released handle.
    pub fn release(&mut self, handle: Handle) -> bool {
        if !self.is_alive(handle) {
            return false;
        }
        let index = handle.index as usize;
        self.slots[index] = T::default();
        self.active[index] = false;
        self.generations[index] = self.generations[index].wrapping_add(1);
        self.free_indices.push(handle.index);
        self.stats.released += 1;
        true
    }

    pub fn is_alive(&self, handle: Handle) -> bool {
        let index = handle.index as usize;
        index < self.slots.len() && self.active[index] && self.generations[index] == handle.generation
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.is_alive(handle).then(|| &self.slots[handle.index as usize])
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        if self.is_alive(handle) {
            Some(&mut self.slots[handle.index as usize])
        } else {
            None
        }
    }

    /// Active slots in index order. Order is not stable across
    /// acquire/release cycles.
    pub fn iter_active(&self) -> impl Iterator<Item = (Handle, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(i, _)| self.active[*i])
            .map(|(i, item)| (self.handle_at(i), item))
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (Handle, &mut T)> + '_ {
        let active = &self.active;
        let generations = &self.generations;
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(i, _)| active[*i])
            .map(|(i, item)| {
                (
                    Handle {
                        index: i as u32,
                        generation: generations[i],
                    },
                    item,
                )
            })
    }

    /// Release every active slot.
    pub fn clear(&mut self) {
        for index in 0..self.slots.len() {
            if self.active[index] {
                let handle = self.handle_at(index);
                self.release(handle);
            }
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.len() - self.free_indices.len()
    }

    pub fn free_count(&self) -> usize {
        self.free_indices.len()
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    fn handle_at(&self, index: usize) -> Handle {
        Handle {
            index: index as u32,
            generation: self.generations[index],
        }
    }
}

/// Lock `mutex`, recovering the data if a previous holder panicked.
pub fn lock_recover<'a, T>(mutex: &'a Mutex<T>, what: &str) -> MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        warn!("{what} lock was poisoned; recovering");
        poisoned.into_inner()
    })
}
