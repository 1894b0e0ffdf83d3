#![forbid(unsafe_code)]

//! Free-list pools of reusable tree records.
//!
//! Every report builds a fresh composite tree, but the records it is made of
//! are recycled. A [`NodePool`] hands out typed [`Handle`]s to slots; releasing
//! a handle resets the record (keeping its heap buffers), bumps the slot's
//! generation, and pushes the slot on a free list. The next `acquire` pops
//! the most recently released slot.
//!
//! # Usage
//!
//! ```
//! use spectrum_tree::pool::{NodePool, Poolable};
//!
//! #[derive(Default)]
//! struct Scratch {
//!     items: Vec<u32>,
//! }
//!
//! impl Poolable for Scratch {
//!     fn reset(&mut self) {
//!         self.items.clear();
//!     }
//! }
//!
//! let mut pool = NodePool::<Scratch>::new();
//! let a = pool.acquire();
//! pool.get_mut(a).items.push(7);
//! pool.release(a);
//!
//! let b = pool.acquire();
//! assert_eq!(a.index(), b.index());
//! assert!(!pool.is_live(a));
//! assert!(pool.get(b).items.is_empty());
//! ```
//!
//! # Invariants
//!
//! - A slot is either live (owned by exactly one tree) or on the free list.
//! - A handle is live only while its generation matches its slot's. Touching
//!   a released handle, even after its slot was handed out again, is a
//!   programming error and panics in debug builds.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// A record that can be recycled by a [`NodePool`].
pub trait Poolable: Default {
    /// Clear every field to its empty state, keeping allocations.
    fn reset(&mut self);
}

/// Typed index of a slot in a [`NodePool`], stamped with the slot's
/// generation at acquire time.
pub struct Handle<T> {
    index: u32,
    generation: u32,
    _kind: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    const fn new(index: u32, generation: u32) -> Self {
        Self {
            index,
            generation,
            _kind: PhantomData,
        }
    }

    /// Slot index inside the owning pool.
    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}v{})", self.index, self.generation)
    }
}

/// Occupancy counters of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    /// Slots currently handed out.
    pub live: usize,
    /// Slots waiting on the free list.
    pub free: usize,
}

impl PoolStats {
    /// Total slots ever allocated.
    #[must_use]
    pub const fn allocated(&self) -> usize {
        self.live + self.free
    }
}

/// An unbounded LIFO pool of `T` records.
#[derive(Debug)]
pub struct NodePool<T> {
    slots: Vec<T>,
    live: Vec<bool>,
    generations: Vec<u32>,
    free_list: Vec<u32>,
}

impl<T> Default for NodePool<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            live: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }
}

impl<T: Poolable> NodePool<T> {
    /// Create an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pool with room for `capacity` records before reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            live: Vec::with_capacity(capacity),
            generations: Vec::with_capacity(capacity),
            free_list: Vec::new(),
        }
    }

    /// Hand out a cleared record, reusing the most recently released slot.
    pub fn acquire(&mut self) -> Handle<T> {
        if let Some(index) = self.free_list.pop() {
            let slot = index as usize;
            self.live[slot] = true;
            return Handle::new(index, self.generations[slot]);
        }
        let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        assert!(index < u32::MAX, "node pool capacity exceeded");
        self.slots.push(T::default());
        self.live.push(true);
        self.generations.push(0);
        Handle::new(index, 0)
    }

    /// Reset the record and return its slot to the free list.
    pub fn release(&mut self, handle: Handle<T>) {
        let index = handle.index();
        debug_assert!(
            self.is_live(handle),
            "release of {handle:?} which is not owned by a live tree"
        );
        if !self.is_live(handle) {
            return;
        }
        self.slots[index].reset();
        self.live[index] = false;
        self.generations[index] = self.generations[index].wrapping_add(1);
        self.free_list.push(handle.index);
    }

    /// Whether the handle currently refers to a live record.
    #[inline]
    pub fn is_live(&self, handle: Handle<T>) -> bool {
        let index = handle.index();
        self.live.get(index).copied().unwrap_or(false)
            && self.generations.get(index) == Some(&handle.generation)
    }

    /// Borrow a live record.
    #[inline]
    pub fn get(&self, handle: Handle<T>) -> &T {
        debug_assert!(
            self.is_live(handle),
            "{handle:?} is not owned by a live tree"
        );
        &self.slots[handle.index()]
    }

    /// Mutably borrow a live record.
    #[inline]
    pub fn get_mut(&mut self, handle: Handle<T>) -> &mut T {
        debug_assert!(
            self.is_live(handle),
            "{handle:?} is not owned by a live tree"
        );
        &mut self.slots[handle.index()]
    }

    /// Occupancy counters.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            live: self.slots.len() - self.free_list.len(),
            free: self.free_list.len(),
        }
    }

    /// Drop every record, live or free.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.live.clear();
        self.generations.clear();
        self.free_list.clear();
    }
}
