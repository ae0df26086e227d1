//! Slot storage with stable keys.
//!
//! Storage owns node values and hands out [`NodeKey`]s that stay valid until
//! the slot is removed. Lists link keys together and never allocate nodes
//! themselves, so every allocation a list needs goes through
//! [`Storage::try_insert`] and can fail without side effects.

use core::fmt;

use crate::NodeKey;

/// Slot storage addressed by [`NodeKey`].
///
/// # Requirements
///
/// Implementations must provide:
/// - **Stable keys**: a key stays valid until its slot is removed
/// - **Failure without side effects**: a rejected insert leaves storage as it was
///   and returns the value in [`Full`]
/// - **Slot reuse**: removed slots may be handed out again
///
/// # Implementations
///
/// - [`SlotStorage<T>`] - vector backed, optionally bounded (in this crate)
/// - `slab::Slab<T>` - growable (feature `slab`)
pub trait Storage<T> {
    /// Inserts a value, returning its key.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if no slot could be allocated.
    fn try_insert(&mut self, value: T) -> Result<NodeKey, Full<T>>;

    /// Removes and returns the value at `key`, if present.
    fn remove(&mut self, key: NodeKey) -> Option<T>;

    /// Returns a reference to the value at `key`, if present.
    fn get(&self, key: NodeKey) -> Option<&T>;

    /// Returns a mutable reference to the value at `key`, if present.
    fn get_mut(&mut self, key: NodeKey) -> Option<&mut T>;

    /// Returns the number of occupied slots.
    fn len(&self) -> usize;

    /// Returns `true` if no slots are occupied.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Error returned when storage cannot take another value.
///
/// Carries the rejected value so the caller decides whether to drop or
/// retry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that could not be inserted.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Display for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "storage is full")
    }
}

impl<T: fmt::Debug> std::error::Error for Full<T> {}

// =============================================================================
// SlotStorage - vector backed, free list threaded through vacant slots
// =============================================================================

#[derive(Debug, Clone)]
enum Slot<T> {
    Occupied(T),
    Vacant { next_free: NodeKey },
}

/// Vector-backed storage with an intrusive free list.
///
/// Vacant slots form a singly-linked free list, so removal and reuse are
/// O(1). Growth goes through [`Vec::try_reserve`]; an allocator failure is
/// reported as [`Full`] rather than aborting.
///
/// A storage created with [`with_capacity`](SlotStorage::with_capacity) is
/// bounded: it refuses to hold more than that many values at once.
///
/// # Example
///
/// ```
/// use agenda_collections::{SlotStorage, Storage};
///
/// let mut storage: SlotStorage<&str> = SlotStorage::with_capacity(1);
///
/// let key = storage.try_insert("a").unwrap();
/// assert_eq!(storage.get(key), Some(&"a"));
///
/// // Bounded: the second value comes back
/// assert_eq!(storage.try_insert("b").unwrap_err().into_inner(), "b");
///
/// assert_eq!(storage.remove(key), Some("a"));
/// assert!(storage.try_insert("b").is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct SlotStorage<T> {
    slots: Vec<Slot<T>>,
    free_head: NodeKey,
    len: usize,
    limit: Option<usize>,
}

impl<T> Default for SlotStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SlotStorage<T> {
    /// Creates unbounded storage. Nothing is allocated until the first insert.
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: NodeKey::NONE,
            len: 0,
            limit: None,
        }
    }

    /// Creates storage that holds at most `capacity` values.
    ///
    /// Nothing is allocated until the first insert; slots grow on demand up
    /// to the bound. A bound beyond the key range is reached as `Full` at
    /// the key range instead.
    pub const fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::new(),
            free_head: NodeKey::NONE,
            len: 0,
            limit: Some(capacity),
        }
    }

    /// Returns the bound on live values, or `None` if unbounded.
    #[inline]
    pub const fn capacity(&self) -> Option<usize> {
        self.limit
    }

    /// Returns `true` if a bounded storage holds its maximum.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.limit.is_some_and(|limit| self.len >= limit)
    }

    /// Creates empty storage with the same bound as `self`.
    pub fn empty_like(&self) -> Self {
        match self.limit {
            Some(capacity) => Self::with_capacity(capacity),
            None => Self::new(),
        }
    }

    /// Drops every value and forgets all slots.
    ///
    /// Keys handed out before this call are invalid afterwards.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = NodeKey::NONE;
        self.len = 0;
    }

    fn grow(&mut self, value: T) -> Result<NodeKey, Full<T>> {
        let index = self.slots.len();
        if index > NodeKey::MAX_INDEX || self.slots.try_reserve(1).is_err() {
            tracing::debug!(slots = index, "slot storage could not grow");
            return Err(Full(value));
        }

        self.slots.push(Slot::Occupied(value));
        Ok(NodeKey::from_index(index))
    }
}

impl<T> Storage<T> for SlotStorage<T> {
    fn try_insert(&mut self, value: T) -> Result<NodeKey, Full<T>> {
        if self.is_full() {
            return Err(Full(value));
        }

        let key = if self.free_head.is_some() {
            let key = self.free_head;
            let slot = &mut self.slots[key.index()];
            let Slot::Vacant { next_free } = *slot else {
                unreachable!("free list points at an occupied slot");
            };
            *slot = Slot::Occupied(value);
            self.free_head = next_free;
            key
        } else {
            self.grow(value)?
        };

        self.len += 1;
        Ok(key)
    }

    fn remove(&mut self, key: NodeKey) -> Option<T> {
        let slot = self.slots.get_mut(key.index())?;
        if !matches!(slot, Slot::Occupied(_)) {
            return None;
        }

        let vacated = core::mem::replace(
            slot,
            Slot::Vacant {
                next_free: self.free_head,
            },
        );
        self.free_head = key;
        self.len -= 1;

        match vacated {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    #[inline]
    fn get(&self, key: NodeKey) -> Option<&T> {
        match self.slots.get(key.index())? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    #[inline]
    fn get_mut(&mut self, key: NodeKey) -> Option<&mut T> {
        match self.slots.get_mut(key.index())? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }
}

// =============================================================================
// slab::Slab implementation
// =============================================================================

#[cfg(feature = "slab")]
impl<T> Storage<T> for slab::Slab<T> {
    fn try_insert(&mut self, value: T) -> Result<NodeKey, Full<T>> {
        if self.vacant_key() > NodeKey::MAX_INDEX {
            return Err(Full(value));
        }
        Ok(NodeKey::from_index(self.insert(value)))
    }

    #[inline]
    fn remove(&mut self, key: NodeKey) -> Option<T> {
        self.try_remove(key.index())
    }

    #[inline]
    fn get(&self, key: NodeKey) -> Option<&T> {
        slab::Slab::get(self, key.index())
    }

    #[inline]
    fn get_mut(&mut self, key: NodeKey) -> Option<&mut T> {
        slab::Slab::get_mut(self, key.index())
    }

    #[inline]
    fn len(&self) -> usize {
        slab::Slab::len(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_insert_get_remove() {
        let mut storage: SlotStorage<u64> = SlotStorage::new();
        assert!(storage.is_empty());
        assert_eq!(storage.capacity(), None);

        let a = storage.try_insert(1).unwrap();
        let b = storage.try_insert(2).unwrap();
        assert_ne!(a, b);
        assert_eq!(storage.len(), 2);
        assert_eq!(storage.get(a), Some(&1));
        assert_eq!(storage.get(b), Some(&2));

        *storage.get_mut(b).unwrap() = 20;
        assert_eq!(storage.remove(b), Some(20));
        assert_eq!(storage.get(b), None);
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn remove_twice_returns_none() {
        let mut storage: SlotStorage<u64> = SlotStorage::new();
        let a = storage.try_insert(1).unwrap();

        assert_eq!(storage.remove(a), Some(1));
        assert_eq!(storage.remove(a), None);
        assert_eq!(storage.len(), 0);
    }

    #[test]
    fn unknown_keys_are_absent() {
        let mut storage: SlotStorage<u64> = SlotStorage::new();
        storage.try_insert(1).unwrap();

        assert_eq!(storage.get(NodeKey::NONE), None);
        assert_eq!(storage.get(NodeKey::from_index(99)), None);
        assert_eq!(storage.remove(NodeKey::from_index(99)), None);
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn vacated_slots_are_reused_lifo() {
        let mut storage: SlotStorage<u64> = SlotStorage::new();
        let a = storage.try_insert(1).unwrap();
        let b = storage.try_insert(2).unwrap();
        storage.try_insert(3).unwrap();

        storage.remove(a);
        storage.remove(b);

        assert_eq!(storage.try_insert(4).unwrap(), b);
        assert_eq!(storage.try_insert(5).unwrap(), a);
        assert_eq!(storage.get(a), Some(&5));
        assert_eq!(storage.get(b), Some(&4));
    }

    #[test]
    fn bounded_rejects_when_full() {
        let mut storage: SlotStorage<String> = SlotStorage::with_capacity(2);
        assert_eq!(storage.capacity(), Some(2));

        let a = storage.try_insert("a".into()).unwrap();
        storage.try_insert("b".into()).unwrap();
        assert!(storage.is_full());

        let err = storage.try_insert("c".into()).unwrap_err();
        assert_eq!(err.into_inner(), "c");
        assert_eq!(storage.len(), 2);

        storage.remove(a);
        assert!(!storage.is_full());
        assert!(storage.try_insert("c".into()).is_ok());
    }

    #[test]
    fn bounded_allocates_on_demand() {
        let mut storage: SlotStorage<u64> = SlotStorage::with_capacity(100_000);
        assert_eq!(storage.slots.capacity(), 0);
        assert_eq!(storage.empty_like().slots.capacity(), 0);

        storage.try_insert(1).unwrap();
        assert!(storage.slots.capacity() < 100_000);
    }

    #[test]
    fn bound_past_key_range_does_not_panic() {
        let mut storage: SlotStorage<u8> = SlotStorage::with_capacity(usize::MAX);
        assert_eq!(storage.capacity(), Some(usize::MAX));
        assert!(storage.try_insert(1).is_ok());
    }

    #[test]
    fn zero_capacity_rejects_everything() {
        let mut storage: SlotStorage<u8> = SlotStorage::with_capacity(0);
        assert_eq!(storage.try_insert(1), Err(Full(1)));
    }

    #[test]
    fn empty_like_keeps_bound() {
        let mut bounded: SlotStorage<u8> = SlotStorage::with_capacity(3);
        bounded.try_insert(1).unwrap();

        let fresh = bounded.empty_like();
        assert!(fresh.is_empty());
        assert_eq!(fresh.capacity(), Some(3));

        let unbounded: SlotStorage<u8> = SlotStorage::new();
        assert_eq!(unbounded.empty_like().capacity(), None);
    }

    #[test]
    fn clear_drops_values() {
        use std::rc::Rc;

        let tracker = Rc::new(());
        let mut storage = SlotStorage::new();
        storage.try_insert(Rc::clone(&tracker)).unwrap();
        storage.try_insert(Rc::clone(&tracker)).unwrap();
        assert_eq!(Rc::strong_count(&tracker), 3);

        storage.clear();
        assert_eq!(Rc::strong_count(&tracker), 1);
        assert!(storage.is_empty());
    }

    #[test]
    fn full_display() {
        assert_eq!(Full(5u8).to_string(), "storage is full");
    }
}

#[cfg(all(test, feature = "slab"))]
mod tests_slab {
    use super::*;

    #[test]
    fn slab_insert_remove() {
        let mut storage: slab::Slab<u64> = slab::Slab::new();
        let a = Storage::try_insert(&mut storage, 1).unwrap();
        let b = Storage::try_insert(&mut storage, 2).unwrap();

        assert_eq!(Storage::len(&storage), 2);
        assert_eq!(Storage::get(&storage, a), Some(&1));
        assert_eq!(Storage::remove(&mut storage, a), Some(1));
        assert_eq!(Storage::remove(&mut storage, a), None);
        assert_eq!(Storage::get(&storage, b), Some(&2));
    }
}
