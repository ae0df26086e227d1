//! Doubly-linked list over slot storage.
//!
//! Nodes live in a [`Storage`]; the list only tracks head, tail and length
//! and rewires `prev`/`next` keys. The list never looks at the payload, so
//! ordering and comparison belong to whatever sits on top of it (see
//! [`SortedQueue`](crate::SortedQueue)).
//!
//! # Storage Invariant
//!
//! A list must always be used with the same storage instance. Keys from one
//! storage mean nothing in another.
//!
//! # Detached Nodes
//!
//! Allocation and linking are separate steps. [`List::create_node`] puts a
//! payload in storage as a detached node; [`List::link_front`] and
//! [`List::link_after`] splice it in. The only fallible step is the first
//! one, so a caller can allocate everything it needs before touching the
//! list.
//!
//! # Example
//!
//! ```
//! use agenda_collections::{List, ListStorage};
//!
//! let mut storage: ListStorage<&str> = ListStorage::new();
//! let mut list: List<&str, ListStorage<&str>> = List::new();
//!
//! let b = list.create_node(&mut storage, "b").unwrap();
//! list.link_front(&mut storage, b);
//!
//! let a = list.create_node(&mut storage, "a").unwrap();
//! list.link_front(&mut storage, a);
//!
//! let c = list.create_node(&mut storage, "c").unwrap();
//! list.link_after(&mut storage, b, c);
//!
//! let values: Vec<_> = list.iter(&storage).copied().collect();
//! assert_eq!(values, ["a", "b", "c"]);
//!
//! // Removal hands the payload back
//! assert_eq!(list.remove(&mut storage, b), Some("b"));
//! assert_eq!(list.len(), 2);
//! ```

use std::marker::PhantomData;

use crate::{Full, NodeKey, SlotStorage, Storage};

/// Slot storage holding list nodes.
pub type ListStorage<T> = SlotStorage<ListNode<T>>;

/// A node in the linked list.
///
/// Wraps the payload with `prev`/`next` links. Callers reach the payload
/// through the list's accessors.
#[derive(Debug, Clone)]
pub struct ListNode<T> {
    pub(crate) data: T,
    pub(crate) prev: NodeKey,
    pub(crate) next: NodeKey,
}

impl<T> ListNode<T> {
    #[inline]
    fn detached(data: T) -> Self {
        Self {
            data,
            prev: NodeKey::NONE,
            next: NodeKey::NONE,
        }
    }
}

/// A doubly-linked list over external storage.
///
/// # Type Parameters
///
/// - `T`: payload type
/// - `S`: storage type (e.g. [`ListStorage<T>`])
///
/// # Invalid Keys
///
/// Operations are fail-soft: a key that is not in storage makes getters
/// return `None`, and linking or removal report failure without changing
/// anything.
#[derive(Debug)]
pub struct List<T, S>
where
    S: Storage<ListNode<T>>,
{
    head: NodeKey,
    tail: NodeKey,
    len: usize,
    _marker: PhantomData<(T, S)>,
}

impl<T, S> Default for List<T, S>
where
    S: Storage<ListNode<T>>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S> List<T, S>
where
    S: Storage<ListNode<T>>,
{
    /// Creates an empty list.
    #[inline]
    pub const fn new() -> Self {
        Self {
            head: NodeKey::NONE,
            tail: NodeKey::NONE,
            len: 0,
            _marker: PhantomData,
        }
    }

    /// Returns the number of linked nodes.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no nodes are linked.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the head node's key, or `None` if empty.
    #[inline]
    pub const fn front_key(&self) -> Option<NodeKey> {
        self.head.into_option()
    }

    /// Returns the tail node's key, or `None` if empty.
    #[inline]
    pub const fn back_key(&self) -> Option<NodeKey> {
        self.tail.into_option()
    }

    // ========================================================================
    // Node allocation
    // ========================================================================

    /// Stores `data` as a detached node and returns its key.
    ///
    /// The node is not part of the list until it is linked.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(data))` if storage has no room.
    #[inline]
    pub fn create_node(&self, storage: &mut S, data: T) -> Result<NodeKey, Full<T>> {
        storage
            .try_insert(ListNode::detached(data))
            .map_err(|Full(node)| Full(node.data))
    }

    // ========================================================================
    // Link operations (no allocation)
    // ========================================================================

    /// Links a detached node at the front of the list.
    ///
    /// Returns `false` without changes if `key` is not in storage or is
    /// already linked.
    pub fn link_front(&mut self, storage: &mut S, key: NodeKey) -> bool {
        if !self.is_detached(storage, key) {
            return false;
        }

        let old_head = self.head;
        if let Some(node) = storage.get_mut(key) {
            node.prev = NodeKey::NONE;
            node.next = old_head;
        }

        match storage.get_mut(old_head) {
            Some(head) => head.prev = key,
            None => self.tail = key,
        }

        self.head = key;
        self.len += 1;
        true
    }

    /// Links a detached node at the back of the list.
    ///
    /// Returns `false` without changes if `key` is not in storage or is
    /// already linked.
    pub fn link_back(&mut self, storage: &mut S, key: NodeKey) -> bool {
        match self.tail.into_option() {
            Some(tail) => self.link_after(storage, tail, key),
            None => self.link_front(storage, key),
        }
    }

    /// Links a detached node immediately after `after`.
    ///
    /// Returns `false` without changes if either key is not in storage, if
    /// `after` is not linked in this list, or if `key` is already linked.
    pub fn link_after(&mut self, storage: &mut S, after: NodeKey, key: NodeKey) -> bool {
        if after == key || !self.is_detached(storage, key) || !self.is_linked(storage, after) {
            return false;
        }

        let Some(after_node) = storage.get_mut(after) else {
            return false;
        };
        let next = after_node.next;
        after_node.next = key;

        if let Some(node) = storage.get_mut(key) {
            node.prev = after;
            node.next = next;
        }

        match storage.get_mut(next) {
            Some(next_node) => next_node.prev = key,
            None => self.tail = key,
        }

        self.len += 1;
        true
    }

    /// Unlinks a node without releasing it.
    ///
    /// The node stays in storage, detached, and can be linked again.
    /// Returns `false` if `key` was not linked in this list.
    pub fn unlink(&mut self, storage: &mut S, key: NodeKey) -> bool {
        if !self.is_linked(storage, key) {
            return false;
        }

        let Some(node) = storage.get_mut(key) else {
            return false;
        };
        let prev = node.prev;
        let next = node.next;
        node.prev = NodeKey::NONE;
        node.next = NodeKey::NONE;

        match storage.get_mut(prev) {
            Some(prev_node) => prev_node.next = next,
            None => self.head = next,
        }

        match storage.get_mut(next) {
            Some(next_node) => next_node.prev = prev,
            None => self.tail = prev,
        }

        self.len -= 1;
        true
    }

    /// Unlinks a node, releases its slot and hands the payload back.
    ///
    /// Detached nodes are released too. Returns `None` if `key` is not in
    /// storage.
    pub fn remove(&mut self, storage: &mut S, key: NodeKey) -> Option<T> {
        storage.get(key)?;
        self.unlink(storage, key);
        storage.remove(key).map(|node| node.data)
    }

    /// Removes and returns the front payload.
    #[inline]
    pub fn pop_front(&mut self, storage: &mut S) -> Option<T> {
        let head = self.front_key()?;
        self.remove(storage, head)
    }

    /// Removes every node, dropping the payloads.
    pub fn clear(&mut self, storage: &mut S) {
        let mut key = self.head;
        while let Some(node) = storage.remove(key) {
            key = node.next;
        }

        self.head = NodeKey::NONE;
        self.tail = NodeKey::NONE;
        self.len = 0;
    }

    // ========================================================================
    // Access and navigation
    // ========================================================================

    /// Returns the payload stored at `key`.
    #[inline]
    pub fn get<'a>(&self, storage: &'a S, key: NodeKey) -> Option<&'a T> {
        storage.get(key).map(|node| &node.data)
    }

    /// Returns the payload stored at `key` mutably.
    #[inline]
    pub fn get_mut<'a>(&self, storage: &'a mut S, key: NodeKey) -> Option<&'a mut T> {
        storage.get_mut(key).map(|node| &mut node.data)
    }

    /// Returns the payload at the front of the list.
    #[inline]
    pub fn front<'a>(&self, storage: &'a S) -> Option<&'a T> {
        self.get(storage, self.head)
    }

    /// Returns the key of the node after `key`.
    ///
    /// Returns `None` if `key` is the tail or not in storage.
    #[inline]
    pub fn next_key(&self, storage: &S, key: NodeKey) -> Option<NodeKey> {
        storage.get(key)?.next.into_option()
    }

    /// Returns the key of the node before `key`.
    ///
    /// Returns `None` if `key` is the head or not in storage.
    #[inline]
    pub fn prev_key(&self, storage: &S, key: NodeKey) -> Option<NodeKey> {
        storage.get(key)?.prev.into_option()
    }

    /// Returns `true` if `key` is linked into this list.
    #[inline]
    pub fn is_linked(&self, storage: &S, key: NodeKey) -> bool {
        match storage.get(key) {
            Some(node) => node.prev.is_some() || node.next.is_some() || self.head == key,
            None => false,
        }
    }

    #[inline]
    fn is_detached(&self, storage: &S, key: NodeKey) -> bool {
        storage.get(key).is_some() && !self.is_linked(storage, key)
    }

    // ========================================================================
    // Iteration
    // ========================================================================

    /// Returns an iterator over payloads, front to back.
    #[inline]
    pub fn iter<'a>(&self, storage: &'a S) -> Iter<'a, T, S> {
        Iter {
            storage,
            current: self.head,
            remaining: self.len,
            _marker: PhantomData,
        }
    }

    /// Returns an iterator over node keys, front to back.
    ///
    /// Collect the keys first if the list will be modified while walking it.
    #[inline]
    pub fn keys<'a>(&self, storage: &'a S) -> Keys<'a, T, S> {
        Keys {
            storage,
            current: self.head,
            remaining: self.len,
            _marker: PhantomData,
        }
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Iterator over references to list payloads.
pub struct Iter<'a, T, S> {
    storage: &'a S,
    current: NodeKey,
    remaining: usize,
    _marker: PhantomData<T>,
}

impl<'a, T: 'a, S> Iterator for Iter<'a, T, S>
where
    S: Storage<ListNode<T>>,
{
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.storage.get(self.current)?;
        self.current = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.data)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T: 'a, S> ExactSizeIterator for Iter<'a, T, S> where S: Storage<ListNode<T>> {}

/// Iterator over list node keys.
pub struct Keys<'a, T, S> {
    storage: &'a S,
    current: NodeKey,
    remaining: usize,
    _marker: PhantomData<T>,
}

impl<'a, T: 'a, S> Iterator for Keys<'a, T, S>
where
    S: Storage<ListNode<T>>,
{
    type Item = NodeKey;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let key = self.current;
        self.current = self.storage.get(key)?.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T: 'a, S> ExactSizeIterator for Keys<'a, T, S> where S: Storage<ListNode<T>> {}

#[cfg(test)]
mod tests {
    use super::*;

    type TestList = List<u64, ListStorage<u64>>;

    fn push_front(list: &mut TestList, storage: &mut ListStorage<u64>, value: u64) -> NodeKey {
        let key = list.create_node(storage, value).unwrap();
        assert!(list.link_front(storage, key));
        key
    }

    fn push_back(list: &mut TestList, storage: &mut ListStorage<u64>, value: u64) -> NodeKey {
        let key = list.create_node(storage, value).unwrap();
        assert!(list.link_back(storage, key));
        key
    }

    fn values(list: &TestList, storage: &ListStorage<u64>) -> Vec<u64> {
        list.iter(storage).copied().collect()
    }

    /// Walks the list both ways and checks every cross link.
    fn assert_consistent(list: &TestList, storage: &ListStorage<u64>) {
        let forward: Vec<_> = list.keys(storage).collect();
        assert_eq!(forward.len(), list.len());

        let mut backward = Vec::new();
        let mut key = list.back_key();
        while let Some(k) = key {
            backward.push(k);
            key = list.prev_key(storage, k);
        }
        backward.reverse();
        assert_eq!(forward, backward);

        assert_eq!(list.front_key(), forward.first().copied());
        assert_eq!(list.back_key(), forward.last().copied());
    }

    #[test]
    fn new_list_is_empty() {
        let storage = ListStorage::<u64>::new();
        let list: TestList = List::new();

        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert!(list.front_key().is_none());
        assert!(list.back_key().is_none());
        assert!(list.front(&storage).is_none());
        assert_eq!(list.iter(&storage).next(), None);
    }

    #[test]
    fn created_node_is_detached() {
        let mut storage = ListStorage::new();
        let list: TestList = List::new();

        let key = list.create_node(&mut storage, 7).unwrap();

        assert!(list.is_empty());
        assert!(!list.is_linked(&storage, key));
        assert_eq!(list.get(&storage, key), Some(&7));
        assert_eq!(list.next_key(&storage, key), None);
    }

    #[test]
    fn create_node_full_returns_data() {
        let mut storage = ListStorage::with_capacity(1);
        let mut list: TestList = List::new();

        push_front(&mut list, &mut storage, 1);
        let err = list.create_node(&mut storage, 2).unwrap_err();

        assert_eq!(err.into_inner(), 2);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn link_front_orders_newest_first() {
        let mut storage = ListStorage::new();
        let mut list = List::new();

        let a = push_front(&mut list, &mut storage, 1);
        push_front(&mut list, &mut storage, 2);
        let c = push_front(&mut list, &mut storage, 3);

        assert_eq!(values(&list, &storage), [3, 2, 1]);
        assert_eq!(list.front_key(), Some(c));
        assert_eq!(list.back_key(), Some(a));
        assert_consistent(&list, &storage);
    }

    #[test]
    fn link_after_middle_and_tail() {
        let mut storage = ListStorage::new();
        let mut list = List::new();

        let a = push_back(&mut list, &mut storage, 1);
        let c = push_back(&mut list, &mut storage, 3);

        let b = list.create_node(&mut storage, 2).unwrap();
        assert!(list.link_after(&mut storage, a, b));

        let d = list.create_node(&mut storage, 4).unwrap();
        assert!(list.link_after(&mut storage, c, d));

        assert_eq!(values(&list, &storage), [1, 2, 3, 4]);
        assert_eq!(list.back_key(), Some(d));
        assert_eq!(list.next_key(&storage, a), Some(b));
        assert_eq!(list.prev_key(&storage, c), Some(b));
        assert_consistent(&list, &storage);
    }

    #[test]
    fn link_rejects_linked_and_unknown_nodes() {
        let mut storage = ListStorage::new();
        let mut list = List::new();

        let a = push_back(&mut list, &mut storage, 1);
        let b = push_back(&mut list, &mut storage, 2);

        assert!(!list.link_front(&mut storage, a));
        assert!(!list.link_after(&mut storage, a, b));
        assert!(!list.link_after(&mut storage, a, a));
        assert!(!list.link_front(&mut storage, NodeKey::from_index(42)));

        let detached = list.create_node(&mut storage, 3).unwrap();
        assert!(!list.link_after(&mut storage, NodeKey::from_index(42), detached));
        assert!(!list.link_after(&mut storage, NodeKey::NONE, detached));

        assert_eq!(values(&list, &storage), [1, 2]);
        assert_consistent(&list, &storage);
    }

    #[test]
    fn link_after_detached_target_is_refused() {
        let mut storage = ListStorage::new();
        let mut list = List::new();

        push_back(&mut list, &mut storage, 1);
        let loose = list.create_node(&mut storage, 2).unwrap();
        let other = list.create_node(&mut storage, 3).unwrap();

        assert!(!list.link_after(&mut storage, loose, other));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn remove_head() {
        let mut storage = ListStorage::new();
        let mut list = List::new();

        let a = push_back(&mut list, &mut storage, 1);
        let b = push_back(&mut list, &mut storage, 2);
        push_back(&mut list, &mut storage, 3);

        assert_eq!(list.remove(&mut storage, a), Some(1));
        assert_eq!(list.front_key(), Some(b));
        assert_eq!(list.prev_key(&storage, b), None);
        assert_eq!(values(&list, &storage), [2, 3]);
        assert_consistent(&list, &storage);
    }

    #[test]
    fn remove_tail() {
        let mut storage = ListStorage::new();
        let mut list = List::new();

        push_back(&mut list, &mut storage, 1);
        let b = push_back(&mut list, &mut storage, 2);
        let c = push_back(&mut list, &mut storage, 3);

        assert_eq!(list.remove(&mut storage, c), Some(3));
        assert_eq!(list.back_key(), Some(b));
        assert_eq!(list.next_key(&storage, b), None);
        assert_consistent(&list, &storage);
    }

    #[test]
    fn remove_middle() {
        let mut storage = ListStorage::new();
        let mut list = List::new();

        let a = push_back(&mut list, &mut storage, 1);
        let b = push_back(&mut list, &mut storage, 2);
        let c = push_back(&mut list, &mut storage, 3);

        assert_eq!(list.remove(&mut storage, b), Some(2));
        assert_eq!(list.next_key(&storage, a), Some(c));
        assert_eq!(list.prev_key(&storage, c), Some(a));
        assert_eq!(list.len(), 2);
        assert_consistent(&list, &storage);
    }

    #[test]
    fn remove_only_node() {
        let mut storage = ListStorage::new();
        let mut list = List::new();

        let a = push_back(&mut list, &mut storage, 1);
        assert_eq!(list.remove(&mut storage, a), Some(1));

        assert!(list.is_empty());
        assert!(list.front_key().is_none());
        assert!(list.back_key().is_none());
        assert!(storage.is_empty());
    }

    #[test]
    fn remove_unknown_is_noop() {
        let mut storage = ListStorage::new();
        let mut list = List::new();

        let a = push_back(&mut list, &mut storage, 1);
        assert_eq!(list.remove(&mut storage, a), Some(1));
        assert_eq!(list.remove(&mut storage, a), None);
        assert_eq!(list.remove(&mut storage, NodeKey::NONE), None);
        assert!(list.is_empty());
    }

    #[test]
    fn remove_detached_releases_slot() {
        let mut storage = ListStorage::new();
        let mut list: TestList = List::new();

        let key = list.create_node(&mut storage, 5).unwrap();
        assert_eq!(list.remove(&mut storage, key), Some(5));
        assert!(storage.is_empty());
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn unlink_keeps_payload() {
        let mut storage = ListStorage::new();
        let mut list = List::new();

        push_back(&mut list, &mut storage, 1);
        let b = push_back(&mut list, &mut storage, 2);

        assert!(list.unlink(&mut storage, b));
        assert!(!list.unlink(&mut storage, b));
        assert_eq!(list.get(&storage, b), Some(&2));
        assert_eq!(list.len(), 1);

        assert!(list.link_front(&mut storage, b));
        assert_eq!(values(&list, &storage), [2, 1]);
        assert_consistent(&list, &storage);
    }

    #[test]
    fn pop_front_drains_in_order() {
        let mut storage = ListStorage::new();
        let mut list = List::new();

        for v in 1..=3 {
            push_back(&mut list, &mut storage, v);
        }

        assert_eq!(list.pop_front(&mut storage), Some(1));
        assert_eq!(list.pop_front(&mut storage), Some(2));
        assert_eq!(list.pop_front(&mut storage), Some(3));
        assert_eq!(list.pop_front(&mut storage), None);
        assert!(storage.is_empty());
    }

    #[test]
    fn get_mut_updates_payload() {
        let mut storage = ListStorage::new();
        let mut list = List::new();

        let a = push_back(&mut list, &mut storage, 1);
        *list.get_mut(&mut storage, a).unwrap() = 10;
        assert_eq!(list.front(&storage), Some(&10));
    }

    #[test]
    fn clear_releases_everything() {
        let mut storage = ListStorage::new();
        let mut list = List::new();

        for v in 0..10 {
            push_back(&mut list, &mut storage, v);
        }
        list.clear(&mut storage);

        assert!(list.is_empty());
        assert!(storage.is_empty());
        assert_eq!(list.iter(&storage).count(), 0);

        push_back(&mut list, &mut storage, 42);
        assert_eq!(values(&list, &storage), [42]);
    }

    #[test]
    fn iterators_report_exact_len() {
        let mut storage = ListStorage::new();
        let mut list = List::new();

        for v in 0..4 {
            push_back(&mut list, &mut storage, v);
        }

        let mut iter = list.iter(&storage);
        assert_eq!(iter.len(), 4);
        iter.next();
        assert_eq!(iter.len(), 3);
        assert_eq!(list.keys(&storage).len(), 4);
    }

    #[test]
    fn interleaved_operations_stay_consistent() {
        let mut storage = ListStorage::new();
        let mut list = List::new();
        let mut keys = Vec::new();

        for v in 0..20 {
            let key = if v % 3 == 0 {
                push_front(&mut list, &mut storage, v)
            } else {
                push_back(&mut list, &mut storage, v)
            };
            keys.push(key);
        }

        for (i, key) in keys.iter().enumerate() {
            if i % 2 == 0 {
                list.remove(&mut storage, *key);
                assert_consistent(&list, &storage);
            }
        }

        assert_eq!(list.len(), 10);
        assert_eq!(storage.len(), 10);
        assert!(values(&list, &storage).iter().all(|v| v % 2 == 1));
    }
}
