//! Stable sorted priority queue over a doubly-linked list.
//!
//! Each entry pairs one element with one priority. Entries are kept in
//! priority order, highest first, so the head is always the next entry
//! due. Among equal priorities, insertion order is kept: a new entry goes
//! after every existing entry it ties with.
//!
//! Insertion scans from the head for the last entry that should still
//! precede the new one (O(n)) and splices after it (O(1)). Lookup by
//! element is a linear scan in stored order.
//!
//! # Ownership
//!
//! [`insert`](SortedQueue::insert) takes references and stores deep copies
//! made by the [`Policy`]. The queue never aliases caller storage.
//! [`insert_owned`](SortedQueue::insert_owned) moves values in instead.
//!
//! # Failure Atomicity
//!
//! Every fallible operation either succeeds or leaves the queue exactly as
//! it was. Copies and node allocation happen before the list is touched;
//! a partially built entry is dropped on the way out.
//! [`change_priority`](SortedQueue::change_priority) builds its replacement
//! entry first and then reuses the old node, so it is atomic too.
//!
//! # Iteration
//!
//! [`iter`](SortedQueue::iter) borrows the queue and walks it in order.
//! Any number of these can run at once, and the borrow rules forbid
//! mutation while one is alive.
//!
//! The queue also keeps a single stored cursor driven by
//! [`get_first`](SortedQueue::get_first) / [`get_next`](SortedQueue::get_next).
//! Every structural mutation resets it, after which `get_next` yields `None`
//! until `get_first` is called again.
//!
//! # Example
//!
//! ```
//! use agenda_collections::{Highest, SortedQueue};
//!
//! let mut queue = SortedQueue::new(Highest::<&str, u32>::new());
//!
//! queue.insert(&"e1", &5).unwrap();
//! queue.insert(&"e2", &7).unwrap();
//! queue.insert(&"e3", &5).unwrap();
//!
//! // e2 is highest; e1 precedes e3 because it was inserted first
//! let order: Vec<_> = queue.iter().copied().collect();
//! assert_eq!(order, ["e2", "e1", "e3"]);
//!
//! queue.change_priority(&"e3", &5, &9).unwrap();
//! assert_eq!(queue.get_first(), Some(&"e3"));
//! ```

use core::cmp::Ordering;
use core::fmt;

use crate::list::{self, ListStorage};
use crate::{Full, List, NodeKey, Policy, QueueError, SlotStorage};

/// One stored entry: an element and its priority, always both present.
#[derive(Debug)]
pub(crate) struct Entry<E, P> {
    element: E,
    priority: P,
}

impl<E, P> Entry<E, P> {
    /// Deep-copies both halves through the policy.
    ///
    /// If the priority copy fails, the element copy is dropped before
    /// returning.
    fn duplicate<Q>(policy: &Q, element: &E, priority: &P) -> Result<Self, QueueError>
    where
        Q: Policy<Element = E, Priority = P>,
    {
        let element = policy.copy_element(element)?;
        let priority = policy.copy_priority(priority)?;
        Ok(Self { element, priority })
    }
}

type EntryOf<Q> = Entry<<Q as Policy>::Element, <Q as Policy>::Priority>;

/// A priority queue kept sorted in a linked list.
///
/// Ordering is [`Policy::compare_priorities`]; identity for lookup and
/// removal is [`Policy::equal_elements`].
///
/// # Example
///
/// ```
/// use agenda_collections::{Lowest, QueueError, SortedQueue};
///
/// // Earliest deadline first
/// let mut queue = SortedQueue::with_capacity(Lowest::<String, u32>::new(), 2);
///
/// queue.insert(&"report".to_string(), &12).unwrap();
/// queue.insert(&"review".to_string(), &3).unwrap();
///
/// // Bounded: a third entry does not fit
/// assert_eq!(queue.insert(&"lunch".to_string(), &1), Err(QueueError::Full));
/// assert_eq!(queue.len(), 2);
///
/// assert_eq!(queue.pop(), Some(("review".to_string(), 3)));
/// ```
pub struct SortedQueue<P: Policy> {
    policy: P,
    storage: ListStorage<EntryOf<P>>,
    list: List<EntryOf<P>, ListStorage<EntryOf<P>>>,
    cursor: NodeKey,
}

impl<P: Policy> SortedQueue<P> {
    /// Creates an empty queue with unbounded storage.
    pub fn new(policy: P) -> Self {
        Self::with_storage(policy, SlotStorage::new())
    }

    /// Creates an empty queue holding at most `capacity` entries.
    ///
    /// Inserting beyond the bound fails with [`QueueError::Full`].
    pub fn with_capacity(policy: P, capacity: usize) -> Self {
        Self::with_storage(policy, SlotStorage::with_capacity(capacity))
    }

    fn with_storage(policy: P, storage: ListStorage<EntryOf<P>>) -> Self {
        Self {
            policy,
            storage,
            list: List::new(),
            cursor: NodeKey::NONE,
        }
    }

    /// Returns the number of entries.
    #[inline]
    pub const fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns `true` if the queue holds no entries.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Returns the entry bound, or `None` if unbounded.
    #[inline]
    pub const fn capacity(&self) -> Option<usize> {
        self.storage.capacity()
    }

    /// Returns the queue's policy.
    #[inline]
    pub const fn policy(&self) -> &P {
        &self.policy
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    /// Inserts deep copies of `element` and `priority`.
    ///
    /// The entry lands after every entry whose priority is higher or equal,
    /// so equal priorities keep insertion order. Resets the cursor.
    ///
    /// # Errors
    ///
    /// - [`QueueError::CopyFailed`] if the policy could not copy either value
    /// - [`QueueError::Full`] if storage has no room
    ///
    /// On error the queue is unchanged.
    pub fn insert(&mut self, element: &P::Element, priority: &P::Priority) -> Result<(), QueueError> {
        let entry = Entry::duplicate(&self.policy, element, priority).inspect_err(|err| {
            tracing::debug!(%err, "entry copy failed; queue unchanged");
        })?;
        self.link_sorted(entry)
    }

    /// Inserts `element` and `priority` by value, without copying.
    ///
    /// Same placement rules as [`insert`](Self::insert).
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Full`] if storage has no room; the values are
    /// dropped.
    pub fn insert_owned(&mut self, element: P::Element, priority: P::Priority) -> Result<(), QueueError> {
        self.link_sorted(Entry { element, priority })
    }

    fn link_sorted(&mut self, entry: EntryOf<P>) -> Result<(), QueueError> {
        let key = self
            .list
            .create_node(&mut self.storage, entry)
            .map_err(|Full(_)| {
                tracing::debug!(len = self.list.len(), "no node slot for entry; queue unchanged");
                QueueError::Full
            })?;

        self.splice_sorted(key);
        self.cursor = NodeKey::NONE;
        Ok(())
    }

    /// Links a detached node after the last entry that ranks at or above it.
    fn splice_sorted(&mut self, key: NodeKey) {
        let anchor = {
            let Some(new) = self.list.get(&self.storage, key) else {
                return;
            };

            let mut anchor = None;
            for candidate in self.list.keys(&self.storage) {
                let Some(entry) = self.list.get(&self.storage, candidate) else {
                    break;
                };
                if self.policy.compare_priorities(&entry.priority, &new.priority) == Ordering::Less {
                    break;
                }
                anchor = Some(candidate);
            }
            anchor
        };

        match anchor {
            Some(after) => self.list.link_after(&mut self.storage, after, key),
            None => self.list.link_front(&mut self.storage, key),
        };
    }

    // ========================================================================
    // Removal
    // ========================================================================

    /// Removes the head (highest priority) entry.
    ///
    /// Succeeds on an empty queue without doing anything; check
    /// [`len`](Self::len) first to tell the cases apart. Resets the cursor.
    pub fn remove(&mut self) -> Result<(), QueueError> {
        self.pop();
        Ok(())
    }

    /// Removes and returns the head entry.
    ///
    /// Resets the cursor.
    pub fn pop(&mut self) -> Option<(P::Element, P::Priority)> {
        self.cursor = NodeKey::NONE;
        let entry = self.list.pop_front(&mut self.storage)?;
        Some((entry.element, entry.priority))
    }

    /// Removes the first entry, in stored order, whose element equals
    /// `element` under the policy.
    ///
    /// Resets the cursor on success.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::NotFound`] if no element matches.
    pub fn remove_element(&mut self, element: &P::Element) -> Result<(), QueueError> {
        let Some(key) = self.key_of_element(element) else {
            tracing::trace!("remove_element: no matching element");
            return Err(QueueError::NotFound);
        };
        self.remove_key(key);
        Ok(())
    }

    /// Removes and returns the first entry, in stored order, whose element
    /// satisfies `pred`.
    ///
    /// Resets the cursor on success.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::NotFound`] if nothing matches.
    pub fn remove_where<F>(&mut self, mut pred: F) -> Result<(P::Element, P::Priority), QueueError>
    where
        F: FnMut(&P::Element) -> bool,
    {
        let Some(key) = self.find_key(|entry| pred(&entry.element)) else {
            tracing::trace!("remove_where: no element satisfies the predicate");
            return Err(QueueError::NotFound);
        };
        self.remove_key(key).ok_or(QueueError::NotFound)
    }

    fn remove_key(&mut self, key: NodeKey) -> Option<(P::Element, P::Priority)> {
        self.cursor = NodeKey::NONE;
        let entry = self.list.remove(&mut self.storage, key)?;
        Some((entry.element, entry.priority))
    }

    /// Removes every entry. Resets the cursor.
    ///
    /// Storage keeps its bound but gives back its slots.
    pub fn clear(&mut self) {
        self.list = List::new();
        self.storage.clear();
        self.cursor = NodeKey::NONE;
    }

    // ========================================================================
    // Priority change
    // ========================================================================

    /// Moves the first entry matching both `element` and `old_priority` to
    /// `new_priority`.
    ///
    /// The entry is placed exactly where a fresh `insert(element,
    /// new_priority)` would put it, after any entries already at
    /// `new_priority`. The stored element is replaced by a copy of
    /// `element`. Resets the cursor on success.
    ///
    /// # Errors
    ///
    /// - [`QueueError::NotFound`] if no entry matches both keys
    /// - [`QueueError::CopyFailed`] if the replacement could not be copied
    ///
    /// On error the queue is unchanged, including the old entry.
    pub fn change_priority(
        &mut self,
        element: &P::Element,
        old_priority: &P::Priority,
        new_priority: &P::Priority,
    ) -> Result<(), QueueError> {
        let Some(key) = self.find_key(|entry| {
            self.policy.equal_elements(&entry.element, element)
                && self.policy.compare_priorities(&entry.priority, old_priority) == Ordering::Equal
        }) else {
            tracing::trace!("change_priority: no entry with that element and priority");
            return Err(QueueError::NotFound);
        };

        let replacement = Entry::duplicate(&self.policy, element, new_priority).inspect_err(|err| {
            tracing::debug!(%err, "replacement copy failed; entry kept at old priority");
        })?;

        self.relink(key, |entry| *entry = replacement);
        Ok(())
    }

    /// Like [`change_priority`](Self::change_priority), but matches the
    /// element with `pred` and keeps the stored element as it is.
    ///
    /// # Errors
    ///
    /// - [`QueueError::NotFound`] if no entry matches
    /// - [`QueueError::CopyFailed`] if `new_priority` could not be copied
    pub fn change_priority_where<F>(
        &mut self,
        mut pred: F,
        old_priority: &P::Priority,
        new_priority: &P::Priority,
    ) -> Result<(), QueueError>
    where
        F: FnMut(&P::Element) -> bool,
    {
        let Some(key) = self.find_key(|entry| {
            pred(&entry.element)
                && self.policy.compare_priorities(&entry.priority, old_priority) == Ordering::Equal
        }) else {
            tracing::trace!("change_priority_where: no entry with that priority satisfies the predicate");
            return Err(QueueError::NotFound);
        };

        let priority = self.policy.copy_priority(new_priority).inspect_err(|err| {
            tracing::debug!(%err, "priority copy failed; entry kept at old priority");
        })?;
        self.relink(key, |entry| entry.priority = priority);
        Ok(())
    }

    /// Unlinks `key`, rewrites its entry and splices it back in order.
    ///
    /// The node is reused, so nothing here can fail.
    fn relink(&mut self, key: NodeKey, update: impl FnOnce(&mut EntryOf<P>)) {
        self.list.unlink(&mut self.storage, key);
        if let Some(entry) = self.list.get_mut(&mut self.storage, key) {
            update(entry);
        }
        self.splice_sorted(key);
        self.cursor = NodeKey::NONE;
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Returns `true` if some entry's element equals `element`, whatever its
    /// priority.
    pub fn contains(&self, element: &P::Element) -> bool {
        self.key_of_element(element).is_some()
    }

    /// Returns `true` if some entry matches both `element` and `priority`.
    pub fn contains_with_priority(&self, element: &P::Element, priority: &P::Priority) -> bool {
        self.find_key(|entry| {
            self.policy.equal_elements(&entry.element, element)
                && self.policy.compare_priorities(&entry.priority, priority) == Ordering::Equal
        })
        .is_some()
    }

    /// Returns the priority of the first entry whose element equals
    /// `element`.
    pub fn priority_of(&self, element: &P::Element) -> Option<&P::Priority> {
        let key = self.key_of_element(element)?;
        self.list.get(&self.storage, key).map(|entry| &entry.priority)
    }

    /// Returns the first element, in stored order, satisfying `pred`.
    pub fn find<F>(&self, mut pred: F) -> Option<&P::Element>
    where
        F: FnMut(&P::Element) -> bool,
    {
        self.iter().find(|&element| pred(element))
    }

    /// Returns the first element, in stored order, satisfying `pred`,
    /// mutably.
    ///
    /// Priorities are not reachable through this, so ordering cannot be
    /// disturbed. The caller must not change what
    /// [`Policy::equal_elements`] compares.
    pub fn find_mut<F>(&mut self, mut pred: F) -> Option<&mut P::Element>
    where
        F: FnMut(&P::Element) -> bool,
    {
        let key = self.find_key(|entry| pred(&entry.element))?;
        self.list
            .get_mut(&mut self.storage, key)
            .map(|entry| &mut entry.element)
    }

    /// Returns the head entry.
    pub fn peek(&self) -> Option<(&P::Element, &P::Priority)> {
        self.list
            .front(&self.storage)
            .map(|entry| (&entry.element, &entry.priority))
    }

    fn key_of_element(&self, element: &P::Element) -> Option<NodeKey> {
        self.find_key(|entry| self.policy.equal_elements(&entry.element, element))
    }

    fn find_key<F>(&self, mut pred: F) -> Option<NodeKey>
    where
        F: FnMut(&EntryOf<P>) -> bool,
    {
        self.list
            .keys(&self.storage)
            .find(|&key| self.list.get(&self.storage, key).is_some_and(&mut pred))
    }

    // ========================================================================
    // Iteration
    // ========================================================================

    /// Points the cursor at the head and returns its element.
    ///
    /// Returns `None` on an empty queue.
    pub fn get_first(&mut self) -> Option<&P::Element> {
        self.cursor = self.list.front_key().unwrap_or(NodeKey::NONE);
        self.cursor_element()
    }

    /// Advances the cursor and returns the element there.
    ///
    /// Returns `None` if the cursor is unset (never started, or reset by a
    /// mutation) or has run off the tail.
    pub fn get_next(&mut self) -> Option<&P::Element> {
        if self.cursor.is_none() {
            return None;
        }
        self.cursor = self
            .list
            .next_key(&self.storage, self.cursor)
            .unwrap_or(NodeKey::NONE);
        self.cursor_element()
    }

    fn cursor_element(&self) -> Option<&P::Element> {
        self.list
            .get(&self.storage, self.cursor)
            .map(|entry| &entry.element)
    }

    /// Returns an iterator over elements in priority order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, P::Element, P::Priority> {
        Iter {
            inner: self.list.iter(&self.storage),
        }
    }

    /// Returns an iterator over `(element, priority)` pairs in priority
    /// order.
    #[inline]
    pub fn entries(&self) -> Entries<'_, P::Element, P::Priority> {
        Entries {
            inner: self.list.iter(&self.storage),
        }
    }
}

impl<P: Policy + Clone> SortedQueue<P> {
    /// Deep-copies the queue: same policy, same bound, every entry copied in
    /// order.
    ///
    /// The source is only read. Its cursor is left where it was.
    ///
    /// # Errors
    ///
    /// Returns the first copy or allocation failure. The partial copy is
    /// dropped.
    pub fn try_clone(&self) -> Result<Self, QueueError> {
        self.copy_entries().inspect_err(|err| {
            tracing::debug!(%err, len = self.len(), "queue copy failed; partial copy dropped");
        })
    }

    fn copy_entries(&self) -> Result<Self, QueueError> {
        let mut copy = Self::with_storage(self.policy.clone(), self.storage.empty_like());

        for entry in self.list.iter(&self.storage) {
            let duplicate = Entry::duplicate(&copy.policy, &entry.element, &entry.priority)?;
            let key = copy
                .list
                .create_node(&mut copy.storage, duplicate)
                .map_err(|Full(_)| QueueError::Full)?;
            copy.list.link_back(&mut copy.storage, key);
        }

        Ok(copy)
    }
}

impl<P> fmt::Debug for SortedQueue<P>
where
    P: Policy,
    P::Element: fmt::Debug,
    P::Priority: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries()).finish()
    }
}

impl<'a, P: Policy> IntoIterator for &'a SortedQueue<P> {
    type Item = &'a P::Element;
    type IntoIter = Iter<'a, P::Element, P::Priority>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// Iterators
// =============================================================================

type EntryIter<'a, E, P> = list::Iter<'a, Entry<E, P>, ListStorage<Entry<E, P>>>;

/// Iterator over queue elements, highest priority first.
pub struct Iter<'a, E, P> {
    inner: EntryIter<'a, E, P>,
}

impl<'a, E, P> Iterator for Iter<'a, E, P> {
    type Item = &'a E;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| &entry.element)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<E, P> ExactSizeIterator for Iter<'_, E, P> {}

/// Iterator over `(element, priority)` pairs, highest priority first.
pub struct Entries<'a, E, P> {
    inner: EntryIter<'a, E, P>,
}

impl<'a, E, P> Iterator for Entries<'a, E, P> {
    type Item = (&'a E, &'a P);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|entry| (&entry.element, &entry.priority))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<E, P> ExactSizeIterator for Entries<'_, E, P> {}
