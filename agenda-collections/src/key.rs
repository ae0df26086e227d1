//! Stable node handles.
//!
//! A [`NodeKey`] names a slot in a [`Storage`](crate::Storage). Links between
//! list nodes are keys rather than pointers, with a reserved sentinel
//! standing in for "no node".

use core::fmt;

/// Handle to a node slot in storage.
///
/// `NodeKey::NONE` is the sentinel used for empty links. It is never handed
/// out by storage.
///
/// # Example
///
/// ```
/// use agenda_collections::NodeKey;
///
/// let key = NodeKey::from_index(3);
/// assert!(key.is_some());
/// assert_eq!(key.index(), 3);
/// assert!(NodeKey::NONE.is_none());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey(u32);

impl NodeKey {
    /// Sentinel for "no node".
    pub const NONE: Self = NodeKey(u32::MAX);

    /// Largest slot index a key can address.
    pub const MAX_INDEX: usize = (u32::MAX - 1) as usize;

    /// Creates a key for the given slot index.
    ///
    /// # Panics
    ///
    /// Panics if `index` exceeds [`NodeKey::MAX_INDEX`].
    #[inline]
    pub fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX_INDEX, "slot index out of key range");
        NodeKey(index as u32)
    }

    /// Returns the slot index this key addresses.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns `true` if this is the sentinel.
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Returns `true` if this addresses a slot.
    #[inline]
    pub const fn is_some(self) -> bool {
        !self.is_none()
    }

    /// Converts the sentinel into `None`.
    #[inline]
    pub const fn into_option(self) -> Option<NodeKey> {
        if self.is_none() { None } else { Some(self) }
    }
}

impl fmt::Debug for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            f.write_str("NodeKey(NONE)")
        } else {
            write!(f, "NodeKey({})", self.0)
        }
    }
}
