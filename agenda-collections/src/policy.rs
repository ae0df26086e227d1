//! Element/priority policies for [`SortedQueue`](crate::SortedQueue).
//!
//! A policy fixes, once per queue, how elements and priorities are copied,
//! how elements are matched for lookup and removal, and how priorities are
//! ordered. Releasing a value is its `Drop`.
//!
//! # Ordering Convention
//!
//! `compare_priorities(a, b)` returns:
//! - `Greater` if `a` is strictly higher priority than `b`
//! - `Equal` if they tie
//! - `Less` if `b` is higher priority
//!
//! This is the only ordering authority a queue uses. A policy that breaks it
//! (e.g. is not transitive) breaks the queue's ordering silently.
//!
//! # Identity vs Ordering
//!
//! `equal_elements` is the lookup key and `compare_priorities` is the
//! ordering key. They are independent: two entries may tie in priority
//! without being the same element, and the same element may be looked up
//! whatever its priority.

use core::cmp::Ordering;
use core::fmt;
use core::marker::PhantomData;
use std::rc::Rc;

use crate::{BuildError, CopyError};

/// Copy, identity and ordering rules for one queue.
pub trait Policy {
    /// Stored element type.
    type Element;
    /// Stored priority type.
    type Priority;

    /// Produces an independent deep copy of `element`.
    fn copy_element(&self, element: &Self::Element) -> Result<Self::Element, CopyError>;

    /// Produces an independent deep copy of `priority`.
    fn copy_priority(&self, priority: &Self::Priority) -> Result<Self::Priority, CopyError>;

    /// Returns `true` if `a` and `b` are the same element for lookup purposes.
    fn equal_elements(&self, a: &Self::Element, b: &Self::Element) -> bool;

    /// Orders two priorities; `Greater` means `a` comes first.
    fn compare_priorities(&self, a: &Self::Priority, b: &Self::Priority) -> Ordering;
}

// =============================================================================
// Highest / Lowest - std trait based policies
// =============================================================================

macro_rules! ord_policy {
    ($(#[$meta:meta])* $name:ident, |$a:ident, $b:ident| $cmp:expr) => {
        $(#[$meta])*
        pub struct $name<E, P>(PhantomData<fn() -> (E, P)>);

        impl<E, P> $name<E, P> {
            /// Creates the policy.
            #[inline]
            pub const fn new() -> Self {
                Self(PhantomData)
            }
        }

        impl<E, P> Default for $name<E, P> {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<E, P> Clone for $name<E, P> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<E, P> Copy for $name<E, P> {}

        impl<E, P> fmt::Debug for $name<E, P> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(stringify!($name))
            }
        }

        impl<E, P> Policy for $name<E, P>
        where
            E: Clone + PartialEq,
            P: Clone + Ord,
        {
            type Element = E;
            type Priority = P;

            #[inline]
            fn copy_element(&self, element: &E) -> Result<E, CopyError> {
                Ok(element.clone())
            }

            #[inline]
            fn copy_priority(&self, priority: &P) -> Result<P, CopyError> {
                Ok(priority.clone())
            }

            #[inline]
            fn equal_elements(&self, a: &E, b: &E) -> bool {
                a == b
            }

            #[inline]
            fn compare_priorities(&self, $a: &P, $b: &P) -> Ordering {
                $cmp
            }
        }
    };
}

ord_policy!(
    /// Larger priorities first; `Clone` copies and `PartialEq` identity.
    ///
    /// ```
    /// use agenda_collections::{Highest, SortedQueue};
    ///
    /// let mut queue = SortedQueue::new(Highest::<&str, u32>::new());
    /// queue.insert(&"low", &1).unwrap();
    /// queue.insert(&"high", &9).unwrap();
    /// assert_eq!(queue.peek(), Some((&"high", &9)));
    /// ```
    Highest,
    |a, b| a.cmp(b)
);

ord_policy!(
    /// Smaller priorities first; `Clone` copies and `PartialEq` identity.
    ///
    /// Suits deadlines and ids, where the earliest or lowest value is due
    /// first.
    ///
    /// ```
    /// use agenda_collections::{Lowest, SortedQueue};
    ///
    /// let mut queue = SortedQueue::new(Lowest::<&str, u32>::new());
    /// queue.insert(&"later", &9).unwrap();
    /// queue.insert(&"sooner", &1).unwrap();
    /// assert_eq!(queue.peek(), Some((&"sooner", &1)));
    /// ```
    Lowest,
    |a, b| b.cmp(a)
);

// =============================================================================
// Callbacks - runtime callback table
// =============================================================================

type CopyFn<T> = Rc<dyn Fn(&T) -> Result<T, CopyError>>;
type EqualFn<T> = Rc<dyn Fn(&T, &T) -> bool>;
type CompareFn<T> = Rc<dyn Fn(&T, &T) -> Ordering>;

/// A policy assembled from closures.
///
/// Useful when the rules are only known at runtime or when copies can fail.
/// Build one with [`Callbacks::builder`]; every callback is required.
///
/// # Example
///
/// ```
/// use agenda_collections::{Callbacks, SortedQueue};
///
/// let policy = Callbacks::<(u32, String), u8>::builder()
///     .copy_element(|e| Ok(e.clone()))
///     .equal_elements(|a, b| a.0 == b.0)
///     .copy_priority(|p| Ok(*p))
///     .compare_priorities(|a, b| a.cmp(b))
///     .build()
///     .unwrap();
///
/// let mut queue = SortedQueue::new(policy);
/// queue.insert(&(1, "first".into()), &5).unwrap();
///
/// // Identity is the id alone
/// assert!(queue.contains(&(1, "renamed".into())));
/// ```
pub struct Callbacks<E, P> {
    copy_element: CopyFn<E>,
    equal_elements: EqualFn<E>,
    copy_priority: CopyFn<P>,
    compare_priorities: CompareFn<P>,
}

impl<E, P> Callbacks<E, P> {
    /// Starts an empty callback table.
    pub fn builder() -> CallbacksBuilder<E, P> {
        CallbacksBuilder::default()
    }
}

impl<E, P> Clone for Callbacks<E, P> {
    fn clone(&self) -> Self {
        Self {
            copy_element: Rc::clone(&self.copy_element),
            equal_elements: Rc::clone(&self.equal_elements),
            copy_priority: Rc::clone(&self.copy_priority),
            compare_priorities: Rc::clone(&self.compare_priorities),
        }
    }
}

impl<E, P> fmt::Debug for Callbacks<E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks").finish_non_exhaustive()
    }
}

impl<E, P> Policy for Callbacks<E, P> {
    type Element = E;
    type Priority = P;

    #[inline]
    fn copy_element(&self, element: &E) -> Result<E, CopyError> {
        (self.copy_element)(element)
    }

    #[inline]
    fn copy_priority(&self, priority: &P) -> Result<P, CopyError> {
        (self.copy_priority)(priority)
    }

    #[inline]
    fn equal_elements(&self, a: &E, b: &E) -> bool {
        (self.equal_elements)(a, b)
    }

    #[inline]
    fn compare_priorities(&self, a: &P, b: &P) -> Ordering {
        (self.compare_priorities)(a, b)
    }
}

/// Builder for [`Callbacks`].
pub struct CallbacksBuilder<E, P> {
    copy_element: Option<CopyFn<E>>,
    equal_elements: Option<EqualFn<E>>,
    copy_priority: Option<CopyFn<P>>,
    compare_priorities: Option<CompareFn<P>>,
}

impl<E, P> Default for CallbacksBuilder<E, P> {
    fn default() -> Self {
        Self {
            copy_element: None,
            equal_elements: None,
            copy_priority: None,
            compare_priorities: None,
        }
    }
}

impl<E, P> CallbacksBuilder<E, P> {
    /// Sets the element copy.
    pub fn copy_element(mut self, f: impl Fn(&E) -> Result<E, CopyError> + 'static) -> Self {
        self.copy_element = Some(Rc::new(f));
        self
    }

    /// Sets the element identity.
    pub fn equal_elements(mut self, f: impl Fn(&E, &E) -> bool + 'static) -> Self {
        self.equal_elements = Some(Rc::new(f));
        self
    }

    /// Sets the priority copy.
    pub fn copy_priority(mut self, f: impl Fn(&P) -> Result<P, CopyError> + 'static) -> Self {
        self.copy_priority = Some(Rc::new(f));
        self
    }

    /// Sets the priority order.
    pub fn compare_priorities(mut self, f: impl Fn(&P, &P) -> Ordering + 'static) -> Self {
        self.compare_priorities = Some(Rc::new(f));
        self
    }

    /// Finishes the table.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingCallback`] naming the first callback
    /// that was not supplied.
    pub fn build(self) -> Result<Callbacks<E, P>, BuildError> {
        Ok(Callbacks {
            copy_element: self
                .copy_element
                .ok_or(BuildError::MissingCallback("copy_element"))?,
            equal_elements: self
                .equal_elements
                .ok_or(BuildError::MissingCallback("equal_elements"))?,
            copy_priority: self
                .copy_priority
                .ok_or(BuildError::MissingCallback("copy_priority"))?,
            compare_priorities: self
                .compare_priorities
                .ok_or(BuildError::MissingCallback("compare_priorities"))?,
        })
    }
}

impl<E, P> fmt::Debug for CallbacksBuilder<E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbacksBuilder")
            .field("copy_element", &self.copy_element.is_some())
            .field("equal_elements", &self.equal_elements.is_some())
            .field("copy_priority", &self.copy_priority.is_some())
            .field("compare_priorities", &self.compare_priorities.is_some())
            .finish()
    }
}
