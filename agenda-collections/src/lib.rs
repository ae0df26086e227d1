//! Sorted priority queue over a storage-backed doubly-linked list.
//!
//! The crate has two layers:
//!
//! ```text
//! SortedQueue<P>   - keeps (element, priority) entries in priority order
//!     │
//!     └── List<T, S> - doubly-linked list, payload-agnostic
//!             │
//!             └── Storage<T> - owns nodes, hands out stable NodeKeys
//! ```
//!
//! The list never inspects what it carries; all ordering and identity rules
//! live in the queue's [`Policy`].
//!
//! # Quick Start
//!
//! ```
//! use agenda_collections::{Highest, SortedQueue};
//!
//! let mut queue = SortedQueue::new(Highest::<&str, u8>::new());
//!
//! queue.insert(&"write tests", &2).unwrap();
//! queue.insert(&"fix outage", &9).unwrap();
//! queue.insert(&"refactor", &2).unwrap();
//!
//! assert_eq!(queue.peek(), Some((&"fix outage", &9)));
//!
//! // Equal priorities keep insertion order
//! let order: Vec<_> = queue.iter().copied().collect();
//! assert_eq!(order, ["fix outage", "write tests", "refactor"]);
//! ```
//!
//! # Policies
//!
//! | Policy | Copies | Identity | Order |
//! |--------|--------|----------|-------|
//! | [`Highest`] | `Clone` | `PartialEq` | larger first |
//! | [`Lowest`] | `Clone` | `PartialEq` | smaller first |
//! | [`Callbacks`] | closure, may fail | closure | closure |
//!
//! Implement [`Policy`] directly for anything else, e.g. elements whose
//! identity is a single id field.
//!
//! # Failure Model
//!
//! Queue operations return [`QueueError`]:
//!
//! - `CopyFailed` / `Full` - resources ran out; see
//!   [`QueueError::is_alloc_failure`]
//! - `NotFound` - a lookup missed
//!
//! A failed operation never leaves the queue half-changed.
//!
//! # Feature Flags
//!
//! - `slab` - Enable [`Storage`] impl for `slab::Slab`, usable as [`List`]
//!   storage. [`SortedQueue`] always uses [`SlotStorage`].

#![warn(missing_docs)]

pub mod error;
pub mod key;
pub mod list;
pub mod policy;
pub mod pqueue;
pub mod storage;

pub use error::{BuildError, CopyError, QueueError};
pub use key::NodeKey;
pub use list::{List, ListNode, ListStorage};
pub use policy::{Callbacks, CallbacksBuilder, Highest, Lowest, Policy};
pub use pqueue::SortedQueue;
pub use storage::{Full, SlotStorage, Storage};
