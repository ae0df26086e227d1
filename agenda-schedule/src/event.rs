//! Events, members and the queue policies that order them.

use core::cmp::Ordering;
use core::fmt;

use agenda_collections::{CopyError, Lowest, Policy, QueueError, SortedQueue};

use crate::Date;

/// Identifier of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventId(pub u32);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemberId(pub u32);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Attendees of one event, ascending by member id.
pub type Roster = SortedQueue<Lowest<MemberId, MemberId>>;

/// A person who can be put in charge of events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Unique id.
    pub id: MemberId,
    /// Display name.
    pub name: String,
    /// Number of events the member is linked to.
    pub event_count: u32,
}

impl Member {
    pub(crate) fn new(id: MemberId, name: &str) -> Self {
        Self {
            id,
            name: name.to_owned(),
            event_count: 0,
        }
    }
}

/// A scheduled event. Its date lives in the manager's queue as the
/// event's priority.
#[derive(Debug)]
pub struct Event {
    id: EventId,
    name: String,
    members: Roster,
}

impl Event {
    /// The roster is unbounded: it only ever holds registered members, so
    /// the member queue's bound already limits it.
    pub(crate) fn new(id: EventId, name: &str) -> Self {
        Self {
            id,
            name: name.to_owned(),
            members: SortedQueue::new(Lowest::new()),
        }
    }

    /// Event id.
    #[inline]
    pub const fn id(&self) -> EventId {
        self.id
    }

    /// Event name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Linked member ids, ascending.
    pub fn members(&self) -> impl ExactSizeIterator<Item = MemberId> + '_ {
        self.members.iter().copied()
    }

    /// Returns `true` if `member` is linked to this event.
    pub fn has_member(&self, member: MemberId) -> bool {
        self.members.contains(&member)
    }

    pub(crate) fn roster_mut(&mut self) -> &mut Roster {
        &mut self.members
    }

    /// Deep copy, including the roster.
    ///
    /// # Errors
    ///
    /// Fails if the roster could not be copied.
    pub fn try_clone(&self) -> Result<Self, QueueError> {
        Ok(Self {
            id: self.id,
            name: self.name.clone(),
            members: self.members.try_clone()?,
        })
    }
}

// =============================================================================
// Policies
// =============================================================================

/// Events ordered by date, earliest first; identity is the event id.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventPolicy;

impl Policy for EventPolicy {
    type Element = Event;
    type Priority = Date;

    fn copy_element(&self, element: &Event) -> Result<Event, CopyError> {
        element.try_clone().map_err(|err| {
            tracing::debug!(id = %element.id, %err, "event roster copy failed");
            CopyError
        })
    }

    #[inline]
    fn copy_priority(&self, priority: &Date) -> Result<Date, CopyError> {
        Ok(*priority)
    }

    #[inline]
    fn equal_elements(&self, a: &Event, b: &Event) -> bool {
        a.id == b.id
    }

    #[inline]
    fn compare_priorities(&self, a: &Date, b: &Date) -> Ordering {
        b.cmp(a)
    }
}

/// Members ordered by a `u32` key; identity is the member id.
///
/// `ascending` puts smaller keys first (used with the id as key); otherwise
/// larger keys come first (used with the event count as key).
#[derive(Debug, Clone, Copy)]
pub struct MemberPolicy {
    ascending: bool,
}

impl MemberPolicy {
    /// Smaller keys first.
    pub const ASCENDING: Self = Self { ascending: true };
    /// Larger keys first.
    pub const DESCENDING: Self = Self { ascending: false };
}

impl Policy for MemberPolicy {
    type Element = Member;
    type Priority = u32;

    #[inline]
    fn copy_element(&self, element: &Member) -> Result<Member, CopyError> {
        Ok(element.clone())
    }

    #[inline]
    fn copy_priority(&self, priority: &u32) -> Result<u32, CopyError> {
        Ok(*priority)
    }

    #[inline]
    fn equal_elements(&self, a: &Member, b: &Member) -> bool {
        a.id == b.id
    }

    #[inline]
    fn compare_priorities(&self, a: &u32, b: &u32) -> Ordering {
        if self.ascending { b.cmp(a) } else { a.cmp(b) }
    }
}
