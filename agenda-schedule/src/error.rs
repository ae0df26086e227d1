use agenda_collections::QueueError;

use crate::{EventId, MemberId};

/// Failure of an [`EventManager`](crate::EventManager) operation.
///
/// A failed operation leaves the manager as it was.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    /// The date is malformed, or earlier than the manager's current date.
    #[error("Invalid date")]
    InvalidDate,

    /// An event with this name is already scheduled on this date.
    #[error("An event with the same name already exists on that date")]
    EventAlreadyExists,

    /// The event id is already in use.
    #[error("Event id {0} already exists")]
    EventIdAlreadyExists(EventId),

    /// No event has this id.
    #[error("Event id {0} does not exist")]
    EventIdNotExists(EventId),

    /// The member id is already in use.
    #[error("Member id {0} already exists")]
    MemberIdAlreadyExists(MemberId),

    /// No member has this id.
    #[error("Member id {0} does not exist")]
    MemberIdNotExists(MemberId),

    /// The member is already attending the event.
    #[error("Member {member} is already linked to event {event}")]
    EventAndMemberAlreadyLinked {
        /// The event
        event: EventId,
        /// The member
        member: MemberId,
    },

    /// The member is not attending the event.
    #[error("Member {member} is not linked to event {event}")]
    EventAndMemberNotLinked {
        /// The event
        event: EventId,
        /// The member
        member: MemberId,
    },

    /// Storage or a copy ran out of resources.
    #[error("Out of memory")]
    OutOfMemory,
}

impl ScheduleError {
    /// Maps a queue failure, turning a missed lookup into `not_found`.
    pub(crate) fn from_queue(err: QueueError, not_found: Self) -> Self {
        if err.is_alloc_failure() {
            tracing::warn!(%err, "queue allocation failed; manager unchanged");
            Self::OutOfMemory
        } else {
            not_found
        }
    }
}
