//! Event bookkeeping: who attends what, and when.
//!
//! The manager keeps two queues:
//!
//! - events, by date (earliest first, same-day events in the order they
//!   were scheduled)
//! - members, by ascending id
//!
//! Each event carries a roster of linked member ids, and each member counts
//! the events it is linked to. Every operation keeps the two consistent.

use agenda_collections::{QueueError, SortedQueue};

use crate::{Date, Event, EventId, EventPolicy, Member, MemberId, MemberPolicy, ScheduleError};

/// Events and members on a shared calendar.
///
/// # Example
///
/// ```
/// use agenda_schedule::{Date, EventId, EventManager, MemberId};
///
/// let mut em = EventManager::new(Date::new(1, 1, 2024).unwrap());
///
/// em.add_event_by_diff("planning", 2, EventId(1)).unwrap();
/// em.add_event_by_diff("kickoff", 0, EventId(2)).unwrap();
/// em.add_member("ada", MemberId(7)).unwrap();
/// em.add_member_to_event(MemberId(7), EventId(1)).unwrap();
///
/// assert_eq!(em.next_event(), Some("kickoff"));
///
/// em.tick(1).unwrap();
/// assert_eq!(em.events_amount(), 1);
/// assert_eq!(em.next_event(), Some("planning"));
/// ```
#[derive(Debug)]
pub struct EventManager {
    created: Date,
    current: Date,
    events: SortedQueue<EventPolicy>,
    members: SortedQueue<MemberPolicy>,
}

impl EventManager {
    /// Creates an empty manager starting on `date`.
    pub fn new(date: Date) -> Self {
        Self {
            created: date,
            current: date,
            events: SortedQueue::new(EventPolicy),
            members: SortedQueue::new(MemberPolicy::ASCENDING),
        }
    }

    /// Creates an empty manager holding at most `events` events and
    /// `members` members.
    ///
    /// Exceeding a bound fails with [`ScheduleError::OutOfMemory`]. Storage
    /// grows on demand, so a large bound costs nothing up front.
    pub fn with_capacity(date: Date, events: usize, members: usize) -> Self {
        Self {
            created: date,
            current: date,
            events: SortedQueue::with_capacity(EventPolicy, events),
            members: SortedQueue::with_capacity(MemberPolicy::ASCENDING, members),
        }
    }

    /// The date the manager was created on.
    #[inline]
    pub const fn created_date(&self) -> Date {
        self.created
    }

    /// Today, as advanced by [`tick`](Self::tick).
    #[inline]
    pub const fn current_date(&self) -> Date {
        self.current
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Schedules a new event on `date`.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - [`ScheduleError::InvalidDate`] if `date` is before today
    /// - [`ScheduleError::EventAlreadyExists`] if an event named `name` is
    ///   already on `date`
    /// - [`ScheduleError::EventIdAlreadyExists`] if `id` is taken
    /// - [`ScheduleError::OutOfMemory`] if the event could not be stored
    #[tracing::instrument(skip(self), fields(current = %self.current))]
    pub fn add_event_by_date(&mut self, name: &str, date: Date, id: EventId) -> Result<(), ScheduleError> {
        if date < self.current {
            return Err(ScheduleError::InvalidDate);
        }
        if self.name_taken_on(name, date) {
            return Err(ScheduleError::EventAlreadyExists);
        }
        if self.event(id).is_some() {
            return Err(ScheduleError::EventIdAlreadyExists(id));
        }

        let event = Event::new(id, name);
        self.events
            .insert_owned(event, date)
            .map_err(|err| ScheduleError::from_queue(err, ScheduleError::EventIdNotExists(id)))?;

        tracing::debug!(events = self.events.len(), "event scheduled");
        Ok(())
    }

    /// Schedules a new event `days` days from today.
    ///
    /// # Errors
    ///
    /// Same as [`add_event_by_date`](Self::add_event_by_date), plus
    /// [`ScheduleError::InvalidDate`] if the date would pass year `i32::MAX`.
    pub fn add_event_by_diff(&mut self, name: &str, days: u32, id: EventId) -> Result<(), ScheduleError> {
        let date = self.current.after_days(days)?;
        self.add_event_by_date(name, date, id)
    }

    /// Cancels an event, unlinking all of its members.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::EventIdNotExists`] if no event has `id`.
    #[tracing::instrument(skip(self))]
    pub fn remove_event(&mut self, id: EventId) -> Result<(), ScheduleError> {
        let (event, date) = self
            .events
            .remove_where(|event| event.id() == id)
            .map_err(|err| ScheduleError::from_queue(err, ScheduleError::EventIdNotExists(id)))?;

        self.release_members(&event);
        tracing::debug!(%date, "event removed");
        Ok(())
    }

    /// Moves an event to `date`.
    ///
    /// The event lands after any events already on `date`.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - [`ScheduleError::InvalidDate`] if `date` is before today
    /// - [`ScheduleError::EventIdNotExists`] if no event has `id`
    /// - [`ScheduleError::EventAlreadyExists`] if an event with the same name
    ///   is already on `date` (including this event itself)
    #[tracing::instrument(skip(self), fields(current = %self.current))]
    pub fn change_event_date(&mut self, id: EventId, date: Date) -> Result<(), ScheduleError> {
        if date < self.current {
            return Err(ScheduleError::InvalidDate);
        }
        let (event, old_date) = self
            .events
            .entries()
            .find(|(event, _)| event.id() == id)
            .ok_or(ScheduleError::EventIdNotExists(id))?;
        if self.name_taken_on(event.name(), date) {
            return Err(ScheduleError::EventAlreadyExists);
        }

        let old_date = *old_date;
        self.events
            .change_priority_where(|event| event.id() == id, &old_date, &date)
            .map_err(|err| ScheduleError::from_queue(err, ScheduleError::EventIdNotExists(id)))?;

        tracing::debug!(%old_date, "event moved");
        Ok(())
    }

    /// Number of scheduled events.
    #[inline]
    pub fn events_amount(&self) -> usize {
        self.events.len()
    }

    /// Name of the earliest event.
    pub fn next_event(&self) -> Option<&str> {
        self.events.peek().map(|(event, _)| event.name())
    }

    /// Looks up an event by id.
    pub fn event(&self, id: EventId) -> Option<&Event> {
        self.events.find(|event| event.id() == id)
    }

    /// Returns an iterator over `(event, date)` pairs, earliest first.
    pub fn events(&self) -> impl ExactSizeIterator<Item = (&Event, &Date)> + '_ {
        self.events.entries()
    }

    fn name_taken_on(&self, name: &str, date: Date) -> bool {
        self.events
            .entries()
            .any(|(event, on)| *on == date && event.name() == name)
    }

    // ========================================================================
    // Members
    // ========================================================================

    /// Registers a new member.
    ///
    /// # Errors
    ///
    /// - [`ScheduleError::MemberIdAlreadyExists`] if `id` is taken
    /// - [`ScheduleError::OutOfMemory`] if the member could not be stored
    #[tracing::instrument(skip(self))]
    pub fn add_member(&mut self, name: &str, id: MemberId) -> Result<(), ScheduleError> {
        if self.member(id).is_some() {
            return Err(ScheduleError::MemberIdAlreadyExists(id));
        }

        self.members
            .insert_owned(Member::new(id, name), id.0)
            .map_err(|err| ScheduleError::from_queue(err, ScheduleError::MemberIdNotExists(id)))?;

        tracing::debug!(members = self.members.len(), "member added");
        Ok(())
    }

    /// Links a member to an event.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - [`ScheduleError::EventIdNotExists`]
    /// - [`ScheduleError::MemberIdNotExists`]
    /// - [`ScheduleError::EventAndMemberAlreadyLinked`]
    /// - [`ScheduleError::OutOfMemory`] if the roster could not grow
    #[tracing::instrument(skip(self))]
    pub fn add_member_to_event(&mut self, member: MemberId, event: EventId) -> Result<(), ScheduleError> {
        let roster = self
            .events
            .find_mut(|e| e.id() == event)
            .ok_or(ScheduleError::EventIdNotExists(event))?
            .roster_mut();
        let attendee = self
            .members
            .find_mut(|m| m.id == member)
            .ok_or(ScheduleError::MemberIdNotExists(member))?;
        if roster.contains(&member) {
            return Err(ScheduleError::EventAndMemberAlreadyLinked { event, member });
        }

        roster
            .insert(&member, &member)
            .map_err(|err| ScheduleError::from_queue(err, ScheduleError::EventIdNotExists(event)))?;
        attendee.event_count += 1;

        tracing::debug!(count = attendee.event_count, "member linked");
        Ok(())
    }

    /// Unlinks a member from an event.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - [`ScheduleError::MemberIdNotExists`]
    /// - [`ScheduleError::EventIdNotExists`]
    /// - [`ScheduleError::EventAndMemberNotLinked`]
    #[tracing::instrument(skip(self))]
    pub fn remove_member_from_event(&mut self, member: MemberId, event: EventId) -> Result<(), ScheduleError> {
        let attendee = self
            .members
            .find_mut(|m| m.id == member)
            .ok_or(ScheduleError::MemberIdNotExists(member))?;
        let roster = self
            .events
            .find_mut(|e| e.id() == event)
            .ok_or(ScheduleError::EventIdNotExists(event))?
            .roster_mut();

        roster
            .remove_element(&member)
            .map_err(|_| ScheduleError::EventAndMemberNotLinked { event, member })?;
        attendee.event_count = attendee.event_count.saturating_sub(1);

        tracing::debug!(count = attendee.event_count, "member unlinked");
        Ok(())
    }

    /// Looks up a member by id.
    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.members.find(|member| member.id == id)
    }

    /// Returns an iterator over members, ascending by id.
    pub fn members(&self) -> impl ExactSizeIterator<Item = &Member> + '_ {
        self.members.iter()
    }

    /// Members linked to at least one event, most events first.
    ///
    /// Members with the same count are listed by ascending id.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::OutOfMemory`] if the ranking could not be
    /// built.
    pub fn responsible_members(&self) -> Result<Vec<Member>, ScheduleError> {
        let mut ranking = SortedQueue::new(MemberPolicy::DESCENDING);

        // Ascending id order plus stable ties gives ascending id per count
        for member in self.members.iter().filter(|m| m.event_count > 0) {
            ranking
                .insert(member, &member.event_count)
                .map_err(|err| ScheduleError::from_queue(err, ScheduleError::OutOfMemory))?;
        }

        let mut ranked = Vec::with_capacity(ranking.len());
        while let Some((member, _)) = ranking.pop() {
            ranked.push(member);
        }
        Ok(ranked)
    }

    /// Decrements the event count of everyone on `event`'s roster.
    fn release_members(&mut self, event: &Event) {
        for id in event.members() {
            if let Some(member) = self.members.find_mut(|m| m.id == id) {
                member.event_count = member.event_count.saturating_sub(1);
            }
        }
    }

    // ========================================================================
    // Time
    // ========================================================================

    /// Advances the calendar by `days` days.
    ///
    /// Each day, events dated today are dropped (unlinking their members)
    /// before the date moves on.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidDate`] if `days` is zero or the
    /// calendar would pass year `i32::MAX`. Nothing changes on error.
    #[tracing::instrument(skip(self), fields(current = %self.current))]
    pub fn tick(&mut self, days: u32) -> Result<(), ScheduleError> {
        if days == 0 {
            return Err(ScheduleError::InvalidDate);
        }
        let target = self.current.after_days(days)?;

        while self.current < target {
            self.remove_today_events();
            self.current.tick()?;
        }

        tracing::debug!(current = %self.current, events = self.events.len(), "calendar advanced");
        Ok(())
    }

    fn remove_today_events(&mut self) {
        while self
            .events
            .peek()
            .is_some_and(|(_, date)| *date <= self.current)
        {
            if let Some((event, date)) = self.events.pop() {
                tracing::debug!(id = %event.id(), %date, "event expired");
                self.release_members(&event);
            }
        }
    }

    /// Deep copy of the whole manager, rosters included.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::OutOfMemory`] if any part could not be
    /// copied.
    pub fn try_clone(&self) -> Result<Self, ScheduleError> {
        let copy_failed = |err: QueueError| ScheduleError::from_queue(err, ScheduleError::OutOfMemory);
        Ok(Self {
            created: self.created,
            current: self.current,
            events: self.events.try_clone().map_err(copy_failed)?,
            members: self.members.try_clone().map_err(copy_failed)?,
        })
    }
}
