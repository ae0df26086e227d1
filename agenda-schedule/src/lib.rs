//! Event and member bookkeeping on a fixed-length-month calendar.
//!
//! [`EventManager`] schedules named events on [`Date`]s, registers members
//! and links members to events. Both collections are
//! [`agenda_collections::SortedQueue`]s:
//!
//! | Queue | Element | Priority | Order |
//! |-------|---------|----------|-------|
//! | events | [`Event`] | [`Date`] | earliest first, then scheduling order |
//! | members | [`Member`] | id | ascending id |
//! | event roster | [`MemberId`] | id | ascending id |
//!
//! Advancing the calendar with [`EventManager::tick`] drops events as their
//! day passes and releases their members.

#![warn(missing_docs)]

mod date;
mod error;
mod event;
mod manager;

pub use date::Date;
pub use error::ScheduleError;
pub use event::{Event, EventId, EventPolicy, Member, MemberId, MemberPolicy, Roster};
pub use manager::EventManager;
