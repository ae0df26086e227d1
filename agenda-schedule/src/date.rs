//! Calendar dates on a fixed 30-day, 12-month calendar.

use core::fmt;

use crate::ScheduleError;

const MIN_DAY: u8 = 1;
const MAX_DAY: u8 = 30;
const MIN_MONTH: u8 = 1;
const MAX_MONTH: u8 = 12;

/// A day on the agenda calendar.
///
/// Every month has 30 days and every year 12 months. Field order makes the
/// derived ordering chronological: year, then month, then day.
///
/// ```
/// use agenda_schedule::Date;
///
/// let date = Date::new(30, 12, 2024).unwrap();
/// assert_eq!(date.after_days(1), Ok(Date::new(1, 1, 2025).unwrap()));
/// assert_eq!(date.to_string(), "30.12.2024");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    year: i32,
    month: u8,
    day: u8,
}

impl Date {
    /// Creates a date.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidDate`] if `day` is outside `1..=30` or
    /// `month` is outside `1..=12`.
    pub const fn new(day: u8, month: u8, year: i32) -> Result<Self, ScheduleError> {
        if day < MIN_DAY || day > MAX_DAY || month < MIN_MONTH || month > MAX_MONTH {
            return Err(ScheduleError::InvalidDate);
        }
        Ok(Self { year, month, day })
    }

    /// Day of month, `1..=30`.
    #[inline]
    pub const fn day(&self) -> u8 {
        self.day
    }

    /// Month, `1..=12`.
    #[inline]
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// Year.
    #[inline]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Advances to the next day, rolling over month and year.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidDate`] on the last day of year
    /// `i32::MAX`; the date is left unchanged.
    pub const fn tick(&mut self) -> Result<(), ScheduleError> {
        if self.day < MAX_DAY {
            self.day += 1;
            return Ok(());
        }
        if self.month < MAX_MONTH {
            self.day = MIN_DAY;
            self.month += 1;
            return Ok(());
        }

        let Some(year) = self.year.checked_add(1) else {
            return Err(ScheduleError::InvalidDate);
        };
        self.day = MIN_DAY;
        self.month = MIN_MONTH;
        self.year = year;
        Ok(())
    }

    /// Returns the date `days` days later.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidDate`] if that date is past year
    /// `i32::MAX`.
    pub fn after_days(self, days: u32) -> Result<Self, ScheduleError> {
        let mut date = self;
        for _ in 0..days {
            date.tick()?;
        }
        Ok(date)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.day, self.month, self.year)
    }
}
