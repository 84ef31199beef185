//! Calendar month keys and the date ranges they cover.

use std::fmt::Display;

use serde::Serialize;
use time::{Date, Month};

use crate::Error;

/// An inclusive range of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

impl DateRange {
    /// Whether `date` lies within the range, including both ends.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

/// A validated (year, month) pair identifying a budgeting period.
///
/// The first and last day of the month are computed once, when the period is
/// created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YearMonth {
    first_day: Date,
    last_day: Date,
}

impl YearMonth {
    /// Create a period key from raw integers.
    ///
    /// # Errors
    /// Returns [Error::InvalidYear] if `year` is outside 1 to 9999 and
    /// [Error::InvalidMonth] if `month` is outside 1 to 12.
    pub fn new(year: i64, month: i64) -> Result<Self, Error> {
        let valid_year = i32::try_from(year)
            .ok()
            .filter(|year| (1..=9999).contains(year))
            .ok_or(Error::InvalidYear(year))?;

        let valid_month = u8::try_from(month)
            .ok()
            .and_then(|month| Month::try_from(month).ok())
            .ok_or(Error::InvalidMonth(month))?;

        let first_day = Date::from_calendar_date(valid_year, valid_month, 1)
            .map_err(|_| Error::InvalidYear(year))?;
        let last_day = first_day
            .replace_day(valid_month.length(valid_year))
            .map_err(|_| Error::InvalidYear(year))?;

        Ok(Self {
            first_day,
            last_day,
        })
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    /// The month number, 1 for January through 12 for December.
    pub fn month(&self) -> u8 {
        self.first_day.month() as u8
    }

    /// The first through the last day of the month.
    ///
    /// The length of the month follows the calendar, so February has 29 days
    /// in leap years.
    pub fn date_range(&self) -> DateRange {
        DateRange {
            start: self.first_day,
            end: self.last_day,
        }
    }

    /// Whether `date` is in this calendar month.
    pub fn contains(&self, date: Date) -> bool {
        self.date_range().contains(date)
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year(), self.month())
    }
}
