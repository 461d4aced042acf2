//! Wall-clock date and time, and minute arithmetic over it.

use std::fmt;

use serde::Serialize;
use tracing::trace;

use crate::date::{Date, days_in_month};
use crate::error::{Error, Result};

/// Calendar date with hour and minute, no time zone attached.
///
/// Every value obtained from this module is calendar-valid: `day` never
/// exceeds the length of its month, `hour < 24` and `minute < 60`. Fields
/// are read through accessors, so a record can only be built by
/// [`new`](Self::new) or the arithmetic here:
///
/// ```compile_fail
/// use sajutempo::CivilDateTime;
///
/// let t = CivilDateTime { year: 2024, month: 13, day: 1, hour: 0, minute: 0 };
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize)]
pub struct CivilDateTime {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
}

impl CivilDateTime {
    /// Creates a record after checking every field.
    ///
    /// # Example
    ///
    /// ```
    /// use sajutempo::CivilDateTime;
    ///
    /// assert!(CivilDateTime::new(2024, 2, 29, 23, 50).is_ok());
    /// assert!(CivilDateTime::new(2100, 2, 29, 23, 50).is_err());
    /// ```
    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Result<Self> {
        if Date::from_gregorian(year, month, day).is_none() {
            return Err(Error::InvalidDate { year, month, day });
        }
        if hour >= 24 || minute >= 60 {
            return Err(Error::InvalidTime { hour, minute });
        }
        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
        })
    }

    /// Splits a fractional hour over a date: the integer part is the hour,
    /// the fraction times 60, rounded, is the minute.
    ///
    /// A fraction rounding up to 60 minutes carries into the next hour (and
    /// day, if needed). `hour_with_minutes` is expected in `[0, 24)`.
    ///
    /// # Example
    ///
    /// ```
    /// use sajutempo::{CivilDateTime, Date};
    ///
    /// let date = Date::from_gregorian(1991, 3, 15).unwrap();
    /// let civil = CivilDateTime::from_date_and_hour(date, 10.5);
    /// assert_eq!("1991-03-15T10:30", civil.to_string());
    /// ```
    pub fn from_date_and_hour(date: Date, hour_with_minutes: f64) -> Self {
        let (year, month, day) = date.gregorian();
        let hour = hour_with_minutes.trunc();
        let minute = ((hour_with_minutes - hour) * 60.0).round() as i64;
        let total = hour as i64 * 60 + minute;
        normalize(year as i64, month as i64, day as i64, 0, total)
    }

    /// Shifts the time by `offset` minutes, carrying or borrowing through
    /// hour, day, month and year.
    ///
    /// Month lengths are looked up for the actual year, so February rolls
    /// over after the 29th only in leap years.
    ///
    /// # Example
    ///
    /// ```
    /// use sajutempo::CivilDateTime;
    ///
    /// let t = CivilDateTime::new(2024, 2, 29, 23, 50).unwrap();
    /// assert_eq!(CivilDateTime::new(2024, 3, 1, 0, 10).unwrap(), t.shift_minutes(20));
    ///
    /// let t = CivilDateTime::new(2025, 1, 1, 0, 5).unwrap();
    /// assert_eq!(CivilDateTime::new(2024, 12, 31, 23, 35).unwrap(), t.shift_minutes(-30));
    /// ```
    pub fn shift_minutes(self, offset: i32) -> Self {
        if offset == 0 {
            return self;
        }
        let shifted = normalize(
            self.year as i64,
            self.month as i64,
            self.day as i64,
            self.hour as i64,
            self.minute as i64 + offset as i64,
        );
        trace!(from = %self, offset, to = %shifted, "shifted civil time");
        shifted
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    /// The calendar day of this record, or `None` if it lies outside the
    /// Julian day range of [`Date`].
    ///
    /// # Example
    ///
    /// ```
    /// use sajutempo::{CivilDateTime, Date};
    ///
    /// let first = CivilDateTime::from_date_and_hour(Date::from_jdn(0), 0.0);
    /// assert_eq!(Some(Date::from_jdn(0)), first.date());
    /// assert_eq!(None, first.shift_minutes(-1).date());
    /// ```
    pub fn date(&self) -> Option<Date> {
        Date::from_gregorian(self.year, self.month, self.day)
    }

    /// `true` if all fields describe an existing wall-clock minute.
    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
            && self.day >= 1
            && self.day <= days_in_month(self.year, self.month)
            && self.hour < 24
            && self.minute < 60
    }
}

impl fmt::Display for CivilDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute
        )
    }
}

/// Brings minute and hour into range first, then walks the day across month
/// boundaries one month at a time.
fn normalize(mut year: i64, mut month: i64, mut day: i64, hour: i64, minute: i64) -> CivilDateTime {
    let hour = hour + minute.div_euclid(60);
    let minute = minute.rem_euclid(60);
    day += hour.div_euclid(24);
    let hour = hour.rem_euclid(24);

    let mut len = days_in_month(year as i32, month as u32) as i64;
    while day > len {
        day -= len;
        month += 1;
        if month > 12 {
            month = 1;
            year += 1;
        }
        len = days_in_month(year as i32, month as u32) as i64;
    }
    while day < 1 {
        month -= 1;
        if month < 1 {
            month = 12;
            year -= 1;
        }
        day += days_in_month(year as i32, month as u32) as i64;
    }

    CivilDateTime {
        year: year as i32,
        month: month as u32,
        day: day as u32,
        hour: hour as u32,
        minute: minute as u32,
    }
}
