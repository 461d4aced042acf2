//! Calendrical and geo-temporal normalization of birth times.
//!
//! A birth date and clock time are turned into true local time, by
//! correcting for how far the birthplace lies from the meridian the clock
//! was set to, and then placed in the Chinese lunisolar calendar and the
//! cycle of solar terms.
//!
//! # Examples
//!
//! The whole pipeline through [`DateTimeProcessor`]:
//!
//! ```
//! use sajutempo::{Date, DateTimeProcessor, ProcessingOptions};
//!
//! let processor = DateTimeProcessor::new(ProcessingOptions::default());
//! let date = Date::from_gregorian(2025, 1, 31).unwrap();
//! let result = processor.process(date, 23.9, Some("서울".into())).unwrap();
//!
//! assert_eq!(-32, result.local_time_adjustment_minutes);
//! assert_eq!("2025-01-31T23:22", result.adjusted_civil.to_string());
//! assert_eq!("2025年正月初三", result.lunar_date.to_string());
//! ```
//!
//! The building blocks are usable on their own, e.g. the calendar-safe
//! minute arithmetic:
//!
//! ```
//! use sajutempo::CivilDateTime;
//!
//! let t = CivilDateTime::new(2023, 12, 31, 23, 50).unwrap();
//! assert_eq!("2024-01-01T00:10", t.shift_minutes(20).to_string());
//! ```
//!
//! and the Chinese calendar:
//!
//! ```
//! use sajutempo::Date;
//! use sajutempo::chinese::{Annus, BEIJING_OFFSET_MINUTES, Month::*};
//!
//! let date = Date::from_gregorian(2000, 1, 1).unwrap();
//! let annus = Annus::from_date(date, BEIJING_OFFSET_MINUTES);
//!
//! assert_eq!(Ok((1999, Common(11), 25)), annus.ymd_for(date));
//! ```
//!
//! The crate logs through [`tracing`] and never installs a subscriber.

pub mod adjustment;
pub mod chinese;
pub mod civil;
pub mod date;
pub mod dst;
pub mod error;
pub mod geo;
pub mod options;
pub mod processor;
pub mod time_scales;

pub use adjustment::{LocalTimeAdjustmentCalculator, LongitudeBand, Region};
pub use civil::CivilDateTime;
pub use date::{Date, YearType};
pub use error::{Error, Result};
pub use geo::{CoordinateRegistry, GeoCoordinate};
pub use options::{OptionsUpdate, ProcessingOptions};
pub use processor::{
    Birthplace, BirthplaceResolution, DateTimeProcessor, DateTimeProcessorBuilder,
    ProcessedDateTime,
};
