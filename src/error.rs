//! Error type shared by the crate.

use thiserror::Error;

use crate::civil::CivilDateTime;

/// Input rejected at the boundary of the engine.
///
/// The computations themselves are total; every variant describes a value a
/// caller passed in.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("hour {0} is not in [0, 24)")]
    HourOutOfRange(f64),
    #[error("coordinate (lon {longitude}, lat {latitude}) is not a valid position")]
    InvalidCoordinate { longitude: f64, latitude: f64 },
    #[error("{year:04}-{month:02}-{day:02} is not a Gregorian date")]
    InvalidDate { year: i32, month: u32, day: u32 },
    #[error("{hour:02}:{minute:02} is not a wall-clock time")]
    InvalidTime { hour: u32, minute: u32 },
    #[error("{0} lies before the first supported day")]
    DateOutOfRange(CivilDateTime),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
