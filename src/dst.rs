//! Historical summer time.
//!
//! During these periods clocks ran one hour ahead of standard time, so a
//! recorded birth time has to be moved back an hour before the solar
//! correction means anything. Periods are `[start, end)` in local dates;
//! the actual switch hour is not modelled.

use crate::adjustment::Region;
use crate::date::Date;

type Ymd = (i32, u32, u32);

/// Offset applied while summer time is in force.
pub const SUMMER_TIME_MINUTES: i32 = -60;

const KOREA: &[(Ymd, Ymd)] = &[
    ((1948, 6, 1), (1948, 9, 13)),
    ((1949, 4, 3), (1949, 9, 11)),
    ((1950, 4, 1), (1950, 9, 10)),
    ((1951, 5, 6), (1951, 9, 9)),
    ((1955, 5, 5), (1955, 9, 9)),
    ((1956, 5, 20), (1956, 9, 30)),
    ((1957, 5, 5), (1957, 9, 22)),
    ((1958, 5, 4), (1958, 9, 21)),
    ((1959, 5, 3), (1959, 9, 20)),
    ((1960, 5, 1), (1960, 9, 18)),
    ((1987, 5, 10), (1987, 10, 11)),
    ((1988, 5, 8), (1988, 10, 9)),
];

const JAPAN: &[(Ymd, Ymd)] = &[
    ((1948, 5, 1), (1948, 9, 11)),
    ((1949, 4, 2), (1949, 9, 10)),
    ((1950, 5, 6), (1950, 9, 9)),
    ((1951, 5, 5), (1951, 9, 8)),
];

fn periods(region: Region) -> &'static [(Ymd, Ymd)] {
    match region {
        Region::Korea => KOREA,
        Region::Japan => JAPAN,
    }
}

/// Whether summer time was in force in `region` on `date`.
///
/// # Example
///
/// ```
/// use sajutempo::Date;
/// use sajutempo::adjustment::Region;
/// use sajutempo::dst::in_summer_time;
///
/// let date = Date::from_gregorian(1988, 7, 1).unwrap();
/// assert!(in_summer_time(Region::Korea, date));
/// assert!(!in_summer_time(Region::Japan, date));
/// ```
pub fn in_summer_time(region: Region, date: Date) -> bool {
    let ymd = date.gregorian();
    periods(region)
        .iter()
        .any(|&(start, end)| start <= ymd && ymd < end)
}
