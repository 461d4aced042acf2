//! Deals with different time scales, specifically, conversion between TT and
//! UT.
//!
//! Astronomical series are evaluated in TT, dates are decided in UT shifted
//! into a civil time zone.

use crate::date::Date;

/// [Terristrial time](https://en.wikipedia.org/wiki/Terrestrial_Time),
/// represented in Julian date (JD).
///
/// Dynamical time of the solar and lunar series. TDB differs by at most a
/// couple of milliseconds and is treated as the same number here.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Tt(pub f64);

/// [Universal time](https://en.wikipedia.org/wiki/Universal_Time),
/// represented in Julian date (JD).
///
/// The difference between UTC and UT1 (under a second) is ignored.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Ut(pub f64);

impl Tt {
    pub fn from_ut(ut: Ut) -> Self {
        Tt(ut.0 + delta_t(decimal_year(ut.0)) / 86400.0)
    }
}

impl Ut {
    /// # Example
    ///
    /// ```
    /// use sajutempo::time_scales::{Tt, Ut};
    /// let ut = Ut::from_tt(Tt(2451545.0));
    /// assert!((Tt(2451545.0).0 - ut.0) * 86400.0 > 63.0);
    /// ```
    pub fn from_tt(tt: Tt) -> Self {
        Ut(tt.0 - delta_t(decimal_year(tt.0)) / 86400.0)
    }

    /// The UT instant at the end (24:00 local) of `date` in a time zone
    /// ahead (east) of UTC by `tz_offset_minutes` minutes.
    pub fn end_of_day(date: Date, tz_offset_minutes: i32) -> Self {
        Ut(date.jdn() as f64 + 0.5 - tz_offset_minutes as f64 / 1440.0)
    }

    /// Returns the date at the time point in timezone ahead (east) of UTC by
    /// `tz_offset_minutes`minutes.
    ///
    /// For Beijing time (UTC+8), `tz_offset_minutes` should be +480.
    ///
    /// # Example
    ///
    /// ```
    /// use sajutempo::time_scales::Ut;
    /// let ut = Ut(2451543.25); // 1999-12-30T18:00Z
    /// assert_eq!((1999, 12, 30), ut.date_in_timezone(0).gregorian());
    /// assert_eq!((1999, 12, 31), ut.date_in_timezone(480).gregorian());
    /// ```
    pub fn date_in_timezone(&self, tz_offset_minutes: i32) -> Date {
        let jdn = (self.0 + tz_offset_minutes as f64 / 1440.0).round() as u32;
        Date::from_jdn(jdn)
    }
}

fn decimal_year(jd: f64) -> f64 {
    2000.0 + (jd - 2451545.0) / 365.25
}

/// ΔT = TT − UT in seconds, by the Espenak–Meeus polynomials.
///
/// Accurate to about a second over 1900–2025; further out it follows the
/// long-term parabola.
pub fn delta_t(year: f64) -> f64 {
    let y = year;
    let long_term = |y: f64| {
        let u = (y - 1820.0) / 100.0;
        -20.0 + 32.0 * u * u
    };
    if y < 1800.0 {
        long_term(y)
    } else if y < 1860.0 {
        let t = y - 1800.0;
        13.72 - 0.332447 * t + 0.0068612 * t.powi(2) + 0.0041116 * t.powi(3)
            - 0.00037436 * t.powi(4)
            + 0.0000121272 * t.powi(5)
            - 0.0000001699 * t.powi(6)
            + 0.000000000875 * t.powi(7)
    } else if y < 1900.0 {
        let t = y - 1860.0;
        7.62 + 0.5737 * t - 0.251754 * t.powi(2) + 0.01680668 * t.powi(3)
            - 0.0004473624 * t.powi(4)
            + t.powi(5) / 233174.0
    } else if y < 1920.0 {
        let t = y - 1900.0;
        -2.79 + 1.494119 * t - 0.0598939 * t.powi(2) + 0.0061966 * t.powi(3)
            - 0.000197 * t.powi(4)
    } else if y < 1941.0 {
        let t = y - 1920.0;
        21.20 + 0.84493 * t - 0.076100 * t.powi(2) + 0.0020936 * t.powi(3)
    } else if y < 1961.0 {
        let t = y - 1950.0;
        29.07 + 0.407 * t - t.powi(2) / 233.0 + t.powi(3) / 2547.0
    } else if y < 1986.0 {
        let t = y - 1975.0;
        45.45 + 1.067 * t - t.powi(2) / 260.0 - t.powi(3) / 718.0
    } else if y < 2005.0 {
        let t = y - 2000.0;
        63.86 + 0.3345 * t - 0.060374 * t.powi(2)
            + 0.0017275 * t.powi(3)
            + 0.000651814 * t.powi(4)
            + 0.00002373599 * t.powi(5)
    } else if y < 2050.0 {
        let t = y - 2000.0;
        62.92 + 0.32217 * t + 0.005589 * t.powi(2)
    } else if y < 2150.0 {
        long_term(y) - 0.5628 * (2150.0 - y)
    } else {
        long_term(y)
    }
}
