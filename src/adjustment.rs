//! Correction from nominal clock time to true local solar time.
//!
//! Each degree of longitude is four minutes of solar time. A few regions use
//! a conventional fixed correction instead of the per-degree value; those
//! are kept as a table of [`LongitudeBand`]s checked before the linear
//! formula.

use serde::Serialize;

use crate::geo::GeoCoordinate;

/// Standard meridian of UTC+9, the nominal clock the fallback formula
/// measures against.
pub const DEFAULT_REFERENCE_MERIDIAN: f64 = 135.0;

/// Regions with a conventional correction.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
pub enum Region {
    Korea,
    Japan,
}

/// Half-open longitude interval `[min_longitude, max_longitude)` mapped to a
/// fixed correction.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct LongitudeBand {
    pub region: Region,
    pub min_longitude: f64,
    pub max_longitude: f64,
    pub offset_minutes: i32,
}

impl LongitudeBand {
    pub fn contains(&self, longitude: f64) -> bool {
        self.min_longitude <= longitude && longitude < self.max_longitude
    }
}

// Bands are keyed on longitude alone. Korean territory east of 130°E
// (Ulleungdo 130.9°E, Dokdo 131.9°E) shares its longitudes with Kyushu and
// falls in the Japan band; hosts that need those islands pass a table with
// a narrower band in front through `with_bands`.
const DEFAULT_BANDS: &[LongitudeBand] = &[
    LongitudeBand {
        region: Region::Korea,
        min_longitude: 124.0,
        max_longitude: 130.0,
        offset_minutes: -32,
    },
    LongitudeBand {
        region: Region::Japan,
        min_longitude: 130.0,
        max_longitude: 146.0,
        offset_minutes: 18,
    },
];

/// Correction for one coordinate, with the band that produced it.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Adjustment {
    pub minutes: i32,
    /// `None` when the linear formula was used.
    pub region: Option<Region>,
}

/// Maps a coordinate to a signed minute correction.
///
/// Bands are checked in order and the first containing the longitude wins;
/// otherwise the correction is `round((longitude - meridian) * 4)`.
///
/// # Example
///
/// ```
/// use sajutempo::{GeoCoordinate, LocalTimeAdjustmentCalculator};
///
/// let calc = LocalTimeAdjustmentCalculator::default();
/// assert_eq!(18, calc.adjustment_minutes(GeoCoordinate::new(139.6917, 35.6895)));
/// assert_eq!(60, calc.adjustment_minutes(GeoCoordinate::new(150.0, 0.0)));
/// ```
#[derive(Debug, Clone)]
pub struct LocalTimeAdjustmentCalculator {
    bands: Vec<LongitudeBand>,
    reference_meridian: f64,
}

impl LocalTimeAdjustmentCalculator {
    /// A calculator with a custom band table and the default meridian.
    pub fn with_bands(bands: Vec<LongitudeBand>) -> Self {
        Self {
            bands,
            reference_meridian: DEFAULT_REFERENCE_MERIDIAN,
        }
    }

    pub fn with_reference_meridian(mut self, meridian: f64) -> Self {
        self.reference_meridian = meridian;
        self
    }

    pub fn bands(&self) -> &[LongitudeBand] {
        &self.bands
    }

    pub fn reference_meridian(&self) -> f64 {
        self.reference_meridian
    }

    pub fn band_for(&self, longitude: f64) -> Option<&LongitudeBand> {
        self.bands.iter().find(|band| band.contains(longitude))
    }

    pub fn resolve(&self, coordinate: GeoCoordinate) -> Adjustment {
        match self.band_for(coordinate.longitude) {
            Some(band) => Adjustment {
                minutes: band.offset_minutes,
                region: Some(band.region),
            },
            // `as` saturates, and maps NaN to 0.
            None => Adjustment {
                minutes: ((coordinate.longitude - self.reference_meridian) * 4.0).round() as i32,
                region: None,
            },
        }
    }

    pub fn adjustment_minutes(&self, coordinate: GeoCoordinate) -> i32 {
        self.resolve(coordinate).minutes
    }
}

impl Default for LocalTimeAdjustmentCalculator {
    fn default() -> Self {
        Self::with_bands(DEFAULT_BANDS.to_vec())
    }
}
