//! Geographic coordinates and the birthplace registry.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};

/// Longitude and latitude in degrees, longitude positive east.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoCoordinate {
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Returns the coordinate if both components are finite and within
    /// `[-180, 180]` / `[-90, 90]`.
    pub fn validated(self) -> Result<Self> {
        if (-180.0..=180.0).contains(&self.longitude) && (-90.0..=90.0).contains(&self.latitude) {
            Ok(self)
        } else {
            Err(Error::InvalidCoordinate {
                longitude: self.longitude,
                latitude: self.latitude,
            })
        }
    }
}

const SEED_CITIES: &[(&str, f64, f64)] = &[
    ("서울", 126.9780, 37.5665),
    ("부산", 129.0756, 35.1796),
    ("인천", 126.7052, 37.4563),
    ("대구", 128.6014, 35.8714),
    ("대전", 127.3845, 36.3504),
    ("광주", 126.8526, 35.1595),
    ("제주", 126.5312, 33.4996),
    ("東京", 139.6917, 35.6895),
    ("大阪", 135.5023, 34.6937),
    ("京都", 135.7681, 35.0116),
    ("名古屋", 136.9066, 35.1815),
    ("札幌", 141.3545, 43.0618),
    ("福岡", 130.4017, 33.5904),
    ("北京", 116.4074, 39.9042),
    ("上海", 121.4737, 31.2304),
    ("香港", 114.1694, 22.3193),
    ("台北", 121.5654, 25.0330),
    ("Singapore", 103.8198, 1.3521),
    ("Bangkok", 100.5018, 13.7563),
    ("Hanoi", 105.8342, 21.0278),
    ("Manila", 120.9842, 14.5995),
    ("Jakarta", 106.8456, -6.2088),
    ("Kuala Lumpur", 101.6869, 3.1390),
    ("London", -0.1276, 51.5072),
    ("Paris", 2.3522, 48.8566),
    ("New York", -74.0060, 40.7128),
    ("Los Angeles", -118.2437, 34.0522),
    ("Sydney", 151.2093, -33.8688),
];

/// Place name to coordinate table.
///
/// Lookups are exact and case-sensitive; no transliteration or fuzzy
/// matching is attempted. Names keep their registration order.
///
/// The table is copy-on-write: [`register`](Self::register) builds a new map
/// and swaps it in, so a reader always sees a complete map.
///
/// # Example
///
/// ```
/// use sajutempo::{CoordinateRegistry, GeoCoordinate};
///
/// let registry = CoordinateRegistry::with_seed_cities();
/// assert_eq!(
///     Some(GeoCoordinate::new(139.6917, 35.6895)),
///     registry.lookup("東京"),
/// );
/// assert_eq!(None, registry.lookup("Atlantis"));
/// ```
#[derive(Debug)]
pub struct CoordinateRegistry {
    entries: RwLock<Arc<IndexMap<String, GeoCoordinate>>>,
}

impl CoordinateRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Arc::new(IndexMap::new())),
        }
    }

    /// A registry holding the built-in East Asian, Southeast Asian and
    /// Western reference cities.
    pub fn with_seed_cities() -> Self {
        let entries = SEED_CITIES
            .iter()
            .map(|&(name, lon, lat)| (name.to_owned(), GeoCoordinate::new(lon, lat)))
            .collect();
        Self {
            entries: RwLock::new(Arc::new(entries)),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<GeoCoordinate> {
        self.entries.read().get(name).copied()
    }

    /// All registered names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.snapshot().keys().cloned().collect()
    }

    /// Inserts `name`, or overwrites its coordinate in place.
    ///
    /// The coordinate goes through [`GeoCoordinate::validated`] first; an
    /// invalid one leaves the table untouched.
    pub fn register(&self, name: impl Into<String>, coordinate: GeoCoordinate) -> Result<()> {
        let coordinate = coordinate.validated()?;
        let name = name.into();
        let mut guard = self.entries.write();
        let mut next: IndexMap<String, GeoCoordinate> = (**guard).clone();
        let replaced = next.insert(name.clone(), coordinate).is_some();
        *guard = Arc::new(next);
        info!(%name, ?coordinate, replaced, "registered birthplace");
        Ok(())
    }

    /// The current table. Later registrations do not affect it.
    pub fn snapshot(&self) -> Arc<IndexMap<String, GeoCoordinate>> {
        self.entries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for CoordinateRegistry {
    fn default() -> Self {
        Self::with_seed_cities()
    }
}
