//! Location data types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::geohash::DEFAULT_PRECISION;
use super::solar::Horizon;

/// Valid latitude range in decimal degrees.
pub const LATITUDE_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;

/// Valid longitude range in decimal degrees.
pub const LONGITUDE_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

/// An immutable WGS84 point in decimal degrees.
///
/// Latitude is always within `-90.0..=90.0` and longitude within
/// `-180.0..=180.0`. Two coordinates are equal when both values are equal.
///
/// # Examples
///
/// ```
/// use geolocation::location::Coordinate;
///
/// let antwerp = Coordinate::new(51.260197, 4.402771);
/// assert_eq!(antwerp.latitude(), 51.260197);
/// assert!(Coordinate::try_new(91.0, 0.0).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate.
    ///
    /// # Panics
    ///
    /// Panics if `latitude` is outside `-90.0..=90.0` or `longitude` is outside
    /// `-180.0..=180.0`. NaN and infinite values are out of range. Use
    /// [`Coordinate::try_new`] for unvalidated input.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        match Self::try_new(latitude, longitude) {
            Some(coordinate) => coordinate,
            None => panic!(
                "coordinate out of range: latitude {latitude} must be within -90..=90, \
                 longitude {longitude} within -180..=180"
            ),
        }
    }

    /// Creates a coordinate, returning `None` when either value is out of range.
    #[must_use]
    pub fn try_new(latitude: f64, longitude: f64) -> Option<Self> {
        // `contains` is false for NaN, and infinities fall outside both ranges.
        (LATITUDE_RANGE.contains(&latitude) && LONGITUDE_RANGE.contains(&longitude)).then_some(
            Self {
                latitude,
                longitude,
            },
        )
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = String;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::try_new(raw.latitude, raw.longitude).ok_or_else(|| {
            format!(
                "coordinate out of range: ({}, {})",
                raw.latitude, raw.longitude
            )
        })
    }
}

/// Settings used when building a [`Geolocation`](crate::Geolocation).
///
/// These control the length of the generated geohash and the horizon used
/// for sunrise and sunset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocationSettings {
    /// Geohash length produced by `from_coordinates` (default: 12, clamped to 1..=18)
    pub geohash_precision: u8,

    /// Altitude threshold used by `sunrise`, `sunset` and `is_sun_up`
    ///
    /// The default is the apparent horizon of the Sun's upper limb. Twilight
    /// horizons turn the same queries into dawn and dusk.
    pub horizon: Horizon,
}

impl GeolocationSettings {
    /// Creates settings from a JSON string. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Converts these settings to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (extremely rare).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Default for GeolocationSettings {
    fn default() -> Self {
        Self {
            geohash_precision: DEFAULT_PRECISION,
            horizon: Horizon::default(),
        }
    }
}
