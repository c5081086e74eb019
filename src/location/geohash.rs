//! Geohash encoding and decoding.
//!
//! A geohash names a rectangular cell of the latitude/longitude plane. Each
//! character carries 5 bits; bits alternate between longitude and latitude
//! (longitude first), and each bit halves the current interval of its axis.
//! Longer strings name smaller cells.
//!
//! # Geohash Precision Table
//!
//! | Length | Lat error  | Lon error  | Approx. radius |
//! |--------|------------|------------|----------------|
//! | 1      | ±23°       | ±23°       | ±2500 km       |
//! | 5      | ±0.022°    | ±0.022°    | ±2.4 km        |
//! | 8      | ±0.000086° | ±0.00017°  | ±19 m          |
//! | 12     | ±8.4e-8°   | ±1.7e-7°   | ±1.9 cm        |
//!
//! Lengths are limited to [`MAX_PRECISION`]. Up to that length every interval
//! endpoint and midpoint is exactly representable as an `f64`, so a decoded
//! center always lies inside its cell.

use log::debug;

use super::types::{Coordinate, LATITUDE_RANGE, LONGITUDE_RANGE};
use crate::error::{GeoHashResult, InvalidGeoHash, InvalidGeoHashReason};

/// The base-32 geohash alphabet (digits and lowercase letters without `a`, `i`, `l`, `o`).
pub const ALPHABET: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Canonical geohash length, sub-meter resolution.
pub const DEFAULT_PRECISION: u8 = 12;

/// Longest supported geohash (45 bits per axis).
pub const MAX_PRECISION: u8 = 18;

const BITS_PER_CHAR: u32 = 5;

/// A closed interval of one axis, narrowed by bisection.
#[derive(Debug, Clone, Copy)]
struct Interval {
    min: f64,
    max: f64,
}

impl Interval {
    const fn new(range: &std::ops::RangeInclusive<f64>) -> Self {
        Self {
            min: *range.start(),
            max: *range.end(),
        }
    }

    fn midpoint(self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Keeps the upper half when `upper` is set, the lower half otherwise.
    fn bisect(&mut self, upper: bool) {
        let mid = self.midpoint();
        if upper {
            self.min = mid;
        } else {
            self.max = mid;
        }
    }
}

/// The cell a geohash names.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoHashBounds {
    /// Southern edge in degrees
    pub min_latitude: f64,
    /// Northern edge in degrees
    pub max_latitude: f64,
    /// Western edge in degrees
    pub min_longitude: f64,
    /// Eastern edge in degrees
    pub max_longitude: f64,
}

impl GeoHashBounds {
    /// Center of the cell. This is what [`decode`] returns.
    #[must_use]
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.min_latitude + self.max_latitude) / 2.0,
            (self.min_longitude + self.max_longitude) / 2.0,
        )
    }

    /// Half of the cell's height and width, as `(latitude, longitude)` degrees.
    #[must_use]
    pub fn half_width(&self) -> (f64, f64) {
        (
            (self.max_latitude - self.min_latitude) / 2.0,
            (self.max_longitude - self.min_longitude) / 2.0,
        )
    }

    /// Whether `coordinate` lies inside the cell, edges included.
    #[must_use]
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&coordinate.latitude())
            && (self.min_longitude..=self.max_longitude).contains(&coordinate.longitude())
    }
}

/// Encodes a coordinate as a geohash of `precision` characters.
///
/// `precision` is clamped to `1..=MAX_PRECISION`. The result is deterministic and
/// contains only characters from [`ALPHABET`].
///
/// # Examples
///
/// ```
/// use geolocation::location::{geohash, Coordinate};
///
/// let hash = geohash::encode(Coordinate::new(51.260197, 4.402771), 12);
/// assert_eq!(hash, "u155s5wh2121");
/// assert!(hash.starts_with(&geohash::encode(Coordinate::new(51.260197, 4.402771), 5)));
/// ```
#[must_use]
pub fn encode(coordinate: Coordinate, precision: u8) -> String {
    let length = usize::from(clamp_precision(precision));
    let mut latitude = Interval::new(&LATITUDE_RANGE);
    let mut longitude = Interval::new(&LONGITUDE_RANGE);
    let mut geohash = String::with_capacity(length);
    let mut longitude_turn = true;

    while geohash.len() < length {
        let mut index = 0_usize;
        for _ in 0..BITS_PER_CHAR {
            let (interval, value) = if longitude_turn {
                (&mut longitude, coordinate.longitude())
            } else {
                (&mut latitude, coordinate.latitude())
            };
            let upper = value >= interval.midpoint();
            interval.bisect(upper);
            index = (index << 1) | usize::from(upper);
            longitude_turn = !longitude_turn;
        }
        geohash.push(char::from(ALPHABET[index]));
    }

    geohash
}

/// Decodes a geohash into the cell it names.
///
/// # Errors
///
/// Returns [`InvalidGeoHash`] if `geohash` is empty, longer than
/// [`MAX_PRECISION`], or contains a character outside [`ALPHABET`]. Matching
/// is case-sensitive.
pub fn decode_bounds(geohash: &str) -> GeoHashResult<GeoHashBounds> {
    if geohash.is_empty() {
        return Err(invalid(geohash, InvalidGeoHashReason::Empty));
    }
    let length = geohash.chars().count();
    if length > usize::from(MAX_PRECISION) {
        return Err(invalid(geohash, InvalidGeoHashReason::TooLong { length }));
    }

    let mut latitude = Interval::new(&LATITUDE_RANGE);
    let mut longitude = Interval::new(&LONGITUDE_RANGE);
    let mut longitude_turn = true;

    for (position, character) in geohash.chars().enumerate() {
        let Some(index) = char_index(character) else {
            return Err(invalid(
                geohash,
                InvalidGeoHashReason::InvalidCharacter {
                    character,
                    position,
                },
            ));
        };

        for shift in (0..BITS_PER_CHAR).rev() {
            let upper = (index >> shift) & 1 == 1;
            if longitude_turn {
                longitude.bisect(upper);
            } else {
                latitude.bisect(upper);
            }
            longitude_turn = !longitude_turn;
        }
    }

    Ok(GeoHashBounds {
        min_latitude: latitude.min,
        max_latitude: latitude.max,
        min_longitude: longitude.min,
        max_longitude: longitude.max,
    })
}

/// Decodes a geohash to the center of its cell.
///
/// # Errors
///
/// Same as [`decode_bounds`].
///
/// # Examples
///
/// ```
/// use geolocation::location::{geohash, Coordinate};
///
/// let original = Coordinate::new(37.7749, -122.4194);
/// let decoded = geohash::decode(&geohash::encode(original, 8)).unwrap();
///
/// let (lat_err, lon_err) = geohash::error_margin(8);
/// assert!((decoded.latitude() - original.latitude()).abs() <= lat_err);
/// assert!((decoded.longitude() - original.longitude()).abs() <= lon_err);
/// ```
pub fn decode(geohash: &str) -> GeoHashResult<Coordinate> {
    decode_bounds(geohash).map(|bounds| bounds.center())
}

/// Returns whether [`decode`] accepts `geohash`.
#[must_use]
pub fn is_valid(geohash: &str) -> bool {
    (1..=usize::from(MAX_PRECISION)).contains(&geohash.len())
        && geohash.chars().all(|c| char_index(c).is_some())
}

/// Half-width of a cell of `precision` characters, as `(latitude, longitude)` degrees.
///
/// Longitude takes the extra bit when `5 * precision` is odd. `precision` is
/// clamped like in [`encode`].
#[must_use]
pub fn error_margin(precision: u8) -> (f64, f64) {
    let bits = u32::from(clamp_precision(precision)) * BITS_PER_CHAR;
    let latitude_bits = bits / 2;
    let longitude_bits = bits - latitude_bits;
    (
        90.0 / 2_f64.powf(f64::from(latitude_bits)),
        180.0 / 2_f64.powf(f64::from(longitude_bits)),
    )
}

/// Approximate error radius in meters for a geohash of `precision` characters.
///
/// This is a constant-time lookup for lengths 1 to 12; other lengths return 0.
///
/// # Examples
///
/// ```
/// use geolocation::location::geohash::error_radius_meters;
///
/// assert_eq!(error_radius_meters(8), 19.0);
/// ```
#[must_use]
pub const fn error_radius_meters(precision: u8) -> f64 {
    match precision {
        1 => 2_500_000.0, // ±2500 km
        2 => 630_000.0,   // ±630 km
        3 => 78_000.0,    // ±78 km
        4 => 20_000.0,    // ±20 km
        5 => 2_400.0,     // ±2.4 km
        6 => 610.0,       // ±610 m
        7 => 76.0,        // ±76 m
        8 => 19.0,        // ±19 m
        9 => 2.4,         // ±2.4 m
        10 => 0.6,        // ±0.6 m
        11 => 0.074,      // ±7.4 cm
        12 => 0.019,      // ±1.9 cm
        _ => 0.0,
    }
}

fn clamp_precision(precision: u8) -> u8 {
    precision.clamp(1, MAX_PRECISION)
}

fn char_index(character: char) -> Option<usize> {
    u8::try_from(character)
        .ok()
        .and_then(|byte| ALPHABET.iter().position(|&symbol| symbol == byte))
}

fn invalid(geohash: &str, reason: InvalidGeoHashReason) -> InvalidGeoHash {
    debug!("rejecting geohash {geohash:?}: {reason}");
    InvalidGeoHash {
        geohash: geohash.to_string(),
        reason,
    }
}
