//! Error types for geohash decoding and geolocation construction.
//!
//! Only two failure kinds exist: a malformed geohash string, and the failure
//! to build a [`Geolocation`](crate::Geolocation) from one. Polar days and
//! nights are not errors; the solar queries model them as `None`.

use std::fmt;

use thiserror::Error;

/// Why a geohash string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidGeoHashReason {
    /// The string has no characters.
    Empty,
    /// A character outside the base-32 geohash alphabet.
    InvalidCharacter {
        /// The offending character.
        character: char,
        /// Zero-based character index within the geohash.
        position: usize,
    },
    /// More characters than [`MAX_PRECISION`](crate::location::geohash::MAX_PRECISION).
    TooLong {
        /// Number of characters in the geohash.
        length: usize,
    },
}

impl fmt::Display for InvalidGeoHashReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("geohash is empty"),
            Self::InvalidCharacter {
                character,
                position,
            } => write!(f, "character `{character}` at position {position} is not in the alphabet"),
            Self::TooLong { length } => write!(
                f,
                "geohash has {length} characters, at most {} are supported",
                crate::location::geohash::MAX_PRECISION
            ),
        }
    }
}

/// A geohash that could not be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid geohash `{geohash}`: {reason}")]
pub struct InvalidGeoHash {
    /// The rejected input.
    pub geohash: String,
    /// What was wrong with it.
    pub reason: InvalidGeoHashReason,
}

/// Error type for geolocation operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeolocationError {
    /// The geohash could not be decoded.
    #[error(transparent)]
    InvalidGeoHash(#[from] InvalidGeoHash),

    /// A `Geolocation` could not be built from the given geohash.
    #[error("Fail instantiating a Geolocation instance using the geoHash `{geohash}`")]
    CanNotGenerateGeolocation {
        /// The rejected input.
        geohash: String,
        /// The decoding failure that caused it.
        #[source]
        source: InvalidGeoHash,
    },
}

impl GeolocationError {
    /// Wraps a decoding failure into a construction failure.
    #[must_use]
    pub fn can_not_generate(cause: InvalidGeoHash) -> Self {
        Self::CanNotGenerateGeolocation {
            geohash: cause.geohash.clone(),
            source: cause,
        }
    }

    /// Returns the geohash string that triggered this error.
    #[must_use]
    pub fn geohash(&self) -> &str {
        match self {
            Self::InvalidGeoHash(InvalidGeoHash { geohash, .. })
            | Self::CanNotGenerateGeolocation { geohash, .. } => geohash,
        }
    }
}

/// Result type alias for geolocation operations.
pub type Result<T> = std::result::Result<T, GeolocationError>;

/// Result type alias for geohash decoding.
pub type GeoHashResult<T> = std::result::Result<T, InvalidGeoHash>;
