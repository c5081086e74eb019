//! Geolocation Library
//!
//! A geographic point with a geohash identity and the solar events above it:
//! sunrise, solar transit, sunset and whether the Sun is currently up.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![deny(unsafe_code)]

pub mod error;
mod geolocation;
pub mod location;

pub use error::{GeolocationError, InvalidGeoHash, InvalidGeoHashReason, Result};
pub use geolocation::Geolocation;
