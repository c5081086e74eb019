//! Location module.
//!
//! Provides the two computations a [`Geolocation`](crate::Geolocation)
//! delegates to:
//! - Geohash encoding and decoding (reversible string identity of a point)
//! - Solar events: sunrise, transit and sunset for a civil day
//!
//! # Guarantees
//!
//! - Every function is pure and safe to call from any thread
//! - Geohash encoding is deterministic and uses only the base-32 geohash alphabet
//! - Decoding returns the center of the cell, within [`geohash::error_margin`]
//!   of any coordinate that encodes to it
//! - Days without a horizon crossing yield `None`, not an error
//!
//! # Example Usage
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use geolocation::location::{geohash, solar, Coordinate};
//!
//! let antwerp = Coordinate::new(51.260197, 4.402771);
//! let hash = geohash::encode(antwerp, geohash::DEFAULT_PRECISION);
//! assert_eq!(hash, "u155s5wh2121");
//!
//! let date = Utc.with_ymd_and_hms(2020, 1, 1, 12, 0, 0).unwrap();
//! let sunrise = solar::sunrise(antwerp, &date).unwrap();
//! let sunset = solar::sunset(antwerp, &date).unwrap();
//! assert!(sunrise < solar::zenith(antwerp, &date));
//! assert!(solar::zenith(antwerp, &date) < sunset);
//!
//! // No sunrise at the North Pole in December
//! let north_pole = Coordinate::new(90.0, 0.0);
//! let winter = Utc.with_ymd_and_hms(2017, 12, 21, 0, 0, 0).unwrap();
//! assert!(solar::sunrise(north_pole, &winter).is_none());
//! ```

pub mod geohash;
pub mod solar;
pub mod types;

pub use geohash::{decode, decode_bounds, encode, GeoHashBounds};
pub use solar::{Horizon, SolarDay};
pub use types::{Coordinate, GeolocationSettings};
