//! The `Geolocation` value: a coordinate, its geohash, and the Sun above it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::{GeolocationError, Result};
use crate::location::geohash;
use crate::location::solar::{self, Horizon, SolarDay};
use crate::location::{Coordinate, GeolocationSettings};

/// A geographic point identified by its geohash.
///
/// A `Geolocation` is built either from coordinates, in which case the
/// geohash is computed, or from a geohash, in which case the coordinate is the
/// center of its cell. The two never disagree afterwards: the value is
/// immutable.
///
/// Solar queries take a `DateTime` in any timezone and answer for the civil
/// day of that instant, in that timezone. The `*_now` variants use the current
/// local time.
///
/// # Examples
///
/// ```
/// use chrono::{FixedOffset, TimeZone};
/// use geolocation::Geolocation;
///
/// let antwerp = Geolocation::from_coordinates(51.260197, 4.402771);
/// assert_eq!(antwerp.geohash(), "u155s5wh2121");
///
/// let date = FixedOffset::east_opt(3600)
///     .unwrap()
///     .with_ymd_and_hms(2020, 1, 1, 14, 30, 20)
///     .unwrap();
/// let sunset = antwerp.sunset(&date).unwrap();
/// assert_eq!(sunset.format("%H:%M:%S").to_string(), "16:44:43");
/// assert!(antwerp.is_sun_up(&date));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "GeolocationRepr", try_from = "GeolocationRepr")]
pub struct Geolocation {
    coordinate: Coordinate,
    geohash: String,
    horizon: Horizon,
}

impl Geolocation {
    /// Creates a `Geolocation` from decimal degrees with the default settings
    /// (12-character geohash, sunrise horizon).
    ///
    /// # Panics
    ///
    /// Panics if `latitude` is outside `-90.0..=90.0` or `longitude` is outside
    /// `-180.0..=180.0`. See [`Coordinate::new`].
    #[must_use]
    pub fn from_coordinates(latitude: f64, longitude: f64) -> Self {
        Self::from_coordinates_with(latitude, longitude, &GeolocationSettings::default())
    }

    /// Creates a `Geolocation` from decimal degrees with custom settings.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is out of range, like [`Geolocation::from_coordinates`].
    ///
    /// # Examples
    ///
    /// ```
    /// use geolocation::location::{GeolocationSettings, Horizon};
    /// use geolocation::Geolocation;
    ///
    /// let settings = GeolocationSettings {
    ///     geohash_precision: 5,
    ///     horizon: Horizon::Civil,
    /// };
    /// let location = Geolocation::from_coordinates_with(51.260197, 4.402771, &settings);
    /// assert_eq!(location.geohash(), "u155s");
    /// assert_eq!(location.horizon(), Horizon::Civil);
    /// ```
    #[must_use]
    pub fn from_coordinates_with(
        latitude: f64,
        longitude: f64,
        settings: &GeolocationSettings,
    ) -> Self {
        let coordinate = Coordinate::new(latitude, longitude);
        Self {
            coordinate,
            geohash: geohash::encode(coordinate, settings.geohash_precision),
            horizon: settings.horizon,
        }
    }

    /// Creates a `Geolocation` located at the center of a geohash cell.
    ///
    /// The geohash is kept as given.
    ///
    /// # Errors
    ///
    /// Returns [`GeolocationError::CanNotGenerateGeolocation`], wrapping the
    /// [`InvalidGeoHash`](crate::error::InvalidGeoHash) cause, if the geohash
    /// is empty, longer than [`geohash::MAX_PRECISION`], or contains a
    /// character outside the geohash alphabet.
    ///
    /// # Examples
    ///
    /// ```
    /// use geolocation::Geolocation;
    ///
    /// let location = Geolocation::from_geohash("u155s5wh2121").unwrap();
    /// assert!((location.latitude() - 51.260197).abs() < 1e-6);
    ///
    /// assert!(Geolocation::from_geohash("foobar").is_err());
    /// ```
    pub fn from_geohash(geohash: &str) -> Result<Self> {
        let coordinate = geohash::decode(geohash)
            .map_err(GeolocationError::can_not_generate)?;

        Ok(Self {
            coordinate,
            geohash: geohash.to_string(),
            horizon: Horizon::default(),
        })
    }

    /// Returns a copy that uses `horizon` for sunrise, sunset and `is_sun_up`.
    #[must_use]
    pub fn with_horizon(mut self, horizon: Horizon) -> Self {
        self.horizon = horizon;
        self
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.coordinate.latitude()
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.coordinate.longitude()
    }

    /// The geohash identifying this location.
    #[must_use]
    pub fn geohash(&self) -> &str {
        &self.geohash
    }

    /// The stored coordinate.
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// The horizon used by the solar queries.
    #[must_use]
    pub const fn horizon(&self) -> Horizon {
        self.horizon
    }

    /// All solar events for the civil day of `date`.
    #[must_use]
    pub fn solar_day<Tz: TimeZone>(&self, date: &DateTime<Tz>) -> SolarDay<Tz> {
        solar::solar_day(self.coordinate, date, self.horizon)
    }

    /// Solar events for the civil day of `date` against another horizon,
    /// such as [`Horizon::Civil`] for dawn and dusk.
    #[must_use]
    pub fn twilight<Tz: TimeZone>(&self, date: &DateTime<Tz>, horizon: Horizon) -> SolarDay<Tz> {
        solar::solar_day(self.coordinate, date, horizon)
    }

    /// Sunrise on the civil day of `date`, or `None` if the Sun does not cross the horizon.
    #[must_use]
    pub fn sunrise<Tz: TimeZone>(&self, date: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        self.solar_day(date).sunrise().cloned()
    }

    /// Solar transit on the civil day of `date`.
    #[must_use]
    pub fn zenith<Tz: TimeZone>(&self, date: &DateTime<Tz>) -> DateTime<Tz> {
        self.solar_day(date).transit().clone()
    }

    /// Sunset on the civil day of `date`, or `None` if the Sun does not cross the horizon.
    #[must_use]
    pub fn sunset<Tz: TimeZone>(&self, date: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        self.solar_day(date).sunset().cloned()
    }

    /// Whether the Sun is up at `date`.
    ///
    /// `false` if there is no sunrise that day; otherwise `true` if there is
    /// no sunset, or if `sunrise <= date < sunset`.
    #[must_use]
    pub fn is_sun_up<Tz: TimeZone>(&self, date: &DateTime<Tz>) -> bool {
        solar::is_up_within(&self.solar_day(date), date)
    }

    /// [`Geolocation::solar_day`] for today, in local time.
    #[must_use]
    pub fn solar_day_now(&self) -> SolarDay<Local> {
        self.solar_day(&Local::now())
    }

    /// [`Geolocation::sunrise`] for today, in local time.
    #[must_use]
    pub fn sunrise_now(&self) -> Option<DateTime<Local>> {
        self.sunrise(&Local::now())
    }

    /// [`Geolocation::zenith`] for today, in local time.
    #[must_use]
    pub fn zenith_now(&self) -> DateTime<Local> {
        self.zenith(&Local::now())
    }

    /// [`Geolocation::sunset`] for today, in local time.
    #[must_use]
    pub fn sunset_now(&self) -> Option<DateTime<Local>> {
        self.sunset(&Local::now())
    }

    /// [`Geolocation::is_sun_up`] at this instant.
    #[must_use]
    pub fn is_sun_up_now(&self) -> bool {
        self.is_sun_up(&Local::now())
    }
}

impl From<Coordinate> for Geolocation {
    fn from(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            geohash: geohash::encode(coordinate, geohash::DEFAULT_PRECISION),
            horizon: Horizon::default(),
        }
    }
}

impl FromStr for Geolocation {
    type Err = GeolocationError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_geohash(s)
    }
}

impl fmt::Display for Geolocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.geohash, self.coordinate)
    }
}

/// Wire form of a `Geolocation`.
#[derive(Serialize, Deserialize)]
struct GeolocationRepr {
    latitude: f64,
    longitude: f64,
    geohash: String,
    #[serde(default)]
    horizon: Horizon,
}

impl From<Geolocation> for GeolocationRepr {
    fn from(location: Geolocation) -> Self {
        Self {
            latitude: location.latitude(),
            longitude: location.longitude(),
            geohash: location.geohash,
            horizon: location.horizon,
        }
    }
}

impl TryFrom<GeolocationRepr> for Geolocation {
    type Error = String;

    fn try_from(repr: GeolocationRepr) -> std::result::Result<Self, Self::Error> {
        let coordinate = Coordinate::try_new(repr.latitude, repr.longitude).ok_or_else(|| {
            format!(
                "coordinate out of range: ({}, {})",
                repr.latitude, repr.longitude
            )
        })?;

        // The geohash must name the cell holding the coordinate.
        let bounds = geohash::decode_bounds(&repr.geohash).map_err(|e| e.to_string())?;
        if !bounds.contains(coordinate) {
            return Err(format!(
                "geohash `{}` does not belong to coordinate {coordinate}",
                repr.geohash
            ));
        }

        Ok(Self {
            coordinate,
            geohash: repr.geohash,
            horizon: repr.horizon,
        })
    }
}
