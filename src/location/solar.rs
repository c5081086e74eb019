//! Sunrise, solar transit and sunset for a point on a civil day.
//!
//! The Sun's position is computed once per day at local mean noon using
//! Paul Schlyter's low-precision orbital elements (accurate to about one
//! minute between 1800 and 2100). Sunrise and sunset are the instants the Sun
//! crosses a [`Horizon`]; when it never does, the day is a [`SolarDay::PolarDay`]
//! or [`SolarDay::PolarNight`] and the crossing queries return `None`.
//!
//! Every function takes a `DateTime` in any timezone. The civil day is the
//! date of that instant in its own timezone, and results come back in the
//! same timezone.
//!
//! # Example
//!
//! ```
//! use chrono::{FixedOffset, TimeZone};
//! use geolocation::location::{solar, Coordinate};
//!
//! let brussels = FixedOffset::east_opt(3600).unwrap();
//! let date = brussels.with_ymd_and_hms(2020, 1, 1, 14, 30, 20).unwrap();
//! let antwerp = Coordinate::new(51.260197, 4.402771);
//!
//! let sunrise = solar::sunrise(antwerp, &date).unwrap();
//! assert_eq!(sunrise.format("%H:%M:%S").to_string(), "08:46:41");
//! ```

use std::f64::consts::PI;

use chrono::{DateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::types::Coordinate;

/// Unix time of J2000.0 (2000-01-01 12:00 UTC).
const J2000_UNIX: f64 = 946_728_000.0;

const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;

/// Degrees the Earth turns per hour.
const DEGREES_PER_HOUR: f64 = 15.0;

/// Apparent solar radius at 1 AU, degrees.
const SOLAR_RADIUS_AU: f64 = 0.2666;

/// 35 arc minutes of standard refraction.
const REFRACTED_HORIZON: f64 = -35.0 / 60.0;

const RADEG: f64 = 180.0 / PI;
const DEGRAD: f64 = PI / 180.0;

/// Altitude the Sun must cross for a day's rise and set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Horizon {
    /// Upper limb on the apparent horizon: 35' of refraction plus the solar radius.
    #[default]
    Sunrise,
    /// Disc center 6° below the horizon.
    Civil,
    /// Disc center 12° below the horizon.
    Nautical,
    /// Disc center 18° below the horizon.
    Astronomical,
    /// Disc center at the given altitude in degrees. A non-finite altitude is
    /// never crossed, so every day is a polar night.
    Custom(f64),
}

impl Horizon {
    /// Altitude of the threshold in degrees, before any limb correction.
    #[must_use]
    pub const fn altitude(self) -> f64 {
        match self {
            Self::Sunrise => REFRACTED_HORIZON,
            Self::Civil => -6.0,
            Self::Nautical => -12.0,
            Self::Astronomical => -18.0,
            Self::Custom(altitude) => altitude,
        }
    }

    /// Whether the crossing is measured at the Sun's upper limb rather than its center.
    #[must_use]
    pub const fn upper_limb(self) -> bool {
        matches!(self, Self::Sunrise)
    }
}

/// The solar events of one civil day at one place.
///
/// Shaped like the usual rise/set result: either the Sun crosses the horizon
/// twice, or it stays above or below it all day. Transit happens every day.
#[derive(Debug, Clone, PartialEq)]
pub enum SolarDay<Tz: TimeZone> {
    /// The Sun rises and sets.
    Daylight {
        /// Upward horizon crossing
        sunrise: DateTime<Tz>,
        /// Meridian crossing
        transit: DateTime<Tz>,
        /// Downward horizon crossing
        sunset: DateTime<Tz>,
    },
    /// The Sun stays above the horizon.
    PolarDay {
        /// Meridian crossing
        transit: DateTime<Tz>,
    },
    /// The Sun stays below the horizon.
    PolarNight {
        /// Meridian crossing
        transit: DateTime<Tz>,
    },
}

impl<Tz: TimeZone> SolarDay<Tz> {
    /// Sunrise, or `None` if the Sun does not cross the horizon that day.
    #[must_use]
    pub fn sunrise(&self) -> Option<&DateTime<Tz>> {
        match self {
            Self::Daylight { sunrise, .. } => Some(sunrise),
            Self::PolarDay { .. } | Self::PolarNight { .. } => None,
        }
    }

    /// Sunset, or `None` if the Sun does not cross the horizon that day.
    #[must_use]
    pub fn sunset(&self) -> Option<&DateTime<Tz>> {
        match self {
            Self::Daylight { sunset, .. } => Some(sunset),
            Self::PolarDay { .. } | Self::PolarNight { .. } => None,
        }
    }

    /// Solar transit (apparent noon).
    #[must_use]
    pub const fn transit(&self) -> &DateTime<Tz> {
        match self {
            Self::Daylight { transit, .. }
            | Self::PolarDay { transit }
            | Self::PolarNight { transit } => transit,
        }
    }

    /// Time between sunrise and sunset: a full day for polar day, zero for polar night.
    #[must_use]
    pub fn day_length(&self) -> TimeDelta {
        match self {
            Self::Daylight {
                sunrise, sunset, ..
            } => sunset.clone().signed_duration_since(sunrise.clone()),
            Self::PolarDay { .. } => TimeDelta::days(1),
            Self::PolarNight { .. } => TimeDelta::zero(),
        }
    }
}

/// Computes the solar events for the civil day of `date` at `coordinate`.
#[must_use]
pub fn solar_day<Tz: TimeZone>(
    coordinate: Coordinate,
    date: &DateTime<Tz>,
    horizon: Horizon,
) -> SolarDay<Tz> {
    let timezone = date.timezone();
    let midnight = date
        .date_naive()
        .and_time(NaiveTime::MIN)
        .and_utc()
        .timestamp();

    let crossing = DiurnalArc::compute(midnight, coordinate, horizon);
    let at = |hours: f64| instant_at(midnight, hours, &timezone);
    let transit = at(crossing.transit);

    let day = match crossing.half_arc {
        HalfArc::Hours(half_arc) => SolarDay::Daylight {
            sunrise: at(crossing.transit - half_arc),
            transit,
            sunset: at(crossing.transit + half_arc),
        },
        HalfArc::AlwaysAbove => {
            debug!("no horizon crossing at {coordinate} on {}: polar day", date.date_naive());
            SolarDay::PolarDay { transit }
        }
        HalfArc::AlwaysBelow => {
            debug!("no horizon crossing at {coordinate} on {}: polar night", date.date_naive());
            SolarDay::PolarNight { transit }
        }
    };

    trace!(
        "solar day at {coordinate} with {horizon:?}: sunrise {:?}, transit {:?}, sunset {:?}",
        day.sunrise(),
        day.transit(),
        day.sunset()
    );
    day
}

/// Sunrise on the civil day of `date`, or `None` during polar day and polar night.
#[must_use]
pub fn sunrise<Tz: TimeZone>(coordinate: Coordinate, date: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    solar_day(coordinate, date, Horizon::Sunrise).sunrise().cloned()
}

/// Sunset on the civil day of `date`, or `None` during polar day and polar night.
#[must_use]
pub fn sunset<Tz: TimeZone>(coordinate: Coordinate, date: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    solar_day(coordinate, date, Horizon::Sunrise).sunset().cloned()
}

/// Solar transit on the civil day of `date`. Always defined.
#[must_use]
pub fn zenith<Tz: TimeZone>(coordinate: Coordinate, date: &DateTime<Tz>) -> DateTime<Tz> {
    solar_day(coordinate, date, Horizon::Sunrise).transit().clone()
}

/// Whether the Sun is up at `date`.
///
/// `false` when no sunrise occurs that day. Otherwise `true` when no sunset
/// occurs, or when `sunrise <= date < sunset`.
#[must_use]
pub fn is_sun_up<Tz: TimeZone>(coordinate: Coordinate, date: &DateTime<Tz>) -> bool {
    is_up_within(&solar_day(coordinate, date, Horizon::Sunrise), date)
}

/// Applies the half-open `[sunrise, sunset)` rule to a computed day.
pub(crate) fn is_up_within<Tz: TimeZone>(day: &SolarDay<Tz>, date: &DateTime<Tz>) -> bool {
    let Some(sunrise) = day.sunrise() else {
        return false;
    };
    day.sunset()
        .is_none_or(|sunset| date >= sunrise && date < sunset)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn instant_at<Tz: TimeZone>(midnight: i64, hours: f64, timezone: &Tz) -> DateTime<Tz> {
    // Whole seconds, truncated toward zero.
    let seconds = (midnight as f64 + hours * SECONDS_PER_HOUR) as i64;
    let utc = DateTime::<Utc>::from_timestamp(seconds, 0).unwrap_or(if seconds < 0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    });
    utc.with_timezone(timezone)
}

/// Half of the time the Sun spends above the horizon.
#[derive(Debug, Clone, Copy)]
enum HalfArc {
    Hours(f64),
    AlwaysAbove,
    AlwaysBelow,
}

/// Transit and half diurnal arc, in hours UT after midnight of the civil date.
#[derive(Debug, Clone, Copy)]
struct DiurnalArc {
    transit: f64,
    half_arc: HalfArc,
}

impl DiurnalArc {
    #[allow(clippy::cast_precision_loss)]
    fn compute(midnight: i64, coordinate: Coordinate, horizon: Horizon) -> Self {
        let latitude = coordinate.latitude();
        let longitude = coordinate.longitude();

        // Days since 2000 Jan 0.0, at local mean noon.
        let d = (midnight as f64 - J2000_UNIX) / SECONDS_PER_DAY + 2.0 - longitude / 360.0;

        let sidereal_time = revolution(gmst0(d) + 180.0 + longitude);
        let sun = SunPosition::at(d);
        let transit = 12.0 - rev180(sidereal_time - sun.right_ascension) / DEGREES_PER_HOUR;

        let mut altitude = horizon.altitude();
        if horizon.upper_limb() {
            altitude -= SOLAR_RADIUS_AU / sun.distance;
        }

        let cos_arc = (sind(altitude) - sind(latitude) * sind(sun.declination))
            / (cosd(latitude) * cosd(sun.declination));

        // A non-finite custom altitude is never reached.
        let half_arc = if cos_arc.is_nan() || cos_arc >= 1.0 {
            HalfArc::AlwaysBelow
        } else if cos_arc <= -1.0 {
            HalfArc::AlwaysAbove
        } else {
            HalfArc::Hours(acosd(cos_arc) / DEGREES_PER_HOUR)
        };

        Self { transit, half_arc }
    }
}

/// Equatorial position of the Sun.
#[derive(Debug, Clone, Copy)]
struct SunPosition {
    right_ascension: f64,
    declination: f64,
    /// Distance in astronomical units
    distance: f64,
}

impl SunPosition {
    fn at(d: f64) -> Self {
        let (longitude, distance) = ecliptic_longitude(d);

        let x = distance * cosd(longitude);
        let y = distance * sind(longitude);

        let obliquity = 23.4393 - 3.563e-7 * d;
        let z = y * sind(obliquity);
        let y = y * cosd(obliquity);

        Self {
            right_ascension: atan2d(y, x),
            declination: atan2d(z, x.hypot(y)),
            distance,
        }
    }
}

/// True ecliptic longitude (degrees) and distance (AU) of the Sun.
fn ecliptic_longitude(d: f64) -> (f64, f64) {
    let mean_anomaly = revolution(356.0470 + 0.985_600_258_5 * d);
    let perihelion = 282.9404 + 4.709_35e-5 * d;
    let eccentricity = 0.016_709 - 1.151e-9 * d;

    let eccentric_anomaly = mean_anomaly
        + eccentricity * RADEG * sind(mean_anomaly) * (1.0 + eccentricity * cosd(mean_anomaly));
    let x = cosd(eccentric_anomaly) - eccentricity;
    let y = (1.0 - eccentricity * eccentricity).sqrt() * sind(eccentric_anomaly);

    let distance = x.hypot(y);
    let mut longitude = atan2d(y, x) + perihelion;
    if longitude >= 360.0 {
        longitude -= 360.0;
    }
    (longitude, distance)
}

/// Greenwich mean sidereal time at 0h UT, in degrees.
fn gmst0(d: f64) -> f64 {
    revolution((180.0 + 356.0470 + 282.9404) + (0.985_600_258_5 + 4.709_35e-5) * d)
}

/// Reduces an angle to `0..360`.
fn revolution(x: f64) -> f64 {
    x - 360.0 * (x / 360.0).floor()
}

/// Reduces an angle to `-180..180`.
fn rev180(x: f64) -> f64 {
    x - 360.0 * (x / 360.0 + 0.5).floor()
}

fn sind(x: f64) -> f64 {
    (x * DEGRAD).sin()
}

fn cosd(x: f64) -> f64 {
    (x * DEGRAD).cos()
}

fn acosd(x: f64) -> f64 {
    x.acos() * RADEG
}

fn atan2d(y: f64, x: f64) -> f64 {
    y.atan2(x) * RADEG
}

#[cfg(test)]
// Horizon altitudes are exact constants, so exact float comparison is intended.
#[allow(clippy::float_cmp)]
mod tests {
    use chrono::{Duration, FixedOffset};

    use super::*;

    const ANTWERP: (f64, f64) = (51.260_197, 4.402_771);

    fn antwerp() -> Coordinate {
        Coordinate::new(ANTWERP.0, ANTWERP.1)
    }

    fn cet() -> FixedOffset {
        FixedOffset::east_opt(3600).unwrap()
    }

    fn hms<Tz: TimeZone>(date: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        date.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    #[test]
    fn horizon_altitudes() {
        assert!((Horizon::Sunrise.altitude() + 0.583_333).abs() < 1e-6);
        assert_eq!(Horizon::Civil.altitude(), -6.0);
        assert_eq!(Horizon::Nautical.altitude(), -12.0);
        assert_eq!(Horizon::Astronomical.altitude(), -18.0);
        assert_eq!(Horizon::Custom(-2.5).altitude(), -2.5);
    }

    #[test]
    fn only_sunrise_horizon_uses_upper_limb() {
        assert!(Horizon::Sunrise.upper_limb());
        assert!(!Horizon::Civil.upper_limb());
        assert!(!Horizon::Custom(-0.833).upper_limb());
    }

    #[test]
    fn reference_fixture_antwerp() {
        let date = cet().with_ymd_and_hms(2020, 1, 1, 14, 30, 20).unwrap();
        let day = solar_day(antwerp(), &date, Horizon::Sunrise);

        assert_eq!(hms(day.sunrise().unwrap()), "2020-01-01 08:46:41");
        assert_eq!(hms(day.transit()), "2020-01-01 12:45:42");
        assert_eq!(hms(day.sunset().unwrap()), "2020-01-01 16:44:43");
    }

    #[test]
    fn results_keep_input_timezone() {
        let date = cet().with_ymd_and_hms(2020, 1, 1, 14, 30, 20).unwrap();
        let sunrise = sunrise(antwerp(), &date).unwrap();

        assert_eq!(sunrise.offset(), date.offset());
    }

    #[test]
    fn time_of_day_does_not_change_the_result() {
        let morning = cet().with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let evening = cet().with_ymd_and_hms(2020, 1, 1, 23, 59, 59).unwrap();

        assert_eq!(
            solar_day(antwerp(), &morning, Horizon::Sunrise),
            solar_day(antwerp(), &evening, Horizon::Sunrise)
        );
    }

    #[test]
    fn events_are_ordered() {
        let date = cet().with_ymd_and_hms(2021, 6, 21, 9, 0, 0).unwrap();
        let day = solar_day(antwerp(), &date, Horizon::Sunrise);

        let sunrise = day.sunrise().unwrap();
        let sunset = day.sunset().unwrap();
        assert!(sunrise < day.transit());
        assert!(day.transit() < sunset);
    }

    #[test]
    fn twilight_brackets_sunrise_and_sunset() {
        let date = cet().with_ymd_and_hms(2020, 3, 20, 12, 0, 0).unwrap();
        let sun = solar_day(antwerp(), &date, Horizon::Sunrise);
        let civil = solar_day(antwerp(), &date, Horizon::Civil);
        let astronomical = solar_day(antwerp(), &date, Horizon::Astronomical);

        assert!(civil.sunrise().unwrap() < sun.sunrise().unwrap());
        assert!(astronomical.sunrise().unwrap() < civil.sunrise().unwrap());
        assert!(civil.sunset().unwrap() > sun.sunset().unwrap());
        assert_eq!(civil.transit(), sun.transit());
    }

    #[test]
    fn north_pole_winter_is_polar_night() {
        let date = cet().with_ymd_and_hms(2017, 12, 21, 0, 0, 0).unwrap();
        let day = solar_day(Coordinate::new(90.0, 0.0), &date, Horizon::Sunrise);

        assert!(matches!(day, SolarDay::PolarNight { .. }));
        assert!(day.sunrise().is_none());
        assert!(day.sunset().is_none());
        assert_eq!(day.day_length(), TimeDelta::zero());
    }

    #[test]
    fn north_pole_summer_is_polar_day() {
        let date = cet().with_ymd_and_hms(2017, 6, 21, 0, 0, 0).unwrap();
        let day = solar_day(Coordinate::new(90.0, 0.0), &date, Horizon::Sunrise);

        assert!(matches!(day, SolarDay::PolarDay { .. }));
        assert_eq!(day.day_length(), TimeDelta::days(1));
        assert!(!is_sun_up(Coordinate::new(90.0, 0.0), &date));
    }

    #[test]
    fn non_finite_custom_horizon_is_never_crossed() {
        let date = cet().with_ymd_and_hms(2020, 1, 1, 14, 30, 20).unwrap();
        let reference = zenith(antwerp(), &date);

        for altitude in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let day = solar_day(antwerp(), &date, Horizon::Custom(altitude));

            assert!(matches!(day, SolarDay::PolarNight { .. }), "altitude {altitude}");
            assert!(day.sunrise().is_none());
            assert!(day.sunset().is_none());
            assert_eq!(day.transit(), &reference);
        }
    }

    #[test]
    fn south_pole_seasons_are_inverted() {
        let south_pole = Coordinate::new(-90.0, 0.0);
        let june = cet().with_ymd_and_hms(2017, 6, 21, 0, 0, 0).unwrap();
        let december = cet().with_ymd_and_hms(2017, 12, 21, 0, 0, 0).unwrap();

        assert!(matches!(
            solar_day(south_pole, &june, Horizon::Sunrise),
            SolarDay::PolarNight { .. }
        ));
        assert!(matches!(
            solar_day(south_pole, &december, Horizon::Sunrise),
            SolarDay::PolarDay { .. }
        ));
    }

    #[test]
    fn winter_day_is_shorter_than_summer_day() {
        let winter = cet().with_ymd_and_hms(2020, 12, 21, 12, 0, 0).unwrap();
        let summer = cet().with_ymd_and_hms(2020, 6, 21, 12, 0, 0).unwrap();

        let short = solar_day(antwerp(), &winter, Horizon::Sunrise).day_length();
        let long = solar_day(antwerp(), &summer, Horizon::Sunrise).day_length();
        assert!(short < long);
        assert!(short > Duration::hours(7));
        assert!(long < Duration::hours(17));
    }

    #[test]
    fn is_sun_up_boundaries() {
        let date = cet().with_ymd_and_hms(2020, 1, 1, 14, 30, 20).unwrap();
        let sunrise = sunrise(antwerp(), &date).unwrap();
        let sunset = sunset(antwerp(), &date).unwrap();
        let second = Duration::seconds(1);

        assert!(!is_sun_up(antwerp(), &(sunrise - second)));
        assert!(is_sun_up(antwerp(), &sunrise));
        assert!(is_sun_up(antwerp(), &(sunrise + second)));
        assert!(is_sun_up(antwerp(), &(sunset - second)));
        assert!(!is_sun_up(antwerp(), &sunset));
        assert!(!is_sun_up(antwerp(), &(sunset + second)));
    }

    #[test]
    fn zenith_matches_transit() {
        let date = cet().with_ymd_and_hms(2020, 1, 1, 14, 30, 20).unwrap();
        assert_eq!(hms(&zenith(antwerp(), &date)), "2020-01-01 12:45:42");
    }

    #[test]
    fn angle_reduction() {
        assert_eq!(revolution(370.0), 10.0);
        assert_eq!(revolution(-10.0), 350.0);
        assert_eq!(rev180(190.0), -170.0);
        assert_eq!(rev180(-190.0), 170.0);
    }
}
