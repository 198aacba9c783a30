//! Geographic primitives: validated coordinates and great-circle distance.
//!
//! [`GeoPoint::distance_meters`] is the single source of truth for "nearby".
//! Storage backends may narrow their candidate set with an index or a
//! bounding box, but final inclusion is always decided by the exact haversine
//! distance computed here.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Mean Earth radius in meters, as used by the haversine formula.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Validation errors for geographic coordinates.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeoValidationError {
    /// Latitude was outside `[-90, 90]` or not a finite number.
    #[error("latitude must be a finite value in [-90, 90], got {0}")]
    LatitudeOutOfRange(f64),
    /// Longitude was outside `[-180, 180]` or not a finite number.
    #[error("longitude must be a finite value in [-180, 180], got {0}")]
    LongitudeOutOfRange(f64),
}

/// Immutable geographic coordinate pair in decimal degrees.
///
/// ## Invariants
/// - `latitude` is finite and within `[-90, 90]`.
/// - `longitude` is finite and within `[-180, 180]`.
///
/// # Examples
/// ```
/// use geonote::domain::GeoPoint;
///
/// let berlin = GeoPoint::new(52.5200, 13.4050).unwrap();
/// assert_eq!(berlin.latitude(), 52.52);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Construct a point, rejecting out-of-range or non-finite coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoValidationError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoValidationError::LatitudeOutOfRange(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoValidationError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in decimal degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to `other` in meters (haversine formula).
    ///
    /// Symmetric and zero at identity:
    /// `a.distance_meters(&b) == b.distance_meters(&a)` and
    /// `a.distance_meters(&a) == 0.0`.
    ///
    /// # Examples
    /// ```
    /// use geonote::domain::GeoPoint;
    ///
    /// let berlin = GeoPoint::new(52.5200, 13.4050).unwrap();
    /// let paris = GeoPoint::new(48.8566, 2.3522).unwrap();
    /// let km = berlin.distance_meters(&paris) / 1000.0;
    /// assert!((km - 878.0).abs() < 10.0);
    /// ```
    pub fn distance_meters(&self, other: &Self) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lng = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_METERS * c
    }
}

/// Longitude extent of a [`BoundingBox`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LongitudeSpan {
    /// Bounded range `[min, max]` in decimal degrees.
    Range {
        /// Western edge.
        min: f64,
        /// Eastern edge.
        max: f64,
    },
    /// The box covers every longitude (polar caps or antimeridian overlap).
    Full,
}

/// Latitude/longitude box enclosing a radius circle around a center point.
///
/// The box is a superset of the circle: it is only ever used to shrink a
/// candidate set ahead of the exact distance filter, so widening it (up to
/// the whole globe) is always correctness-preserving.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    min_latitude: f64,
    max_latitude: f64,
    longitude: LongitudeSpan,
}

impl BoundingBox {
    /// Southern edge in decimal degrees.
    pub fn min_latitude(&self) -> f64 {
        self.min_latitude
    }

    /// Northern edge in decimal degrees.
    pub fn max_latitude(&self) -> f64 {
        self.max_latitude
    }

    /// Longitude extent.
    pub fn longitude(&self) -> LongitudeSpan {
        self.longitude
    }
}

// Below this latitude-cosine the longitude delta degenerates; fall back to a
// full sweep instead of dividing by ~0.
const MIN_COS_LATITUDE: f64 = 1e-6;

/// Compute the bounding box enclosing the circle of `radius_meters` around
/// `center`.
///
/// Near the poles or across the antimeridian the longitude span widens to
/// [`LongitudeSpan::Full`] rather than attempting wraparound arithmetic.
pub fn proximity_bounds(center: &GeoPoint, radius_meters: f64) -> BoundingBox {
    let lat_delta = (radius_meters / EARTH_RADIUS_METERS).to_degrees();
    let min_latitude = (center.latitude() - lat_delta).max(-90.0);
    let max_latitude = (center.latitude() + lat_delta).min(90.0);

    let touches_pole = min_latitude <= -90.0 || max_latitude >= 90.0;
    let cos_lat = center.latitude().to_radians().cos();

    let longitude = if touches_pole || cos_lat < MIN_COS_LATITUDE {
        LongitudeSpan::Full
    } else {
        let lng_delta = (radius_meters / (EARTH_RADIUS_METERS * cos_lat)).to_degrees();
        let min = center.longitude() - lng_delta;
        let max = center.longitude() + lng_delta;
        if lng_delta >= 180.0 || min < -180.0 || max > 180.0 {
            LongitudeSpan::Full
        } else {
            LongitudeSpan::Range { min, max }
        }
    };

    BoundingBox {
        min_latitude,
        max_latitude,
        longitude,
    }
}
