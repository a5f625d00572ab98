//! Geographic coordinate and location value types.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// A WGS84 coordinate (degrees).
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct GeographicCoordinate {
    /// Latitude in degrees, valid range [-90, 90].
    pub lat: f64,
    /// Longitude in degrees, valid range [-180, 180].
    pub lng: f64,
}

impl GeographicCoordinate {
    /// Create a new coordinate.
    #[inline]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Check that both components are inside their valid ranges.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Approximate equality within `epsilon_deg` degrees per component.
    ///
    /// Used when chaining step geometries parsed from quantized wire
    /// formats (polyline grids round to 1e-5 or 1e-6 degrees).
    #[inline]
    pub fn approx_eq(&self, other: &GeographicCoordinate, epsilon_deg: f64) -> bool {
        (self.lat - other.lat).abs() <= epsilon_deg && (self.lng - other.lng).abs() <= epsilon_deg
    }
}

/// An axis-aligned geographic bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Southwest corner.
    pub sw: GeographicCoordinate,
    /// Northeast corner.
    pub ne: GeographicCoordinate,
}

impl BoundingBox {
    /// Compute the bounding box of a non-empty coordinate sequence.
    ///
    /// Returns `None` for an empty slice.
    pub fn from_coordinates(coordinates: &[GeographicCoordinate]) -> Option<Self> {
        let first = coordinates.first()?;
        let mut sw = *first;
        let mut ne = *first;
        for c in &coordinates[1..] {
            sw.lat = sw.lat.min(c.lat);
            sw.lng = sw.lng.min(c.lng);
            ne.lat = ne.lat.max(c.lat);
            ne.lng = ne.lng.max(c.lng);
        }
        Some(Self { sw, ne })
    }

    /// Check whether a coordinate lies inside the box (inclusive).
    #[inline]
    pub fn contains(&self, c: &GeographicCoordinate) -> bool {
        c.lat >= self.sw.lat && c.lat <= self.ne.lat && c.lng >= self.sw.lng && c.lng <= self.ne.lng
    }
}

/// Course over ground: the direction of travel, not the device heading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseOverGround {
    /// Direction in degrees clockwise from true north, [0, 360).
    pub degrees: u16,
    /// Reported accuracy of the course value, in degrees.
    pub accuracy: u16,
}

impl CourseOverGround {
    /// Create a new course, normalizing `degrees` into [0, 360).
    #[inline]
    pub fn new(degrees: u16, accuracy: u16) -> Self {
        Self {
            degrees: degrees % 360,
            accuracy,
        }
    }
}

/// A single location fix as observed by the host platform.
///
/// A horizontal accuracy of exactly 0 is treated as a perfect fix. Some
/// platforms use 0 as an "unknown" sentinel; hosts must translate such
/// values before handing the fix to the controller.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserLocation {
    /// Observed position.
    pub coordinates: GeographicCoordinate,
    /// Horizontal accuracy radius in meters (>= 0 for a well-formed fix).
    pub horizontal_accuracy_m: f64,
    /// Course over ground, if the platform reported a valid one.
    pub course: Option<CourseOverGround>,
    /// Wall-clock time of the fix.
    pub timestamp: SystemTime,
}

impl UserLocation {
    /// Create a location fix without a course.
    pub fn new(coordinates: GeographicCoordinate, horizontal_accuracy_m: f64) -> Self {
        Self {
            coordinates,
            horizontal_accuracy_m,
            course: None,
            timestamp: SystemTime::UNIX_EPOCH,
        }
    }

    /// Attach a course over ground.
    pub fn with_course(mut self, course: CourseOverGround) -> Self {
        self.course = Some(course);
        self
    }

    /// Attach a fix timestamp.
    pub fn with_timestamp(mut self, timestamp: SystemTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Check that the fix can be used for navigation.
    #[inline]
    pub fn is_well_formed(&self) -> bool {
        self.coordinates.is_valid()
            && self.horizontal_accuracy_m.is_finite()
            && self.horizontal_accuracy_m >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_validity() {
        assert!(GeographicCoordinate::new(45.0, -122.0).is_valid());
        assert!(GeographicCoordinate::new(-90.0, 180.0).is_valid());
        assert!(!GeographicCoordinate::new(90.1, 0.0).is_valid());
        assert!(!GeographicCoordinate::new(0.0, -180.5).is_valid());
        assert!(!GeographicCoordinate::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_coordinate_approx_eq() {
        let a = GeographicCoordinate::new(48.0, 16.0);
        let b = GeographicCoordinate::new(48.0 + 5e-8, 16.0 - 5e-8);
        assert!(a.approx_eq(&b, 1e-7));
        assert!(!a.approx_eq(&GeographicCoordinate::new(48.001, 16.0), 1e-7));
    }

    #[test]
    fn test_bounding_box_from_coordinates() {
        let bbox = BoundingBox::from_coordinates(&[
            GeographicCoordinate::new(1.0, 2.0),
            GeographicCoordinate::new(-1.0, 4.0),
            GeographicCoordinate::new(0.5, 3.0),
        ])
        .unwrap();

        assert_eq!(bbox.sw, GeographicCoordinate::new(-1.0, 2.0));
        assert_eq!(bbox.ne, GeographicCoordinate::new(1.0, 4.0));
        assert!(bbox.contains(&GeographicCoordinate::new(0.0, 3.0)));
        assert!(!bbox.contains(&GeographicCoordinate::new(2.0, 3.0)));
    }

    #[test]
    fn test_bounding_box_empty() {
        assert!(BoundingBox::from_coordinates(&[]).is_none());
    }

    #[test]
    fn test_course_normalization() {
        let course = CourseOverGround::new(450, 5);
        assert_eq!(course.degrees, 90);
    }

    #[test]
    fn test_user_location_well_formed() {
        let loc = UserLocation::new(GeographicCoordinate::new(0.0, 0.0), 5.0);
        assert!(loc.is_well_formed());

        let bad = UserLocation::new(GeographicCoordinate::new(0.0, 0.0), -1.0);
        assert!(!bad.is_well_formed());
    }
}
