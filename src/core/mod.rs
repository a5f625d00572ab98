//! Fundamental geographic types and geodesic math.
//!
//! All coordinates are WGS84 latitude/longitude in degrees, all distances
//! in meters, all bearings in degrees clockwise from true north.

pub mod geodesic;
pub mod point;

pub use geodesic::{
    bearing_deg, cumulative_distance, haversine_distance_m, remaining_on_segments,
    snap_to_linestring, snap_to_segment, LineStringSnap, SegmentSnap, EARTH_RADIUS_M,
};
pub use point::{BoundingBox, CourseOverGround, GeographicCoordinate, UserLocation};
