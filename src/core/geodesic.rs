//! Great-circle distance and polyline snapping primitives.
//!
//! All functions are pure. Distances use the mean earth radius, bearings
//! are degrees clockwise from true north. Segment projection uses a planar
//! approximation about the segment midpoint, which stays within 0.5 m of
//! the spherical answer for segments shorter than ~10 km (route steps are
//! far shorter than that in practice).

use crate::core::point::GeographicCoordinate;

/// Mean earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Result of projecting a point onto a single segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentSnap {
    /// Nearest point on the segment.
    pub point: GeographicCoordinate,
    /// Normalized position along the segment, clamped to [0, 1].
    pub t: f64,
    /// Distance from the query point to `point`, in meters.
    pub perpendicular_m: f64,
}

/// Result of projecting a point onto a polyline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineStringSnap {
    /// Nearest point on the polyline.
    pub point: GeographicCoordinate,
    /// Index of the segment containing `point` (segment i spans points i..i+1).
    pub segment_index: usize,
    /// Normalized position along that segment, clamped to [0, 1].
    pub t: f64,
    /// Distance from the query point to `point`, in meters.
    pub perpendicular_m: f64,
}

/// Great-circle distance between two coordinates in meters.
pub fn haversine_distance_m(a: &GeographicCoordinate, b: &GeographicCoordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Initial bearing from `a` to `b` in degrees, [0, 360).
pub fn bearing_deg(a: &GeographicCoordinate, b: &GeographicCoordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let y = dlng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlng.cos();

    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Project a point onto the segment `ab`.
///
/// The projection is computed on a local plane about the segment midpoint,
/// with longitude scaled by the midpoint latitude cosine. The parameter is
/// clamped so the snapped point stays on the segment. A degenerate segment
/// snaps to its first endpoint with `t = 0`.
pub fn snap_to_segment(
    p: &GeographicCoordinate,
    a: &GeographicCoordinate,
    b: &GeographicCoordinate,
) -> SegmentSnap {
    let cos_lat = ((a.lat + b.lat) / 2.0).to_radians().cos();

    let dx = (b.lng - a.lng) * cos_lat;
    let dy = b.lat - a.lat;
    let px = (p.lng - a.lng) * cos_lat;
    let py = p.lat - a.lat;

    let len_sq = dx * dx + dy * dy;

    let t = if len_sq < 1e-20 {
        0.0
    } else {
        ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0)
    };

    let point = GeographicCoordinate::new(a.lat + t * (b.lat - a.lat), a.lng + t * (b.lng - a.lng));
    let perpendicular_m = haversine_distance_m(p, &point);

    SegmentSnap {
        point,
        t,
        perpendicular_m,
    }
}

/// Project a point onto the nearest segment of a polyline.
///
/// Returns the candidate with minimum perpendicular distance; ties go to
/// the lowest segment index. Returns `None` for a polyline with fewer
/// than 2 points.
pub fn snap_to_linestring(
    p: &GeographicCoordinate,
    line: &[GeographicCoordinate],
) -> Option<LineStringSnap> {
    if line.len() < 2 {
        return None;
    }

    let mut best: Option<LineStringSnap> = None;

    for (i, segment) in line.windows(2).enumerate() {
        let snap = snap_to_segment(p, &segment[0], &segment[1]);

        // Strict comparison: on an exact tie the earlier segment (and the
        // candidate already found on it) stands.
        let is_better = match &best {
            Some(prev) => snap.perpendicular_m < prev.perpendicular_m,
            None => true,
        };

        if is_better {
            best = Some(LineStringSnap {
                point: snap.point,
                segment_index: i,
                t: snap.t,
                perpendicular_m: snap.perpendicular_m,
            });
        }
    }

    best
}

/// Prefix sums of segment lengths along a polyline.
///
/// The result has one entry per point; entry 0 is 0 and the last entry is
/// the total polyline length.
pub fn cumulative_distance(line: &[GeographicCoordinate]) -> Vec<f64> {
    let mut sums = Vec::with_capacity(line.len());
    let mut total = 0.0;

    for (i, point) in line.iter().enumerate() {
        if i > 0 {
            total += haversine_distance_m(&line[i - 1], point);
        }
        sums.push(total);
    }

    sums
}

/// Arc length remaining on a polyline from a snapped position.
///
/// Given a snap at parameter `t` on segment `segment_index`, returns the
/// unfinished portion of that segment plus the lengths of all later
/// segments.
pub fn remaining_on_segments(line: &[GeographicCoordinate], segment_index: usize, t: f64) -> f64 {
    if line.len() < 2 || segment_index + 1 >= line.len() {
        return 0.0;
    }

    let mut remaining =
        (1.0 - t) * haversine_distance_m(&line[segment_index], &line[segment_index + 1]);

    for window in line[segment_index + 1..].windows(2) {
        remaining += haversine_distance_m(&window[0], &window[1]);
    }

    remaining
}
