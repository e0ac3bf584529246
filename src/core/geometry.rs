use crate::core::constants::DEGREES_PER_METER;
use std::f64::consts::TAU;

/// Ring that slot `index` belongs to when `per_ring` slots fit on each ring.
pub fn ring_index(index: usize, per_ring: usize) -> usize {
    index / per_ring.max(1)
}

/// Radius of the given ring, in meters.
pub fn ring_radius_meters(ring: usize, min_offset: f64, step: f64) -> f64 {
    min_offset + ring as f64 * step
}

/// Angle of slot `index` when a full turn is split evenly among `count`
/// slots. The increment depends on the whole cluster size, not the ring.
pub fn slot_angle(index: usize, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    (TAU / count as f64) * index as f64
}

/// Converts a polar offset around a point at `lat` into `(lat, lon)` degrees.
///
/// The longitude component is stretched by `1 / cos(lat)` so the offset
/// keeps roughly the same ground distance away from the equator. A cosine
/// of exactly zero falls back to a divisor of 1.
pub fn polar_offset_degrees(angle: f64, radius_meters: f64, lat: f64) -> (f64, f64) {
    let lat_offset = angle.sin() * radius_meters * DEGREES_PER_METER;
    let cos_lat = lat.to_radians().cos();
    let divisor = if cos_lat == 0.0 { 1.0 } else { cos_lat };
    let lon_offset = angle.cos() * radius_meters * DEGREES_PER_METER / divisor;
    (lat_offset, lon_offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::{MIN_OFFSET_METERS, OFFSET_STEP_METERS, OFFSETS_PER_RING};
    use std::f64::consts::PI;

    #[test]
    fn test_ring_index() {
        assert_eq!(ring_index(0, OFFSETS_PER_RING), 0);
        assert_eq!(ring_index(5, OFFSETS_PER_RING), 0);
        assert_eq!(ring_index(6, OFFSETS_PER_RING), 1);
        assert_eq!(ring_index(13, OFFSETS_PER_RING), 2);
    }

    #[test]
    fn test_ring_radius() {
        assert_eq!(ring_radius_meters(0, MIN_OFFSET_METERS, OFFSET_STEP_METERS), 220.0);
        assert_eq!(ring_radius_meters(1, MIN_OFFSET_METERS, OFFSET_STEP_METERS), 340.0);
        assert_eq!(ring_radius_meters(2, MIN_OFFSET_METERS, OFFSET_STEP_METERS), 460.0);
    }

    #[test]
    fn test_slot_angle_pair_is_opposite() {
        assert_eq!(slot_angle(0, 2), 0.0);
        assert!((slot_angle(1, 2) - PI).abs() < 1e-12);
    }

    #[test]
    fn test_offset_at_equator_points_east() {
        let (dlat, dlon) = polar_offset_degrees(0.0, 111_000.0, 0.0);
        assert!(dlat.abs() < 1e-12);
        assert!((dlon - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_longitude_offset_grows_with_latitude() {
        let (_, at_equator) = polar_offset_degrees(0.0, 220.0, 0.0);
        let (_, at_sixty) = polar_offset_degrees(0.0, 220.0, 60.0);
        assert!(at_sixty.abs() > at_equator.abs());
        assert!((at_sixty / at_equator - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_latitude_offset_ignores_latitude() {
        let angle = PI / 2.0;
        let (a, _) = polar_offset_degrees(angle, 220.0, 0.0);
        let (b, _) = polar_offset_degrees(angle, 220.0, 60.0);
        assert!((a - b).abs() < 1e-15);
    }
}
