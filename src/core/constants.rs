/// Edge length of a clustering grid cell, in meters.
pub const CLUSTER_GRID_METERS: f64 = 3200.0;

/// Radius of the innermost offset ring, in meters.
pub const MIN_OFFSET_METERS: f64 = 220.0;

/// Extra radius added for each ring beyond the first, in meters.
pub const OFFSET_STEP_METERS: f64 = 120.0;

/// Number of markers placed on a ring before the next ring starts.
pub const OFFSETS_PER_RING: usize = 6;

/// Approximate length of one degree of latitude, in meters.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// Degrees per meter of latitude (`1 / METERS_PER_DEGREE`).
///
/// Also used uncorrected for longitude when deciding cell membership.
pub const DEGREES_PER_METER: f64 = 1.0 / METERS_PER_DEGREE;
