use crate::core::constants::DEGREES_PER_METER;

/// Index of a square clustering cell in latitude/longitude degree space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub lat_index: i64,
    pub lon_index: i64,
}

impl std::fmt::Display for CellKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.lat_index, self.lon_index)
    }
}

/// Converts a metric cell size into a degree span.
///
/// The meters-per-degree constant is a latitude figure and is applied to
/// longitude as well, so cells get narrower in ground distance towards the
/// poles. Cell membership only needs to be coarse, so this is kept as is.
pub fn cell_degrees(grid_meters: f64) -> f64 {
    grid_meters * DEGREES_PER_METER
}

/// Converts a latitude/longitude pair into the cell that contains it.
///
/// Membership is decided strictly by `floor`, so two points a meter apart
/// on either side of a cell edge land in different cells.
pub fn cell_key(lat: f64, lon: f64, cell_degrees: f64) -> CellKey {
    CellKey {
        lat_index: (lat / cell_degrees).floor() as i64,
        lon_index: (lon / cell_degrees).floor() as i64,
    }
}
