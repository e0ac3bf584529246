pub mod constants;
pub mod geometry;
pub mod grid;

pub use constants::{
    CLUSTER_GRID_METERS, DEGREES_PER_METER, METERS_PER_DEGREE, MIN_OFFSET_METERS,
    OFFSETS_PER_RING, OFFSET_STEP_METERS,
};
pub use geometry::{polar_offset_degrees, ring_index, ring_radius_meters, slot_angle};
pub use grid::{CellKey, cell_degrees, cell_key};
