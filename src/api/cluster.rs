use crate::core::constants::{
    CLUSTER_GRID_METERS, MIN_OFFSET_METERS, OFFSET_STEP_METERS, OFFSETS_PER_RING,
};
use crate::core::geometry::{polar_offset_degrees, ring_index, ring_radius_meters, slot_angle};
use crate::core::grid::{CellKey, cell_degrees, cell_key};
use crate::util::coord::Located;
use crate::util::error::AtlasError;
use geo::Centroid;
use geo_types::{MultiPoint, Point};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Tunables for grid clustering and ring placement.
///
/// # Example
/// ```
/// use project_atlas_rs::ClusterConfig;
///
/// let config = ClusterConfig::new().grid_meters(1600.0).offsets_per_ring(8);
/// assert_eq!(config.grid_meters, 1600.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClusterConfig {
    /// Cell edge in meters, converted to degrees with the latitude constant.
    pub grid_meters: f64,
    /// Radius of the first ring in meters.
    pub min_offset_meters: f64,
    /// Radius added per additional ring in meters.
    pub offset_step_meters: f64,
    /// Markers per ring.
    pub offsets_per_ring: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            grid_meters: CLUSTER_GRID_METERS,
            min_offset_meters: MIN_OFFSET_METERS,
            offset_step_meters: OFFSET_STEP_METERS,
            offsets_per_ring: OFFSETS_PER_RING,
        }
    }
}

impl ClusterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grid_meters(mut self, meters: f64) -> Self {
        self.grid_meters = meters;
        self
    }

    pub fn min_offset_meters(mut self, meters: f64) -> Self {
        self.min_offset_meters = meters;
        self
    }

    pub fn offset_step_meters(mut self, meters: f64) -> Self {
        self.offset_step_meters = meters;
        self
    }

    pub fn offsets_per_ring(mut self, count: usize) -> Self {
        self.offsets_per_ring = count;
        self
    }

    /// Rejects values that would make cell keys or ring indices meaningless.
    pub fn validate(&self) -> Result<(), AtlasError> {
        if !(self.grid_meters.is_finite() && self.grid_meters > 0.0) {
            return Err(AtlasError::InvalidConfig(format!(
                "gridMeters must be positive, got {}",
                self.grid_meters
            )));
        }
        if !(self.min_offset_meters.is_finite() && self.min_offset_meters >= 0.0) {
            return Err(AtlasError::InvalidConfig(format!(
                "minOffsetMeters must be non-negative, got {}",
                self.min_offset_meters
            )));
        }
        if !(self.offset_step_meters.is_finite() && self.offset_step_meters >= 0.0) {
            return Err(AtlasError::InvalidConfig(format!(
                "offsetStepMeters must be non-negative, got {}",
                self.offset_step_meters
            )));
        }
        if self.offsets_per_ring == 0 {
            return Err(AtlasError::InvalidConfig(
                "offsetsPerRing must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Display offset for one clustered marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterOffset {
    /// Latitude delta in degrees.
    pub lat_offset: f64,
    /// Longitude delta in degrees, already corrected for latitude.
    pub lon_offset: f64,
    /// Number of markers sharing the cell, this one included.
    pub cluster_size: usize,
}

/// One grid cell holding more than one marker.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSummary {
    pub cell: CellKey,
    /// Identifiers of members in input order. Members without an identifier
    /// are counted in `size` but not listed.
    pub member_ids: Vec<String>,
    pub size: usize,
    /// Centroid of the members' true positions (x = lon, y = lat).
    pub centroid: Point<f64>,
}

/// Per-marker offsets for every marker that shares a cell with another.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterMetadata {
    entries: BTreeMap<String, ClusterOffset>,
    clusters: Vec<ClusterSummary>,
}

impl ClusterMetadata {
    pub fn get(&self, id: &str) -> Option<&ClusterOffset> {
        self.entries.get(id)
    }

    /// Returns `(lat_offset, lon_offset)`, zero for markers that are not clustered.
    pub fn offset_for(&self, id: &str) -> (f64, f64) {
        self.entries
            .get(id)
            .map(|o| (o.lat_offset, o.lon_offset))
            .unwrap_or((0.0, 0.0))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClusterOffset)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Clusters in the order their first member appeared in the input.
    pub fn clusters(&self) -> &[ClusterSummary] {
        &self.clusters
    }

    pub fn entries(&self) -> &BTreeMap<String, ClusterOffset> {
        &self.entries
    }
}

/// Computes ring offsets for co-located markers.
///
/// Holds a [`ClusterConfig`]; every call recomputes from scratch, so callers
/// that re-render often should keep the result while their input is unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClusterPlacer {
    config: ClusterConfig,
}

impl ClusterPlacer {
    pub fn new(config: ClusterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    pub fn place<P: Located>(&self, points: &[P]) -> ClusterMetadata {
        build_cluster_metadata_with(points, &self.config)
    }
}

/// Builds cluster metadata with the default grid and ring constants.
///
/// # Example
/// ```
/// use project_atlas_rs::build_cluster_metadata;
///
/// let points = vec![("a", 32.0, -110.0), ("b", 32.0001, -110.0001)];
/// let meta = build_cluster_metadata(&points);
/// assert_eq!(meta.get("a").map(|o| o.cluster_size), Some(2));
/// ```
pub fn build_cluster_metadata<P: Located>(points: &[P]) -> ClusterMetadata {
    build_cluster_metadata_with(points, &ClusterConfig::default())
}

/// Builds cluster metadata with the given configuration.
///
/// Points without finite coordinates are skipped. Points that are alone in
/// their cell get no entry. Within a cell, the i-th point (input order) sits
/// at angle `i * 2π / n` on ring `i / offsets_per_ring`.
pub fn build_cluster_metadata_with<P: Located>(
    points: &[P],
    config: &ClusterConfig,
) -> ClusterMetadata {
    let cell_deg = cell_degrees(config.grid_meters);

    let mut order: Vec<CellKey> = Vec::new();
    let mut buckets: HashMap<CellKey, Vec<(&P, f64, f64)>> = HashMap::new();
    let mut skipped = 0usize;

    for point in points {
        let Some((lat, lon)) = point.lat_lon() else {
            skipped += 1;
            continue;
        };
        let key = cell_key(lat, lon, cell_deg);
        buckets
            .entry(key)
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push((point, lat, lon));
    }

    let mut metadata = ClusterMetadata::default();

    for key in order {
        let Some(bucket) = buckets.get(&key) else {
            continue;
        };
        if bucket.len() <= 1 {
            continue;
        }

        let size = bucket.len();
        let mut member_ids = Vec::with_capacity(size);

        for (index, (point, lat, _lon)) in bucket.iter().enumerate() {
            let angle = slot_angle(index, size);
            let ring = ring_index(index, config.offsets_per_ring);
            let radius =
                ring_radius_meters(ring, config.min_offset_meters, config.offset_step_meters);
            let (lat_offset, lon_offset) = polar_offset_degrees(angle, radius, *lat);

            if let Some(id) = point.marker_id() {
                member_ids.push(id.to_string());
                metadata.entries.insert(
                    id.to_string(),
                    ClusterOffset {
                        lat_offset,
                        lon_offset,
                        cluster_size: size,
                    },
                );
            }
        }

        let positions: Vec<Point<f64>> = bucket
            .iter()
            .map(|(_, lat, lon)| Point::new(*lon, *lat))
            .collect();
        let centroid = MultiPoint::from(positions)
            .centroid()
            .unwrap_or_else(|| Point::new(bucket[0].2, bucket[0].1));

        metadata.clusters.push(ClusterSummary {
            cell: key,
            member_ids,
            size,
            centroid,
        });
    }

    debug!(
        points = points.len(),
        skipped,
        clusters = metadata.clusters.len(),
        offset_markers = metadata.entries.len(),
        "built cluster metadata"
    );

    metadata
}
