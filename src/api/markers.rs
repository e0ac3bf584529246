use crate::api::cluster::ClusterMetadata;
use crate::api::project::Project;
use crate::util::coord::Located;
use geo_types::Point;
use geojson::{Feature, FeatureCollection, JsonObject, feature::Id};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// Delay between consecutive marker reveals.
pub const REVEAL_STEP: Duration = Duration::from_millis(50);

/// Upper bound on any single reveal delay.
pub const MAX_REVEAL_DELAY: Duration = Duration::from_millis(800);

/// A project ready to be drawn: where it sits and what a click reports.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker<'a> {
    pub id: String,
    pub project: &'a Project,
    /// True position (x = lon, y = lat).
    pub position: Point<f64>,
    /// Position after applying the cluster offset.
    pub display_position: Point<f64>,
    /// Set only for markers that share their cell with others.
    pub cluster_size: Option<usize>,
}

impl Marker<'_> {
    pub fn is_clustered(&self) -> bool {
        self.cluster_size.is_some()
    }
}

/// Builds markers for every project with an identifier and finite coordinates.
///
/// Projects not in `metadata` are drawn at their true position. When two
/// projects share an identifier the later one replaces the earlier marker,
/// as it does in `metadata`; the marker keeps the earlier one's slot.
pub fn place_markers<'a>(projects: &'a [Project], metadata: &ClusterMetadata) -> Vec<Marker<'a>> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut markers: Vec<Marker<'a>> = Vec::with_capacity(projects.len());

    for project in projects {
        let (Some(id), Some((lat, lon))) = (project.marker_id(), project.lat_lon()) else {
            continue;
        };
        let (lat_offset, lon_offset) = metadata.offset_for(id);
        let cluster_size = metadata
            .get(id)
            .map(|o| o.cluster_size)
            .filter(|size| *size > 1);

        let marker = Marker {
            id: id.to_string(),
            project,
            position: Point::new(lon, lat),
            display_position: Point::new(lon + lon_offset, lat + lat_offset),
            cluster_size,
        };
        match slots.get(id) {
            Some(&slot) => markers[slot] = marker,
            None => {
                slots.insert(id, markers.len());
                markers.push(marker);
            }
        }
    }

    markers
}

/// Converts markers to GeoJSON point features at their display positions.
pub fn markers_to_geojson(markers: &[Marker<'_>]) -> FeatureCollection {
    let features = markers
        .iter()
        .map(|marker| {
            let mut properties = JsonObject::new();
            properties.insert("id".to_string(), Value::from(marker.id.clone()));
            if let Some(name) = &marker.project.name {
                properties.insert("name".to_string(), Value::from(name.clone()));
            }
            if let Some(size) = marker.cluster_size {
                properties.insert("clusterSize".to_string(), Value::from(size));
            }
            properties.insert("trueLatitude".to_string(), Value::from(marker.position.y()));
            properties.insert("trueLongitude".to_string(), Value::from(marker.position.x()));

            Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::from(&marker.display_position)),
                id: Some(Id::String(marker.id.clone())),
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Staggered reveal delays for `count` markers.
///
/// All zero when motion should be minimised (reduced-motion preference or a
/// low quality tier).
pub fn reveal_delays(count: usize, minimise_motion: bool) -> Vec<Duration> {
    (0..count)
        .map(|i| {
            if minimise_motion {
                Duration::ZERO
            } else {
                (REVEAL_STEP * i as u32).min(MAX_REVEAL_DELAY)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::cluster::build_cluster_metadata;

    fn sample() -> Vec<Project> {
        vec![
            Project::new("a", 32.0, -110.0).with_name("Alpha"),
            Project::new("b", 32.0001, -110.0001).with_name("Beta"),
            Project::new("c", 40.0, -100.0),
            Project {
                id: Some("d".into()),
                ..Project::default()
            },
            Project {
                id: None,
                latitude: Some(1.0),
                longitude: Some(1.0),
                ..Project::default()
            },
        ]
    }

    #[test]
    fn test_place_markers_applies_offsets() {
        let projects = sample();
        let meta = build_cluster_metadata(&projects);
        let markers = place_markers(&projects, &meta);

        assert_eq!(markers.len(), 3);
        let a = &markers[0];
        assert_eq!(a.cluster_size, Some(2));
        assert!(a.display_position.x() > a.position.x());

        let c = &markers[2];
        assert!(!c.is_clustered());
        assert_eq!(c.display_position, c.position);
    }

    #[test]
    fn test_duplicate_ids_keep_last() {
        let projects = vec![Project::new("a", 1.0, 1.0), Project::new("a", 50.0, 50.0)];
        let meta = build_cluster_metadata(&projects);
        let markers = place_markers(&projects, &meta);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].position.y(), 50.0);
    }

    #[test]
    fn test_duplicate_id_uses_offset_of_kept_project() {
        let projects = vec![
            Project::new("a", 1.0, 1.0),
            Project::new("z", 10.0, 10.0),
            Project::new("a", 50.0, 50.0),
            Project::new("b", 50.0001, 50.0001),
        ];
        let meta = build_cluster_metadata(&projects);
        let markers = place_markers(&projects, &meta);

        let ids: Vec<_> = markers.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "z", "b"]);

        let a = &markers[0];
        assert_eq!(a.position, Point::new(50.0, 50.0));
        assert_eq!(a.cluster_size, Some(2));
        let (lat_offset, lon_offset) = meta.offset_for("a");
        assert_eq!(a.display_position, Point::new(50.0 + lon_offset, 50.0 + lat_offset));

        let z = &markers[1];
        assert!(!z.is_clustered());
        assert_eq!(z.display_position, z.position);
    }

    #[test]
    fn test_geojson_properties() {
        let projects = sample();
        let meta = build_cluster_metadata(&projects);
        let markers = place_markers(&projects, &meta);
        let fc = markers_to_geojson(&markers);

        assert_eq!(fc.features.len(), 3);
        let first = &fc.features[0];
        let props = first.properties.as_ref().unwrap();
        assert_eq!(props.get("name"), Some(&Value::from("Alpha")));
        assert_eq!(props.get("clusterSize"), Some(&Value::from(2)));

        let lone = fc.features[2].properties.as_ref().unwrap();
        assert!(lone.get("clusterSize").is_none());
    }

    #[test]
    fn test_reveal_delays_stagger_and_cap() {
        let delays = reveal_delays(20, false);
        assert_eq!(delays[0], Duration::ZERO);
        assert_eq!(delays[1], Duration::from_millis(50));
        assert_eq!(delays[16], Duration::from_millis(800));
        assert_eq!(delays[19], Duration::from_millis(800));
    }

    #[test]
    fn test_reveal_delays_minimised() {
        assert!(reveal_delays(5, true).iter().all(|d| d.is_zero()));
    }
}
