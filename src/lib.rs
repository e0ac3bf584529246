//! # project-atlas-rs
//!
//! Data and layout logic behind a map-based browser of research projects.
//!
//! ### 1. `build_cluster_metadata` - Spreading Co-located Markers
//!
//! Projects closer than a grid cell are fanned out on rings around their
//! shared location so every marker stays clickable:
//!
//! ```
//! use project_atlas_rs::{Project, build_cluster_metadata};
//!
//! let projects = vec![
//!     Project::new("a", 31.34, -110.94),
//!     Project::new("b", 31.34, -110.94),
//!     Project::new("c", 33.45, -112.07),
//! ];
//!
//! let meta = build_cluster_metadata(&projects);
//! assert_eq!(meta.get("a").map(|o| o.cluster_size), Some(2));
//! assert!(meta.get("c").is_none());
//! ```
//!
//! ### 2. `ClusterPlacer` - Custom Grid and Rings
//!
//! ```
//! use project_atlas_rs::{ClusterConfig, ClusterPlacer};
//!
//! let placer = ClusterPlacer::new(ClusterConfig::new().grid_meters(800.0).offsets_per_ring(4));
//! let points = vec![("x", 32.0, -110.0), ("y", 32.0, -110.0)];
//! let meta = placer.place(&points);
//! assert_eq!(meta.len(), 2);
//! ```
//!
//! ### 3. Loading, Filtering and Markers
//!
//! ```no_run
//! use project_atlas_rs::{
//!     FilterState, build_cluster_metadata, build_project_tags_map, filter_projects,
//!     load_projects, markers_to_geojson, place_markers,
//! };
//!
//! let projects = load_projects("projects.json").unwrap();
//! let meta = build_cluster_metadata(&projects);
//! let markers = place_markers(&projects, &meta);
//! let geojson = markers_to_geojson(&markers);
//!
//! let tags = build_project_tags_map(&projects);
//! let state = FilterState::new().search("water");
//! let visible = filter_projects(&projects, &state, &tags);
//! ```
//!

pub mod api;
pub mod core;
pub mod util;

pub use api::{
    AnimationConfig, CameraCenter, CameraConfig, ClusterConfig, ClusterMetadata, ClusterOffset,
    ClusterPlacer, ClusterSummary, DeviceSignals, Easing, EffectiveConnection, FilterState,
    FlightPlan, GpuTier, Marker, MotionFlags, Project, ProjectTags, ProjectTagsMap,
    QualityPreset, QualityProfile, QualityTier, Route, SheetController, SheetPhase,
    SheetTransition, ThemeDefinition, ThemeVariables, ViewerConfig, boosted_screen_space_error,
    build_cluster_metadata, build_cluster_metadata_with, build_project_tags_map,
    effective_map_style, extract_categories, extract_products, extract_themes,
    extract_unique_values, extract_years, filter_projects, fly_home, fly_to_project,
    initial_camera, load_projects, load_projects_csv, load_projects_json, markers_to_geojson,
    normalize_theme_id, parse_projects_json, place_markers, resolve_theme_color, reveal_delays,
    set_quality_override, share_text, share_title, share_url, theme_definition,
};
pub use core::{
    CLUSTER_GRID_METERS, CellKey, DEGREES_PER_METER, METERS_PER_DEGREE, MIN_OFFSET_METERS,
    OFFSET_STEP_METERS, OFFSETS_PER_RING, cell_degrees, cell_key,
};
pub use util::{
    AtlasError, JsonFilePreferences, Located, MemoryPreferences, PreferenceStore,
};

pub use geo_types;
pub use geojson;
