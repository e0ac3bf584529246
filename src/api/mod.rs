pub mod camera;
pub mod cluster;
pub mod config;
pub mod filter;
pub mod markers;
pub mod project;
pub mod project_io;
pub mod quality;
pub mod route;
pub mod sheet;
pub mod theme;

pub use camera::{
    FlightPlan, MotionFlags, boosted_screen_space_error, fly_home, fly_to_project, initial_camera,
};
pub use cluster::{
    ClusterConfig, ClusterMetadata, ClusterOffset, ClusterPlacer, ClusterSummary,
    build_cluster_metadata, build_cluster_metadata_with,
};
pub use config::{AnimationConfig, CameraCenter, CameraConfig, Easing, ViewerConfig};
pub use filter::{
    FilterState, ProjectTags, ProjectTagsMap, build_project_tags_map, extract_categories,
    extract_products, extract_themes, extract_unique_values, extract_years, filter_projects,
};
pub use markers::{Marker, markers_to_geojson, place_markers, reveal_delays};
pub use project::Project;
pub use project_io::{load_projects, load_projects_csv, load_projects_json, parse_projects_json};
pub use quality::{
    DeviceSignals, EffectiveConnection, GpuTier, QualityPreset, QualityProfile, QualityTier,
    set_quality_override,
};
pub use route::{Route, share_text, share_title, share_url};
pub use sheet::{SheetController, SheetPhase, SheetTransition};
pub use theme::{
    ThemeDefinition, ThemeVariables, effective_map_style, normalize_theme_id,
    resolve_theme_color, theme_definition,
};
