use crate::api::cluster::ClusterConfig;
use crate::util::error::AtlasError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Where the camera looks when the viewer opens or returns home.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraCenter {
    pub lat: f64,
    pub lon: f64,
    /// Meters above the ellipsoid.
    pub alt: f64,
}

impl Default for CameraCenter {
    fn default() -> Self {
        Self {
            lat: 31.5,
            lon: -110.5,
            alt: 500_000.0,
        }
    }
}

/// Home camera pose. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub center: CameraCenter,
    pub heading: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            center: CameraCenter::default(),
            heading: 0.0,
            pitch: -45.0,
            roll: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Easing {
    Linear,
    QuadraticInOut,
    CubicInOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimationConfig {
    /// Seconds for fly-to animations.
    pub duration: f64,
    pub easing_function: Easing,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration: 2.0,
            easing_function: Easing::QuadraticInOut,
        }
    }
}

/// Viewer settings, loadable from a JSON file. Missing keys take defaults.
///
/// # Example
/// ```
/// use project_atlas_rs::ViewerConfig;
///
/// let config = ViewerConfig::from_json_str(r#"{"animation": {"duration": 1.5}}"#).unwrap();
/// assert_eq!(config.animation.duration, 1.5);
/// assert_eq!(config.camera.center.lat, 31.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub camera: CameraConfig,
    pub animation: AnimationConfig,
    pub cluster: ClusterConfig,
}

impl ViewerConfig {
    pub fn from_json_str(text: &str) -> Result<Self, AtlasError> {
        let config: ViewerConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, AtlasError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        info!(path = %path.display(), "loaded viewer config");
        Ok(config)
    }

    /// Makes every camera transition instant.
    pub fn with_reduced_motion(mut self) -> Self {
        self.animation.duration = 0.0;
        self
    }

    pub fn validate(&self) -> Result<(), AtlasError> {
        if !(self.animation.duration.is_finite() && self.animation.duration >= 0.0) {
            return Err(AtlasError::InvalidConfig(format!(
                "animation.duration must be non-negative, got {}",
                self.animation.duration
            )));
        }
        if !(-90.0..=90.0).contains(&self.camera.center.lat) {
            return Err(AtlasError::InvalidConfig(format!(
                "camera.center.lat out of range: {}",
                self.camera.center.lat
            )));
        }
        self.cluster.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.camera.center.lon, -110.5);
        assert_eq!(config.camera.pitch, -45.0);
        assert_eq!(config.animation.easing_function, Easing::QuadraticInOut);
        assert_eq!(config.cluster, ClusterConfig::default());
    }

    #[test]
    fn test_partial_json() -> Result<(), AtlasError> {
        let config = ViewerConfig::from_json_str(
            r#"{"cluster": {"gridMeters": 1000}, "animation": {"easingFunction": "LINEAR"}}"#,
        )?;
        assert_eq!(config.cluster.grid_meters, 1000.0);
        assert_eq!(config.cluster.offsets_per_ring, 6);
        assert_eq!(config.animation.easing_function, Easing::Linear);
        assert_eq!(config.animation.duration, 2.0);
        Ok(())
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = ViewerConfig::from_json_str(r#"{"cluster": {"offsetsPerRing": 0}}"#);
        assert!(matches!(result, Err(AtlasError::InvalidConfig(_))));

        let result = ViewerConfig::from_json_str(r#"{"animation": {"duration": -1}}"#);
        assert!(matches!(result, Err(AtlasError::InvalidConfig(_))));
    }

    #[test]
    fn test_reduced_motion() {
        let config = ViewerConfig::default().with_reduced_motion();
        assert_eq!(config.animation.duration, 0.0);
    }

    #[test]
    fn test_from_file() -> Result<(), AtlasError> {
        let dir = tempdir()?;
        let path = dir.path().join("viewer.json");
        std::fs::write(&path, r#"{"camera": {"center": {"lat": 32.2, "lon": -110.9}}}"#)?;

        let config = ViewerConfig::from_json_file(&path)?;
        assert_eq!(config.camera.center.lat, 32.2);
        assert_eq!(config.camera.center.alt, 500_000.0);
        Ok(())
    }
}
