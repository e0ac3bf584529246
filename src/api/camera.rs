//! Camera flights, described as plain data for the renderer to execute.

use crate::api::config::ViewerConfig;
use crate::api::project::Project;
use crate::util::coord::Located;
use geo_types::Point;
use tracing::debug;

/// Altitude used when focusing a single project, in meters.
pub const PROJECT_VIEW_ALTITUDE: f64 = 50_000.0;

/// Length of the flight back to the configured home view, in seconds.
pub const HOME_FLIGHT_SECONDS: f64 = 5.0;

/// Straight-down view.
pub const TOP_DOWN_PITCH_DEGREES: f64 = -90.0;

/// Camera pose before any flight: whole globe, Sonora centered.
pub const INITIAL_LONGITUDE: f64 = -110.0;
pub const INITIAL_LATITUDE: f64 = 29.0;
pub const INITIAL_ALTITUDE: f64 = 30_000_000.0;

/// Screen-space error floor applied during flights on low power devices.
const LOW_POWER_SCREEN_SPACE_ERROR: f64 = 12.0;

/// A camera flight. Angles are in radians; `destination` is lon/lat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightPlan {
    pub destination: Point<f64>,
    /// Meters above the ellipsoid.
    pub altitude: f64,
    pub heading: f64,
    pub pitch: f64,
    pub roll: f64,
    /// Seconds. Zero means jump.
    pub duration: f64,
}

impl FlightPlan {
    pub fn is_instant(&self) -> bool {
        self.duration <= 0.0
    }
}

/// Device conditions that shorten flights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionFlags {
    pub prefers_reduced_motion: bool,
    pub low_power: bool,
}

/// Camera position before the intro flight.
pub fn initial_camera() -> (Point<f64>, f64) {
    (Point::new(INITIAL_LONGITUDE, INITIAL_LATITUDE), INITIAL_ALTITUDE)
}

/// Top-down flight to a project's true location.
///
/// Returns `None` when the project has no usable coordinates.
pub fn fly_to_project(project: &Project, config: &ViewerConfig) -> Option<FlightPlan> {
    let destination = project.position()?;
    Some(FlightPlan {
        destination,
        altitude: PROJECT_VIEW_ALTITUDE,
        heading: 0.0,
        pitch: TOP_DOWN_PITCH_DEGREES.to_radians(),
        roll: 0.0,
        duration: config.animation.duration,
    })
}

/// Flight back to the configured home view.
pub fn fly_home(config: &ViewerConfig, flags: MotionFlags, instant: bool) -> FlightPlan {
    let center = config.camera.center;
    let duration = if instant || flags.prefers_reduced_motion || flags.low_power {
        0.0
    } else {
        HOME_FLIGHT_SECONDS
    };
    debug!(duration, "planning home flight");

    FlightPlan {
        destination: Point::new(center.lon, center.lat),
        altitude: center.alt,
        heading: config.camera.heading.to_radians(),
        pitch: TOP_DOWN_PITCH_DEGREES.to_radians(),
        roll: config.camera.roll.to_radians(),
        duration,
    }
}

/// Coarser terrain detail to use while a flight is in progress.
/// The original value is restored once the flight completes.
pub fn boosted_screen_space_error(original: f64, low_power: bool) -> f64 {
    if low_power {
        original.max(LOW_POWER_SCREEN_SPACE_ERROR)
    } else {
        (original * 1.5).max(original + 2.0)
    }
}
