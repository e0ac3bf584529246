use geo_types::Point;

/// Anything that can be placed on the globe as a marker.
///
/// Coordinates are optional because upstream project data is frequently
/// incomplete; records without usable coordinates are skipped rather
/// than rejected.
pub trait Located {
    /// Stable identifier used to key marker metadata.
    fn marker_id(&self) -> Option<&str>;
    /// Latitude in degrees.
    fn latitude(&self) -> Option<f64>;
    /// Longitude in degrees.
    fn longitude(&self) -> Option<f64>;

    /// Returns `(lat, lon)` when both are present and finite.
    fn lat_lon(&self) -> Option<(f64, f64)> {
        match (self.latitude(), self.longitude()) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }

    /// The true position as a geo point (x = longitude, y = latitude).
    fn position(&self) -> Option<Point<f64>> {
        self.lat_lon().map(|(lat, lon)| Point::new(lon, lat))
    }
}

impl<T: Located + ?Sized> Located for &T {
    fn marker_id(&self) -> Option<&str> { (**self).marker_id() }
    fn latitude(&self) -> Option<f64> { (**self).latitude() }
    fn longitude(&self) -> Option<f64> { (**self).longitude() }
}

impl<S: AsRef<str>> Located for (S, f64, f64) {
    fn marker_id(&self) -> Option<&str> { Some(self.0.as_ref()) }
    fn latitude(&self) -> Option<f64> { Some(self.1) }
    fn longitude(&self) -> Option<f64> { Some(self.2) }
}

impl<S: AsRef<str>> Located for (S, Option<f64>, Option<f64>) {
    fn marker_id(&self) -> Option<&str> { Some(self.0.as_ref()) }
    fn latitude(&self) -> Option<f64> { self.1 }
    fn longitude(&self) -> Option<f64> { self.2 }
}
