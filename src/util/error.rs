/// Error type for project-atlas-rs operations.
///
/// Clustering and the other pure computations never fail; only loading
/// data, reading configuration and parsing user input can.
#[derive(Debug, PartialEq)]
pub enum AtlasError {
    /// File I/O error.
    IoError(String),
    /// CSV parsing or reading error.
    CsvError(String),
    /// JSON parsing or serialization error.
    JsonError(String),
    /// A quality tier name that is not one of low, medium or high.
    InvalidQualityTier(String),
    /// A configuration value is out of range.
    InvalidConfig(String),
}

impl std::fmt::Display for AtlasError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AtlasError::IoError(msg) => write!(f, "IO error: {}", msg),
            AtlasError::CsvError(msg) => write!(f, "CSV error: {}", msg),
            AtlasError::JsonError(msg) => write!(f, "JSON error: {}", msg),
            AtlasError::InvalidQualityTier(t) => write!(f, "Invalid quality tier: {}", t),
            AtlasError::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for AtlasError {}

impl From<std::io::Error> for AtlasError {
    fn from(e: std::io::Error) -> Self {
        AtlasError::IoError(e.to_string())
    }
}

impl From<serde_json::Error> for AtlasError {
    fn from(e: serde_json::Error) -> Self {
        AtlasError::JsonError(e.to_string())
    }
}

impl From<csv::Error> for AtlasError {
    fn from(e: csv::Error) -> Self {
        AtlasError::CsvError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            AtlasError::InvalidQualityTier("ultra".into()).to_string(),
            "Invalid quality tier: ultra"
        );
        assert_eq!(AtlasError::IoError("gone".into()).to_string(), "IO error: gone");
    }

    #[test]
    fn test_from_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let atlas: AtlasError = err.into();
        assert!(matches!(atlas, AtlasError::JsonError(_)));
    }
}
