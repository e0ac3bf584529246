pub mod coord;
pub mod error;
pub mod preferences;

pub use coord::Located;
pub use error::AtlasError;
pub use preferences::{JsonFilePreferences, MemoryPreferences, PreferenceStore};
