use crate::util::error::AtlasError;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Key/value storage for user preferences that outlive a session.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), AtlasError>;
    fn remove(&mut self, key: &str) -> Result<(), AtlasError>;
}

/// Preferences held in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: BTreeMap<String, String>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), AtlasError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), AtlasError> {
        self.values.remove(key);
        Ok(())
    }
}

/// Preferences persisted as a flat JSON object on disk.
///
/// The file is rewritten on every change. A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct JsonFilePreferences {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFilePreferences {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AtlasError> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let text = fs::read_to_string(&path)?;
            if text.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&text)?
            }
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), AtlasError> {
        let text = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

impl PreferenceStore for JsonFilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), AtlasError> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), AtlasError> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_roundtrip() -> Result<(), AtlasError> {
        let mut store = MemoryPreferences::new();
        assert_eq!(store.get("k"), None);
        store.set("k", "v")?;
        assert_eq!(store.get("k").as_deref(), Some("v"));
        store.remove("k")?;
        assert_eq!(store.get("k"), None);
        Ok(())
    }

    #[test]
    fn test_json_file_persists_between_opens() -> Result<(), AtlasError> {
        let dir = tempdir()?;
        let path = dir.path().join("prefs.json");

        let mut store = JsonFilePreferences::open(&path)?;
        assert_eq!(store.get("mapapp-quality-override"), None);
        store.set("mapapp-quality-override", "low")?;

        let reopened = JsonFilePreferences::open(&path)?;
        assert_eq!(reopened.get("mapapp-quality-override").as_deref(), Some("low"));
        Ok(())
    }

    #[test]
    fn test_json_file_rejects_garbage() -> Result<(), AtlasError> {
        let dir = tempdir()?;
        let path = dir.path().join("prefs.json");
        fs::write(&path, "not json")?;

        let result = JsonFilePreferences::open(&path);
        assert!(matches!(result, Err(AtlasError::JsonError(_))));
        Ok(())
    }
}
