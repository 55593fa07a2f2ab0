use crate::domain::{DomainError, DomainResult, SettingsStore};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub struct FileRepository;

impl FileRepository {
    /// Size of a document the applicant wants to attach.
    pub fn document_size(path: &Path) -> DomainResult<u64> {
        match fs::metadata(path) {
            Ok(metadata) if metadata.is_file() => Ok(metadata.len()),
            _ => Err(DomainError::DocumentNotFound(path.display().to_string())),
        }
    }

    pub fn save_settings(values: &BTreeMap<String, String>, path: &Path) -> Result<String, String> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        match serde_json::to_string_pretty(values) {
            Ok(json) => match fs::write(path, &json) {
                Ok(_) => Ok(path.display().to_string()),
                Err(e) => Err(e.to_string()),
            },
            Err(e) => Err(format!("Serialization failed: {}", e)),
        }
    }

    pub fn load_settings(path: &Path) -> Result<BTreeMap<String, String>, String> {
        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                Ok(values) => Ok(values),
                Err(e) => Err(format!("Invalid file format - {}", e)),
            },
            Err(e) => Err(e.to_string()),
        }
    }
}

/// Preferences kept in a JSON object of string values, rewritten on every
/// change.
#[derive(Debug)]
pub struct FileSettingsStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileSettingsStore {
    /// Opens the store. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = if path.exists() {
            FileRepository::load_settings(&path).unwrap_or_else(|error| {
                warn!(path = %path.display(), error = %error, "ignoring unreadable settings file");
                BTreeMap::new()
            })
        } else {
            BTreeMap::new()
        };
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileSettingsStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> DomainResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        FileRepository::save_settings(&self.values, &self.path)
            .map(|_| ())
            .map_err(DomainError::SettingsStorage)
    }
}

/// Non-persistent store, used when no settings file is wanted.
#[derive(Debug, Default, Clone)]
pub struct MemorySettingsStore {
    values: HashMap<String, String>,
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> DomainResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccessibilitySettings, ColorBlindMode, KEY_COLOR_BLIND_MODE};
    use tempfile::TempDir;

    #[test]
    fn test_document_size() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("diploma.pdf");
        fs::write(&path, vec![0u8; 1536]).unwrap();

        assert_eq!(FileRepository::document_size(&path), Ok(1536));
    }

    #[test]
    fn test_document_size_missing_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.pdf");
        assert!(matches!(
            FileRepository::document_size(&missing),
            Err(DomainError::DocumentNotFound(_))
        ));
        assert!(matches!(
            FileRepository::document_size(dir.path()),
            Err(DomainError::DocumentNotFound(_))
        ));
    }

    #[test]
    fn test_settings_persist_across_stores() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("accessibility.json");

        let mut store = FileSettingsStore::open(&path);
        let mut settings = AccessibilitySettings::default();
        settings.toggle_high_contrast();
        settings.set_color_blind_mode(ColorBlindMode::Protanopia);
        settings.save(&mut store).unwrap();

        let reopened = FileSettingsStore::open(&path);
        assert_eq!(reopened.get(KEY_COLOR_BLIND_MODE).as_deref(), Some("protanopia"));
        assert_eq!(AccessibilitySettings::load(&reopened), settings);
    }

    #[test]
    fn test_corrupt_settings_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("accessibility.json");
        fs::write(&path, "{not json").unwrap();

        let store = FileSettingsStore::open(&path);
        assert_eq!(AccessibilitySettings::load(&store), AccessibilitySettings::default());
        assert!(FileRepository::load_settings(&path).unwrap_err().starts_with("Invalid file format"));
    }

    #[test]
    fn test_settings_write_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();

        let mut store = FileSettingsStore::open(blocker.join("accessibility.json"));
        let result = store.set("darkTheme", "true");
        assert!(matches!(result, Err(DomainError::SettingsStorage(_))));
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemorySettingsStore::default();
        assert_eq!(store.get("fontSize"), None);
        store.set("fontSize", "20").unwrap();
        assert_eq!(store.get("fontSize").as_deref(), Some("20"));
    }
}
