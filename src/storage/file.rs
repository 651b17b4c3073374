use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::Storage;

/// All entries live in one JSON object on disk. Every operation re-reads the
/// file, so several handles on the same path stay consistent.
///
/// Writes go to a sibling temp file that is renamed over the store. A file
/// that does not parse is moved aside to `<name>.corrupt` and the store
/// starts over empty.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read store file: {}", self.path.display()))?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                let backup = self.sibling("corrupt");
                tracing::warn!(
                    error = %e,
                    path = %self.path.display(),
                    backup = %backup.display(),
                    "store file is not valid JSON, moving it aside"
                );
                fs::rename(&self.path, &backup).with_context(|| {
                    format!("Failed to move corrupt store file: {}", self.path.display())
                })?;
                Ok(BTreeMap::new())
            }
        }
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".");
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create store directory")?;
        }
        let json = serde_json::to_string_pretty(entries).context("Failed to serialize store")?;
        let temp_path = self.sibling("tmp");
        fs::write(&temp_path, json)
            .with_context(|| format!("Failed to write store file: {}", temp_path.display()))?;
        fs::rename(&temp_path, &self.path)
            .with_context(|| format!("Failed to replace store file: {}", self.path.display()))?;
        Ok(())
    }
}

impl Storage for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn list(&self) -> Result<Vec<String>> {
        Ok(self.load()?.into_keys().collect())
    }

    fn remove(&mut self, key: &str) -> Result<Option<String>> {
        let mut entries = self.load()?;
        let removed = entries.remove(key);
        if removed.is_some() {
            self.persist(&entries)?;
        }
        Ok(removed)
    }
}
