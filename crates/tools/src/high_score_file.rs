//! High scores persisted as a JSON file.
//!
//! Writes go to a sibling `.tmp` file first and are renamed into place, so a
//! crash mid-save leaves the previous table intact.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tower_core::{HighScoreStore, HighScoreTable, ScoreEntry, ScoreStoreError};
use tracing::{debug, info};

pub struct JsonScoreStore {
    path: PathBuf,
    table: HighScoreTable,
}

impl JsonScoreStore {
    /// Platform data directory location, when the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "Tower").map(|dirs| dirs.data_dir().join("high_scores.json"))
    }

    /// Store bound to `path`. Nothing is read until `load`.
    pub fn new(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self { path: path.into(), table: HighScoreTable::new(capacity) }
    }

    /// `new` followed by `load`.
    pub fn open(path: impl Into<PathBuf>, capacity: usize) -> Result<Self, ScoreStoreError> {
        let mut store = Self::new(path, capacity);
        store.load()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for JsonScoreStore {
    /// A missing file is an empty table.
    fn load(&mut self) -> Result<(), ScoreStoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no high score file yet");
                self.table = HighScoreTable::new(self.table.capacity());
                return Ok(());
            }
            Err(error) => return Err(error.into()),
        };
        let entries: Vec<ScoreEntry> = serde_json::from_str(&content)?;
        self.table = HighScoreTable::from_entries(self.table.capacity(), entries);
        Ok(())
    }

    fn save(&self) -> Result<(), ScoreStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self.table.entries())?;
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        info!(path = %self.path.display(), entries = self.table.entries().len(), "high scores saved");
        Ok(())
    }

    fn is_high_score(&self, score: u32) -> bool {
        self.table.is_high_score(score)
    }

    fn add(&mut self, name: &str, score: u32) {
        self.table.add(name, score);
    }

    fn entries(&self) -> &[ScoreEntry] {
        self.table.entries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = tempdir().unwrap();
        let store = JsonScoreStore::open(dir.path().join("scores.json"), 10).unwrap();
        assert!(store.entries().is_empty());
    }

    #[test]
    fn atomic_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("scores.json");

        let mut store = JsonScoreStore::new(&path, 3);
        store.add("Doran", 40);
        store.add("Mira", 90);
        store.add("Kess", 40);
        store.save().unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());

        let reloaded = JsonScoreStore::open(&path, 3).unwrap();
        let names: Vec<&str> = reloaded.entries().iter().map(|entry| entry.name.as_str()).collect();
        assert_eq!(names, ["Mira", "Doran", "Kess"]);
    }

    #[test]
    fn reload_trims_to_a_smaller_capacity() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.json");
        let mut store = JsonScoreStore::new(&path, 5);
        for (name, score) in [("a", 5), ("b", 4), ("c", 3)] {
            store.add(name, score);
        }
        store.save().unwrap();

        let reloaded = JsonScoreStore::open(&path, 2).unwrap();
        assert_eq!(reloaded.entries().len(), 2);
        assert!(!reloaded.is_high_score(4));
        assert!(reloaded.is_high_score(6));
    }

    #[test]
    fn malformed_file_is_a_format_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(JsonScoreStore::open(&path, 10), Err(ScoreStoreError::Format(_))));
    }
}
