//! Persisted pointer to the study set that replaces the sample deck
//!
//! Stored as a JSON string in `active_set.json`; a missing file means no
//! active set.

use std::fs;
use std::path::PathBuf;

use crate::study_sets::storage::{is_valid_id, Result, StudySetError};

pub struct ActiveSetStore {
    /// Base path for client state (e.g., ~/.local/share/studydeck)
    base_path: PathBuf,
}

impl ActiveSetStore {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn active_set_file(&self) -> PathBuf {
        self.base_path.join("active_set.json")
    }

    /// Get the active set id, if any
    pub fn get(&self) -> Result<Option<String>> {
        let file = self.active_set_file();
        if !file.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&file)?;
        let id: String = serde_json::from_str(&content)?;
        Ok(Some(id))
    }

    /// Set the active set id
    pub fn set(&self, id: &str) -> Result<()> {
        if !is_valid_id(id) {
            return Err(StudySetError::Invalid(format!("'{}' is not a study set id", id)));
        }

        fs::create_dir_all(&self.base_path)?;
        fs::write(self.active_set_file(), serde_json::to_string(id)?)?;

        log::info!("Set active study set to {}", id);
        Ok(())
    }

    /// Forget the active set so the sample deck is used again
    pub fn clear(&self) -> Result<()> {
        let file = self.active_set_file();
        if file.exists() {
            fs::remove_file(&file)?;
            log::info!("Cleared active study set");
        }
        Ok(())
    }
}
