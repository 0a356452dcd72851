//! Storage operations for study sets
//!
//! Directory structure:
//! ```text
//! study_sets/
//! └── {set-id}.json   # {title, description, cards}, one file per set
//! ```
//!
//! The id is the file stem. There is no locking: concurrent writers to the
//! same set race and the last write wins.

use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use chrono::Utc;
use regex::Regex;
use thiserror::Error;

use super::models::{NewStudySet, StudySet, StudySetRecord, StudySetUpdate};

#[derive(Error, Debug)]
pub enum StudySetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Study set not found: {0}")]
    NotFound(String),

    #[error("Invalid study set: {0}")]
    Invalid(String),

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, StudySetError>;

/// Storage manager for study set files
pub struct StudySetStorage {
    /// Directory holding one JSON file per set
    sets_path: PathBuf,
}

impl StudySetStorage {
    pub fn new(sets_path: PathBuf) -> Self {
        Self { sets_path }
    }

    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("studydeck"))
            .ok_or(StudySetError::DataDirNotFound)
    }

    pub fn sets_path(&self) -> &PathBuf {
        &self.sets_path
    }

    /// Create the sets directory if needed
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.sets_path)?;
        Ok(())
    }

    fn set_path(&self, id: &str) -> PathBuf {
        self.sets_path.join(format!("{}.json", id))
    }

    /// Resolve the file for an id received from outside. Ids that could
    /// escape the sets directory are reported as unknown.
    fn existing_set_path(&self, id: &str) -> Result<PathBuf> {
        if !is_valid_id(id) {
            return Err(StudySetError::NotFound(id.to_string()));
        }
        let path = self.set_path(id);
        if !path.exists() {
            return Err(StudySetError::NotFound(id.to_string()));
        }
        Ok(path)
    }

    fn read_record(&self, path: &PathBuf) -> Result<StudySetRecord> {
        let content = fs::read_to_string(path)?;
        let record: StudySetRecord = serde_json::from_str(&content)?;
        Ok(record)
    }

    fn write_record(&self, path: &PathBuf, record: &StudySetRecord) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(record)?)?;
        Ok(())
    }

    /// List all study sets, ordered by id
    pub fn list_sets(&self) -> Result<Vec<StudySet>> {
        if !self.sets_path.exists() {
            return Ok(Vec::new());
        }

        let mut sets = Vec::new();
        for entry in fs::read_dir(&self.sets_path)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                let Some(id) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string)
                else {
                    continue;
                };
                match self.read_record(&path) {
                    Ok(record) => sets.push(StudySet::from_record(id, record)),
                    Err(e) => log::warn!("Skipping unreadable study set {:?}: {}", path, e),
                }
            }
        }

        sets.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(sets)
    }

    /// Whether a set with this id is stored
    pub fn has_set(&self, id: &str) -> bool {
        self.existing_set_path(id).is_ok()
    }

    /// Get a specific study set
    pub fn get_set(&self, id: &str) -> Result<StudySet> {
        let path = self.existing_set_path(id)?;
        let record = self.read_record(&path)?;
        Ok(StudySet::from_record(id.to_string(), record))
    }

    /// Create a new study set and return it with its generated id
    pub fn create_set(&self, new: NewStudySet) -> Result<StudySet> {
        self.create_set_at(new, Utc::now().timestamp_millis())
    }

    pub(crate) fn create_set_at(&self, new: NewStudySet, timestamp_ms: i64) -> Result<StudySet> {
        let record = StudySetRecord::from(new)
            .normalized()
            .map_err(StudySetError::Invalid)?;
        self.init()?;

        // create_new makes claiming an id atomic across concurrent creates
        let mut stamp = timestamp_ms;
        let (id, file) = loop {
            let id = generate_id(&record.title, stamp);
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.set_path(&id))
            {
                Ok(file) => break (id, file),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => stamp += 1,
                Err(e) => return Err(e.into()),
            }
        };

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &record)?;
        writer.flush()?;
        log::info!("Created study set '{}' ({} cards)", id, record.cards.len());

        Ok(StudySet::from_record(id, record))
    }

    /// Merge an update into a stored set and save it
    pub fn update_set(&self, id: &str, update: StudySetUpdate) -> Result<StudySet> {
        let path = self.existing_set_path(id)?;
        let current = self.read_record(&path)?;

        let record = update
            .apply_to(current)
            .normalized()
            .map_err(StudySetError::Invalid)?;
        self.write_record(&path, &record)?;
        log::info!("Updated study set '{}'", id);

        Ok(StudySet::from_record(id.to_string(), record))
    }

    /// Delete a study set file
    pub fn delete_set(&self, id: &str) -> Result<()> {
        let path = self.existing_set_path(id)?;
        fs::remove_file(&path)?;
        log::info!("Deleted study set '{}'", id);
        Ok(())
    }
}

/// Longest title slug kept in an id, so file names stay within OS limits
pub const MAX_SLUG_LEN: usize = 64;

/// Build an id from a title and a creation time: lowercased title with
/// whitespace runs turned into `_`, cut to [`MAX_SLUG_LEN`], then `_{millis}`.
pub fn generate_id(title: &str, timestamp_ms: i64) -> String {
    let re = Regex::new(r"\s+").unwrap();
    let slug: String = re
        .replace_all(&title.trim().to_lowercase(), "_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .take(MAX_SLUG_LEN)
        .collect();
    let slug = if slug.is_empty() { "set".to_string() } else { slug };
    format!("{}_{}", slug, timestamp_ms)
}

/// An id is a plain file stem: ASCII alphanumerics, `_` and `-` only
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
