//! Study sets: user-created decks persisted as one JSON file each
//!
//! This module provides:
//! - Card and study set models with validation
//! - File-backed CRUD storage with title-derived ids

pub mod models;
pub mod storage;

pub use models::*;
pub use storage::{StudySetError, StudySetStorage};
