use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use studydeck_lib::{
    resolve_deck, ActiveDeck, ActiveSetStore, StudySet, StudySetClient, StudySetStorage,
};

/// Shared application state for CLI commands
pub struct App {
    pub client: StudySetClient,
    pub active: ActiveSetStore,
    pub data_dir: PathBuf,
}

impl App {
    /// Connect to the server and open the local client state
    pub fn new(server: &str, data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => StudySetStorage::default_data_dir().context("Failed to get data directory")?,
        };

        let client = StudySetClient::new(server).context("Failed to build HTTP client")?;
        log::debug!("Using server {} and data dir {:?}", client.base_url(), data_dir);

        Ok(Self {
            client,
            active: ActiveSetStore::new(data_dir.clone()),
            data_dir,
        })
    }

    /// Active set id, treating an unreadable pointer as unset
    pub fn active_id(&self) -> Option<String> {
        match self.active.get() {
            Ok(id) => id,
            Err(e) => {
                log::warn!("Ignoring unreadable active set pointer: {}", e);
                None
            }
        }
    }

    /// Cards for the quiz modes; never fails
    pub fn active_deck(&self) -> ActiveDeck {
        resolve_deck(&self.client, self.active_id().as_deref())
    }

    pub fn list_sets(&self) -> Result<Vec<StudySet>> {
        self.client
            .list_sets()
            .with_context(|| format!("Failed to list study sets from {}", self.client.base_url()))
    }

    /// Find a set by id, then by title (case-insensitive prefix match)
    pub fn find_set(&self, query: &str) -> Result<StudySet> {
        let sets = self.list_sets()?;
        match_set(sets, query)
    }
}

fn match_set(sets: Vec<StudySet>, query: &str) -> Result<StudySet> {
    if let Some(set) = sets.iter().find(|s| s.id == query) {
        return Ok(set.clone());
    }

    let query_lower = query.to_lowercase();

    // Exact title match first
    if let Some(set) = sets.iter().find(|s| s.title.to_lowercase() == query_lower) {
        return Ok(set.clone());
    }

    // Prefix match
    let matches: Vec<&StudySet> = sets
        .iter()
        .filter(|s| s.title.to_lowercase().starts_with(&query_lower))
        .collect();

    match matches.len() {
        0 => bail!(
            "No study set matching '{}'. Available sets:\n{}",
            query,
            sets.iter()
                .map(|s| format!("  - {} ({})", s.title, s.id))
                .collect::<Vec<_>>()
                .join("\n")
        ),
        1 => Ok(matches[0].clone()),
        _ => bail!(
            "Ambiguous study set '{}'. Matches:\n{}",
            query,
            matches
                .iter()
                .map(|s| format!("  - {} ({})", s.title, s.id))
                .collect::<Vec<_>>()
                .join("\n")
        ),
    }
}
