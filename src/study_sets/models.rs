//! Data models for study sets

use serde::{Deserialize, Deserializer, Serialize};

/// Read a missing or `null` string as empty
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A term and its definition (or formula)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub front: String,
    pub back: String,
}

impl Card {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }

    /// Both sides have text after trimming
    pub fn is_complete(&self) -> bool {
        !self.front.trim().is_empty() && !self.back.trim().is_empty()
    }

    fn trimmed(&self) -> Self {
        Self::new(self.front.trim(), self.back.trim())
    }
}

/// A user-created collection of cards, persisted as one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySet {
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    pub cards: Vec<Card>,
}

impl StudySet {
    pub fn from_record(id: String, record: StudySetRecord) -> Self {
        Self {
            id,
            title: record.title,
            description: record.description,
            cards: record.cards,
        }
    }
}

/// On-disk body of a study set file. The id lives in the file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySetRecord {
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    pub cards: Vec<Card>,
}

impl StudySetRecord {
    /// Trim text fields, drop blank card rows and check the set is usable
    pub fn normalized(self) -> Result<Self, String> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err("Missing title".to_string());
        }

        let cards: Vec<Card> = self
            .cards
            .iter()
            .filter(|c| c.is_complete())
            .map(Card::trimmed)
            .collect();
        if cards.is_empty() {
            return Err("At least one card with a front and back is required".to_string());
        }

        Ok(Self {
            title,
            description: self.description.trim().to_string(),
            cards,
        })
    }
}

/// Request body for creating a study set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStudySet {
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    pub cards: Vec<Card>,
}

impl From<NewStudySet> for StudySetRecord {
    fn from(new: NewStudySet) -> Self {
        Self {
            title: new.title,
            description: new.description,
            cards: new.cards,
        }
    }
}

/// Partial update; fields that are present replace the stored ones
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudySetUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards: Option<Vec<Card>>,
}

impl StudySetUpdate {
    pub fn apply_to(self, mut record: StudySetRecord) -> StudySetRecord {
        if let Some(title) = self.title {
            record.title = title;
        }
        if let Some(description) = self.description {
            record.description = description;
        }
        if let Some(cards) = self.cards {
            record.cards = cards;
        }
        record
    }
}
