//! Deck selection: the built-in sample deck, the active-set pointer, and
//! resolving which cards a quiz should use.

mod active_set;

pub use active_set::ActiveSetStore;

use std::fmt::Display;

use crate::study_sets::{Card, StudySet, StudySetError, StudySetStorage};

/// Cards used when no study set is active
const SAMPLE_DECK: &[(&str, &str)] = &[
    ("Quadratic formula", "x = (-b +/- sqrt(b^2 - 4ac)) / 2a"),
    ("Pythagorean theorem", "a^2 + b^2 = c^2"),
    ("Area of a circle", "A = pi r^2"),
    ("Slope of a line", "m = (y2 - y1) / (x2 - x1)"),
    ("Newton's second law", "F = m a"),
    ("Kinetic energy", "KE = 1/2 m v^2"),
    ("Ohm's law", "V = I R"),
    ("Average speed", "v = d / t"),
    ("Density", "rho = m / V"),
    ("Power rule", "d/dx x^n = n x^(n-1)"),
];

pub fn sample_deck() -> Vec<Card> {
    SAMPLE_DECK
        .iter()
        .map(|(front, back)| Card::new(*front, *back))
        .collect()
}

/// Anything that can list the stored study sets
pub trait StudySetSource {
    type Error: Display;

    fn list_study_sets(&self) -> Result<Vec<StudySet>, Self::Error>;
}

impl StudySetSource for StudySetStorage {
    type Error = StudySetError;

    fn list_study_sets(&self) -> Result<Vec<StudySet>, StudySetError> {
        self.list_sets()
    }
}

/// Where a resolved deck came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckOrigin {
    Sample,
    StudySet { id: String, title: String },
}

#[derive(Debug, Clone)]
pub struct ActiveDeck {
    pub origin: DeckOrigin,
    pub cards: Vec<Card>,
}

impl ActiveDeck {
    fn sample() -> Self {
        Self {
            origin: DeckOrigin::Sample,
            cards: sample_deck(),
        }
    }

    pub fn label(&self) -> String {
        match &self.origin {
            DeckOrigin::Sample => "Sample deck".to_string(),
            DeckOrigin::StudySet { title, .. } => title.clone(),
        }
    }
}

/// Pick the cards to quiz on. Any problem with the active set falls back to
/// the sample deck; this never fails.
pub fn resolve_deck<S: StudySetSource>(source: &S, active_id: Option<&str>) -> ActiveDeck {
    let Some(id) = active_id else {
        return ActiveDeck::sample();
    };

    let sets = match source.list_study_sets() {
        Ok(sets) => sets,
        Err(e) => {
            log::warn!("Active set override failed; using sample deck: {}", e);
            return ActiveDeck::sample();
        }
    };

    match sets.into_iter().find(|s| s.id == id) {
        Some(set) if !set.cards.is_empty() => ActiveDeck {
            origin: DeckOrigin::StudySet {
                id: set.id,
                title: set.title,
            },
            cards: set.cards,
        },
        Some(_) => {
            log::info!("Active set {} has no cards; using sample deck", id);
            ActiveDeck::sample()
        }
        None => {
            log::info!("Active set {} not found; using sample deck", id);
            ActiveDeck::sample()
        }
    }
}
