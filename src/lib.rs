//! Study decks: file-backed study sets served over HTTP, and the quiz engine
//! that turns a deck into identify and order-the-steps rounds.

pub mod client;
pub mod config;
pub mod deck;
pub mod quiz;
pub mod server;
pub mod study_sets;

pub use client::{ClientError, StudySetClient};
pub use config::ServerConfig;
pub use deck::{resolve_deck, sample_deck, ActiveDeck, ActiveSetStore, DeckOrigin, StudySetSource};
pub use study_sets::{Card, NewStudySet, StudySet, StudySetError, StudySetStorage, StudySetUpdate};
