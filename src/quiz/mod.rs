//! Quiz engine for study decks
//!
//! This module provides:
//! - Identify questions: multiple choice built from a deck's own backs
//! - Order questions: put a scenario's steps in the canonical order
//! - A round state machine shared by both quiz modes
//! - Flashcard browsing
//!
//! Nothing here writes to storage; all state is owned by the caller.

use std::time::Duration;

use rand::Rng;
use thiserror::Error;

pub mod flash;
pub mod identify;
pub mod order;
pub mod session;

pub use flash::FlashSession;
pub use identify::{generate_identify, IdentifyOptions, IdentifyQuestion, IdentifySource};
pub use order::{check_order, Difficulty, OrderFixture, OrderQuestion, OrderSource};
pub use session::{RoundEnd, RoundSession, RoundState, Submission};

/// Questions drawn per round
pub const ROUND_SIZE: usize = 5;

/// Pause after answering an identify question before the next one
pub const IDENTIFY_FEEDBACK_DELAY: Duration = Duration::from_millis(1200);

/// Pause after checking an order question before the next one
pub const ORDER_FEEDBACK_DELAY: Duration = Duration::from_millis(1500);

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("Not enough cards to build questions (need at least {needed}, have {available})")]
    InsufficientCards { needed: usize, available: usize },

    #[error("A round needs at least one question")]
    NoQuestionsRequested,

    #[error("No questions available for {0} difficulty")]
    NoQuestions(Difficulty),

    #[error("Deck is empty")]
    EmptyDeck,

    #[error("Invalid order question: {0}")]
    InvalidOrderQuestion(String),

    #[error("Unknown difficulty: {0}")]
    UnknownDifficulty(String),

    #[error("No round in progress")]
    NotInProgress,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A question that can judge an answer
pub trait Gradable {
    type Answer: ?Sized;

    fn is_correct(&self, answer: &Self::Answer) -> bool;
}

/// Something that can draw a fresh round of questions
pub trait QuestionSource {
    type Question: Gradable;

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<Self::Question>, QuizError>;
}
