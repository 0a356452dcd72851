//! Multiple-choice "identify" questions
//!
//! Each question shows a card's front and asks for its back among
//! distractors taken from other cards in the same deck.

use rand::seq::{index, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Gradable, QuestionSource, QuizError};
use crate::study_sets::Card;

pub const DEFAULT_QUESTION_COUNT: usize = 5;
pub const DEFAULT_CHOICE_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifyOptions {
    pub question_count: usize,
    pub choice_count: usize,
}

impl Default for IdentifyOptions {
    fn default() -> Self {
        Self {
            question_count: DEFAULT_QUESTION_COUNT,
            choice_count: DEFAULT_CHOICE_COUNT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifyQuestion {
    pub prompt: String,
    pub choices: Vec<String>,
    /// Index into `choices` of the right answer
    pub correct: usize,
}

impl IdentifyQuestion {
    pub fn correct_choice(&self) -> &str {
        &self.choices[self.correct]
    }
}

impl Gradable for IdentifyQuestion {
    type Answer = usize;

    fn is_correct(&self, choice: &usize) -> bool {
        *choice == self.correct
    }
}

/// Build up to `question_count` questions from distinct cards of `deck`.
///
/// Returns an empty list when the deck has fewer cards than `choice_count`;
/// callers treat that as "not enough data" rather than an error.
pub fn generate_identify<R: Rng + ?Sized>(
    deck: &[Card],
    options: IdentifyOptions,
    rng: &mut R,
) -> Vec<IdentifyQuestion> {
    let choice_count = options.choice_count;
    if choice_count == 0 || deck.len() < choice_count {
        return Vec::new();
    }

    let count = options.question_count.min(deck.len());
    let picked = index::sample(rng, deck.len(), count);

    picked
        .into_iter()
        .map(|target| {
            let card = &deck[target];
            let others: Vec<&Card> = deck
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != target)
                .map(|(_, c)| c)
                .collect();

            let mut choices: Vec<String> = others
                .choose_multiple(rng, choice_count - 1)
                .map(|c| c.back.clone())
                .collect();
            choices.shuffle(rng);

            // Insert at a uniform position so the index stays exact even if a
            // distractor shares the answer's text.
            let correct = rng.gen_range(0..=choices.len());
            choices.insert(correct, card.back.clone());

            IdentifyQuestion {
                prompt: card.front.clone(),
                choices,
                correct,
            }
        })
        .collect()
}

/// Draws identify rounds from a fixed deck
#[derive(Debug, Clone)]
pub struct IdentifySource {
    deck: Vec<Card>,
    options: IdentifyOptions,
}

impl IdentifySource {
    pub fn new(deck: Vec<Card>, options: IdentifyOptions) -> Self {
        Self { deck, options }
    }
}

impl QuestionSource for IdentifySource {
    type Question = IdentifyQuestion;

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<IdentifyQuestion>, QuizError> {
        if self.options.question_count == 0 {
            return Err(QuizError::NoQuestionsRequested);
        }
        let questions = generate_identify(&self.deck, self.options, rng);
        if questions.is_empty() {
            return Err(QuizError::InsufficientCards {
                needed: self.options.choice_count.max(1),
                available: self.deck.len(),
            });
        }
        Ok(questions)
    }
}
