//! Flashcard browsing: step through a deck, flip cards, reshuffle

use rand::seq::SliceRandom;
use rand::Rng;

use super::QuizError;
use crate::study_sets::Card;

#[derive(Debug, Clone)]
pub struct FlashSession {
    cards: Vec<Card>,
    index: usize,
    flipped: bool,
}

impl FlashSession {
    pub fn new(cards: Vec<Card>) -> Result<Self, QuizError> {
        if cards.is_empty() {
            return Err(QuizError::EmptyDeck);
        }
        Ok(Self {
            cards,
            index: 0,
            flipped: false,
        })
    }

    pub fn current(&self) -> &Card {
        &self.cards[self.index]
    }

    /// Text on the visible side of the current card
    pub fn visible_text(&self) -> &str {
        let card = self.current();
        if self.flipped {
            &card.back
        } else {
            &card.front
        }
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }

    /// Move to the next card, wrapping to the first
    pub fn next(&mut self) {
        self.index = (self.index + 1) % self.cards.len();
    }

    /// Move to the previous card, wrapping to the last
    pub fn prev(&mut self) {
        self.index = (self.index + self.cards.len() - 1) % self.cards.len();
    }

    /// Shuffle the deck and go back to its first card
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
        self.index = 0;
    }

    /// (1-based position, deck size)
    pub fn position(&self) -> (usize, usize) {
        (self.index + 1, self.cards.len())
    }
}
