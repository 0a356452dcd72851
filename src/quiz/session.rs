//! Round state machine shared by the quiz modes
//!
//! ```text
//! NotStarted --start--> InProgress(index, score) --submit--> InProgress
//!                                   |                           |
//!                                   +--- last answer ---> RoundComplete
//!                                                               |
//!                        InProgress(0, 0) <--- fresh draw ------+
//! ```
//!
//! Practice is perpetual: completing a round immediately draws the next one.

use rand::Rng;

use super::{Gradable, QuestionSource, QuizError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    NotStarted,
    InProgress { index: usize, score: usize },
    RoundComplete { score: usize, total: usize },
}

/// How a finished round went
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEnd {
    /// Every question answered correctly
    Perfect { total: usize },
    Completed { score: usize, total: usize },
}

impl RoundEnd {
    fn from_score(score: usize, total: usize) -> Self {
        if score == total {
            RoundEnd::Perfect { total }
        } else {
            RoundEnd::Completed { score, total }
        }
    }
}

/// Result of answering one question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission {
    pub correct: bool,
    /// Set when this answer finished the round
    pub round_end: Option<RoundEnd>,
}

pub struct RoundSession<S: QuestionSource> {
    source: S,
    questions: Vec<S::Question>,
    state: RoundState,
    round: u32,
}

impl<S: QuestionSource> RoundSession<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            questions: Vec::new(),
            state: RoundState::NotStarted,
            round: 0,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    /// 1-based number of the current round, 0 before the first start
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn questions(&self) -> &[S::Question] {
        &self.questions
    }

    pub fn current(&self) -> Option<&S::Question> {
        match self.state {
            RoundState::InProgress { index, .. } => self.questions.get(index),
            _ => None,
        }
    }

    pub fn score(&self) -> usize {
        match self.state {
            RoundState::InProgress { score, .. } | RoundState::RoundComplete { score, .. } => score,
            RoundState::NotStarted => 0,
        }
    }

    /// Begin practice from scratch with a fresh draw. On error the session is
    /// left untouched.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), QuizError> {
        let questions = self.source.draw(rng)?;
        self.questions = questions;
        self.state = RoundState::InProgress { index: 0, score: 0 };
        self.round = 1;
        Ok(())
    }

    /// Grade an answer to the current question and advance.
    ///
    /// When the answer completes the round the next round is drawn straight
    /// away. If that draw fails the session stays in `RoundComplete` and
    /// `start` can be retried.
    pub fn submit<R: Rng + ?Sized>(
        &mut self,
        answer: &<S::Question as Gradable>::Answer,
        rng: &mut R,
    ) -> Result<Submission, QuizError> {
        let RoundState::InProgress { index, score } = self.state else {
            return Err(QuizError::NotInProgress);
        };
        let question = self.questions.get(index).ok_or(QuizError::NotInProgress)?;

        let correct = question.is_correct(answer);
        let score = if correct { score + 1 } else { score };
        let index = index + 1;

        if index < self.questions.len() {
            self.state = RoundState::InProgress { index, score };
            return Ok(Submission {
                correct,
                round_end: None,
            });
        }

        let total = self.questions.len();
        self.state = RoundState::RoundComplete { score, total };
        let end = RoundEnd::from_score(score, total);
        log::debug!("Round {} finished: {}/{}", self.round, score, total);

        match self.source.draw(rng) {
            Ok(questions) => {
                self.questions = questions;
                self.state = RoundState::InProgress { index: 0, score: 0 };
                self.round += 1;
            }
            Err(e) => log::warn!("Could not draw the next round: {}", e),
        }

        Ok(Submission {
            correct,
            round_end: Some(end),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::identify::{IdentifyOptions, IdentifySource};
    use crate::quiz::order::{Difficulty, OrderQuestion, OrderSource};
    use crate::study_sets::Card;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn identify_session(cards: usize) -> RoundSession<IdentifySource> {
        let deck = (0..cards)
            .map(|i| Card::new(format!("q{}", i), format!("a{}", i)))
            .collect();
        RoundSession::new(IdentifySource::new(deck, IdentifyOptions::default()))
    }

    fn answer_current(session: &RoundSession<IdentifySource>, right: bool) -> usize {
        let q = session.current().unwrap();
        if right {
            q.correct
        } else {
            (q.correct + 1) % q.choices.len()
        }
    }

    #[test]
    fn test_starts_not_started() {
        let session = identify_session(6);
        assert_eq!(session.state(), RoundState::NotStarted);
        assert!(session.current().is_none());
        assert_eq!(session.round(), 0);
    }

    #[test]
    fn test_start_resets_index_and_score() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = identify_session(6);
        session.start(&mut rng).unwrap();

        assert_eq!(session.state(), RoundState::InProgress { index: 0, score: 0 });
        assert_eq!(session.questions().len(), 5);
        assert_eq!(session.round(), 1);
    }

    #[test]
    fn test_start_with_small_deck_fails() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = identify_session(3);

        assert!(matches!(
            session.start(&mut rng),
            Err(QuizError::InsufficientCards { .. })
        ));
        assert_eq!(session.state(), RoundState::NotStarted);
    }

    #[test]
    fn test_submit_before_start_errors() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = identify_session(6);
        assert!(matches!(
            session.submit(&0, &mut rng),
            Err(QuizError::NotInProgress)
        ));
    }

    #[test]
    fn test_wrong_answer_advances_without_score() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut session = identify_session(6);
        session.start(&mut rng).unwrap();

        let answer = answer_current(&session, false);
        let sub = session.submit(&answer, &mut rng).unwrap();

        assert!(!sub.correct);
        assert_eq!(sub.round_end, None);
        assert_eq!(session.state(), RoundState::InProgress { index: 1, score: 0 });
    }

    #[test]
    fn test_perfect_round_restarts_with_fresh_draw() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = identify_session(10);
        session.start(&mut rng).unwrap();
        let first_round = session.questions().to_vec();

        let mut last = None;
        for i in 0..5 {
            let answer = answer_current(&session, true);
            let sub = session.submit(&answer, &mut rng).unwrap();
            assert!(sub.correct);
            if i < 4 {
                assert_eq!(session.score(), i + 1);
            }
            last = Some(sub);
        }

        assert_eq!(last.unwrap().round_end, Some(RoundEnd::Perfect { total: 5 }));
        assert_eq!(session.state(), RoundState::InProgress { index: 0, score: 0 });
        assert_eq!(session.round(), 2);
        assert_eq!(session.questions().len(), 5);
        assert_ne!(session.questions(), first_round.as_slice());
    }

    #[test]
    fn test_imperfect_round_reports_score() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut session = identify_session(8);
        session.start(&mut rng).unwrap();

        let mut end = None;
        for i in 0..5 {
            let answer = answer_current(&session, i % 2 == 0);
            end = session.submit(&answer, &mut rng).unwrap().round_end;
        }

        assert_eq!(end, Some(RoundEnd::Completed { score: 3, total: 5 }));
    }

    #[test]
    fn test_short_round_uses_deck_size() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut session = identify_session(4);
        session.start(&mut rng).unwrap();
        assert_eq!(session.questions().len(), 4);

        let mut end = None;
        for _ in 0..4 {
            let answer = answer_current(&session, true);
            end = session.submit(&answer, &mut rng).unwrap().round_end;
        }
        assert_eq!(end, Some(RoundEnd::Perfect { total: 4 }));
    }

    #[test]
    fn test_order_round() {
        let mut rng = StdRng::seed_from_u64(6);
        let question = OrderQuestion {
            scenario: "Letters".to_string(),
            steps: vec!["A".to_string(), "B".to_string(), "C".to_string()],
            correct: vec![1, 0, 2],
        };
        let mut session = RoundSession::new(OrderSource::new(Difficulty::Easy, vec![question]));
        session.start(&mut rng).unwrap();

        let answer: Vec<String> = vec!["B".into(), "A".into(), "C".into()];
        let sub = session.submit(answer.as_slice(), &mut rng).unwrap();

        assert!(sub.correct);
        assert_eq!(sub.round_end, Some(RoundEnd::Perfect { total: 1 }));
        assert_eq!(session.round(), 2);
    }
}
