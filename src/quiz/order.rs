//! "Order the steps" questions
//!
//! Questions come from a static fixture keyed by difficulty. `correct[i]` is
//! the index into `steps` of the step that belongs at position `i`.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Gradable, QuestionSource, QuizError, ROUND_SIZE};

const EMBEDDED_FIXTURE: &str = include_str!("../../data/order_questions.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Easy
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(QuizError::UnknownDifficulty(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderQuestion {
    pub scenario: String,
    pub steps: Vec<String>,
    pub correct: Vec<usize>,
}

impl OrderQuestion {
    /// Check that `correct` is a permutation of the step indices
    pub fn validate(&self) -> Result<(), QuizError> {
        if self.steps.is_empty() {
            return Err(QuizError::InvalidOrderQuestion(format!(
                "'{}' has no steps",
                self.scenario
            )));
        }
        if self.correct.len() != self.steps.len() {
            return Err(QuizError::InvalidOrderQuestion(format!(
                "'{}' has {} steps but {} order entries",
                self.scenario,
                self.steps.len(),
                self.correct.len()
            )));
        }

        let mut seen = vec![false; self.steps.len()];
        for &idx in &self.correct {
            match seen.get_mut(idx) {
                Some(slot) if !*slot => *slot = true,
                _ => {
                    return Err(QuizError::InvalidOrderQuestion(format!(
                        "'{}' order is not a permutation of its steps",
                        self.scenario
                    )))
                }
            }
        }
        Ok(())
    }

    /// Steps in the order the answer expects
    pub fn expected_order(&self) -> Vec<&str> {
        self.correct
            .iter()
            .filter_map(|&i| self.steps.get(i).map(String::as_str))
            .collect()
    }

    /// Steps in a fresh random order for presenting to the player
    pub fn display_steps<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String> {
        let mut steps = self.steps.clone();
        steps.shuffle(rng);
        steps
    }
}

impl Gradable for OrderQuestion {
    type Answer = [String];

    fn is_correct(&self, submitted: &[String]) -> bool {
        check_order(self, submitted)
    }
}

/// All-or-nothing comparison of a submitted ordering against the canonical
/// one. Stops at the first mismatch.
pub fn check_order<S: AsRef<str>>(question: &OrderQuestion, submitted: &[S]) -> bool {
    if submitted.len() != question.steps.len() || question.correct.len() != submitted.len() {
        return false;
    }

    submitted
        .iter()
        .zip(&question.correct)
        .all(|(step, &idx)| {
            question
                .steps
                .get(idx)
                .map_or(false, |expected| expected == step.as_ref())
        })
}

/// Order questions grouped by difficulty
#[derive(Debug, Clone, Default)]
pub struct OrderFixture {
    questions: BTreeMap<Difficulty, Vec<OrderQuestion>>,
}

impl OrderFixture {
    /// Parse and validate a fixture: `{"easy": [...], "medium": [...], ...}`
    pub fn from_json(content: &str) -> Result<Self, QuizError> {
        let raw: BTreeMap<String, Vec<OrderQuestion>> = serde_json::from_str(content)?;

        let mut questions = BTreeMap::new();
        for (key, list) in raw {
            let difficulty: Difficulty = key.parse()?;
            for question in &list {
                question.validate()?;
            }
            questions.insert(difficulty, list);
        }

        Ok(Self { questions })
    }

    /// The fixture bundled with the crate
    pub fn embedded() -> Result<Self, QuizError> {
        Self::from_json(EMBEDDED_FIXTURE)
    }

    pub fn load(path: &Path) -> Result<Self, QuizError> {
        let content = fs::read_to_string(path)?;
        let fixture = Self::from_json(&content)?;
        if fixture.is_empty() {
            return Err(QuizError::InvalidOrderQuestion(format!(
                "{:?} has no questions",
                path
            )));
        }
        log::info!(
            "Loaded {} order questions from {:?}",
            fixture.len(),
            path
        );
        Ok(fixture)
    }

    pub fn questions(&self, difficulty: Difficulty) -> &[OrderQuestion] {
        self.questions
            .get(&difficulty)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn difficulties(&self) -> impl Iterator<Item = Difficulty> + '_ {
        self.questions.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.questions.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A round source for one difficulty
    pub fn source(&self, difficulty: Difficulty) -> OrderSource {
        OrderSource::new(difficulty, self.questions(difficulty).to_vec())
    }
}

/// Draws shuffled rounds of at most [`ROUND_SIZE`] fixture questions
#[derive(Debug, Clone)]
pub struct OrderSource {
    difficulty: Difficulty,
    questions: Vec<OrderQuestion>,
}

impl OrderSource {
    pub fn new(difficulty: Difficulty, questions: Vec<OrderQuestion>) -> Self {
        Self {
            difficulty,
            questions,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}

impl QuestionSource for OrderSource {
    type Question = OrderQuestion;

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<OrderQuestion>, QuizError> {
        if self.questions.is_empty() {
            return Err(QuizError::NoQuestions(self.difficulty));
        }
        let mut round = self.questions.clone();
        round.shuffle(rng);
        round.truncate(ROUND_SIZE);
        Ok(round)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn abc() -> OrderQuestion {
        OrderQuestion {
            scenario: "Letters".to_string(),
            steps: vec!["A".to_string(), "B".to_string(), "C".to_string()],
            correct: vec![1, 0, 2],
        }
    }

    #[test]
    fn test_check_order_example() {
        let q = abc();
        assert!(check_order(&q, &["B", "A", "C"]));
        assert!(!check_order(&q, &["A", "B", "C"]));
        assert_eq!(q.expected_order(), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_check_order_length_mismatch_fails() {
        let q = abc();
        assert!(!check_order(&q, &["B", "A"]));
        assert!(!check_order(&q, &["B", "A", "C", "C"]));
    }

    #[test]
    fn test_check_order_out_of_range_fails() {
        let mut q = abc();
        q.correct = vec![1, 0, 9];
        assert!(!check_order(&q, &["B", "A", "C"]));
    }

    #[test]
    fn test_gradable_uses_check_order() {
        let q = abc();
        let answer = vec!["B".to_string(), "A".to_string(), "C".to_string()];
        assert!(q.is_correct(&answer));
    }

    #[test]
    fn test_validate_rejects_non_permutation() {
        let mut q = abc();
        q.correct = vec![0, 0, 2];
        assert!(q.validate().is_err());

        q.correct = vec![0, 1];
        assert!(q.validate().is_err());

        q.correct = vec![0, 1, 3];
        assert!(q.validate().is_err());

        assert!(abc().validate().is_ok());
    }

    #[test]
    fn test_display_steps_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(4);
        let q = abc();
        let mut shown = q.display_steps(&mut rng);
        shown.sort();
        assert_eq!(shown, q.steps);
    }

    #[test]
    fn test_embedded_fixture_is_valid() {
        let fixture = OrderFixture::embedded().unwrap();
        let levels: Vec<Difficulty> = fixture.difficulties().collect();
        assert_eq!(levels, vec![Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]);
        for level in levels {
            assert!(!fixture.questions(level).is_empty());
        }
    }

    #[test]
    fn test_load_fixture_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("order.json");
        std::fs::write(
            &path,
            r#"{"hard": [{"scenario": "s", "steps": ["a", "b"], "correct": [1, 0]}]}"#,
        )
        .unwrap();

        let fixture = OrderFixture::load(&path).unwrap();
        assert_eq!(fixture.len(), 1);
        assert_eq!(fixture.source(Difficulty::Hard).difficulty(), Difficulty::Hard);
        assert!(fixture.questions(Difficulty::Easy).is_empty());
    }

    #[test]
    fn test_load_rejects_empty_fixture() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("order.json");
        std::fs::write(&path, r#"{"easy": []}"#).unwrap();

        assert!(matches!(
            OrderFixture::load(&path),
            Err(QuizError::InvalidOrderQuestion(_))
        ));
    }

    #[test]
    fn test_fixture_rejects_unknown_difficulty() {
        let json = r#"{"expert": []}"#;
        assert!(matches!(
            OrderFixture::from_json(json),
            Err(QuizError::UnknownDifficulty(_))
        ));
    }

    #[test]
    fn test_fixture_rejects_bad_question() {
        let json = r#"{"easy": [{"scenario": "s", "steps": ["a", "b"], "correct": [1, 1]}]}"#;
        assert!(matches!(
            OrderFixture::from_json(json),
            Err(QuizError::InvalidOrderQuestion(_))
        ));
    }

    #[test]
    fn test_source_truncates_to_round_size() {
        let mut rng = StdRng::seed_from_u64(8);
        let questions: Vec<OrderQuestion> = (0..8)
            .map(|i| OrderQuestion {
                scenario: format!("s{}", i),
                ..abc()
            })
            .collect();
        let source = OrderSource::new(Difficulty::Hard, questions);

        let round = source.draw(&mut rng).unwrap();
        assert_eq!(round.len(), ROUND_SIZE);
    }

    #[test]
    fn test_empty_source_errors() {
        let mut rng = StdRng::seed_from_u64(8);
        let source = OrderSource::new(Difficulty::Medium, Vec::new());
        assert!(matches!(
            source.draw(&mut rng),
            Err(QuizError::NoQuestions(Difficulty::Medium))
        ));
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!("Hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("extreme".parse::<Difficulty>().is_err());
    }
}
